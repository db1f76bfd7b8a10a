//! An ordered, in-memory key-value dictionary built on an Adaptive
//! Radix Tree with counted subtrees.
//!
//! The tree combines vertical path compression (shared key prefixes
//! stored once per inner node) with horizontal compression (four inner
//! node sizes, 4/16/48/256-way, swapped as fanout changes), so keys
//! with redundant prefixes — database index entries, file paths,
//! zero-padded numbers — are stored compactly and looked up in time
//! proportional to key length.
//!
//! Beyond point lookup, every inner node counts the leaves beneath it
//! and every child pointer caches the leaf count of its earlier
//! siblings. That turns the sorted key set into a virtual array:
//! [`Tree::at`] fetches the `i`-th key and [`Tree::rank`] inverts it,
//! both in `O(log N)`. Ordered lookup with the [`Modifier`] relations
//! (`>=`, `>`, `<=`, `<`) and range iteration in either direction
//! complete the surface.
//!
//! Reads take a shared lock, writes an exclusive one, so a tree can be
//! shared across threads with single-writer semantics; a
//! [`Tree::set_skip_locking`] escape hatch drops the locking for
//! single-threaded or externally synchronized use. Iterators tolerate
//! mutation from their own thread in between steps.
//!
//! ```
//! use counted_art::{Modifier, Tree};
//!
//! let tree: Tree<String, u32> = Tree::new();
//! tree.insert("apple".to_string(), 1);
//! tree.insert("april".to_string(), 2);
//! tree.insert("banana".to_string(), 3);
//!
//! assert_eq!(tree.get(&"apple".to_string()), Some(1));
//! assert_eq!(tree.at(2).unwrap().key(), b"banana");
//! let gte = tree.find(Modifier::Gte, Some(&"apz".to_string())).unwrap();
//! assert_eq!(gte.key(), b"banana");
//!
//! let keys: Vec<_> = tree.iter(None, None).map(|e| e.into_parts().0).collect();
//! assert_eq!(keys, [b"apple".to_vec(), b"april".to_vec(), b"banana".to_vec()]);
//! ```

#![warn(
    clippy::pedantic,
    clippy::cargo,
    rustdoc::all,
    missing_debug_implementations
)]
#![deny(clippy::all, missing_docs, rust_2018_idioms, rust_2021_compatibility)]
#![allow(clippy::module_name_repetitions)]

mod bytes_comparable;
mod iter;
mod node;
mod search;
mod search_key;
mod tier;
mod trace;
mod tree;

pub use bytes_comparable::KeyBytes;
pub use iter::{Entry, Iter};
pub use search_key::KeyView;
pub use tree::{Modifier, Tree};
