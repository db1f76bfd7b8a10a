use std::cmp::Ordering;
use std::fmt;
use std::ops::{Deref, DerefMut};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::iter::{Entry, Iter};
use crate::node::{render, Branch, Leaf, Node};
use crate::search::Seek;
use crate::trace::trace_op;
use crate::{KeyBytes, KeyView};

/// Selects which comparison an ordered [`Tree::find`] answers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// The leaf whose key equals the query exactly. The default; this
    /// is plain map lookup.
    #[default]
    Exact,
    /// The leaf with the smallest key `>=` the query.
    Gte,
    /// The leaf with the smallest key `>` the query.
    Gt,
    /// The leaf with the largest key `<=` the query.
    Lte,
    /// The leaf with the largest key `<` the query.
    Lt,
}

pub(crate) struct Core<K, V> {
    pub(crate) root: Option<Branch<K, V>>,
    pub(crate) size: usize,
    /// Bumped by every mutating call. Iterators compare it against
    /// their snapshot to notice that their checkpoints went stale.
    pub(crate) version: u64,
}

/// An ordered, in-memory key-value map.
///
/// Keys are arbitrary byte strings (rendered through [`KeyBytes`]; null
/// bytes and the empty key are fine), kept in lexicographic order by an
/// adaptive radix tree. On top of the usual map operations the tree
/// maintains a counted-subtree index, so positional access ([`Tree::at`])
/// and rank lookup ([`Tree::rank`]) cost `O(log N)`, and it answers
/// order-modifier searches ([`Tree::find`] with [`Modifier`]).
///
/// # Concurrency
///
/// The tree owns a reader-writer lock: any number of concurrent
/// readers, or a single writer, whole-tree granularity. All methods
/// take `&self`; the lock makes a finished write visible to every
/// later read. [`Tree::set_skip_locking`] disables the internal lock
/// for callers that synchronize by other means (or run single
/// threaded); with locking skipped, overlapping access is a data race
/// and the caller must prevent it.
///
/// Iterators do not hold the lock between steps. The thread that owns
/// an iterator may freely mutate the tree mid-iteration; the iterator
/// notices and resumes just past the last key it returned. If *other*
/// threads may write during iteration, the caller must hold off those
/// writes for the duration.
pub struct Tree<K, V> {
    core: RwLock<Core<K, V>>,
    skip_locking: bool,
}

pub(crate) enum ReadHandle<'a, K, V> {
    Locked(RwLockReadGuard<'a, Core<K, V>>),
    Raw(&'a Core<K, V>),
}

impl<K, V> Deref for ReadHandle<'_, K, V> {
    type Target = Core<K, V>;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Locked(guard) => guard,
            Self::Raw(core) => core,
        }
    }
}

enum WriteHandle<'a, K, V> {
    Locked(RwLockWriteGuard<'a, Core<K, V>>),
    Raw(&'a mut Core<K, V>),
}

impl<K, V> Deref for WriteHandle<'_, K, V> {
    type Target = Core<K, V>;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Locked(guard) => guard,
            Self::Raw(core) => core,
        }
    }
}

impl<K, V> DerefMut for WriteHandle<'_, K, V> {
    fn deref_mut(&mut self) -> &mut Core<K, V> {
        match self {
            Self::Locked(guard) => guard,
            Self::Raw(core) => core,
        }
    }
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Tree<K, V> {
    /// Creates an empty tree with internal locking enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: RwLock::new(Core { root: None, size: 0, version: 0 }),
            skip_locking: false,
        }
    }

    /// Turns the internal lock on or off. Off means every operation
    /// touches the data unsynchronized and the caller owns exclusion
    /// of readers from writers. Taking `&mut self` guarantees the
    /// switch itself cannot race ongoing operations.
    pub fn set_skip_locking(&mut self, skip: bool) {
        self.skip_locking = skip;
    }

    /// Whether the internal lock is bypassed.
    #[must_use]
    pub fn skip_locking(&self) -> bool {
        self.skip_locking
    }

    pub(crate) fn read_core(&self) -> ReadHandle<'_, K, V> {
        if self.skip_locking {
            // SAFETY: with skip_locking set the caller vouches that no
            // writer overlaps this access; the data is reached through
            // the lock's cell without taking the lock.
            ReadHandle::Raw(unsafe { &*self.core.data_ptr() })
        } else {
            ReadHandle::Locked(self.core.read())
        }
    }

    fn write_core(&self) -> WriteHandle<'_, K, V> {
        if self.skip_locking {
            // SAFETY: as in `read_core`, but the caller additionally
            // vouches this is the only access of any kind.
            WriteHandle::Raw(unsafe { &mut *self.core.data_ptr() })
        } else {
            WriteHandle::Locked(self.core.write())
        }
    }

    /// Number of keys stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_core().size
    }

    /// True when no key is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_core().root.is_none()
    }

    /// The mutation counter. Every `insert` and every successful
    /// `remove` advances it; equal values across two calls mean the
    /// tree was not touched in between.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.read_core().version
    }
}

impl<K, V> Tree<K, V>
where
    K: KeyBytes,
{
    /// Inserts `value` under `key`. Returns true when the key was
    /// already present, in which case only its value is replaced.
    pub fn insert(&self, key: K, value: V) -> bool {
        let mut core = self.write_core();
        let leaf = Leaf { key, value, key_byte: 0 };
        let updated = match &mut core.root {
            None => {
                core.root = Some(Branch::from_node(Node::Leaf(Box::new(leaf))));
                false
            }
            Some(root) => root.node.insert(leaf, 0),
        };
        if !updated {
            core.size += 1;
        }
        core.version += 1;
        trace_op!("insert: updated={} size={}", updated, core.size);
        updated
    }

    /// Removes `key` and returns the value it held.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut core = self.write_core();
        let bytes = key.key_bytes();
        let view = KeyView::new(bytes.as_ref());
        let root_is_matching_leaf = match &core.root {
            None => return None,
            Some(branch) => match &branch.node {
                Node::Leaf(leaf) => {
                    if !leaf.matches(view) {
                        return None;
                    }
                    true
                }
                Node::Inner(_) => false,
            },
        };
        let removed = if root_is_matching_leaf {
            let Some(Branch { node: Node::Leaf(leaf), .. }) = core.root.take() else {
                unreachable!("root was just probed as a matching leaf")
            };
            *leaf
        } else {
            let root = core.root.as_mut().expect("root was probed as an inner node");
            root.node.remove(view, 0)?
        };
        core.size -= 1;
        core.version += 1;
        trace_op!("remove: size={}", core.size);
        Some(removed.value)
    }
}

impl<K, V> Tree<K, V>
where
    K: KeyBytes,
    V: Clone,
{
    /// Looks up `key` exactly and returns its value.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.find(Modifier::Exact, Some(key)).map(|entry| entry.value)
    }

    /// Finds the leaf selected by `modifier` relative to `key`, along
    /// with its rank. A `None` key asks for the extreme in the
    /// modifier's direction: the first leaf for `Gte`/`Gt`, the last
    /// for `Lte`/`Lt` (and nothing for `Exact`).
    #[must_use]
    pub fn find(&self, modifier: Modifier, key: Option<&K>) -> Option<Entry<V>> {
        let core = self.read_core();
        let root = core.root.as_ref()?;
        let leaf = match key {
            None => match modifier {
                Modifier::Exact => return None,
                Modifier::Gte | Modifier::Gt => root.recursive_first(),
                Modifier::Lte | Modifier::Lt => root.recursive_last(),
            },
            Some(key) => {
                let bytes = key.key_bytes();
                seek_leaf(root, modifier, KeyView::new(bytes.as_ref()))?
            }
        };
        Some(entry_for(root, leaf))
    }

    /// Positional access: the `i`-th leaf in sorted order.
    #[must_use]
    pub fn at(&self, i: usize) -> Option<Entry<V>> {
        let core = self.read_core();
        let root = core.root.as_ref()?;
        let leaf = root.at(i)?;
        let key = leaf.key.key_bytes().as_ref().to_vec();
        Some(Entry { key, value: leaf.value.clone(), rank: i })
    }

    /// The rank `key` occupies in sorted order, when present.
    #[must_use]
    pub fn rank(&self, key: &K) -> Option<usize> {
        let core = self.read_core();
        let root = core.root.as_ref()?;
        let bytes = key.key_bytes();
        root.locate(KeyView::new(bytes.as_ref())).map(|(_, rank)| rank)
    }

    /// The smallest-keyed leaf.
    #[must_use]
    pub fn first(&self) -> Option<Entry<V>> {
        self.find(Modifier::Gte, None)
    }

    /// The largest-keyed leaf.
    #[must_use]
    pub fn last(&self) -> Option<Entry<V>> {
        self.find(Modifier::Lte, None)
    }

    /// Iterates `[start, end)` in ascending key order. `None` bounds
    /// are open; `iter(None, None)` walks the whole tree.
    ///
    /// The owning thread may mutate the tree between steps; see the
    /// type-level notes on [`Tree`] for the cross-thread contract.
    #[must_use]
    pub fn iter(&self, start: Option<&K>, end: Option<&K>) -> Iter<'_, K, V> {
        let core = self.read_core();
        Iter::new(self, core.version, owned_bytes(start), owned_bytes(end), false)
    }

    /// Iterates `(end, start]` in descending key order, beginning with
    /// the largest key `<= start`. `None` bounds are open;
    /// `rev_iter(None, None)` walks the whole tree backwards.
    #[must_use]
    pub fn rev_iter(&self, end: Option<&K>, start: Option<&K>) -> Iter<'_, K, V> {
        let core = self.read_core();
        Iter::new(self, core.version, owned_bytes(start), owned_bytes(end), true)
    }
}

fn owned_bytes<K: KeyBytes>(key: Option<&K>) -> Option<Vec<u8>> {
    key.map(|key| key.key_bytes().as_ref().to_vec())
}

fn entry_for<'a, K, V>(root: &'a Branch<K, V>, leaf: &'a Leaf<K, V>) -> Entry<V>
where
    K: KeyBytes,
    V: Clone,
{
    let key = leaf.key.key_bytes().as_ref().to_vec();
    let (_, rank) = root
        .locate(KeyView::new(&key))
        .expect("a leaf the search just returned is present");
    Entry { key, value: leaf.value.clone(), rank }
}

/// Resolves an ordered (or exact) search against the subtree under
/// `root`, applying the backtracking verdicts that only the tree level
/// can settle: an outward direction with a surviving candidate means
/// the answer is that candidate's boundary leaf.
pub(crate) fn seek_leaf<'a, K, V>(
    root: &'a Branch<K, V>,
    modifier: Modifier,
    key: KeyView<'_>,
) -> Option<&'a Leaf<K, V>>
where
    K: KeyBytes,
{
    match modifier {
        Modifier::Exact => root.locate(key).map(|(leaf, _)| leaf),
        Modifier::Gte | Modifier::Gt => {
            let strict = modifier == Modifier::Gt;
            match root.seek_gte(key, 0, strict, false, Ordering::Equal) {
                Seek::Found(leaf) => {
                    if strict && key.compare(leaf.key.key_bytes().as_ref()) == Ordering::Equal {
                        None
                    } else {
                        Some(leaf)
                    }
                }
                Seek::Miss { node: Some(node), dir } if dir.is_left() => {
                    Some(node.recursive_first())
                }
                Seek::Miss { .. } => None,
            }
        }
        Modifier::Lte | Modifier::Lt => {
            let strict = modifier == Modifier::Lt;
            match root.seek_lte(key, 0, strict, false, Ordering::Equal) {
                Seek::Found(leaf) => {
                    if strict && key.compare(leaf.key.key_bytes().as_ref()) == Ordering::Equal {
                        None
                    } else {
                        Some(leaf)
                    }
                }
                Seek::Miss { node: Some(node), dir } if dir.is_right() => {
                    Some(node.recursive_last())
                }
                Seek::Miss { .. } => None,
            }
        }
    }
}

impl<K, V> fmt::Debug for Tree<K, V>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.read_core();
        writeln!(f, "tree of size {}", core.size)?;
        match &core.root {
            None => Ok(()),
            Some(root) => render(f, root, 0, 1),
        }
    }
}
