//! Range iteration.
//!
//! An iterator keeps a checkpoint per inner node on its current path:
//! the child byte it last visited there. Advancing resolves the
//! checkpoints against the live tree, steps the deepest one to its
//! next (or previous) child, descends into fresh inner nodes, and
//! yields leaves. Because checkpoints hold bytes rather than pointers,
//! the only thing a tree mutation can invalidate is the path itself —
//! and that is detected through the tree's version counter, after
//! which the iterator re-seeks past the last key it returned and
//! rebuilds its checkpoints there.

use crate::node::{Branch, Inner, Node};
use crate::tree::{Modifier, Tree};
use crate::{KeyBytes, KeyView};

/// One key-value observation made by an iterator or a search.
///
/// The key bytes are copied out of the tree and the value is cloned,
/// so an entry stays valid across later mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<V> {
    pub(crate) key: Vec<u8>,
    pub(crate) value: V,
    pub(crate) rank: usize,
}

impl<V> Entry<V> {
    /// The leaf's key bytes.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// The leaf's value as stored at observation time.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The leaf's position in the tree's sorted order at observation
    /// time.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Splits the entry into its key bytes and value.
    #[must_use]
    pub fn into_parts(self) -> (Vec<u8>, V) {
        (self.key, self.value)
    }
}

/// Ordered traversal over a key range of a [`Tree`].
///
/// Forward iterators cover `[start, end)`, reverse iterators
/// `(end, start]`; a `None` bound is open. The iterator does not pin
/// the tree: the owning thread may insert into or remove from the tree
/// between `next` calls, and iteration resumes just past the last
/// returned key. See [`Tree::iter`] for the locking contract.
#[derive(Debug)]
pub struct Iter<'t, K, V> {
    tree: &'t Tree<K, V>,
    version: u64,
    reverse: bool,
    started: bool,
    closed: bool,
    /// Current child byte per inner node along the path; the deepest
    /// entry is `None` until that node yields its first child.
    stack: Vec<Option<u8>>,
    /// Start bound before the first yield, then the last yielded key.
    cursor: Option<Vec<u8>>,
    /// Exclusive far bound (upper when forward, lower when reversed).
    terminate: Option<Vec<u8>>,
    rank: usize,
}

impl<'t, K, V> Iter<'t, K, V> {
    pub(crate) fn new(
        tree: &'t Tree<K, V>,
        version: u64,
        cursor: Option<Vec<u8>>,
        terminate: Option<Vec<u8>>,
        reverse: bool,
    ) -> Self {
        Self {
            tree,
            version,
            reverse,
            started: false,
            closed: false,
            stack: Vec::new(),
            cursor,
            terminate,
            rank: 0,
        }
    }

    fn in_range(&self, key: &[u8]) -> bool {
        if self.reverse {
            let below_start = self.cursor.as_ref().map_or(true, |cursor| key <= cursor.as_slice());
            let above_end = self.terminate.as_ref().map_or(true, |end| key > end.as_slice());
            below_start && above_end
        } else {
            let above_start = self.cursor.as_ref().map_or(true, |cursor| key >= cursor.as_slice());
            let below_end = self.terminate.as_ref().map_or(true, |end| key < end.as_slice());
            above_start && below_end
        }
    }

    /// True when `key` has crossed the far bound; nothing beyond it can
    /// qualify, in either direction.
    fn past_terminate(&self, key: &[u8]) -> bool {
        match &self.terminate {
            None => false,
            Some(end) => {
                if self.reverse {
                    key <= end.as_slice()
                } else {
                    key >= end.as_slice()
                }
            }
        }
    }
}

impl<K, V> Iter<'_, K, V>
where
    K: KeyBytes,
    V: Clone,
{
    fn step(&mut self) -> Option<Entry<V>> {
        if self.closed {
            return None;
        }
        let tree = self.tree;
        let core = tree.read_core();

        if self.version != core.version {
            // The tree changed shape behind us. Re-seek strictly past
            // the last returned key and rebuild the checkpoints there.
            // Before the first yield the cursor is still the inclusive
            // start bound, so the re-seek must not step over it.
            let modifier = match (self.reverse, self.started) {
                (false, true) => Modifier::Gt,
                (false, false) => Modifier::Gte,
                (true, true) => Modifier::Lt,
                (true, false) => Modifier::Lte,
            };
            let cursor = self.cursor.take();
            let hit = match (&cursor, core.root.as_ref()) {
                (_, None) => None,
                (Some(key), Some(root)) => {
                    crate::tree::seek_leaf(root, modifier, KeyView::new(key))
                }
                // Nothing was returned yet and there was no bound:
                // start over from the extreme.
                (None, Some(root)) => Some(if self.reverse {
                    root.recursive_last()
                } else {
                    root.recursive_first()
                }),
            };
            let Some(leaf) = hit else {
                self.closed = true;
                return None;
            };
            let key = leaf.key.key_bytes().as_ref().to_vec();
            if self.past_terminate(&key) {
                self.closed = true;
                return None;
            }
            self.version = core.version;
            self.started = true;
            let root = core.root.as_ref().expect("a leaf was just found");
            let (_, rank) = root.locate(KeyView::new(&key)).expect("the leaf was just found");
            self.rank = rank;
            self.stack = stack_for(root, KeyView::new(&key));
            let value = leaf.value.clone();
            self.cursor = Some(key.clone());
            return Some(Entry { key, value, rank });
        }

        let root = match core.root.as_ref() {
            Some(root) => root,
            None => {
                self.closed = true;
                return None;
            }
        };

        if !self.started {
            return self.yield_first(root);
        }

        // Resolve the checkpoint bytes against the live tree. The
        // version matched, so every recorded byte still leads to the
        // same inner node.
        let Node::Inner(root_inner) = &root.node else {
            // Single-leaf tree, already yielded.
            self.closed = true;
            return None;
        };
        let mut inners: Vec<&Inner<K, V>> = Vec::with_capacity(self.stack.len());
        inners.push(root_inner);
        for level in 0..self.stack.len().saturating_sub(1) {
            let byte = self.stack[level].expect("only the deepest checkpoint may be fresh");
            let child = inners[level]
                .tier
                .child_ref(byte)
                .expect("checkpoint byte resolves under an unchanged version");
            let Node::Inner(child_inner) = &child.node else {
                unreachable!("checkpoint path runs through inner nodes")
            };
            inners.push(child_inner);
        }

        loop {
            let Some(current) = self.stack.last().copied() else {
                self.closed = true;
                return None;
            };
            let inner = inners[self.stack.len() - 1];
            let hit = if self.reverse {
                inner.tier.prev(current)
            } else {
                inner.tier.next(current)
            };
            match hit {
                None => {
                    // This node is exhausted; resume at its parent.
                    self.stack.pop();
                    inners.pop();
                }
                Some((byte, child)) => {
                    *self.stack.last_mut().expect("stack is non-empty") = Some(byte);
                    match &child.node {
                        Node::Inner(child_inner) => {
                            self.stack.push(None);
                            inners.push(child_inner);
                        }
                        Node::Leaf(leaf) => {
                            let key = leaf.key.key_bytes().as_ref().to_vec();
                            if self.past_terminate(&key) {
                                self.closed = true;
                                return None;
                            }
                            if !self.in_range(&key) {
                                continue;
                            }
                            if self.reverse {
                                self.rank -= 1;
                            } else {
                                self.rank += 1;
                            }
                            debug_assert_eq!(
                                root.locate(KeyView::new(&key)).map(|(_, rank)| rank),
                                Some(self.rank),
                                "iterator rank drifted from the counted index",
                            );
                            let value = leaf.value.clone();
                            self.cursor = Some(key.clone());
                            return Some(Entry { key, value, rank: self.rank });
                        }
                    }
                }
            }
        }
    }

    /// Positions the iterator on its first leaf: the boundary leaf for
    /// an open start, otherwise the first leaf on the qualifying side
    /// of the start bound.
    fn yield_first(&mut self, root: &Branch<K, V>) -> Option<Entry<V>> {
        self.started = true;
        let leaf = match &self.cursor {
            None => Some(if self.reverse {
                root.recursive_last()
            } else {
                root.recursive_first()
            }),
            Some(start) => {
                let modifier = if self.reverse { Modifier::Lte } else { Modifier::Gte };
                crate::tree::seek_leaf(root, modifier, KeyView::new(start))
            }
        };
        let Some(leaf) = leaf else {
            self.closed = true;
            return None;
        };
        let key = leaf.key.key_bytes().as_ref().to_vec();
        if !self.in_range(&key) {
            self.closed = true;
            return None;
        }
        let (_, rank) = root.locate(KeyView::new(&key)).expect("the leaf was just found");
        self.rank = rank;
        if matches!(root.node, Node::Leaf(_)) {
            // Nothing to come back for.
            self.closed = true;
        } else {
            self.stack = stack_for(root, KeyView::new(&key));
        }
        let value = leaf.value.clone();
        self.cursor = Some(key.clone());
        Some(Entry { key, value, rank })
    }
}

/// Rebuilds the checkpoint stack for the path leading to `key`, which
/// must name a leaf present in the tree.
fn stack_for<K, V>(root: &Branch<K, V>, key: KeyView<'_>) -> Vec<Option<u8>>
where
    K: KeyBytes,
{
    let mut stack = Vec::new();
    let mut branch = root;
    let mut depth = 0;
    loop {
        match &branch.node {
            Node::Leaf(_) => return stack,
            Node::Inner(inner) => {
                depth += inner.prefix.len();
                let byte = key.at(depth);
                stack.push(Some(byte));
                branch = inner
                    .tier
                    .child_ref(byte)
                    .expect("key names a leaf present in the tree");
                depth += 1;
            }
        }
    }
}

impl<K, V> Iterator for Iter<'_, K, V>
where
    K: KeyBytes,
    V: Clone,
{
    type Item = Entry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}
