//! The four fixed-fanout child tables used by inner nodes.
//!
//! Every inner node maps single bytes to children through one of four
//! tiers: sorted parallel arrays of 4 or 16 entries, a 256-entry slot
//! map over a 48-entry child array, or a directly indexed 256-entry
//! array. A tier is swapped for its larger neighbor when it fills up
//! and for its smaller neighbor when deletions leave it under-used.

mod direct;
mod slotted;
mod sorted;

pub(crate) use direct::N256;
pub(crate) use slotted::N48;
pub(crate) use sorted::Sorted;

/// The two sorted tiers share one layout.
pub(crate) type N4<T> = Sorted<T, 4>;
pub(crate) type N16<T> = Sorted<T, 16>;

/// Byte-indexed child table. Implemented by all four tiers.
///
/// Navigation methods return `(byte, child)` pairs; for `next` and
/// `prev` a `None` anchor means "start from the boundary" so the same
/// call drives both iteration startup and continuation.
pub(crate) trait Children<T> {
    fn len(&self) -> usize;

    /// True when no further child fits and the tier must grow.
    fn is_full(&self) -> bool;

    /// True when the tier has few enough children to shrink. Evaluated
    /// by the delete engine before it removes a child, so the smaller
    /// tier always has room for what remains.
    fn at_min(&self) -> bool;

    /// Adds a child under `key`. The key must be absent and the tier
    /// not full.
    fn add_child(&mut self, key: u8, child: T);

    /// Removes and returns the child under `key`.
    fn del_child(&mut self, key: u8) -> Option<T>;

    fn child_ref(&self, key: u8) -> Option<&T>;

    fn child_mut(&mut self, key: u8) -> Option<&mut T>;

    /// Child with the smallest byte.
    fn first(&self) -> Option<(u8, &T)>;

    /// Child with the largest byte.
    fn last(&self) -> Option<(u8, &T)>;

    /// Strict successor of `key` in byte order; `None` key yields the
    /// first child.
    fn next(&self, key: Option<u8>) -> Option<(u8, &T)>;

    /// Strict predecessor of `key` in byte order; `None` key yields the
    /// last child.
    fn prev(&self, key: Option<u8>) -> Option<(u8, &T)>;

    /// Smallest byte `>= key`.
    fn gte(&self, key: u8) -> Option<(u8, &T)>;

    /// Smallest byte `> key`.
    fn gt(&self, key: u8) -> Option<(u8, &T)>;

    /// Largest byte `<= key`.
    fn lte(&self, key: u8) -> Option<(u8, &T)>;

    /// Largest byte `< key`.
    fn lt(&self, key: u8) -> Option<(u8, &T)>;

    /// Visits every child in ascending byte order.
    fn visit_mut(&mut self, f: impl FnMut(u8, &mut T));
}

fn ordered_insert<T>(items: &mut [T], index: usize, value: T) {
    items[index..].rotate_right(1);
    items[index] = value;
}

fn ordered_remove<T>(items: &mut [T], index: usize) -> &mut T {
    items[index..].rotate_left(1);
    &mut items[items.len() - 1]
}
