use super::{Children, Sorted, N256};

/// 48-way tier: a 256-entry map from byte to a 1-based slot in the
/// child array, 0 meaning absent. Children are stored in insertion
/// order; byte order is recovered by walking the slot map.
#[derive(Debug)]
pub(crate) struct N48<T> {
    len: u8,
    slots: [u8; 256],
    children: [Option<T>; 48],
}

impl<T> Default for N48<T> {
    fn default() -> Self {
        Self {
            len: 0,
            slots: [0; 256],
            children: [const { None }; 48],
        }
    }
}

impl<T> N48<T> {
    fn slot_of(&self, key: u8) -> Option<usize> {
        match self.slots[key as usize] {
            0 => None,
            slot => Some(usize::from(slot) - 1),
        }
    }

    fn entry(&self, key: u8) -> Option<(u8, &T)> {
        let slot = self.slot_of(key)?;
        Some((key, self.children[slot].as_ref().expect("slot must point at a child")))
    }

    /// Scans `bytes` and returns the first occupied entry.
    fn scan(&self, mut bytes: impl Iterator<Item = u8>) -> Option<(u8, &T)> {
        bytes.find_map(|key| self.entry(key))
    }

    /// Removes every child in ascending byte order, feeding each to `f`.
    pub(crate) fn drain(&mut self, mut f: impl FnMut(u8, T)) {
        for key in 0..=u8::MAX {
            if let Some(slot) = self.slot_of(key) {
                self.slots[key as usize] = 0;
                let child = self.children[slot].take().expect("slot must point at a child");
                f(key, child);
            }
        }
        self.len = 0;
    }
}

impl<T> Children<T> for N48<T> {
    fn len(&self) -> usize {
        usize::from(self.len)
    }

    fn is_full(&self) -> bool {
        self.len == 48
    }

    fn at_min(&self) -> bool {
        self.len <= 16
    }

    fn add_child(&mut self, key: u8, child: T) {
        debug_assert!(!self.is_full());
        debug_assert!(self.slots[key as usize] == 0, "byte {key} is already occupied");
        let slot = self
            .children
            .iter()
            .position(Option::is_none)
            .expect("a free slot must exist below capacity");
        self.slots[key as usize] = u8::try_from(slot + 1).expect("slot fits in u8");
        self.children[slot] = Some(child);
        self.len += 1;
    }

    fn del_child(&mut self, key: u8) -> Option<T> {
        let slot = self.slot_of(key)?;
        self.slots[key as usize] = 0;
        self.len -= 1;
        self.children[slot].take()
    }

    fn child_ref(&self, key: u8) -> Option<&T> {
        let slot = self.slot_of(key)?;
        self.children[slot].as_ref()
    }

    fn child_mut(&mut self, key: u8) -> Option<&mut T> {
        let slot = self.slot_of(key)?;
        self.children[slot].as_mut()
    }

    fn first(&self) -> Option<(u8, &T)> {
        self.scan(0..=u8::MAX)
    }

    fn last(&self) -> Option<(u8, &T)> {
        self.scan((0..=u8::MAX).rev())
    }

    fn next(&self, key: Option<u8>) -> Option<(u8, &T)> {
        match key {
            None => self.first(),
            Some(key) => self.gt(key),
        }
    }

    fn prev(&self, key: Option<u8>) -> Option<(u8, &T)> {
        match key {
            None => self.last(),
            Some(key) => self.lt(key),
        }
    }

    fn gte(&self, key: u8) -> Option<(u8, &T)> {
        self.scan(key..=u8::MAX)
    }

    fn gt(&self, key: u8) -> Option<(u8, &T)> {
        self.scan(key.checked_add(1)?..=u8::MAX)
    }

    fn lte(&self, key: u8) -> Option<(u8, &T)> {
        self.scan((0..=key).rev())
    }

    fn lt(&self, key: u8) -> Option<(u8, &T)> {
        self.scan((0..key).rev())
    }

    fn visit_mut(&mut self, mut f: impl FnMut(u8, &mut T)) {
        for key in 0..=u8::MAX {
            if let Some(slot) = self.slot_of(key) {
                let child = self.children[slot].as_mut().expect("slot must point at a child");
                f(key, child);
            }
        }
    }
}

impl<T, const M: usize> From<&mut Sorted<T, M>> for N48<T> {
    fn from(other: &mut Sorted<T, M>) -> Self {
        let mut tier = Self::default();
        other.drain(|key, child| tier.add_child(key, child));
        tier
    }
}

impl<T> From<&mut N256<T>> for N48<T> {
    fn from(other: &mut N256<T>) -> Self {
        let mut tier = Self::default();
        other.drain(|key, child| tier.add_child(key, child));
        tier
    }
}
