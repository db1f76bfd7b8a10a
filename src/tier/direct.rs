use super::{Children, N48};

/// 256-way tier: children indexed directly by byte. The widest tier;
/// it never grows and shrinks back to 48-way when under-used.
#[derive(Debug)]
pub(crate) struct N256<T> {
    len: u16,
    children: [Option<T>; 256],
}

impl<T> Default for N256<T> {
    fn default() -> Self {
        Self {
            len: 0,
            children: [const { None }; 256],
        }
    }
}

impl<T> N256<T> {
    fn entry(&self, key: u8) -> Option<(u8, &T)> {
        self.children[key as usize].as_ref().map(|child| (key, child))
    }

    fn scan(&self, mut bytes: impl Iterator<Item = u8>) -> Option<(u8, &T)> {
        bytes.find_map(|key| self.entry(key))
    }

    /// Removes every child in ascending byte order, feeding each to `f`.
    pub(crate) fn drain(&mut self, mut f: impl FnMut(u8, T)) {
        for key in 0..=u8::MAX {
            if let Some(child) = self.children[key as usize].take() {
                f(key, child);
            }
        }
        self.len = 0;
    }
}

impl<T> Children<T> for N256<T> {
    fn len(&self) -> usize {
        usize::from(self.len)
    }

    fn is_full(&self) -> bool {
        false
    }

    fn at_min(&self) -> bool {
        self.len <= 48
    }

    fn add_child(&mut self, key: u8, child: T) {
        debug_assert!(self.children[key as usize].is_none(), "byte {key} is already occupied");
        self.children[key as usize] = Some(child);
        self.len += 1;
    }

    fn del_child(&mut self, key: u8) -> Option<T> {
        let child = self.children[key as usize].take()?;
        self.len -= 1;
        Some(child)
    }

    fn child_ref(&self, key: u8) -> Option<&T> {
        self.children[key as usize].as_ref()
    }

    fn child_mut(&mut self, key: u8) -> Option<&mut T> {
        self.children[key as usize].as_mut()
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
            if let Some(child) = self.children[key as usize].as_mut() {
                f(key, child);
            }
        }
    }
}

impl<T> From<&mut N48<T>> for N256<T> {
    fn from(other: &mut N48<T>) -> Self {
        let mut tier = Self::default();
        other.drain(|key, child| tier.add_child(key, child));
        tier
    }
}
