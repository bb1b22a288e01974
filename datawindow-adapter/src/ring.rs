use alloc::vec::Vec;

/// A fixed set of render slots addressed through a rotating head.
///
/// Logical index `i` (0 = first item of the window) lives in physical slot
/// `(head + i) % len`. Shifting the window rewrites exactly one slot.
#[derive(Clone, Debug)]
pub(crate) struct SlotRing<T> {
    slots: Vec<T>,
    head: usize,
}

impl<T> SlotRing<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: 0,
        }
    }

    pub(crate) fn reset(&mut self, items: Vec<T>) {
        self.slots = items;
        self.head = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn head(&self) -> usize {
        self.head
    }

    /// Appends at the logical end, evicting the logical first item. Returns the rewritten slot.
    pub(crate) fn push_back(&mut self, item: T) -> Option<usize> {
        let n = self.slots.len();
        if n == 0 {
            return None;
        }
        self.head = (self.head + 1) % n;
        let slot = (self.head + n - 1) % n;
        self.slots[slot] = item;
        Some(slot)
    }

    /// Prepends at the logical start, evicting the logical last item. Returns the rewritten slot.
    pub(crate) fn push_front(&mut self, item: T) -> Option<usize> {
        let n = self.slots.len();
        if n == 0 {
            return None;
        }
        self.head = (self.head + n - 1) % n;
        self.slots[self.head] = item;
        Some(self.head)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        let n = self.slots.len();
        if index >= n {
            return None;
        }
        self.slots.get((self.head + index) % n)
    }

    /// `(slot, item)` pairs in logical order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        let n = self.slots.len();
        (0..n).map(move |i| {
            let slot = (self.head + i) % n;
            (slot, &self.slots[slot])
        })
    }

    pub(crate) fn slots(&self) -> &[T] {
        &self.slots
    }
}
