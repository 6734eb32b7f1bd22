//! Index-gated release of out-of-order completions.

use std::collections::BTreeMap;

/// Buffers items that finish out of order and releases them strictly by slot.
///
/// Slot `k` is never released before slot `k - 1`. Whoever owns the queue
/// owns the whole delivery order, so it needs `&mut self` and no locking.
#[derive(Debug)]
pub struct OrderedDelivery<T> {
    next_slot: usize,
    buffered: BTreeMap<usize, T>,
}

impl<T> Default for OrderedDelivery<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OrderedDelivery<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_slot: 0,
            buffered: BTreeMap::new(),
        }
    }

    /// Accepts the item for `slot` and returns every item that is now
    /// releasable, in slot order.
    ///
    /// A slot that was already released or is already buffered is dropped.
    pub fn push(&mut self, slot: usize, item: T) -> Vec<T> {
        if slot < self.next_slot || self.buffered.contains_key(&slot) {
            tracing::warn!(
                slot,
                next_slot = self.next_slot,
                "duplicate delivery slot ignored"
            );
            return Vec::new();
        }
        self.buffered.insert(slot, item);

        let mut released = Vec::new();
        while let Some(item) = self.buffered.remove(&self.next_slot) {
            released.push(item);
            self.next_slot += 1;
        }
        released
    }

    /// Items waiting on an earlier slot.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffered.len()
    }

    /// Number of items released so far.
    #[must_use]
    pub fn released(&self) -> usize {
        self.next_slot
    }
}
