use std::collections::BTreeMap;

///
/// Holds items that complete out of order and releases them in sequence.
/// Sequence numbers start at zero and must each be pushed exactly once.
///
#[derive(Debug)]
pub struct ReorderBuffer<T> {
    next: u64,
    pending: BTreeMap<u64, T>,
}

impl<T> Default for ReorderBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReorderBuffer<T> {
    pub fn new() -> Self {
        ReorderBuffer {
            next: 0,
            pending: BTreeMap::new(),
        }
    }

    ///
    /// Accept item `seq` and return every item that is now ready, in order.
    ///
    pub fn push(&mut self, seq: u64, item: T) -> Vec<T> {
        if seq < self.next {
            tracing::warn!(seq, next = self.next, "sequence number already released");
            return Vec::new();
        }
        self.pending.insert(seq, item);

        let mut ready = Vec::new();
        while let Some(item) = self.pending.remove(&self.next) {
            ready.push(item);
            self.next += 1;
        }
        ready
    }

    /// Number of items waiting on an earlier sequence number.
    pub fn waiting(&self) -> usize {
        self.pending.len()
    }

    /// Next sequence number to be released.
    pub fn next_seq(&self) -> u64 {
        self.next
    }
}
