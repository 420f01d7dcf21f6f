//! Worker identifier allocation with reuse.
//!
//! Identifiers start at 1 and grow monotonically, but removing a worker
//! returns its identifier to a pool of released identifiers; the next
//! allocation prefers the smallest released identifier over minting a new
//! one. This keeps the visible identifier range dense under add/remove
//! churn.
//!
//! ## Rules
//! - No two simultaneously live workers share an identifier (the caller
//!   releases an identifier only after deregistering its worker).
//! - A released identifier never exceeds the highest identifier ever minted.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Reuse-preferring identifier allocator.
#[derive(Debug)]
pub(crate) struct IdAllocator {
    /// Next identifier to mint when no released one is available.
    next: u32,
    /// Released identifiers, smallest first.
    released: BinaryHeap<Reverse<u32>>,
}

impl IdAllocator {
    pub(crate) fn new() -> Self {
        Self {
            next: 1,
            released: BinaryHeap::new(),
        }
    }

    /// Returns the smallest released identifier, or mints a fresh one.
    pub(crate) fn acquire(&mut self) -> u32 {
        if let Some(Reverse(id)) = self.released.pop() {
            return id;
        }
        let id = self.next;
        self.next += 1;
        id
    }

    /// Returns an identifier to the pool for reuse.
    pub(crate) fn release(&mut self, id: u32) {
        debug_assert!(id > 0 && id < self.next, "released id was never minted");
        self.released.push(Reverse(id));
    }

    /// Number of identifiers currently awaiting reuse.
    #[cfg(test)]
    pub(crate) fn released_count(&self) -> usize {
        self.released.len()
    }
}
