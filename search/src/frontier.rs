//! Uniform-cost frontier: a min-heap of path-carrying entries.
//!
//! Stale entries (a node pushed again later at a lower cost) are never
//! removed; the search pops and re-expands them harmlessly.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::node::{FrontierEntryV1, FrontierKey};

/// A heap slot: the entry plus its push counter.
///
/// `BinaryHeap` is a max-heap, so slots are stored as `Reverse<HeapSlot>`
/// to get min-heap behavior (lowest key first).
#[derive(Debug)]
struct HeapSlot {
    entry: FrontierEntryV1,
    creation_order: u64,
}

impl HeapSlot {
    fn key(&self) -> FrontierKey<'_> {
        FrontierKey::of(&self.entry, self.creation_order)
    }
}

impl PartialEq for HeapSlot {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for HeapSlot {}

impl PartialOrd for HeapSlot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapSlot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Uniform-cost frontier manager.
///
/// Maintains a `BinaryHeap` for O(log n) pop of the cheapest entry, a
/// monotonic push counter, and the high-water mark of its size.
#[derive(Debug, Default)]
pub struct UniformCostFrontier {
    heap: BinaryHeap<Reverse<HeapSlot>>,
    next_creation_order: u64,
    high_water: u64,
}

impl UniformCostFrontier {
    /// Create a new empty frontier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an entry. Every push is accepted; there is no dedup.
    pub fn push(&mut self, entry: FrontierEntryV1) {
        let creation_order = self.next_creation_order;
        self.next_creation_order += 1;
        self.heap.push(Reverse(HeapSlot {
            entry,
            creation_order,
        }));
        self.high_water = self.high_water.max(self.heap.len() as u64);
    }

    /// Pop the cheapest entry under [`FrontierKey`] ordering.
    #[must_use]
    pub fn pop(&mut self) -> Option<FrontierEntryV1> {
        self.heap.pop().map(|Reverse(slot)| slot.entry)
    }

    /// Deep copy of the current contents in extraction order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<FrontierEntryV1> {
        let mut slots: Vec<&HeapSlot> = self.heap.iter().map(|Reverse(slot)| slot).collect();
        slots.sort_unstable_by(|a, b| a.key().cmp(&b.key()));
        slots.into_iter().map(|slot| slot.entry.clone()).collect()
    }

    /// Current frontier size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the frontier is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// High-water mark of frontier size.
    #[must_use]
    pub fn high_water(&self) -> u64 {
        self.high_water
    }
}
