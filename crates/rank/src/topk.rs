//! Bounded top-K accumulation of (distance, index) pairs.

use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

type Entry = (OrderedFloat<f64>, u64);

/// Keeps the `k` smallest `(distance, index)` pairs seen so far.
///
/// Backed by a max-heap capped at `k`, so memory stays O(k) however many
/// pairs are pushed. Pairs order by distance, then by index; equal
/// distances therefore keep the lower (lexicographically earlier) index.
#[derive(Debug, Clone)]
pub(crate) struct TopK {
    k: usize,
    heap: BinaryHeap<Entry>,
}

impl TopK {
    /// Creates an empty accumulator. Debug-asserts `k >= 1`.
    pub(crate) fn new(k: usize) -> Self {
        debug_assert!(k >= 1);
        Self {
            k,
            heap: BinaryHeap::new(),
        }
    }

    /// Offers one pair.
    pub(crate) fn push(&mut self, distance: f64, index: u64) {
        let entry = (OrderedFloat(distance), index);
        if self.heap.len() < self.k {
            self.heap.push(entry);
        } else if self.heap.peek().is_some_and(|worst| entry < *worst) {
            self.heap.pop();
            self.heap.push(entry);
        }
    }

    /// Combines two accumulators into one holding the `k` smallest of both.
    pub(crate) fn merge(mut self, other: TopK) -> TopK {
        if other.heap.len() > self.heap.len() {
            return other.merge(self);
        }
        for (d, i) in other.heap {
            self.push(d.0, i);
        }
        self
    }

    /// Returns the kept pairs in ascending `(distance, index)` order.
    pub(crate) fn into_sorted(self) -> Vec<(f64, u64)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|(d, i)| (d.0, i))
            .collect()
    }
}
