//! Bounded top-N selection.
//!
//! [`TopN`] keeps at most `capacity` items in a min-heap whose root is the
//! weakest kept item, so selecting from M items costs O(M log N) and never
//! holds more than N of them.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::normalize::Stat;

struct Ranked<T, S> {
    score: S,
    seq: u64,
    item: T,
}

impl<T, S: PartialOrd> Ord for Ranked<T, S> {
    /// Greater means stronger: higher score, then earlier arrival.
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .partial_cmp(&other.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T, S: PartialOrd> PartialOrd for Ranked<T, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, S: PartialOrd> PartialEq for Ranked<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T, S: PartialOrd> Eq for Ranked<T, S> {}

/// Fixed-capacity collector of the highest-scoring items.
///
/// Ties keep arrival order: an item only displaces the weakest kept item
/// when its score is strictly greater, and equal scores come out in the
/// order they were pushed.
pub struct TopN<T, S> {
    capacity: usize,
    seq: u64,
    heap: BinaryHeap<Reverse<Ranked<T, S>>>,
}

impl<T, S: PartialOrd> TopN<T, S> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            seq: 0,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, score: S, item: T) {
        if self.capacity == 0 {
            return;
        }

        let entry = Ranked {
            score,
            seq: self.seq,
            item,
        };
        self.seq += 1;

        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(entry));
            return;
        }

        let stronger = self
            .heap
            .peek()
            .is_some_and(|Reverse(weakest)| entry > *weakest);
        if stronger {
            self.heap.pop();
            self.heap.push(Reverse(entry));
        }
    }

    /// Kept items, strongest first.
    pub fn into_sorted_vec(self) -> Vec<(S, T)> {
        // Ascending over `Reverse` is descending by score, then by arrival.
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(r)| (r.score, r.item))
            .collect()
    }
}

#[cfg(test)]
impl<T, S: PartialOrd> TopN<T, S> {
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Score of the weakest kept item.
    pub fn min_score(&self) -> Option<&S> {
        self.heap.peek().map(|Reverse(r)| &r.score)
    }
}

impl<T, S: PartialOrd> Extend<(S, T)> for TopN<T, S> {
    fn extend<I: IntoIterator<Item = (S, T)>>(&mut self, iter: I) {
        for (score, item) in iter {
            self.push(score, item);
        }
    }
}

/// The `n` highest-scoring stats, descending, ties in input order.
pub fn select_top_n(n: usize, stats: impl IntoIterator<Item = Stat>) -> Vec<Stat> {
    let mut top = TopN::new(n);
    top.extend(stats.into_iter().map(|s| (s.score, s)));
    top.into_sorted_vec().into_iter().map(|(_, s)| s).collect()
}

#[cfg(test)]
#[path = "topn_test.rs"]
mod tests;
