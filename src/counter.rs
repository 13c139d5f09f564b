//! Per-board atomic statistics, read without locks by the reporter thread.
//!
//! Each board is owned and mutated by exactly one worker thread, so within a
//! board there is never contention on these counters. They are still atomic
//! because the reporter thread reads them concurrently from outside. Fields
//! are cache-padded so that one board's hot counters never share a cache
//! line with another board's.

use crossbeam::utils::CachePadded;
use std::sync::atomic::{AtomicU64, Ordering};

/// The four running totals a [`crate::board::Board`] keeps while searching.
///
/// All accesses use [`Ordering::Relaxed`]: the reporter's statistics are
/// approximate by design (see SPEC_FULL.md §5), and the only guarantee
/// needed is that increments eventually become visible.
pub struct BoardCounters {
    checked_nodes: CachePadded<AtomicU64>,
    placed_nodes: CachePadded<AtomicU64>,
    solutions: CachePadded<AtomicU64>,
    max_depth: CachePadded<AtomicU64>,
}

impl BoardCounters {
    pub fn zero() -> BoardCounters {
        BoardCounters {
            checked_nodes: CachePadded::new(AtomicU64::new(0)),
            placed_nodes: CachePadded::new(AtomicU64::new(0)),
            solutions: CachePadded::new(AtomicU64::new(0)),
            max_depth: CachePadded::new(AtomicU64::new(0)),
        }
    }

    pub fn checked_nodes(&self) -> u64 {
        self.checked_nodes.load(Ordering::Relaxed)
    }

    pub fn placed_nodes(&self) -> u64 {
        self.placed_nodes.load(Ordering::Relaxed)
    }

    pub fn solutions(&self) -> u64 {
        self.solutions.load(Ordering::Relaxed)
    }

    pub fn max_depth(&self) -> u64 {
        self.max_depth.load(Ordering::Relaxed)
    }

    pub fn increment_checked(&self) {
        self.checked_nodes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_placed(&self) {
        self.placed_nodes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_solutions(&self) {
        self.solutions.fetch_add(1, Ordering::Relaxed);
    }

    /// Raises `max_depth` to `depth` if it is larger than the current value.
    /// Returns `true` the first time a given depth is reached, so the caller
    /// knows whether to take the (relatively expensive) shadow snapshot.
    pub fn raise_max_depth(&self, depth: u64) -> bool {
        let mut current = self.max_depth.load(Ordering::Relaxed);
        while depth > current {
            match self.max_depth.compare_exchange_weak(
                current,
                depth,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_max_depth_only_returns_true_on_a_new_high() {
        let counters = BoardCounters::zero();
        assert!(counters.raise_max_depth(3));
        assert!(!counters.raise_max_depth(3));
        assert!(!counters.raise_max_depth(1));
        assert!(counters.raise_max_depth(5));
        assert_eq!(counters.max_depth(), 5);
    }

    #[test]
    fn increments_are_independent_per_counter() {
        let counters = BoardCounters::zero();
        counters.increment_checked();
        counters.increment_checked();
        counters.increment_placed();
        counters.increment_solutions();

        assert_eq!(counters.checked_nodes(), 2);
        assert_eq!(counters.placed_nodes(), 1);
        assert_eq!(counters.solutions(), 1);
    }
}
