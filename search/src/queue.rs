//! Capacity-bounded priority store for pending states.
//!
//! Backed by a `BTreeSet` so both the best member (min) and the eviction
//! candidate (max) are O(log n), and iteration order is deterministic.

use std::collections::BTreeSet;

use crate::ranked::RankedState;

/// An ordered set of pending states capped at a fixed capacity.
///
/// Invariant: `len() <= capacity()` before and after every operation.
/// For a fixed sequence of [`try_add`](Self::try_add) calls, the contents and
/// every subsequent [`take_best`](Self::take_best) are fully determined by
/// the `(rank, id)` pairs — there is no insertion-order or wall-clock
/// tie-breaking.
#[derive(Debug)]
pub struct PriorityStateQueue {
    states: BTreeSet<RankedState>,
    capacity: usize,
}

impl PriorityStateQueue {
    /// Create an empty queue with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; configuration maps "unbounded" to
    /// `usize::MAX` and rejects zero before a queue is built.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "queue capacity must be at least 1");
        Self {
            states: BTreeSet::new(),
            capacity,
        }
    }

    /// Attempt to admit a pending state.
    ///
    /// Below capacity the state is inserted unconditionally. At capacity the
    /// state must be strictly better than the current worst member, which is
    /// then evicted; otherwise the queue is unchanged and `false` is
    /// returned. Two states equal under the `(rank, id)` order collapse to a
    /// single member.
    pub fn try_add(&mut self, state: RankedState) -> bool {
        if self.states.len() < self.capacity {
            self.states.insert(state);
            return true;
        }
        let Some(worst) = self.states.last() else {
            // capacity >= 1 and len >= capacity, so the set is non-empty
            unreachable!("full queue has a worst member");
        };
        if state < *worst {
            self.states.pop_last();
            self.states.insert(state);
            true
        } else {
            false
        }
    }

    /// The most urgent pending state, without removing it.
    #[must_use]
    pub fn peek_best(&self) -> Option<RankedState> {
        self.states.first().cloned()
    }

    /// Remove and return the most urgent pending state.
    pub fn take_best(&mut self) -> Option<RankedState> {
        self.states.pop_first()
    }

    /// Discard every pending state.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Number of pending states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the next admission will have to evict or reject.
    #[must_use]
    pub fn is_at_limit(&self) -> bool {
        self.states.len() >= self.capacity
    }
}
