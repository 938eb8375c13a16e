//! Search statistics listener.
//!
//! Counts every notification kind and tracks high-water marks. The counters
//! live behind a shared handle so the runner can read them after the driver
//! (which owns the boxed listener) has run. `Rc<RefCell>` is sound here: the
//! engine is single-threaded and synchronous, and every notification runs to
//! completion before the next.

use std::cell::RefCell;
use std::rc::Rc;

use statewalk_search::{SearchConstraint, SearchListener, SearchView};

/// Counter snapshot of one exploration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsCounters {
    /// States reached for the first time.
    pub new_states: u64,
    /// Transitions into already visited states.
    pub revisited_states: u64,
    /// New states that were end states.
    pub end_states: u64,
    /// Ranked children offered to the queue (admitted or not).
    pub stored_states: u64,
    /// States whose choices were fully enumerated.
    pub processed_states: u64,
    /// Pending states selected and restored.
    pub restored_states: u64,
    /// Single-level backtracks.
    pub backtracks: u64,
    /// Property violations observed.
    pub violations: u64,
    /// Resource-constraint hits (depth or queue).
    pub constraints_hit: u64,
    /// Deepest point reached in the search tree.
    pub max_depth: u32,
    /// Queue high-water mark.
    pub max_queue_len: usize,
}

/// Read handle onto a [`SearchStats`] listener's counters.
#[derive(Debug, Clone)]
pub struct StatsHandle {
    counters: Rc<RefCell<StatsCounters>>,
}

impl StatsHandle {
    /// Copy out the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> StatsCounters {
        self.counters.borrow().clone()
    }
}

/// Listener that accumulates [`StatsCounters`].
#[derive(Debug, Default)]
pub struct SearchStats {
    counters: Rc<RefCell<StatsCounters>>,
}

impl SearchStats {
    /// Create a listener with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for reading the counters after the run.
    #[must_use]
    pub fn handle(&self) -> StatsHandle {
        StatsHandle {
            counters: Rc::clone(&self.counters),
        }
    }
}

impl SearchListener for SearchStats {
    fn state_advanced(&mut self, view: &SearchView<'_>) {
        let mut counters = self.counters.borrow_mut();
        if view.is_new_state {
            counters.new_states += 1;
            if view.is_end_state {
                counters.end_states += 1;
            }
            if view.depth > counters.max_depth {
                counters.max_depth = view.depth;
            }
        } else {
            counters.revisited_states += 1;
        }
    }

    fn state_processed(&mut self, _view: &SearchView<'_>) {
        self.counters.borrow_mut().processed_states += 1;
    }

    fn state_stored(&mut self, view: &SearchView<'_>) {
        let mut counters = self.counters.borrow_mut();
        counters.stored_states += 1;
        if view.queue_len > counters.max_queue_len {
            counters.max_queue_len = view.queue_len;
        }
    }

    fn state_restored(&mut self, _view: &SearchView<'_>) {
        self.counters.borrow_mut().restored_states += 1;
    }

    fn state_backtracked(&mut self, _view: &SearchView<'_>) {
        self.counters.borrow_mut().backtracks += 1;
    }

    fn property_violated(&mut self, _view: &SearchView<'_>) {
        self.counters.borrow_mut().violations += 1;
    }

    fn search_constraint_hit(&mut self, _view: &SearchView<'_>, _constraint: &SearchConstraint) {
        self.counters.borrow_mut().constraints_hit += 1;
    }
}
