//! Observer protocol for exploration events.
//!
//! Listeners are notified synchronously, fire-and-forget, in registration
//! order. Every notification carries a [`SearchView`]: a read-only snapshot
//! of the driver's position plus a cooperative termination control. The
//! notification sequence is fully determined by the choice enumeration order
//! and the queue's total order — there is no nondeterministic interleaving
//! for an observer to reason about.

use std::cell::Cell;
use std::fmt;

use statewalk_vm::{PropertyViolation, StateId};

/// A search resource constraint the driver ran into.
///
/// Constraint hits are recoverable: the affected branch is not queued and
/// exploration continues elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchConstraint {
    /// A new state lies beyond the configured depth limit.
    DepthLimit { limit: u32 },
    /// The pending-state queue is at capacity.
    QueueLimit { size: usize },
}

impl fmt::Display for SearchConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DepthLimit { limit } => write!(f, "depth limit reached: {limit}"),
            Self::QueueLimit { size } => write!(f, "queue limit reached: {size}"),
        }
    }
}

/// Read-only view of the driver handed to every notification.
#[derive(Debug)]
pub struct SearchView<'a> {
    /// Identifier of the state the VM is positioned on.
    pub state_id: StateId,
    /// Current depth in the search tree.
    pub depth: u32,
    /// Whether the current state was first reached by the last step.
    pub is_new_state: bool,
    /// Whether the current state has no successors.
    pub is_end_state: bool,
    /// Number of pending states in the queue.
    pub queue_len: usize,
    /// The violation recorded for the last transition, if any.
    pub error: Option<&'a PropertyViolation>,
    done: &'a Cell<bool>,
}

impl<'a> SearchView<'a> {
    pub(crate) fn new(
        state_id: StateId,
        depth: u32,
        is_new_state: bool,
        is_end_state: bool,
        queue_len: usize,
        error: Option<&'a PropertyViolation>,
        done: &'a Cell<bool>,
    ) -> Self {
        Self {
            state_id,
            depth,
            is_new_state,
            is_end_state,
            queue_len,
            error,
            done,
        }
    }

    /// Request cooperative termination: the driver finishes its in-flight
    /// step cleanly and exits without selecting another state.
    pub fn terminate(&self) {
        self.done.set(true);
    }
}

/// Notifications emitted by the search driver.
///
/// All methods default to no-ops, so a listener implements only what it
/// observes.
pub trait SearchListener {
    /// The driver entered its exploration loop.
    fn search_started(&mut self, _view: &SearchView<'_>) {}

    /// One unexplored choice was advanced, reaching a child state.
    fn state_advanced(&mut self, _view: &SearchView<'_>) {}

    /// Every outgoing choice of the current state has been explored.
    fn state_processed(&mut self, _view: &SearchView<'_>) {}

    /// A ranked child was handed to the pending-state queue.
    ///
    /// Fired for every ranked child, whether or not the queue kept it —
    /// observers see "discovered and offered", not "retained".
    fn state_stored(&mut self, _view: &SearchView<'_>) {}

    /// A pending state was selected and its snapshot restored.
    fn state_restored(&mut self, _view: &SearchView<'_>) {}

    /// The driver stepped back to the state it is expanding.
    fn state_backtracked(&mut self, _view: &SearchView<'_>) {}

    /// The last transition violated a monitored property.
    fn property_violated(&mut self, _view: &SearchView<'_>) {}

    /// A resource constraint kept a branch from being queued.
    fn search_constraint_hit(&mut self, _view: &SearchView<'_>, _constraint: &SearchConstraint) {}

    /// Exploration is over; no further notifications follow.
    fn search_finished(&mut self, _view: &SearchView<'_>) {}
}
