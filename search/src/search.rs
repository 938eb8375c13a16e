//! Search driver: the expand/select/restore loop.
//!
//! The driver computes all immediate successors of the current state, offers
//! each eligible child to the scheduler, then resumes from the best-ranked
//! pending state wherever it was discovered — the queue is search-global, so
//! consecutive rounds may hop between search levels.
//!
//! Backtracking is strictly single-level: after each child the driver steps
//! back to the state it is expanding, and distant states are reached only by
//! restoring their snapshots. [`HeuristicSearch::supports_backtrack`]
//! advertises this to embedders.

use std::cell::Cell;

use tracing::{debug, info, warn};

use statewalk_vm::{PropertyViolation, StateId};

use crate::config::SearchConfig;
use crate::contract::StateSpace;
use crate::listener::{SearchConstraint, SearchListener, SearchView};
use crate::ranked::RankedState;
use crate::scheduler::HeuristicScheduler;

/// The top-level exploration loop.
///
/// Drives a [`StateSpace`] with a [`HeuristicScheduler`] and notifies
/// registered [`SearchListener`]s of every event. One instance runs one
/// exploration; construction-time configuration is immutable for the run.
pub struct HeuristicSearch<'a> {
    vm: &'a mut dyn StateSpace,
    scheduler: HeuristicScheduler,
    listeners: Vec<Box<dyn SearchListener>>,
    depth: u32,
    depth_limit: u32,
    path_sensitive: bool,
    multiple_errors: bool,
    done: Cell<bool>,
    current_error: Option<PropertyViolation>,
    errors: Vec<PropertyViolation>,
    last_constraint: Option<SearchConstraint>,
    child_states: Vec<RankedState>,
    parent_id: Option<StateId>,
}

impl<'a> HeuristicSearch<'a> {
    /// Create a driver for one exploration run.
    pub fn new(config: &SearchConfig, vm: &'a mut dyn StateSpace) -> Self {
        Self {
            vm,
            scheduler: HeuristicScheduler::from_config(config),
            listeners: Vec::new(),
            depth: 0,
            depth_limit: config.depth_limit,
            path_sensitive: config.path_sensitive,
            multiple_errors: config.multiple_errors,
            done: Cell::new(false),
            current_error: None,
            errors: Vec::new(),
            last_constraint: None,
            child_states: Vec::new(),
            parent_id: None,
        }
    }

    /// Register a listener; notification order follows registration order.
    pub fn add_listener(&mut self, listener: Box<dyn SearchListener>) {
        debug!(count = self.listeners.len() + 1, "search listener added");
        self.listeners.push(listener);
    }

    /// Treat every child as eligible for queueing, visited or not.
    pub fn set_path_sensitive(&mut self, path_sensitive: bool) {
        self.path_sensitive = path_sensitive;
    }

    /// Request cooperative termination. Checked once per successor; the
    /// in-flight step finishes cleanly before the loop exits.
    pub fn terminate(&self) {
        self.done.set(true);
    }

    /// Whether the exploration loop has finished or been asked to stop.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done.get()
    }

    /// Current depth in the search tree.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Identifier of the state whose children are being expanded.
    #[must_use]
    pub fn parent_state_id(&self) -> Option<StateId> {
        self.parent_id
    }

    /// The ranked children discovered in the current expansion round.
    #[must_use]
    pub fn child_states(&self) -> &[RankedState] {
        &self.child_states
    }

    /// Every property violation recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[PropertyViolation] {
        &self.errors
    }

    /// The most recent resource constraint hit, if any.
    #[must_use]
    pub fn last_search_constraint(&self) -> Option<&SearchConstraint> {
        self.last_constraint.as_ref()
    }

    /// Multi-level backtracking is not supported: the driver undoes exactly
    /// one step per child and teleports everywhere else via restore.
    #[must_use]
    pub fn supports_backtrack(&self) -> bool {
        false
    }

    /// Run the exploration to completion.
    ///
    /// Always emits the search-started and search-finished notifications,
    /// even when a pre-flagged violation ends the run before any stepping.
    pub fn run(&mut self) {
        debug!(
            strategy = self.scheduler.strategy_name(),
            "starting heuristic search"
        );

        if self.scheduler.queue_current_state(self.vm).is_some() {
            self.notify(|l, v| l.state_stored(v));
        }
        // the seed is the queue's only member; select it without a restore
        self.parent_id = self.scheduler.next_queued_state().map(|s| s.id());

        self.done.set(false);
        self.notify(|l, v| l.search_started(v));

        // a violation flagged before any stepping ends the run immediately
        self.current_error = self.vm.violated_property();
        if let Some(error) = self.current_error.clone() {
            self.record_error(error);
        }

        if !self.has_property_termination() {
            self.generate_children();

            while !self.done.get() {
                let Some(next) = self.scheduler.next_queued_state() else {
                    break;
                };
                self.restore_state(next);
                self.generate_children();
            }
        }

        self.notify(|l, v| l.search_finished(v));
        info!(errors = self.errors.len(), "heuristic search finished");
    }

    /// Expand all outgoing choices of the current state, one at a time.
    ///
    /// Returns `true` when the state was fully processed, `false` when the
    /// round was cut short by a property termination or an explicit
    /// termination request.
    fn generate_children(&mut self) -> bool {
        self.child_states.clear();

        while !self.done.get() {
            if !self.forward() {
                self.notify(|l, v| l.state_processed(v));
                return true;
            }

            self.depth += 1;
            self.notify(|l, v| l.state_advanced(v));

            if self.current_error.is_some() {
                self.notify(|l, v| l.property_violated(v));
                if self.has_property_termination() {
                    return false;
                }
                // error children are terminal by policy: never queued, so the
                // same error state may be met again along other paths
            } else if !self.vm.is_end_state() && !self.vm.is_ignored_state() {
                let is_new = self.vm.is_new_state();

                if is_new && self.depth >= self.depth_limit {
                    // reported only once the child actually exists, so parents
                    // with only visited or end children stay quiet
                    self.hit_constraint(SearchConstraint::DepthLimit {
                        limit: self.depth_limit,
                    });
                } else if is_new || self.path_sensitive {
                    if self.scheduler.is_queue_limit_reached() {
                        self.hit_constraint(SearchConstraint::QueueLimit {
                            size: self.scheduler.queue_len(),
                        });
                    }

                    if let Some(child) = self.scheduler.queue_current_state(self.vm) {
                        self.child_states.push(child);
                        self.notify(|l, v| l.state_stored(v));
                    }
                }
            }

            self.backtrack_to_parent();
        }

        false
    }

    /// Advance one unexplored choice and record any violation it causes.
    fn forward(&mut self) -> bool {
        self.current_error = None;
        let advanced = self.vm.forward();
        if advanced {
            self.current_error = self.vm.violated_property();
            if let Some(error) = self.current_error.clone() {
                self.record_error(error);
            }
        }
        advanced
    }

    fn backtrack_to_parent(&mut self) {
        self.vm.backtrack();
        self.depth = self.depth.saturating_sub(1);
        self.notify(|l, v| l.state_backtracked(v));
    }

    fn restore_state(&mut self, state: RankedState) {
        let id = state.id();
        self.vm.restore(state.into_snapshot());
        // the state comes from the queue; only the VM knows how deep it is
        self.depth = self.vm.path_length();
        self.parent_id = Some(id);
        self.notify(|l, v| l.state_restored(v));
    }

    fn record_error(&mut self, error: PropertyViolation) {
        warn!(%error, "property violated");
        self.errors.push(error);
        if !self.multiple_errors {
            self.done.set(true);
        }
    }

    fn has_property_termination(&self) -> bool {
        self.current_error.is_some() && self.done.get()
    }

    fn hit_constraint(&mut self, constraint: SearchConstraint) {
        info!(%constraint, "search constraint hit");
        self.last_constraint = Some(constraint.clone());
        self.notify(move |l, v| l.search_constraint_hit(v, &constraint));
    }

    fn notify(&mut self, event: impl Fn(&mut dyn SearchListener, &SearchView<'_>)) {
        let view = SearchView::new(
            self.vm.state_id(),
            self.depth,
            self.vm.is_new_state(),
            self.vm.is_end_state(),
            self.scheduler.queue_len(),
            self.current_error.as_ref(),
            &self.done,
        );
        for listener in &mut self.listeners {
            event(listener.as_mut(), &view);
        }
    }
}
