//! State space contract trait.

use statewalk_vm::{PropertyViolation, SchedulingChoice, Snapshot, StateId, ThreadId};

/// Trait for virtual machines whose state space the engine explores.
///
/// The VM owns program execution, state matching, snapshots, and property
/// checking; the engine only steers. All methods run to completion before the
/// engine proceeds — there is no host-level concurrency at this seam.
///
/// # Contract
///
/// - `forward` advances exactly one previously unexplored choice from the
///   current state; once it returns `false` the current state is exhausted.
/// - `backtrack` undoes exactly one `forward`. Multi-level backtracking is
///   never requested; the engine revisits distant states only through
///   `snapshot`/`restore`.
/// - `state_id` values are assigned when a state is first reached:
///   monotonically increasing, never reused within a run.
/// - The `is_*` predicates are pure queries of the current state; calling
///   them repeatedly between steps must return the same answers.
/// - `scheduling_history` is chronological; its last entry is the decision
///   that produced the current state.
pub trait StateSpace {
    /// Advance one unexplored choice from the current state.
    ///
    /// Returns `false` when every outgoing choice has been explored.
    fn forward(&mut self) -> bool;

    /// Undo the last `forward`, returning to the parent state.
    fn backtrack(&mut self) -> bool;

    /// Capture a resume capability for the current state.
    fn snapshot(&mut self) -> Snapshot;

    /// Resume execution from a previously captured state.
    ///
    /// The snapshot is consumed; the engine does not retain it.
    fn restore(&mut self, snapshot: Snapshot);

    /// Identifier of the current state.
    fn state_id(&self) -> StateId;

    /// Number of steps on the path from the initial state to the current one.
    fn path_length(&self) -> u32;

    /// Whether the current state was first reached by the last `forward`.
    fn is_new_state(&self) -> bool;

    /// Whether the current state has no successors by definition.
    fn is_end_state(&self) -> bool;

    /// Whether the current state is excluded from exploration.
    fn is_ignored_state(&self) -> bool;

    /// Whether the VM flags the current state as unconditionally urgent.
    fn is_interesting_state(&self) -> bool;

    /// Whether the VM flags the current state as last-resort only.
    fn is_boring_state(&self) -> bool;

    /// The monitored property violated by the last transition, if any.
    fn violated_property(&self) -> Option<PropertyViolation>;

    /// Count of live target-program threads.
    fn alive_thread_count(&self) -> usize;

    /// Count of threads currently schedulable (not blocked or waiting,
    /// accounting for timeouts).
    fn runnable_thread_count(&self) -> usize;

    /// The thread scheduled by the last transition.
    fn last_scheduled_thread(&self) -> Option<ThreadId>;

    /// Name of the thread scheduled by the last transition.
    fn last_scheduled_thread_name(&self) -> Option<String>;

    /// Thread-scheduling decisions on the path to the current state,
    /// chronological order.
    fn scheduling_history(&self) -> &[SchedulingChoice];

    /// Rank most recently published by the target program through the
    /// user-heuristic escape hatch. 0 if the program never set one.
    fn user_heuristic_value(&self) -> i64;
}
