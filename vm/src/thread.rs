//! Target-program thread identity and scheduling decisions.
//!
//! "Threads" here are data describing the program under exploration; the
//! engine itself is single-threaded.

use std::fmt;

/// Identifier of a target-program thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadId(u32);

impl ThreadId {
    /// Construct from the raw id value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw id value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// One thread-scheduling decision on the path to a state.
///
/// Records which thread was chosen and which threads were runnable when the
/// decision was taken, so that ranking strategies can detect preemptions by
/// walking the decision chain without re-querying the VM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingChoice {
    /// The thread that was scheduled.
    pub thread: ThreadId,
    /// All threads that were runnable at the decision point.
    pub runnable: Vec<ThreadId>,
}

impl SchedulingChoice {
    /// Construct a decision record.
    #[must_use]
    pub fn new(thread: ThreadId, runnable: Vec<ThreadId>) -> Self {
        Self { thread, runnable }
    }

    /// Whether `thread` was runnable at this decision point.
    #[must_use]
    pub fn was_runnable(&self, thread: ThreadId) -> bool {
        self.runnable.contains(&thread)
    }
}
