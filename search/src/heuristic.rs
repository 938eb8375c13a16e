//! Ranking strategies: interchangeable cost functions over the exploration
//! context.
//!
//! Each strategy computes an integer rank (lower = explored sooner) for the
//! state the VM is currently positioned on, reading thread liveness and the
//! scheduling history through [`StateSpace`]. The set is closed: a strategy
//! is selected exactly once per run from configuration, and strategies are
//! never composed.
//!
//! The only permitted side effect is on a strategy's own private history
//! (the global-switch-thread ring buffer), which makes rank sequences
//! replay-deterministic.

use std::collections::{BTreeSet, VecDeque};

use statewalk_vm::ThreadId;

use crate::config::{SearchConfig, StrategyKind};
use crate::contract::StateSpace;
use crate::ranked::WORST_RANK;

/// Rank ceiling for [`MostBlocked`]: kept strictly below [`WORST_RANK`] so a
/// fully runnable state still outranks a "boring" one.
pub const MOST_BLOCKED_CEILING: i64 = 1 << 30;

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Penalizes scheduling a thread that ran recently.
///
/// Sums, over a bounded trailing window of past scheduling decisions, a
/// weight for every decision that scheduled the same thread as the candidate
/// transition: `(window - n) * alive_thread_count`, where `n` counts
/// decisions back from the candidate's own (excluded) decision. Recent
/// repeats weigh most, so switching away from recently-run threads ranks
/// better. Zero when at most one thread is alive.
#[derive(Debug)]
pub struct Interleaving {
    history_limit: usize,
}

impl Interleaving {
    /// Create with the given trailing-window length.
    #[must_use]
    pub fn new(history_limit: usize) -> Self {
        Self { history_limit }
    }

    fn rank(&self, vm: &dyn StateSpace) -> i64 {
        let alive = vm.alive_thread_count();
        if alive <= 1 {
            return 0;
        }
        let Some(thread) = vm.last_scheduled_thread() else {
            return 0;
        };
        let history = vm.scheduling_history();
        // the final entry is the candidate's own decision; only past steps count
        let past = &history[..history.len().saturating_sub(1)];
        let alive = to_i64(alive);
        let mut rank: i64 = 0;
        for (back, choice) in past.iter().rev().take(self.history_limit).enumerate() {
            if choice.thread == thread {
                let weight = to_i64(self.history_limit - back);
                rank = rank.saturating_add(weight.saturating_mul(alive));
            }
        }
        rank
    }
}

/// Prefers branches with the fewest preemptions on their path.
///
/// Walks the scheduling-decision chain backward and counts one preemption
/// for every decision that chose a different thread while the previous
/// decision's thread was still runnable. Reaching the configured threshold
/// short-circuits to [`WORST_RANK`].
#[derive(Debug)]
pub struct MinimizePreemption {
    threshold: i64,
}

impl MinimizePreemption {
    /// Create with the given give-up threshold.
    #[must_use]
    pub fn new(threshold: i64) -> Self {
        Self { threshold }
    }

    fn rank(&self, vm: &dyn StateSpace) -> i64 {
        let history = vm.scheduling_history();
        let mut preemptions: i64 = 0;
        for pair in history.windows(2).rev() {
            let (earlier, later) = (&pair[0], &pair[1]);
            if later.thread != earlier.thread && later.was_runnable(earlier.thread) {
                preemptions += 1;
                if preemptions >= self.threshold {
                    return WORST_RANK;
                }
            }
        }
        preemptions
    }
}

/// Prefers states where the most threads are blocked.
///
/// Rank = `MOST_BLOCKED_CEILING - (alive - runnable)`: the more threads are
/// blocked, the lower (more urgent) the rank. Useful for steering toward
/// potential deadlocks.
#[derive(Debug)]
pub struct MostBlocked;

impl MostBlocked {
    fn rank(vm: &dyn StateSpace) -> i64 {
        let alive = to_i64(vm.alive_thread_count());
        let runnable = to_i64(vm.runnable_thread_count());
        MOST_BLOCKED_CEILING - (alive - runnable)
    }
}

/// Prefers transitions produced by threads with configured names.
#[derive(Debug)]
pub struct PreferThreads {
    preferred: BTreeSet<String>,
}

impl PreferThreads {
    /// Create with the preferred thread-name set.
    #[must_use]
    pub fn new(preferred: BTreeSet<String>) -> Self {
        Self { preferred }
    }

    fn rank(&self, vm: &dyn StateSpace) -> i64 {
        match vm.last_scheduled_thread_name() {
            Some(name) if self.preferred.contains(&name) => 0,
            _ => 1,
        }
    }
}

/// Penalizes repeats in a private ring buffer of recently scheduled threads.
///
/// Scores the candidate's thread against every matching buffer entry with
/// weight `(size - position) * alive_thread_count` (front = most recent),
/// then shifts the buffer and inserts the thread at the front. The buffer is
/// owned by the instance; a fresh run starts with an empty window.
#[derive(Debug)]
pub struct GlobalSwitchThread {
    buffer: VecDeque<ThreadId>,
    size: usize,
}

impl GlobalSwitchThread {
    /// Create with the given ring-buffer size.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(size),
            size,
        }
    }

    fn rank(&mut self, vm: &dyn StateSpace) -> i64 {
        let Some(thread) = vm.last_scheduled_thread() else {
            return 0;
        };
        let alive = to_i64(vm.alive_thread_count());
        let mut rank: i64 = 0;
        for (position, entry) in self.buffer.iter().enumerate() {
            if *entry == thread {
                let weight = to_i64(self.size - position);
                rank = rank.saturating_add(weight.saturating_mul(alive));
            }
        }
        if self.buffer.len() == self.size {
            self.buffer.pop_back();
        }
        self.buffer.push_front(thread);
        rank
    }
}

/// Rank chosen by the target program itself through the VM's escape hatch.
#[derive(Debug)]
pub struct UserDirected;

impl UserDirected {
    fn rank(vm: &dyn StateSpace) -> i64 {
        vm.user_heuristic_value()
    }
}

/// The closed set of ranking strategies, selected once per run.
#[derive(Debug)]
pub enum Heuristic {
    Interleaving(Interleaving),
    MinimizePreemption(MinimizePreemption),
    MostBlocked(MostBlocked),
    PreferThreads(PreferThreads),
    GlobalSwitchThread(GlobalSwitchThread),
    UserDirected(UserDirected),
}

impl Heuristic {
    /// Build the configured strategy with its owned state.
    #[must_use]
    pub fn from_config(config: &SearchConfig) -> Self {
        match config.strategy {
            StrategyKind::Interleaving => {
                Self::Interleaving(Interleaving::new(config.thread_history_limit))
            }
            StrategyKind::MinimizePreemption => {
                Self::MinimizePreemption(MinimizePreemption::new(config.preemption_threshold))
            }
            StrategyKind::MostBlocked => Self::MostBlocked(MostBlocked),
            StrategyKind::PreferThreads => {
                Self::PreferThreads(PreferThreads::new(config.preferred_threads.clone()))
            }
            StrategyKind::GlobalSwitchThread => {
                Self::GlobalSwitchThread(GlobalSwitchThread::new(config.thread_history_size))
            }
            StrategyKind::UserDirected => Self::UserDirected(UserDirected),
        }
    }

    /// Compute the rank of the state the VM is currently positioned on.
    ///
    /// Invoked once per newly discovered child, before any further stepping
    /// of that child.
    pub fn rank(&mut self, vm: &dyn StateSpace) -> i64 {
        match self {
            Self::Interleaving(h) => h.rank(vm),
            Self::MinimizePreemption(h) => h.rank(vm),
            Self::MostBlocked(_) => MostBlocked::rank(vm),
            Self::PreferThreads(h) => h.rank(vm),
            Self::GlobalSwitchThread(h) => h.rank(vm),
            Self::UserDirected(_) => UserDirected::rank(vm),
        }
    }

    /// Strategy name, for logs and reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Interleaving(_) => "interleaving",
            Self::MinimizePreemption(_) => "minimize_preemption",
            Self::MostBlocked(_) => "most_blocked",
            Self::PreferThreads(_) => "prefer_threads",
            Self::GlobalSwitchThread(_) => "global_switch_thread",
            Self::UserDirected(_) => "user",
        }
    }
}
