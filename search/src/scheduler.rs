//! Binds a ranking strategy to the bounded pending-state queue.

use crate::config::SearchConfig;
use crate::contract::StateSpace;
use crate::heuristic::Heuristic;
use crate::queue::PriorityStateQueue;
use crate::ranked::{RankedState, BEST_RANK, WORST_RANK};

/// Classifies, ranks, and admits newly discovered states, and selects the
/// next state to resume from.
///
/// Strategy, queue capacity, A* mode, and beam mode are all fixed at
/// construction; the driver only feeds states in and pulls the next one out.
#[derive(Debug)]
pub struct HeuristicScheduler {
    heuristic: Heuristic,
    queue: PriorityStateQueue,
    use_astar: bool,
    beam_search: bool,
}

impl HeuristicScheduler {
    /// Build from a validated configuration.
    #[must_use]
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            heuristic: Heuristic::from_config(config),
            queue: PriorityStateQueue::new(config.queue_limit),
            use_astar: config.use_astar,
            beam_search: config.beam_search,
        }
    }

    /// Rank the state the VM is positioned on and offer it to the queue.
    ///
    /// States the VM flags "interesting" are forced best, "boring" forced
    /// worst; everything else gets the strategy rank, plus the path length
    /// when the A* adaptation is enabled.
    ///
    /// The ranked state is returned whether or not the queue admitted it:
    /// admission only decides whether the state can ever be resumed, not
    /// whether the caller reports it as discovered.
    pub fn queue_current_state(&mut self, vm: &mut dyn StateSpace) -> Option<RankedState> {
        let rank = if vm.is_interesting_state() {
            BEST_RANK
        } else if vm.is_boring_state() {
            WORST_RANK
        } else {
            let rank = self.heuristic.rank(vm);
            if self.use_astar {
                rank.saturating_add(i64::from(vm.path_length()))
            } else {
                rank
            }
        };

        let ranked = RankedState::new(vm.state_id(), vm.snapshot(), rank);
        self.queue.try_add(ranked.clone());
        Some(ranked)
    }

    /// Select the next state to resume from, or `None` when nothing is
    /// pending.
    ///
    /// Beam mode discards *all* remaining pending states, not just the
    /// selected one: each expansion round starts from a clean slate populated
    /// only by that round's children. Plain mode removes exactly the best.
    pub fn next_queued_state(&mut self) -> Option<RankedState> {
        let best = self.queue.peek_best()?;
        if self.beam_search {
            self.queue.clear();
        } else {
            let _ = self.queue.take_best();
        }
        Some(best)
    }

    /// Number of pending states.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the next admission will have to evict or reject.
    #[must_use]
    pub fn is_queue_limit_reached(&self) -> bool {
        self.queue.is_at_limit()
    }

    /// Name of the bound strategy, for logs and reports.
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.heuristic.name()
    }
}
