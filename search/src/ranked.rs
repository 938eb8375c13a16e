//! Ranked pending states and the rank conventions.

use statewalk_vm::{Snapshot, StateId};

/// Maximal urgency: explore before anything strategy-ranked.
pub const BEST_RANK: i64 = 0;

/// Minimal urgency: never pick unless nothing else remains.
pub const WORST_RANK: i64 = i64::MAX;

/// A pending state awaiting resumption: identifier, resume capability, and
/// heuristic rank. Lower rank means more urgent.
///
/// Immutable once constructed. Ordering and equality use `(rank, id)` only —
/// the snapshot never participates, so the queue's selection order is fully
/// determined by the pairs the ranking produced.
#[derive(Debug, Clone)]
pub struct RankedState {
    id: StateId,
    snapshot: Snapshot,
    rank: i64,
}

impl RankedState {
    /// Construct a ranked pending state.
    #[must_use]
    pub fn new(id: StateId, snapshot: Snapshot, rank: i64) -> Self {
        Self { id, snapshot, rank }
    }

    /// The state identifier.
    #[must_use]
    pub fn id(&self) -> StateId {
        self.id
    }

    /// The heuristic rank (lower = more urgent).
    #[must_use]
    pub fn rank(&self) -> i64 {
        self.rank
    }

    /// Release the resume capability, consuming the pending state.
    #[must_use]
    pub fn into_snapshot(self) -> Snapshot {
        self.snapshot
    }
}

impl PartialEq for RankedState {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.id == other.id
    }
}

impl Eq for RankedState {}

impl PartialOrd for RankedState {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedState {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank.cmp(&other.rank).then(self.id.cmp(&other.id))
    }
}
