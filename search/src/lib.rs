//! Statewalk Search: heuristic-guided, memory-bounded best-first exploration
//! of a target program's state space.
//!
//! The engine expands all immediate successors of the current state, ranks
//! each newly discovered child with a configurable heuristic, holds the
//! ranked children in a capacity-bounded priority queue, and always resumes
//! from the best-ranked pending state — teleporting there via the VM's
//! snapshot/restore primitive, possibly far away from the current position in
//! the search tree.
//!
//! # Crate dependency graph
//!
//! ```text
//! statewalk-vm  ←  statewalk-search  ←  statewalk-harness
//! (model types)    (queue, heuristics,  (scripted VMs, stats,
//!                   driver, listeners)   runner, report)
//! ```
//!
//! # Key types
//!
//! - [`StateSpace`] — trait for the external VM that executes the program
//! - [`RankedState`] — immutable (id, snapshot, rank) triple
//! - [`PriorityStateQueue`] — capacity-bounded priority store with eviction
//! - [`Heuristic`] — closed set of interchangeable ranking strategies
//! - [`HeuristicScheduler`] — binds a heuristic to the queue
//! - [`HeuristicSearch`] — the top-level expand/select/restore loop
//! - [`SearchListener`] — observer protocol for exploration events

#![forbid(unsafe_code)]

pub mod config;
pub mod contract;
pub mod error;
pub mod heuristic;
pub mod listener;
pub mod queue;
pub mod ranked;
pub mod scheduler;
pub mod search;

pub use config::{Properties, SearchConfig, StrategyKind};
pub use contract::StateSpace;
pub use error::ConfigError;
pub use heuristic::Heuristic;
pub use listener::{SearchConstraint, SearchListener, SearchView};
pub use queue::PriorityStateQueue;
pub use ranked::{RankedState, BEST_RANK, WORST_RANK};
pub use scheduler::HeuristicScheduler;
pub use search::HeuristicSearch;
