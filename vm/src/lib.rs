//! Statewalk VM model: value types shared between the exploration engine and
//! the execution collaborator.
//!
//! This crate carries no behavior beyond construction and accessors. The
//! virtual machine that actually executes the target program lives behind the
//! `StateSpace` trait in `statewalk-search`; everything here is the data that
//! crosses that seam.
//!
//! # Module Dependency Direction
//!
//! `statewalk-vm` ← `statewalk-search` ← `statewalk-harness`
//!
//! One-way only. This crate depends on nothing internal or external.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod state;
pub mod thread;
pub mod violation;

pub use state::{Snapshot, StateId};
pub use thread::{SchedulingChoice, ThreadId};
pub use violation::PropertyViolation;
