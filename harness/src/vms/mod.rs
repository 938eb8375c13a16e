//! Scripted state-space implementations for the harness runner.

pub mod script;
