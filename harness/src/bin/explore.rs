//! Demo driver: runs a built-in two-thread contention model through the
//! exploration engine and prints the run report as JSON.
//!
//! Usage: `explore [properties-file]`
//!
//! The properties file uses `key=value` lines (`search.heuristic.strategy`,
//! `search.heuristic.queue_limit`, ...). Without one, the demo runs the
//! most-blocked strategy with defaults. Log verbosity follows `RUST_LOG`.

use statewalk_harness::runner::run_search;
use statewalk_harness::vms::script::{ScriptedSpace, ScriptedState};
use statewalk_search::Properties;

/// Two threads racing into a critical section: one interleaving ends in a
/// deadlock-shaped state (everyone blocked), the others run to completion.
fn demo_space() -> ScriptedSpace {
    let mut space = ScriptedSpace::new(ScriptedState::threads(2, 2));

    // T0 takes the lock first; T1 eventually blocks on it
    let t0_first = space.add_child(0, ScriptedState::threads(2, 2).chosen(0, &[0, 1]));
    let t1_blocked = space.add_child(t0_first, ScriptedState::threads(2, 1).chosen(1, &[0, 1]));
    space.add_child(
        t1_blocked,
        ScriptedState::threads(1, 1).chosen(0, &[0]).end(),
    );

    // T1 runs first and both grab their locks in opposite order
    let t1_first = space.add_child(0, ScriptedState::threads(2, 2).chosen(1, &[0, 1]));
    let cross = space.add_child(t1_first, ScriptedState::threads(2, 1).chosen(0, &[0, 1]));
    space.add_child(
        cross,
        ScriptedState::threads(2, 0)
            .chosen(1, &[1])
            .violating("no_deadlock", "both threads blocked on each other's lock"),
    );

    space
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let props = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).expect("read properties file");
            Properties::parse(&text)
        }
        None => Properties::new(),
    };

    let mut space = demo_space();
    let report = run_search(&props, &mut space, Vec::new()).expect("search configuration");

    let json = serde_json::to_string_pretty(&report.to_json()).expect("render report");
    println!("{json}");
}
