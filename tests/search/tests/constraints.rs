//! Recoverable-outcome behavior: depth constraints, violation policy, and
//! cooperative termination.

use search_tests::{Event, RecordingListener};
use statewalk_harness::runner::run_search;
use statewalk_harness::vms::script::{ScriptedSpace, ScriptedState};
use statewalk_search::{Properties, SearchListener, SearchView};
use statewalk_vm::StateId;

fn user_props() -> Properties {
    let mut props = Properties::new();
    props.set("search.heuristic.strategy", "user");
    props
}

#[test]
fn over_limit_children_are_reported_not_queued() {
    let mut space = ScriptedSpace::new(ScriptedState::default());
    space.add_child(0, ScriptedState::default());

    let mut props = user_props();
    props.set("search.depth_limit", "1");

    let listener = RecordingListener::new();
    let log = listener.log();
    let report = run_search(&props, &mut space, vec![Box::new(listener)]).unwrap();

    assert_eq!(
        log.constraint_messages(),
        vec!["depth limit reached: 1".to_string()]
    );
    assert_eq!(
        log.stored_ids(),
        vec![StateId::new(0)],
        "only the seed is stored"
    );
    assert!(log.restored_ids().is_empty());
    assert_eq!(report.last_constraint.as_deref(), Some("depth limit reached: 1"));
}

#[test]
fn first_violation_halts_by_default() {
    let mut space = ScriptedSpace::new(ScriptedState::default());
    space.add_child(
        0,
        ScriptedState::default().violating("no_assert_failure", "s == trip"),
    );
    space.add_child(0, ScriptedState::default());

    let listener = RecordingListener::new();
    let log = listener.log();
    let report = run_search(&user_props(), &mut space, vec![Box::new(listener)]).unwrap();

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].property, "no_assert_failure");
    assert_eq!(log.advanced_ids(), vec![StateId::new(1)]);

    let events = log.events();
    assert_eq!(
        events.last(),
        Some(&Event::Finished),
        "search-finished is emitted even on a halting violation"
    );
    assert!(
        !events.iter().any(|e| matches!(e, Event::Backtracked { .. })),
        "the halting branch is left in place for reporting"
    );
}

#[test]
fn multiple_errors_mode_records_and_continues() {
    let mut space = ScriptedSpace::new(ScriptedState::default());
    space.add_child(
        0,
        ScriptedState::default().violating("no_assert_failure", "first path"),
    );
    space.add_child(
        0,
        ScriptedState::default().violating("no_assert_failure", "second path"),
    );
    space.add_child(0, ScriptedState::default());

    let mut props = user_props();
    props.set("search.multiple_errors", "true");

    let listener = RecordingListener::new();
    let log = listener.log();
    let report = run_search(&props, &mut space, vec![Box::new(listener)]).unwrap();

    assert_eq!(report.errors.len(), 2, "every violation is recorded");
    assert_eq!(
        log.advanced_ids(),
        vec![StateId::new(1), StateId::new(2), StateId::new(3)],
        "violating branches do not stop sibling expansion"
    );
    // error children are dead ends: only the healthy child is stored/resumed
    assert_eq!(log.stored_ids(), vec![StateId::new(0), StateId::new(3)]);
    assert_eq!(log.restored_ids(), vec![StateId::new(3)]);
}

#[test]
fn visited_children_requeue_only_in_path_sensitive_mode() {
    let build = || {
        let mut space = ScriptedSpace::new(ScriptedState::default());
        space.add_child(0, ScriptedState::default().visited());
        space
    };

    let listener = RecordingListener::new();
    let log = listener.log();
    run_search(&user_props(), &mut build(), vec![Box::new(listener)]).unwrap();
    assert_eq!(log.stored_ids(), vec![StateId::new(0)]);

    let mut props = user_props();
    props.set("search.heuristic.path_sensitive", "true");
    let listener = RecordingListener::new();
    let log = listener.log();
    run_search(&props, &mut build(), vec![Box::new(listener)]).unwrap();
    assert_eq!(log.stored_ids(), vec![StateId::new(0), StateId::new(1)]);
}

/// Requests termination after a fixed number of advances.
struct StopAfterAdvances {
    remaining: usize,
}

impl SearchListener for StopAfterAdvances {
    fn state_advanced(&mut self, view: &SearchView<'_>) {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            view.terminate();
        }
    }
}

#[test]
fn termination_finishes_the_in_flight_child_cleanly() {
    let mut space = ScriptedSpace::new(ScriptedState::default());
    space.add_child(0, ScriptedState::default());
    space.add_child(0, ScriptedState::default());
    space.add_child(0, ScriptedState::default());

    let listener = RecordingListener::new();
    let log = listener.log();
    run_search(
        &user_props(),
        &mut space,
        vec![
            Box::new(listener),
            Box::new(StopAfterAdvances { remaining: 1 }),
        ],
    )
    .unwrap();

    // the first child is still queued and backtracked before the loop exits
    assert_eq!(log.advanced_ids(), vec![StateId::new(1)]);
    assert_eq!(log.stored_ids(), vec![StateId::new(0), StateId::new(1)]);
    assert_eq!(
        log.events()
            .iter()
            .filter(|e| matches!(e, Event::Backtracked { .. }))
            .count(),
        1
    );
    assert_eq!(log.events().last(), Some(&Event::Finished));
    assert_eq!(
        space.discovered_states(),
        2,
        "no further successor expansion after the request"
    );
    assert!(log.restored_ids().is_empty(), "no next state is selected");
}
