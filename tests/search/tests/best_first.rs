//! End-to-end best-first behavior: a two-thread contention model explored
//! with the most-blocked strategy under a single-slot queue.

use search_tests::RecordingListener;
use statewalk_harness::runner::run_search;
use statewalk_harness::vms::script::{ScriptedSpace, ScriptedState};
use statewalk_search::Properties;
use statewalk_vm::StateId;

/// Two threads, four reachable states. One of the root's children has a
/// blocked thread; the other leaves both runnable. Only the blocked child
/// has a successor.
fn contention_space(blocked_child_first: bool) -> ScriptedSpace {
    let mut space = ScriptedSpace::new(ScriptedState::threads(2, 2));
    let free = ScriptedState::threads(2, 2).chosen(0, &[0, 1]);
    let blocked = ScriptedState::threads(2, 1).chosen(1, &[0, 1]);

    let blocked_node = if blocked_child_first {
        let node = space.add_child(0, blocked);
        space.add_child(0, free);
        node
    } else {
        space.add_child(0, free);
        space.add_child(0, blocked)
    };
    space.add_child(
        blocked_node,
        ScriptedState::threads(1, 1).chosen(1, &[1]).end(),
    );
    space
}

fn single_slot_most_blocked() -> Properties {
    let mut props = Properties::new();
    props.set("search.heuristic.strategy", "most_blocked");
    props.set("search.heuristic.queue_limit", "1");
    props
}

#[test]
fn resumes_from_the_most_blocked_pending_state() {
    let listener = RecordingListener::new();
    let log = listener.log();
    let mut space = contention_space(false);
    let report = run_search(
        &single_slot_most_blocked(),
        &mut space,
        vec![Box::new(listener)],
    )
    .unwrap();

    // both children are reported stored, but the single-slot queue keeps only
    // the more blocked one (the free child is evicted at admission time)
    assert_eq!(
        log.stored_ids(),
        vec![StateId::new(0), StateId::new(1), StateId::new(2)]
    );
    assert_eq!(log.restored_ids(), vec![StateId::new(2)]);
    assert_eq!(
        log.constraint_messages(),
        vec!["queue limit reached: 1".to_string()]
    );
    assert_eq!(
        space.discovered_states(),
        4,
        "exactly four distinct states enumerated"
    );
    assert_eq!(report.stats.new_states, 3);
    assert_eq!(report.stats.constraints_hit, 1);
    assert!(report.errors.is_empty());
}

#[test]
fn admission_order_does_not_change_the_winner() {
    // blocked child discovered first: the free child is now the one rejected
    let listener = RecordingListener::new();
    let log = listener.log();
    let mut space = contention_space(true);
    run_search(
        &single_slot_most_blocked(),
        &mut space,
        vec![Box::new(listener)],
    )
    .unwrap();

    assert_eq!(log.restored_ids(), vec![StateId::new(1)]);
    assert_eq!(space.discovered_states(), 4);
}

#[test]
fn queue_is_search_global_across_levels() {
    // pending states from different depths compete in one queue; the driver
    // hops levels freely when resuming
    let mut space = ScriptedSpace::new(ScriptedState::default());
    space.add_child(0, ScriptedState::default().valued(7));
    let mid = space.add_child(0, ScriptedState::default().valued(2));
    space.add_child(mid, ScriptedState::default().valued(5));

    let mut props = Properties::new();
    props.set("search.heuristic.strategy", "user");

    let listener = RecordingListener::new();
    let log = listener.log();
    run_search(&props, &mut space, vec![Box::new(listener)]).unwrap();

    assert_eq!(
        log.restored(),
        vec![
            (StateId::new(2), 1), // rank 2, depth 1; rank-7 sibling pending
            (StateId::new(3), 1), // rank 5, depth 2; hops below the sibling
            (StateId::new(1), 0), // rank 7 last, back up at depth 1
        ]
    );
}

#[test]
fn notification_sequence_is_deterministic() {
    let run = || {
        let listener = RecordingListener::new();
        let log = listener.log();
        let mut space = contention_space(false);
        run_search(
            &single_slot_most_blocked(),
            &mut space,
            vec![Box::new(listener)],
        )
        .unwrap();
        log.events()
    };

    assert_eq!(run(), run(), "identical runs notify identically");
}
