//! Beam-mode law: selecting the next state discards every other pending
//! state, so each round starts from a clean slate.

use search_tests::RecordingListener;
use statewalk_harness::runner::run_search;
use statewalk_harness::vms::script::{ScriptedSpace, ScriptedState};
use statewalk_search::Properties;
use statewalk_vm::StateId;

fn beam_props() -> Properties {
    let mut props = Properties::new();
    props.set("search.heuristic.strategy", "user");
    props.set("search.heuristic.beam_search", "true");
    props
}

#[test]
fn selection_empties_the_queue() {
    let mut space = ScriptedSpace::new(ScriptedState::default());
    space.add_child(0, ScriptedState::default().valued(5));
    let best = space.add_child(0, ScriptedState::default().valued(3));
    space.add_child(best, ScriptedState::default().valued(7));

    let listener = RecordingListener::new();
    let log = listener.log();
    run_search(&beam_props(), &mut space, vec![Box::new(listener)]).unwrap();

    for (id, queue_len) in log.restored() {
        assert_eq!(queue_len, 0, "queue must be empty right after selecting {id}");
    }
}

#[test]
fn unselected_siblings_are_never_resumed() {
    let mut space = ScriptedSpace::new(ScriptedState::default());
    // the rank-5 sibling would win round two under plain best-first, but beam
    // mode discards it when the rank-3 child is selected
    space.add_child(0, ScriptedState::default().valued(5));
    let best = space.add_child(0, ScriptedState::default().valued(3));
    space.add_child(best, ScriptedState::default().valued(7));

    let listener = RecordingListener::new();
    let log = listener.log();
    let mut props = beam_props();
    let report = run_search(&props, &mut space, vec![Box::new(listener)]).unwrap();

    assert_eq!(
        log.restored_ids(),
        vec![StateId::new(2), StateId::new(3)],
        "only the per-round winners are resumed"
    );
    assert_eq!(report.stats.restored_states, 2);

    // plain best-first over the same shape resumes the discarded sibling too
    props.set("search.heuristic.beam_search", "false");
    let listener = RecordingListener::new();
    let log = listener.log();
    let mut space = ScriptedSpace::new(ScriptedState::default());
    space.add_child(0, ScriptedState::default().valued(5));
    let best = space.add_child(0, ScriptedState::default().valued(3));
    space.add_child(best, ScriptedState::default().valued(7));
    run_search(&props, &mut space, vec![Box::new(listener)]).unwrap();

    assert_eq!(
        log.restored_ids(),
        vec![StateId::new(2), StateId::new(1), StateId::new(3)]
    );
}
