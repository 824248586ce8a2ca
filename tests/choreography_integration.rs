//! Long-running choreography tests: phase ordering over many ticks, single
//! completion reports, and lesson scenes driven to their end.

use choreoengine::components::dialogue::{DialogueOptions, DialogueScript};
use choreoengine::components::pathfollower::{FollowerOptions, PathFollower};
use choreoengine::components::phase::{
    AnimationPhase, AnimatorSignal, ExitCondition, PhaseEnd, PhasedAnimator,
};
use choreoengine::components::sequencer::{SceneBeat, SceneSequencer, SequencerSignal};
use choreoengine::components::textreveal::TypedTextRevealer;
use choreoengine::game::{advanced, beginner, register_lesson_assets, register_lessons};
use choreoengine::resources::assetstore::AssetStore;
use choreoengine::resources::engineconfig::EngineConfig;
use choreoengine::resources::grid::Node;
use choreoengine::resources::scenes::SceneId;

const LONG_RUN: u32 = 10_000;

fn timed_phases(durations: &[u32], end: PhaseEnd) -> PhasedAnimator {
    PhasedAnimator::new(
        durations
            .iter()
            .enumerate()
            .map(|(i, &n)| AnimationPhase::new(format!("phase{i}"), ExitCondition::Ticks(n))),
        end,
    )
}

#[test]
fn test_phases_are_entered_in_order_over_long_run() {
    let mut rng = fastrand::Rng::with_seed(42);
    let durations: Vec<u32> = (0..20).map(|_| rng.u32(1..=400)).collect();
    let total: u32 = durations.iter().sum();
    let mut animator = timed_phases(&durations, PhaseEnd::Complete);
    animator.start();

    let mut entered = Vec::new();
    let mut completed_at = Vec::new();
    let mut last_index = 0;
    for t in 1..=LONG_RUN {
        match animator.tick() {
            AnimatorSignal::Entered(i) => entered.push(i),
            AnimatorSignal::Completed => completed_at.push(t),
            _ => {}
        }
        if let Some(i) = animator.phase_index() {
            assert!(i >= last_index, "phase index went back at tick {t}");
            last_index = i;
        }
    }

    assert_eq!(entered, (1..durations.len()).collect::<Vec<_>>());
    assert!(total <= LONG_RUN);
    assert_eq!(completed_at, vec![total]);
    assert!(animator.is_done());
}

#[test]
fn test_held_animator_never_completes() {
    let mut animator = timed_phases(&[5, 5], PhaseEnd::Hold);
    animator.start();
    for _ in 0..LONG_RUN {
        assert_ne!(animator.tick(), AnimatorSignal::Completed);
    }
    assert!(animator.is_settled());
    assert_eq!(animator.phase_name(), Some("phase1"));
}

#[test]
fn test_sequencer_reports_finish_exactly_once() {
    let mut sequencer = SceneSequencer::new(vec![
        SceneBeat::animation(timed_phases(&[30, 70], PhaseEnd::Complete)),
        SceneBeat::animation(timed_phases(&[100], PhaseEnd::Hold)),
        SceneBeat::Handoff(Some(SceneId::from("next"))),
    ])
    .unwrap();
    sequencer.start();

    let finishes: Vec<(u32, SequencerSignal)> = (1..=LONG_RUN)
        .map(|t| (t, sequencer.tick()))
        .filter(|(_, s)| matches!(s, SequencerSignal::Finished(_)))
        .collect();
    assert_eq!(
        finishes,
        vec![(200, SequencerSignal::Finished(Some(SceneId::from("next"))))]
    );
    assert!(sequencer.is_finished());
    assert!(sequencer.on_advance().is_err());
}

#[test]
fn test_dialogue_beat_waits_for_input() {
    let script = DialogueScript::from_lines(&["one", "two"], DialogueOptions::default());
    let mut sequencer = SceneSequencer::new(vec![
        SceneBeat::Dialogue(script),
        SceneBeat::Handoff(None),
    ])
    .unwrap();
    sequencer.start();
    for _ in 0..LONG_RUN {
        assert_eq!(sequencer.tick(), SequencerSignal::Running);
    }
    // The first line is fully revealed, so the advance moves to the second.
    assert_eq!(sequencer.on_advance().unwrap(), SequencerSignal::Running);
    assert_eq!(sequencer.current_dialogue().unwrap().cursor(), 1);
    for _ in 0..100 {
        sequencer.tick();
    }
    assert_eq!(
        sequencer.on_advance().unwrap(),
        SequencerSignal::Finished(None)
    );
}

#[test]
fn test_revealed_length_never_decreases() {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut revealer = TypedTextRevealer::new("Señor Dijkstra’s «shortest» route, one cell at a time.");
    let mut last = 0;
    while !revealer.is_finished() {
        revealer.tick(rng.f32() * 1.5 - 0.25);
        let now = revealer.revealed_len();
        assert!(now >= last);
        assert!(revealer.text().starts_with(revealer.revealed()));
        last = now;
    }
    assert_eq!(revealer.revealed(), revealer.text());
}

#[test]
fn test_follower_moves_one_cell_per_cadence() {
    let path: Vec<Node> = (0..6).map(|c| Node::new(0, c)).collect();
    let options = FollowerOptions {
        step_cadence: 4,
        ..FollowerOptions::default()
    };
    let mut follower = PathFollower::new(path, options);
    let mut previous = follower.current_node();
    let mut moves = 0;
    for _ in 0..LONG_RUN {
        let state = follower.tick();
        let node = follower.current_node();
        if node != previous {
            let (from, to) = (previous.unwrap(), node.unwrap());
            assert!(from.is_adjacent(&to));
            moves += 1;
            previous = node;
        }
        if state.arrived {
            break;
        }
    }
    assert_eq!(moves, 5);
    assert!(follower.arrived());
    assert_eq!(follower.elapsed(), 20);
}

#[test]
fn test_lesson_scenes_run_to_completion() {
    let registry = register_lessons();
    let config = EngineConfig::new();
    let mut assets = AssetStore::new();
    register_lesson_assets(&mut assets);

    for id in [beginner::APPLE_FALL, beginner::APPLE_COUNT, advanced::PACMAN] {
        let id = SceneId::from(id);
        let mut scene = registry.instantiate(&id, &assets, &config).unwrap();
        scene.start();
        let mut finished = 0;
        for t in 1..=LONG_RUN {
            let signal = if t % 45 == 0 {
                scene.on_advance().unwrap_or(SequencerSignal::Idle)
            } else {
                scene.tick()
            };
            if matches!(signal, SequencerSignal::Finished(_)) {
                finished += 1;
            }
        }
        assert_eq!(finished, 1, "{id} should finish exactly once");
    }
}
