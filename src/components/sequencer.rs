//! Beat-by-beat scene orchestration.
//!
//! A [`SceneSequencer`] owns an ordered list of [`SceneBeat`]s and a cursor.
//! Each tick is forwarded to the active beat. When a beat finishes it either
//! hands over by itself ([`BeatAdvance::Auto`]) or waits for the user's
//! advance input ([`BeatAdvance::OnInput`]). Dialogue beats always wait for
//! input, since acknowledging the last section is what finishes them.
//!
//! Reaching a [`SceneBeat::Handoff`], or finishing the last beat, reports
//! [`SequencerSignal::Finished`] exactly once. From then on ticks report
//! [`SequencerSignal::Idle`] and advance input is rejected.

use log::debug;

use crate::components::dialogue::{DialogueScript, ScriptSignal};
use crate::components::phase::PhasedAnimator;
use crate::components::pursuit::Pursuit;
use crate::error::EngineError;
use crate::resources::scenes::SceneId;
use crate::resources::surface::RenderSurface;

/// How a finished beat hands over to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BeatAdvance {
    #[default]
    Auto,
    OnInput,
}

#[derive(Debug, Clone)]
pub enum SceneBeat {
    Dialogue(DialogueScript),
    Animation {
        animator: PhasedAnimator,
        advance: BeatAdvance,
    },
    Pursuit {
        pursuit: Pursuit,
        advance: BeatAdvance,
    },
    /// Ends the scene, naming the scene that should follow.
    Handoff(Option<SceneId>),
}

impl SceneBeat {
    pub fn animation(animator: PhasedAnimator) -> Self {
        SceneBeat::Animation {
            animator,
            advance: BeatAdvance::Auto,
        }
    }

    pub fn animation_on_input(animator: PhasedAnimator) -> Self {
        SceneBeat::Animation {
            animator,
            advance: BeatAdvance::OnInput,
        }
    }

    pub fn pursuit(pursuit: Pursuit) -> Self {
        SceneBeat::Pursuit {
            pursuit,
            advance: BeatAdvance::Auto,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SceneBeat::Dialogue(_) => "dialogue",
            SceneBeat::Animation { .. } => "animation",
            SceneBeat::Pursuit { .. } => "pursuit",
            SceneBeat::Handoff(_) => "handoff",
        }
    }

    fn start(&mut self) {
        match self {
            SceneBeat::Dialogue(script) => script.start(),
            SceneBeat::Animation { animator, .. } => animator.start(),
            SceneBeat::Pursuit { pursuit, .. } => pursuit.start(),
            SceneBeat::Handoff(_) => {}
        }
    }

    fn tick(&mut self) {
        match self {
            SceneBeat::Dialogue(script) => script.tick(),
            SceneBeat::Animation { animator, .. } => {
                animator.tick();
            }
            SceneBeat::Pursuit { pursuit, .. } => {
                pursuit.tick();
            }
            SceneBeat::Handoff(_) => {}
        }
    }

    /// Finished beats either moved on already (auto) or wait for input.
    pub fn is_finished(&self) -> bool {
        match self {
            SceneBeat::Dialogue(script) => script.is_complete(),
            SceneBeat::Animation { animator, .. } => animator.is_settled(),
            SceneBeat::Pursuit { pursuit, .. } => pursuit.is_finished(),
            SceneBeat::Handoff(_) => true,
        }
    }

    fn advance_policy(&self) -> BeatAdvance {
        match self {
            SceneBeat::Dialogue(_) | SceneBeat::Handoff(_) => BeatAdvance::Auto,
            SceneBeat::Animation { advance, .. } | SceneBeat::Pursuit { advance, .. } => *advance,
        }
    }
}

/// What a sequencer call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerSignal {
    /// Not started or already finished.
    Idle,
    /// The active beat is still playing.
    Running,
    /// The beat at this index was started.
    BeatChanged(usize),
    /// The scene is over; carries the successor named by a hand-off.
    Finished(Option<SceneId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequencerState {
    Waiting,
    Playing,
    Finished,
}

#[derive(Debug, Clone)]
pub struct SceneSequencer {
    beats: Vec<SceneBeat>,
    cursor: usize,
    state: SequencerState,
}

impl SceneSequencer {
    /// Build a sequencer. The list must be non-empty and a hand-off may
    /// only appear as the last beat.
    pub fn new(beats: Vec<SceneBeat>) -> Result<Self, EngineError> {
        let len = beats.len();
        if len == 0 {
            return Err(EngineError::InvalidBeatIndex { index: 0, len });
        }
        if let Some(index) = beats[..len - 1]
            .iter()
            .position(|b| matches!(b, SceneBeat::Handoff(_)))
        {
            return Err(EngineError::InvalidBeatIndex { index, len });
        }
        Ok(Self {
            beats,
            cursor: 0,
            state: SequencerState::Waiting,
        })
    }

    /// Start the first beat. A sequencer made of a lone hand-off finishes
    /// right away.
    pub fn start(&mut self) -> SequencerSignal {
        self.cursor = 0;
        self.state = SequencerState::Playing;
        self.enter(0)
    }

    pub fn tick(&mut self) -> SequencerSignal {
        if self.state != SequencerState::Playing {
            return SequencerSignal::Idle;
        }
        let beat = &mut self.beats[self.cursor];
        beat.tick();
        if beat.is_finished() && beat.advance_policy() == BeatAdvance::Auto {
            return self.enter(self.cursor + 1);
        }
        SequencerSignal::Running
    }

    /// Forward the user's advance input. Dialogue beats finish or move
    /// through their sections; other finished beats hand over to the next
    /// one; unfinished non-dialogue beats ignore it.
    pub fn on_advance(&mut self) -> Result<SequencerSignal, EngineError> {
        match self.state {
            SequencerState::Waiting => return Ok(SequencerSignal::Idle),
            SequencerState::Finished => {
                return Err(EngineError::InvalidBeatIndex {
                    index: self.beats.len(),
                    len: self.beats.len(),
                });
            }
            SequencerState::Playing => {}
        }
        let next = self.cursor + 1;
        match &mut self.beats[self.cursor] {
            SceneBeat::Dialogue(script) => match script.advance_section()? {
                ScriptSignal::Completed => Ok(self.enter(next)),
                ScriptSignal::Revealed | ScriptSignal::NextSection(_) => {
                    Ok(SequencerSignal::Running)
                }
            },
            beat if beat.is_finished() => Ok(self.enter(next)),
            _ => Ok(SequencerSignal::Running),
        }
    }

    fn enter(&mut self, index: usize) -> SequencerSignal {
        let Some(beat) = self.beats.get_mut(index) else {
            return self.finish(None);
        };
        self.cursor = index;
        if let SceneBeat::Handoff(next) = beat {
            let next = next.clone();
            return self.finish(next);
        }
        beat.start();
        debug!("Beat {} ({}) started", index, beat.kind());
        SequencerSignal::BeatChanged(index)
    }

    fn finish(&mut self, next: Option<SceneId>) -> SequencerSignal {
        self.state = SequencerState::Finished;
        debug!("Sequencer finished, next scene: {:?}", next);
        SequencerSignal::Finished(next)
    }

    pub fn beat(&self, index: usize) -> Result<&SceneBeat, EngineError> {
        self.beats.get(index).ok_or(EngineError::InvalidBeatIndex {
            index,
            len: self.beats.len(),
        })
    }

    /// Active beat; fails before start and after finish.
    pub fn current_beat(&self) -> Result<&SceneBeat, EngineError> {
        if self.state != SequencerState::Playing {
            return Err(self.cursor_error());
        }
        self.beat(self.cursor)
    }

    pub fn current_beat_mut(&mut self) -> Result<&mut SceneBeat, EngineError> {
        if self.state != SequencerState::Playing {
            return Err(self.cursor_error());
        }
        let len = self.beats.len();
        self.beats
            .get_mut(self.cursor)
            .ok_or(EngineError::InvalidBeatIndex {
                index: self.cursor,
                len,
            })
    }

    fn cursor_error(&self) -> EngineError {
        let index = match self.state {
            SequencerState::Finished => self.beats.len(),
            _ => self.cursor,
        };
        EngineError::InvalidBeatIndex {
            index,
            len: self.beats.len(),
        }
    }

    /// Cue of the active dialogue section, if any.
    pub fn current_cue(&self) -> Option<&str> {
        match self.current_beat() {
            Ok(SceneBeat::Dialogue(script)) => script.current_cue(),
            _ => None,
        }
    }

    pub fn current_dialogue(&self) -> Option<&DialogueScript> {
        match self.current_beat() {
            Ok(SceneBeat::Dialogue(script)) => Some(script),
            _ => None,
        }
    }

    pub fn current_animator(&self) -> Option<&PhasedAnimator> {
        match self.current_beat() {
            Ok(SceneBeat::Animation { animator, .. }) => Some(animator),
            _ => None,
        }
    }

    pub fn current_pursuit(&self) -> Option<&Pursuit> {
        match self.current_beat() {
            Ok(SceneBeat::Pursuit { pursuit, .. }) => Some(pursuit),
            _ => None,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    pub fn is_started(&self) -> bool {
        self.state != SequencerState::Waiting
    }

    pub fn is_finished(&self) -> bool {
        self.state == SequencerState::Finished
    }

    /// Draw the active dialogue, if any. Actors are drawn by the scene.
    pub fn draw_dialogue(&self, surface: &mut dyn RenderSurface) {
        if let Some(script) = self.current_dialogue() {
            script.draw(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::dialogue::DialogueOptions;
    use crate::components::pathfollower::FollowerOptions;
    use crate::components::phase::{AnimationPhase, ExitCondition, PhaseEnd};
    use crate::resources::grid::{Node, OccupancyGrid};

    fn dialogue(lines: &[&str]) -> SceneBeat {
        SceneBeat::Dialogue(DialogueScript::from_lines(
            lines,
            DialogueOptions::default().with_speed(100.0),
        ))
    }

    fn wait(ticks: u32, end: PhaseEnd) -> PhasedAnimator {
        PhasedAnimator::new(vec![AnimationPhase::new("wait", ExitCondition::Ticks(ticks))], end)
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(
            SceneSequencer::new(Vec::new()).unwrap_err(),
            EngineError::InvalidBeatIndex { index: 0, len: 0 }
        );
    }

    #[test]
    fn test_handoff_must_be_last() {
        let err = SceneSequencer::new(vec![SceneBeat::Handoff(None), dialogue(&["x"])]);
        assert_eq!(
            err.unwrap_err(),
            EngineError::InvalidBeatIndex { index: 0, len: 2 }
        );
    }

    #[test]
    fn test_dialogue_then_handoff_finishes_once() {
        let next = SceneId::from("intermediate.map");
        let mut seq = SceneSequencer::new(vec![
            dialogue(&["one", "two"]),
            SceneBeat::Handoff(Some(next.clone())),
        ])
        .unwrap();
        assert_eq!(seq.start(), SequencerSignal::BeatChanged(0));
        seq.tick();
        assert_eq!(seq.on_advance().unwrap(), SequencerSignal::Running);
        seq.tick();
        assert_eq!(
            seq.on_advance().unwrap(),
            SequencerSignal::Finished(Some(next))
        );
        assert!(seq.is_finished());
        for _ in 0..100 {
            assert_eq!(seq.tick(), SequencerSignal::Idle);
        }
        assert_eq!(
            seq.on_advance(),
            Err(EngineError::InvalidBeatIndex { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_auto_animation_moves_on_by_itself() {
        let mut seq = SceneSequencer::new(vec![
            SceneBeat::animation(wait(3, PhaseEnd::Complete)),
            dialogue(&["after"]),
        ])
        .unwrap();
        seq.start();
        assert_eq!(seq.tick(), SequencerSignal::Running);
        assert_eq!(seq.tick(), SequencerSignal::Running);
        assert_eq!(seq.tick(), SequencerSignal::BeatChanged(1));
        assert_eq!(seq.current_beat().unwrap().kind(), "dialogue");
    }

    #[test]
    fn test_on_input_animation_waits_for_advance() {
        let mut seq = SceneSequencer::new(vec![
            SceneBeat::animation_on_input(wait(1, PhaseEnd::Hold)),
            dialogue(&["after"]),
        ])
        .unwrap();
        seq.start();
        assert_eq!(seq.on_advance().unwrap(), SequencerSignal::Running);
        for _ in 0..10 {
            assert_eq!(seq.tick(), SequencerSignal::Running);
        }
        assert_eq!(seq.cursor(), 0);
        assert_eq!(seq.on_advance().unwrap(), SequencerSignal::BeatChanged(1));
    }

    #[test]
    fn test_final_beat_without_handoff_finishes_with_none() {
        let mut seq =
            SceneSequencer::new(vec![SceneBeat::animation(wait(2, PhaseEnd::Complete))]).unwrap();
        seq.start();
        seq.tick();
        assert_eq!(seq.tick(), SequencerSignal::Finished(None));
        assert_eq!(seq.tick(), SequencerSignal::Idle);
    }

    #[test]
    fn test_lone_handoff_finishes_on_start() {
        let mut seq = SceneSequencer::new(vec![SceneBeat::Handoff(None)]).unwrap();
        assert_eq!(seq.start(), SequencerSignal::Finished(None));
        assert!(seq.current_beat().is_err());
    }

    #[test]
    fn test_aborted_pursuit_proceeds() {
        let grid = OccupancyGrid::parse(&[".#.", ".#.", ".#."]).unwrap();
        let pursuit = Pursuit::new(
            grid,
            Node::new(0, 0),
            Node::new(0, 2),
            FollowerOptions::default(),
        );
        let mut seq =
            SceneSequencer::new(vec![SceneBeat::pursuit(pursuit), dialogue(&["no route"])])
                .unwrap();
        seq.start();
        assert!(seq.current_pursuit().is_some_and(Pursuit::is_finished));
        assert_eq!(seq.tick(), SequencerSignal::BeatChanged(1));
    }

    #[test]
    fn test_cue_of_active_dialogue() {
        use crate::components::dialogue::TextSection;
        let script = DialogueScript::new(
            vec![TextSection::new("hi", 1.0).with_cue("mario_walk")],
            DialogueOptions::default(),
        );
        let mut seq = SceneSequencer::new(vec![SceneBeat::Dialogue(script)]).unwrap();
        assert_eq!(seq.current_cue(), None);
        seq.start();
        assert_eq!(seq.current_cue(), Some("mario_walk"));
    }

    #[test]
    fn test_beat_index_out_of_range() {
        let seq = SceneSequencer::new(vec![dialogue(&["x"])]).unwrap();
        assert!(seq.beat(0).is_ok());
        assert_eq!(
            seq.beat(1).unwrap_err(),
            EngineError::InvalidBeatIndex { index: 1, len: 1 }
        );
    }
}
