//! One-directional multi-phase animation state machine.
//!
//! A [`PhasedAnimator`] owns an ordered list of [`AnimationPhase`]s and walks
//! them strictly forward:
//!
//! ```text
//! Waiting -> Phase(0) -> Phase(1) -> ... -> Held | Done
//! ```
//!
//! # Architecture
//!
//! - **Phases are named** – names only serve logging and lookups
//! - **Each phase has one [`ExitCondition`]** – a tick threshold, a target
//!   position, the end of a one-shot frame cycle, a caller predicate, or never
//! - **Phases may move** – a per-tick velocity is added to the animator's
//!   position while the phase is active
//! - **Phases may animate** – an optional [`FrameCycle`] is ticked while the
//!   phase is active; looping cycles repeat inside the phase, they never send
//!   the animator back to an earlier phase
//!
//! An exit condition is first evaluated on the tick after its phase was
//! entered, so every phase is visible for at least one tick even when its
//! condition already held on entry.
//!
//! When the last phase's condition is met the animator either freezes
//! ([`PhaseEnd::Hold`]) or reports [`AnimatorSignal::Completed`] exactly once
//! ([`PhaseEnd::Complete`]).
//!
//! # Example
//!
//! ```ignore
//! let billboard = PhasedAnimator::new(
//!     vec![
//!         AnimationPhase::new("lower", ExitCondition::Reached(centre)).with_velocity(Vec2::new(0.0, 4.0)),
//!         AnimationPhase::new("pause", ExitCondition::Ticks(60)),
//!         AnimationPhase::new("raise", ExitCondition::Reached(above)).with_velocity(Vec2::new(0.0, -4.0)),
//!     ],
//!     PhaseEnd::Complete,
//! )
//! .with_position(above);
//! ```

use glam::Vec2;
use log::{debug, warn};
use smallvec::SmallVec;

use crate::components::animation::FrameCycle;
use crate::resources::assetstore::AssetHandle;

/// When a phase hands over to the next one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExitCondition {
    /// After this many ticks in the phase.
    Ticks(u32),
    /// When the animator position reaches (or passes) the target along the
    /// phase velocity. The position is clamped onto the target. An axis
    /// that does not move toward its target coordinate never reaches it.
    Reached(Vec2),
    /// When the phase's one-shot frame cycle shows its last frame.
    CycleFinished,
    /// When the predicate given to [`PhasedAnimator::tick_with`] returns true.
    External,
    /// Never; only meaningful for the final phase.
    Never,
}

/// Behaviour after the final phase's exit condition is met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseEnd {
    /// Freeze on the final phase's last state.
    #[default]
    Hold,
    /// Leave the final phase and report completion once.
    Complete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationPhase {
    pub name: String,
    pub exit: ExitCondition,
    /// Added to the animator position every tick of this phase.
    pub velocity: Vec2,
    pub frames: Option<FrameCycle>,
}

impl AnimationPhase {
    pub fn new(name: impl Into<String>, exit: ExitCondition) -> Self {
        Self {
            name: name.into(),
            exit,
            velocity: Vec2::ZERO,
            frames: None,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_frames(mut self, frames: FrameCycle) -> Self {
        self.frames = Some(frames);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Waiting,
    Running(usize),
    Held(usize),
    Done,
}

/// What a single [`PhasedAnimator::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorSignal {
    /// Not started, frozen, or already done.
    Idle,
    /// Stayed in the current phase.
    Running,
    /// Entered the phase at this index.
    Entered(usize),
    /// Left the final phase; reported once.
    Completed,
}

/// One tick of motion along a single axis toward `target`. Returns the new
/// coordinate and whether it sits on the target. The coordinate is clamped
/// only when this step crosses the target; an axis moving away from it, or
/// not moving at all, keeps going and never counts as reached.
fn step_axis(pos: f32, target: f32, velocity: f32) -> (f32, bool) {
    let remaining = target - pos;
    if remaining == 0.0 {
        return (pos, true);
    }
    let next = pos + velocity;
    if velocity == 0.0 || remaining.signum() != velocity.signum() {
        return (next, false);
    }
    if (target - next) * remaining <= 0.0 {
        (target, true)
    } else {
        (next, false)
    }
}

/// Whether motion at `velocity` from `pos` can ever land on `target`.
fn can_reach(pos: Vec2, target: Vec2, velocity: Vec2) -> bool {
    let axis = |p: f32, t: f32, v: f32| p == t || (v != 0.0 && (t - p).signum() == v.signum());
    axis(pos.x, target.x, velocity.x) && axis(pos.y, target.y, velocity.y)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhasedAnimator {
    phases: SmallVec<[AnimationPhase; 4]>,
    end: PhaseEnd,
    state: AnimatorState,
    ticks_in_phase: u32,
    origin: Vec2,
    position: Vec2,
}

impl PhasedAnimator {
    pub fn new(phases: impl IntoIterator<Item = AnimationPhase>, end: PhaseEnd) -> Self {
        Self {
            phases: phases.into_iter().collect(),
            end,
            state: AnimatorState::Waiting,
            ticks_in_phase: 0,
            origin: Vec2::ZERO,
            position: Vec2::ZERO,
        }
    }

    /// Starting position, restored on every [`start`](Self::start).
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.origin = position;
        self.position = position;
        self
    }

    /// Enter the first phase. Restarting rewinds position and frames.
    pub fn start(&mut self) {
        self.position = self.origin;
        self.ticks_in_phase = 0;
        for phase in self.phases.iter_mut() {
            if let Some(frames) = phase.frames.as_mut() {
                frames.reset();
            }
        }
        self.state = if self.phases.is_empty() {
            AnimatorState::Done
        } else {
            AnimatorState::Running(0)
        };
        debug!(
            "Animator started in phase {:?}",
            self.phases.first().map(|p| p.name.as_str())
        );
        self.warn_if_unreachable(0);
    }

    fn warn_if_unreachable(&self, index: usize) {
        let Some(phase) = self.phases.get(index) else {
            return;
        };
        match phase.exit {
            ExitCondition::Reached(target) if !can_reach(self.position, target, phase.velocity) => {
                warn!(
                    "Phase '{}' moves {:?} from {:?} and never reaches {:?}",
                    phase.name, phase.velocity, self.position, target
                );
            }
            _ => {}
        }
    }

    /// Advance one tick. `External` exit conditions never fire.
    pub fn tick(&mut self) -> AnimatorSignal {
        self.tick_with(|_, _| false)
    }

    /// Advance one tick, using `reached` to evaluate `External` exit
    /// conditions. It receives the active phase and the current position.
    pub fn tick_with<F>(&mut self, reached: F) -> AnimatorSignal
    where
        F: FnOnce(&AnimationPhase, Vec2) -> bool,
    {
        let AnimatorState::Running(index) = self.state else {
            return AnimatorSignal::Idle;
        };
        let phase = &mut self.phases[index];

        let on_target = match phase.exit {
            ExitCondition::Reached(target) => {
                let (x, on_x) = step_axis(self.position.x, target.x, phase.velocity.x);
                let (y, on_y) = step_axis(self.position.y, target.y, phase.velocity.y);
                self.position = Vec2::new(x, y);
                on_x && on_y
            }
            _ => {
                self.position += phase.velocity;
                false
            }
        };
        if let Some(frames) = phase.frames.as_mut() {
            frames.tick();
        }
        self.ticks_in_phase = self.ticks_in_phase.saturating_add(1);

        let satisfied = match phase.exit {
            ExitCondition::Ticks(n) => self.ticks_in_phase >= n,
            ExitCondition::Reached(_) => on_target,
            ExitCondition::CycleFinished => {
                phase.frames.as_ref().is_none_or(FrameCycle::is_finished)
            }
            ExitCondition::External => reached(phase, self.position),
            ExitCondition::Never => false,
        };
        if !satisfied {
            return AnimatorSignal::Running;
        }

        let next = index + 1;
        if next < self.phases.len() {
            debug!(
                "Animator phase '{}' -> '{}'",
                self.phases[index].name, self.phases[next].name
            );
            self.state = AnimatorState::Running(next);
            self.ticks_in_phase = 0;
            self.warn_if_unreachable(next);
            return AnimatorSignal::Entered(next);
        }
        match self.end {
            PhaseEnd::Hold => {
                self.state = AnimatorState::Held(index);
                AnimatorSignal::Running
            }
            PhaseEnd::Complete => {
                debug!("Animator completed after '{}'", self.phases[index].name);
                self.state = AnimatorState::Done;
                AnimatorSignal::Completed
            }
        }
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    /// Index of the active or held phase.
    pub fn phase_index(&self) -> Option<usize> {
        match self.state {
            AnimatorState::Running(i) | AnimatorState::Held(i) => Some(i),
            AnimatorState::Waiting | AnimatorState::Done => None,
        }
    }

    pub fn current_phase(&self) -> Option<&AnimationPhase> {
        self.phase_index().map(|i| &self.phases[i])
    }

    /// Name of the active or held phase.
    pub fn phase_name(&self) -> Option<&str> {
        self.current_phase().map(|p| p.name.as_str())
    }

    /// Handle of the visible frame of the active phase, if it animates.
    pub fn current_frame(&self) -> Option<AssetHandle> {
        self.current_phase()
            .and_then(|p| p.frames.as_ref())
            .and_then(FrameCycle::current)
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn ticks_in_phase(&self) -> u32 {
        self.ticks_in_phase
    }

    /// Fraction of a `Ticks` phase elapsed, in [0, 1]. Other phases report 0.
    pub fn phase_progress(&self) -> f32 {
        match self.current_phase().map(|p| p.exit) {
            Some(ExitCondition::Ticks(0)) => 1.0,
            Some(ExitCondition::Ticks(n)) => (self.ticks_in_phase as f32 / n as f32).min(1.0),
            _ => 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn is_started(&self) -> bool {
        self.state != AnimatorState::Waiting
    }

    pub fn is_done(&self) -> bool {
        self.state == AnimatorState::Done
    }

    /// Frozen on the final phase or done.
    pub fn is_settled(&self) -> bool {
        matches!(self.state, AnimatorState::Held(_) | AnimatorState::Done)
    }
}
