//! Intermediate lesson: the linked-list chapter.
//!
//! Four scenes chained through the registry: an opening fade, Dora's
//! arrival with a two-line introduction, the stage video followed by a
//! stacked explanation, and the looping map.

use glam::Vec2;

use crate::components::animation::FrameCycle;
use crate::components::dialogue::{DialogueOptions, DialogueScript};
use crate::components::phase::{AnimationPhase, ExitCondition, PhaseEnd, PhasedAnimator};
use crate::components::sequencer::{SceneBeat, SceneSequencer, SequencerSignal};
use crate::error::EngineError;
use crate::game::{alpha, centred, frame_size};
use crate::resources::assetstore::AssetHandle;
use crate::resources::scenes::{Scene, SceneContext, SceneId};
use crate::resources::surface::{Color, RenderSurface, blit_opt};

pub const OPENING: &str = "intermediate.opening";
pub const DORA_ARRIVES: &str = "intermediate.dora_arrives";
pub const LINKED_LISTS: &str = "intermediate.linked_lists";
pub const MAP: &str = "intermediate.map";

const FADE_TICKS: u32 = 210;
const DORA_START_X: f32 = -300.0;
const DORA_FRAME_DELAY: u32 = 15;
const VIDEO_FRAMES: usize = 149;
const MAP_FRAMES: usize = 16;
const MAP_FRAME_DELAY: u32 = 8;

/// Opening: background fades in, then out.
pub struct OpeningScene {
    id: SceneId,
    sequencer: SceneSequencer,
    background: Option<AssetHandle>,
}

pub fn opening(ctx: &SceneContext) -> Result<Box<dyn Scene>, EngineError> {
    let fade = PhasedAnimator::new(
        vec![
            AnimationPhase::new("fade_in", ExitCondition::Ticks(FADE_TICKS)),
            AnimationPhase::new("fade_out", ExitCondition::Ticks(FADE_TICKS)),
        ],
        PhaseEnd::Complete,
    );
    let sequencer = SceneSequencer::new(vec![
        SceneBeat::animation(fade),
        SceneBeat::Handoff(ctx.successor.clone()),
    ])?;
    Ok(Box::new(OpeningScene {
        id: SceneId::from(OPENING),
        sequencer,
        background: ctx.assets.handle("bg/opening"),
    }))
}

impl OpeningScene {
    /// Background opacity for the current tick.
    pub fn opacity(&self) -> u8 {
        let Some(fade) = self.sequencer.current_animator() else {
            return 0;
        };
        match fade.phase_name() {
            Some("fade_in") => alpha(fade.phase_progress()),
            Some("fade_out") => alpha(1.0 - fade.phase_progress()),
            _ => 0,
        }
    }
}

impl Scene for OpeningScene {
    fn id(&self) -> &SceneId {
        &self.id
    }

    fn start(&mut self) {
        self.sequencer.start();
    }

    fn tick(&mut self) -> SequencerSignal {
        self.sequencer.tick()
    }

    fn on_advance(&mut self) -> Result<SequencerSignal, EngineError> {
        self.sequencer.on_advance()
    }

    fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.fill(Color::BLACK);
        if let Some(bg) = self.background {
            surface.blit(bg, Vec2::ZERO, self.opacity());
        }
    }
}

/// Dora slides in from the left while introducing the chapter.
pub struct DoraArrivesScene {
    id: SceneId,
    sequencer: SceneSequencer,
    surface_size: (f32, f32),
    background: Option<AssetHandle>,
    dora: PhasedAnimator,
    dora_size: (f32, f32),
}

pub fn dora_arrives(ctx: &SceneContext) -> Result<Box<dyn Scene>, EngineError> {
    Ok(Box::new(DoraArrivesScene::new(ctx)?))
}

impl DoraArrivesScene {
    pub fn new(ctx: &SceneContext) -> Result<Self, EngineError> {
        let assets = ctx.assets;
        let surface_size = ctx.config.render_size();
        let frames = assets.frames("dora", 3);
        let dora_size = frame_size(assets, &frames, (192.0, 288.0));
        let target_x = surface_size.0 / 2.0 - dora_size.0 / 2.0;
        let last = frames.last().copied().into_iter().collect();
        let dora = PhasedAnimator::new(
            vec![
                AnimationPhase::new("slide", ExitCondition::Reached(Vec2::new(target_x, 0.0)))
                    .with_velocity(Vec2::new(1.0, 0.0))
                    .with_frames(FrameCycle::once(frames, DORA_FRAME_DELAY)),
                AnimationPhase::new("stand", ExitCondition::Never)
                    .with_frames(FrameCycle::once(last, 1)),
            ],
            PhaseEnd::Hold,
        )
        .with_position(Vec2::new(DORA_START_X, 0.0));

        let options = ctx.config.dialogue_options().with_speed(0.2);
        let dialogue = DialogueScript::from_lines(
            &[
                "Dora: Hola! We're exploring the DS Forest.",
                "To reach the Coding Cave, we need to build Linked Lists!",
            ],
            options,
        );
        let sequencer = SceneSequencer::new(vec![
            SceneBeat::Dialogue(dialogue),
            SceneBeat::Handoff(ctx.successor.clone()),
        ])?;

        Ok(Self {
            id: SceneId::from(DORA_ARRIVES),
            sequencer,
            surface_size,
            background: assets.handle("bg/forest"),
            dora,
            dora_size,
        })
    }

    /// Top-left corner of Dora: vertically centred while sliding, standing
    /// on the bottom edge once arrived.
    pub fn dora_position(&self) -> Vec2 {
        let (_, h) = self.surface_size;
        let y = match self.dora.phase_name() {
            Some("stand") => h - self.dora_size.1,
            _ => h / 2.0 - self.dora_size.1 / 2.0,
        };
        Vec2::new(self.dora.position().x, y)
    }

    pub fn dora(&self) -> &PhasedAnimator {
        &self.dora
    }
}

impl Scene for DoraArrivesScene {
    fn id(&self) -> &SceneId {
        &self.id
    }

    fn start(&mut self) {
        self.dora.start();
        self.sequencer.start();
    }

    fn tick(&mut self) -> SequencerSignal {
        self.dora.tick();
        self.sequencer.tick()
    }

    fn on_advance(&mut self) -> Result<SequencerSignal, EngineError> {
        self.sequencer.on_advance()
    }

    fn draw(&self, surface: &mut dyn RenderSurface) {
        blit_opt(surface, self.background, Vec2::ZERO);
        blit_opt(surface, self.dora.current_frame(), self.dora_position());
        self.sequencer.draw_dialogue(surface);
    }
}

/// Stage video, a pause for input, then a stacked explanation.
pub struct LinkedListsScene {
    id: SceneId,
    sequencer: SceneSequencer,
    last_frame: Option<AssetHandle>,
}

pub fn linked_lists(ctx: &SceneContext) -> Result<Box<dyn Scene>, EngineError> {
    let frames = ctx.assets.frames("video/stage1", VIDEO_FRAMES);
    let last_frame = frames.last().copied().flatten();
    let video = PhasedAnimator::new(
        vec![AnimationPhase::new("video", ExitCondition::CycleFinished)
            .with_frames(FrameCycle::once(frames, 1))],
        PhaseEnd::Hold,
    );
    let options = DialogueOptions {
        font_size: 28.0,
        ..ctx.config.dialogue_options().with_speed(0.3).stacked()
    };
    let explanation = DialogueScript::from_lines(
        &[
            "Boots: \"Linked Lists are like paths of nodes,",
            "with arrows called pointers that tell us",
            "where to go next!\"",
        ],
        options,
    );
    let sequencer = SceneSequencer::new(vec![
        SceneBeat::animation_on_input(video),
        SceneBeat::Dialogue(explanation),
        SceneBeat::Handoff(ctx.successor.clone()),
    ])?;
    Ok(Box::new(LinkedListsScene {
        id: SceneId::from(LINKED_LISTS),
        sequencer,
        last_frame,
    }))
}

impl Scene for LinkedListsScene {
    fn id(&self) -> &SceneId {
        &self.id
    }

    fn start(&mut self) {
        self.sequencer.start();
    }

    fn tick(&mut self) -> SequencerSignal {
        self.sequencer.tick()
    }

    fn on_advance(&mut self) -> Result<SequencerSignal, EngineError> {
        self.sequencer.on_advance()
    }

    fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.fill(Color::BLACK);
        match self.sequencer.current_animator() {
            Some(video) => blit_opt(surface, video.current_frame(), Vec2::ZERO),
            None => blit_opt(surface, self.last_frame, Vec2::ZERO),
        }
        self.sequencer.draw_dialogue(surface);
    }
}

/// Looping map animation; runs until the user quits.
pub struct MapScene {
    id: SceneId,
    sequencer: SceneSequencer,
    position: Vec2,
}

pub fn map(ctx: &SceneContext) -> Result<Box<dyn Scene>, EngineError> {
    let frames = ctx.assets.frames("map", MAP_FRAMES);
    let position = centred(
        ctx.config.render_size(),
        frame_size(ctx.assets, &frames, (512.0, 384.0)),
    );
    let map = PhasedAnimator::new(
        vec![AnimationPhase::new("map", ExitCondition::Never)
            .with_frames(FrameCycle::looped(frames, MAP_FRAME_DELAY))],
        PhaseEnd::Hold,
    );
    let sequencer = SceneSequencer::new(vec![SceneBeat::animation_on_input(map)])?;
    Ok(Box::new(MapScene {
        id: SceneId::from(MAP),
        sequencer,
        position,
    }))
}

impl Scene for MapScene {
    fn id(&self) -> &SceneId {
        &self.id
    }

    fn start(&mut self) {
        self.sequencer.start();
    }

    fn tick(&mut self) -> SequencerSignal {
        self.sequencer.tick()
    }

    fn on_advance(&mut self) -> Result<SequencerSignal, EngineError> {
        self.sequencer.on_advance()
    }

    fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.fill(Color::BLACK);
        if let Some(map) = self.sequencer.current_animator() {
            blit_opt(surface, map.current_frame(), self.position);
        }
    }
}
