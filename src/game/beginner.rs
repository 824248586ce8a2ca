//! Beginner lessons: the apple fall and the apple count.
//!
//! In the apple fall a five-line cued dialogue drives two actors. The
//! princess walks, trips (scattering apples) and stands up; Mario then walks
//! in from the bottom. When the dialogue ends a billboard is lowered to the
//! centre, paused and raised again, and the scene fades to black.
//!
//! The apple count opens with the same billboard. Once it is gone, five
//! apples stand in labelled boxes while Mario introduces arrays; the memory
//! addresses above the boxes show only while the two address lines play.

use glam::Vec2;
use log::debug;

use crate::components::animation::FrameCycle;
use crate::components::dialogue::{DialogueScript, TextSection};
use crate::components::phase::{AnimationPhase, ExitCondition, PhaseEnd, PhasedAnimator};
use crate::components::sequencer::{SceneBeat, SceneSequencer, SequencerSignal};
use crate::error::EngineError;
use crate::game::{alpha, frame_size, mid_bottom};
use crate::resources::assetstore::AssetHandle;
use crate::resources::scenes::{Scene, SceneContext, SceneId};
use crate::resources::surface::{Color, Rect, RenderSurface, TextAnchor, TextStyle, blit_opt};

pub const APPLE_FALL: &str = "beginner.apple_fall";
pub const APPLE_COUNT: &str = "beginner.apple_count";

const BEAT_DIALOGUE: usize = 0;
const BEAT_BILLBOARD: usize = 1;
const BEAT_FADE: usize = 2;

const PRINCESS_ANCHOR: Vec2 = Vec2::new(720.0, 422.0);
const MARIO_ANCHOR: Vec2 = Vec2::new(450.0, 700.0);
const MARIO_STOP_Y: f32 = 500.0;
const SCATTERED_APPLES: usize = 5;
/// Distinct apple images in the asset manifest.
const APPLE_VARIETIES: usize = 5;
const APPLE_AREA: (i32, i32, i32, i32) = (357, 304, 775, 513);
const APPLE_SPACING: i32 = 40;
const APPLE_ATTEMPTS: usize = 100;
const BILLBOARD_SPEED: f32 = 4.0;
const BILLBOARD_PAUSE: u32 = 60;
const FADE_STEP: u32 = 5;

const LINES: [(&str, &str); 5] = [
    (
        "Princess Peach: Hmm, uuu huuuu~ (happily walking with basket)",
        "princess_walk",
    ),
    ("Princess Peach: Aaaahhh!", "princess_fall"),
    ("Princess Peach: Oh no, my apples!", "princess_idle"),
    ("Mario: Ha-ha! It's-a me, Mario!", "mario_walk"),
    (
        "Mario: Don't-a worry, Princess Peach! I help-a you pick them up!",
        "mario_idle",
    ),
];

/// Pick apple centres inside `area`, keeping them apart on both axes. A
/// position that cannot be placed after the attempt budget is kept anyway.
pub fn scatter_apples(rng: &mut fastrand::Rng, count: usize) -> Vec<Vec2> {
    let (x1, y1, x2, y2) = APPLE_AREA;
    let mut placed: Vec<(i32, i32)> = Vec::with_capacity(count);
    for _ in 0..count {
        let mut candidate = (rng.i32(x1..=x2), rng.i32(y1..=y2));
        for _ in 1..APPLE_ATTEMPTS {
            let clear = placed.iter().all(|&(px, py)| {
                (candidate.0 - px).abs() > APPLE_SPACING && (candidate.1 - py).abs() > APPLE_SPACING
            });
            if clear {
                break;
            }
            candidate = (rng.i32(x1..=x2), rng.i32(y1..=y2));
        }
        placed.push(candidate);
    }
    placed
        .into_iter()
        .map(|(x, y)| Vec2::new(x as f32, y as f32))
        .collect()
}

/// Lower the billboard from above the top edge to the vertical centre, hold
/// it, then raise it out of view again.
fn billboard_pass(ctx: &SceneContext, billboard: Option<AssetHandle>) -> PhasedAnimator {
    let surface_h = ctx.config.render_size().1;
    let billboard_h = billboard
        .and_then(|h| ctx.assets.size(h))
        .map_or(360.0, |s| s.1);
    let above = Vec2::new(0.0, -billboard_h);
    let centre = Vec2::new(0.0, surface_h / 2.0 - billboard_h / 2.0);
    PhasedAnimator::new(
        vec![
            AnimationPhase::new("lower", ExitCondition::Reached(centre))
                .with_velocity(Vec2::new(0.0, BILLBOARD_SPEED)),
            AnimationPhase::new("pause", ExitCondition::Ticks(BILLBOARD_PAUSE)),
            AnimationPhase::new("raise", ExitCondition::Reached(above))
                .with_velocity(Vec2::new(0.0, -BILLBOARD_SPEED)),
        ],
        PhaseEnd::Complete,
    )
    .with_position(above)
}

struct Apple {
    image: Option<AssetHandle>,
    /// Top-left corner.
    pos: Vec2,
}

pub struct AppleFallScene {
    id: SceneId,
    sequencer: SceneSequencer,
    surface_size: (f32, f32),
    background: Option<AssetHandle>,
    billboard: Option<AssetHandle>,
    apple_images: Vec<Option<AssetHandle>>,
    apple_size: (f32, f32),
    apples: Vec<Apple>,
    rng: fastrand::Rng,
    princess: PhasedAnimator,
    mario: PhasedAnimator,
}

pub fn apple_fall(ctx: &SceneContext) -> Result<Box<dyn Scene>, EngineError> {
    Ok(Box::new(AppleFallScene::new(ctx)?))
}

impl AppleFallScene {
    pub fn new(ctx: &SceneContext) -> Result<Self, EngineError> {
        let assets = ctx.assets;
        let surface_size = ctx.config.render_size();

        let options = ctx.config.dialogue_options().with_margin(70.0);
        let sections = LINES
            .iter()
            .map(|(text, cue)| TextSection::new(*text, options.speed).with_cue(*cue))
            .collect();
        let dialogue = DialogueScript::new(sections, options);

        let billboard = assets.handle("bg/billboard");
        let billboard_anim = billboard_pass(ctx, billboard);

        let fade = PhasedAnimator::new(
            vec![AnimationPhase::new(
                "fade",
                ExitCondition::Ticks(255 / FADE_STEP),
            )],
            PhaseEnd::Complete,
        );

        let sequencer = SceneSequencer::new(vec![
            SceneBeat::Dialogue(dialogue),
            SceneBeat::animation(billboard_anim),
            SceneBeat::animation(fade),
            SceneBeat::Handoff(ctx.successor.clone()),
        ])?;

        let idle = assets.frames("princess/idle", 4);
        let fall = assets.frames("princess/fall", 4);
        let princess_pos = mid_bottom(PRINCESS_ANCHOR, frame_size(assets, &idle, (96.0, 128.0)));
        let princess = PhasedAnimator::new(
            vec![
                AnimationPhase::new("princess_walk", ExitCondition::External)
                    .with_velocity(Vec2::new(-2.0, 0.0))
                    .with_frames(FrameCycle::looped(idle.clone(), 11)),
                AnimationPhase::new("princess_fall", ExitCondition::External)
                    .with_frames(FrameCycle::once(fall, 9)),
                AnimationPhase::new("princess_idle", ExitCondition::External)
                    .with_frames(FrameCycle::looped(idle, 16)),
            ],
            PhaseEnd::Hold,
        )
        .with_position(princess_pos);

        let up = assets.frames("mario/up", 4);
        let mario_pos = mid_bottom(MARIO_ANCHOR, frame_size(assets, &up, (64.0, 96.0)));
        let standing = up.first().copied().into_iter().collect();
        let mario = PhasedAnimator::new(
            vec![
                AnimationPhase::new("hidden", ExitCondition::External),
                AnimationPhase::new(
                    "walk",
                    ExitCondition::Reached(Vec2::new(mario_pos.x, MARIO_STOP_Y)),
                )
                .with_velocity(Vec2::new(0.0, -2.0))
                .with_frames(FrameCycle::looped(up, 11)),
                AnimationPhase::new("stand", ExitCondition::Never)
                    .with_frames(FrameCycle::looped(standing, 1)),
            ],
            PhaseEnd::Hold,
        )
        .with_position(mario_pos);

        let apple_images = assets.frames("apples", APPLE_VARIETIES);
        let apple_size = frame_size(assets, &apple_images, (40.0, 40.0));

        Ok(Self {
            id: SceneId::from(APPLE_FALL),
            sequencer,
            surface_size,
            background: assets.handle("bg/apple_fall"),
            billboard,
            apple_images,
            apple_size,
            apples: Vec::new(),
            rng: fastrand::Rng::with_seed(ctx.config.seed),
            princess,
            mario,
        })
    }

    fn spawn_apples(&mut self) {
        let (w, h) = self.apple_size;
        let centres = scatter_apples(&mut self.rng, SCATTERED_APPLES);
        for centre in centres {
            let image = if self.apple_images.is_empty() {
                None
            } else {
                self.apple_images[self.rng.usize(..self.apple_images.len())]
            };
            self.apples.push(Apple {
                image,
                pos: Vec2::new(centre.x - w / 2.0, centre.y - h / 2.0),
            });
        }
        debug!("Scattered {} apples", self.apples.len());
    }

    fn animate_actors(&mut self) {
        let cue = self.sequencer.current_cue().map(str::to_owned);
        let cue = cue.as_deref();
        self.princess.tick_with(|phase, _| cue != Some(phase.name.as_str()));
        self.mario
            .tick_with(|_, _| matches!(cue, Some("mario_walk") | Some("mario_idle")));
        if self.apples.is_empty() && self.princess.phase_name() == Some("princess_fall") {
            self.spawn_apples();
        }
    }

    fn draw_actors(&self, surface: &mut dyn RenderSurface) {
        for apple in &self.apples {
            blit_opt(surface, apple.image, apple.pos);
        }
        blit_opt(surface, self.princess.current_frame(), self.princess.position());
        if self.mario.phase_name() != Some("hidden") {
            blit_opt(surface, self.mario.current_frame(), self.mario.position());
        }
    }

    pub fn apples(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.apples.iter().map(|a| a.pos)
    }

    pub fn sequencer(&self) -> &SceneSequencer {
        &self.sequencer
    }

    pub fn princess(&self) -> &PhasedAnimator {
        &self.princess
    }

    pub fn mario(&self) -> &PhasedAnimator {
        &self.mario
    }
}

impl Scene for AppleFallScene {
    fn id(&self) -> &SceneId {
        &self.id
    }

    fn start(&mut self) {
        self.princess.start();
        self.mario.start();
        self.sequencer.start();
    }

    fn tick(&mut self) -> SequencerSignal {
        if self.sequencer.is_started()
            && !self.sequencer.is_finished()
            && self.sequencer.cursor() == BEAT_DIALOGUE
        {
            self.animate_actors();
        }
        self.sequencer.tick()
    }

    fn on_advance(&mut self) -> Result<SequencerSignal, EngineError> {
        self.sequencer.on_advance()
    }

    fn draw(&self, surface: &mut dyn RenderSurface) {
        blit_opt(surface, self.background, Vec2::ZERO);
        if self.sequencer.is_finished() {
            return;
        }
        match self.sequencer.cursor() {
            BEAT_DIALOGUE => {
                self.draw_actors(surface);
                self.sequencer.draw_dialogue(surface);
            }
            BEAT_BILLBOARD => {
                if let Some(board) = self.sequencer.current_animator() {
                    blit_opt(surface, self.billboard, board.position());
                }
            }
            BEAT_FADE => {
                self.draw_actors(surface);
                if let Some(fade) = self.sequencer.current_animator() {
                    let (w, h) = self.surface_size;
                    surface.draw_rect(
                        Rect {
                            x: 0.0,
                            y: 0.0,
                            w,
                            h,
                        },
                        Color::BLACK.with_alpha(alpha(fade.phase_progress())),
                    );
                }
            }
            _ => {}
        }
    }
}

const COUNT_BEAT_BILLBOARD: usize = 0;
const COUNT_BEAT_DIALOGUE: usize = 1;

const ADDRESS_CUE: &str = "addresses";
const ADDRESSES: [&str; 5] = ["1001", "1002", "1003", "1004", "1005"];
const ELEMENT_START_X: f32 = 150.0;
const ELEMENT_STEP_X: f32 = 140.0;
const ELEMENT_Y: f32 = 350.0;
const ELEMENT_SIZE: f32 = 100.0;
/// Box padding around each apple; the bottom keeps room for the label.
const BOX_PAD: f32 = 10.0;
const BOX_LABEL_ROOM: f32 = 30.0;
const BOX_BORDER: f32 = 2.0;
const COUNT_BACKGROUND: Color = Color::rgb(30, 30, 50);
const ADDRESS_COLOR: Color = Color::rgb(255, 255, 0);

const COUNT_LINES: [(&str, Option<&str>); 6] = [
    ("Let's learn Array Basics", None),
    ("First, array consist of elements of same data type", None),
    (
        "It allows us to store multiple elements in one variable name",
        None,
    ),
    (
        "The catch is it has different address location",
        Some(ADDRESS_CUE),
    ),
    (
        "You see the addresses of each array element here?",
        Some(ADDRESS_CUE),
    ),
    (
        "They are not same but yet have sequential memory locations",
        None,
    ),
];

/// One array element on screen: an apple in a labelled box.
struct Element {
    image: Option<AssetHandle>,
    label: String,
    centre: Vec2,
}

impl Element {
    fn bounds(&self) -> Rect {
        let half = ELEMENT_SIZE / 2.0;
        Rect {
            x: self.centre.x - half - BOX_PAD,
            y: self.centre.y - half - BOX_PAD,
            w: ELEMENT_SIZE + 2.0 * BOX_PAD,
            h: ELEMENT_SIZE + 2.0 * BOX_PAD + BOX_LABEL_ROOM,
        }
    }
}

/// Draw the border of `rect` as four filled strips.
fn outline(surface: &mut dyn RenderSurface, rect: Rect, width: f32, color: Color) {
    let Rect { x, y, w, h } = rect;
    for edge in [
        Rect { x, y, w, h: width },
        Rect {
            x,
            y: y + h - width,
            w,
            h: width,
        },
        Rect { x, y, w: width, h },
        Rect {
            x: x + w - width,
            y,
            w: width,
            h,
        },
    ] {
        surface.draw_rect(edge, color);
    }
}

pub struct AppleCountScene {
    id: SceneId,
    sequencer: SceneSequencer,
    billboard: Option<AssetHandle>,
    elements: Vec<Element>,
}

pub fn apple_count(ctx: &SceneContext) -> Result<Box<dyn Scene>, EngineError> {
    Ok(Box::new(AppleCountScene::new(ctx)?))
}

impl AppleCountScene {
    pub fn new(ctx: &SceneContext) -> Result<Self, EngineError> {
        let assets = ctx.assets;
        let options = ctx.config.dialogue_options().with_margin(70.0);
        let sections = COUNT_LINES
            .iter()
            .map(|&(text, cue)| {
                let section = TextSection::new(text, options.speed);
                match cue {
                    Some(cue) => section.with_cue(cue),
                    None => section,
                }
            })
            .collect();
        let dialogue = DialogueScript::new(sections, options);

        let billboard = assets.handle("bg/billboard");
        // Advance input is ignored until the billboard beat is over.
        let sequencer = SceneSequencer::new(vec![
            SceneBeat::animation(billboard_pass(ctx, billboard)),
            SceneBeat::Dialogue(dialogue),
            SceneBeat::Handoff(ctx.successor.clone()),
        ])?;

        let elements = assets
            .frames("apples", APPLE_VARIETIES)
            .into_iter()
            .enumerate()
            .map(|(i, image)| Element {
                image,
                label: format!("apples/{i}"),
                centre: Vec2::new(ELEMENT_START_X + ELEMENT_STEP_X * i as f32, ELEMENT_Y),
            })
            .collect();

        Ok(Self {
            id: SceneId::from(APPLE_COUNT),
            sequencer,
            billboard,
            elements,
        })
    }

    /// True while a dialogue line about memory addresses is active.
    pub fn addresses_visible(&self) -> bool {
        self.sequencer.current_cue() == Some(ADDRESS_CUE)
    }

    pub fn sequencer(&self) -> &SceneSequencer {
        &self.sequencer
    }

    fn draw_elements(&self, surface: &mut dyn RenderSurface) {
        let label_style = TextStyle {
            size: 22.0,
            anchor: TextAnchor::Center,
            ..TextStyle::default()
        };
        let address_style = TextStyle {
            color: ADDRESS_COLOR,
            anchor: TextAnchor::MidBottom,
            ..label_style
        };
        let show_addresses = self.addresses_visible();
        let half = ELEMENT_SIZE / 2.0;
        for (element, address) in self.elements.iter().zip(ADDRESSES) {
            let bounds = element.bounds();
            outline(surface, bounds, BOX_BORDER, Color::WHITE);
            blit_opt(surface, element.image, element.centre - Vec2::splat(half));
            let label_at = Vec2::new(
                element.centre.x,
                element.centre.y + half + 5.0 + label_style.size / 2.0,
            );
            surface.draw_text(&element.label, label_at, &label_style);
            if show_addresses {
                let above = Vec2::new(element.centre.x, bounds.y - 5.0);
                surface.draw_text(address, above, &address_style);
            }
        }
    }
}

impl Scene for AppleCountScene {
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
        surface.fill(COUNT_BACKGROUND);
        if self.sequencer.is_finished() {
            return;
        }
        match self.sequencer.cursor() {
            COUNT_BEAT_BILLBOARD => {
                if let Some(board) = self.sequencer.current_animator() {
                    blit_opt(surface, self.billboard, board.position());
                }
            }
            COUNT_BEAT_DIALOGUE => {
                let header = TextStyle {
                    size: 36.0,
                    ..TextStyle::default()
                };
                surface.draw_text("Intro to Array", Vec2::new(20.0, 20.0), &header);
                self.draw_elements(surface);
                self.sequencer.draw_dialogue(surface);
            }
            _ => {}
        }
    }
}
