//! Advanced lesson: Dijkstra pursuit.
//!
//! Pacman plans a route across the lesson maze and walks it one cell per
//! step cadence, turning to face each move. A short summary follows; when
//! the goal cannot be reached the summary says so and Pacman stays put.

use glam::Vec2;
use rustc_hash::FxHashMap;

use crate::components::dialogue::DialogueScript;
use crate::components::pathfollower::Direction;
use crate::components::pursuit::Pursuit;
use crate::components::sequencer::{SceneBeat, SceneSequencer, SequencerSignal};
use crate::error::EngineError;
use crate::resources::assetstore::AssetHandle;
use crate::resources::grid::{Node, OccupancyGrid};
use crate::resources::scenes::{Scene, SceneContext, SceneId};
use crate::resources::surface::{Color, RenderSurface, blit_opt};
use crate::systems::pathplanner::plan;

pub const PACMAN: &str = "advanced.pacman";

pub const LESSON_GRID: [&str; 6] = [
    "......", //
    ".####.", //
    "...#..", //
    ".#...#", //
    "...#..", //
    "......", //
];
pub const LESSON_START: Node = Node { row: 0, col: 0 };
pub const LESSON_GOAL: Node = Node { row: 5, col: 5 };

const GAIT_FRAMES: usize = 3;
const BEAT_PURSUIT: usize = 0;

pub struct PacmanScene {
    id: SceneId,
    sequencer: SceneSequencer,
    tile: f32,
    origin: Vec2,
    block: Option<AssetHandle>,
    blocked: Vec<Node>,
    sprites: FxHashMap<Direction, Vec<Option<AssetHandle>>>,
}

pub fn pacman(ctx: &SceneContext) -> Result<Box<dyn Scene>, EngineError> {
    let grid = OccupancyGrid::parse(&LESSON_GRID)?;
    Ok(Box::new(PacmanScene::new(ctx, grid, LESSON_START, LESSON_GOAL)?))
}

/// Summary lines shown after the pursuit.
fn summary(grid: &OccupancyGrid, start: Node, goal: Node) -> Vec<String> {
    match plan(grid, start, goal) {
        Ok(path) => vec![
            format!(
                "Dijkstra found the shortest route: {} steps from {} to {}.",
                path.len() - 1,
                start,
                goal
            ),
            "Each step costs 1, so the first time the goal leaves the queue its distance is final."
                .to_string(),
        ],
        Err(e) => vec![
            format!("No route: {}.", e),
            "Every open cell reachable from the start was explored.".to_string(),
        ],
    }
}

impl PacmanScene {
    pub fn new(
        ctx: &SceneContext,
        grid: OccupancyGrid,
        start: Node,
        goal: Node,
    ) -> Result<Self, EngineError> {
        let config = ctx.config;
        let tile = config.tile_size as f32;
        let (w, h) = config.render_size();
        let origin = Vec2::new(
            (w - grid.cols() as f32 * tile) / 2.0,
            (h - grid.rows() as f32 * tile) / 2.0,
        );
        let sprites = Direction::ALL
            .iter()
            .map(|d| (*d, ctx.assets.frames(&format!("pacman/{}", d), GAIT_FRAMES)))
            .collect();
        let blocked = grid.blocked_cells().collect();

        let lines = summary(&grid, start, goal);
        let pursuit = Pursuit::new(grid, start, goal, config.follower_options(GAIT_FRAMES));
        let sequencer = SceneSequencer::new(vec![
            SceneBeat::pursuit(pursuit),
            SceneBeat::Dialogue(DialogueScript::from_lines(&lines, config.dialogue_options())),
            SceneBeat::Handoff(ctx.successor.clone()),
        ])?;

        Ok(Self {
            id: SceneId::from(PACMAN),
            sequencer,
            tile,
            origin,
            block: ctx.assets.handle("blocks/block"),
            blocked,
            sprites,
        })
    }

    pub fn pursuit(&self) -> Option<&Pursuit> {
        match self.sequencer.beat(BEAT_PURSUIT) {
            Ok(SceneBeat::Pursuit { pursuit, .. }) => Some(pursuit),
            _ => None,
        }
    }

    pub fn sequencer(&self) -> &SceneSequencer {
        &self.sequencer
    }

    fn cell_to_surface(&self, cell: Vec2) -> Vec2 {
        self.origin + cell * self.tile
    }
}

impl Scene for PacmanScene {
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
        for node in &self.blocked {
            let cell = Vec2::new(node.col as f32, node.row as f32);
            blit_opt(surface, self.block, self.cell_to_surface(cell));
        }
        if let Some(pursuit) = self.pursuit() {
            let sprite = self
                .sprites
                .get(&pursuit.direction())
                .and_then(|frames| frames.get(pursuit.gait_frame()))
                .copied()
                .flatten();
            blit_opt(surface, sprite, self.cell_to_surface(pursuit.position()));
        }
        self.sequencer.draw_dialogue(surface);
    }
}
