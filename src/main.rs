//! Choreoengine headless driver.
//!
//! Runs the lesson scenes at a fixed tick rate without a window:
//!
//! 1. Load `config.ini` (missing keys keep their defaults)
//! 2. Build the ECS world: clock, command queue, asset store, scene director
//! 3. Register the scene-finished observer and start the first scene
//! 4. Run the chained per-tick schedule until a scene ends without a
//!    successor, a quit is requested, or the tick limit is hit
//!
//! Advance input comes from the `auto_advance` setting, which queues one
//! advance every N scene ticks.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --scene intermediate.opening --auto-advance 30
//! cargo run --release -- --plan grid.json
//! ```

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::{info, warn};
use std::path::{Path, PathBuf};

use choreoengine::events::scene::observe_scene_finished;
use choreoengine::game::{register_lesson_assets, register_lessons};
use choreoengine::resources::assetstore::AssetStore;
use choreoengine::resources::engineconfig::EngineConfig;
use choreoengine::resources::grid::GridSpec;
use choreoengine::resources::input::CommandQueue;
use choreoengine::resources::scenes::{SceneDirector, SceneId};
use choreoengine::resources::surface::FrameSurface;
use choreoengine::resources::tickclock::TickClock;
use choreoengine::systems::pathplanner::plan;
use choreoengine::systems::render::render_scene;
use choreoengine::systems::tick::{
    advance_tick_clock, apply_engine_commands, auto_advance_input, check_scene_finished,
    director_is_running, update_scene,
};

/// Frame-clocked choreography engine
#[derive(Parser)]
#[command(version, about = "Plays scripted lesson scenes on a fixed tick clock.")]
struct Cli {
    /// Configuration file to read.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Scene to start with, overriding `[driver] start_scene`.
    #[arg(long, value_name = "ID")]
    scene: Option<String>,

    /// Stop after this many ticks, overriding `[driver] max_ticks`.
    #[arg(long, value_name = "TICKS")]
    max_ticks: Option<u64>,

    /// Queue an advance every N scene ticks (0 disables).
    #[arg(long, value_name = "N")]
    auto_advance: Option<u32>,

    /// Print the registered scenes with their successors and exit.
    #[arg(long)]
    list_scenes: bool,

    /// Plan a route over a JSON grid description, print it and exit.
    #[arg(long, value_name = "GRID_JSON")]
    plan: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Early exits that need no world
    if cli.list_scenes {
        let registry = register_lessons();
        for id in registry.ids() {
            match registry.successor(id) {
                Ok(Some(next)) => println!("{id} -> {next}"),
                _ => println!("{id}"),
            }
        }
        return;
    }
    if let Some(path) = cli.plan.as_deref() {
        match plan_from_file(path) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let mut config = EngineConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("Could not load config: {}. Using defaults.", e);
    }
    if let Some(scene) = cli.scene {
        config.start_scene = scene;
    }
    if let Some(max_ticks) = cli.max_ticks {
        config.max_ticks = max_ticks;
    }
    if let Some(every) = cli.auto_advance {
        config.auto_advance = every;
    }

    let registry = register_lessons();
    if let Err(e) = registry.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let mut assets = AssetStore::new();
    let loaded = register_lesson_assets(&mut assets);
    info!("Registered {} asset handles", loaded);

    let (width, height) = config.render_size();
    let start = SceneId::new(config.start_scene.clone());
    let max_ticks = config.max_ticks;

    let mut world = World::new();
    world.insert_resource(TickClock::default().with_tick_rate(config.tick_rate));
    world.insert_resource(CommandQueue::new());
    world.insert_resource(SceneDirector::new(registry));
    world.insert_resource(assets);
    world.insert_resource(config);
    world.insert_resource(FrameSurface::new(width, height));

    world.spawn(Observer::new(observe_scene_finished));
    world.flush();

    let started = world.resource_scope(|world: &mut World, mut director: Mut<SceneDirector>| {
        director.start_scene(
            &start,
            world.resource::<AssetStore>(),
            world.resource::<EngineConfig>(),
        )
    });
    if let Err(e) = started {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let mut update = Schedule::default();
    update.add_systems(
        (
            advance_tick_clock,
            auto_advance_input,
            apply_engine_commands,
            update_scene,
            check_scene_finished,
            render_scene,
        )
            .chain()
            .run_if(director_is_running),
    );

    // Main loop
    while !world.resource::<SceneDirector>().is_quit()
        && world.resource::<TickClock>().tick < max_ticks
    {
        update.run(&mut world);
        world.clear_trackers();
    }

    let clock = *world.resource::<TickClock>();
    let director = world.resource::<SceneDirector>();
    let played: Vec<&str> = director.history().iter().map(SceneId::as_str).collect();
    info!(
        "Stopped after {} ticks ({:.1}s): {}",
        clock.tick,
        clock.elapsed_seconds(),
        played.join(" -> ")
    );
}

/// Read a [`GridSpec`] from `path`, plan it and render the result as JSON.
fn plan_from_file(path: &Path) -> Result<String, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let spec: GridSpec = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;
    let grid = spec.grid().map_err(|e| e.to_string())?;
    let route = plan(&grid, spec.start, spec.goal).map_err(|e| e.to_string())?;
    let report = serde_json::json!({
        "start": spec.start,
        "goal": spec.goal,
        "steps": route.len() - 1,
        "path": route,
    });
    serde_json::to_string_pretty(&report).map_err(|e| e.to_string())
}
