//! Engine tick integration tests: the chained per-tick schedule, scene swaps
//! through the scene-finished observer, command handling and rendering.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;

use choreoengine::components::sequencer::SequencerSignal;
use choreoengine::error::EngineError;
use choreoengine::events::input::EngineCommand;
use choreoengine::events::scene::observe_scene_finished;
use choreoengine::game::{intermediate, register_lesson_assets, register_lessons};
use choreoengine::resources::assetstore::AssetStore;
use choreoengine::resources::engineconfig::EngineConfig;
use choreoengine::resources::input::CommandQueue;
use choreoengine::resources::scenes::{Scene, SceneContext, SceneDirector, SceneId, SceneRegistry};
use choreoengine::resources::surface::{Color, FrameSurface, RenderSurface};
use choreoengine::resources::tickclock::TickClock;
use choreoengine::systems::render::render_scene;
use choreoengine::systems::tick::{
    advance_tick_clock, apply_engine_commands, auto_advance_input, check_scene_finished,
    director_is_running, update_scene,
};

/// Finishes after a fixed number of ticks, or on the first advance when
/// `on_input` is set.
struct Countdown {
    id: SceneId,
    left: u32,
    on_input: bool,
    next: Option<SceneId>,
    done: bool,
}

impl Countdown {
    fn boxed(id: &str, left: u32, on_input: bool, ctx: &SceneContext) -> Box<dyn Scene> {
        Box::new(Countdown {
            id: SceneId::from(id),
            left,
            on_input,
            next: ctx.successor.clone(),
            done: false,
        })
    }

    fn finish(&mut self) -> SequencerSignal {
        self.done = true;
        SequencerSignal::Finished(self.next.clone())
    }
}

impl Scene for Countdown {
    fn id(&self) -> &SceneId {
        &self.id
    }

    fn start(&mut self) {}

    fn tick(&mut self) -> SequencerSignal {
        if self.done || self.on_input {
            return SequencerSignal::Idle;
        }
        self.left = self.left.saturating_sub(1);
        if self.left == 0 {
            return self.finish();
        }
        SequencerSignal::Running
    }

    fn on_advance(&mut self) -> Result<SequencerSignal, EngineError> {
        if self.on_input && !self.done {
            return Ok(self.finish());
        }
        Ok(SequencerSignal::Running)
    }

    fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.fill(Color::BLACK);
    }
}

fn short(ctx: &SceneContext) -> Result<Box<dyn Scene>, EngineError> {
    Ok(Countdown::boxed("short", 3, false, ctx))
}

fn long(ctx: &SceneContext) -> Result<Box<dyn Scene>, EngineError> {
    Ok(Countdown::boxed("long", 5, false, ctx))
}

fn waiter(ctx: &SceneContext) -> Result<Box<dyn Scene>, EngineError> {
    Ok(Countdown::boxed("waiter", 0, true, ctx))
}

fn relay(ctx: &SceneContext) -> Result<Box<dyn Scene>, EngineError> {
    Ok(Countdown::boxed("relay", 0, true, ctx))
}

fn make_world(registry: SceneRegistry, assets: AssetStore, auto_advance: u32) -> World {
    let mut config = EngineConfig::new();
    config.auto_advance = auto_advance;
    let mut world = World::new();
    world.insert_resource(TickClock::default());
    world.insert_resource(CommandQueue::new());
    world.insert_resource(SceneDirector::new(registry));
    world.insert_resource(assets);
    world.insert_resource(config);
    world.insert_resource(FrameSurface::new(900.0, 700.0));
    world.spawn(Observer::new(observe_scene_finished));
    world.flush();
    world
}

fn start(world: &mut World, id: &str) {
    let id = SceneId::from(id);
    world
        .resource_scope(|world: &mut World, mut director: Mut<SceneDirector>| {
            director.start_scene(
                &id,
                world.resource::<AssetStore>(),
                world.resource::<EngineConfig>(),
            )
        })
        .unwrap();
}

fn make_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
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
    schedule
}

fn run(world: &mut World, schedule: &mut Schedule, ticks: u32) {
    for _ in 0..ticks {
        schedule.run(world);
    }
}

fn current_id(world: &World) -> Option<String> {
    world
        .resource::<SceneDirector>()
        .current_id()
        .map(|id| id.as_str().to_string())
}

fn chained_registry() -> SceneRegistry {
    let mut registry = SceneRegistry::new();
    registry
        .register("short", short, Some("long"))
        .register("long", long, None)
        .register("waiter", waiter, Some("short"));
    registry
}

#[test]
fn test_finished_scene_hands_off_to_successor() {
    let mut world = make_world(chained_registry(), AssetStore::new(), 0);
    start(&mut world, "short");
    let mut schedule = make_schedule();

    run(&mut world, &mut schedule, 2);
    assert_eq!(current_id(&world).as_deref(), Some("short"));
    assert_eq!(world.resource::<TickClock>().scene_tick, 2);

    run(&mut world, &mut schedule, 1);
    assert_eq!(current_id(&world).as_deref(), Some("long"));
    let clock = world.resource::<TickClock>();
    assert_eq!(clock.tick, 3);
    assert_eq!(clock.scene_tick, 0);
}

#[test]
fn test_last_scene_stops_the_driver() {
    let mut world = make_world(chained_registry(), AssetStore::new(), 0);
    start(&mut world, "short");
    let mut schedule = make_schedule();

    run(&mut world, &mut schedule, 20);
    let director = world.resource::<SceneDirector>();
    assert!(director.is_quit());
    assert!(director.current().is_none());
    assert_eq!(
        director.history(),
        &[SceneId::from("short"), SceneId::from("long")]
    );
    // 3 ticks of `short`, 5 of `long`, nothing after the quit.
    assert_eq!(world.resource::<TickClock>().tick, 8);
}

#[test]
fn test_quit_command_drops_scene() {
    let mut world = make_world(chained_registry(), AssetStore::new(), 0);
    start(&mut world, "long");
    let mut schedule = make_schedule();
    run(&mut world, &mut schedule, 1);

    let sender = world.resource::<CommandQueue>().sender();
    assert!(sender.send(EngineCommand::Quit));
    run(&mut world, &mut schedule, 1);

    let director = world.resource::<SceneDirector>();
    assert!(director.is_quit());
    assert!(director.current().is_none());
    assert_eq!(director.history(), &[SceneId::from("long")]);
}

#[test]
fn test_auto_advance_finishes_waiting_scene() {
    let mut world = make_world(chained_registry(), AssetStore::new(), 4);
    start(&mut world, "waiter");
    let mut schedule = make_schedule();

    run(&mut world, &mut schedule, 3);
    assert_eq!(current_id(&world).as_deref(), Some("waiter"));
    run(&mut world, &mut schedule, 1);
    assert_eq!(current_id(&world).as_deref(), Some("short"));
}

#[test]
fn test_manual_advance_through_queue() {
    let mut world = make_world(chained_registry(), AssetStore::new(), 0);
    start(&mut world, "waiter");
    let mut schedule = make_schedule();

    run(&mut world, &mut schedule, 50);
    assert_eq!(current_id(&world).as_deref(), Some("waiter"));

    world.resource::<CommandQueue>().push(EngineCommand::Advance);
    run(&mut world, &mut schedule, 1);
    assert_eq!(current_id(&world).as_deref(), Some("short"));
    assert!(world.resource::<CommandQueue>().is_empty());
}

#[test]
fn test_advances_after_finish_carry_to_next_scene() {
    let mut registry = SceneRegistry::new();
    registry
        .register("waiter", waiter, Some("relay"))
        .register("relay", relay, Some("short"))
        .register("short", short, None);
    let mut world = make_world(registry, AssetStore::new(), 0);
    start(&mut world, "waiter");
    let mut schedule = make_schedule();

    let queue = world.resource::<CommandQueue>();
    queue.push(EngineCommand::Advance);
    queue.push(EngineCommand::Advance);
    run(&mut world, &mut schedule, 1);
    // The second advance was not spent on the finished `waiter`.
    assert_eq!(current_id(&world).as_deref(), Some("relay"));
    assert_eq!(world.resource::<CommandQueue>().len(), 1);

    run(&mut world, &mut schedule, 1);
    assert_eq!(current_id(&world).as_deref(), Some("short"));
    assert!(world.resource::<CommandQueue>().is_empty());
    assert_eq!(
        world.resource::<SceneDirector>().history(),
        &[
            SceneId::from("waiter"),
            SceneId::from("relay"),
            SceneId::from("short"),
        ]
    );
}

#[test]
fn test_unknown_successor_stops_the_driver() {
    let mut registry = SceneRegistry::new();
    registry.register("short", short, Some("nowhere"));
    assert!(registry.validate().is_err());

    let mut world = make_world(registry, AssetStore::new(), 0);
    start(&mut world, "short");
    let mut schedule = make_schedule();
    run(&mut world, &mut schedule, 3);

    let director = world.resource::<SceneDirector>();
    assert!(director.is_quit());
    assert!(director.current().is_none());
}

#[test]
fn test_render_records_current_scene() {
    let mut assets = AssetStore::new();
    register_lesson_assets(&mut assets);
    let mut world = make_world(register_lessons(), assets, 0);
    start(&mut world, intermediate::OPENING);
    let mut schedule = make_schedule();

    run(&mut world, &mut schedule, 1);
    assert_eq!(world.resource::<FrameSurface>().blit_count(), 1);
    run(&mut world, &mut schedule, 1);
    // Each frame starts from an empty command list.
    assert_eq!(world.resource::<FrameSurface>().blit_count(), 1);
}

#[test]
fn test_intermediate_chapter_plays_through() {
    let mut assets = AssetStore::new();
    register_lesson_assets(&mut assets);
    let mut world = make_world(register_lessons(), assets, 45);
    start(&mut world, intermediate::OPENING);
    let mut schedule = make_schedule();

    for _ in 0..20_000 {
        if current_id(&world).as_deref() == Some(intermediate::MAP) {
            break;
        }
        schedule.run(&mut world);
    }

    let director = world.resource::<SceneDirector>();
    assert!(!director.is_quit());
    assert_eq!(
        director.history(),
        &[
            SceneId::from(intermediate::OPENING),
            SceneId::from(intermediate::DORA_ARRIVES),
            SceneId::from(intermediate::LINKED_LISTS),
            SceneId::from(intermediate::MAP),
        ]
    );
}
