//! Per-tick driver systems.
//!
//! Run chained, in this order, once per frame:
//! [`advance_tick_clock`] → [`auto_advance_input`] → [`apply_engine_commands`]
//! → [`update_scene`] → [`check_scene_finished`], followed by
//! [`render_scene`](crate::systems::render::render_scene).
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::events::input::EngineCommand;
use crate::events::scene::SceneFinishedEvent;
use crate::resources::engineconfig::EngineConfig;
use crate::resources::input::CommandQueue;
use crate::resources::scenes::SceneDirector;
use crate::resources::tickclock::TickClock;

pub fn advance_tick_clock(mut clock: ResMut<TickClock>) {
    clock.advance();
}

/// Headless stand-in for a user: queue an advance every `auto_advance`
/// scene ticks. Disabled when the setting is zero.
pub fn auto_advance_input(
    clock: Res<TickClock>,
    config: Res<EngineConfig>,
    queue: Res<CommandQueue>,
) {
    let every = u64::from(config.auto_advance);
    if every > 0 && clock.scene_tick > 0 && clock.scene_tick % every == 0 {
        queue.push(EngineCommand::Advance);
    }
}

/// Drain the command queue into the running scene.
///
/// Once an advance finishes the scene, later advances from the same drain
/// go back on the queue so the successor receives them next tick.
pub fn apply_engine_commands(queue: Res<CommandQueue>, mut director: ResMut<SceneDirector>) {
    let mut carried = 0;
    for command in queue.drain() {
        match command {
            EngineCommand::Advance if director.is_finish_pending() => {
                queue.push(EngineCommand::Advance);
                carried += 1;
            }
            EngineCommand::Advance => {
                if let Err(e) = director.on_advance() {
                    warn!("Advance ignored: {}", e);
                }
            }
            EngineCommand::Quit => {
                info!("Quit requested");
                director.quit();
                return;
            }
        }
    }
    if carried > 0 {
        debug!("Carried {} advance(s) over to the next scene", carried);
    }
}

pub fn update_scene(mut director: ResMut<SceneDirector>) {
    director.tick();
}

/// Emit [`SceneFinishedEvent`] for a completion recorded this tick.
pub fn check_scene_finished(mut commands: Commands, mut director: ResMut<SceneDirector>) {
    if let Some(next) = director.take_finished() {
        commands.trigger(SceneFinishedEvent { next });
    }
}

/// Run condition: the director still has work to do.
pub fn director_is_running(director: Res<SceneDirector>) -> bool {
    !director.is_quit()
}
