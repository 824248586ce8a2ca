//! Scene completion event and observer.
//!
//! [`check_scene_finished`](crate::systems::tick::check_scene_finished)
//! triggers a [`SceneFinishedEvent`] when the running scene reports
//! completion. The observer in this module performs the swap: it looks the
//! successor up in the registry, drops the finished scene, and starts the
//! new one. A scene with no successor ends the run.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::resources::assetstore::AssetStore;
use crate::resources::engineconfig::EngineConfig;
use crate::resources::scenes::{SceneDirector, SceneId};
use crate::resources::tickclock::TickClock;

/// The running scene finished; `next` is its successor, if any.
#[derive(Event, Debug, Clone)]
pub struct SceneFinishedEvent {
    pub next: Option<SceneId>,
}

/// Observer that swaps scenes after completion.
///
/// An unknown successor is logged and stops the run, as does the end of the
/// lesson chain.
pub fn observe_scene_finished(
    trigger: On<SceneFinishedEvent>,
    mut director: ResMut<SceneDirector>,
    mut clock: ResMut<TickClock>,
    assets: Res<AssetStore>,
    config: Res<EngineConfig>,
) {
    let Some(next) = trigger.event().next.clone() else {
        info!("Last scene finished after {} ticks", clock.tick);
        director.quit();
        return;
    };
    match director.start_scene(&next, &assets, &config) {
        Ok(()) => clock.reset_scene(),
        Err(e) => {
            warn!("Cannot start scene '{}': {}", next, e);
            director.quit();
        }
    }
}
