//! Scene registry and the director that owns the running scene.
//!
//! Scenes are registered by id together with a factory and the id of the
//! scene that follows them. The [`SceneDirector`] resource owns exactly one
//! live scene at a time; switching is a sequential replace: the old scene
//! is dropped before the new one is built and started. Scenes never reach
//! into each other.

use std::fmt;

use bevy_ecs::prelude::*;
use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::components::sequencer::SequencerSignal;
use crate::error::EngineError;
use crate::resources::assetstore::AssetStore;
use crate::resources::engineconfig::EngineConfig;
use crate::resources::surface::RenderSurface;

/// Registry key of a scene, e.g. `"intermediate.map"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        SceneId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SceneId {
    fn from(id: &str) -> Self {
        SceneId(id.to_string())
    }
}

impl From<String> for SceneId {
    fn from(id: String) -> Self {
        SceneId(id)
    }
}

/// A running lesson. Implementations own their engine instances and asset
/// handles.
pub trait Scene: Send + Sync {
    fn id(&self) -> &SceneId;
    /// Called once, right after construction.
    fn start(&mut self);
    /// Advance one tick. [`SequencerSignal::Finished`] is reported once.
    fn tick(&mut self) -> SequencerSignal;
    fn on_advance(&mut self) -> Result<SequencerSignal, EngineError>;
    fn draw(&self, surface: &mut dyn RenderSurface);
}

/// Everything a factory may read while building a scene.
pub struct SceneContext<'a> {
    pub assets: &'a AssetStore,
    pub config: &'a EngineConfig,
    /// Scene that follows this one according to the registry.
    pub successor: Option<SceneId>,
}

pub type SceneFactory = fn(&SceneContext) -> Result<Box<dyn Scene>, EngineError>;

#[derive(Clone)]
struct SceneEntry {
    factory: SceneFactory,
    successor: Option<SceneId>,
}

/// Transition table: scene id to factory and successor.
#[derive(Clone, Default)]
pub struct SceneRegistry {
    entries: FxHashMap<SceneId, SceneEntry>,
    order: Vec<SceneId>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        id: impl Into<SceneId>,
        factory: SceneFactory,
        successor: Option<&str>,
    ) -> &mut Self {
        let id = id.into();
        if !self.entries.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.entries.insert(
            id,
            SceneEntry {
                factory,
                successor: successor.map(SceneId::from),
            },
        );
        self
    }

    pub fn contains(&self, id: &SceneId) -> bool {
        self.entries.contains_key(id)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &SceneId> {
        self.order.iter()
    }

    pub fn successor(&self, id: &SceneId) -> Result<Option<&SceneId>, EngineError> {
        self.entries
            .get(id)
            .map(|e| e.successor.as_ref())
            .ok_or_else(|| EngineError::UnknownScene(id.clone()))
    }

    /// Fails on the first successor that names an unregistered scene.
    pub fn validate(&self) -> Result<(), EngineError> {
        for id in &self.order {
            match self.successor(id)? {
                Some(next) if !self.contains(next) => {
                    return Err(EngineError::UnknownScene(next.clone()));
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn instantiate(
        &self,
        id: &SceneId,
        assets: &AssetStore,
        config: &EngineConfig,
    ) -> Result<Box<dyn Scene>, EngineError> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| EngineError::UnknownScene(id.clone()))?;
        let context = SceneContext {
            assets,
            config,
            successor: entry.successor.clone(),
        };
        (entry.factory)(&context)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Owner of the running scene.
#[derive(Resource)]
pub struct SceneDirector {
    registry: SceneRegistry,
    current: Option<Box<dyn Scene>>,
    /// Set when the current scene reported completion and the swap has not
    /// happened yet. The inner value is the successor.
    finished: Option<Option<SceneId>>,
    quit: bool,
    history: Vec<SceneId>,
}

impl SceneDirector {
    pub fn new(registry: SceneRegistry) -> Self {
        Self {
            registry,
            current: None,
            finished: None,
            quit: false,
            history: Vec::new(),
        }
    }

    /// Drop the current scene, then build and start `id`.
    pub fn start_scene(
        &mut self,
        id: &SceneId,
        assets: &AssetStore,
        config: &EngineConfig,
    ) -> Result<(), EngineError> {
        self.current = None;
        self.finished = None;
        let mut scene = self.registry.instantiate(id, assets, config)?;
        scene.start();
        info!("Scene '{}' started", id);
        self.history.push(id.clone());
        self.current = Some(scene);
        Ok(())
    }

    /// Tick the current scene and remember a completion for the swap.
    pub fn tick(&mut self) -> SequencerSignal {
        let Some(scene) = self.current.as_mut() else {
            return SequencerSignal::Idle;
        };
        let signal = scene.tick();
        self.note(&signal);
        signal
    }

    pub fn on_advance(&mut self) -> Result<SequencerSignal, EngineError> {
        let Some(scene) = self.current.as_mut() else {
            return Ok(SequencerSignal::Idle);
        };
        let signal = scene.on_advance()?;
        self.note(&signal);
        Ok(signal)
    }

    fn note(&mut self, signal: &SequencerSignal) {
        if let SequencerSignal::Finished(next) = signal {
            if let Some(scene) = self.current.as_ref() {
                info!("Scene '{}' finished", scene.id());
            }
            self.finished = Some(next.clone());
        }
    }

    /// Take a pending completion. `Some(None)` means the scene ended with no
    /// successor.
    pub fn take_finished(&mut self) -> Option<Option<SceneId>> {
        self.finished.take()
    }

    /// True between a scene's completion and the swap to its successor.
    pub fn is_finish_pending(&self) -> bool {
        self.finished.is_some()
    }

    /// Drop the current scene immediately and stop.
    pub fn quit(&mut self) {
        if let Some(scene) = self.current.take() {
            debug!("Dropping scene '{}' on quit", scene.id());
        }
        self.finished = None;
        self.quit = true;
    }

    pub fn is_quit(&self) -> bool {
        self.quit
    }

    pub fn current(&self) -> Option<&dyn Scene> {
        self.current.as_deref()
    }

    pub fn current_id(&self) -> Option<&SceneId> {
        self.current.as_ref().map(|s| s.id())
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// Ids of every scene started so far, oldest first.
    pub fn history(&self) -> &[SceneId] {
        &self.history
    }

    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        if let Some(scene) = self.current.as_ref() {
            scene.draw(surface);
        }
    }
}
