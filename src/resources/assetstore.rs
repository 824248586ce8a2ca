//! Logical-name registry for pre-decoded visual assets.
//!
//! The collaborator's loading layer decodes images and registers each one
//! here under a logical name such as `"princess/idle/0"`, together with its
//! pixel size. Scenes resolve names to opaque [`AssetHandle`]s once, at
//! construction, and keep `Option<AssetHandle>`s: a `None` simply draws
//! nothing.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

use crate::error::EngineError;

/// Opaque handle to a decoded image owned by the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
struct AssetEntry {
    handle: AssetHandle,
    size: (f32, f32),
}

/// Central registry of asset handles keyed by logical name.
#[derive(Resource, Debug, Default, Clone)]
pub struct AssetStore {
    entries: FxHashMap<String, AssetEntry>,
    sizes: Vec<(f32, f32)>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset, returning its handle. Re-registering a name keeps
    /// the original handle and updates the size.
    pub fn register(&mut self, name: impl Into<String>, width: f32, height: f32) -> AssetHandle {
        let name = name.into();
        if let Some(entry) = self.entries.get_mut(&name) {
            entry.size = (width, height);
            self.sizes[entry.handle.0 as usize] = (width, height);
            return entry.handle;
        }
        let handle = AssetHandle(self.sizes.len() as u32);
        self.sizes.push((width, height));
        self.entries.insert(
            name,
            AssetEntry {
                handle,
                size: (width, height),
            },
        );
        handle
    }

    /// Look up a handle; `None` when the name was never registered.
    pub fn handle(&self, name: &str) -> Option<AssetHandle> {
        self.entries.get(name).map(|e| e.handle)
    }

    /// Look up a handle, reporting [`EngineError::AssetMissing`] so the
    /// caller can log the shortage.
    pub fn require(&self, name: &str) -> Result<AssetHandle, EngineError> {
        self.handle(name)
            .ok_or_else(|| EngineError::AssetMissing(name.to_string()))
    }

    /// Resolve `{prefix}/{i}` for `i` in `0..count`, keeping gaps as `None`.
    pub fn frames(&self, prefix: &str, count: usize) -> Vec<Option<AssetHandle>> {
        (0..count)
            .map(|i| self.handle(&format!("{prefix}/{i}")))
            .collect()
    }

    /// Pixel size of a registered handle.
    pub fn size(&self, handle: AssetHandle) -> Option<(f32, f32)> {
        self.sizes.get(handle.0 as usize).copied()
    }

    /// Pixel size by name, falling back to `default` when missing.
    pub fn size_or(&self, name: &str, default: (f32, f32)) -> (f32, f32) {
        self.entries.get(name).map(|e| e.size).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
