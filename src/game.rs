//! Lesson scenes and their transition table.
//!
//! Each lesson is a [`Scene`](crate::resources::scenes::Scene) built from a
//! [`SceneSequencer`](crate::components::sequencer::SceneSequencer) plus the
//! actors it drives. [`register_lessons`] wires every lesson into a
//! [`SceneRegistry`] together with its successor, and
//! [`register_lesson_assets`] fills an [`AssetStore`] with the logical names
//! the lessons look up.
//!
//! | id | successor |
//! |----|-----------|
//! | `beginner.apple_fall` | `beginner.apple_count` |
//! | `beginner.apple_count` | – |
//! | `intermediate.opening` | `intermediate.dora_arrives` |
//! | `intermediate.dora_arrives` | `intermediate.linked_lists` |
//! | `intermediate.linked_lists` | `intermediate.map` |
//! | `intermediate.map` | – |
//! | `advanced.pacman` | – |

pub mod advanced;
pub mod beginner;
pub mod intermediate;

use glam::Vec2;

use crate::resources::assetstore::{AssetHandle, AssetStore};
use crate::resources::scenes::SceneRegistry;

/// One entry of the asset manifest. `frames == 0` registers `name` itself,
/// otherwise `name/0` .. `name/{frames - 1}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetSpec {
    pub name: &'static str,
    pub frames: usize,
    pub width: f32,
    pub height: f32,
}

const fn spec(name: &'static str, frames: usize, width: f32, height: f32) -> AssetSpec {
    AssetSpec {
        name,
        frames,
        width,
        height,
    }
}

/// Logical names and pixel sizes of every asset the lessons use.
pub const LESSON_ASSETS: &[AssetSpec] = &[
    // beginner
    spec("bg/apple_fall", 0, 900.0, 700.0),
    spec("bg/billboard", 0, 600.0, 360.0),
    spec("apples", 5, 40.0, 40.0),
    spec("princess/idle", 4, 96.0, 128.0),
    spec("princess/fall", 4, 128.0, 96.0),
    spec("mario/up", 4, 64.0, 96.0),
    // intermediate
    spec("bg/opening", 0, 900.0, 700.0),
    spec("bg/forest", 0, 900.0, 700.0),
    spec("dora", 3, 192.0, 288.0),
    spec("video/stage1", 149, 900.0, 700.0),
    spec("map", 16, 512.0, 384.0),
    // advanced
    spec("blocks/block", 0, 32.0, 32.0),
    spec("pacman/up", 3, 32.0, 32.0),
    spec("pacman/down", 3, 32.0, 32.0),
    spec("pacman/left", 3, 32.0, 32.0),
    spec("pacman/right", 3, 32.0, 32.0),
];

/// Register every lesson asset name. Returns the number of handles added.
pub fn register_lesson_assets(store: &mut AssetStore) -> usize {
    let before = store.len();
    for asset in LESSON_ASSETS {
        if asset.frames == 0 {
            store.register(asset.name, asset.width, asset.height);
        } else {
            for i in 0..asset.frames {
                store.register(format!("{}/{}", asset.name, i), asset.width, asset.height);
            }
        }
    }
    store.len() - before
}

/// Transition table of all lessons.
pub fn register_lessons() -> SceneRegistry {
    let mut registry = SceneRegistry::new();
    registry
        .register(
            beginner::APPLE_FALL,
            beginner::apple_fall,
            Some(beginner::APPLE_COUNT),
        )
        .register(beginner::APPLE_COUNT, beginner::apple_count, None)
        .register(
            intermediate::OPENING,
            intermediate::opening,
            Some(intermediate::DORA_ARRIVES),
        )
        .register(
            intermediate::DORA_ARRIVES,
            intermediate::dora_arrives,
            Some(intermediate::LINKED_LISTS),
        )
        .register(
            intermediate::LINKED_LISTS,
            intermediate::linked_lists,
            Some(intermediate::MAP),
        )
        .register(intermediate::MAP, intermediate::map, None)
        .register(advanced::PACMAN, advanced::pacman, None);
    registry
}

/// Top-left corner that puts an image's mid-bottom point at `anchor`.
pub(crate) fn mid_bottom(anchor: Vec2, size: (f32, f32)) -> Vec2 {
    Vec2::new(anchor.x - size.0 / 2.0, anchor.y - size.1)
}

/// Top-left corner that centres an image on a surface.
pub(crate) fn centred(surface: (f32, f32), size: (f32, f32)) -> Vec2 {
    Vec2::new((surface.0 - size.0) / 2.0, (surface.1 - size.1) / 2.0)
}

/// Size of the first frame of a list, or `fallback` when it is missing.
pub(crate) fn frame_size(
    assets: &AssetStore,
    frames: &[Option<AssetHandle>],
    fallback: (f32, f32),
) -> (f32, f32) {
    frames
        .first()
        .copied()
        .flatten()
        .and_then(|h| assets.size(h))
        .unwrap_or(fallback)
}

/// Map a fraction in [0, 1] to an alpha value.
pub(crate) fn alpha(fraction: f32) -> u8 {
    (fraction.clamp(0.0, 1.0) * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::engineconfig::EngineConfig;
    use crate::resources::scenes::SceneId;

    #[test]
    fn test_registry_is_consistent() {
        let registry = register_lessons();
        assert_eq!(registry.len(), 7);
        assert!(registry.validate().is_ok());
        assert_eq!(
            registry
                .successor(&SceneId::from(beginner::APPLE_FALL))
                .unwrap(),
            Some(&SceneId::from(beginner::APPLE_COUNT))
        );
        assert_eq!(
            registry
                .successor(&SceneId::from(intermediate::LINKED_LISTS))
                .unwrap(),
            Some(&SceneId::from(intermediate::MAP))
        );
    }

    #[test]
    fn test_every_lesson_builds_with_and_without_assets() {
        let registry = register_lessons();
        let config = EngineConfig::new();
        let mut full = AssetStore::new();
        register_lesson_assets(&mut full);
        for store in [AssetStore::new(), full] {
            for id in registry.ids() {
                let scene = registry.instantiate(id, &store, &config).unwrap();
                assert_eq!(scene.id(), id);
            }
        }
    }

    #[test]
    fn test_manifest_registers_frames() {
        let mut store = AssetStore::new();
        let added = register_lesson_assets(&mut store);
        assert_eq!(added, store.len());
        assert!(store.handle("video/stage1/148").is_some());
        assert!(store.handle("pacman/left/2").is_some());
        assert!(store.handle("bg/billboard").is_some());
        assert_eq!(register_lesson_assets(&mut store), 0);
    }

    #[test]
    fn test_alpha_clamps() {
        assert_eq!(alpha(-1.0), 0);
        assert_eq!(alpha(0.5), 127);
        assert_eq!(alpha(2.0), 255);
    }
}
