//! Frame rendering into the recording surface.
use bevy_ecs::prelude::*;
use log::trace;

use crate::resources::scenes::SceneDirector;
use crate::resources::surface::{Color, FrameSurface, RenderSurface};

/// Clear the frame and let the running scene draw itself.
pub fn render_scene(director: Res<SceneDirector>, mut surface: ResMut<FrameSurface>) {
    surface.begin_frame();
    surface.fill(Color::BLACK);
    director.draw(&mut *surface);
    trace!(
        "Frame: {} draw commands, {} blits",
        surface.commands.len(),
        surface.blit_count()
    );
}
