//! Abstract 2D render surface.
//!
//! The engine issues draw calls through [`RenderSurface`]; pixel formats,
//! fonts and windows belong to the collaborator. [`RecordingSurface`] is the
//! implementation used by the headless driver and by tests: it stores every
//! call of the current frame as a [`DrawCmd`].

use bevy_ecs::prelude::Resource;
use glam::Vec2;

use crate::resources::assetstore::AssetHandle;

/// RGBA colour, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Which point of the rendered text `pos` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    TopLeft,
    MidBottom,
    Center,
}

/// Font size, colour, optional drop outline, and anchor for a text draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Color,
    pub outline: Option<Color>,
    pub anchor: TextAnchor,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 24.0,
            color: Color::WHITE,
            outline: None,
            anchor: TextAnchor::TopLeft,
        }
    }
}

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Draw target provided by the collaborator.
pub trait RenderSurface {
    /// Surface size in pixels.
    fn size(&self) -> (f32, f32);
    fn fill(&mut self, color: Color);
    /// Draw an image with its top-left corner at `pos`.
    fn blit(&mut self, handle: AssetHandle, pos: Vec2, alpha: u8);
    fn draw_text(&mut self, text: &str, pos: Vec2, style: &TextStyle);
    fn draw_rect(&mut self, rect: Rect, color: Color);
}

/// Blit an optional handle; a missing handle draws nothing.
pub fn blit_opt(surface: &mut dyn RenderSurface, handle: Option<AssetHandle>, pos: Vec2) {
    if let Some(handle) = handle {
        surface.blit(handle, pos, 255);
    }
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Fill(Color),
    Blit {
        handle: AssetHandle,
        pos: Vec2,
        alpha: u8,
    },
    Text {
        text: String,
        pos: Vec2,
        style: TextStyle,
    },
    Rect {
        rect: Rect,
        color: Color,
    },
}

/// Surface that records draw calls for the current frame.
#[derive(Resource, Debug, Clone)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCmd>,
}

/// Surface resource the headless driver renders into.
pub type FrameSurface = RecordingSurface;

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Drop the previous frame's commands.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
    }

    /// Text strings drawn this frame, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Number of images blitted this frame.
    pub fn blit_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCmd::Blit { .. }))
            .count()
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn fill(&mut self, color: Color) {
        self.commands.push(DrawCmd::Fill(color));
    }

    fn blit(&mut self, handle: AssetHandle, pos: Vec2, alpha: u8) {
        self.commands.push(DrawCmd::Blit { handle, pos, alpha });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, style: &TextStyle) {
        self.commands.push(DrawCmd::Text {
            text: text.to_string(),
            pos,
            style: *style,
        });
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCmd::Rect { rect, color });
    }
}
