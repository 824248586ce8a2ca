//! Multi-section scripted dialogue.
//!
//! A [`DialogueScript`] plays its [`TextSection`]s in insertion order through
//! one [`TypedTextRevealer`]. The user's "advance" input has a single meaning:
//! finish the current section if it is still typing, otherwise move to the
//! next one. It never skips several sections at once.
//!
//! Layout is chosen per script through [`DialogueOptions`]:
//! - [`DialogueLayout::SingleLine`] shows only the current section at the
//!   bottom of the surface.
//! - [`DialogueLayout::Stacked`] keeps finished sections on screen above the
//!   line being typed.

use glam::Vec2;
use log::debug;

use crate::components::textreveal::TypedTextRevealer;
use crate::error::EngineError;
use crate::resources::surface::{Color, RenderSurface, TextAnchor, TextStyle};

/// One line of dialogue with its own reveal speed and an optional cue.
///
/// The cue is a free-form label (for example `"princess_fall"`) that scenes
/// read while the section is active to drive actor animation.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSection {
    pub text: String,
    /// Characters revealed per tick. Fractional values accumulate.
    pub speed: f32,
    pub cue: Option<String>,
}

impl TextSection {
    pub fn new(text: impl Into<String>, speed: f32) -> Self {
        Self {
            text: text.into(),
            speed,
            cue: None,
        }
    }

    pub fn with_cue(mut self, cue: impl Into<String>) -> Self {
        self.cue = Some(cue.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogueLayout {
    #[default]
    SingleLine,
    Stacked,
}

/// Presentation options shared by every section of a script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialogueOptions {
    /// Default reveal speed used by [`DialogueScript::from_lines`].
    pub speed: f32,
    /// Distance from the bottom edge of the surface to the newest line.
    pub margin: f32,
    /// Extra gap between stacked lines (may be negative).
    pub line_spacing: f32,
    pub font_size: f32,
    pub color: Color,
    pub outline: Option<Color>,
    pub layout: DialogueLayout,
}

impl Default for DialogueOptions {
    fn default() -> Self {
        Self {
            speed: 2.0,
            margin: 40.0,
            line_spacing: 8.0,
            font_size: 26.0,
            color: Color::WHITE,
            outline: None,
            layout: DialogueLayout::SingleLine,
        }
    }
}

impl DialogueOptions {
    pub fn stacked(mut self) -> Self {
        self.layout = DialogueLayout::Stacked;
        self.outline = Some(Color::BLACK);
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_line_spacing(mut self, line_spacing: f32) -> Self {
        self.line_spacing = line_spacing;
        self
    }

    fn style(&self) -> TextStyle {
        TextStyle {
            size: self.font_size,
            color: self.color,
            outline: self.outline,
            anchor: TextAnchor::MidBottom,
        }
    }
}

/// Result of [`DialogueScript::advance_section`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptSignal {
    /// The current section was still typing and is now fully shown.
    Revealed,
    /// Moved on to the section at this index.
    NextSection(usize),
    /// The last section was acknowledged; the script is over.
    Completed,
}

/// Ordered dialogue sections plus the playback cursor.
#[derive(Debug, Clone)]
pub struct DialogueScript {
    sections: Vec<TextSection>,
    options: DialogueOptions,
    cursor: usize,
    revealer: TypedTextRevealer,
    started: bool,
    complete: bool,
}

impl DialogueScript {
    pub fn new(sections: Vec<TextSection>, options: DialogueOptions) -> Self {
        Self {
            sections,
            options,
            cursor: 0,
            revealer: TypedTextRevealer::default(),
            started: false,
            complete: false,
        }
    }

    /// Build a script where every line uses `options.speed`.
    pub fn from_lines<S: AsRef<str>>(lines: &[S], options: DialogueOptions) -> Self {
        let sections = lines
            .iter()
            .map(|line| TextSection::new(line.as_ref(), options.speed))
            .collect();
        Self::new(sections, options)
    }

    /// Rewind to the first section and start typing it. An empty script
    /// completes immediately.
    pub fn start(&mut self) {
        self.cursor = 0;
        self.started = true;
        self.complete = self.sections.is_empty();
        match self.sections.first() {
            Some(first) => self.revealer.set_text(first.text.clone()),
            None => self.revealer.set_text(""),
        }
    }

    /// Type the current section by its configured speed.
    pub fn tick(&mut self) {
        if !self.started || self.complete {
            return;
        }
        if let Some(section) = self.sections.get(self.cursor) {
            self.revealer.tick(section.speed);
        }
    }

    /// Finish the current section, or move to the next one if it is already
    /// finished. Fails once the script has completed.
    pub fn advance_section(&mut self) -> Result<ScriptSignal, EngineError> {
        if self.complete || !self.started {
            return Err(EngineError::InvalidSectionIndex {
                index: self.cursor + usize::from(self.complete),
                len: self.sections.len(),
            });
        }
        if !self.revealer.is_finished() {
            self.revealer.skip_to_end();
            return Ok(ScriptSignal::Revealed);
        }
        let next = self.cursor + 1;
        if next < self.sections.len() {
            self.cursor = next;
            self.revealer.set_text(self.sections[next].text.clone());
            debug!("Dialogue section {}/{}", next + 1, self.sections.len());
            Ok(ScriptSignal::NextSection(next))
        } else {
            self.complete = true;
            Ok(ScriptSignal::Completed)
        }
    }

    /// Section at `index`, failing fast on an out-of-range index.
    pub fn section(&self, index: usize) -> Result<&TextSection, EngineError> {
        self.sections
            .get(index)
            .ok_or(EngineError::InvalidSectionIndex {
                index,
                len: self.sections.len(),
            })
    }

    /// The section being typed or shown.
    pub fn current_section(&self) -> Result<&TextSection, EngineError> {
        if self.complete {
            return Err(EngineError::InvalidSectionIndex {
                index: self.cursor + 1,
                len: self.sections.len(),
            });
        }
        self.section(self.cursor)
    }

    /// Cue of the active section, if any.
    pub fn current_cue(&self) -> Option<&str> {
        if self.complete {
            return None;
        }
        self.sections
            .get(self.cursor)
            .and_then(|s| s.cue.as_deref())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// True when the current section is fully typed.
    pub fn section_finished(&self) -> bool {
        self.revealer.is_finished()
    }

    /// Visible part of the current section.
    pub fn revealed(&self) -> &str {
        self.revealer.revealed()
    }

    /// Sections already typed and acknowledged, oldest first.
    pub fn finished_sections(&self) -> impl DoubleEndedIterator<Item = &TextSection> {
        let done = if self.complete {
            self.sections.len()
        } else {
            self.cursor
        };
        self.sections[..done].iter()
    }

    pub fn options(&self) -> &DialogueOptions {
        &self.options
    }

    /// Draw the script according to its layout. Nothing is drawn before
    /// [`start`](Self::start) or after completion.
    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        if !self.started || self.complete {
            return;
        }
        let (w, h) = surface.size();
        let style = self.options.style();
        let step = self.options.font_size + self.options.line_spacing;
        let mut y = h - self.options.margin;
        surface.draw_text(self.revealer.revealed(), Vec2::new(w / 2.0, y), &style);
        if self.options.layout == DialogueLayout::Stacked {
            for section in self.finished_sections().rev() {
                y -= step;
                surface.draw_text(&section.text, Vec2::new(w / 2.0, y), &style);
            }
        }
    }
}
