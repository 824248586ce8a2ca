//! Incremental typewriter reveal of a single string.
//!
//! [`TypedTextRevealer`] accumulates reveal progress in thousandths of a
//! character. Each tick adds a (possibly fractional) number of characters,
//! rounded to that resolution, so sums such as ten ticks at 0.3 land on
//! exactly 3. The visible text is the first `floor(progress)` characters,
//! counted in Unicode scalar values so accented and typographic characters
//! are never split.

/// Reveal progress units per character.
const UNITS_PER_CHAR: u64 = 1000;

/// Typewriter state for one string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedTextRevealer {
    text: String,
    char_len: usize,
    /// Revealed amount in thousandths of a character.
    progress: u64,
}

impl TypedTextRevealer {
    pub fn new(text: impl Into<String>) -> Self {
        let mut revealer = Self::default();
        revealer.set_text(text);
        revealer
    }

    /// Replace the text and reset progress to zero.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.char_len = self.text.chars().count();
        self.progress = 0;
    }

    /// Rewind to the start without changing the text.
    pub fn reset(&mut self) {
        self.progress = 0;
    }

    fn total_units(&self) -> u64 {
        (self.char_len as u64).saturating_mul(UNITS_PER_CHAR)
    }

    /// Advance by `delta_chars`. Non-positive and NaN deltas are ignored so the
    /// revealed length never decreases.
    pub fn tick(&mut self, delta_chars: f32) {
        if delta_chars.is_nan() || delta_chars <= 0.0 {
            return;
        }
        // Float-to-int casts saturate, so an infinite delta reveals everything.
        let units = (f64::from(delta_chars) * UNITS_PER_CHAR as f64).round() as u64;
        self.progress = self.progress.saturating_add(units).min(self.total_units());
    }

    /// Reveal everything at once.
    pub fn skip_to_end(&mut self) {
        self.progress = self.total_units();
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= self.total_units()
    }

    /// Number of characters currently visible.
    pub fn revealed_len(&self) -> usize {
        ((self.progress / UNITS_PER_CHAR) as usize).min(self.char_len)
    }

    /// The visible prefix of the text.
    pub fn revealed(&self) -> &str {
        let n = self.revealed_len();
        self.text
            .char_indices()
            .nth(n)
            .map(|(i, _)| &self.text[..i])
            .unwrap_or(&self.text)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Total length in characters.
    pub fn len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }
}
