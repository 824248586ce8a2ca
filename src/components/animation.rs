//! Frame-list playback driven by tick counts.
//!
//! A [`FrameCycle`] walks a list of image handles, moving to the next frame
//! every `ticks_per_frame` ticks. Looping cycles wrap by modulo (walk and
//! idle gaits); one-shot cycles clamp on the last frame and report
//! [`FrameCycle::is_finished`] (falls, intro videos).

use serde::{Deserialize, Serialize};

use crate::resources::assetstore::AssetHandle;

/// What happens after the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopMode {
    #[default]
    Loop,
    Once,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameCycle {
    frames: Vec<Option<AssetHandle>>,
    ticks_per_frame: u32,
    mode: LoopMode,
    frame_index: usize,
    elapsed: u32,
}

impl FrameCycle {
    /// `ticks_per_frame` of zero is treated as one.
    pub fn new(frames: Vec<Option<AssetHandle>>, ticks_per_frame: u32, mode: LoopMode) -> Self {
        Self {
            frames,
            ticks_per_frame: ticks_per_frame.max(1),
            mode,
            frame_index: 0,
            elapsed: 0,
        }
    }

    pub fn looped(frames: Vec<Option<AssetHandle>>, ticks_per_frame: u32) -> Self {
        Self::new(frames, ticks_per_frame, LoopMode::Loop)
    }

    pub fn once(frames: Vec<Option<AssetHandle>>, ticks_per_frame: u32) -> Self {
        Self::new(frames, ticks_per_frame, LoopMode::Once)
    }

    /// Advance one tick. Returns true when the visible frame changed.
    pub fn tick(&mut self) -> bool {
        if self.frames.len() <= 1 || self.is_finished() {
            return false;
        }
        self.elapsed += 1;
        if self.elapsed < self.ticks_per_frame {
            return false;
        }
        self.elapsed = 0;
        match self.mode {
            LoopMode::Loop => {
                self.frame_index = (self.frame_index + 1) % self.frames.len();
            }
            LoopMode::Once => {
                self.frame_index = (self.frame_index + 1).min(self.frames.len() - 1);
            }
        }
        true
    }

    /// One-shot cycles finish on their last frame; looping cycles never do.
    pub fn is_finished(&self) -> bool {
        self.mode == LoopMode::Once && self.frame_index + 1 >= self.frames.len()
    }

    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.elapsed = 0;
    }

    /// Jump to the last frame (used to freeze a one-shot on its final pose).
    pub fn freeze_last(&mut self) {
        self.frame_index = self.frames.len().saturating_sub(1);
        self.elapsed = 0;
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Handle of the visible frame, `None` if missing or the list is empty.
    pub fn current(&self) -> Option<AssetHandle> {
        self.frames.get(self.frame_index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
