//! Engine configuration resource.
//!
//! Settings are read from an INI file. Every key is optional; missing keys
//! and a missing file leave the defaults in place.
//!
//! # Configuration File Format
//!
//! ```ini
//! [engine]
//! tick_rate = 60
//! seed = 7
//!
//! [render]
//! width = 900
//! height = 700
//!
//! [text]
//! speed = 2.0
//! margin = 40
//! line_spacing = 8
//!
//! [pursuit]
//! step_cadence = 6
//! gait_ticks_per_frame = 3
//! tile_size = 32
//!
//! [driver]
//! start_scene = beginner.apple_fall
//! auto_advance = 45
//! max_ticks = 20000
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

use crate::components::dialogue::DialogueOptions;
use crate::components::pathfollower::FollowerOptions;

const DEFAULT_TICK_RATE: u32 = 60;
const DEFAULT_SEED: u64 = 7;
const DEFAULT_RENDER_WIDTH: u32 = 900;
const DEFAULT_RENDER_HEIGHT: u32 = 700;
const DEFAULT_TEXT_SPEED: f32 = 2.0;
const DEFAULT_TEXT_MARGIN: f32 = 40.0;
const DEFAULT_LINE_SPACING: f32 = 8.0;
const DEFAULT_STEP_CADENCE: u32 = 6;
const DEFAULT_GAIT_TICKS_PER_FRAME: u32 = 3;
const DEFAULT_TILE_SIZE: u32 = 32;
const DEFAULT_START_SCENE: &str = "beginner.apple_fall";
const DEFAULT_AUTO_ADVANCE: u32 = 45;
const DEFAULT_MAX_TICKS: u64 = 20_000;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Engine configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Fixed ticks per second the collaborator drives the engine at.
    pub tick_rate: u32,
    /// Seed for scene-local randomness (apple scatter).
    pub seed: u64,
    pub render_width: u32,
    pub render_height: u32,
    /// Default reveal speed, in characters per tick.
    pub text_speed: f32,
    pub text_margin: f32,
    pub line_spacing: f32,
    /// Ticks per grid step of a pursuit.
    pub step_cadence: u32,
    pub gait_ticks_per_frame: u32,
    /// Pixel size of one grid cell.
    pub tile_size: u32,
    pub start_scene: String,
    /// Headless driver: ticks between synthetic advance inputs, 0 disables.
    pub auto_advance: u32,
    /// Headless driver: stop after this many ticks.
    pub max_ticks: u64,
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            seed: DEFAULT_SEED,
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
            text_speed: DEFAULT_TEXT_SPEED,
            text_margin: DEFAULT_TEXT_MARGIN,
            line_spacing: DEFAULT_LINE_SPACING,
            step_cadence: DEFAULT_STEP_CADENCE,
            gait_ticks_per_frame: DEFAULT_GAIT_TICKS_PER_FRAME,
            tile_size: DEFAULT_TILE_SIZE,
            start_scene: DEFAULT_START_SCENE.to_string(),
            auto_advance: DEFAULT_AUTO_ADVANCE,
            max_ticks: DEFAULT_MAX_TICKS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values. Returns an error if the
    /// file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [engine]
        if let Some(rate) = get_u32(&config, "engine", "tick_rate") {
            self.tick_rate = rate.max(1);
        }
        if let Some(seed) = config.getuint("engine", "seed").ok().flatten() {
            self.seed = seed;
        }

        // [render]
        if let Some(width) = get_u32(&config, "render", "width") {
            self.render_width = width;
        }
        if let Some(height) = get_u32(&config, "render", "height") {
            self.render_height = height;
        }

        // [text]
        if let Some(speed) = config.getfloat("text", "speed").ok().flatten() {
            self.text_speed = speed as f32;
        }
        if let Some(margin) = config.getfloat("text", "margin").ok().flatten() {
            self.text_margin = margin as f32;
        }
        if let Some(spacing) = config.getfloat("text", "line_spacing").ok().flatten() {
            self.line_spacing = spacing as f32;
        }

        // [pursuit]
        if let Some(cadence) = get_u32(&config, "pursuit", "step_cadence") {
            self.step_cadence = cadence.max(1);
        }
        if let Some(gait) = get_u32(&config, "pursuit", "gait_ticks_per_frame") {
            self.gait_ticks_per_frame = gait.max(1);
        }
        if let Some(tile) = get_u32(&config, "pursuit", "tile_size") {
            self.tile_size = tile;
        }

        // [driver]
        if let Some(scene) = config.get("driver", "start_scene") {
            self.start_scene = scene;
        }
        if let Some(every) = get_u32(&config, "driver", "auto_advance") {
            self.auto_advance = every;
        }
        if let Some(max) = config.getuint("driver", "max_ticks").ok().flatten() {
            self.max_ticks = max;
        }

        info!(
            "Loaded config: {}x{} render, {} Hz, start scene '{}'",
            self.render_width, self.render_height, self.tick_rate, self.start_scene
        );

        Ok(())
    }

    /// Save configuration to the INI file, creating it if needed.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("engine", "tick_rate", Some(self.tick_rate.to_string()));
        config.set("engine", "seed", Some(self.seed.to_string()));

        config.set("render", "width", Some(self.render_width.to_string()));
        config.set("render", "height", Some(self.render_height.to_string()));

        config.set("text", "speed", Some(self.text_speed.to_string()));
        config.set("text", "margin", Some(self.text_margin.to_string()));
        config.set("text", "line_spacing", Some(self.line_spacing.to_string()));

        config.set("pursuit", "step_cadence", Some(self.step_cadence.to_string()));
        config.set(
            "pursuit",
            "gait_ticks_per_frame",
            Some(self.gait_ticks_per_frame.to_string()),
        );
        config.set("pursuit", "tile_size", Some(self.tile_size.to_string()));

        config.set("driver", "start_scene", Some(self.start_scene.clone()));
        config.set("driver", "auto_advance", Some(self.auto_advance.to_string()));
        config.set("driver", "max_ticks", Some(self.max_ticks.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    pub fn render_size(&self) -> (f32, f32) {
        (self.render_width as f32, self.render_height as f32)
    }

    /// Dialogue defaults derived from the `[text]` section.
    pub fn dialogue_options(&self) -> DialogueOptions {
        DialogueOptions::default()
            .with_speed(self.text_speed)
            .with_margin(self.text_margin)
            .with_line_spacing(self.line_spacing)
    }

    /// Follower cadence derived from the `[pursuit]` section.
    pub fn follower_options(&self, gait_frames: usize) -> FollowerOptions {
        FollowerOptions {
            step_cadence: self.step_cadence,
            gait_ticks_per_frame: self.gait_ticks_per_frame,
            gait_frames,
        }
    }
}

/// Read an unsigned key that must fit a `u32`. Out-of-range values are
/// reported and ignored so the current value stays in place.
fn get_u32(config: &Ini, section: &str, key: &str) -> Option<u32> {
    let value = config.getuint(section, key).ok().flatten()?;
    match u32::try_from(value) {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("[{}] {} = {} is out of range, keeping current value", section, key, value);
            None
        }
    }
}
