use bevy_ecs::prelude::Resource;

/// Fixed-rate frame counter. The engine never reads a wall clock; the
/// collaborator advances this once per frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickClock {
    /// Ticks since the driver started.
    pub tick: u64,
    /// Ticks since the current scene started.
    pub scene_tick: u64,
    pub tick_rate: u32,
}

impl Default for TickClock {
    fn default() -> Self {
        TickClock {
            tick: 0,
            scene_tick: 0,
            tick_rate: 60,
        }
    }
}

impl TickClock {
    pub fn with_tick_rate(mut self, tick_rate: u32) -> Self {
        self.tick_rate = tick_rate.max(1);
        self
    }

    pub fn advance(&mut self) {
        self.tick += 1;
        self.scene_tick += 1;
    }

    pub fn reset_scene(&mut self) {
        self.scene_tick = 0;
    }

    /// Elapsed time implied by the tick count.
    pub fn elapsed_seconds(&self) -> f32 {
        self.tick as f32 / self.tick_rate as f32
    }
}
