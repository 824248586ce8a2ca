//! Discrete input commands.
//!
//! The collaborator translates whatever it listens to (keys, clicks, a test
//! script) into [`EngineCommand`]s and pushes them onto the
//! [`CommandQueue`](crate::resources::input::CommandQueue). They are drained
//! once per tick, before any scene update.

/// Logical input understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineCommand {
    /// Finish the current text section, or move to the next beat.
    Advance,
    /// Drop the current scene and stop the driver.
    Quit,
}
