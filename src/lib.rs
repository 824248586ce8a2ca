//! Choreography engine library.
//!
//! Frame-clocked building blocks for scripted lesson scenes: typewriter
//! dialogue, phased animation, grid path planning and following, and the
//! sequencer that chains them into scenes. The driver layer (tick clock,
//! command queue, scene director) is exposed as ECS resources and systems.

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
