//! Engine components owned by scenes.
//!
//! Unlike the driver resources these are plain data: every scene owns its
//! own instances and ticks them itself or through its sequencer.
//!
//! Submodules overview:
//! - [`animation`] – frame lists played back by tick count, looping or one-shot
//! - [`dialogue`] – multi-section scripted dialogue with single-line or stacked layout
//! - [`pathfollower`] – step-by-step movement along a planned path
//! - [`phase`] – one-directional multi-phase animation state machine
//! - [`pursuit`] – plan-then-follow beat on an occupancy grid
//! - [`sequencer`] – ordered scene beats and hand-off
//! - [`textreveal`] – incremental typewriter text reveal

pub mod animation;
pub mod dialogue;
pub mod pathfollower;
pub mod phase;
pub mod pursuit;
pub mod sequencer;
pub mod textreveal;
