pub mod pathplanner;
pub mod render;
pub mod tick;
