pub mod input;
pub mod scene;
