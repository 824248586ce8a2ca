//! Resources shared by the engine and the driver.
//!
//! Overview
//! - `assetstore` – logical asset names resolved to opaque handles and sizes
//! - `engineconfig` – INI-backed engine settings
//! - `grid` – occupancy grids and grid coordinates
//! - `input` – queue of discrete engine commands
//! - `scenes` – scene registry and the director owning the running scene
//! - `surface` – render surface trait and the recording implementation
//! - `tickclock` – fixed-rate frame counter
pub mod assetstore;
pub mod engineconfig;
pub mod grid;
pub mod input;
pub mod scenes;
pub mod surface;
pub mod tickclock;
