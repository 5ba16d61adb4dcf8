//! Shared tuning constants for the solar system engine.
//!
//! Grouped by the subsystem that reads them so the engine crate can pull
//! in a single module per concern.

pub mod audio;
pub mod feeds;
pub mod orbital;
pub mod render_settings;
pub mod spacetime_grid;
pub mod texture;
