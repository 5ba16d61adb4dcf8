//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, the per-frame
//! system ordering and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the frame pipeline, asset loading systems,
/// lifecycle transitions and platform-specific overlays.
pub mod app_setup;

/// Scene lifecycle: building, running and the crash state with manual reload.
pub mod app_state;

/// Typed scene construction failures.
pub mod error;

/// Frame stages and the marker shared by everything the scene owns.
pub mod frame;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
