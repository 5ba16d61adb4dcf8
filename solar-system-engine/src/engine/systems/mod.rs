//! Runtime systems outside the scene graph: clocks, timers, input and diagnostics.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to the page via RPC and updates the native overlay.
pub mod fps_tracking;

/// Native keyboard shortcuts mapped onto view-state setters.
pub mod keyboard;

/// Simulated time advanced from the clamped real delta and the user time scale.
pub mod simulation_clock;

pub mod status_pulse;

/// Character-by-character reveal of the selected body's description.
pub mod typewriter;
