//! Native UI overlays.
//!
//! Registered only for native builds; on the web the host page draws its
//! own interface from RPC notifications.

/// Crash notice with the manual reload action.
pub mod crash_screen;

/// FPS counter, status pulse, hover tag, info panel and space-weather line.
pub mod hud;
