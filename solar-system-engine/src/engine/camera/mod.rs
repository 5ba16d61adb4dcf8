//! Scene camera.
//!
//! Orbit controls give the user direct control; the director steers toward
//! the selected object each frame unless the user is dragging or the view is
//! stabilized. The lens applies cosmetic colour grading.

/// Offset policy and smoothing toward the tracked object.
pub mod director;
/// Lens colour grading.
pub mod lens;
/// Camera spawn and mouse orbit controls.
pub mod orbit_controls;
