//! Celestial bodies: construction, orbital motion and per-body visual control.
//!
//! Each planet is an `OrbitPivot` at the origin carrying a body root at its
//! orbital distance. The root holds identity and pick radius; a spinner child
//! carries the surface layers so self-rotation never moves the moons.

/// Comparison lab reference body
pub mod lab;
/// Per-body visual controller and layer precedence
pub mod controller;
/// Orbital pivot rotation
pub mod orbit;
/// Name to entity lookups built at construction time
pub mod registry;
/// Scene construction from the catalog
pub mod spawn;
