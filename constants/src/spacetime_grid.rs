/// Edge length of the square grid in world units.
pub const GRID_SIZE: f32 = 1000.0;

/// Segments per side; the mesh carries `GRID_SEGMENTS + 1` vertices per row.
pub const GRID_SEGMENTS: usize = 120;

/// Height of the undisturbed grid below the orbital plane.
pub const GRID_ELEVATION: f32 = -20.0;

/// Well depth: `min(mass * K / (d² + EPSILON), MAX_DISPLACEMENT)`.
pub const WELL_STRENGTH: f32 = 1000.0;
pub const WELL_EPSILON: f32 = 100.0;
pub const MAX_DISPLACEMENT: f32 = 50.0;

/// Mass attributed to the central star when it, or nothing, is selected.
pub const STAR_GRAVITY_MASS: f32 = 30.0;

/// Opacity oscillation.
pub const GRID_BASE_OPACITY: f32 = 0.15;
pub const GRID_OPACITY_AMPLITUDE: f32 = 0.05;
pub const GRID_OPACITY_FREQUENCY: f32 = 2.0;
