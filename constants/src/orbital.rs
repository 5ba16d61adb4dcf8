/// Damping applied to every planet's angular speed coefficient (radians per sim second).
pub const ORBITAL_SPEED_DAMPING: f32 = 0.12;

/// Bounds for the user-controlled time scale. Negative values run time backwards.
pub const MIN_TIME_SCALE: f32 = -10.0;
pub const MAX_TIME_SCALE: f32 = 100.0;
pub const DEFAULT_TIME_SCALE: f32 = 1.0;
/// Keyboard time-scale increment.
pub const TIME_SCALE_STEP: f32 = 0.5;

/// Mission traversal: fraction of the path covered per sim second.
pub const MISSION_TRAVERSAL_RATE: f32 = 0.05;

/// Phase spacing between consecutive missions so markers do not overlap.
pub const MISSION_PHASE_STEP: f32 = 0.3;

/// Mission marker sizes and pulse animation.
pub const MISSION_MARKER_RADIUS: f32 = 1.5;
pub const MISSION_PULSE_RADIUS: f32 = 2.0;
pub const MISSION_PICK_RADIUS: f32 = 2.0;
pub const MISSION_PULSE_FREQUENCY: f32 = 3.0;
pub const MISSION_PULSE_SCALE_AMPLITUDE: f32 = 0.3;
pub const MISSION_PULSE_BASE_ALPHA: f32 = 0.3;
pub const MISSION_PULSE_ALPHA_AMPLITUDE: f32 = 0.2;
pub const MISSION_PATH_SAMPLES: usize = 100;
pub const MISSION_PATH_OPACITY: f32 = 0.6;
pub const MISSION_GRAVITY_MASS: f32 = 1.0;

/// Star corona animation.
pub const CORONA_SCALE: f32 = 1.6;
pub const CORONA_PULSE_BASE: f32 = 0.98;
pub const CORONA_PULSE_AMPLITUDE: f32 = 0.02;
pub const CORONA_PULSE_FREQUENCY: f32 = 1.5;
pub const CORONA_ALPHA_BASE: f32 = 0.6;
pub const CORONA_ALPHA_AMPLITUDE: f32 = 0.1;
pub const CORONA_ALPHA_FREQUENCY: f32 = 2.0;
pub const STAR_EMISSIVE_STRENGTH: f32 = 2.5;

/// Flare class multipliers for the corona.
pub const FLARE_INTENSITY_X: f32 = 1.8;
pub const FLARE_INTENSITY_M: f32 = 1.4;
pub const FLARE_INTENSITY_C: f32 = 1.2;

/// Surface opacities per layer mode.
pub const SURFACE_ALPHA_STRUCTURAL: f32 = 0.2;
pub const SURFACE_ALPHA_HEATMAP: f32 = 0.4;
pub const ATMOSPHERE_ALPHA_NORMAL: f32 = 0.8;
pub const ATMOSPHERE_ALPHA_STRUCTURAL: f32 = 0.1;
pub const ATMOSPHERE_ALPHA_HEATMAP: f32 = 0.05;
pub const HEATMAP_ALPHA: f32 = 0.8;

/// Asteroid belt proxy.
pub const BELT_ROCK_COUNT: usize = 600;
pub const BELT_HALF_WIDTH: f32 = 6.0;
pub const BELT_HALF_HEIGHT: f32 = 1.5;
pub const BELT_SEED: u64 = 0x4245_4c54;

/// Lab comparison reference body.
pub const LAB_REFERENCE_BODY: &str = "Earth";
pub const LAB_OFFSET_FACTOR: f32 = 2.0;
