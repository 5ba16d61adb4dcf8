use bevy::math::Vec3;

/// Upper bound on the real frame delta fed to the simulation clock (seconds).
/// Keeps a resumed tab from jumping the scene forward in one step.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Per-frame smoothing factor applied to both camera position and orbit target.
pub const CAMERA_LERP_FACTOR: f32 = 0.05;

/// Overview offset from a tracked body, in multiples of its visual radius.
pub const OVERVIEW_OFFSET: Vec3 = Vec3::new(4.0, 1.5, 8.0);

/// Overview look-at shift, leaves room on screen for the side info panel.
pub const OVERVIEW_LOOK_AT_OFFSET: Vec3 = Vec3::new(4.0, 0.0, 0.0);

/// Deep-dive pull-back multipliers on top of the overview offset.
pub const DEEP_DIVE_STAR_PULL_BACK: f32 = 2.5;
pub const DEEP_DIVE_BODY_PULL_BACK: f32 = 1.6;

/// Deep-dive look-at shift in multiples of the visual radius.
pub const DEEP_DIVE_LOOK_AT_OFFSET: Vec3 = Vec3::new(6.0, 0.0, 0.0);

/// Camera stand-off from a landmark along the surface normal, in visual radii.
pub const LANDMARK_STANDOFF: f32 = 2.0;

/// Stand-off scale while rover mode is active.
pub const ROVER_STANDOFF_SCALE: f32 = 0.4;

/// Radius assumed for a tracked object that does not report one.
pub const DEFAULT_TRACKED_RADIUS: f32 = 5.0;

/// Initial camera placement for the system overview.
pub const INITIAL_CAMERA_POSITION: Vec3 = Vec3::new(300.0, 250.0, 500.0);
pub const CAMERA_FOV_DEGREES: f32 = 45.0;

/// Orbit control distance limits and input sensitivities.
pub const ORBIT_MIN_DISTANCE: f32 = 5.0;
pub const ORBIT_MAX_DISTANCE: f32 = 2000.0;
pub const ORBIT_ROTATE_SENSITIVITY: f32 = 0.005;
pub const ORBIT_ZOOM_SENSITIVITY: f32 = 0.1;
pub const ORBIT_PIXEL_SCROLL_SCALE: f32 = 0.05;

/// Starfield extent and point count.
pub const STARFIELD_COUNT: usize = 30_000;
pub const STARFIELD_EXTENT: f32 = 6000.0;
pub const STARFIELD_SEED: u64 = 0x5747_4152;

/// Cosmetic ring marking each planet's orbit.
pub const ORBIT_RING_THICKNESS: f32 = 0.15;
pub const ORBIT_RING_OPACITY: f32 = 0.05;

/// Number of frames to wait for an audio sink before declaring the device missing.
pub const AUDIO_SINK_GRACE_FRAMES: u32 = 30;

/// Typewriter reveal cadence for the info panel (seconds per character).
pub const TYPEWRITER_CHAR_INTERVAL: f32 = 0.015;

/// Status pulse tick (seconds) and its wrap-around value.
pub const STATUS_PULSE_INTERVAL: f32 = 0.5;
pub const STATUS_PULSE_WRAP: u32 = 100;
/// Width of the `[===  ]` status bar.
pub const STATUS_PULSE_BAR_WIDTH: u32 = 5;

/// Interval between `fps_update` notifications (seconds).
pub const FPS_NOTIFICATION_INTERVAL: f32 = 0.5;
