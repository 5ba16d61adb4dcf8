/// Resolution of every procedurally generated surface texture (width, height).
pub const SURFACE_TEXTURE_WIDTH: u32 = 256;
pub const SURFACE_TEXTURE_HEIGHT: u32 = 128;

/// Number of noise spots scattered over a cratered or dusty surface.
pub const SURFACE_SPOT_COUNT: usize = 220;

/// Number of radial blobs on a heatmap overlay.
pub const HEATMAP_BLOB_COUNT: usize = 24;

