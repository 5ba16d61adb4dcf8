/// Sample rate of the baked ambience loop.
pub const AMBIENCE_SAMPLE_RATE: u32 = 22_050;

/// Loop length in seconds.
pub const AMBIENCE_LOOP_SECONDS: u32 = 2;

/// Cut-off the loop is baked at; live cut-off changes map to playback speed.
pub const AMBIENCE_BAKE_CUTOFF_HZ: f32 = 400.0;

/// `cutoff = BASE + PER_SCALE * |time_scale|`.
pub const AMBIENCE_CUTOFF_BASE_HZ: f32 = 200.0;
pub const AMBIENCE_CUTOFF_PER_SCALE_HZ: f32 = 50.0;

/// `gain = BASE + AMPLITUDE * sin(sim_time)`.
pub const AMBIENCE_GAIN_BASE: f32 = 0.02;
pub const AMBIENCE_GAIN_AMPLITUDE: f32 = 0.01;

/// Loudness of the baked noise before the live gain is applied.
pub const AMBIENCE_BAKE_GAIN: f32 = 0.05;

pub const AMBIENCE_SEED: u64 = 0x4e4f_4953;

/// Raw speech samples arrive as 16-bit mono PCM at this rate.
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;
pub const SPEECH_CHANNELS: u16 = 1;
pub const SPEECH_BITS_PER_SAMPLE: u16 = 16;
