use bevy::audio::{AudioSinkPlayback, Volume};
use bevy::prelude::*;
use constants::audio::{
    AMBIENCE_BAKE_CUTOFF_HZ, AMBIENCE_BAKE_GAIN, AMBIENCE_CUTOFF_BASE_HZ,
    AMBIENCE_CUTOFF_PER_SCALE_HZ, AMBIENCE_GAIN_AMPLITUDE, AMBIENCE_GAIN_BASE,
    AMBIENCE_LOOP_SECONDS, AMBIENCE_SAMPLE_RATE, AMBIENCE_SEED,
};
use constants::render_settings::AUDIO_SINK_GRACE_FRAMES;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use std::io::Cursor;

use crate::engine::core::frame::SceneEntity;
use crate::engine::state::view_state::FrameSnapshot;
use crate::engine::systems::simulation_clock::SimulationClock;

/// Drone parameters for one frame, a pure function of sim time and time scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbienceParams {
    pub cutoff_hz: f32,
    pub gain: f32,
}

impl AmbienceParams {
    pub fn for_frame(sim_time: f32, time_scale: f32) -> Self {
        Self {
            cutoff_hz: AMBIENCE_CUTOFF_BASE_HZ + AMBIENCE_CUTOFF_PER_SCALE_HZ * time_scale.abs(),
            gain: AMBIENCE_GAIN_BASE + AMBIENCE_GAIN_AMPLITUDE * sim_time.sin(),
        }
    }

    /// The loop is baked at a fixed cut-off; speeding it up shifts its spectrum.
    pub fn playback_speed(&self) -> f32 {
        self.cutoff_hz / AMBIENCE_BAKE_CUTOFF_HZ
    }

    /// Sink volume that brings the baked loudness to `gain`.
    pub fn volume(&self) -> f32 {
        (self.gain / AMBIENCE_BAKE_GAIN).max(0.0)
    }
}

/// Seeded white noise through a one-pole low-pass, peak-normalised to the bake gain.
pub fn bake_noise_samples(seed: u64) -> Vec<i16> {
    let mut rng = StdRng::seed_from_u64(seed);
    let count = (AMBIENCE_SAMPLE_RATE * AMBIENCE_LOOP_SECONDS) as usize;
    let dt = 1.0 / AMBIENCE_SAMPLE_RATE as f32;
    let rc = 1.0 / (TAU * AMBIENCE_BAKE_CUTOFF_HZ);
    let alpha = dt / (rc + dt);

    let mut state = 0.0f32;
    let filtered: Vec<f32> = (0..count)
        .map(|_| {
            state += alpha * (rng.gen_range(-1.0f32..1.0) - state);
            state
        })
        .collect();

    let peak = filtered.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    let scale = if peak > 0.0 { AMBIENCE_BAKE_GAIN / peak } else { 0.0 };
    filtered
        .iter()
        .map(|s| (s * scale * i16::MAX as f32) as i16)
        .collect()
}

/// Encode the noise loop as an in-memory WAV.
pub fn bake_noise_wav(seed: u64) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: AMBIENCE_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for sample in bake_noise_samples(seed) {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

#[derive(Component, Debug)]
pub struct AmbienceDrone;

/// Drone lifecycle. `device_lost` sticks for the rest of the session.
#[derive(Resource, Debug, Default)]
pub struct AmbienceState {
    pub drone: Option<Entity>,
    pub source: Option<Handle<AudioSource>>,
    pub frames_without_sink: u32,
    pub device_lost: bool,
}

impl AmbienceState {
    pub fn stop(&mut self, commands: &mut Commands) {
        if let Some(drone) = self.drone.take() {
            commands.entity(drone).try_despawn();
        }
        self.frames_without_sink = 0;
    }
}

/// Start, steer or stop the drone from the frame snapshot.
pub fn update_ambience(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    snapshot: Res<FrameSnapshot>,
    mut state: ResMut<AmbienceState>,
    mut audio_sources: ResMut<Assets<AudioSource>>,
    mut sinks: Query<&mut AudioSink, With<AmbienceDrone>>,
) {
    if !snapshot.state.audio_enabled || state.device_lost {
        state.stop(&mut commands);
        return;
    }

    let params = AmbienceParams::for_frame(clock.sim_time, snapshot.state.time_scale);

    let Some(drone) = state.drone else {
        if state.source.is_none() {
            match bake_noise_wav(AMBIENCE_SEED) {
                Ok(bytes) => {
                    state.source = Some(audio_sources.add(AudioSource {
                        bytes: bytes.into(),
                    }));
                }
                Err(error) => {
                    warn!("Ambience could not be baked, audio disabled: {error}");
                    state.device_lost = true;
                    return;
                }
            }
        }
        let Some(source) = state.source.clone() else {
            return;
        };
        let drone = commands
            .spawn((
                SceneEntity,
                AmbienceDrone,
                AudioPlayer(source),
                PlaybackSettings::LOOP
                    .with_volume(Volume::Linear(params.volume()))
                    .with_speed(params.playback_speed()),
            ))
            .id();
        state.drone = Some(drone);
        state.frames_without_sink = 0;
        info!("Ambience started");
        return;
    };

    match sinks.get_mut(drone) {
        Ok(mut sink) => {
            state.frames_without_sink = 0;
            sink.set_volume(Volume::Linear(params.volume()));
            sink.set_speed(params.playback_speed());
        }
        Err(_) => {
            state.frames_without_sink += 1;
            if state.frames_without_sink > AUDIO_SINK_GRACE_FRAMES {
                warn!("No audio output device, ambience disabled for this session");
                state.stop(&mut commands);
                state.device_lost = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutoff_follows_time_scale_magnitude() {
        let forward = AmbienceParams::for_frame(0.0, 4.0);
        let backward = AmbienceParams::for_frame(0.0, -4.0);
        assert_eq!(forward.cutoff_hz, 400.0);
        assert_eq!(forward.cutoff_hz, backward.cutoff_hz);
        assert_eq!(forward.playback_speed(), 1.0);
    }

    #[test]
    fn test_gain_oscillates_around_base() {
        let quarter = AmbienceParams::for_frame(std::f32::consts::FRAC_PI_2, 1.0);
        assert!((quarter.gain - 0.03).abs() < 1e-6);
        let rest = AmbienceParams::for_frame(0.0, 1.0);
        assert!((rest.gain - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_noise_is_seeded_and_bounded() {
        let a = bake_noise_samples(7);
        let b = bake_noise_samples(7);
        assert_eq!(a, b);
        let limit = (AMBIENCE_BAKE_GAIN * i16::MAX as f32) as i16 + 1;
        assert!(a.iter().all(|s| s.abs() <= limit));
    }

    #[test]
    fn test_wav_header() {
        let wav = bake_noise_wav(1).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
    }
}
