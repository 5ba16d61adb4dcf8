use bevy::prelude::*;
use constants::render_settings::MAX_FRAME_DELTA;

use crate::engine::state::view_state::FrameSnapshot;

/// Simulated time, decoupled from the wall clock by the user time scale.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationClock {
    pub sim_time: f32,
    /// Clamped real delta of the current frame.
    pub real_delta: f32,
}

/// Clamp a wall-clock delta. Negative or non-finite deltas count as zero.
pub fn clamp_real_delta(delta: f32) -> f32 {
    if delta.is_finite() && delta > 0.0 {
        delta.min(MAX_FRAME_DELTA)
    } else {
        0.0
    }
}

/// `sim_time + real_delta * time_scale`.
pub fn advance(sim_time: f32, real_delta: f32, time_scale: f32) -> f32 {
    sim_time + real_delta * time_scale
}

pub fn advance_simulation_clock(
    time: Res<Time>,
    snapshot: Res<FrameSnapshot>,
    mut clock: ResMut<SimulationClock>,
) {
    let real_delta = clamp_real_delta(time.delta_secs());
    clock.real_delta = real_delta;
    clock.sim_time = advance(clock.sim_time, real_delta, snapshot.state.time_scale);
}

pub fn reset_simulation_clock(mut clock: ResMut<SimulationClock>) {
    *clock = SimulationClock::default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_is_capped() {
        assert_eq!(clamp_real_delta(2.0), MAX_FRAME_DELTA);
        assert_eq!(clamp_real_delta(0.016), 0.016);
        assert_eq!(clamp_real_delta(-1.0), 0.0);
        assert_eq!(clamp_real_delta(f32::NAN), 0.0);
    }

    #[test]
    fn test_forward_then_reverse_returns_to_start() {
        for scale in [-10.0, -3.5, 0.0, 0.25, 1.0, 42.0, 100.0] {
            let start = 123.25;
            let mut t = start;
            for _ in 0..10 {
                t = advance(t, 0.016, scale);
            }
            for _ in 0..10 {
                t = advance(t, 0.016, -scale);
            }
            assert!((t - start).abs() < 1e-3, "scale {scale} drifted to {t}");
        }
    }

    #[test]
    fn test_advance_is_linear_in_scale() {
        let a = advance(0.0, 0.1, 2.0);
        let b = advance(0.0, 0.1, 4.0);
        assert!((b - 2.0 * a).abs() < 1e-6);
    }
}
