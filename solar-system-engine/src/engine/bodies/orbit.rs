use bevy::prelude::*;
use constants::orbital::ORBITAL_SPEED_DAMPING;
use std::f32::consts::TAU;

use crate::engine::state::view_state::{BodyId, FrameSnapshot};
use crate::engine::systems::simulation_clock::SimulationClock;

/// Whether a pivot carries a planet around the star or a moon around its planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotKind {
    Planet,
    Moon,
}

/// Group rotated about Y to carry its body around the parent.
#[derive(Component, Debug, Clone)]
pub struct OrbitPivot {
    pub body: BodyId,
    pub speed: f32,
    pub kind: PivotKind,
}

/// Planet orbital angle: `sim_time * speed * damping`, wrapped to [0, 2π).
pub fn orbital_angle(sim_time: f32, speed: f32) -> f32 {
    (sim_time * speed * ORBITAL_SPEED_DAMPING).rem_euclid(TAU)
}

/// Moons are not damped.
pub fn moon_angle(sim_time: f32, speed: f32) -> f32 {
    (sim_time * speed).rem_euclid(TAU)
}

/// Rotate every pivot to its absolute angle for the current sim time.
/// The selected planet's pivot holds still so camera tracking is stable.
pub fn update_orbits(
    clock: Res<SimulationClock>,
    snapshot: Res<FrameSnapshot>,
    mut pivots: Query<(&OrbitPivot, &mut Transform)>,
) {
    for (pivot, mut transform) in &mut pivots {
        let angle = match pivot.kind {
            PivotKind::Planet => {
                if snapshot.state.is_selected(&pivot.body) {
                    continue;
                }
                orbital_angle(clock.sim_time, pivot.speed)
            }
            PivotKind::Moon => moon_angle(clock.sim_time, pivot.speed),
        };
        transform.rotation = Quat::from_rotation_y(angle);
    }
}
