use bevy::math::cubic_splines::{CubicCardinalSpline, CubicCurve, CyclicCubicGenerator};
use bevy::prelude::*;
use constants::orbital::{MISSION_PHASE_STEP, MISSION_TRAVERSAL_RATE};

/// Closed Catmull-Rom loop through a mission's control points.
#[derive(Debug, Clone)]
pub struct MissionPath {
    curve: CubicCurve<Vec3>,
    segments: f32,
}

impl MissionPath {
    /// `None` for fewer than two points; such missions are not placed in 3D.
    pub fn new(points: &[Vec3]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let curve = CubicCardinalSpline::new_catmull_rom(points.iter().copied())
            .to_curve_cyclic()
            .ok()?;
        let segments = curve.segments().len() as f32;
        Some(Self { curve, segments })
    }

    /// Point at `progress` in [0, 1); the loop closes at 1.
    pub fn point_at(&self, progress: f32) -> Vec3 {
        self.curve
            .position(progress.rem_euclid(1.0) * self.segments)
    }

    /// Evenly spaced samples including the closing point.
    pub fn samples(&self, count: usize) -> Vec<Vec3> {
        (0..=count)
            .map(|i| self.curve.position(i as f32 / count as f32 * self.segments))
            .collect()
    }
}

/// Cyclic progress along a mission path, phase-shifted by catalog order.
/// Negative sim time wraps into [0, 1) as well.
pub fn mission_progress(sim_time: f32, index: usize) -> f32 {
    (sim_time * MISSION_TRAVERSAL_RATE + index as f32 * MISSION_PHASE_STEP).rem_euclid(1.0)
}
