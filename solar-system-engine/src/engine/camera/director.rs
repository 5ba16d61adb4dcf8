use bevy::prelude::*;
use bevy::transform::helper::TransformHelper;
use constants::render_settings::{
    CAMERA_LERP_FACTOR, DEEP_DIVE_BODY_PULL_BACK, DEEP_DIVE_LOOK_AT_OFFSET,
    DEEP_DIVE_STAR_PULL_BACK, DEFAULT_TRACKED_RADIUS, LANDMARK_STANDOFF, OVERVIEW_LOOK_AT_OFFSET,
    OVERVIEW_OFFSET, ROVER_STANDOFF_SCALE,
};

use super::orbit_controls::{MainCamera, OrbitCamera};
use crate::engine::bodies::registry::{BodyRegistry, current_world_position};
use crate::engine::catalog::body_facts::ReferenceFacts;
use crate::engine::state::view_state::{FrameSnapshot, ViewState};
use crate::engine::state::visual_modes::VisualMode;

/// Where the camera wants to be this frame. Never stored between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntent {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// World placement and size of the object being tracked.
#[derive(Debug, Clone, Copy)]
pub struct TrackedTarget {
    pub position: Vec3,
    pub radius: f32,
    pub is_star: bool,
}

/// Automatic movement is suspended while the user drags or in Stabilized mode.
pub fn camera_suspended(state: &ViewState, is_interacting: bool) -> bool {
    is_interacting || state.mode(VisualMode::Stabilized)
}

/// Offset policy: landmark focus, then deep-dive, then the overview framing.
/// `landmark` is the landmark's coordinate relative to the body centre.
pub fn resolve_intent(state: &ViewState, target: TrackedTarget, landmark: Option<Vec3>) -> CameraIntent {
    let size = if target.radius > 0.0 {
        target.radius
    } else {
        DEFAULT_TRACKED_RADIUS
    };

    if let Some(local) = landmark {
        let look_at = target.position + local;
        let normal = local.try_normalize().unwrap_or(Vec3::Y);
        let mut standoff = LANDMARK_STANDOFF * size;
        if state.mode(VisualMode::Rover) {
            standoff *= ROVER_STANDOFF_SCALE;
        }
        return CameraIntent {
            position: look_at + normal * standoff,
            look_at,
        };
    }

    if state.deep_dive_active {
        let pull_back = if target.is_star {
            DEEP_DIVE_STAR_PULL_BACK
        } else {
            DEEP_DIVE_BODY_PULL_BACK
        };
        return CameraIntent {
            position: target.position + OVERVIEW_OFFSET * size * pull_back,
            look_at: target.position + DEEP_DIVE_LOOK_AT_OFFSET * size,
        };
    }

    CameraIntent {
        position: target.position + OVERVIEW_OFFSET * size,
        look_at: target.position + OVERVIEW_LOOK_AT_OFFSET * size,
    }
}

/// One smoothing step toward the intent; returns the new (position, target).
pub fn smooth_toward(position: Vec3, target: Vec3, intent: CameraIntent) -> (Vec3, Vec3) {
    (
        position.lerp(intent.position, CAMERA_LERP_FACTOR),
        target.lerp(intent.look_at, CAMERA_LERP_FACTOR),
    )
}

/// Steer the camera toward the selected object. With no selection the camera
/// stays under direct user control.
pub fn direct_camera(
    snapshot: Res<FrameSnapshot>,
    registry: Res<BodyRegistry>,
    facts: Res<ReferenceFacts>,
    mut orbit: ResMut<OrbitCamera>,
    mut params: ParamSet<(TransformHelper, Query<&mut Transform, With<MainCamera>>)>,
) {
    let state = &snapshot.state;
    let Some(selected) = state.selected_body.as_ref() else {
        return;
    };
    if camera_suspended(state, orbit.is_interacting) {
        return;
    }
    let Some(tracked) = registry.get(selected) else {
        return;
    };
    let Some(position) = current_world_position(&params.p0(), tracked.entity) else {
        debug!("Tracked position for {selected} is not finite, holding camera");
        return;
    };

    let landmark = state
        .active_landmark
        .as_ref()
        .and_then(|landmark| facts.landmark(selected, landmark))
        .map(|landmark| landmark.local_position());

    let intent = resolve_intent(
        state,
        TrackedTarget {
            position,
            radius: tracked.radius,
            is_star: registry.is_star(selected),
        },
        landmark,
    );

    let mut cameras = params.p1();
    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };
    let (next_position, next_target) = smooth_toward(transform.translation, orbit.target, intent);
    if !next_position.is_finite() || !next_target.is_finite() {
        return;
    }
    transform.translation = next_position;
    orbit.target = next_target;
    transform.look_at(next_target, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::view_state::BodyId;

    fn selected_state() -> ViewState {
        ViewState {
            selected_body: Some(BodyId::new("Mars")),
            ..Default::default()
        }
    }

    fn mars() -> TrackedTarget {
        TrackedTarget {
            position: Vec3::new(85.0, 0.0, 0.0),
            radius: 1.8,
            is_star: false,
        }
    }

    #[test]
    fn test_overview_offset_scales_with_radius() {
        let intent = resolve_intent(&selected_state(), mars(), None);
        assert_eq!(intent.position, Vec3::new(85.0 + 4.0 * 1.8, 1.5 * 1.8, 8.0 * 1.8));
        assert_eq!(intent.look_at, Vec3::new(85.0 + 4.0 * 1.8, 0.0, 0.0));
    }

    #[test]
    fn test_deep_dive_pulls_back_further_for_star() {
        let mut state = selected_state();
        state.deep_dive_active = true;
        let body = resolve_intent(&state, mars(), None);
        let star = resolve_intent(
            &state,
            TrackedTarget {
                position: Vec3::ZERO,
                radius: 1.8,
                is_star: true,
            },
            None,
        );
        let body_distance = (body.position - mars().position).length();
        let star_distance = star.position.length();
        assert!(star_distance > body_distance);
        assert_eq!(body.look_at, mars().position + DEEP_DIVE_LOOK_AT_OFFSET * 1.8);
    }

    #[test]
    fn test_landmark_pins_look_at() {
        let local = Vec3::new(0.0, 1.8, 0.0);
        let intent = resolve_intent(&selected_state(), mars(), Some(local));
        assert_eq!(intent.look_at, mars().position + local);
        assert_eq!(intent.position, intent.look_at + Vec3::Y * LANDMARK_STANDOFF * 1.8);
    }

    #[test]
    fn test_rover_tightens_landmark_standoff() {
        let mut state = selected_state();
        state.visual_modes.set(VisualMode::Rover, true);
        let local = Vec3::new(1.8, 0.0, 0.0);
        let intent = resolve_intent(&state, mars(), Some(local));
        let standoff = (intent.position - intent.look_at).length();
        assert!((standoff - LANDMARK_STANDOFF * 1.8 * ROVER_STANDOFF_SCALE).abs() < 1e-5);
    }

    #[test]
    fn test_suspended_when_interacting_or_stabilized() {
        let mut state = selected_state();
        assert!(camera_suspended(&state, true));
        assert!(!camera_suspended(&state, false));
        state.visual_modes.set(VisualMode::Stabilized, true);
        assert!(camera_suspended(&state, false));
    }

    #[test]
    fn test_smoothing_moves_five_percent() {
        let intent = CameraIntent {
            position: Vec3::new(100.0, 0.0, 0.0),
            look_at: Vec3::new(0.0, 100.0, 0.0),
        };
        let (position, target) = smooth_toward(Vec3::ZERO, Vec3::ZERO, intent);
        assert!((position.x - 5.0).abs() < 1e-5);
        assert!((target.y - 5.0).abs() < 1e-5);
    }
}
