use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::render::view::ColorGrading;
use constants::render_settings::{
    CAMERA_FOV_DEGREES, INITIAL_CAMERA_POSITION, ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE,
    ORBIT_PIXEL_SCROLL_SCALE, ORBIT_ROTATE_SENSITIVITY, ORBIT_ZOOM_SENSITIVITY,
};

use crate::engine::state::view_state::ViewStateStore;

/// The single 3D scene camera.
#[derive(Component, Debug)]
pub struct MainCamera;

/// Orbit-control state: the point the camera orbits and looks at, and
/// whether the user is dragging the view.
#[derive(Resource, Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub is_interacting: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            is_interacting: false,
        }
    }
}

/// Largest pitch away from the horizon, keeps `look_at` from flipping at the poles.
const MAX_PITCH: f32 = 1.5;

/// Rotate the camera offset about the target: yaw about world Y, pitch about
/// the camera's horizontal axis.
pub fn orbit_offset(offset: Vec3, delta: Vec2) -> Vec3 {
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return offset;
    }
    let yaw = offset.x.atan2(offset.z) - delta.x * ORBIT_ROTATE_SENSITIVITY;
    let pitch = ((offset.y / distance).clamp(-1.0, 1.0).asin()
        + delta.y * ORBIT_ROTATE_SENSITIVITY)
        .clamp(-MAX_PITCH, MAX_PITCH);
    Vec3::new(
        distance * pitch.cos() * yaw.sin(),
        distance * pitch.sin(),
        distance * pitch.cos() * yaw.cos(),
    )
}

/// Dolly along the offset; positive scroll moves in. Distance stays in range.
pub fn dolly(offset: Vec3, scroll: f32) -> Vec3 {
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return offset;
    }
    let next = (distance * (1.0 - scroll * ORBIT_ZOOM_SENSITIVITY))
        .clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
    offset * (next / distance)
}

pub fn spawn_main_camera(mut commands: Commands) {
    commands.spawn((
        MainCamera,
        Name::new("Main camera"),
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: 0.1,
            far: 20_000.0,
            ..default()
        }),
        Tonemapping::TonyMcMapface,
        ColorGrading::default(),
        Transform::from_translation(INITIAL_CAMERA_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Mouse drag orbits, wheel dollies. A drag only counts as interaction when
/// it started over the 3D view rather than over UI.
pub fn orbit_camera_controls(
    mut orbit: ResMut<OrbitCamera>,
    store: Res<ViewStateStore>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    mut camera: Query<&mut Transform, With<MainCamera>>,
) {
    let drag_buttons = [MouseButton::Left, MouseButton::Right];
    if mouse_button.any_just_pressed(drag_buttons) && !store.state().ui_focus {
        orbit.is_interacting = true;
    }
    if !mouse_button.any_pressed(drag_buttons) {
        orbit.is_interacting = false;
    }

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * ORBIT_PIXEL_SCROLL_SCALE,
        };
    }
    if store.state().ui_focus {
        scroll_accum = 0.0;
    }

    let Ok(mut transform) = camera.single_mut() else {
        return;
    };

    let mut offset = transform.translation - orbit.target;
    if orbit.is_interacting && mouse_delta != Vec2::ZERO {
        offset = orbit_offset(offset, mouse_delta);
    }
    if scroll_accum.abs() > f32::EPSILON {
        offset = dolly(offset, scroll_accum);
    }
    if !offset.is_finite() {
        return;
    }

    transform.translation = orbit.target + offset;
    transform.look_at(orbit.target, Vec3::Y);
}
