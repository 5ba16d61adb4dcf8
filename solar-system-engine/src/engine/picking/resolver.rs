use bevy::math::bounding::{BoundingSphere, RayCast3d};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, SystemCursorIcon};
use bevy::winit::cursor::CursorIcon;

use crate::engine::bodies::registry::{PickRegistry, Pickable};
use crate::engine::camera::orbit_controls::MainCamera;
use crate::engine::state::view_state::{BodyId, ViewStateStore};

/// Far limit for pointer rays; beyond the starfield.
const MAX_PICK_DISTANCE: f32 = 10_000.0;

/// Nearest candidate hit by `ray`, as (entity, distance along the ray).
pub fn pick_nearest(
    ray: Ray3d,
    candidates: impl IntoIterator<Item = (Entity, Vec3, f32)>,
) -> Option<(Entity, f32)> {
    let cast = RayCast3d::from_ray(ray, MAX_PICK_DISTANCE);
    let mut best: Option<(Entity, f32)> = None;
    for (entity, centre, radius) in candidates {
        let Some(t) = cast.sphere_intersection_at(&BoundingSphere::new(centre, radius)) else {
            continue;
        };
        if best.is_none_or(|(_, nearest)| t < nearest) {
            best = Some((entity, t));
        }
    }
    best
}

/// What a pointer event does to the view state.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerAction {
    Select(BodyId),
    ClearSelection,
    Hover(Option<BodyId>),
}

/// Pointer-down selects the hit or clears on a miss; movement only hovers.
pub fn pointer_action(pressed: bool, hit: Option<BodyId>) -> PointerAction {
    match (pressed, hit) {
        (true, Some(id)) => PointerAction::Select(id),
        (true, None) => PointerAction::ClearSelection,
        (false, hit) => PointerAction::Hover(hit),
    }
}

/// Cast the cursor ray against every visible pickable and update hover and
/// selection. Skipped entirely while a UI overlay has the pointer.
pub fn resolve_pointer(
    mut commands: Commands,
    mut store: ResMut<ViewStateStore>,
    picks: Res<PickRegistry>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<(Entity, &Window), With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    pickables: Query<(Entity, &Pickable, &GlobalTransform, &InheritedVisibility)>,
    mut hovering: Local<Option<bool>>,
) {
    if store.state().ui_focus {
        return;
    }
    let Ok((window_entity, window)) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    let hit = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world(camera_transform, cursor).ok())
        .and_then(|ray| {
            pick_nearest(
                ray,
                pickables
                    .iter()
                    .filter(|(_, _, _, visible)| visible.get())
                    .map(|(entity, pickable, transform, _)| {
                        (entity, transform.translation(), pickable.radius)
                    }),
            )
        })
        .and_then(|(entity, _)| picks.identity(entity).cloned());

    let is_hit = hit.is_some();
    if *hovering != Some(is_hit) {
        let icon = if is_hit {
            SystemCursorIcon::Crosshair
        } else {
            SystemCursorIcon::Grab
        };
        commands
            .entity(window_entity)
            .insert(CursorIcon::from(icon));
        *hovering = Some(is_hit);
    }

    if mouse_button.just_pressed(MouseButton::Left) {
        // Pointer-down also refreshes hover so the tag follows the click.
        store.set_hovered(hit.clone());
    }
    match pointer_action(mouse_button.just_pressed(MouseButton::Left), hit) {
        PointerAction::Select(id) => {
            if store.select_body(Some(id.clone())) {
                info!("Selected {id}");
            }
        }
        PointerAction::ClearSelection => {
            if store.select_body(None) {
                info!("Selection cleared");
            }
        }
        PointerAction::Hover(id) => {
            store.set_hovered(id);
        }
    }
}

/// Native UI: any hovered or pressed UI node blocks 3D pointer handling.
#[cfg(not(target_arch = "wasm32"))]
pub fn track_ui_pointer_focus(
    mut store: ResMut<ViewStateStore>,
    interactions: Query<&Interaction, With<Node>>,
) {
    let focused = interactions
        .iter()
        .any(|interaction| *interaction != Interaction::None);
    store.set_ui_focus(focused);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray_along_x() -> Ray3d {
        Ray3d::new(Vec3::new(-100.0, 0.0, 0.0), Dir3::X)
    }

    #[test]
    fn test_nearest_hit_wins() {
        let near = Entity::from_raw(1);
        let far = Entity::from_raw(2);
        let hit = pick_nearest(
            ray_along_x(),
            [
                (far, Vec3::new(50.0, 0.0, 0.0), 5.0),
                (near, Vec3::new(0.0, 0.0, 0.0), 1.0),
            ],
        );
        assert_eq!(hit.map(|(e, _)| e), Some(near));
    }

    #[test]
    fn test_miss_returns_none() {
        let hit = pick_nearest(
            ray_along_x(),
            [(Entity::from_raw(1), Vec3::new(0.0, 10.0, 0.0), 1.0)],
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_pointer_down_miss_clears() {
        assert_eq!(pointer_action(true, None), PointerAction::ClearSelection);
        assert_eq!(
            pointer_action(true, Some(BodyId::new("Io"))),
            PointerAction::Select(BodyId::new("Io"))
        );
        assert_eq!(
            pointer_action(false, Some(BodyId::new("Io"))),
            PointerAction::Hover(Some(BodyId::new("Io")))
        );
    }
}
