use bevy::prelude::*;
use bevy::transform::helper::TransformHelper;
use constants::orbital::{LAB_OFFSET_FACTOR, LAB_REFERENCE_BODY};

use super::registry::{BodyRegistry, current_world_position};
use crate::engine::catalog::solar_system::{SolarSystemCatalog, parse_colour};
use crate::engine::core::error::SceneBuildError;
use crate::engine::core::frame::{SceneAssets, SceneEntity};
use crate::engine::state::view_state::{BodyId, FrameSnapshot};
use crate::engine::textures::procedural::{generate_surface, seed_for};

/// Reference copy of Earth shown beside the selected body in the comparison lab.
#[derive(Component, Debug, Clone, Copy)]
pub struct LabReference {
    pub radius: f32,
}

pub fn spawn_lab_reference(
    commands: &mut Commands,
    catalog: &SolarSystemCatalog,
    assets: &mut SceneAssets,
) -> Result<(), SceneBuildError> {
    let Some(reference) = catalog.body(LAB_REFERENCE_BODY) else {
        debug!("No {LAB_REFERENCE_BODY} in catalog, comparison lab disabled");
        return Ok(());
    };

    let colour = parse_colour(&reference.name, &reference.colour)?;
    let texture = assets.images.add(generate_surface(
        reference.surface,
        colour,
        seed_for(&reference.name),
    ));
    let material = assets.materials.add(StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: Some(texture),
        perceptual_roughness: 0.9,
        ..default()
    });
    let mesh = assets
        .meshes
        .add(Sphere::new(reference.radius).mesh().uv(48, 24));

    commands.spawn((
        SceneEntity,
        Name::new("Lab reference"),
        LabReference {
            radius: reference.radius,
        },
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::default(),
        Visibility::Hidden,
    ));
    Ok(())
}

/// Where the reference sits for a selection, or `None` when it should be hidden.
pub fn lab_reference_offset(
    selected: &BodyId,
    selected_radius: f32,
    reference_radius: f32,
    registry: &BodyRegistry,
) -> Option<Vec3> {
    if registry.is_star(selected) || selected.as_str() == LAB_REFERENCE_BODY {
        return None;
    }
    Some(Vec3::X * (selected_radius * LAB_OFFSET_FACTOR + reference_radius))
}

pub fn update_lab_reference(
    snapshot: Res<FrameSnapshot>,
    registry: Res<BodyRegistry>,
    mut params: ParamSet<(
        TransformHelper,
        Query<(&LabReference, &mut Transform, &mut Visibility)>,
    )>,
) {
    let Ok(reference_radius) = params.p1().single().map(|(lab, _, _)| lab.radius) else {
        return;
    };

    let placement = snapshot
        .state
        .selected_body
        .as_ref()
        .filter(|_| snapshot.state.lab_mode)
        .and_then(|id| {
            let tracked = registry.get(id)?;
            let offset = lab_reference_offset(id, tracked.radius, reference_radius, &registry)?;
            Some(current_world_position(&params.p0(), tracked.entity)? + offset)
        });

    let mut reference = params.p1();
    let Ok((_, mut transform, mut visibility)) = reference.single_mut() else {
        return;
    };
    match placement {
        Some(position) => {
            transform.translation = position;
            visibility.set_if_neq(Visibility::Inherited);
        }
        None => {
            visibility.set_if_neq(Visibility::Hidden);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::bodies::registry::{TrackedBody, TrackedKind};

    fn registry() -> BodyRegistry {
        let mut registry = BodyRegistry::default();
        registry.insert(
            BodyId::new("Sun"),
            TrackedBody {
                entity: Entity::PLACEHOLDER,
                radius: 8.0,
                gravity_mass: 30.0,
                kind: TrackedKind::Star,
            },
        );
        registry
    }

    #[test]
    fn test_hidden_for_star_and_reference_itself() {
        let registry = registry();
        assert!(lab_reference_offset(&BodyId::new("Sun"), 8.0, 2.2, &registry).is_none());
        assert!(lab_reference_offset(&BodyId::new("Earth"), 2.2, 2.2, &registry).is_none());
    }

    #[test]
    fn test_reference_clears_selected_body() {
        let offset = lab_reference_offset(&BodyId::new("Jupiter"), 5.5, 2.2, &registry()).unwrap();
        assert_eq!(offset, Vec3::new(5.5 * LAB_OFFSET_FACTOR + 2.2, 0.0, 0.0));
    }
}
