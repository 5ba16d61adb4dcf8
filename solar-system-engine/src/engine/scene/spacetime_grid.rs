/// Gravity-well grid rendered below the orbital plane in Gravity mode
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::view::NoFrustumCulling;
use bevy::transform::helper::TransformHelper;
use constants::spacetime_grid::{
    GRID_BASE_OPACITY, GRID_ELEVATION, GRID_OPACITY_AMPLITUDE, GRID_OPACITY_FREQUENCY,
    GRID_SEGMENTS, GRID_SIZE, MAX_DISPLACEMENT, STAR_GRAVITY_MASS, WELL_EPSILON, WELL_STRENGTH,
};

use crate::engine::bodies::controller::set_alpha;
use crate::engine::bodies::registry::{BodyRegistry, current_world_position};
use crate::engine::core::frame::{SceneAssets, SceneEntity};
use crate::engine::state::view_state::{BodyId, FrameSnapshot};
use crate::engine::state::visual_modes::VisualMode;
use crate::engine::systems::simulation_clock::SimulationClock;

/// Live grid mesh plus the unwarped vertex positions it is rebuilt from.
#[derive(Component, Debug)]
pub struct SpacetimeGrid {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
    /// Captured once at creation, never written afterwards.
    pub base_positions: Vec<Vec3>,
}

/// Centre and mass of the well for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityWell {
    pub centre: Vec3,
    pub mass: f32,
}

impl GravityWell {
    pub const STAR: Self = Self {
        centre: Vec3::ZERO,
        mass: STAR_GRAVITY_MASS,
    };
}

/// Flat grid positions in the mesh's local space, row-major.
pub fn grid_base_positions(size: f32, segments: usize) -> Vec<Vec3> {
    let step = size / segments as f32;
    let half = size / 2.0;
    (0..=segments)
        .flat_map(|row| {
            (0..=segments).map(move |col| {
                Vec3::new(col as f32 * step - half, 0.0, row as f32 * step - half)
            })
        })
        .collect()
}

/// Line-list indices joining each vertex to its right and lower neighbour.
fn grid_line_indices(segments: usize) -> Vec<u32> {
    let stride = segments + 1;
    let mut indices = Vec::with_capacity(segments * stride * 4);
    for row in 0..=segments {
        for col in 0..=segments {
            let i = (row * stride + col) as u32;
            if col < segments {
                indices.extend([i, i + 1]);
            }
            if row < segments {
                indices.extend([i, i + stride as u32]);
            }
        }
    }
    indices
}

/// Clamped inverse-square depth of the well at planar distance² `d2`.
pub fn well_depth(d2: f32, mass: f32) -> f32 {
    (mass * WELL_STRENGTH / (d2 + WELL_EPSILON)).min(MAX_DISPLACEMENT)
}

/// Warp the base positions into a downward well. Always computed from the
/// base, so identical inputs give identical output.
pub fn warp_heights(base: &[Vec3], centre: Vec3, mass: f32) -> Vec<[f32; 3]> {
    base.iter()
        .map(|vertex| {
            let dx = vertex.x - centre.x;
            let dz = vertex.z - centre.z;
            let depth = well_depth(dx * dx + dz * dz, mass);
            [vertex.x, vertex.y - depth, vertex.z]
        })
        .collect()
}

/// Gravity source for a selection: the star (origin, fixed mass) when
/// nothing or the star is selected, otherwise the body's live position.
/// `None` when the selected body's position is unavailable this frame.
pub fn resolve_gravity_well(
    selected: Option<&BodyId>,
    registry: &BodyRegistry,
    position_of: impl Fn(Entity) -> Option<Vec3>,
) -> Option<GravityWell> {
    let Some(id) = selected else {
        return Some(GravityWell::STAR);
    };
    if registry.is_star(id) {
        return Some(GravityWell::STAR);
    }
    let Some(tracked) = registry.get(id) else {
        return Some(GravityWell::STAR);
    };
    Some(GravityWell {
        centre: position_of(tracked.entity)?,
        mass: tracked.gravity_mass,
    })
}

pub fn grid_opacity(sim_time: f32) -> f32 {
    GRID_BASE_OPACITY + GRID_OPACITY_AMPLITUDE * (sim_time * GRID_OPACITY_FREQUENCY).sin()
}

pub fn spawn_spacetime_grid(commands: &mut Commands, assets: &mut SceneAssets) {
    let base_positions = grid_base_positions(GRID_SIZE, GRID_SEGMENTS);
    let positions: Vec<[f32; 3]> = base_positions.iter().map(|p| p.to_array()).collect();

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_indices(Indices::U32(grid_line_indices(GRID_SEGMENTS)));
    let mesh = assets.meshes.add(mesh);

    let material = assets.materials.add(StandardMaterial {
        base_color: Color::srgba(0.3, 0.6, 1.0, GRID_BASE_OPACITY),
        alpha_mode: AlphaMode::Add,
        unlit: true,
        ..default()
    });

    commands.spawn((
        SceneEntity,
        Name::new("Spacetime grid"),
        SpacetimeGrid {
            mesh: mesh.clone(),
            material: material.clone(),
            base_positions,
        },
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::from_xyz(0.0, GRID_ELEVATION, 0.0),
        Visibility::Hidden,
        NoFrustumCulling,
    ));
}

pub fn update_spacetime_grid(
    clock: Res<SimulationClock>,
    snapshot: Res<FrameSnapshot>,
    registry: Res<BodyRegistry>,
    helper: TransformHelper,
    mut grids: Query<(&SpacetimeGrid, &mut Visibility)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Ok((grid, mut visibility)) = grids.single_mut() else {
        return;
    };

    if !snapshot.state.mode(VisualMode::Gravity) {
        visibility.set_if_neq(Visibility::Hidden);
        return;
    }
    visibility.set_if_neq(Visibility::Inherited);
    set_alpha(&mut materials, &grid.material, grid_opacity(clock.sim_time));

    let Some(well) = resolve_gravity_well(
        snapshot.state.selected_body.as_ref(),
        &registry,
        |entity| current_world_position(&helper, entity),
    ) else {
        debug!("Gravity source has no valid position this frame");
        return;
    };

    if let Some(mesh) = meshes.get_mut(&grid.mesh) {
        mesh.insert_attribute(
            Mesh::ATTRIBUTE_POSITION,
            warp_heights(&grid.base_positions, well.centre, well.mass),
        );
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
                entity: Entity::from_raw(1),
                radius: 8.0,
                gravity_mass: 99.0,
                kind: TrackedKind::Star,
            },
        );
        registry.insert(
            BodyId::new("Jupiter"),
            TrackedBody {
                entity: Entity::from_raw(2),
                radius: 5.5,
                gravity_mass: 11.0,
                kind: TrackedKind::Planet,
            },
        );
        registry
    }

    #[test]
    fn test_warp_is_idempotent() {
        let base = grid_base_positions(100.0, 10);
        let first = warp_heights(&base, Vec3::new(5.0, 0.0, -3.0), 12.0);
        let second = warp_heights(&base, Vec3::new(5.0, 0.0, -3.0), 12.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_well_sinks_below_the_plane() {
        let base = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(40.0, 0.0, 0.0)];
        let warped = warp_heights(&base, Vec3::ZERO, 30.0);
        assert_eq!(warped[0][1], -MAX_DISPLACEMENT);
        assert!(warped[1][1] < 0.0 && warped[1][1] > warped[0][1]);
    }

    #[test]
    fn test_well_is_clamped_at_centre() {
        assert_eq!(well_depth(0.0, 30.0), MAX_DISPLACEMENT);
        assert!((well_depth(900.0, 1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_selecting_star_uses_fixed_mass_at_origin() {
        let registry = registry();
        let well = resolve_gravity_well(Some(&BodyId::new("Sun")), &registry, |_| {
            Some(Vec3::new(1.0, 2.0, 3.0))
        });
        assert_eq!(well, Some(GravityWell::STAR));
        assert_eq!(
            resolve_gravity_well(None, &registry, |_| None),
            Some(GravityWell::STAR)
        );
    }

    #[test]
    fn test_selected_planet_drives_well() {
        let registry = registry();
        let well = resolve_gravity_well(Some(&BodyId::new("Jupiter")), &registry, |_| {
            Some(Vec3::new(125.0, 0.0, 0.0))
        })
        .unwrap();
        assert_eq!(well.centre, Vec3::new(125.0, 0.0, 0.0));
        assert_eq!(well.mass, 11.0);
    }

    #[test]
    fn test_grid_line_count() {
        let indices = grid_line_indices(2);
        // 3 rows and 3 columns of 2 segments each
        assert_eq!(indices.len(), 12 * 2);
        assert_eq!(grid_base_positions(10.0, 2).len(), 9);
    }
}
