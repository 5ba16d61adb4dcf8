use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::view::NoFrustumCulling;
use constants::orbital::{
    MISSION_GRAVITY_MASS, MISSION_MARKER_RADIUS, MISSION_PATH_OPACITY, MISSION_PATH_SAMPLES,
    MISSION_PICK_RADIUS, MISSION_PULSE_ALPHA_AMPLITUDE, MISSION_PULSE_BASE_ALPHA,
    MISSION_PULSE_FREQUENCY, MISSION_PULSE_RADIUS, MISSION_PULSE_SCALE_AMPLITUDE,
};

use super::path::{MissionPath, mission_progress};
use crate::engine::bodies::controller::set_alpha;
use crate::engine::bodies::registry::{
    BodyRegistry, PickRegistry, Pickable, TrackedBody, TrackedKind,
};
use crate::engine::catalog::solar_system::{SolarSystemCatalog, parse_colour};
use crate::engine::core::error::SceneBuildError;
use crate::engine::core::frame::{SceneAssets, SceneEntity};
use crate::engine::state::view_state::{BodyId, FrameSnapshot};
use crate::engine::systems::simulation_clock::SimulationClock;

/// Parent of every mission path line and marker; toggled as one unit.
#[derive(Component, Debug)]
pub struct MissionLayer;

#[derive(Component, Debug, Clone)]
pub struct MissionMarker {
    pub id: BodyId,
    /// Catalog index, used for the phase offset.
    pub index: usize,
    pub path: MissionPath,
}

#[derive(Component, Debug, Clone)]
pub struct MissionPulse {
    pub material: Handle<StandardMaterial>,
}

/// Pulse scale and opacity, independent of path progress.
pub fn pulse(sim_time: f32) -> (f32, f32) {
    let wave = (sim_time * MISSION_PULSE_FREQUENCY).sin();
    (
        1.0 + MISSION_PULSE_SCALE_AMPLITUDE * wave,
        MISSION_PULSE_BASE_ALPHA + MISSION_PULSE_ALPHA_AMPLITUDE * wave,
    )
}

fn create_path_mesh(points: &[Vec3]) -> Mesh {
    let positions: Vec<[f32; 3]> = points.iter().map(|p| p.to_array()).collect();
    let mut mesh = Mesh::new(PrimitiveTopology::LineStrip, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh
}

/// Spawn path lines and markers for every mission that can be placed in 3D.
/// Missions without a usable path stay available as reference data only.
pub fn spawn_missions(
    commands: &mut Commands,
    catalog: &SolarSystemCatalog,
    assets: &mut SceneAssets,
    registry: &mut BodyRegistry,
    picks: &mut PickRegistry,
) -> Result<usize, SceneBuildError> {
    let layer = commands
        .spawn((
            SceneEntity,
            MissionLayer,
            Name::new("Missions"),
            Transform::default(),
            Visibility::Hidden,
        ))
        .id();

    let marker_mesh = assets
        .meshes
        .add(Sphere::new(MISSION_MARKER_RADIUS).mesh().uv(16, 8));
    let pulse_mesh = assets
        .meshes
        .add(Sphere::new(MISSION_PULSE_RADIUS).mesh().uv(16, 8));

    let mut placed = 0;
    for (index, mission) in catalog.missions.iter().enumerate() {
        let Some(path) = mission
            .control_points()
            .and_then(|points| MissionPath::new(&points))
        else {
            continue;
        };
        let colour = parse_colour(&mission.name, &mission.colour)?;
        let id = BodyId::new(mission.name.as_str());

        let line_material = assets.materials.add(StandardMaterial {
            base_color: colour.with_alpha(MISSION_PATH_OPACITY),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        let line_mesh = assets
            .meshes
            .add(create_path_mesh(&path.samples(MISSION_PATH_SAMPLES)));
        commands.spawn((
            Mesh3d(line_mesh),
            MeshMaterial3d(line_material),
            Transform::default(),
            NoFrustumCulling,
            ChildOf(layer),
        ));

        let marker_material = assets.materials.add(StandardMaterial {
            base_color: colour,
            emissive: colour.to_linear(),
            unlit: true,
            ..default()
        });
        let pulse_material = assets.materials.add(StandardMaterial {
            base_color: colour.with_alpha(MISSION_PULSE_BASE_ALPHA),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });

        let start = path.point_at(mission_progress(0.0, index));
        let marker = commands
            .spawn((
                Name::new(mission.name.clone()),
                MissionMarker {
                    id: id.clone(),
                    index,
                    path,
                },
                Pickable {
                    radius: MISSION_PICK_RADIUS,
                },
                Mesh3d(marker_mesh.clone()),
                MeshMaterial3d(marker_material),
                Transform::from_translation(start),
                ChildOf(layer),
            ))
            .id();
        commands.spawn((
            MissionPulse {
                material: pulse_material.clone(),
            },
            Mesh3d(pulse_mesh.clone()),
            MeshMaterial3d(pulse_material),
            Transform::default(),
            ChildOf(marker),
        ));

        picks.register(marker, id.clone());
        registry.insert(
            id,
            TrackedBody {
                entity: marker,
                radius: MISSION_PICK_RADIUS,
                gravity_mass: MISSION_GRAVITY_MASS,
                kind: TrackedKind::Mission,
            },
        );
        placed += 1;
    }

    info!(
        "Placed {placed} of {} missions on 3D paths",
        catalog.missions.len()
    );
    Ok(placed)
}

/// Show or hide the mission layer; when visible, move markers along their
/// loops and animate the pulses. Hidden missions keep their transforms.
pub fn update_missions(
    clock: Res<SimulationClock>,
    snapshot: Res<FrameSnapshot>,
    mut layer: Query<&mut Visibility, With<MissionLayer>>,
    mut markers: Query<(&MissionMarker, &mut Transform), Without<MissionPulse>>,
    mut pulses: Query<(&MissionPulse, &mut Transform), Without<MissionMarker>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let visible = snapshot.state.missions_visible;
    if let Ok(mut visibility) = layer.single_mut() {
        visibility.set_if_neq(if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        });
    }
    if !visible {
        return;
    }

    for (marker, mut transform) in &mut markers {
        let position = marker
            .path
            .point_at(mission_progress(clock.sim_time, marker.index));
        if position.is_finite() {
            transform.translation = position;
        }
    }

    let (scale, alpha) = pulse(clock.sim_time);
    for (pulse, mut transform) in &mut pulses {
        transform.scale = Vec3::splat(scale);
        set_alpha(&mut materials, &pulse.material, alpha);
    }
}
