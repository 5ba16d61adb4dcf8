use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::view::NoFrustumCulling;
use constants::render_settings::{STARFIELD_COUNT, STARFIELD_EXTENT, STARFIELD_SEED};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::core::frame::{SceneAssets, SceneEntity};

/// Seeded star positions filling a cube of edge `extent` centred on the origin.
pub fn starfield_positions(count: usize, extent: f32, seed: u64) -> Vec<[f32; 3]> {
    let mut rng = StdRng::seed_from_u64(seed);
    let half = extent / 2.0;
    (0..count)
        .map(|_| {
            [
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
            ]
        })
        .collect()
}

pub fn spawn_starfield(commands: &mut Commands, assets: &mut SceneAssets) {
    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    mesh.insert_attribute(
        Mesh::ATTRIBUTE_POSITION,
        starfield_positions(STARFIELD_COUNT, STARFIELD_EXTENT, STARFIELD_SEED),
    );

    let material = assets.materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        ..default()
    });

    commands.spawn((
        SceneEntity,
        Name::new("Starfield"),
        Mesh3d(assets.meshes.add(mesh)),
        MeshMaterial3d(material),
        Transform::default(),
        NoFrustumCulling,
    ));
}
