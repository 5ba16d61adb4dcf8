use bevy::prelude::*;
use constants::orbital::{
    ATMOSPHERE_ALPHA_NORMAL, BELT_HALF_HEIGHT, BELT_HALF_WIDTH, BELT_ROCK_COUNT, BELT_SEED,
    CORONA_ALPHA_BASE, CORONA_SCALE, HEATMAP_ALPHA, STAR_EMISSIVE_STRENGTH,
};
use constants::render_settings::{ORBIT_RING_OPACITY, ORBIT_RING_THICKNESS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{FRAC_PI_2, TAU};

use super::controller::{BodyController, BodyVisual, PlanetLayers, StarLayers};
use super::orbit::{OrbitPivot, PivotKind};
use super::registry::{BodyRegistry, PickRegistry, Pickable, TrackedBody, TrackedKind};
use crate::engine::catalog::solar_system::{
    BodyClass, BodySpec, MoonSpec, SolarSystemCatalog, SurfaceStyle, parse_colour,
};
use crate::engine::core::error::SceneBuildError;
use crate::engine::core::frame::{SceneAssets, SceneEntity};
use crate::engine::state::view_state::BodyId;
use crate::engine::textures::procedural::{
    generate_heatmap, generate_solid, generate_surface, seed_for,
};
use crate::engine::textures::PendingSurfaceTexture;

/// Atmosphere, heatmap and interior shells relative to the body radius.
const ATMOSPHERE_SCALE: f32 = 1.04;
const HEATMAP_SCALE: f32 = 1.01;

const MANTLE_COLOUR: Color = Color::srgb(0.85, 0.35, 0.1);
const CORE_COLOUR: Color = Color::srgb(1.0, 0.85, 0.3);

/// Build every catalog body: star, planets with their moons, and the belt.
pub fn spawn_solar_system(
    commands: &mut Commands,
    catalog: &SolarSystemCatalog,
    assets: &mut SceneAssets,
    registry: &mut BodyRegistry,
    picks: &mut PickRegistry,
) -> Result<(), SceneBuildError> {
    for body in &catalog.bodies {
        match body.kind {
            BodyClass::Star => spawn_star(commands, body, assets, registry, picks)?,
            BodyClass::Planet => spawn_planet(commands, body, assets, registry, picks)?,
            BodyClass::Belt => spawn_belt(commands, body, assets, registry, picks)?,
        }
    }

    info!(
        "Spawned {} bodies ({} pickable)",
        registry.len(),
        picks.len()
    );
    Ok(())
}

fn sphere(meshes: &mut Assets<Mesh>, radius: f32) -> Handle<Mesh> {
    meshes.add(Sphere::new(radius).mesh().uv(48, 24))
}

fn surface_material(
    assets: &mut SceneAssets,
    name: &str,
    style: SurfaceStyle,
    colour: Color,
) -> Handle<StandardMaterial> {
    let texture = assets
        .images
        .add(generate_surface(style, colour, seed_for(name)));
    assets.materials.add(StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: Some(texture),
        perceptual_roughness: 0.9,
        ..default()
    })
}

/// Queue a photographic texture; the procedural one stays if the load fails.
fn request_texture(
    commands: &mut Commands,
    assets: &SceneAssets,
    surface: Entity,
    material: &Handle<StandardMaterial>,
    path: Option<&String>,
) {
    let (Some(server), Some(path)) = (assets.asset_server, path) else {
        return;
    };
    commands.entity(surface).insert(PendingSurfaceTexture {
        image: server.load(path.clone()),
        material: material.clone(),
    });
}

fn spawn_star(
    commands: &mut Commands,
    body: &BodySpec,
    assets: &mut SceneAssets,
    registry: &mut BodyRegistry,
    picks: &mut PickRegistry,
) -> Result<(), SceneBuildError> {
    let colour = parse_colour(&body.name, &body.colour)?;
    let base_emissive = colour.to_linear();
    let id = BodyId::new(body.name.as_str());

    let texture = assets
        .images
        .add(generate_surface(body.surface, colour, seed_for(&body.name)));
    let surface_material = assets.materials.add(StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: Some(texture),
        emissive: base_emissive * STAR_EMISSIVE_STRENGTH,
        unlit: true,
        ..default()
    });
    let corona_material = assets.materials.add(StandardMaterial {
        base_color: colour.with_alpha(CORONA_ALPHA_BASE),
        alpha_mode: AlphaMode::Add,
        unlit: true,
        ..default()
    });
    let surface_mesh = sphere(assets.meshes, body.radius);
    let corona_mesh = sphere(assets.meshes, body.radius * CORONA_SCALE);

    let root = commands
        .spawn((
            SceneEntity,
            Name::new(body.name.clone()),
            Transform::default(),
            Visibility::default(),
            Pickable {
                radius: body.radius,
            },
        ))
        .id();

    let spinner = commands
        .spawn((Transform::default(), Visibility::default(), ChildOf(root)))
        .id();
    let surface = commands
        .spawn((
            Mesh3d(surface_mesh),
            MeshMaterial3d(surface_material.clone()),
            Transform::default(),
            ChildOf(spinner),
        ))
        .id();
    request_texture(
        commands,
        assets,
        surface,
        &surface_material,
        body.texture.as_ref(),
    );

    let corona = commands
        .spawn((
            Mesh3d(corona_mesh),
            MeshMaterial3d(corona_material.clone()),
            Transform::default(),
            ChildOf(root),
        ))
        .id();

    commands.spawn((
        PointLight {
            color: colour,
            intensity: 2.0e9,
            range: 2000.0,
            radius: body.radius,
            shadows_enabled: false,
            ..default()
        },
        Transform::default(),
        ChildOf(root),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 80.0,
        ..default()
    });

    commands.entity(root).insert(BodyController {
        id: id.clone(),
        spinner,
        spin_rate: body.spin_rate,
        axial_tilt: body.axial_tilt,
        visual: BodyVisual::Star(StarLayers {
            surface_material,
            corona,
            corona_material,
            base_emissive,
        }),
    });

    picks.register(root, id.clone());
    registry.insert(
        id,
        TrackedBody {
            entity: root,
            radius: body.radius,
            gravity_mass: body.gravity_mass(),
            kind: TrackedKind::Star,
        },
    );
    Ok(())
}

fn spawn_orbit_ring(commands: &mut Commands, assets: &mut SceneAssets, distance: f32) {
    let mesh = assets.meshes.add(Torus {
        minor_radius: ORBIT_RING_THICKNESS,
        major_radius: distance,
    });
    let material = assets.materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, ORBIT_RING_OPACITY),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });
    commands.spawn((
        SceneEntity,
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::default(),
    ));
}

fn spawn_planet(
    commands: &mut Commands,
    body: &BodySpec,
    assets: &mut SceneAssets,
    registry: &mut BodyRegistry,
    picks: &mut PickRegistry,
) -> Result<(), SceneBuildError> {
    let colour = parse_colour(&body.name, &body.colour)?;
    let id = BodyId::new(body.name.as_str());

    let pivot = commands
        .spawn((
            SceneEntity,
            Name::new(format!("{} orbit", body.name)),
            OrbitPivot {
                body: id.clone(),
                speed: body.speed,
                kind: PivotKind::Planet,
            },
            Transform::default(),
            Visibility::default(),
        ))
        .id();
    spawn_orbit_ring(commands, assets, body.distance);

    let root = commands
        .spawn((
            Name::new(body.name.clone()),
            Transform::from_xyz(body.distance, 0.0, 0.0),
            Visibility::default(),
            Pickable {
                radius: body.radius,
            },
            ChildOf(pivot),
        ))
        .id();
    let spinner = commands
        .spawn((Transform::default(), Visibility::default(), ChildOf(root)))
        .id();

    let surface_material = surface_material(assets, &body.name, body.surface, colour);
    let surface_mesh = sphere(assets.meshes, body.radius);
    let surface = commands
        .spawn((
            Mesh3d(surface_mesh),
            MeshMaterial3d(surface_material.clone()),
            Transform::default(),
            ChildOf(spinner),
        ))
        .id();
    request_texture(
        commands,
        assets,
        surface,
        &surface_material,
        body.texture.as_ref(),
    );

    let atmosphere_material = match &body.atmosphere {
        Some(atmosphere) => {
            let tint = parse_colour(&body.name, atmosphere)?;
            let material = assets.materials.add(StandardMaterial {
                base_color: tint.with_alpha(ATMOSPHERE_ALPHA_NORMAL),
                alpha_mode: AlphaMode::Blend,
                ..default()
            });
            let mesh = sphere(assets.meshes, body.radius * ATMOSPHERE_SCALE);
            commands.spawn((
                Mesh3d(mesh),
                MeshMaterial3d(material.clone()),
                Transform::default(),
                ChildOf(spinner),
            ));
            Some(material)
        }
        None => None,
    };

    let heatmap = body.heatmap.then(|| {
        let texture = assets.images.add(generate_heatmap(seed_for(&body.name)));
        let material = assets.materials.add(StandardMaterial {
            base_color: Color::WHITE.with_alpha(HEATMAP_ALPHA),
            base_color_texture: Some(texture),
            alpha_mode: AlphaMode::Add,
            unlit: true,
            ..default()
        });
        let mesh = sphere(assets.meshes, body.radius * HEATMAP_SCALE);
        commands
            .spawn((
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::default(),
                Visibility::Hidden,
                ChildOf(spinner),
            ))
            .id()
    });

    let interior = body.interior.map(|interior| {
        [
            (interior.mantle, MANTLE_COLOUR),
            (interior.core, CORE_COLOUR),
        ]
        .map(|(fraction, shell_colour)| {
            let texture = assets.images.add(generate_solid(shell_colour));
            let material = assets.materials.add(StandardMaterial {
                base_color: Color::WHITE,
                base_color_texture: Some(texture),
                emissive: shell_colour.to_linear() * 0.5,
                ..default()
            });
            let mesh = sphere(assets.meshes, body.radius * fraction);
            commands
                .spawn((
                    Mesh3d(mesh),
                    MeshMaterial3d(material),
                    Transform::default(),
                    Visibility::Hidden,
                    ChildOf(spinner),
                ))
                .id()
        })
    });

    if let Some(rings) = body.rings {
        let mesh = assets.meshes.add(Annulus::new(
            body.radius * rings.inner,
            body.radius * rings.outer,
        ));
        let material = assets.materials.add(StandardMaterial {
            base_color: colour.with_alpha(0.7),
            alpha_mode: AlphaMode::Blend,
            cull_mode: None,
            double_sided: true,
            ..default()
        });
        commands.spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
            ChildOf(spinner),
        ));
    }

    for moon in &body.moons {
        spawn_moon(commands, root, moon, assets, registry, picks)?;
    }

    commands.entity(root).insert(BodyController {
        id: id.clone(),
        spinner,
        spin_rate: body.spin_rate,
        axial_tilt: body.axial_tilt,
        visual: BodyVisual::Planet(PlanetLayers {
            surface_material,
            atmosphere_material,
            interior,
            heatmap,
        }),
    });

    picks.register(root, id.clone());
    registry.insert(
        id,
        TrackedBody {
            entity: root,
            radius: body.radius,
            gravity_mass: body.gravity_mass(),
            kind: TrackedKind::Planet,
        },
    );
    Ok(())
}

/// Moons hang off the planet root, not its spinner, so planet spin never moves them.
fn spawn_moon(
    commands: &mut Commands,
    planet_root: Entity,
    moon: &MoonSpec,
    assets: &mut SceneAssets,
    registry: &mut BodyRegistry,
    picks: &mut PickRegistry,
) -> Result<(), SceneBuildError> {
    let colour = parse_colour(&moon.name, &moon.colour)?;
    let id = BodyId::new(moon.name.as_str());

    let pivot = commands
        .spawn((
            OrbitPivot {
                body: id.clone(),
                speed: moon.speed,
                kind: PivotKind::Moon,
            },
            Transform::default(),
            Visibility::default(),
            ChildOf(planet_root),
        ))
        .id();
    let root = commands
        .spawn((
            Name::new(moon.name.clone()),
            Transform::from_xyz(moon.distance, 0.0, 0.0),
            Visibility::default(),
            Pickable {
                radius: moon.radius,
            },
            ChildOf(pivot),
        ))
        .id();
    let spinner = commands
        .spawn((Transform::default(), Visibility::default(), ChildOf(root)))
        .id();

    let material = surface_material(assets, &moon.name, SurfaceStyle::Cratered, colour);
    let mesh = sphere(assets.meshes, moon.radius);
    commands.spawn((
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::default(),
        ChildOf(spinner),
    ));

    commands.entity(root).insert(BodyController {
        id: id.clone(),
        spinner,
        spin_rate: 0.0,
        axial_tilt: 0.0,
        visual: BodyVisual::Moon,
    });

    picks.register(root, id.clone());
    registry.insert(
        id,
        TrackedBody {
            entity: root,
            radius: moon.radius,
            gravity_mass: moon.radius * 2.0,
            kind: TrackedKind::Moon,
        },
    );
    Ok(())
}

/// Seeded rock cloud around the star plus one pickable marker on the belt's pivot.
fn spawn_belt(
    commands: &mut Commands,
    body: &BodySpec,
    assets: &mut SceneAssets,
    registry: &mut BodyRegistry,
    picks: &mut PickRegistry,
) -> Result<(), SceneBuildError> {
    let colour = parse_colour(&body.name, &body.colour)?;
    let id = BodyId::new(body.name.as_str());

    let pivot = commands
        .spawn((
            SceneEntity,
            Name::new(body.name.clone()),
            OrbitPivot {
                body: id.clone(),
                speed: body.speed,
                kind: PivotKind::Planet,
            },
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    let rock_mesh = assets.meshes.add(Sphere::new(1.0).mesh().uv(6, 4));
    let rock_material = assets.materials.add(StandardMaterial {
        base_color: colour,
        perceptual_roughness: 1.0,
        ..default()
    });
    let mut rng = StdRng::seed_from_u64(BELT_SEED);
    for position in belt_rock_positions(&mut rng, body.distance) {
        let scale = rng.gen_range(0.1..0.45);
        commands.spawn((
            Mesh3d(rock_mesh.clone()),
            MeshMaterial3d(rock_material.clone()),
            Transform::from_translation(position).with_scale(Vec3::splat(scale)),
            ChildOf(pivot),
        ));
    }

    let marker = commands
        .spawn((
            Transform::from_xyz(body.distance, 0.0, 0.0),
            Visibility::default(),
            Pickable {
                radius: BELT_HALF_WIDTH,
            },
            ChildOf(pivot),
        ))
        .id();
    commands.entity(marker).insert(BodyController {
        id: id.clone(),
        spinner: marker,
        spin_rate: 0.0,
        axial_tilt: 0.0,
        visual: BodyVisual::Belt,
    });

    picks.register(marker, id.clone());
    registry.insert(
        id,
        TrackedBody {
            entity: marker,
            radius: BELT_HALF_WIDTH,
            gravity_mass: body.gravity_mass(),
            kind: TrackedKind::Belt,
        },
    );
    Ok(())
}

pub fn belt_rock_positions(rng: &mut StdRng, distance: f32) -> Vec<Vec3> {
    (0..BELT_ROCK_COUNT)
        .map(|_| {
            let angle = rng.gen_range(0.0..TAU);
            let r = distance + rng.gen_range(-BELT_HALF_WIDTH..BELT_HALF_WIDTH);
            let y = rng.gen_range(-BELT_HALF_HEIGHT..BELT_HALF_HEIGHT);
            Vec3::new(r * angle.cos(), y, r * angle.sin())
        })
        .collect()
}
