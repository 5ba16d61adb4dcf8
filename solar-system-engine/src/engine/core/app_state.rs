use bevy::prelude::*;

use crate::engine::audio::ambience::AmbienceState;
use crate::engine::audio::speech::SpeechState;
use crate::engine::bodies::lab::spawn_lab_reference;
use crate::engine::bodies::registry::{BodyRegistry, PickRegistry};
use crate::engine::bodies::spawn::spawn_solar_system;
use crate::engine::camera::orbit_controls::MainCamera;
use crate::engine::catalog::solar_system::SolarSystemCatalog;
use crate::engine::core::error::SceneBuildError;
use crate::engine::core::frame::{SceneAssets, SceneEntity};
use crate::engine::feeds::liveness::SceneLiveness;
use crate::engine::missions::tracker::spawn_missions;
use crate::engine::scene::spacetime_grid::spawn_spacetime_grid;
use crate::engine::scene::starfield::spawn_starfield;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Building,
    Running,
    Crashed,
}

/// Where the scene catalog comes from. Tests and tools can swap in their own document.
#[derive(Resource, Debug, Clone, Default)]
pub enum CatalogSource {
    #[default]
    Embedded,
    Json(String),
}

impl CatalogSource {
    pub fn load(&self) -> Result<SolarSystemCatalog, SceneBuildError> {
        match self {
            Self::Embedded => SolarSystemCatalog::embedded(),
            Self::Json(json) => SolarSystemCatalog::from_json(json),
        }
    }
}

/// Why the last scene build failed.
#[derive(Resource, Debug, Clone, Default)]
pub struct CrashReport {
    pub message: String,
}

/// Manual reload: the only way out of the crash state.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ReloadScene;

/// Lookup tables produced by a successful build.
pub struct BuiltScene {
    pub catalog: SolarSystemCatalog,
    pub registry: BodyRegistry,
    pub picks: PickRegistry,
    pub missions: usize,
}

/// Spawn every scene entity from the catalog.
pub fn construct_scene(
    commands: &mut Commands,
    source: &CatalogSource,
    assets: &mut SceneAssets,
) -> Result<BuiltScene, SceneBuildError> {
    let catalog = source.load()?;
    let mut registry = BodyRegistry::default();
    let mut picks = PickRegistry::default();

    spawn_solar_system(commands, &catalog, assets, &mut registry, &mut picks)?;
    let missions = spawn_missions(commands, &catalog, assets, &mut registry, &mut picks)?;
    spawn_lab_reference(commands, &catalog, assets)?;
    spawn_spacetime_grid(commands, assets);
    spawn_starfield(commands, assets);

    Ok(BuiltScene {
        catalog,
        registry,
        picks,
        missions,
    })
}

/// One-shot scene construction. Success moves to `Running`; any failure
/// moves to `Crashed` and is not retried until the user reloads.
pub fn build_scene(
    mut commands: Commands,
    source: Res<CatalogSource>,
    cameras: Query<(), With<MainCamera>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    asset_server: Option<Res<AssetServer>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    println!("→ Building scene");

    let result = if cameras.is_empty() {
        Err(SceneBuildError::MissingCamera)
    } else {
        let mut assets = SceneAssets {
            meshes: &mut meshes,
            materials: &mut materials,
            images: &mut images,
            asset_server: asset_server.as_deref(),
        };
        construct_scene(&mut commands, &source, &mut assets)
    };

    match result {
        Ok(scene) => {
            info!(
                "✓ Scene built: {} tracked objects, {} missions placed",
                scene.registry.len(),
                scene.missions
            );
            commands.insert_resource(scene.registry);
            commands.insert_resource(scene.picks);
            commands.insert_resource(scene.catalog);
            commands.insert_resource(SceneLiveness::default());
            println!("→ Transitioning to Running state");
            next_state.set(AppState::Running);
        }
        Err(error) => {
            error!("Scene construction failed: {error}");
            commands.insert_resource(CrashReport {
                message: error.to_string(),
            });
            println!("→ Transitioning to Crashed state");
            next_state.set(AppState::Crashed);
        }
    }
}

/// Release everything the scene owns. Runs when leaving `Running` and on
/// entering `Crashed`, where it sweeps up a partially built scene.
pub fn teardown_scene(
    mut commands: Commands,
    scene: Query<Entity, With<SceneEntity>>,
    liveness: Res<SceneLiveness>,
    mut ambience: ResMut<AmbienceState>,
    mut speech: ResMut<SpeechState>,
) {
    liveness.revoke();

    let mut count = 0;
    for entity in &scene {
        commands.entity(entity).despawn();
        count += 1;
    }
    ambience.stop(&mut commands);
    speech.is_speaking = false;
    commands.insert_resource(BodyRegistry::default());
    commands.insert_resource(PickRegistry::default());
    info!("Scene torn down ({count} root entities)");
}

pub fn handle_reload(
    mut events: EventReader<ReloadScene>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if events.read().count() == 0 {
        return;
    }
    if *state.get() != AppState::Building {
        println!("→ Reloading scene");
        next_state.set(AppState::Building);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_source_loads() {
        let catalog = CatalogSource::default().load().unwrap();
        assert!(catalog.star().is_some());
    }

    #[test]
    fn test_broken_source_is_parse_error() {
        let source = CatalogSource::Json("{ not json".to_string());
        assert!(matches!(source.load(), Err(SceneBuildError::Parse(_))));
    }
}
