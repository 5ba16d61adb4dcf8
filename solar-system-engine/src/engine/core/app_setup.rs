use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

// Crate engine modules
use crate::engine::audio::ambience::{AmbienceState, update_ambience};
use crate::engine::audio::speech::{SpeechState, ToggleSpeech, handle_speech_toggle, poll_speech};
use crate::engine::bodies::controller::update_body_visuals;
use crate::engine::bodies::lab::update_lab_reference;
use crate::engine::bodies::orbit::update_orbits;
use crate::engine::bodies::registry::{BodyRegistry, PickRegistry};
use crate::engine::camera::director::direct_camera;
use crate::engine::camera::lens::apply_lens;
use crate::engine::camera::orbit_controls::{OrbitCamera, orbit_camera_controls, spawn_main_camera};
use crate::engine::catalog::body_facts::{
    BodyFactsLibrary, ReferenceFacts, load_body_facts_system, start_body_facts_loading,
};
use crate::engine::core::frame::FrameSet;
use crate::engine::core::window_config::create_window_config;
use crate::engine::feeds::client::FeedConfig;
use crate::engine::feeds::liveness::SceneLiveness;
use crate::engine::feeds::space_weather::{
    SpaceWeather, poll_space_weather, start_space_weather_fetch,
};
use crate::engine::missions::tracker::update_missions;
use crate::engine::picking::resolver::resolve_pointer;
use crate::engine::scene::spacetime_grid::update_spacetime_grid;
use crate::engine::state::view_state::{FrameSnapshot, ViewStateStore, take_frame_snapshot};
use crate::engine::systems::fps_tracking::{track_frame_rate, FrameRate};
use crate::engine::systems::simulation_clock::{
    SimulationClock, advance_simulation_clock, reset_simulation_clock,
};
use crate::engine::systems::status_pulse::{StatusPulse, tick_status_pulse};
use crate::engine::systems::typewriter::{Typewriter, advance_typewriter};
use crate::engine::textures::apply_loaded_textures;
// Lifecycle
use crate::engine::core::app_state::{
    AppState, CatalogSource, CrashReport, ReloadScene, build_scene, handle_reload, teardown_scene,
};
// Create Web RPC modules
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::{
    overlay::crash_screen::{crash_screen_input, despawn_crash_screen, spawn_crash_screen},
    overlay::hud::{
        spawn_hud, update_hover_tag, update_info_panel, update_status_text, update_weather_text,
    },
    picking::resolver::track_ui_pointer_focus,
    systems::fps_tracking::fps_text_update_system,
    systems::keyboard::keyboard_shortcuts,
};

const SPACE_BACKGROUND: Color = Color::srgb(0.02, 0.02, 0.03);

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers the reference facts as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<BodyFactsLibrary>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .insert_resource(ClearColor(SPACE_BACKGROUND));

    // Initialise resources early
    app.init_resource::<ViewStateStore>()
        .init_resource::<FrameSnapshot>()
        .init_resource::<SimulationClock>()
        .init_resource::<ReferenceFacts>()
        .init_resource::<SpaceWeather>()
        .init_resource::<SceneLiveness>()
        .init_resource::<AmbienceState>()
        .init_resource::<SpeechState>()
        .init_resource::<OrbitCamera>()
        .init_resource::<BodyRegistry>()
        .init_resource::<PickRegistry>()
        .init_resource::<CatalogSource>()
        .init_resource::<CrashReport>()
        .init_resource::<Typewriter>()
        .init_resource::<StatusPulse>()
        .init_resource::<FrameRate>()
        .insert_resource(FeedConfig::from_env())
        .add_event::<ToggleSpeech>()
        .add_event::<ReloadScene>();

    configure_frame(&mut app);

    app.add_systems(Startup, (spawn_main_camera, start_body_facts_loading))
        .add_systems(
            Update,
            (
                load_body_facts_system,
                apply_loaded_textures,
                handle_reload,
                track_frame_rate,
            ),
        )
        .add_systems(Update, build_scene.run_if(in_state(AppState::Building)));

    // Lifecycle transitions
    app.add_systems(OnEnter(AppState::Running), start_space_weather_fetch)
        .add_systems(
            OnExit(AppState::Running),
            (teardown_scene, reset_simulation_clock),
        )
        .add_systems(
            OnEnter(AppState::Crashed),
            (teardown_scene, reset_simulation_clock),
        );

    #[cfg(not(target_arch = "wasm32"))]
    {
        add_native_overlays(&mut app);
    }

    app
}

/// Per-frame pipeline: each set sees the results of the ones before it.
fn configure_frame(app: &mut App) {
    app.configure_sets(
        Update,
        (
            FrameSet::Input,
            FrameSet::Snapshot,
            FrameSet::Clock,
            FrameSet::Ambience,
            FrameSet::Bodies,
            FrameSet::Missions,
            FrameSet::SpacetimeGrid,
            FrameSet::Camera,
        )
            .chain(),
    );

    let running = in_state(AppState::Running);

    app.add_systems(
        Update,
        (
            (resolve_pointer, orbit_camera_controls, poll_space_weather)
                .in_set(FrameSet::Input)
                .run_if(running.clone()),
            take_frame_snapshot.in_set(FrameSet::Snapshot),
            advance_simulation_clock
                .in_set(FrameSet::Clock)
                .run_if(running.clone()),
            (update_ambience, handle_speech_toggle, poll_speech)
                .chain()
                .in_set(FrameSet::Ambience)
                .run_if(running.clone()),
            (update_orbits, update_body_visuals, update_lab_reference)
                .chain()
                .in_set(FrameSet::Bodies)
                .run_if(running.clone()),
            update_missions
                .in_set(FrameSet::Missions)
                .run_if(running.clone()),
            update_spacetime_grid
                .in_set(FrameSet::SpacetimeGrid)
                .run_if(running.clone()),
            (direct_camera, apply_lens)
                .in_set(FrameSet::Camera)
                .run_if(running),
        ),
    );

    app.add_systems(
        Update,
        (advance_typewriter, tick_status_pulse).after(FrameSet::Camera),
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn add_native_overlays(app: &mut App) {
    app.add_systems(Startup, spawn_hud)
        .add_systems(
            Update,
            (track_ui_pointer_focus, keyboard_shortcuts)
                .chain()
                .before(resolve_pointer)
                .in_set(FrameSet::Input),
        )
        .add_systems(
            Update,
            (
                fps_text_update_system.after(track_frame_rate),
                update_status_text,
                update_weather_text,
                update_hover_tag,
                update_info_panel,
            )
                .after(advance_typewriter),
        )
        .add_systems(OnEnter(AppState::Crashed), spawn_crash_screen)
        .add_systems(OnExit(AppState::Crashed), despawn_crash_screen)
        .add_systems(
            Update,
            crash_screen_input.run_if(in_state(AppState::Crashed)),
        );
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
