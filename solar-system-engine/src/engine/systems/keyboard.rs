use bevy::prelude::*;
use constants::orbital::TIME_SCALE_STEP;

use crate::engine::audio::speech::ToggleSpeech;
use crate::engine::catalog::body_facts::ReferenceFacts;
use crate::engine::state::view_state::ViewStateStore;
use crate::engine::state::visual_modes::VisualMode;

/// Native keyboard actions. Each one writes a single view-state field,
/// except the speech toggle which goes through its event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Deselect,
    ToggleMode(VisualMode),
    ToggleMissions,
    ToggleAudio,
    ToggleDeepDive,
    CycleLandmark,
    CycleLens,
    ToggleLab,
    FasterTime,
    SlowerTime,
    ToggleSpeech,
}

pub fn shortcut_for(key: KeyCode) -> Option<Shortcut> {
    let shortcut = match key {
        KeyCode::Escape => Shortcut::Deselect,
        KeyCode::KeyT => Shortcut::ToggleMode(VisualMode::Structural),
        KeyCode::KeyH => Shortcut::ToggleMode(VisualMode::Heatmap),
        KeyCode::KeyG => Shortcut::ToggleMode(VisualMode::Gravity),
        KeyCode::KeyO => Shortcut::ToggleMode(VisualMode::Rover),
        KeyCode::KeyS => Shortcut::ToggleMode(VisualMode::Stabilized),
        KeyCode::KeyM => Shortcut::ToggleMissions,
        KeyCode::KeyA => Shortcut::ToggleAudio,
        KeyCode::KeyD => Shortcut::ToggleDeepDive,
        KeyCode::KeyL => Shortcut::CycleLandmark,
        KeyCode::KeyK => Shortcut::CycleLens,
        KeyCode::KeyB => Shortcut::ToggleLab,
        KeyCode::Equal | KeyCode::NumpadAdd => Shortcut::FasterTime,
        KeyCode::Minus | KeyCode::NumpadSubtract => Shortcut::SlowerTime,
        KeyCode::KeyV => Shortcut::ToggleSpeech,
        _ => return None,
    };
    Some(shortcut)
}

/// Apply a shortcut to the store. The speech toggle is left to the caller.
pub fn apply_shortcut(store: &mut ViewStateStore, facts: &ReferenceFacts, shortcut: Shortcut) {
    let state = store.state().clone();
    match shortcut {
        Shortcut::Deselect => {
            store.select_body(None);
        }
        Shortcut::ToggleMode(mode) => {
            let enabled = store.toggle_visual_mode(mode);
            info!("{} mode {}", mode.to_string(), if enabled { "on" } else { "off" });
        }
        Shortcut::ToggleMissions => store.set_missions_visible(!state.missions_visible),
        Shortcut::ToggleAudio => store.set_audio_enabled(!state.audio_enabled),
        Shortcut::ToggleDeepDive => {
            store.set_deep_dive(!state.deep_dive_active);
        }
        Shortcut::CycleLandmark => {
            let Some(selected) = state.selected_body.as_ref() else {
                return;
            };
            let next = facts
                .get(selected)
                .and_then(|body| body.next_landmark(state.active_landmark.as_ref()));
            store.set_active_landmark(next);
        }
        Shortcut::CycleLens => store.set_lens(state.lens.next()),
        Shortcut::ToggleLab => store.set_lab_mode(!state.lab_mode),
        Shortcut::FasterTime => {
            store.set_time_scale(state.time_scale + TIME_SCALE_STEP);
        }
        Shortcut::SlowerTime => {
            store.set_time_scale(state.time_scale - TIME_SCALE_STEP);
        }
        Shortcut::ToggleSpeech => {}
    }
}

pub fn keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut store: ResMut<ViewStateStore>,
    facts: Res<ReferenceFacts>,
    mut speech: EventWriter<ToggleSpeech>,
) {
    for key in keyboard.get_just_pressed() {
        match shortcut_for(*key) {
            Some(Shortcut::ToggleSpeech) => {
                speech.write(ToggleSpeech);
            }
            Some(shortcut) => apply_shortcut(&mut store, &facts, shortcut),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::body_facts::{BodyFacts, BodyFactsLibrary, Landmark};
    use crate::engine::state::view_state::{BodyId, LensMode};

    fn facts_with_landmarks() -> ReferenceFacts {
        let landmark = |name: &str| Landmark {
            name: name.to_string(),
            description: String::new(),
            coords: [0.0, 1.0, 0.0],
        };
        ReferenceFacts::from_library(BodyFactsLibrary {
            bodies: vec![BodyFacts {
                name: "Mars".to_string(),
                classification: "Terrestrial Planet".to_string(),
                colour: "#E27B58".to_string(),
                description: String::new(),
                history: String::new(),
                significance: String::new(),
                stats: Vec::new(),
                composition: Vec::new(),
                mechanics: Vec::new(),
                habitability: None,
                landmarks: vec![landmark("Olympus Mons"), landmark("Valles Marineris")],
            }],
        })
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(shortcut_for(KeyCode::Escape), Some(Shortcut::Deselect));
        assert_eq!(
            shortcut_for(KeyCode::KeyO),
            Some(Shortcut::ToggleMode(VisualMode::Rover))
        );
        assert_eq!(shortcut_for(KeyCode::Equal), Some(Shortcut::FasterTime));
        assert_eq!(shortcut_for(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_time_scale_steps_are_clamped() {
        let mut store = ViewStateStore::default();
        let facts = ReferenceFacts::default();
        apply_shortcut(&mut store, &facts, Shortcut::FasterTime);
        assert_eq!(store.state().time_scale, 1.5);
        for _ in 0..40 {
            apply_shortcut(&mut store, &facts, Shortcut::SlowerTime);
        }
        assert_eq!(store.state().time_scale, -10.0);
    }

    #[test]
    fn test_landmark_cycle_needs_selection_and_wraps() {
        let mut store = ViewStateStore::default();
        let facts = facts_with_landmarks();

        apply_shortcut(&mut store, &facts, Shortcut::CycleLandmark);
        assert_eq!(store.state().active_landmark, None);

        store.select_body(Some(BodyId::new("Mars")));
        apply_shortcut(&mut store, &facts, Shortcut::CycleLandmark);
        assert_eq!(
            store.state().active_landmark.as_ref().map(|l| l.as_str()),
            Some("Olympus Mons")
        );
        apply_shortcut(&mut store, &facts, Shortcut::CycleLandmark);
        apply_shortcut(&mut store, &facts, Shortcut::CycleLandmark);
        assert_eq!(store.state().active_landmark, None);
    }

    #[test]
    fn test_escape_clears_deep_dive() {
        let mut store = ViewStateStore::default();
        let facts = ReferenceFacts::default();
        store.select_body(Some(BodyId::new("Sun")));
        apply_shortcut(&mut store, &facts, Shortcut::ToggleDeepDive);
        assert!(store.state().deep_dive_active);
        apply_shortcut(&mut store, &facts, Shortcut::Deselect);
        assert!(!store.state().deep_dive_active);
        assert_eq!(store.state().selected_body, None);
    }

    #[test]
    fn test_lens_cycles() {
        let mut store = ViewStateStore::default();
        let facts = ReferenceFacts::default();
        apply_shortcut(&mut store, &facts, Shortcut::CycleLens);
        assert_eq!(store.state().lens, LensMode::Normal.next());
    }
}
