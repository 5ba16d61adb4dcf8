use bevy::prelude::*;
use constants::orbital::{DEFAULT_TIME_SCALE, MAX_TIME_SCALE, MIN_TIME_SCALE};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::visual_modes::{VisualMode, VisualModes};

/// Unique name of anything the camera can track: star, planet, moon, belt or mission marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(String);

impl BodyId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BodyId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Name of a landmark on the currently selected body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkId(String);

impl LandmarkId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cosmetic colour filter applied to the whole rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LensMode {
    #[default]
    Normal,
    Thermal,
    XRay,
    Retro,
}

impl LensMode {
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "thermal" => Some(Self::Thermal),
            "xray" | "x-ray" => Some(Self::XRay),
            "retro" => Some(Self::Retro),
            _ => None,
        }
    }

    pub fn to_string(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Thermal => "thermal",
            Self::XRay => "xray",
            Self::Retro => "retro",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Normal => Self::Thermal,
            Self::Thermal => Self::XRay,
            Self::XRay => Self::Retro,
            Self::Retro => Self::Normal,
        }
    }
}

/// Current user-selected display options.
///
/// Landmark and deep-dive only mean something while a body is selected;
/// `ViewStateStore` keeps them cleared otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub selected_body: Option<BodyId>,
    pub hovered_body: Option<BodyId>,
    pub time_scale: f32,
    pub visual_modes: VisualModes,
    pub missions_visible: bool,
    pub audio_enabled: bool,
    pub active_landmark: Option<LandmarkId>,
    pub deep_dive_active: bool,
    pub lens: LensMode,
    pub lab_mode: bool,
    pub ui_focus: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected_body: None,
            hovered_body: None,
            time_scale: DEFAULT_TIME_SCALE,
            visual_modes: VisualModes::empty(),
            missions_visible: false,
            audio_enabled: false,
            active_landmark: None,
            deep_dive_active: false,
            lens: LensMode::Normal,
            lab_mode: false,
            ui_focus: false,
        }
    }
}

impl ViewState {
    pub fn is_selected(&self, id: &BodyId) -> bool {
        self.selected_body.as_ref() == Some(id)
    }

    pub fn mode(&self, mode: VisualMode) -> bool {
        self.visual_modes.contains(mode)
    }
}

/// Authoritative view state with one setter per field.
///
/// UI controls, the RPC bridge and the pointer resolver write here. Frame
/// systems never read it directly; they read the `FrameSnapshot` taken at
/// the top of each frame.
#[derive(Resource, Default, Debug)]
pub struct ViewStateStore {
    state: ViewState,
    revision: u64,
}

impl ViewStateStore {
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Select a body or clear the selection.
    ///
    /// Clearing drops landmark and deep-dive. Switching bodies drops the
    /// landmark, which belongs to the previous body.
    pub fn select_body(&mut self, body: Option<BodyId>) -> bool {
        if self.state.selected_body == body {
            return false;
        }

        match &body {
            None => {
                self.state.active_landmark = None;
                self.state.deep_dive_active = false;
            }
            Some(_) => {
                self.state.active_landmark = None;
            }
        }

        self.state.selected_body = body;
        self.bump();
        true
    }

    pub fn set_hovered(&mut self, body: Option<BodyId>) -> bool {
        if self.state.hovered_body == body {
            return false;
        }
        self.state.hovered_body = body;
        self.bump();
        true
    }

    /// Clamp to the supported range; non-finite input is ignored.
    pub fn set_time_scale(&mut self, time_scale: f32) -> f32 {
        if time_scale.is_finite() {
            let clamped = time_scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE);
            if clamped != self.state.time_scale {
                self.state.time_scale = clamped;
                self.bump();
            }
        }
        self.state.time_scale
    }

    pub fn set_visual_mode(&mut self, mode: VisualMode, enabled: bool) {
        if self.state.visual_modes.contains(mode) != enabled {
            self.state.visual_modes.set(mode, enabled);
            self.bump();
        }
    }

    pub fn toggle_visual_mode(&mut self, mode: VisualMode) -> bool {
        let enabled = self.state.visual_modes.toggle(mode);
        self.bump();
        enabled
    }

    pub fn set_missions_visible(&mut self, visible: bool) {
        if self.state.missions_visible != visible {
            self.state.missions_visible = visible;
            self.bump();
        }
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) {
        if self.state.audio_enabled != enabled {
            self.state.audio_enabled = enabled;
            self.bump();
        }
    }

    /// Ignored while nothing is selected.
    pub fn set_active_landmark(&mut self, landmark: Option<LandmarkId>) -> bool {
        if self.state.selected_body.is_none() && landmark.is_some() {
            return false;
        }
        if self.state.active_landmark != landmark {
            self.state.active_landmark = landmark;
            self.bump();
        }
        true
    }

    /// Ignored while nothing is selected.
    pub fn set_deep_dive(&mut self, active: bool) -> bool {
        if self.state.selected_body.is_none() && active {
            return false;
        }
        if self.state.deep_dive_active != active {
            self.state.deep_dive_active = active;
            self.bump();
        }
        true
    }

    pub fn set_lens(&mut self, lens: LensMode) {
        if self.state.lens != lens {
            self.state.lens = lens;
            self.bump();
        }
    }

    pub fn set_lab_mode(&mut self, enabled: bool) {
        if self.state.lab_mode != enabled {
            self.state.lab_mode = enabled;
            self.bump();
        }
    }

    pub fn set_ui_focus(&mut self, focused: bool) {
        if self.state.ui_focus != focused {
            self.state.ui_focus = focused;
            self.bump();
        }
    }
}

/// Stable copy of the view state for the current frame.
#[derive(Resource, Default, Debug, Clone)]
pub struct FrameSnapshot {
    pub state: ViewState,
    pub revision: u64,
}

/// Copy the store into the frame snapshot. Runs first in every frame so the
/// rest of the frame observes a single consistent value.
pub fn take_frame_snapshot(store: Res<ViewStateStore>, mut snapshot: ResMut<FrameSnapshot>) {
    if snapshot.revision == store.revision() && !store.is_added() {
        return;
    }
    snapshot.state = store.state().clone();
    snapshot.revision = store.revision();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_selection(name: &str) -> ViewStateStore {
        let mut store = ViewStateStore::default();
        store.select_body(Some(BodyId::new(name)));
        store
    }

    #[test]
    fn test_clearing_selection_clears_landmark_and_deep_dive() {
        let mut store = store_with_selection("Earth");
        assert!(store.set_active_landmark(Some(LandmarkId::new("Mount Everest"))));
        assert!(store.set_deep_dive(true));

        store.select_body(None);

        let state = store.state();
        assert_eq!(state.selected_body, None);
        assert_eq!(state.active_landmark, None);
        assert!(!state.deep_dive_active);
    }

    #[test]
    fn test_switching_body_drops_landmark_keeps_deep_dive() {
        let mut store = store_with_selection("Earth");
        store.set_active_landmark(Some(LandmarkId::new("Mariana Trench")));
        store.set_deep_dive(true);

        store.select_body(Some(BodyId::new("Mars")));

        assert_eq!(store.state().active_landmark, None);
        assert!(store.state().deep_dive_active);
    }

    #[test]
    fn test_landmark_and_deep_dive_rejected_without_selection() {
        let mut store = ViewStateStore::default();
        assert!(!store.set_active_landmark(Some(LandmarkId::new("Olympus Mons"))));
        assert!(!store.set_deep_dive(true));
        assert_eq!(store.state().active_landmark, None);
        assert!(!store.state().deep_dive_active);
    }

    #[test]
    fn test_time_scale_is_clamped() {
        let mut store = ViewStateStore::default();
        assert_eq!(store.set_time_scale(250.0), MAX_TIME_SCALE);
        assert_eq!(store.set_time_scale(-40.0), MIN_TIME_SCALE);
        assert_eq!(store.set_time_scale(f32::NAN), MIN_TIME_SCALE);
        assert_eq!(store.set_time_scale(2.5), 2.5);
    }

    #[test]
    fn test_revision_only_moves_on_change() {
        let mut store = ViewStateStore::default();
        store.set_missions_visible(true);
        let revision = store.revision();
        store.set_missions_visible(true);
        assert_eq!(store.revision(), revision);
        store.set_lens(LensMode::Retro);
        assert_eq!(store.revision(), revision + 1);
    }

    #[test]
    fn test_lens_cycle_wraps() {
        let mut lens = LensMode::Normal;
        for _ in 0..4 {
            lens = lens.next();
        }
        assert_eq!(lens, LensMode::Normal);
        assert_eq!(LensMode::from_string("XRAY"), Some(LensMode::XRay));
    }
}
