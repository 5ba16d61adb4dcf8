use bevy::asset::LoadState;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::state::view_state::{BodyId, LandmarkId};

/// Asset path of the reference facts, relative to the asset root.
pub const BODY_FACTS_PATH: &str = "data/body_facts.json";

/// Labelled value in a stat, composition or mechanics table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FactEntry {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Habitability {
    pub esi: String,
    pub status: String,
    pub risk: String,
}

/// Named point of interest with coordinates local to its body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Landmark {
    pub name: String,
    pub description: String,
    pub coords: [f32; 3],
}

impl Landmark {
    pub fn local_position(&self) -> Vec3 {
        Vec3::from_array(self.coords)
    }
}

/// Descriptive record for one body or mission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BodyFacts {
    pub name: String,
    pub classification: String,
    pub colour: String,
    pub description: String,
    #[serde(default)]
    pub history: String,
    #[serde(default)]
    pub significance: String,
    #[serde(default)]
    pub stats: Vec<FactEntry>,
    #[serde(default)]
    pub composition: Vec<FactEntry>,
    #[serde(default)]
    pub mechanics: Vec<FactEntry>,
    #[serde(default)]
    pub habitability: Option<Habitability>,
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
}

impl BodyFacts {
    pub fn landmark(&self, id: &LandmarkId) -> Option<&Landmark> {
        self.landmarks.iter().find(|l| l.name == id.as_str())
    }

    /// Landmark after `current` in list order, wrapping to none after the last.
    pub fn next_landmark(&self, current: Option<&LandmarkId>) -> Option<LandmarkId> {
        let next_index = match current {
            None => 0,
            Some(id) => self.landmarks.iter().position(|l| l.name == id.as_str())? + 1,
        };
        self.landmarks
            .get(next_index)
            .map(|l| LandmarkId::new(l.name.clone()))
    }

    /// Narration text handed to the speech feed.
    pub fn narration(&self) -> String {
        format!(
            "Analyzing {}. Classification: {}. {}",
            self.name, self.classification, self.description
        )
    }
}

/// Read-only reference data loaded as a JSON asset.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize, Default)]
pub struct BodyFactsLibrary {
    pub bodies: Vec<BodyFacts>,
}

impl BodyFactsLibrary {
    pub fn get(&self, id: &BodyId) -> Option<&BodyFacts> {
        self.bodies.iter().find(|b| b.name == id.as_str())
    }
}

/// Loaded reference facts. Empty until the asset arrives, so every lookup
/// degrades to "no data" instead of blocking.
#[derive(Resource, Default)]
pub struct ReferenceFacts {
    handle: Option<Handle<BodyFactsLibrary>>,
    library: Option<BodyFactsLibrary>,
}

impl ReferenceFacts {
    pub fn from_library(library: BodyFactsLibrary) -> Self {
        Self {
            handle: None,
            library: Some(library),
        }
    }

    pub fn get(&self, id: &BodyId) -> Option<&BodyFacts> {
        self.library.as_ref()?.get(id)
    }

    pub fn landmark(&self, body: &BodyId, landmark: &LandmarkId) -> Option<&Landmark> {
        self.get(body)?.landmark(landmark)
    }

    pub fn is_loaded(&self) -> bool {
        self.library.is_some()
    }
}

pub fn start_body_facts_loading(
    mut facts: ResMut<ReferenceFacts>,
    asset_server: Res<AssetServer>,
) {
    if facts.handle.is_none() && facts.library.is_none() {
        facts.handle = Some(asset_server.load(BODY_FACTS_PATH));
    }
}

/// Move the facts out of the asset store once loaded; logs once on failure.
pub fn load_body_facts_system(
    mut facts: ResMut<ReferenceFacts>,
    libraries: Res<Assets<BodyFactsLibrary>>,
    asset_server: Res<AssetServer>,
) {
    if facts.library.is_some() {
        return;
    }
    let Some(handle) = facts.handle.clone() else {
        return;
    };

    if let Some(library) = libraries.get(&handle) {
        info!("✓ Reference facts loaded for {} bodies", library.bodies.len());
        facts.library = Some(library.clone());
    } else if matches!(asset_server.load_state(&handle), LoadState::Failed(_)) {
        warn!("Reference facts unavailable, info panel will show no data");
        facts.handle = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn earth() -> BodyFacts {
        BodyFacts {
            name: "Earth".to_string(),
            classification: "Terrestrial Planet".to_string(),
            colour: "#2271B3".to_string(),
            description: "Third rock.".to_string(),
            history: String::new(),
            significance: String::new(),
            stats: Vec::new(),
            composition: Vec::new(),
            mechanics: Vec::new(),
            habitability: None,
            landmarks: vec![
                Landmark {
                    name: "Mount Everest".to_string(),
                    description: String::new(),
                    coords: [0.0, 2.2, 0.0],
                },
                Landmark {
                    name: "Mariana Trench".to_string(),
                    description: String::new(),
                    coords: [1.0, -1.0, 0.0],
                },
            ],
        }
    }

    #[test]
    fn test_narration_format() {
        assert_eq!(
            earth().narration(),
            "Analyzing Earth. Classification: Terrestrial Planet. Third rock."
        );
    }

    #[test]
    fn test_landmark_cycle_wraps_to_none() {
        let facts = earth();
        let first = facts.next_landmark(None).unwrap();
        assert_eq!(first.as_str(), "Mount Everest");
        let second = facts.next_landmark(Some(&first)).unwrap();
        assert_eq!(second.as_str(), "Mariana Trench");
        assert_eq!(facts.next_landmark(Some(&second)), None);
    }

    #[test]
    fn test_lookup_before_load_is_empty() {
        let facts = ReferenceFacts::default();
        assert!(facts.get(&BodyId::new("Earth")).is_none());
        assert!(!facts.is_loaded());
    }

    #[test]
    fn test_bundled_facts_parse() {
        let json = include_str!("../../../assets/data/body_facts.json");
        let library: BodyFactsLibrary = serde_json::from_str(json).unwrap();
        let sun = library.get(&BodyId::new("Sun")).unwrap();
        assert_eq!(sun.landmarks.len(), 3);
        assert_eq!(sun.landmarks[0].coords, [0.0, 8.0, 0.0]);
    }
}
