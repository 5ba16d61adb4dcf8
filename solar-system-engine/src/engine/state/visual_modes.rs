use serde::{Deserialize, Serialize, Serializer};

/// Independent display toggles. Any combination may be active at once;
/// subsystems decide how overlapping modes resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualMode {
    Structural,
    Heatmap,
    Gravity,
    Rover,
    Stabilized,
}

impl VisualMode {
    pub const ALL: [VisualMode; 5] = [
        Self::Structural,
        Self::Heatmap,
        Self::Gravity,
        Self::Rover,
        Self::Stabilized,
    ];

    /// Convert string identifier to visual mode for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "structural" => Some(Self::Structural),
            "heatmap" => Some(Self::Heatmap),
            "gravity" => Some(Self::Gravity),
            "rover" => Some(Self::Rover),
            "stabilized" | "stabilised" => Some(Self::Stabilized),
            _ => None,
        }
    }

    pub fn to_string(&self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Heatmap => "heatmap",
            Self::Gravity => "gravity",
            Self::Rover => "rover",
            Self::Stabilized => "stabilized",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Compact set of active visual modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VisualModes(u8);

impl VisualModes {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn contains(&self, mode: VisualMode) -> bool {
        self.0 & mode.bit() != 0
    }

    pub fn set(&mut self, mode: VisualMode, enabled: bool) {
        if enabled {
            self.0 |= mode.bit();
        } else {
            self.0 &= !mode.bit();
        }
    }

    pub fn with(mut self, mode: VisualMode) -> Self {
        self.set(mode, true);
        self
    }

    pub fn toggle(&mut self, mode: VisualMode) -> bool {
        let enabled = !self.contains(mode);
        self.set(mode, enabled);
        enabled
    }

    pub fn iter(&self) -> impl Iterator<Item = VisualMode> + '_ {
        VisualMode::ALL.into_iter().filter(|mode| self.contains(*mode))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Serialize for VisualModes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_are_independent_flags() {
        let mut modes = VisualModes::empty();
        modes.set(VisualMode::Structural, true);
        modes.set(VisualMode::Heatmap, true);

        assert!(modes.contains(VisualMode::Structural));
        assert!(modes.contains(VisualMode::Heatmap));
        assert!(!modes.contains(VisualMode::Gravity));

        modes.set(VisualMode::Structural, false);
        assert!(!modes.contains(VisualMode::Structural));
        assert!(modes.contains(VisualMode::Heatmap));
    }

    #[test]
    fn test_toggle_reports_new_state() {
        let mut modes = VisualModes::empty();
        assert!(modes.toggle(VisualMode::Rover));
        assert!(!modes.toggle(VisualMode::Rover));
        assert!(modes.is_empty());
    }

    #[test]
    fn test_serializes_as_name_list() {
        let modes = VisualModes::empty()
            .with(VisualMode::Gravity)
            .with(VisualMode::Structural);
        let json = serde_json::to_value(modes).unwrap();
        assert_eq!(json, serde_json::json!(["structural", "gravity"]));
    }
}
