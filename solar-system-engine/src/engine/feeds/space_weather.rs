use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task, block_on, futures_lite::future};
use constants::orbital::{FLARE_INTENSITY_C, FLARE_INTENSITY_M, FLARE_INTENSITY_X};
use serde::{Deserialize, Serialize};

use super::client::{FeedConfig, FeedError, get_text};
use super::liveness::SceneLiveness;
use crate::engine::core::frame::SceneEntity;

/// Solar flare class, from the first letter of a DONKI `classType` such as `"M2.3"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlareClass {
    X,
    M,
    C,
    B,
    A,
}

impl FlareClass {
    pub fn from_class_type(class_type: &str) -> Option<Self> {
        match class_type.chars().next()?.to_ascii_uppercase() {
            'X' => Some(Self::X),
            'M' => Some(Self::M),
            'C' => Some(Self::C),
            'B' => Some(Self::B),
            'A' => Some(Self::A),
            _ => None,
        }
    }

    /// Corona multiplier for this class.
    pub fn intensity(self) -> f32 {
        match self {
            Self::X => FLARE_INTENSITY_X,
            Self::M => FLARE_INTENSITY_M,
            Self::C => FLARE_INTENSITY_C,
            Self::B | Self::A => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlareEvent {
    pub class_type: String,
    #[serde(default)]
    pub peak_time: Option<String>,
}

impl FlareEvent {
    pub fn class(&self) -> Option<FlareClass> {
        FlareClass::from_class_type(&self.class_type)
    }
}

/// Latest known space weather. Anything other than a parsed flare reads as "no data".
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub enum SpaceWeather {
    #[default]
    Pending,
    NoData,
    Latest(FlareEvent),
}

impl SpaceWeather {
    pub fn flare_intensity(&self) -> f32 {
        match self {
            Self::Latest(event) => event.class().map_or(1.0, FlareClass::intensity),
            _ => 1.0,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Self::Pending => "Solar activity: awaiting data".to_string(),
            Self::NoData => "Solar activity: no data".to_string(),
            Self::Latest(event) => match &event.peak_time {
                Some(peak) => format!("Latest flare {} peaked {}", event.class_type, peak),
                None => format!("Latest flare {}", event.class_type),
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Latest(event) => serde_json::json!({
                "status": "ok",
                "class_type": event.class_type,
                "class": event.class(),
                "peak_time": event.peak_time,
                "intensity": self.flare_intensity(),
            }),
            Self::Pending => serde_json::json!({ "status": "pending" }),
            Self::NoData => serde_json::json!({ "status": "no_data" }),
        }
    }
}

/// Last entry of a DONKI flare array; an empty array is "no data".
pub fn parse_latest_flare(json: &str) -> Result<Option<FlareEvent>, FeedError> {
    let mut events: Vec<FlareEvent> = serde_json::from_str(json)?;
    Ok(events.pop())
}

/// In-flight space-weather request, owned by the scene.
#[derive(Component)]
pub struct SpaceWeatherRequest(pub Task<Result<Option<FlareEvent>, FeedError>>);

async fn fetch_space_weather(
    url: String,
    liveness: SceneLiveness,
) -> Result<Option<FlareEvent>, FeedError> {
    let body = get_text(url).await?;
    if !liveness.is_alive() {
        return Err(FeedError::Cancelled);
    }
    parse_latest_flare(&body)
}

/// One GET per scene run; it never blocks the frame.
pub fn start_space_weather_fetch(
    mut commands: Commands,
    config: Res<FeedConfig>,
    liveness: Res<SceneLiveness>,
    mut weather: ResMut<SpaceWeather>,
) {
    *weather = SpaceWeather::Pending;
    let task = IoTaskPool::get().spawn(fetch_space_weather(
        config.space_weather_request_url(),
        liveness.clone(),
    ));
    commands.spawn((SceneEntity, SpaceWeatherRequest(task)));
    debug!("Space weather request started");
}

pub fn poll_space_weather(
    mut commands: Commands,
    liveness: Res<SceneLiveness>,
    mut requests: Query<(Entity, &mut SpaceWeatherRequest)>,
    mut weather: ResMut<SpaceWeather>,
) {
    for (entity, mut request) in &mut requests {
        let Some(result) = block_on(future::poll_once(&mut request.0)) else {
            continue;
        };
        commands.entity(entity).despawn();
        if !liveness.is_alive() {
            continue;
        }
        *weather = match result {
            Ok(Some(event)) => {
                info!("Space weather: latest flare {}", event.class_type);
                SpaceWeather::Latest(event)
            }
            Ok(None) => {
                info!("Space weather: no flares reported");
                SpaceWeather::NoData
            }
            Err(error) => {
                warn!("Space weather unavailable: {error}");
                SpaceWeather::NoData
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_takes_last_entry() {
        let json = r#"[
            {"flrID":"a","classType":"C3.1","peakTime":"2024-03-01T10:00Z"},
            {"flrID":"b","classType":"X1.1","peakTime":"2024-12-30T04:20Z"}
        ]"#;
        let event = parse_latest_flare(json).unwrap().unwrap();
        assert_eq!(event.class(), Some(FlareClass::X));
        assert_eq!(event.peak_time.as_deref(), Some("2024-12-30T04:20Z"));
    }

    #[test]
    fn test_empty_array_is_no_data() {
        assert_eq!(parse_latest_flare("[]").unwrap(), None);
    }

    #[test]
    fn test_malformed_body_is_error() {
        assert!(matches!(
            parse_latest_flare("{\"error\":\"rate limited\"}"),
            Err(FeedError::Json(_))
        ));
    }

    #[test]
    fn test_flare_intensity_by_class() {
        let weather = |class: &str| {
            SpaceWeather::Latest(FlareEvent {
                class_type: class.to_string(),
                peak_time: None,
            })
        };
        assert_eq!(weather("X2.0").flare_intensity(), FLARE_INTENSITY_X);
        assert_eq!(weather("m1.0").flare_intensity(), FLARE_INTENSITY_M);
        assert_eq!(weather("B9.9").flare_intensity(), 1.0);
        assert_eq!(SpaceWeather::NoData.flare_intensity(), 1.0);
    }
}
