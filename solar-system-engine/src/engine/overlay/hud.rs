use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::engine::audio::speech::SpeechState;
use crate::engine::catalog::body_facts::{BodyFacts, ReferenceFacts};
use crate::engine::feeds::space_weather::SpaceWeather;
use crate::engine::state::view_state::{BodyId, FrameSnapshot};
use crate::engine::systems::status_pulse::StatusPulse;
use crate::engine::systems::typewriter::Typewriter;

const HUD_FONT_SIZE: f32 = 14.0;
const HUD_ACCENT: Color = Color::srgb(0.0, 1.0, 1.0);
const HOVER_TAG_OFFSET: Vec2 = Vec2::new(16.0, 12.0);

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct StatusText;

#[derive(Component)]
pub struct WeatherText;

#[derive(Component)]
pub struct HoverTag;

#[derive(Component)]
pub struct InfoPanel;

/// Text slots inside the info panel.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoText {
    Title,
    Description,
    Stats,
}

/// Heading line for the info panel.
pub fn info_title(id: &BodyId, facts: Option<&BodyFacts>) -> String {
    match facts {
        Some(body) => format!("{} // {}", body.name.to_uppercase(), body.classification),
        None => format!("{} // NO DATA", id.as_str().to_uppercase()),
    }
}

/// Stat, composition and landmark lines for the info panel.
pub fn info_stats(facts: Option<&BodyFacts>) -> String {
    let Some(body) = facts else {
        return String::new();
    };
    let mut lines: Vec<String> = body
        .stats
        .iter()
        .chain(body.composition.iter())
        .map(|entry| format!("{}: {}", entry.label, entry.value))
        .collect();
    if let Some(habitability) = &body.habitability {
        lines.push(format!(
            "ESI {} / {} / risk {}",
            habitability.esi, habitability.status, habitability.risk
        ));
    }
    if !body.landmarks.is_empty() {
        let names: Vec<&str> = body.landmarks.iter().map(|l| l.name.as_str()).collect();
        lines.push(format!("Landmarks: {}", names.join(", ")));
    }
    lines.join("\n")
}

fn hud_text(value: &str, colour: Color) -> (Text, TextFont, TextColor) {
    (
        Text::new(value),
        TextFont {
            font_size: HUD_FONT_SIZE,
            ..default()
        },
        TextColor(colour),
    )
}

/// Native overlay. On the web the page UI renders the same information from RPC notifications.
pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                hud_text("FPS: ", Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));

            parent.spawn((
                hud_text("STATUS: OPTIMAL", HUD_ACCENT),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                StatusText,
            ));

            parent.spawn((
                hud_text(&SpaceWeather::Pending.summary(), Color::srgb(1.0, 0.7, 0.3)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                WeatherText,
            ));

            parent.spawn((
                hud_text("", Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    ..default()
                },
                Visibility::Hidden,
                HoverTag,
            ));

            parent
                .spawn((
                    Node {
                        position_type: PositionType::Absolute,
                        top: Val::Px(60.0),
                        right: Val::Px(12.0),
                        width: Val::Px(360.0),
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(8.0),
                        padding: UiRect::all(Val::Px(12.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
                    Visibility::Hidden,
                    InfoPanel,
                ))
                .with_children(|panel| {
                    panel.spawn((hud_text("", HUD_ACCENT), InfoText::Title));
                    panel.spawn((hud_text("", Color::WHITE), InfoText::Description));
                    panel.spawn((hud_text("", Color::srgb(0.7, 0.8, 0.9)), InfoText::Stats));
                });
        });
}

pub fn update_status_text(
    pulse: Res<StatusPulse>,
    speech: Res<SpeechState>,
    snapshot: Res<FrameSnapshot>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    let modes: Vec<&str> = snapshot
        .state
        .visual_modes
        .iter()
        .map(|mode| mode.to_string())
        .collect();
    let mut line = format!(
        "STATUS: OPTIMAL {}  T x{:.1}",
        pulse.bar(),
        snapshot.state.time_scale
    );
    if !modes.is_empty() {
        line.push_str(&format!("  [{}]", modes.join(" ")));
    }
    if speech.is_speaking {
        line.push_str("  VOICE");
    }
    for mut text in &mut query {
        text.0.clone_from(&line);
    }
}

pub fn update_weather_text(
    weather: Res<SpaceWeather>,
    mut query: Query<&mut Text, With<WeatherText>>,
) {
    if !weather.is_changed() {
        return;
    }
    for mut text in &mut query {
        text.0 = weather.summary();
    }
}

/// Name tag next to the cursor for the hovered body.
pub fn update_hover_tag(
    snapshot: Res<FrameSnapshot>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut tags: Query<(&mut Text, &mut Node, &mut Visibility), With<HoverTag>>,
) {
    let cursor = windows.single().ok().and_then(Window::cursor_position);
    for (mut text, mut node, mut visibility) in &mut tags {
        match (&snapshot.state.hovered_body, cursor) {
            (Some(id), Some(cursor)) => {
                if text.0 != id.as_str() {
                    text.0 = id.as_str().to_string();
                }
                node.left = Val::Px(cursor.x + HOVER_TAG_OFFSET.x);
                node.top = Val::Px(cursor.y + HOVER_TAG_OFFSET.y);
                *visibility = Visibility::Inherited;
            }
            _ => *visibility = Visibility::Hidden,
        }
    }
}

pub fn update_info_panel(
    snapshot: Res<FrameSnapshot>,
    facts: Res<ReferenceFacts>,
    typewriter: Res<Typewriter>,
    mut panels: Query<&mut Visibility, With<InfoPanel>>,
    mut texts: Query<(&InfoText, &mut Text)>,
) {
    let selected = snapshot.state.selected_body.as_ref();
    for mut visibility in &mut panels {
        *visibility = if selected.is_some() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    let Some(id) = selected else {
        return;
    };

    let body = facts.get(id);
    for (slot, mut text) in &mut texts {
        let value = match slot {
            InfoText::Title => info_title(id, body),
            InfoText::Description => typewriter.visible_text().to_string(),
            InfoText::Stats => info_stats(body),
        };
        if text.0 != value {
            text.0 = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::body_facts::FactEntry;

    #[test]
    fn test_title_without_facts() {
        assert_eq!(info_title(&BodyId::new("Ceres"), None), "CERES // NO DATA");
        assert_eq!(info_stats(None), "");
    }

    #[test]
    fn test_stats_lines() {
        let body = BodyFacts {
            name: "Mars".to_string(),
            classification: "Terrestrial Planet".to_string(),
            colour: "#E27B58".to_string(),
            description: String::new(),
            history: String::new(),
            significance: String::new(),
            stats: vec![FactEntry {
                label: "Gravity".to_string(),
                value: "3.72 m/s²".to_string(),
            }],
            composition: vec![FactEntry {
                label: "CO2".to_string(),
                value: "95%".to_string(),
            }],
            mechanics: Vec::new(),
            habitability: None,
            landmarks: Vec::new(),
        };
        assert_eq!(info_title(&BodyId::new("Mars"), Some(&body)), "MARS // Terrestrial Planet");
        assert_eq!(info_stats(Some(&body)), "Gravity: 3.72 m/s²\nCO2: 95%");
    }
}
