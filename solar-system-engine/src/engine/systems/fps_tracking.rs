use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use constants::render_settings::FPS_NOTIFICATION_INTERVAL;

use crate::engine::overlay::hud::FpsText;
use crate::rpc::web_rpc::WebRpcInterface;

/// Latest smoothed frame rate, read by the HUD and by `get_fps`.
#[derive(Resource, Debug, Default)]
pub struct FrameRate {
    pub fps: Option<f32>,
    since_notification: f32,
}

impl FrameRate {
    /// Takes this frame's diagnostic reading. Returns the rate to push to the
    /// page once a full notification interval has passed with a reading held.
    pub fn record(&mut self, reading: Option<f64>, delta_secs: f32) -> Option<f32> {
        if let Some(value) = reading {
            self.fps = Some(value as f32);
        }
        self.since_notification += delta_secs;

        let fps = self.fps?;
        if self.since_notification < FPS_NOTIFICATION_INTERVAL {
            return None;
        }
        self.since_notification = 0.0;
        Some(fps)
    }
}

pub fn fps_label(fps: Option<f32>) -> String {
    match fps {
        Some(value) => format!("FPS: {value:.1}"),
        None => "FPS: --".to_string(),
    }
}

pub fn track_frame_rate(
    diagnostics: Res<DiagnosticsStore>,
    time: Res<Time>,
    mut frame_rate: ResMut<FrameRate>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let reading = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed());

    if let Some(fps) = frame_rate.record(reading, time.delta_secs()) {
        rpc_interface.send_notification("fps_update", serde_json::json!({ "fps": fps }));
    }
}

pub fn fps_text_update_system(
    frame_rate: Res<FrameRate>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    if !frame_rate.is_changed() {
        return;
    }
    let label = fps_label(frame_rate.fps);
    for mut text in &mut query {
        text.0.clone_from(&label);
    }
}
