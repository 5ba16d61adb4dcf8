use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task, block_on, futures_lite::future};
use constants::audio::{SPEECH_BITS_PER_SAMPLE, SPEECH_CHANNELS};
use constants::feeds::SPEECH_STYLE_PREFIX;
use std::io::Cursor;

use crate::engine::catalog::body_facts::ReferenceFacts;
use crate::engine::core::frame::SceneEntity;
use crate::engine::feeds::client::{FeedConfig, FeedError, post_json};
use crate::engine::feeds::liveness::SceneLiveness;
use crate::engine::state::view_state::ViewStateStore;

/// Speech toggle from the keyboard, the HUD or the RPC bridge.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ToggleSpeech;

#[derive(Resource, Debug, Default)]
pub struct SpeechState {
    pub is_speaking: bool,
}

/// In-flight synthesis request; resolves to a playable WAV.
#[derive(Component)]
pub struct SpeechRequest(pub Task<Result<Vec<u8>, FeedError>>);

#[derive(Component, Debug)]
pub struct SpeechPlayback;

/// Wrap raw little-endian 16-bit PCM in a WAV container.
pub fn wrap_pcm_as_wav(pcm: &[u8], sample_rate: u32) -> Result<Vec<u8>, FeedError> {
    let spec = hound::WavSpec {
        channels: SPEECH_CHANNELS,
        sample_rate,
        bits_per_sample: SPEECH_BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::with_capacity(pcm.len() + 44));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for frame in pcm.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([frame[0], frame[1]]))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Pull the base64 audio payload out of a synthesis response.
pub fn extract_audio_payload(response: &str) -> Result<String, FeedError> {
    let value: serde_json::Value = serde_json::from_str(response)?;
    value
        .pointer("/candidates/0/content/parts/0/inlineData/data")
        .and_then(|data| data.as_str())
        .map(str::to_string)
        .ok_or(FeedError::MissingField("candidates[0].content.parts[0].inlineData.data"))
}

pub fn decode_speech_response(response: &str, sample_rate: u32) -> Result<Vec<u8>, FeedError> {
    let pcm = STANDARD.decode(extract_audio_payload(response)?)?;
    wrap_pcm_as_wav(&pcm, sample_rate)
}

fn speech_request_body(text: &str, voice: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [{ "parts": [{ "text": format!("{SPEECH_STYLE_PREFIX}{text}") }] }],
        "generationConfig": {
            "responseModalities": ["AUDIO"],
            "speechConfig": {
                "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": voice } }
            }
        }
    })
}

async fn synthesise(
    config: FeedConfig,
    text: String,
    liveness: SceneLiveness,
) -> Result<Vec<u8>, FeedError> {
    let url = config.speech_request_url()?;
    let response = post_json(url, speech_request_body(&text, &config.speech_voice)).await?;
    if !liveness.is_alive() {
        return Err(FeedError::Cancelled);
    }
    decode_speech_response(&response, config.speech_sample_rate)
}

fn stop_speech(
    commands: &mut Commands,
    requests: &Query<Entity, With<SpeechRequest>>,
    playback: &Query<Entity, With<SpeechPlayback>>,
) {
    for entity in requests.iter().chain(playback.iter()) {
        commands.entity(entity).despawn();
    }
}

/// Idle: narrate the selected body. Speaking: stop.
pub fn handle_speech_toggle(
    mut commands: Commands,
    mut events: EventReader<ToggleSpeech>,
    mut speech: ResMut<SpeechState>,
    store: Res<ViewStateStore>,
    facts: Res<ReferenceFacts>,
    config: Res<FeedConfig>,
    liveness: Res<SceneLiveness>,
    requests: Query<Entity, With<SpeechRequest>>,
    playback: Query<Entity, With<SpeechPlayback>>,
) {
    for _ in events.read() {
        if speech.is_speaking {
            stop_speech(&mut commands, &requests, &playback);
            speech.is_speaking = false;
            info!("Speech stopped");
            continue;
        }

        let Some(selected) = store.state().selected_body.as_ref() else {
            debug!("Speech needs a selected body");
            continue;
        };
        let Some(body) = facts.get(selected) else {
            debug!("No reference facts for {selected}, nothing to narrate");
            continue;
        };

        let task = IoTaskPool::get().spawn(synthesise(
            config.clone(),
            body.narration(),
            liveness.clone(),
        ));
        commands.spawn((SceneEntity, SpeechRequest(task)));
        speech.is_speaking = true;
        info!("Narrating {selected}");
    }
}

/// Apply finished requests and notice when playback ends. Any failure only
/// resets the speaking flag.
pub fn poll_speech(
    mut commands: Commands,
    liveness: Res<SceneLiveness>,
    mut speech: ResMut<SpeechState>,
    mut audio_sources: ResMut<Assets<AudioSource>>,
    mut requests: Query<(Entity, &mut SpeechRequest)>,
    playback: Query<(), With<SpeechPlayback>>,
) {
    for (entity, mut request) in &mut requests {
        let Some(result) = block_on(future::poll_once(&mut request.0)) else {
            continue;
        };
        commands.entity(entity).despawn();
        if !liveness.is_alive() {
            continue;
        }
        match result {
            Ok(wav) => {
                let source = audio_sources.add(AudioSource { bytes: wav.into() });
                commands.spawn((
                    SceneEntity,
                    SpeechPlayback,
                    AudioPlayer(source),
                    PlaybackSettings::DESPAWN,
                ));
            }
            Err(error) => {
                warn!("Speech synthesis failed: {error}");
                speech.is_speaking = false;
            }
        }
        return;
    }

    // Playback entities despawn themselves when the clip ends.
    if speech.is_speaking && requests.is_empty() && playback.is_empty() {
        speech.is_speaking = false;
        debug!("Speech finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_pcm_with_sample_rate() {
        let pcm: Vec<u8> = [0i16, 1000, -1000, i16::MAX]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        let wav = wrap_pcm_as_wav(&pcm, 24_000).unwrap();
        let reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, 24_000);
        assert_eq!(reader.spec().channels, 1);
        let samples: Vec<i16> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0, 1000, -1000, i16::MAX]);
    }

    #[test]
    fn test_decodes_synthesis_response() {
        let pcm = [0x10u8, 0x00, 0xf0, 0xff];
        let response = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "inlineData": {
                "mimeType": "audio/L16;rate=24000",
                "data": STANDARD.encode(pcm)
            }}]}}]
        })
        .to_string();
        let wav = decode_speech_response(&response, 24_000).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
    }

    #[test]
    fn test_missing_payload_is_reported() {
        assert!(matches!(
            decode_speech_response("{\"candidates\":[]}", 24_000),
            Err(FeedError::MissingField(_))
        ));
        assert!(matches!(
            decode_speech_response("not json", 24_000),
            Err(FeedError::Json(_))
        ));
    }

    #[test]
    fn test_prompt_carries_voice_and_style() {
        let body = speech_request_body("Analyzing Mars.", "Charon");
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.ends_with("Analyzing Mars."));
        assert_eq!(
            body["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Charon"
        );
    }
}
