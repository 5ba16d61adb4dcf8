use bevy::prelude::*;
use constants::audio::SPEECH_SAMPLE_RATE;
use constants::feeds::{
    SPACE_WEATHER_DEFAULT_KEY, SPACE_WEATHER_KEY_ENV, SPACE_WEATHER_URL, SPEECH_KEY_ENV,
    SPEECH_URL, SPEECH_VOICE,
};
use thiserror::Error;

/// Failures of the external feeds. Logged and degraded to "no data" or
/// "idle"; never surfaced as errors in the UI.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response is missing {0}")]
    MissingField(&'static str),

    #[error("invalid base64 audio: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("could not encode WAV: {0}")]
    Wav(#[from] hound::Error),

    #[error("no API key configured for {0}")]
    MissingKey(&'static str),

    #[error("scene was torn down before the request completed")]
    Cancelled,
}

impl From<reqwest::Error> for FeedError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => Self::Status(status.as_u16()),
            None => Self::Transport(error.to_string()),
        }
    }
}

/// Endpoints and credentials for the external feeds.
#[derive(Resource, Debug, Clone)]
pub struct FeedConfig {
    pub space_weather_url: String,
    pub space_weather_key: String,
    pub speech_url: String,
    pub speech_key: Option<String>,
    pub speech_voice: String,
    pub speech_sample_rate: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            space_weather_url: SPACE_WEATHER_URL.to_string(),
            space_weather_key: SPACE_WEATHER_DEFAULT_KEY.to_string(),
            speech_url: SPEECH_URL.to_string(),
            speech_key: None,
            speech_voice: SPEECH_VOICE.to_string(),
            speech_sample_rate: SPEECH_SAMPLE_RATE,
        }
    }
}

impl FeedConfig {
    /// Defaults overridden by environment keys where the platform has an environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var(SPACE_WEATHER_KEY_ENV) {
            if !key.is_empty() {
                config.space_weather_key = key;
            }
        }
        config.speech_key = std::env::var(SPEECH_KEY_ENV).ok().filter(|k| !k.is_empty());
        config
    }

    pub fn space_weather_request_url(&self) -> String {
        format!("{}&api_key={}", self.space_weather_url, self.space_weather_key)
    }

    pub fn speech_request_url(&self) -> Result<String, FeedError> {
        let key = self
            .speech_key
            .as_deref()
            .ok_or(FeedError::MissingKey("speech"))?;
        Ok(format!("{}?key={}", self.speech_url, key))
    }
}

/// Run a blocking request on its own thread and await the outcome, so a
/// slow or hung endpoint never occupies a task-pool thread. Dropping the
/// returned future abandons the result; the thread finishes on its own.
#[cfg(not(target_arch = "wasm32"))]
pub async fn run_off_pool<T: Send + 'static>(
    request: impl FnOnce() -> Result<T, FeedError> + Send + 'static,
) -> Result<T, FeedError> {
    let (tx, rx) = flume::bounded(1);
    std::thread::Builder::new()
        .name("feed-request".to_string())
        .spawn(move || {
            let _ = tx.send(request());
        })
        .map_err(|e| FeedError::Transport(e.to_string()))?;

    rx.recv_async()
        .await
        .map_err(|_| FeedError::Transport("request thread exited without a result".to_string()))?
}

/// GET a JSON document.
#[cfg(not(target_arch = "wasm32"))]
pub async fn get_text(url: String) -> Result<String, FeedError> {
    run_off_pool(move || {
        let response = reqwest::blocking::get(url)?.error_for_status()?;
        Ok(response.text()?)
    })
    .await
}

/// POST a JSON body and return the response text.
#[cfg(not(target_arch = "wasm32"))]
pub async fn post_json(url: String, body: serde_json::Value) -> Result<String, FeedError> {
    run_off_pool(move || {
        let response = reqwest::blocking::Client::new()
            .post(url)
            .json(&body)
            .send()?
            .error_for_status()?;
        Ok(response.text()?)
    })
    .await
}

/// GET a JSON document.
#[cfg(target_arch = "wasm32")]
pub async fn get_text(url: String) -> Result<String, FeedError> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.text().await?)
}

/// POST a JSON body and return the response text.
#[cfg(target_arch = "wasm32")]
pub async fn post_json(url: String, body: serde_json::Value) -> Result<String, FeedError> {
    let response = reqwest::Client::new()
        .post(url)
        .json(&body)
        .send()
        .await?
        .error_for_status()?;
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weather_key() {
        let config = FeedConfig::default();
        assert!(config.space_weather_request_url().ends_with("&api_key=DEMO_KEY"));
    }

    #[test]
    fn test_speech_needs_key() {
        let mut config = FeedConfig::default();
        assert!(matches!(
            config.speech_request_url(),
            Err(FeedError::MissingKey(_))
        ));
        config.speech_key = Some("abc".to_string());
        assert!(config.speech_request_url().unwrap().ends_with("?key=abc"));
    }

    #[test]
    fn test_hung_request_leaves_pool_free() {
        use bevy::tasks::{TaskPoolBuilder, block_on};

        let pool = TaskPoolBuilder::new().num_threads(1).build();
        let (release, hold) = flume::bounded::<()>(1);
        let hung = pool.spawn(run_off_pool(move || {
            let _ = hold.recv();
            Ok("late".to_string())
        }));

        let unrelated = pool.spawn(async { 42 });
        assert_eq!(block_on(unrelated), 42);

        release.send(()).unwrap();
        assert_eq!(block_on(hung).unwrap(), "late");
    }

    #[test]
    fn test_request_errors_come_back() {
        let result: Result<(), FeedError> =
            bevy::tasks::block_on(run_off_pool(|| Err(FeedError::Status(503))));
        assert!(matches!(result, Err(FeedError::Status(503))));
    }
}
