/// DONKI solar flare endpoint; the API key is appended at runtime.
pub const SPACE_WEATHER_URL: &str =
    "https://api.nasa.gov/DONKI/FLR?startDate=2024-01-01&endDate=2024-12-31";

pub const SPACE_WEATHER_DEFAULT_KEY: &str = "DEMO_KEY";
pub const SPACE_WEATHER_KEY_ENV: &str = "NASA_API_KEY";

/// Text-to-speech endpoint; the API key is appended at runtime.
pub const SPEECH_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-tts:generateContent";

pub const SPEECH_KEY_ENV: &str = "TTS_API_KEY";
pub const SPEECH_VOICE: &str = "Charon";

/// Prefix steering the voice style of the generated narration.
pub const SPEECH_STYLE_PREFIX: &str =
    "In a clinical, highly-detailed artificial intelligence voice: ";
