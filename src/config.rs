//! Application configuration
//!
//! Service address, voice capture and speech output settings. Defaults work
//! against a backend on the local machine; `from_env` applies overrides.

use crate::{ParleyError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Base address of the chat service when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

pub const ENV_BASE_URL: &str = "PARLEY_BASE_URL";
pub const ENV_WHISPER_MODEL: &str = "PARLEY_WHISPER_MODEL";
pub const ENV_TTS_MODEL: &str = "PARLEY_TTS_MODEL";
pub const ENV_TTS_TOKENS: &str = "PARLEY_TTS_TOKENS";

/// Remote chat service settings
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Base URL, without the endpoint path
    pub base_url: String,

    /// Timeout applied to each request
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl ServiceConfig {
    pub fn chat_url(&self) -> String {
        self.endpoint("chat")
    }

    pub fn upload_url(&self) -> String {
        self.endpoint("upload_image")
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Speech recognition settings
#[derive(Clone, Debug)]
pub struct VoiceConfig {
    /// Whether voice input is wired up at all
    pub enabled: bool,

    /// Path to the Whisper model file
    pub model_path: PathBuf,

    /// Recognition locale, e.g. "en-US"
    pub locale: String,

    /// Number of threads to use for transcription
    pub n_threads: i32,

    /// VAD probability threshold for speech detection (0.0-1.0)
    pub vad_threshold: f32,

    /// Trailing silence that ends the utterance (seconds)
    pub silence_threshold: f32,

    /// Hard cap on utterance length (seconds)
    pub max_utterance: f32,

    /// How long to wait for speech to begin before giving up (seconds)
    pub listen_timeout: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model_path: PathBuf::from("models/ggml-base.en.bin"),
            locale: "en-US".to_string(),
            n_threads: 4,
            vad_threshold: 0.5,
            silence_threshold: 0.8,
            max_utterance: 15.0,
            listen_timeout: 8.0,
        }
    }
}

impl VoiceConfig {
    /// Whisper language code derived from the locale ("en-US" -> "en")
    pub fn language(&self) -> String {
        language_code(&self.locale)
    }
}

/// Primary language subtag of a locale ("en-US" -> "en")
pub fn language_code(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Speech synthesis settings
#[derive(Clone, Debug)]
pub struct SpeechConfig {
    /// Whether spoken responses are wired up at all
    pub enabled: bool,

    /// Path to the VITS ONNX model
    pub model_path: String,

    /// Path to the tokens file
    pub tokens_path: String,

    /// Path to the lexicon file (optional for some models)
    pub lexicon_path: Option<String>,

    /// Path to the espeak data directory (optional)
    pub data_dir: Option<String>,

    /// Speaker ID for multi-speaker models
    pub speaker_id: i32,

    /// Speaking rate (1.0 = normal)
    pub rate: f32,

    /// Pitch (1.0 = normal)
    pub pitch: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model_path: "models/vits/model.onnx".to_string(),
            tokens_path: "models/vits/tokens.txt".to_string(),
            lexicon_path: None,
            data_dir: None,
            speaker_id: 0,
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

/// Configuration for the whole application
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub voice: VoiceConfig,
    pub speech: SpeechConfig,
}

impl AppConfig {
    /// Defaults overridden by `PARLEY_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `PARLEY_*` keys
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = value(ENV_BASE_URL) {
            config.service.base_url = url.trim().to_string();
        }
        if let Some(path) = value(ENV_WHISPER_MODEL) {
            config.voice.model_path = PathBuf::from(path);
        }
        if let Some(path) = value(ENV_TTS_MODEL) {
            config.speech.model_path = path;
        }
        if let Some(path) = value(ENV_TTS_TOKENS) {
            config.speech.tokens_path = path;
        }
        config
    }

    /// Set the service base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.service.base_url = base_url.into();
        self
    }

    /// Disable voice input (text-only mode)
    pub fn without_voice_input(mut self) -> Self {
        self.voice.enabled = false;
        self
    }

    /// Disable spoken responses
    pub fn without_speech_output(mut self) -> Self {
        self.speech.enabled = false;
        self
    }

    /// Validate the configuration
    ///
    /// Missing model files are not an error here; they only make the
    /// corresponding capability unavailable.
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.service.base_url).map_err(|e| {
            ParleyError::ConfigError(format!(
                "Invalid service URL {:?}: {}",
                self.service.base_url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ParleyError::ConfigError(format!(
                "Service URL must be http or https, got {}",
                url.scheme()
            )));
        }

        if self.service.timeout.is_zero() {
            return Err(ParleyError::ConfigError(
                "Request timeout must be greater than 0".into(),
            ));
        }

        if self.voice.enabled && self.voice.language().is_empty() {
            return Err(ParleyError::ConfigError(format!(
                "Invalid recognition locale: {:?}",
                self.voice.locale
            )));
        }

        if self.speech.rate <= 0.0 || self.speech.pitch <= 0.0 {
            return Err(ParleyError::ConfigError(
                "Speech rate and pitch must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.service.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.voice.locale, "en-US");
        assert_eq!(config.speech.rate, 1.0);
        assert_eq!(config.speech.pitch, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_urls() {
        let config = AppConfig::default().with_base_url("http://localhost:8080/");
        assert_eq!(config.service.chat_url(), "http://localhost:8080/chat");
        assert_eq!(
            config.service.upload_url(),
            "http://localhost:8080/upload_image"
        );
    }

    #[test]
    fn test_lookup_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "https://assist.example.org"),
            (ENV_WHISPER_MODEL, "/opt/models/ggml-small.en.bin"),
            (ENV_TTS_MODEL, "  "),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.service.base_url, "https://assist.example.org");
        assert_eq!(
            config.voice.model_path,
            PathBuf::from("/opt/models/ggml-small.en.bin")
        );
        // Blank values keep the default
        assert_eq!(config.speech.model_path, SpeechConfig::default().model_path);
    }

    #[test]
    fn test_config_builder() {
        let config = AppConfig::default()
            .without_voice_input()
            .without_speech_output();

        assert!(!config.voice.enabled);
        assert!(!config.speech.enabled);
    }

    #[test]
    fn test_rejects_bad_url() {
        assert!(AppConfig::default().with_base_url("not a url").validate().is_err());
        assert!(AppConfig::default()
            .with_base_url("ftp://127.0.0.1")
            .validate()
            .is_err());
    }

    #[test]
    fn test_language_from_locale() {
        let mut voice = VoiceConfig::default();
        assert_eq!(voice.language(), "en");
        voice.locale = "fr_CA".into();
        assert_eq!(voice.language(), "fr");
    }
}
