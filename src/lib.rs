pub mod audio;
pub mod config;
pub mod conversation;
pub mod messages;
pub mod service;
pub mod speech;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParleyError {
    #[error("Unsupported capability: {0}")]
    UnsupportedCapability(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Playback error: {0}")]
    PlaybackError(String),

    #[error("Recognition error: {0}")]
    RecognitionError(String),

    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Model load error: {0}")]
    ModelLoadError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl From<std::io::Error> for ParleyError {
    fn from(e: std::io::Error) -> Self {
        ParleyError::IoError(e.to_string())
    }
}

impl From<reqwest::Error> for ParleyError {
    fn from(e: reqwest::Error) -> Self {
        ParleyError::TransportError(e.to_string())
    }
}

impl ParleyError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The capability will not appear without a restart
            ParleyError::UnsupportedCapability(_) => false,
            ParleyError::TransportError(_) => true,
            ParleyError::ServiceError(_) => true,
            ParleyError::PlaybackError(_) => true,
            ParleyError::RecognitionError(_) => true,
            // Hardware/device errors may require user intervention
            ParleyError::AudioDeviceError(_) => false,
            ParleyError::ModelLoadError(_) => false,
            ParleyError::ConfigError(_) => false,
            ParleyError::IoError(_) => false,
            ParleyError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            ParleyError::UnsupportedCapability(what) => {
                format!("{} is not supported on this system", capitalize(what))
            }
            ParleyError::TransportError(_) => {
                "Could not reach the assistant. Please try again.".to_string()
            }
            ParleyError::ServiceError(_) => {
                "The assistant could not answer. Please try again.".to_string()
            }
            ParleyError::PlaybackError(_) => "Failed to play audio response".to_string(),
            ParleyError::RecognitionError(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            ParleyError::AudioDeviceError(_) => {
                "Audio device error. Please check your microphone/speakers.".to_string()
            }
            ParleyError::ModelLoadError(_) => {
                "Failed to load speech model. Please verify model files are present.".to_string()
            }
            ParleyError::ConfigError(_) => "Configuration error. Please check settings.".to_string(),
            ParleyError::IoError(_) => "File system error occurred.".to_string(),
            ParleyError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ParleyError>;
