//! Microphone capture and the signal processing voice recognition needs

#[cfg(feature = "audio-io")]
pub mod input;
#[cfg(feature = "audio-io")]
pub mod resampler;
#[cfg(feature = "audio-io")]
pub mod vad;

#[cfg(feature = "audio-io")]
pub use input::{AudioInput, InputEvent};
#[cfg(feature = "audio-io")]
pub use resampler::StreamResampler;
#[cfg(feature = "audio-io")]
pub use vad::VoiceActivityDetector;

/// Sample rate expected by Whisper and the VAD
pub const SPEECH_SAMPLE_RATE: u32 = 16000;
