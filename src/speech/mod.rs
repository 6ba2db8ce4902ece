//! Speech input and output
//!
//! - `capture`: voice capture adapter over a [`SpeechRecognizer`]
//! - `playback`: speech playback adapter over a [`SpeechSynthesizer`]
//! - `whisper` / `vits`: the desktop implementations (feature `audio-io`)

pub mod capture;
pub mod playback;
#[cfg(feature = "audio-io")]
pub mod vits;
#[cfg(feature = "audio-io")]
pub mod whisper;

pub use capture::{
    RecognitionErrorKind, RecognitionOptions, SpeechRecognizer, VoiceCapture, VoiceEvent,
    VoiceEventSink, VoiceState,
};
pub use playback::{SpeechPlayback, SpeechSynthesizer, Utterance};
#[cfg(feature = "audio-io")]
pub use vits::VitsSynthesizer;
#[cfg(feature = "audio-io")]
pub use whisper::WhisperRecognizer;

use crate::config::{SpeechConfig, VoiceConfig};
use tracing::{info, warn};

/// Voice capture for the configured recognizer; unavailable if it can't load
pub fn voice_capture_from_config(config: &VoiceConfig) -> VoiceCapture {
    let options = RecognitionOptions::single_utterance(config.locale.clone());
    if !config.enabled {
        info!("Voice input disabled");
        return VoiceCapture::new(None, options);
    }

    #[cfg(feature = "audio-io")]
    {
        match WhisperRecognizer::new(config.clone()) {
            Ok(recognizer) => return VoiceCapture::new(Some(Box::new(recognizer)), options),
            Err(e) => warn!("Speech recognition unavailable: {}", e),
        }
    }
    #[cfg(not(feature = "audio-io"))]
    warn!("Built without audio-io, speech recognition unavailable");

    VoiceCapture::new(None, options)
}

/// Speech playback for the configured synthesizer; unavailable if it can't load
pub fn speech_playback_from_config(config: &SpeechConfig) -> SpeechPlayback {
    if !config.enabled {
        info!("Spoken responses disabled");
        return SpeechPlayback::unavailable();
    }

    #[cfg(feature = "audio-io")]
    {
        match VitsSynthesizer::new(config.clone()) {
            Ok(synthesizer) => {
                return SpeechPlayback::new(Some(Box::new(synthesizer)))
                    .with_voice(config.rate, config.pitch)
            }
            Err(e) => warn!("Speech synthesis unavailable: {}", e),
        }
    }
    #[cfg(not(feature = "audio-io"))]
    warn!("Built without audio-io, speech synthesis unavailable");

    SpeechPlayback::unavailable()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_capabilities_are_absent() {
        let capture = voice_capture_from_config(&VoiceConfig {
            enabled: false,
            locale: "de-DE".into(),
            ..Default::default()
        });
        assert!(!capture.is_available());
        assert_eq!(capture.options().locale, "de-DE");

        let playback = speech_playback_from_config(&SpeechConfig {
            enabled: false,
            ..Default::default()
        });
        assert!(!playback.is_available());
    }

    #[test]
    fn test_missing_models_leave_capabilities_absent() {
        let capture = voice_capture_from_config(&VoiceConfig {
            model_path: "/nonexistent/ggml.bin".into(),
            ..Default::default()
        });
        assert!(!capture.is_available());

        let playback = speech_playback_from_config(&SpeechConfig {
            model_path: "/nonexistent/model.onnx".into(),
            ..Default::default()
        });
        assert!(!playback.is_available());
    }
}
