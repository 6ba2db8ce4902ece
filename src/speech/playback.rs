//! Speech playback adapter
//!
//! Wraps a speech synthesizer behind speak/cancel. At most one utterance
//! plays at a time: every `speak` cancels what came before. Mute is the
//! caller's business.

use crate::{ParleyError, Result};
use tracing::{debug, warn};

/// One thing to say
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// 1.0 = normal speaking rate
    pub rate: f32,
    /// 1.0 = normal pitch
    pub pitch: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

/// A text-to-speech capability
pub trait SpeechSynthesizer: Send {
    /// Start speaking. Returning means the utterance was accepted, not finished.
    fn speak(&mut self, utterance: Utterance) -> Result<()>;

    /// Stop whatever is playing or queued.
    fn cancel(&mut self);

    /// Failures that happened after `speak` returned
    fn take_failures(&mut self) -> Vec<ParleyError> {
        Vec::new()
    }
}

/// The speech playback adapter
pub struct SpeechPlayback {
    synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    rate: f32,
    pitch: f32,
}

impl SpeechPlayback {
    pub fn new(synthesizer: Option<Box<dyn SpeechSynthesizer>>) -> Self {
        Self {
            synthesizer,
            rate: 1.0,
            pitch: 1.0,
        }
    }

    /// Adapter with no synthesis capability
    pub fn unavailable() -> Self {
        Self::new(None)
    }

    pub fn with_voice(mut self, rate: f32, pitch: f32) -> Self {
        self.rate = rate;
        self.pitch = pitch;
        self
    }

    pub fn is_available(&self) -> bool {
        self.synthesizer.is_some()
    }

    /// Cancel current speech, then say `text`
    pub fn speak(&mut self, text: &str) -> Result<()> {
        let synthesizer = self
            .synthesizer
            .as_mut()
            .ok_or_else(|| ParleyError::UnsupportedCapability("speech synthesis".into()))?;

        synthesizer.cancel();

        debug!("Speaking {} chars", text.len());
        let utterance = Utterance {
            text: text.to_string(),
            rate: self.rate,
            pitch: self.pitch,
        };
        synthesizer.speak(utterance).map_err(as_playback_error)
    }

    pub fn cancel_all(&mut self) {
        if let Some(synthesizer) = self.synthesizer.as_mut() {
            synthesizer.cancel();
        }
    }

    /// Asynchronous failures since the last call
    pub fn take_failures(&mut self) -> Vec<ParleyError> {
        let failures = self
            .synthesizer
            .as_mut()
            .map(|s| s.take_failures())
            .unwrap_or_default();
        for failure in &failures {
            warn!("Speech playback failed: {}", failure);
        }
        failures.into_iter().map(as_playback_error).collect()
    }
}

/// Anything a synthesizer reports surfaces as a playback failure
fn as_playback_error(e: ParleyError) -> ParleyError {
    match e {
        ParleyError::PlaybackError(msg) => ParleyError::PlaybackError(msg),
        other => ParleyError::PlaybackError(other.to_string()),
    }
}

impl Drop for SpeechPlayback {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Script {
        calls: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl SpeechSynthesizer for Script {
        fn speak(&mut self, utterance: Utterance) -> Result<()> {
            self.calls.lock().push(format!("speak:{}", utterance.text));
            if self.fail {
                return Err(ParleyError::AudioDeviceError("no output device".into()));
            }
            Ok(())
        }

        fn cancel(&mut self) {
            self.calls.lock().push("cancel".to_string());
        }
    }

    #[test]
    fn test_speak_cancels_first() {
        let script = Script::default();
        let mut playback = SpeechPlayback::new(Some(Box::new(script.clone())));

        playback.speak("one").unwrap();
        playback.speak("two").unwrap();

        assert_eq!(
            *script.calls.lock(),
            vec!["cancel", "speak:one", "cancel", "speak:two"]
        );
    }

    #[test]
    fn test_failure_becomes_playback_error() {
        let script = Script {
            fail: true,
            ..Default::default()
        };
        let mut playback = SpeechPlayback::new(Some(Box::new(script)));

        let err = playback.speak("hello").unwrap_err();
        assert!(matches!(err, ParleyError::PlaybackError(_)));
    }

    #[test]
    fn test_unavailable() {
        let mut playback = SpeechPlayback::unavailable();
        assert!(!playback.is_available());
        assert!(matches!(
            playback.speak("hello"),
            Err(ParleyError::UnsupportedCapability(_))
        ));
        playback.cancel_all();
    }

    #[test]
    fn test_drop_cancels() {
        let script = Script::default();
        drop(SpeechPlayback::new(Some(Box::new(script.clone()))));
        assert_eq!(*script.calls.lock(), vec!["cancel"]);
    }

    #[test]
    fn test_normal_rate_and_pitch() {
        let utterance = Utterance::new("hi");
        assert_eq!(utterance.rate, 1.0);
        assert_eq!(utterance.pitch, 1.0);
    }
}
