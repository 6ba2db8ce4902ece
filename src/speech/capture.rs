//! Voice capture adapter
//!
//! Wraps a speech recognizer behind a start/stop contract and tracks the
//! single voice session. Recognizers run on their own threads and report
//! through a [`VoiceEventSink`]; [`VoiceCapture::poll`] drains those events
//! on the caller's thread.

use crate::{ParleyError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::fmt;
use tracing::{debug, info, warn};

/// Recognition error codes, named after the browser speech API vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    NoSpeech,
    AudioCapture,
    NotAllowed,
    Aborted,
    Network,
    LanguageNotSupported,
    Other(String),
}

impl RecognitionErrorKind {
    pub fn code(&self) -> &str {
        match self {
            RecognitionErrorKind::NoSpeech => "no-speech",
            RecognitionErrorKind::AudioCapture => "audio-capture",
            RecognitionErrorKind::NotAllowed => "not-allowed",
            RecognitionErrorKind::Aborted => "aborted",
            RecognitionErrorKind::Network => "network",
            RecognitionErrorKind::LanguageNotSupported => "language-not-supported",
            RecognitionErrorKind::Other(code) => code,
        }
    }
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Events emitted during a voice session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    /// Capture has begun
    Started,
    /// Best alternative of the first result
    Transcript(String),
    /// Recognition failed
    Error(RecognitionErrorKind),
    /// Session is over; always the last event of a session
    Ended,
}

/// Recognizer settings fixed for every session
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionOptions {
    pub locale: String,
    /// Keep listening after the first result
    pub continuous: bool,
    /// Report partial hypotheses
    pub interim_results: bool,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self::single_utterance("en-US")
    }
}

impl RecognitionOptions {
    pub fn single_utterance(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            continuous: false,
            interim_results: false,
        }
    }
}

/// Where a recognizer reports its session events
#[derive(Debug, Clone)]
pub struct VoiceEventSink {
    tx: Sender<VoiceEvent>,
}

impl VoiceEventSink {
    pub fn started(&self) {
        self.emit(VoiceEvent::Started);
    }

    pub fn transcript(&self, text: impl Into<String>) {
        self.emit(VoiceEvent::Transcript(text.into()));
    }

    pub fn error(&self, kind: RecognitionErrorKind) {
        self.emit(VoiceEvent::Error(kind));
    }

    pub fn ended(&self) {
        self.emit(VoiceEvent::Ended);
    }

    fn emit(&self, event: VoiceEvent) {
        // The adapter may already be gone during shutdown
        if self.tx.send(event).is_err() {
            debug!("Voice event dropped, adapter closed");
        }
    }
}

/// A speech-to-text capability
pub trait SpeechRecognizer: Send {
    /// Begin one session. Events go to `sink`; the session must finish with `ended`.
    fn start(&mut self, options: &RecognitionOptions, sink: VoiceEventSink) -> Result<()>;

    /// Ask the current session to finish gracefully.
    fn stop(&mut self);
}

/// Voice session state as seen by the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,
    Listening,
    /// Stop requested, waiting for the trailing `Ended`
    Stopping,
}

/// The voice capture adapter
pub struct VoiceCapture {
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    options: RecognitionOptions,
    state: VoiceState,
    event_tx: Sender<VoiceEvent>,
    event_rx: Receiver<VoiceEvent>,
}

impl VoiceCapture {
    pub fn new(recognizer: Option<Box<dyn SpeechRecognizer>>, options: RecognitionOptions) -> Self {
        let (event_tx, event_rx) = unbounded();
        Self {
            recognizer,
            options,
            state: VoiceState::Idle,
            event_tx,
            event_rx,
        }
    }

    /// Adapter with no recognition capability
    pub fn unavailable() -> Self {
        Self::new(None, RecognitionOptions::default())
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == VoiceState::Listening
    }

    pub fn is_active(&self) -> bool {
        self.state != VoiceState::Idle
    }

    pub fn options(&self) -> &RecognitionOptions {
        &self.options
    }

    /// Start a session. Fails without touching state if there is no recognizer.
    pub fn start_listening(&mut self) -> Result<()> {
        let recognizer = self.recognizer.as_mut().ok_or_else(|| {
            ParleyError::UnsupportedCapability("speech recognition".into())
        })?;

        if self.state != VoiceState::Idle {
            debug!("Voice session already active ({:?})", self.state);
            return Ok(());
        }

        let sink = VoiceEventSink {
            tx: self.event_tx.clone(),
        };
        recognizer.start(&self.options, sink)?;

        self.state = VoiceState::Listening;
        info!("Voice session started ({})", self.options.locale);
        Ok(())
    }

    /// Request the active session to end. No-op when idle.
    pub fn stop_listening(&mut self) {
        if self.state != VoiceState::Listening {
            return;
        }
        if let Some(recognizer) = self.recognizer.as_mut() {
            info!("Stopping voice session");
            recognizer.stop();
            self.state = VoiceState::Stopping;
        }
    }

    /// Drain pending session events, updating the session state
    pub fn poll(&mut self) -> Vec<VoiceEvent> {
        let events: Vec<VoiceEvent> = self.event_rx.try_iter().collect();
        for event in &events {
            match event {
                VoiceEvent::Ended => {
                    if self.state == VoiceState::Idle {
                        debug!("Ignoring trailing voice session end");
                    }
                    self.state = VoiceState::Idle;
                }
                VoiceEvent::Error(kind) => warn!("Speech recognition error: {}", kind),
                VoiceEvent::Started | VoiceEvent::Transcript(_) => {}
            }
        }
        events
    }
}

impl Drop for VoiceCapture {
    fn drop(&mut self) {
        self.stop_listening();
    }
}
