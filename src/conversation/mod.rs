//! Conversation controller
//!
//! Owns the message log and the single in-flight request, and routes text,
//! image uploads and voice transcripts to the chat service. Responses are
//! appended to the log and spoken unless muted.
//!
//! All state lives on the caller's thread. Requests run on a tokio runtime
//! and report back over a channel that [`Conversation::poll_events`] drains.

pub mod notify;

pub use notify::{Notification, NotificationLevel, Notifications, NOTIFICATION_TTL};

use crate::messages::{Message, MessageLog};
use crate::service::{ChatBackend, UploadFile};
use crate::speech::{SpeechPlayback, VoiceCapture, VoiceEvent, VoiceState};
use crate::{ParleyError, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

pub const SEND_FAILED: &str = "Failed to send message. Please try again.";
pub const UPLOAD_FAILED: &str = "Failed to upload image. Please try again.";
pub const MUTED: &str = "Audio responses muted";
pub const UNMUTED: &str = "Audio responses unmuted";
pub const VOICE_SENT: &str = "Voice captured and sent!";
pub const LISTENING: &str = "Listening...";
pub const RECOGNITION_START_FAILED: &str = "Could not start speech recognition";
pub const NOT_AN_IMAGE: &str = "Only image files can be uploaded";

/// A finished request, sent back from the runtime
enum Completion {
    Chat(Result<String>),
    Upload {
        file_name: String,
        result: Result<String>,
    },
}

/// The conversation controller
///
/// Dropping it cancels ongoing speech and any voice session.
pub struct Conversation {
    messages: MessageLog,
    is_loading: bool,
    is_muted: bool,
    draft: String,
    notifications: Notifications,

    backend: Arc<dyn ChatBackend>,
    runtime: Handle,
    completion_tx: Sender<Completion>,
    completion_rx: Receiver<Completion>,

    voice: VoiceCapture,
    playback: SpeechPlayback,
    /// Missing synthesis is reported once, not on every response
    playback_unsupported_reported: bool,
}

impl Conversation {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        runtime: Handle,
        voice: VoiceCapture,
        playback: SpeechPlayback,
    ) -> Self {
        let (completion_tx, completion_rx) = unbounded();
        Self {
            messages: MessageLog::new(),
            is_loading: false,
            is_muted: false,
            draft: String::new(),
            notifications: Notifications::new(),
            backend,
            runtime,
            completion_tx,
            completion_rx,
            voice,
            playback,
            playback_unsupported_reported: false,
        }
    }

    /// Text-only controller: no recognizer, no synthesizer
    pub fn text_only(backend: Arc<dyn ChatBackend>, runtime: Handle) -> Self {
        Self::new(
            backend,
            runtime,
            VoiceCapture::unavailable(),
            SpeechPlayback::unavailable(),
        )
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn voice_state(&self) -> VoiceState {
        self.voice.state()
    }

    pub fn is_listening(&self) -> bool {
        self.voice.is_listening()
    }

    /// Anything pending that the UI should keep repainting for
    pub fn is_busy(&self) -> bool {
        self.is_loading || self.voice.is_active() || !self.notifications.is_empty()
    }

    /// Send a user message.
    ///
    /// Returns false (and does nothing) for blank input or while a request
    /// is in flight. The message is sent exactly as given.
    pub fn submit_text(&mut self, message: &str) -> bool {
        if message.trim().is_empty() {
            return false;
        }
        if self.is_loading {
            debug!("Request in flight, ignoring message");
            return false;
        }

        self.messages.push(Message::user(message));
        self.is_loading = true;
        info!("Sending message ({} chars)", message.len());

        let backend = Arc::clone(&self.backend);
        let tx = self.completion_tx.clone();
        let query = message.to_string();
        self.runtime.spawn(async move {
            let result = backend.chat(query).await;
            let _ = tx.send(Completion::Chat(result));
        });
        true
    }

    /// Submit the draft; it is cleared when accepted
    pub fn submit_draft(&mut self) -> bool {
        let draft = self.draft.clone();
        let accepted = self.submit_text(&draft);
        if accepted {
            self.draft.clear();
        }
        accepted
    }

    /// Upload an image. Nothing is appended until the service answers.
    pub fn submit_file(&mut self, file: UploadFile) -> bool {
        if self.is_loading {
            debug!("Request in flight, ignoring upload");
            return false;
        }

        self.is_loading = true;
        info!("Uploading {} ({} bytes)", file.name, file.bytes.len());

        let backend = Arc::clone(&self.backend);
        let tx = self.completion_tx.clone();
        let file_name = file.name.clone();
        self.runtime.spawn(async move {
            let result = backend.upload_image(file).await;
            let _ = tx.send(Completion::Upload { file_name, result });
        });
        true
    }

    /// Read an image from disk and upload it
    pub fn submit_path(&mut self, path: &Path) -> bool {
        if self.is_loading {
            return false;
        }
        let file = match UploadFile::from_path(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                self.notifications.error(UPLOAD_FAILED);
                return false;
            }
        };
        self.submit_image(file)
    }

    /// Upload a user-picked file, refusing anything that is not an image
    pub fn submit_image(&mut self, file: UploadFile) -> bool {
        if !file.is_image() {
            self.notifications.error(NOT_AN_IMAGE);
            return false;
        }
        self.submit_file(file)
    }

    /// Flip mute; muting silences whatever is playing
    pub fn toggle_mute(&mut self) {
        self.is_muted = !self.is_muted;
        if self.is_muted {
            self.playback.cancel_all();
            self.notifications.info(MUTED);
        } else {
            self.notifications.info(UNMUTED);
        }
        info!("Muted: {}", self.is_muted);
    }

    pub fn start_listening(&mut self) {
        match self.voice.start_listening() {
            Ok(()) => {}
            Err(e @ ParleyError::UnsupportedCapability(_)) => {
                self.notifications.error(e.user_message());
            }
            Err(e) => {
                warn!("Error starting speech recognition: {}", e);
                self.notifications.error(RECOGNITION_START_FAILED);
            }
        }
    }

    pub fn stop_listening(&mut self) {
        self.voice.stop_listening();
    }

    /// Mic button: stop when listening, start otherwise
    pub fn toggle_listening(&mut self) {
        match self.voice.state() {
            VoiceState::Listening => self.stop_listening(),
            VoiceState::Stopping => debug!("Voice session still stopping"),
            VoiceState::Idle => self.start_listening(),
        }
    }

    /// One-shot voice send: show the transcript in the draft and submit it
    pub fn submit_transcript(&mut self, transcript: &str) -> bool {
        info!("Voice recognized: {:?}", transcript);
        self.draft = transcript.to_string();
        let accepted = self.submit_text(transcript);
        if accepted {
            self.notifications.success(VOICE_SENT);
        }
        accepted
    }

    /// Apply finished requests, voice events and playback failures.
    /// Call once per frame; returns true if anything changed.
    pub fn poll_events(&mut self) -> bool {
        let mut changed = false;

        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply(completion);
            changed = true;
        }

        for event in self.voice.poll() {
            changed = true;
            match event {
                VoiceEvent::Started => self.notifications.info(LISTENING),
                VoiceEvent::Transcript(text) => {
                    self.submit_transcript(&text);
                }
                VoiceEvent::Error(kind) => {
                    self.notifications.error(format!("Error: {}", kind.code()))
                }
                VoiceEvent::Ended => debug!("Voice session ended"),
            }
        }

        // One toast however many utterances failed
        if let Some(failure) = self.playback.take_failures().into_iter().next() {
            self.notifications.error(failure.user_message());
            changed = true;
        }

        let before = self.notifications.len();
        self.notifications.expire(Instant::now());
        changed || self.notifications.len() != before
    }

    /// Block until the in-flight request finishes and apply it.
    ///
    /// Returns false if it did not finish within `timeout`.
    pub fn wait_for_response(&mut self, timeout: Duration) -> bool {
        if !self.is_loading {
            return true;
        }
        match self.completion_rx.recv_timeout(timeout) {
            Ok(completion) => {
                self.apply(completion);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                self.is_loading = false;
                true
            }
        }
    }

    fn apply(&mut self, completion: Completion) {
        self.is_loading = false;

        match completion {
            Completion::Chat(Ok(text)) => {
                self.messages.push(Message::bot(text.clone()));
                self.speak(&text);
            }
            Completion::Chat(Err(e)) => {
                warn!("Error sending message: {}", e);
                self.notifications.error(SEND_FAILED);
            }
            Completion::Upload {
                file_name,
                result: Ok(text),
            } => {
                self.messages
                    .push(Message::user(format!("Uploaded image: {}", file_name)));
                self.messages.push(Message::bot(text.clone()));
                self.speak(&text);
            }
            Completion::Upload {
                file_name,
                result: Err(e),
            } => {
                warn!("Error uploading {}: {}", file_name, e);
                self.notifications.error(UPLOAD_FAILED);
            }
        }
    }

    /// Mute is read here, when the response is about to be spoken
    fn speak(&mut self, text: &str) {
        if self.is_muted {
            return;
        }
        match self.playback.speak(text) {
            Ok(()) => {}
            Err(ParleyError::UnsupportedCapability(what)) => {
                if !self.playback_unsupported_reported {
                    info!("No {}, responses will not be spoken", what);
                    self.playback_unsupported_reported = true;
                }
            }
            Err(e) => {
                warn!("Error playing audio: {}", e);
                self.notifications.error(e.user_message());
            }
        }
    }
}
