//! Test doubles shared by the integration tests

#![allow(dead_code)]

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use parley::conversation::Conversation;
use parley::service::{ChatBackend, UploadFile};
use parley::speech::{
    RecognitionErrorKind, RecognitionOptions, SpeechPlayback, SpeechRecognizer, SpeechSynthesizer,
    Utterance, VoiceCapture, VoiceEventSink,
};
use parley::{ParleyError, Result};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::Semaphore;

/// Generous bound for a mock request to come back
pub const WAIT: Duration = Duration::from_secs(5);

/// Chat backend with scripted replies
///
/// A held backend does not answer until `release` is called, one reply per
/// release.
pub struct MockBackend {
    replies: Mutex<VecDeque<Result<String>>>,
    queries: Mutex<Vec<String>>,
    uploads: Mutex<Vec<UploadFile>>,
    gate: Semaphore,
}

impl MockBackend {
    pub fn replying(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            queries: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            gate: Semaphore::new(Semaphore::MAX_PERMITS),
        }
    }

    pub fn held(replies: Vec<Result<String>>) -> Self {
        Self {
            gate: Semaphore::new(0),
            ..Self::replying(replies)
        }
    }

    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }

    pub fn uploads(&self) -> Vec<UploadFile> {
        self.uploads.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().len() + self.uploads.lock().len()
    }

    async fn answer(&self) -> Result<String> {
        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ParleyError::ServiceError("no scripted reply".into())))
    }
}

impl ChatBackend for MockBackend {
    fn chat(&self, query: String) -> BoxFuture<'_, Result<String>> {
        self.queries.lock().push(query);
        self.answer().boxed()
    }

    fn upload_image(&self, file: UploadFile) -> BoxFuture<'_, Result<String>> {
        self.uploads.lock().push(file);
        self.answer().boxed()
    }
}

/// Recognizer the test drives by hand; `start` reports `Started` right away
#[derive(Clone, Default)]
pub struct ScriptedRecognizer {
    sink: Arc<Mutex<Option<VoiceEventSink>>>,
    starts: Arc<Mutex<usize>>,
    stops: Arc<Mutex<usize>>,
    pub fail_start: bool,
}

impl ScriptedRecognizer {
    pub fn failing() -> Self {
        Self {
            fail_start: true,
            ..Default::default()
        }
    }

    pub fn starts(&self) -> usize {
        *self.starts.lock()
    }

    pub fn stops(&self) -> usize {
        *self.stops.lock()
    }

    fn sink(&self) -> VoiceEventSink {
        self.sink.lock().clone().expect("no voice session was started")
    }

    pub fn say(&self, transcript: &str) {
        let sink = self.sink();
        sink.transcript(transcript);
        sink.ended();
    }

    pub fn fail(&self, kind: RecognitionErrorKind) {
        let sink = self.sink();
        sink.error(kind);
        sink.ended();
    }

    pub fn end(&self) {
        self.sink().ended();
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn start(&mut self, _options: &RecognitionOptions, sink: VoiceEventSink) -> Result<()> {
        if self.fail_start {
            return Err(ParleyError::AudioDeviceError("no microphone".into()));
        }
        *self.starts.lock() += 1;
        sink.started();
        *self.sink.lock() = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        *self.stops.lock() += 1;
    }
}

/// Synthesizer that records what it was asked to say
#[derive(Clone, Default)]
pub struct RecordingSynthesizer {
    spoken: Arc<Mutex<Vec<Utterance>>>,
    cancels: Arc<Mutex<usize>>,
    failures: Arc<Mutex<Vec<ParleyError>>>,
    pub fail: bool,
}

impl RecordingSynthesizer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().iter().map(|u| u.text.clone()).collect()
    }

    pub fn utterances(&self) -> Vec<Utterance> {
        self.spoken.lock().clone()
    }

    pub fn cancels(&self) -> usize {
        *self.cancels.lock()
    }

    /// Report a failure the way a worker thread would, after `speak` returned
    pub fn fail_later(&self, error: ParleyError) {
        self.failures.lock().push(error);
    }
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn speak(&mut self, utterance: Utterance) -> Result<()> {
        if self.fail {
            return Err(ParleyError::AudioDeviceError("no output device".into()));
        }
        self.spoken.lock().push(utterance);
        Ok(())
    }

    fn cancel(&mut self) {
        *self.cancels.lock() += 1;
    }

    fn take_failures(&mut self) -> Vec<ParleyError> {
        std::mem::take(&mut *self.failures.lock())
    }
}

/// A runtime plus the doubles behind one conversation
pub struct Fixture {
    pub backend: Arc<MockBackend>,
    pub recognizer: ScriptedRecognizer,
    pub synthesizer: RecordingSynthesizer,
    pub runtime: Runtime,
}

impl Fixture {
    pub fn new(backend: MockBackend) -> Self {
        Self::with_doubles(backend, ScriptedRecognizer::default(), RecordingSynthesizer::default())
    }

    pub fn with_doubles(
        backend: MockBackend,
        recognizer: ScriptedRecognizer,
        synthesizer: RecordingSynthesizer,
    ) -> Self {
        Self {
            backend: Arc::new(backend),
            recognizer,
            synthesizer,
            runtime: Runtime::new().expect("failed to build test runtime"),
        }
    }

    /// Conversation wired to this fixture's doubles
    pub fn conversation(&self) -> Conversation {
        Conversation::new(
            self.backend.clone(),
            self.runtime.handle().clone(),
            VoiceCapture::new(
                Some(Box::new(self.recognizer.clone())),
                RecognitionOptions::default(),
            ),
            SpeechPlayback::new(Some(Box::new(self.synthesizer.clone()))),
        )
    }

    /// Conversation with no voice capabilities at all
    pub fn text_only(&self) -> Conversation {
        Conversation::text_only(self.backend.clone(), self.runtime.handle().clone())
    }
}
