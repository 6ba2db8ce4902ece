//! Desktop speech recognizer: microphone, VAD end-pointing and whisper.cpp
//!
//! One worker thread owns the Whisper model for the life of the recognizer.
//! Each session opens the default microphone, waits for speech, ends the
//! utterance on trailing silence (or a stop request), and transcribes it.
//! A microphone that errors or goes quiet at the stream level ends the
//! session with `audio-capture`.

use super::capture::{RecognitionErrorKind, RecognitionOptions, SpeechRecognizer, VoiceEventSink};
use crate::audio::vad::VAD_FRAME;
use crate::audio::{
    AudioInput, InputEvent, StreamResampler, VoiceActivityDetector, SPEECH_SAMPLE_RATE,
};
use crate::config::{language_code, VoiceConfig};
use crate::{ParleyError, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

const FRAME_SECONDS: f32 = VAD_FRAME as f32 / SPEECH_SAMPLE_RATE as f32;

/// How long the capture loop waits for audio before rechecking its limits
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A stream that delivers nothing for this long is treated as dead
const STALL_TIMEOUT: Duration = Duration::from_secs(2);

enum SessionCommand {
    Start {
        language: String,
        sink: VoiceEventSink,
    },
    Stop,
    Shutdown,
}

/// How a capture loop finished
#[derive(Debug, PartialEq)]
enum CaptureEnd {
    /// Trailing silence, length cap, session bound, or no speech in time
    Natural,
    Stopped,
    /// Stream error or stall
    Failed,
    Shutdown,
}

/// End-pointing limits for one session
#[derive(Debug, Clone, Copy)]
struct Limits {
    silence: f32,
    max_utterance: f32,
    listen_timeout: f32,
    stall: Duration,
}

impl Limits {
    fn from_config(config: &VoiceConfig) -> Self {
        Self {
            silence: config.silence_threshold,
            max_utterance: config.max_utterance,
            listen_timeout: config.listen_timeout,
            stall: STALL_TIMEOUT,
        }
    }

    /// Wall-clock bound once speech has been heard
    fn session_bound(&self) -> f32 {
        self.listen_timeout + self.max_utterance
    }
}

/// Whisper-backed [`SpeechRecognizer`]
pub struct WhisperRecognizer {
    command_tx: Sender<SessionCommand>,
}

impl WhisperRecognizer {
    /// Load the model and start the worker thread
    pub fn new(config: VoiceConfig) -> Result<Self> {
        info!("Loading Whisper model from: {:?}", config.model_path);

        if !config.model_path.exists() {
            return Err(ParleyError::ModelLoadError(format!(
                "Model file not found: {:?}",
                config.model_path
            )));
        }

        let context = WhisperContext::new_with_params(
            config
                .model_path
                .to_str()
                .ok_or_else(|| ParleyError::ModelLoadError("Invalid model path".to_string()))?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| ParleyError::ModelLoadError(format!("Failed to load Whisper model: {:?}", e)))?;

        let (command_tx, command_rx) = unbounded();
        let mut worker = SessionWorker {
            config,
            context,
            commands: command_rx,
        };

        thread::Builder::new()
            .name("parley-stt".into())
            .spawn(move || worker.run())?;

        info!("Whisper recognizer ready");
        Ok(Self { command_tx })
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn start(&mut self, options: &RecognitionOptions, sink: VoiceEventSink) -> Result<()> {
        let language = language_code(&options.locale);
        self.command_tx
            .send(SessionCommand::Start { language, sink })
            .map_err(|e| ParleyError::ChannelError(format!("Recognizer worker gone: {}", e)))
    }

    fn stop(&mut self) {
        let _ = self.command_tx.send(SessionCommand::Stop);
    }
}

impl Drop for WhisperRecognizer {
    fn drop(&mut self) {
        let _ = self.command_tx.send(SessionCommand::Shutdown);
    }
}

struct SessionWorker {
    config: VoiceConfig,
    context: WhisperContext,
    commands: Receiver<SessionCommand>,
}

impl SessionWorker {
    fn run(&mut self) {
        info!("Recognizer worker started");

        let mut vad = match VoiceActivityDetector::new(self.config.vad_threshold) {
            Ok(vad) => Some(vad),
            Err(e) => {
                error!("VAD unavailable: {}", e);
                None
            }
        };

        loop {
            match self.commands.recv() {
                Ok(SessionCommand::Start { language, sink }) => {
                    let Some(vad) = vad.as_mut() else {
                        sink.error(RecognitionErrorKind::Other("vad-unavailable".into()));
                        sink.ended();
                        continue;
                    };
                    if self.run_session(&language, vad, &sink) {
                        break;
                    }
                }
                // Stop with no session running
                Ok(SessionCommand::Stop) => {}
                Ok(SessionCommand::Shutdown) | Err(_) => break,
            }
        }

        info!("Recognizer worker stopped");
    }

    /// Returns true when the worker should shut down
    fn run_session(
        &self,
        language: &str,
        vad: &mut VoiceActivityDetector,
        sink: &VoiceEventSink,
    ) -> bool {
        vad.reset();

        let (audio_tx, audio_rx) = bounded(64);
        let mut input = match AudioInput::new().and_then(|mut input| {
            input.start_recording(audio_tx)?;
            Ok(input)
        }) {
            Ok(input) => input,
            Err(e) => {
                warn!("Microphone unavailable: {}", e);
                sink.error(RecognitionErrorKind::AudioCapture);
                sink.ended();
                return false;
            }
        };

        let mut resampler = match StreamResampler::new(input.sample_rate(), SPEECH_SAMPLE_RATE) {
            Ok(resampler) => resampler,
            Err(e) => {
                warn!("{}", e);
                sink.error(RecognitionErrorKind::AudioCapture);
                sink.ended();
                return false;
            }
        };

        sink.started();
        let mut utterance = Utterance::default();
        let end = capture(
            &self.commands,
            &audio_rx,
            &mut resampler,
            |frame| vad.is_speech(frame),
            Limits::from_config(&self.config),
            &mut utterance,
        );
        input.stop_recording();

        match end {
            CaptureEnd::Shutdown => {
                sink.error(RecognitionErrorKind::Aborted);
                sink.ended();
                return true;
            }
            CaptureEnd::Failed => sink.error(RecognitionErrorKind::AudioCapture),
            CaptureEnd::Stopped if !utterance.heard_speech => {}
            CaptureEnd::Natural if !utterance.heard_speech => {
                sink.error(RecognitionErrorKind::NoSpeech);
            }
            _ => match self.transcribe(language, &utterance.samples) {
                Ok(text) if !text.is_empty() => sink.transcript(text),
                Ok(_) => sink.error(RecognitionErrorKind::NoSpeech),
                Err(e) => {
                    warn!("Transcription failed: {}", e);
                    sink.error(RecognitionErrorKind::Other("transcription-failed".into()));
                }
            },
        }

        sink.ended();
        false
    }

    fn transcribe(&self, language: &str, samples: &[f32]) -> Result<String> {
        debug!(
            "Transcribing {} samples ({:.2}s)",
            samples.len(),
            samples.len() as f32 / SPEECH_SAMPLE_RATE as f32
        );

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.config.n_threads);
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_language(Some(language));

        let mut state = self.context.create_state().map_err(|e| {
            ParleyError::RecognitionError(format!("Failed to create state: {:?}", e))
        })?;

        state
            .full(params, samples)
            .map_err(|e| ParleyError::RecognitionError(format!("Transcription failed: {:?}", e)))?;

        let num_segments = state.full_n_segments().map_err(|e| {
            ParleyError::RecognitionError(format!("Failed to get segments: {:?}", e))
        })?;

        let mut text = String::new();
        for i in 0..num_segments {
            let segment = state.full_get_segment_text(i).map_err(|e| {
                ParleyError::RecognitionError(format!("Failed to get segment text: {:?}", e))
            })?;
            text.push_str(&segment);
        }

        let text = text.trim().to_string();
        debug!("Transcription result: '{}'", text);
        Ok(text)
    }
}

/// Pull microphone audio until the utterance ends.
///
/// `is_speech` classifies one `VAD_FRAME` of 16 kHz audio. Commands are
/// checked between reads so a stop lands within one poll interval.
fn capture(
    commands: &Receiver<SessionCommand>,
    audio_rx: &Receiver<InputEvent>,
    resampler: &mut StreamResampler,
    mut is_speech: impl FnMut(&[f32]) -> bool,
    limits: Limits,
    utterance: &mut Utterance,
) -> CaptureEnd {
    let started = Instant::now();
    let mut last_audio = started;
    let mut pending: Vec<f32> = Vec::with_capacity(VAD_FRAME * 4);

    loop {
        match commands.try_recv() {
            Ok(SessionCommand::Stop) => return CaptureEnd::Stopped,
            Ok(SessionCommand::Shutdown) | Err(TryRecvError::Disconnected) => {
                return CaptureEnd::Shutdown
            }
            Ok(SessionCommand::Start { sink, .. }) => {
                // The adapter never overlaps sessions; close the stray one
                sink.ended();
            }
            Err(TryRecvError::Empty) => {}
        }

        match audio_rx.recv_timeout(POLL_INTERVAL) {
            Ok(InputEvent::Chunk(chunk)) => {
                last_audio = Instant::now();
                match resampler.push(&chunk) {
                    Ok(samples) => pending.extend(samples),
                    Err(e) => warn!("{}", e),
                }
            }
            Ok(InputEvent::Failed(e)) => {
                warn!("Microphone failed mid-session: {}", e);
                return CaptureEnd::Failed;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Microphone stream closed");
                return CaptureEnd::Failed;
            }
        }

        while pending.len() >= VAD_FRAME {
            let frame: Vec<f32> = pending.drain(..VAD_FRAME).collect();
            let speech = is_speech(&frame[..]);
            utterance.push_frame(&frame, speech);
        }

        if utterance.heard_speech && utterance.trailing_silence >= limits.silence {
            debug!("Utterance ended on silence");
            return CaptureEnd::Natural;
        }
        if utterance.duration() >= limits.max_utterance {
            debug!("Utterance hit the length cap");
            return CaptureEnd::Natural;
        }
        if last_audio.elapsed() >= limits.stall {
            warn!("No audio from the microphone for {:?}", limits.stall);
            return CaptureEnd::Failed;
        }

        let elapsed = started.elapsed().as_secs_f32();
        if !utterance.heard_speech && elapsed >= limits.listen_timeout {
            debug!("No speech before timeout");
            return CaptureEnd::Natural;
        }
        if utterance.heard_speech && elapsed >= limits.session_bound() {
            debug!("Session hit its wall-clock bound");
            return CaptureEnd::Natural;
        }
    }
}

/// Audio of the current utterance and its end-pointing counters
#[derive(Default)]
struct Utterance {
    samples: Vec<f32>,
    heard_speech: bool,
    trailing_silence: f32,
}

impl Utterance {
    /// Frames before the first speech frame are dropped
    fn push_frame(&mut self, frame: &[f32], is_speech: bool) {
        if is_speech {
            self.heard_speech = true;
            self.trailing_silence = 0.0;
        } else if self.heard_speech {
            self.trailing_silence += FRAME_SECONDS;
        }

        if self.heard_speech {
            self.samples.extend_from_slice(frame);
        }
    }

    fn duration(&self) -> f32 {
        self.samples.len() as f32 / SPEECH_SAMPLE_RATE as f32
    }
}
