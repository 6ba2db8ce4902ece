//! Desktop speech synthesizer: sherpa-rs VITS voices played through rodio
//!
//! A worker thread owns the model and the output stream (neither can cross
//! threads). Each utterance gets a fresh sink; cancelling stops the sink.

use super::playback::{SpeechSynthesizer, Utterance};
use crate::config::SpeechConfig;
use crate::{ParleyError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use sherpa_rs::tts::{VitsTts, VitsTtsConfig};
use std::path::Path;
use std::thread;
use tracing::{debug, error, info, warn};

enum SynthCommand {
    Speak(Utterance),
    Cancel,
    Shutdown,
}

/// VITS-backed [`SpeechSynthesizer`]
pub struct VitsSynthesizer {
    command_tx: Sender<SynthCommand>,
    failure_rx: Receiver<ParleyError>,
}

impl VitsSynthesizer {
    pub fn new(config: SpeechConfig) -> Result<Self> {
        for (what, path) in [("Model", &config.model_path), ("Tokens file", &config.tokens_path)] {
            if path.is_empty() || !Path::new(path).exists() {
                return Err(ParleyError::ModelLoadError(format!("{} not found: {}", what, path)));
            }
        }

        let (command_tx, command_rx) = unbounded();
        let (failure_tx, failure_rx) = unbounded();

        thread::Builder::new()
            .name("parley-tts".into())
            .spawn(move || run_worker(config, command_rx, failure_tx))?;

        Ok(Self {
            command_tx,
            failure_rx,
        })
    }

    fn send(&self, command: SynthCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| ParleyError::PlaybackError("speech worker stopped".into()))
    }
}

impl SpeechSynthesizer for VitsSynthesizer {
    fn speak(&mut self, utterance: Utterance) -> Result<()> {
        self.send(SynthCommand::Speak(utterance))
    }

    fn cancel(&mut self) {
        let _ = self.send(SynthCommand::Cancel);
    }

    fn take_failures(&mut self) -> Vec<ParleyError> {
        self.failure_rx.try_iter().collect()
    }
}

impl Drop for VitsSynthesizer {
    fn drop(&mut self) {
        let _ = self.send(SynthCommand::Shutdown);
    }
}

/// Output device, opened on first use
struct Output {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

fn run_worker(config: SpeechConfig, commands: Receiver<SynthCommand>, failures: Sender<ParleyError>) {
    info!("Loading VITS TTS model from: {}", config.model_path);

    let mut tts = VitsTts::new(VitsTtsConfig {
        model: config.model_path.clone(),
        tokens: config.tokens_path.clone(),
        lexicon: config.lexicon_path.clone().unwrap_or_default(),
        data_dir: config.data_dir.clone().unwrap_or_default(),
        length_scale: 1.0,
        noise_scale: 0.667,
        noise_scale_w: 0.8,
        ..Default::default()
    });

    info!("Speech worker ready");

    let mut output: Option<Output> = None;
    let mut current: Option<Sink> = None;

    loop {
        match commands.recv() {
            Ok(SynthCommand::Speak(utterance)) => {
                if let Some(sink) = current.take() {
                    sink.stop();
                }
                if utterance.text.trim().is_empty() {
                    continue;
                }

                // VITS has no pitch control; rate maps to speed
                let audio = match tts.create(&utterance.text, config.speaker_id, utterance.rate) {
                    Ok(audio) => audio,
                    Err(e) => {
                        warn!("Synthesis failed: {}", e);
                        let _ = failures.send(ParleyError::PlaybackError(format!("Synthesis failed: {}", e)));
                        continue;
                    }
                };
                if audio.samples.is_empty() {
                    continue;
                }

                if output.is_none() {
                    match OutputStream::try_default() {
                        Ok((stream, handle)) => {
                            output = Some(Output {
                                _stream: stream,
                                handle,
                            })
                        }
                        Err(e) => {
                            let _ = failures.send(ParleyError::AudioDeviceError(format!(
                                "Failed to open audio output: {}",
                                e
                            )));
                            continue;
                        }
                    }
                }
                let Some(out) = output.as_ref() else { continue };

                match Sink::try_new(&out.handle) {
                    Ok(sink) => {
                        debug!(
                            "Playing {} samples at {} Hz",
                            audio.samples.len(),
                            audio.sample_rate
                        );
                        sink.append(SamplesBuffer::new(1, audio.sample_rate as u32, audio.samples));
                        current = Some(sink);
                    }
                    Err(e) => {
                        let _ = failures.send(ParleyError::PlaybackError(format!(
                            "Failed to create audio sink: {}",
                            e
                        )));
                    }
                }
            }
            Ok(SynthCommand::Cancel) => {
                if let Some(sink) = current.take() {
                    debug!("Speech cancelled");
                    sink.stop();
                }
            }
            Ok(SynthCommand::Shutdown) => break,
            Err(e) => {
                error!("Command channel error: {}", e);
                break;
            }
        }
    }

    info!("Speech worker stopped");
}
