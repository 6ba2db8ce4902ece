use crate::{ParleyError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info};

/// What the microphone stream delivers
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mono samples at the device rate
    Chunk(Vec<f32>),
    /// The device reported an error; no more chunks should be expected
    Failed(String),
}

/// Default microphone, delivering mono f32 chunks at the device sample rate
pub struct AudioInput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    streaming: Arc<Mutex<bool>>,
}

impl AudioInput {
    /// Open the default input device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| ParleyError::AudioDeviceError("No input device available".into()))?;

        info!("Using input device: {}", device.name().unwrap_or_else(|_| "Unknown".to_string()));

        let config = device
            .default_input_config()
            .map_err(|e| ParleyError::AudioDeviceError(format!("Failed to get input config: {}", e)))?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
            streaming: Arc::new(Mutex::new(false)),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Start streaming mono chunks into `audio_tx`. Stream errors arrive on
    /// the same channel as [`InputEvent::Failed`].
    pub fn start_recording(&mut self, audio_tx: Sender<InputEvent>) -> Result<()> {
        if *self.streaming.lock() {
            return Ok(());
        }

        let channels = self.config.channels as usize;
        let streaming = Arc::clone(&self.streaming);

        let error_tx = audio_tx.clone();
        let err_fn = move |err: cpal::StreamError| {
            error!("Audio input stream error: {}", err);
            if error_tx.try_send(InputEvent::Failed(err.to_string())).is_err() {
                debug!("Stream error not delivered; the session will see the stall");
            }
        };

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !*streaming.lock() {
                        return;
                    }

                    let samples = if channels == 1 {
                        data.to_vec()
                    } else {
                        data.chunks(channels)
                            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                            .collect()
                    };

                    if let Err(e) = audio_tx.try_send(InputEvent::Chunk(samples)) {
                        debug!("Dropped microphone chunk: {}", e);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| ParleyError::AudioDeviceError(format!("Failed to build input stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| ParleyError::AudioDeviceError(format!("Failed to start input stream: {}", e)))?;

        *self.streaming.lock() = true;
        self.stream = Some(stream);

        debug!("Microphone open at {} Hz", self.sample_rate());
        Ok(())
    }

    pub fn stop_recording(&mut self) {
        *self.streaming.lock() = false;
        if self.stream.take().is_some() {
            debug!("Microphone closed");
        }
    }
}

impl Drop for AudioInput {
    fn drop(&mut self) {
        self.stop_recording();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn test_start_and_stop_recording() {
        // No input device in CI; only exercise the stream when one exists
        if let Ok(mut input) = AudioInput::new() {
            assert!(input.sample_rate() > 0);

            let (tx, rx) = bounded(10);
            if input.start_recording(tx.clone()).is_ok() {
                // A second start keeps the running stream
                assert!(input.start_recording(tx).is_ok());
                input.stop_recording();
                input.stop_recording();
                while let Ok(event) = rx.try_recv() {
                    assert!(matches!(event, InputEvent::Chunk(_) | InputEvent::Failed(_)));
                }
            }
        }
    }
}
