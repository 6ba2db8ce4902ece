use super::SPEECH_SAMPLE_RATE;
use crate::{ParleyError, Result};
use tracing::info;
use voice_activity_detector::VoiceActivityDetector as VadDetector;

/// Samples per VAD frame at 16 kHz (32 ms)
pub const VAD_FRAME: usize = 512;

/// Silero voice activity detection over fixed 16 kHz frames
pub struct VoiceActivityDetector {
    detector: VadDetector,
    threshold: f32,
}

impl VoiceActivityDetector {
    /// # Arguments
    /// * `threshold` - Probability threshold for speech detection (0.0-1.0)
    pub fn new(threshold: f32) -> Result<Self> {
        let detector = VadDetector::builder()
            .sample_rate(SPEECH_SAMPLE_RATE as i32)
            .chunk_size(VAD_FRAME)
            .build()
            .map_err(|e| ParleyError::RecognitionError(format!("Failed to create VAD: {:?}", e)))?;

        info!("Initialized VAD, threshold: {}", threshold);

        Ok(Self {
            detector,
            threshold: threshold.clamp(0.0, 1.0),
        })
    }

    /// Whether a frame of `VAD_FRAME` samples contains speech
    pub fn is_speech(&mut self, frame: &[f32]) -> bool {
        self.detector.predict(frame.iter().copied()) >= self.threshold
    }

    pub fn reset(&mut self) {
        self.detector.reset();
    }
}
