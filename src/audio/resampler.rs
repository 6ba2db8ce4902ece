use crate::{ParleyError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Frames handed to rubato per call
const CHUNK_FRAMES: usize = 1024;

/// Mono resampler for a live stream
///
/// Input arrives in arbitrary chunk sizes; only whole rubato chunks are
/// processed and the remainder waits for the next push, so no padding is
/// inserted mid-stream.
pub struct StreamResampler {
    resampler: Option<SincFixedIn<f32>>,
    pending: Vec<f32>,
}

impl StreamResampler {
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(ParleyError::ConfigError(
                "Sample rates must be greater than 0".into(),
            ));
        }

        let resampler = if input_rate == output_rate {
            None
        } else {
            let params = SincInterpolationParameters {
                sinc_len: 256,
                f_cutoff: 0.95,
                interpolation: SincInterpolationType::Linear,
                oversampling_factor: 256,
                window: WindowFunction::BlackmanHarris2,
            };

            let resampler = SincFixedIn::<f32>::new(
                output_rate as f64 / input_rate as f64,
                2.0,
                params,
                CHUNK_FRAMES,
                1,
            )
            .map_err(|e| ParleyError::RecognitionError(format!("Failed to create resampler: {}", e)))?;

            debug!("Created resampler: {} Hz -> {} Hz", input_rate, output_rate);
            Some(resampler)
        };

        Ok(Self {
            resampler,
            pending: Vec::with_capacity(CHUNK_FRAMES * 2),
        })
    }

    /// Feed samples; returns whatever output is ready
    pub fn push(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        let Some(resampler) = self.resampler.as_mut() else {
            return Ok(input.to_vec());
        };

        self.pending.extend_from_slice(input);

        let mut output = Vec::new();
        while self.pending.len() >= CHUNK_FRAMES {
            let wave_in = vec![self.pending.drain(..CHUNK_FRAMES).collect::<Vec<f32>>()];
            let processed = resampler
                .process(&wave_in, None)
                .map_err(|e| ParleyError::RecognitionError(format!("Resampling failed: {}", e)))?;
            output.extend_from_slice(&processed[0]);
        }

        Ok(output)
    }
}
