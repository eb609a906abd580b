//! Per-frame RMS amplitude envelope.

use log::debug;

use super::AudioBuffer;
use crate::error::{BarwaveError, Result};

/// Number of output frames for a clip: round(duration * frame_rate)
pub fn total_frames(duration_secs: f64, frame_rate: u32) -> usize {
    (duration_secs * frame_rate as f64).round() as usize
}

/// Root-mean-square of a chunk. An empty chunk has zero loudness.
pub fn rms(chunk: &[f32]) -> f32 {
    if chunk.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = chunk.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / chunk.len() as f64).sqrt() as f32
}

/// Loudness per output frame, peak-normalized into [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeEnvelope {
    values: Vec<f32>,
    frame_rate: u32,
}

impl AmplitudeEnvelope {
    /// Reduce a decoded buffer to one RMS value per frame.
    ///
    /// The signal is split into `total_frames` equal chunks of
    /// `len / total_frames` samples; the remainder is dropped.
    pub fn from_buffer(buffer: &AudioBuffer, frame_rate: u32) -> Result<Self> {
        if frame_rate == 0 {
            return Err(BarwaveError::InvalidConfig(
                "Frame rate must be > 0".to_string(),
            ));
        }
        if buffer.is_empty() {
            return Err(BarwaveError::EmptyAudio);
        }

        let duration_secs = buffer.duration_secs();
        let frames = total_frames(duration_secs, frame_rate);
        if frames == 0 {
            return Err(BarwaveError::AudioTooShort {
                duration_secs,
                frame_rate,
            });
        }

        let samples = buffer.samples();
        let chunk_size = samples.len() / frames;

        let values = (0..frames)
            .map(|i| rms(&samples[i * chunk_size..(i + 1) * chunk_size]))
            .collect();

        let envelope = Self::from_raw(values, frame_rate);

        debug!(
            "Envelope: {} frames @ {} fps, {} samples per chunk, silent={}",
            envelope.len(),
            frame_rate,
            chunk_size,
            envelope.is_silent()
        );

        Ok(envelope)
    }

    /// Build from raw non-negative loudness values, peak-normalizing them
    pub fn from_raw(values: Vec<f32>, frame_rate: u32) -> Self {
        let mut envelope = Self { values, frame_rate };
        envelope.normalize();
        envelope
    }

    /// Divide by the maximum unless it is zero (silence stays all-zero)
    fn normalize(&mut self) {
        let peak = self.peak();
        if peak > 0.0 {
            for v in &mut self.values {
                *v /= peak;
            }
        }
    }

    pub fn peak(&self) -> f32 {
        self.values.iter().copied().fold(0.0, f32::max)
    }

    pub fn is_silent(&self) -> bool {
        self.peak() == 0.0
    }

    /// Amplitude for a frame (0 past the end)
    pub fn get(&self, frame_idx: usize) -> f32 {
        self.values.get(frame_idx).copied().unwrap_or(0.0)
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Length of the visualization in seconds
    pub fn duration_secs(&self) -> f64 {
        self.values.len() as f64 / self.frame_rate as f64
    }
}
