//! Audio decoding and amplitude envelope extraction.
//!
//! The pipeline is one-way: file → mono [`AudioBuffer`] → per-frame
//! [`AmplitudeEnvelope`]. Nothing downstream feeds back into it.

mod decode;
mod envelope;
mod export;

use std::path::Path;

pub use decode::decode_file;
pub use envelope::{rms, total_frames, AmplitudeEnvelope};
pub use export::{write_envelope, write_mono_wav};

use crate::error::Result;

/// Decoded mono signal, normalized to [-1, 1]
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Wrap an already-mono signal. NaN and infinite samples become silence.
    pub fn new(mut samples: Vec<f32>, sample_rate: u32) -> Self {
        for s in &mut samples {
            *s = finite_or_zero(*s);
        }
        Self {
            samples,
            sample_rate,
        }
    }

    /// Downmix interleaved multi-channel samples by averaging each sample frame.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(interleaved: &[f32], channels: usize, sample_rate: u32) -> Self {
        if channels <= 1 {
            return Self::new(interleaved.to_vec(), sample_rate);
        }

        let samples = interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().copied().map(finite_or_zero).sum::<f32>() / channels as f32)
            .collect();

        Self::new(samples, sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds (0 for a zero sample rate)
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

fn finite_or_zero(sample: f32) -> f32 {
    if sample.is_finite() {
        sample
    } else {
        0.0
    }
}

/// Decode `path` and reduce it to one RMS value per frame at `frame_rate`
pub fn extract_envelope(path: impl AsRef<Path>, frame_rate: u32) -> Result<AmplitudeEnvelope> {
    let buffer = decode_file(path)?;
    AmplitudeEnvelope::from_buffer(&buffer, frame_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn write_wav_16bit(path: &Path, sample_rate: u32, samples: impl Iterator<Item = i16>) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_extract_silent_second() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("silence.wav");
        write_wav_16bit(&path, 44100, std::iter::repeat(0).take(44100));

        let envelope = extract_envelope(&path, 30).unwrap();

        assert_eq!(envelope.len(), 30);
        assert!(envelope.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_extract_constant_tone() {
        // Square wave at normalized amplitude 0.5 for 2 seconds
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples = (0..88200).map(|i| if i % 2 == 0 { 16384 } else { -16384 });
        write_wav_16bit(&path, 44100, samples);

        let envelope = extract_envelope(&path, 30).unwrap();

        assert_eq!(envelope.len(), 60);
        for &v in envelope.values() {
            assert_relative_eq!(v, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_non_finite_float_samples_do_not_poison_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nan.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 100,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..100 {
            let sample = match i {
                5 => f32::NAN,
                50 => f32::INFINITY,
                _ => 0.5,
            };
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();

        let envelope = extract_envelope(&path, 10).unwrap();

        assert_eq!(envelope.len(), 10);
        assert!(envelope.values().iter().all(|v| (0.0..=1.0).contains(v)));
        assert_relative_eq!(envelope.peak(), 1.0);
    }

    #[test]
    fn test_downmix_zeroes_non_finite_channel() {
        let interleaved = [f32::NAN, 0.5, 0.25, f32::NEG_INFINITY];
        let buffer = AudioBuffer::from_interleaved(&interleaved, 2, 10);
        assert_eq!(buffer.samples(), &[0.25, 0.125]);

        let mono = AudioBuffer::from_interleaved(&[f32::INFINITY, 0.5], 1, 10);
        assert_eq!(mono.samples(), &[0.0, 0.5]);
    }

    #[test]
    fn test_downmix_averages_channels() {
        let interleaved = [1.0, 0.0, -0.5, -0.5, 0.25, 0.75];
        let buffer = AudioBuffer::from_interleaved(&interleaved, 2, 10);

        assert_eq!(buffer.samples(), &[0.5, -0.5, 0.5]);
        assert_eq!(buffer.sample_rate(), 10);
    }

    #[test]
    fn test_downmix_drops_partial_frame() {
        let interleaved = [0.2, 0.4, 0.6];
        let buffer = AudioBuffer::from_interleaved(&interleaved, 2, 10);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_duration() {
        let buffer = AudioBuffer::new(vec![0.0; 22050], 44100);
        assert_eq!(buffer.duration_secs(), 0.5);
        assert_eq!(AudioBuffer::new(vec![0.0; 4], 0).duration_secs(), 0.0);
    }
}
