//! Side outputs for muxing and inspection: mono WAV track and envelope dump.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use super::{AmplitudeEnvelope, AudioBuffer};
use crate::error::Result;
use crate::params::audio_constants::{full_scale, EXPORT_BITS_PER_SAMPLE};

/// Write the decoded mono signal as 16-bit PCM
pub fn write_mono_wav(buffer: &AudioBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: EXPORT_BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };

    let max = full_scale(EXPORT_BITS_PER_SAMPLE) - 1.0;
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in buffer.samples() {
        writer.write_sample((sample.clamp(-1.0, 1.0) * max).round() as i16)?;
    }
    writer.finalize()?;

    info!("Audio track written to {}", path.display());
    Ok(())
}

/// Write one envelope value per line
pub fn write_envelope(envelope: &AmplitudeEnvelope, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);
    for v in envelope.values() {
        writeln!(out, "{:.6}", v)?;
    }
    out.flush()?;

    info!(
        "Envelope ({} frames) written to {}",
        envelope.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::decode_file;
    use approx::assert_relative_eq;

    #[test]
    fn test_mono_wav_survives_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.wav");
        let buffer = AudioBuffer::new(vec![0.0, 0.5, -0.5, 1.0, -1.0], 8000);

        write_mono_wav(&buffer, &path).unwrap();
        let decoded = decode_file(&path).unwrap();

        assert_eq!(decoded.len(), 5);
        assert_eq!(decoded.sample_rate(), 8000);
        for (a, b) in decoded.samples().iter().zip(buffer.samples()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_envelope_dump_has_one_line_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("envelope.txt");
        let envelope = AmplitudeEnvelope::from_raw(vec![0.0, 0.25, 0.5], 30);

        write_envelope(&envelope, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines, vec!["0.000000", "0.500000", "1.000000"]);
    }
}
