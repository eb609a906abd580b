//! Audio file decoding.
//!
//! WAV goes through hound so integer PCM is scaled by its exact bit depth.
//! Everything else (mp3, flac, ogg, aac, alac) goes through symphonia.

use std::fs::File;
use std::path::Path;

use log::{debug, info, warn};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::AudioBuffer;
use crate::error::{BarwaveError, Result};
use crate::params::audio_constants::{full_scale, SUPPORTED_EXTENSIONS};

/// Decode an audio file into a mono, normalized buffer
pub fn decode_file(path: impl AsRef<Path>) -> Result<AudioBuffer> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let buffer = match extension.as_deref() {
        Some("wav") | Some("wave") => match decode_wav(path) {
            Err(BarwaveError::UnsupportedFormat(reason)) => {
                debug!("hound cannot read {}: {}, trying symphonia", path.display(), reason);
                decode_with_symphonia(path)?
            }
            other => other?,
        },
        Some(ext) if !SUPPORTED_EXTENSIONS.contains(&ext) => {
            warn!("Unrecognized extension '{}', probing content", ext);
            decode_with_symphonia(path)?
        }
        _ => decode_with_symphonia(path)?,
    };

    info!(
        "Decoded {}: {} mono samples @ {}Hz ({:.2}s)",
        path.display(),
        buffer.len(),
        buffer.sample_rate(),
        buffer.duration_secs()
    );

    Ok(buffer)
}

fn decode_error(path: &Path, reason: impl ToString) -> BarwaveError {
    BarwaveError::Decode {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn decode_wav(path: &Path) -> Result<AudioBuffer> {
    let reader = hound::WavReader::open(path).map_err(|e| match e {
        hound::Error::Unsupported => BarwaveError::UnsupportedFormat("wav sub-format".to_string()),
        other => decode_error(path, other),
    })?;
    let spec = reader.spec();

    debug!(
        "WAV: {} channel(s), {} bits, {:?}",
        spec.channels, spec.bits_per_sample, spec.sample_format
    );

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let scale = full_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| decode_error(path, e))?
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| decode_error(path, e))?,
    };

    Ok(AudioBuffer::from_interleaved(
        &interleaved,
        spec.channels as usize,
        spec.sample_rate,
    ))
}

fn decode_with_symphonia(path: &Path) -> Result<AudioBuffer> {
    let file = File::open(path).map_err(|e| decode_error(path, e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| match e {
            SymphoniaError::Unsupported(what) => BarwaveError::UnsupportedFormat(what.to_string()),
            other => decode_error(path, other),
        })?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| BarwaveError::UnsupportedFormat("no decodable audio track".to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| decode_error(path, "unknown sample rate"))?;
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| match e {
            SymphoniaError::Unsupported(what) => BarwaveError::UnsupportedFormat(what.to_string()),
            other => decode_error(path, other),
        })?;

    let mut interleaved = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(decode_error(path, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                channels = spec.channels.count();
                // Sample conversion scales integer formats by their full-scale value
                let mut samples = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                samples.copy_interleaved_ref(decoded);
                interleaved.extend_from_slice(samples.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("Skipping corrupt packet: {}", e);
            }
            Err(e) => return Err(decode_error(path, e)),
        }
    }

    Ok(AudioBuffer::from_interleaved(
        &interleaved,
        channels,
        sample_rate,
    ))
}
