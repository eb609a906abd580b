//! Error types shared by the extraction and rendering stages.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while turning an audio file into rendered frames.
#[derive(Debug, Error)]
pub enum BarwaveError {
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Audio contains no samples")]
    EmptyAudio,

    #[error("Audio too short: {duration_secs:.4}s yields no frames at {frame_rate} fps")]
    AudioTooShort { duration_secs: f64, frame_rate: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, BarwaveError>;
