//! Barwave library - Audio-reactive bar visualization rendered offline

pub mod audio;
pub mod bars;
pub mod cli;
pub mod error;
pub mod params;
pub mod rendering;
pub mod scene;

pub use error::{BarwaveError, Result};
