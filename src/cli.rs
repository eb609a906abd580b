//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{BarConfig, RecordingConfig, RenderConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "barwave")]
#[command(about = "Render an audio-reactive bar visualization to a PNG frame sequence", long_about = None)]
pub struct Args {
    /// Input audio file (wav, mp3, flac, ogg, aac, m4a)
    #[arg(value_name = "AUDIO")]
    pub audio: PathBuf,

    /// Output directory for frames/, audio.wav and envelope.txt
    #[arg(long, short, value_name = "DIR", default_value = "recording")]
    pub output: PathBuf,

    /// Frame rate (FPS)
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Frame width (pixels)
    #[arg(long, value_name = "PX", default_value_t = 1280)]
    pub width: u32,

    /// Frame height (pixels)
    #[arg(long, value_name = "PX", default_value_t = 720)]
    pub height: u32,

    /// Number of bars
    #[arg(long, default_value_t = 70)]
    pub bar_count: usize,

    /// Height retention between frames, 0-1 (higher = smoother)
    #[arg(long, default_value_t = 0.5)]
    pub smoothing: f32,

    /// How strongly bars react to loudness
    #[arg(long, default_value_t = 1.4)]
    pub sensitivity: f32,

    /// Bar width (scene units, frame is 8 units tall)
    #[arg(long, default_value_t = 0.15)]
    pub bar_width: f32,

    /// Nominal maximum bar height (scene units)
    #[arg(long, default_value_t = 3.7)]
    pub max_height: f32,

    /// Color drift speed (no visible effect with the fixed palette)
    #[arg(long, default_value_t = 2.5)]
    pub color_shift_speed: f32,

    /// Background color
    #[arg(long, value_name = "HEX", default_value = "#0a0a0a")]
    pub background: String,

    /// Only extract the envelope and write envelope.txt
    #[arg(long)]
    pub envelope_only: bool,

    /// Skip writing the mono audio track
    #[arg(long)]
    pub no_audio: bool,

    /// Debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Args {
    /// Bar parameters from flags; the rest keeps its defaults
    pub fn bar_config(&self) -> BarConfig {
        BarConfig {
            bar_count: self.bar_count,
            smoothing: self.smoothing,
            sensitivity: self.sensitivity,
            bar_width: self.bar_width,
            max_height: self.max_height,
            color_shift_speed: self.color_shift_speed,
            ..BarConfig::default()
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            frame_width: self.width,
            frame_height: self.height,
            fps: self.fps,
            background: self.background.clone(),
            ..RenderConfig::default()
        }
    }

    pub fn recording_config(&self) -> RecordingConfig {
        RecordingConfig {
            output_dir: self.output.clone(),
            write_audio: !self.no_audio,
        }
    }
}
