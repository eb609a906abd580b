//! Rendering and recording configuration.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Frame width (pixels)
    pub frame_width: u32,

    /// Frame height (pixels)
    pub frame_height: u32,

    /// Frame rate (FPS); also the envelope resolution
    pub fps: u32,

    /// Visible scene height in scene units (width follows the aspect ratio)
    pub scene_height: f32,

    /// Background color as `#rrggbb`
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_width: 1280,
            frame_height: 720,
            fps: 60,
            scene_height: 8.0,
            background: "#0a0a0a".to_string(),
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.frame_width as f32 / self.frame_height as f32
    }

    /// Visible scene width in scene units
    pub fn scene_width(&self) -> f32 {
        self.scene_height * self.aspect_ratio()
    }

    /// Duration of one frame (seconds)
    pub fn frame_duration_secs(&self) -> f64 {
        1.0 / self.fps as f64
    }

    /// Validate configuration (non-zero sizes and rate)
    pub fn validate(&self) -> Result<(), String> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(format!(
                "Frame size must be non-zero, got {}x{}",
                self.frame_width, self.frame_height
            ));
        }
        if self.fps == 0 {
            return Err("Frame rate must be > 0".to_string());
        }
        if !(self.scene_height > 0.0) {
            return Err(format!(
                "Scene height must be > 0, got {}",
                self.scene_height
            ));
        }
        Ok(())
    }
}

/// Recording output configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Output directory for frames, audio and envelope dumps
    pub output_dir: PathBuf,

    /// Also write the decoded mono track next to the frames
    pub write_audio: bool,
}

impl RecordingConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            write_audio: true,
        }
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join("frames")
    }

    /// Path of a single numbered frame
    pub fn frame_path(&self, frame_num: usize) -> PathBuf {
        self.frames_dir().join(format!("frame_{:05}.png", frame_num))
    }

    /// Audio file path
    pub fn audio_path(&self) -> PathBuf {
        self.output_dir.join("audio.wav")
    }

    /// Envelope dump path
    pub fn envelope_path(&self) -> PathBuf {
        self.output_dir.join("envelope.txt")
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self::new("recording")
    }
}

/// Closing sequence timings. Fixed, not user-configurable.
pub mod epilogue {
    /// Bar count at which the erase animation switches to the long duration
    pub const LONG_UNWRITE_BAR_THRESHOLD: usize = 15;

    /// Erase duration for short rows (seconds)
    pub const SHORT_UNWRITE_SECS: f64 = 1.0;

    /// Erase duration for long rows (seconds)
    pub const LONG_UNWRITE_SECS: f64 = 2.0;

    /// Empty-frame hold after the erase (seconds)
    pub const HOLD_SECS: f64 = 1.0;

    /// Upper bound on the per-bar stagger, as a fraction of the erase duration
    pub const MAX_LAG_RATIO: f64 = 0.2;

    /// Erase duration for a row of `bar_count` bars
    pub fn unwrite_secs(bar_count: usize) -> f64 {
        if bar_count < LONG_UNWRITE_BAR_THRESHOLD {
            SHORT_UNWRITE_SECS
        } else {
            LONG_UNWRITE_SECS
        }
    }

    /// Stagger between consecutive bars: min(4 / (n + 1), 0.2)
    pub fn lag_ratio(bar_count: usize) -> f64 {
        (4.0 / (bar_count as f64 + 1.0)).min(MAX_LAG_RATIO)
    }

    /// Number of whole frames covering `secs` at `fps`
    pub fn frames_for(secs: f64, fps: u32) -> usize {
        (secs * fps as f64).round() as usize
    }
}
