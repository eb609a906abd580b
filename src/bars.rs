//! Audio-reactive bar row: amplitude → per-bar height mapping with smoothing.
//!
//! Per frame `f` and bar `i`:
//! - `amp = envelope[f] * sensitivity`
//! - `target = amp^0.8 * freq_factor(i, f) * max_height * (1 + bass_boost(amp))`
//! - `height = prev * smoothing + target * (1 - smoothing)`, drawn no lower than `min_height`

mod layout;
mod palette;

pub use layout::{BarLayout, BarShape};
pub use palette::{parse_hex_color, Palette};

use crate::params::BarConfig;

/// Exponent compressing loud frames so quiet passages still move the bars
const AMPLITUDE_EXPONENT: f32 = 0.8;

/// Amplitude-dependent extra gain, clamped to [0, 1]
pub fn bass_boost(amp: f32) -> f32 {
    (amp * 2.0).clamp(0.0, 1.0)
}

/// Deterministic pseudo-spectral shaping in [0.4, 1.0].
///
/// Not a frequency analysis: a travelling sine so a uniform amplitude
/// still produces a varied row.
pub fn freq_factor(bar_idx: usize, frame_idx: usize) -> f32 {
    let phase = bar_idx as f64 * 0.3 + frame_idx as f64 * 0.05;
    (phase.sin() * 0.3 + 0.7) as f32
}

/// Unsmoothed height a bar is pulled toward this frame
///
/// # Arguments
/// * `amp` - Envelope value already scaled by sensitivity
/// * `bar_idx` - Bar position in the row
/// * `frame_idx` - Output frame number
/// * `config` - Bar parameters (uses `max_height`)
pub fn target_height(amp: f32, bar_idx: usize, frame_idx: usize, config: &BarConfig) -> f32 {
    let amp = amp.max(0.0);
    amp.powf(AMPLITUDE_EXPONENT)
        * freq_factor(bar_idx, frame_idx)
        * config.max_height
        * (1.0 + bass_boost(amp))
}

/// Exponential moving average: convex combination of `prev` and `target`
pub fn smooth(prev: f32, target: f32, smoothing: f32) -> f32 {
    prev * smoothing + target * (1.0 - smoothing)
}

/// Smoothed heights of every bar after the most recent frame.
///
/// Passed into and returned from each update so no state hides in the render loop.
/// The stored values are unclamped; the floor is applied when drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct BarState {
    heights: Vec<f32>,
}

impl BarState {
    /// All bars start at the floor height
    pub fn new(config: &BarConfig) -> Self {
        Self {
            heights: vec![config.min_height; config.bar_count],
        }
    }

    /// Compute the next frame's heights from one envelope value
    pub fn advance(self, amplitude: f32, frame_idx: usize, config: &BarConfig) -> Self {
        let amp = amplitude * config.sensitivity;

        let heights = self
            .heights
            .into_iter()
            .enumerate()
            .map(|(i, prev)| {
                let target = target_height(amp, i, frame_idx, config);
                smooth(prev, target, config.smoothing)
            })
            .collect();

        Self { heights }
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Heights as drawn: never below `min_height`
    pub fn display_heights<'a>(&'a self, min_height: f32) -> impl Iterator<Item = f32> + 'a {
        self.heights.iter().map(move |&h| h.max(min_height))
    }
}
