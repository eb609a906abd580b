//! Row geometry: where each bar sits and how it is drawn this frame.

use glam::Vec2;
use image::Rgb;

use super::{BarState, Palette};
use crate::params::BarConfig;

/// One bar ready to draw, in scene units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarShape {
    pub center_x: f32,
    /// Bottom edge, fixed for the whole run
    pub bottom_y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb<u8>,
    pub opacity: f32,
}

impl BarShape {
    /// Axis-aligned bounds as (min, max) corners
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let half_w = self.width / 2.0;
        (
            Vec2::new(self.center_x - half_w, self.bottom_y),
            Vec2::new(self.center_x + half_w, self.bottom_y + self.height),
        )
    }

    /// Partially erased copy: `progress` 0 = intact, 1 = gone.
    /// Shrinks toward the baseline while fading out.
    pub fn erased(&self, progress: f32) -> Self {
        let keep = 1.0 - progress.clamp(0.0, 1.0);
        Self {
            height: self.height * keep,
            opacity: self.opacity * keep,
            ..*self
        }
    }
}

/// Horizontal arrangement of the row, centered on x = 0
#[derive(Debug, Clone)]
pub struct BarLayout {
    centers_x: Vec<f32>,
    baseline_y: f32,
    bar_width: f32,
    min_height: f32,
    opacity: f32,
}

impl BarLayout {
    pub fn new(config: &BarConfig) -> Self {
        let left = -config.row_width() / 2.0 + config.bar_width / 2.0;
        let pitch = config.bar_width + config.bar_spacing;

        let centers_x = (0..config.bar_count)
            .map(|i| left + i as f32 * pitch)
            .collect();

        Self {
            centers_x,
            baseline_y: config.baseline_y,
            bar_width: config.bar_width,
            min_height: config.min_height,
            opacity: config.fill_opacity,
        }
    }

    pub fn bar_count(&self) -> usize {
        self.centers_x.len()
    }

    /// Shapes for the current heights (floored), colored from the palette
    pub fn shapes(&self, state: &BarState, palette: &Palette) -> Vec<BarShape> {
        self.centers_x
            .iter()
            .zip(state.display_heights(self.min_height))
            .enumerate()
            .map(|(i, (&center_x, height))| BarShape {
                center_x,
                bottom_y: self.baseline_y,
                width: self.bar_width,
                height,
                color: palette.color_for(i),
                opacity: self.opacity,
            })
            .collect()
    }
}
