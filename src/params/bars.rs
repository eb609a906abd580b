//! Bar geometry and audio-reactive mapping parameters.

/// Fixed fill palette, indexed by `bar_index % 4` (purple, purple B, purple C, purple D)
pub const PALETTE_HEX: [&str; 4] = ["#9A72AC", "#B189C6", "#9A72AC", "#715582"];

/// Bar row parameters. Lengths are in scene units (the frame is 8 units tall).
#[derive(Debug, Clone)]
pub struct BarConfig {
    /// Number of bars in the row
    pub bar_count: usize,

    /// Retention of the previous frame's height (0 = no smoothing, 1 = frozen)
    pub smoothing: f32,

    /// Multiplier applied to the normalized envelope before mapping
    pub sensitivity: f32,

    /// Width of every bar (scene units)
    pub bar_width: f32,

    /// Nominal maximum height (scene units)
    /// Not a hard bound: bass boost can push a bar up to twice this value
    pub max_height: f32,

    /// Hue drift speed. Accepted for compatibility; the fixed palette wins.
    pub color_shift_speed: f32,

    /// Horizontal gap between neighbouring bars (scene units)
    pub bar_spacing: f32,

    /// Floor height so bars never collapse to a degenerate shape (scene units)
    pub min_height: f32,

    /// Y coordinate of the shared baseline bars grow up from (scene units)
    pub baseline_y: f32,

    /// Fill opacity in [0, 1]
    pub fill_opacity: f32,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            bar_count: 70,
            smoothing: 0.5,
            sensitivity: 1.4,
            bar_width: 0.15,
            max_height: 3.7,
            color_shift_speed: 2.5,
            bar_spacing: 0.05,
            min_height: 0.1,
            baseline_y: -3.05, // Row centered at y = -3 with the floor height
            fill_opacity: 0.9,
        }
    }
}

impl BarConfig {
    /// Total width of the row including gaps (scene units)
    pub fn row_width(&self) -> f32 {
        let n = self.bar_count as f32;
        n * self.bar_width + (n - 1.0).max(0.0) * self.bar_spacing
    }

    /// Validate configuration (positive lengths, smoothing in range, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if self.bar_count == 0 {
            return Err("Bar count must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(format!(
                "Smoothing must be within [0, 1], got {}",
                self.smoothing
            ));
        }
        if !(self.sensitivity > 0.0) {
            return Err(format!("Sensitivity must be > 0, got {}", self.sensitivity));
        }
        if !(self.bar_width > 0.0) {
            return Err(format!("Bar width must be > 0, got {}", self.bar_width));
        }
        if !(self.max_height > 0.0) {
            return Err(format!("Max height must be > 0, got {}", self.max_height));
        }
        if self.bar_spacing < 0.0 {
            return Err(format!("Bar spacing must be >= 0, got {}", self.bar_spacing));
        }
        if !(self.min_height > 0.0) {
            return Err(format!("Min height must be > 0, got {}", self.min_height));
        }
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(format!(
                "Fill opacity must be within [0, 1], got {}",
                self.fill_opacity
            ));
        }
        Ok(())
    }
}
