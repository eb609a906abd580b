//! Fixed cyclic fill palette.

use image::Rgb;

use crate::params::PALETTE_HEX;

/// Parse `#rrggbb` (leading `#` optional)
pub fn parse_hex_color(hex: &str) -> Result<Rgb<u8>, String> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(format!("Expected a #rrggbb color, got '{}'", hex));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| format!("Invalid hex digits in color '{}'", hex))
    };

    Ok(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}

/// Bar colors cycling by bar index
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<Rgb<u8>>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb<u8>>) -> Result<Self, String> {
        if colors.is_empty() {
            return Err("Palette needs at least one color".to_string());
        }
        Ok(Self { colors })
    }

    /// Color of bar `bar_idx`
    pub fn color_for(&self, bar_idx: usize) -> Rgb<u8> {
        self.colors[bar_idx % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }
}

impl Default for Palette {
    fn default() -> Self {
        let colors = PALETTE_HEX
            .iter()
            .filter_map(|hex| parse_hex_color(hex).ok())
            .collect();
        Self { colors }
    }
}
