//! CPU rasterizer for the bar scene and frame output.
//!
//! Scene coordinates are in units with the origin at the frame center and
//! y pointing up; the visible height is `RenderConfig::scene_height` units.

use std::fs;

use glam::Vec2;
use image::{Rgb, Rgba, RgbaImage};
use log::debug;

use crate::bars::{parse_hex_color, BarShape};
use crate::error::{BarwaveError, Result};
use crate::params::{RecordingConfig, RenderConfig};

/// Destination for rendered frames, called once per frame in order
pub trait FrameSink {
    fn submit(&mut self, frame_idx: usize, frame: &RgbaImage) -> Result<()>;

    /// Called after the last frame
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes `frames/frame_00000.png`, `frames/frame_00001.png`, ...
pub struct PngSequence {
    config: RecordingConfig,
    written: usize,
}

impl PngSequence {
    /// Create the frames directory and return a sink writing into it
    pub fn create(config: RecordingConfig) -> Result<Self> {
        fs::create_dir_all(config.frames_dir())?;
        Ok(Self { config, written: 0 })
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl FrameSink for PngSequence {
    fn submit(&mut self, frame_idx: usize, frame: &RgbaImage) -> Result<()> {
        frame.save(self.config.frame_path(frame_idx))?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        debug!(
            "{} frames saved under {}",
            self.written,
            self.config.frames_dir().display()
        );
        Ok(())
    }
}

/// RGBA frame buffer with a scene-to-pixel transform
pub struct Canvas {
    image: RgbaImage,
    background: Rgb<u8>,
    pixels_per_unit: f32,
    origin_px: Vec2,
}

impl Canvas {
    pub fn new(config: &RenderConfig) -> Result<Self> {
        config.validate().map_err(BarwaveError::InvalidConfig)?;
        let background =
            parse_hex_color(&config.background).map_err(BarwaveError::InvalidConfig)?;

        let mut canvas = Self {
            image: RgbaImage::new(config.frame_width, config.frame_height),
            background,
            pixels_per_unit: config.frame_height as f32 / config.scene_height,
            origin_px: Vec2::new(
                config.frame_width as f32 / 2.0,
                config.frame_height as f32 / 2.0,
            ),
        };
        canvas.clear();
        Ok(canvas)
    }

    /// Fill with the background color
    pub fn clear(&mut self) {
        let [r, g, b] = self.background.0;
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([r, g, b, 255]);
        }
    }

    /// Scene point → pixel coordinates (y flipped)
    pub fn to_pixel(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            self.origin_px.x + point.x * self.pixels_per_unit,
            self.origin_px.y - point.y * self.pixels_per_unit,
        )
    }

    /// Alpha-blend an axis-aligned rectangle given in scene units.
    ///
    /// Edge pixels are weighted by the fraction of their area the rectangle covers.
    pub fn fill_rect(&mut self, min: Vec2, max: Vec2, color: Rgb<u8>, opacity: f32) {
        if opacity <= 0.0 {
            return;
        }

        let a = self.to_pixel(Vec2::new(min.x, max.y));
        let b = self.to_pixel(Vec2::new(max.x, min.y));
        let (px_min, px_max) = (a.min(b), a.max(b));

        let (width, height) = self.image.dimensions();
        let x0 = px_min.x.floor().max(0.0) as u32;
        let y0 = px_min.y.floor().max(0.0) as u32;
        let x1 = (px_max.x.ceil().max(0.0) as u32).min(width);
        let y1 = (px_max.y.ceil().max(0.0) as u32).min(height);

        for y in y0..y1 {
            let cover_y = overlap(y as f32, px_min.y, px_max.y);
            if cover_y <= 0.0 {
                continue;
            }
            for x in x0..x1 {
                let coverage = overlap(x as f32, px_min.x, px_max.x) * cover_y;
                if coverage <= 0.0 {
                    continue;
                }
                let alpha = (opacity * coverage).min(1.0);
                let pixel = self.image.get_pixel_mut(x, y);
                for c in 0..3 {
                    let dst = pixel.0[c] as f32;
                    let src = color.0[c] as f32;
                    pixel.0[c] = (dst + (src - dst) * alpha).round() as u8;
                }
            }
        }
    }

    pub fn draw_bar(&mut self, shape: &BarShape) {
        let (min, max) = shape.bounds();
        self.fill_rect(min, max, shape.color, shape.opacity);
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Length of [start, end] inside the unit pixel span [p, p + 1]
fn overlap(p: f32, start: f32, end: f32) -> f32 {
    ((p + 1.0).min(end) - p.max(start)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> RenderConfig {
        RenderConfig {
            frame_width: 80,
            frame_height: 80,
            scene_height: 8.0, // 10 px per unit
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_clear_uses_background() {
        let canvas = Canvas::new(&small_config()).unwrap();
        assert!(canvas.image().pixels().all(|p| *p == Rgba([10, 10, 10, 255])));
    }

    #[test]
    fn test_to_pixel_centers_origin_and_flips_y() {
        let canvas = Canvas::new(&small_config()).unwrap();
        assert_eq!(canvas.to_pixel(Vec2::ZERO), Vec2::new(40.0, 40.0));
        assert_eq!(canvas.to_pixel(Vec2::new(1.0, 1.0)), Vec2::new(50.0, 30.0));
    }

    #[test]
    fn test_opaque_rect_fills_exact_pixels() {
        let mut canvas = Canvas::new(&small_config()).unwrap();
        // Scene (0,0)-(1,1) → pixels x 40..50, y 30..40
        canvas.fill_rect(Vec2::ZERO, Vec2::ONE, Rgb([200, 100, 50]), 1.0);

        let img = canvas.image();
        assert_eq!(*img.get_pixel(40, 30), Rgba([200, 100, 50, 255]));
        assert_eq!(*img.get_pixel(49, 39), Rgba([200, 100, 50, 255]));
        assert_eq!(*img.get_pixel(50, 39), Rgba([10, 10, 10, 255]));
        assert_eq!(*img.get_pixel(40, 40), Rgba([10, 10, 10, 255]));
    }

    #[test]
    fn test_partial_coverage_and_opacity_blend() {
        let mut canvas = Canvas::new(&small_config()).unwrap();
        // Half a pixel wide: x from 40.0 to 40.5 px
        canvas.fill_rect(Vec2::ZERO, Vec2::new(0.05, 1.0), Rgb([210, 210, 210]), 1.0);
        // 10 + (210 - 10) * 0.5 = 110
        assert_eq!(canvas.image().get_pixel(40, 35).0[0], 110);

        canvas.clear();
        canvas.fill_rect(Vec2::ZERO, Vec2::ONE, Rgb([110, 110, 110]), 0.9);
        // 10 + 100 * 0.9 = 100
        assert_eq!(canvas.image().get_pixel(45, 35).0[0], 100);
    }

    #[test]
    fn test_offscreen_rect_is_clipped() {
        let mut canvas = Canvas::new(&small_config()).unwrap();
        canvas.fill_rect(
            Vec2::new(-100.0, -100.0),
            Vec2::new(-50.0, -50.0),
            Rgb([255, 0, 0]),
            1.0,
        );
        assert!(canvas.image().pixels().all(|p| *p == Rgba([10, 10, 10, 255])));

        // Straddles the right edge
        canvas.fill_rect(Vec2::new(3.5, 0.0), Vec2::new(10.0, 1.0), Rgb([255, 0, 0]), 1.0);
        assert_eq!(*canvas.image().get_pixel(79, 35), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_bad_background_rejected() {
        let config = RenderConfig {
            background: "black".to_string(),
            ..small_config()
        };
        assert!(matches!(
            Canvas::new(&config),
            Err(BarwaveError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_png_sequence_writes_numbered_frames() {
        let dir = tempfile::tempdir().unwrap();
        let config = RecordingConfig::new(dir.path());
        let mut sink = PngSequence::create(config.clone()).unwrap();
        let canvas = Canvas::new(&small_config()).unwrap();

        sink.submit(0, canvas.image()).unwrap();
        sink.submit(1, canvas.image()).unwrap();
        sink.finish().unwrap();

        assert_eq!(sink.written(), 2);
        assert!(config.frame_path(0).exists());
        assert!(config.frame_path(1).exists());
        let reloaded = image::open(config.frame_path(1)).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (80, 80));
    }
}
