//! Frame loop: envelope in, one rendered frame per envelope entry out,
//! followed by the fixed closing sequence.

use log::{debug, info};

use crate::audio::AmplitudeEnvelope;
use crate::bars::{BarLayout, BarShape, BarState, Palette};
use crate::error::{BarwaveError, Result};
use crate::params::{epilogue, BarConfig, RenderConfig};
use crate::rendering::{Canvas, FrameSink};

/// Frames between progress log lines
const PROGRESS_INTERVAL_FRAMES: usize = 300;

/// What a render produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    /// Frames driven by the envelope
    pub audio_frames: usize,
    /// Frames of the erase animation
    pub unwrite_frames: usize,
    /// Empty frames held at the end
    pub hold_frames: usize,
}

impl RenderSummary {
    pub fn total_frames(&self) -> usize {
        self.audio_frames + self.unwrite_frames + self.hold_frames
    }
}

/// Erase progress of one bar at overall progress `alpha` in [0, 1].
///
/// Bars go right to left, each starting `lag_ratio` of a bar-duration
/// after its right neighbour.
pub fn unwrite_progress(bar_idx: usize, bar_count: usize, alpha: f64) -> f32 {
    if bar_count == 0 {
        return 1.0;
    }
    let lag = epilogue::lag_ratio(bar_count);
    let order = (bar_count - 1 - bar_idx.min(bar_count - 1)) as f64;
    let full_length = (bar_count - 1) as f64 * lag + 1.0;
    let value = alpha.clamp(0.0, 1.0) * full_length;
    (value - order * lag).clamp(0.0, 1.0) as f32
}

/// Owns the bar row and the canvas for one run
pub struct Visualizer {
    bar_config: BarConfig,
    render_config: RenderConfig,
    layout: BarLayout,
    palette: Palette,
    canvas: Canvas,
}

impl Visualizer {
    /// Validate parameters and set up the row and canvas
    pub fn new(bar_config: BarConfig, render_config: RenderConfig) -> Result<Self> {
        bar_config.validate().map_err(BarwaveError::InvalidConfig)?;
        let canvas = Canvas::new(&render_config)?;
        let layout = BarLayout::new(&bar_config);

        let scene_width = render_config.scene_width();
        if bar_config.row_width() > scene_width {
            debug!(
                "Bar row ({:.2} units) is wider than the frame ({:.2} units) and will be clipped",
                bar_config.row_width(),
                scene_width
            );
        }

        Ok(Self {
            bar_config,
            render_config,
            layout,
            palette: Palette::default(),
            canvas,
        })
    }

    /// Render every envelope frame, then erase the bars and hold an empty frame.
    ///
    /// Frames are submitted strictly in increasing index order, each standing
    /// for `1 / fps` seconds.
    pub fn render<S: FrameSink>(
        &mut self,
        envelope: &AmplitudeEnvelope,
        sink: &mut S,
    ) -> Result<RenderSummary> {
        if envelope.frame_rate() != self.render_config.fps {
            return Err(BarwaveError::InvalidConfig(format!(
                "Envelope was extracted at {} fps but rendering runs at {} fps",
                envelope.frame_rate(),
                self.render_config.fps
            )));
        }

        info!(
            "Rendering {} frames ({:.2}s @ {} fps, {} bars)",
            envelope.len(),
            envelope.duration_secs(),
            self.render_config.fps,
            self.bar_config.bar_count
        );

        let mut frame_idx = 0;
        let mut state = BarState::new(&self.bar_config);

        for (f, &amplitude) in envelope.values().iter().enumerate() {
            state = state.advance(amplitude, f, &self.bar_config);
            let shapes = self.layout.shapes(&state, &self.palette);
            self.draw(&shapes);
            sink.submit(frame_idx, self.canvas.image())?;
            frame_idx += 1;

            if f % PROGRESS_INTERVAL_FRAMES == 0 {
                info!("Frame {}/{}", f + 1, envelope.len());
            }
        }
        let audio_frames = frame_idx;

        // Closing sequence: erase the row, then hold an empty frame
        let bar_count = self.layout.bar_count();
        let unwrite_frames =
            epilogue::frames_for(epilogue::unwrite_secs(bar_count), self.render_config.fps).max(1);
        let final_shapes = self.layout.shapes(&state, &self.palette);

        for k in 0..unwrite_frames {
            let alpha = (k + 1) as f64 / unwrite_frames as f64;
            let erased: Vec<BarShape> = final_shapes
                .iter()
                .enumerate()
                .map(|(i, shape)| shape.erased(unwrite_progress(i, bar_count, alpha)))
                .collect();
            self.draw(&erased);
            sink.submit(frame_idx, self.canvas.image())?;
            frame_idx += 1;
        }

        let hold_frames = epilogue::frames_for(epilogue::HOLD_SECS, self.render_config.fps);
        self.canvas.clear();
        for _ in 0..hold_frames {
            sink.submit(frame_idx, self.canvas.image())?;
            frame_idx += 1;
        }

        sink.finish()?;

        let summary = RenderSummary {
            audio_frames,
            unwrite_frames,
            hold_frames,
        };
        info!(
            "Done: {} frames, {:.2}s ({} audio, {} unwrite, {} hold)",
            summary.total_frames(),
            summary.total_frames() as f64 * self.render_config.frame_duration_secs(),
            summary.audio_frames,
            summary.unwrite_frames,
            summary.hold_frames
        );

        Ok(summary)
    }

    fn draw(&mut self, shapes: &[BarShape]) {
        self.canvas.clear();
        for shape in shapes {
            self.canvas.draw_bar(shape);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// Keeps every frame in memory
    #[derive(Default)]
    struct MemorySink {
        frames: Vec<(usize, RgbaImage)>,
        finished: bool,
    }

    impl FrameSink for MemorySink {
        fn submit(&mut self, frame_idx: usize, frame: &RgbaImage) -> Result<()> {
            self.frames.push((frame_idx, frame.clone()));
            Ok(())
        }

        fn finish(&mut self) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    fn small_render(fps: u32) -> RenderConfig {
        RenderConfig {
            frame_width: 160,
            frame_height: 90,
            fps,
            ..RenderConfig::default()
        }
    }

    fn background_only(img: &RgbaImage) -> bool {
        img.pixels().all(|p| *p == Rgba([10, 10, 10, 255]))
    }

    #[test]
    fn test_unwrite_progress_goes_right_to_left() {
        let n = 70;
        // Rightmost bar starts first
        assert!(unwrite_progress(n - 1, n, 0.1) > unwrite_progress(0, n, 0.1));
        assert_eq!(unwrite_progress(0, n, 0.0), 0.0);
        for i in 0..n {
            assert_eq!(unwrite_progress(i, n, 1.0), 1.0);
        }
    }

    #[test]
    fn test_frame_count_and_order() {
        let envelope = AmplitudeEnvelope::from_raw(vec![0.2, 0.8, 1.0, 0.4, 0.0], 10);
        let mut viz = Visualizer::new(BarConfig::default(), small_render(10)).unwrap();
        let mut sink = MemorySink::default();

        let summary = viz.render(&envelope, &mut sink).unwrap();

        // 70 bars => 2s erase, plus 1s hold, at 10 fps
        assert_eq!(summary.audio_frames, 5);
        assert_eq!(summary.unwrite_frames, 20);
        assert_eq!(summary.hold_frames, 10);
        assert_eq!(sink.frames.len(), summary.total_frames());
        assert!(sink.finished);
        for (expected, (idx, _)) in sink.frames.iter().enumerate() {
            assert_eq!(*idx, expected);
        }
    }

    #[test]
    fn test_bars_visible_then_erased() {
        let envelope = AmplitudeEnvelope::from_raw(vec![1.0; 3], 10);
        let mut viz = Visualizer::new(BarConfig::default(), small_render(10)).unwrap();
        let mut sink = MemorySink::default();
        let summary = viz.render(&envelope, &mut sink).unwrap();

        assert!(!background_only(&sink.frames[0].1));
        // Last erase frame and every hold frame are empty
        assert!(background_only(&sink.frames[summary.audio_frames + summary.unwrite_frames - 1].1));
        assert!(background_only(&sink.frames.last().unwrap().1));
    }

    #[test]
    fn test_short_row_uses_one_second_erase() {
        let bars = BarConfig {
            bar_count: 1,
            ..BarConfig::default()
        };
        let envelope = AmplitudeEnvelope::from_raw(vec![0.5; 4], 30);
        let mut viz = Visualizer::new(bars, small_render(30)).unwrap();
        let mut sink = MemorySink::default();

        let summary = viz.render(&envelope, &mut sink).unwrap();
        assert_eq!(summary.unwrite_frames, 30);
        assert_eq!(summary.hold_frames, 30);
    }

    #[test]
    fn test_silent_envelope_draws_floor_bars() {
        let envelope = AmplitudeEnvelope::from_raw(vec![0.0; 30], 30);
        let mut viz = Visualizer::new(BarConfig::default(), small_render(30)).unwrap();
        let mut sink = MemorySink::default();
        viz.render(&envelope, &mut sink).unwrap();

        // Floor height bars still show up at the baseline
        assert!(!background_only(&sink.frames[29].1));
    }

    #[test]
    fn test_frame_rate_mismatch_rejected() {
        let envelope = AmplitudeEnvelope::from_raw(vec![0.5; 4], 24);
        let mut viz = Visualizer::new(BarConfig::default(), small_render(30)).unwrap();
        let mut sink = MemorySink::default();
        assert!(matches!(
            viz.render(&envelope, &mut sink),
            Err(BarwaveError::InvalidConfig(_))
        ));
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn test_invalid_bar_config_rejected() {
        let bars = BarConfig {
            bar_count: 0,
            ..BarConfig::default()
        };
        assert!(Visualizer::new(bars, small_render(30)).is_err());
    }
}
