//! Barwave - audio-reactive bars, rendered frame by frame
//!
//! Decodes an audio file, reduces it to one loudness value per frame and
//! drives a row of bars with it, writing a numbered PNG sequence plus the
//! mono audio track for muxing.

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use barwave::audio::{self, AmplitudeEnvelope};
use barwave::cli::Args;
use barwave::rendering::PngSequence;
use barwave::scene::Visualizer;

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let bar_config = args.bar_config();
    let render_config = args.render_config();
    let recording = args.recording_config();

    // Fail on bad parameters before spending time decoding
    let mut visualizer =
        Visualizer::new(bar_config, render_config.clone()).context("Invalid settings")?;

    let buffer = audio::decode_file(&args.audio)
        .with_context(|| format!("Failed to load {}", args.audio.display()))?;
    let envelope = AmplitudeEnvelope::from_buffer(&buffer, render_config.fps)
        .context("Failed to extract amplitude envelope")?;

    fs::create_dir_all(&recording.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            recording.output_dir.display()
        )
    })?;

    if args.envelope_only {
        audio::write_envelope(&envelope, recording.envelope_path())?;
        return Ok(());
    }

    if recording.write_audio {
        audio::write_mono_wav(&buffer, recording.audio_path())?;
    }

    let mut sink = PngSequence::create(recording.clone())
        .context("Failed to create frames directory")?;
    visualizer.render(&envelope, &mut sink)?;

    info!(
        "Mux with: ffmpeg -framerate {} -i {}/frame_%05d.png{} -pix_fmt yuv420p out.mp4",
        render_config.fps,
        recording.frames_dir().display(),
        if recording.write_audio {
            format!(" -i {}", recording.audio_path().display())
        } else {
            String::new()
        }
    );

    Ok(())
}
