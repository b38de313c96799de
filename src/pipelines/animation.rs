// SPDX-License-Identifier: MPL-2.0

//! Sine wave animation pipeline
//!
//! Checks the encoder, prepares the output location, then renders every
//! frame and streams it into the video recorder.

use super::video::{EncoderConfig, VideoRecorder, VideoRecorderConfig, select_encoder};
use crate::config::Config;
use crate::constants::timing::FRAME_LOG_INTERVAL;
use crate::errors::{AppError, AppResult, EncoderError};
use crate::media::encoders::is_encoder_available;
use crate::plot::{Figure, SineWave, save_png};
use crate::storage::prepare_output_path;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Rendering progress, reported after each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Frames rendered so far
    pub frame: u64,
    /// Total frames
    pub total: u64,
    /// Presentation time of the last frame in seconds
    pub time: f64,
}

impl Progress {
    /// Completed share in percent
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.frame as f64 * 100.0 / self.total as f64
        }
    }
}

/// Render the animation and encode it to the configured output
///
/// Fails with [`EncoderError::NotFound`] before touching the filesystem when
/// the encoder does not run. Setting `stop` aborts between frames, deletes the
/// partial file and returns [`AppError::Interrupted`].
pub fn create_sine_wave_animation(
    config: &Config,
    stop: &AtomicBool,
    mut on_progress: impl FnMut(Progress),
) -> AppResult<PathBuf> {
    config.validate()?;

    let binary = config.ffmpeg_binary();
    if !is_encoder_available(&binary) {
        return Err(EncoderError::NotFound(binary.display().to_string()).into());
    }

    let encoder = select_encoder(&binary, &EncoderConfig::from(config))?;
    let output_path = prepare_output_path(&config.output, encoder.extension())?;

    let figure = Figure::new(config.width, config.height, config.samples, config.annotations);
    let total = config.frame_count();

    info!(
        frames = total,
        duration = config.duration_secs,
        fps = config.fps,
        output = %output_path.display(),
        "Creating animation"
    );

    let mut recorder = VideoRecorder::new(VideoRecorderConfig {
        binary: &binary,
        width: config.width,
        height: config.height,
        framerate: config.fps,
        output_path,
        encoder: &encoder,
    })?;

    let mut frame = vec![0u8; figure.frame_len()];

    for index in 0..total {
        if stop.load(Ordering::SeqCst) {
            info!(frame = index, "Stop requested");
            recorder.abort();
            return Err(AppError::Interrupted);
        }

        let t = config.frame_time(index);
        let phase = SineWave::phase_at(t, config.duration_secs);

        if let Err(e) = figure.render_into(t, phase, &mut frame) {
            recorder.abort();
            return Err(e.into());
        }
        recorder
            .push_frame(&frame)
            .map_err(|e| interrupted_or(stop, e))?;

        if index % FRAME_LOG_INTERVAL == 0 {
            debug!(frame = index, total, time = t, "Frame encoded");
        }

        on_progress(Progress {
            frame: index + 1,
            total,
            time: t,
        });
    }

    recorder.finish().map_err(|e| interrupted_or(stop, e))
}

/// An encoder failure after a stop request is the interruption itself
fn interrupted_or(stop: &AtomicBool, err: AppError) -> AppError {
    if stop.load(Ordering::SeqCst) {
        info!(error = %err, "Encoder stopped after interrupt");
        AppError::Interrupted
    } else {
        err
    }
}

/// Render a single frame at time `t` and save it as PNG
pub fn render_still(config: &Config, t: f64, path: &Path) -> AppResult<PathBuf> {
    config.validate()?;

    let path = prepare_output_path(path, "png")?;
    let figure = Figure::new(config.width, config.height, config.samples, config.annotations);
    let image = figure.render_image(t, SineWave::phase_at(t, config.duration_secs))?;
    save_png(&image, &path)?;

    info!(path = %path.display(), time = t, "Still frame rendered");
    Ok(path)
}
