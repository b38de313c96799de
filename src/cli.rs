// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Rendering the animation to a video file
//! - Rendering a single still frame
//! - Inspecting the ffmpeg installation
//! - Listing the usable video encoders

use sinewave::constants::{animation, format_bitrate};
use sinewave::media::encoders::{is_encoder_available, log_available_encoders};
use sinewave::media::encoders::video::{ContainerFormat, enumerate_video_encoders};
use sinewave::pipelines::{Progress, create_sine_wave_animation};
use sinewave::storage::{display_path, with_default_extension};
use sinewave::{AppError, AppResult, Config, ConfigOverrides, DiagnosticsReport, EncoderError};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Render the animation and report the outcome on the console
pub fn create_animation(config_path: Option<PathBuf>, overrides: ConfigOverrides) -> AppResult<()> {
    println!("Starting sine wave animation creation...");

    let config = Config::load_or_default(config_path.as_deref())?.with_overrides(overrides);

    // Set up Ctrl+C handler
    let stop = Arc::new(AtomicBool::new(false));
    let stop_clone = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        stop_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| AppError::Other(format!("Cannot install interrupt handler: {}", e)))?;

    println!("Creating animation...");
    let target = with_default_extension(&config.output, ContainerFormat::MP4.extension());
    println!("Rendering and saving to {}...", target.display());

    let show_progress = std::io::stdout().is_terminal();
    let result = create_sine_wave_animation(&config, &stop, |progress| {
        if show_progress {
            print_progress(&progress);
        }
    });
    if show_progress {
        println!();
    }

    let path = result?;
    println!("Animation saved successfully to {}", path.display());
    println!("Animation completed successfully.");
    println!("Output saved to: {}", display_path(&path).display());

    Ok(())
}

fn print_progress(progress: &Progress) {
    print!(
        "\rFrame {}/{} ({:.0}%) t={:.1}s",
        progress.frame,
        progress.total,
        progress.percent(),
        progress.time
    );
    let _ = std::io::stdout().flush();
}

/// Render a single frame to PNG
pub fn render_still(
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
    time: f64,
    output: Option<PathBuf>,
) -> AppResult<()> {
    let config = Config::load_or_default(config_path.as_deref())?.with_overrides(overrides);
    let output = output.unwrap_or_else(|| PathBuf::from(animation::DEFAULT_STILL_OUTPUT));

    println!("Rendering frame at t={:.2}s...", time);
    let path = sinewave::pipelines::render_still(&config, time, &output)?;
    println!("Still frame saved: {}", display_path(&path).display());

    Ok(())
}

/// Print the encoder installation report
pub fn doctor(ffmpeg: Option<PathBuf>, json: bool, save: Option<PathBuf>) -> AppResult<()> {
    let binary = resolve_ffmpeg(ffmpeg);
    let report = DiagnosticsReport::collect(&binary);

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_markdown());
    }

    if let Some(path) = save {
        let saved = report.save(&path)?;
        eprintln!("Report saved: {}", display_path(&saved).display());
    }

    if report.is_healthy() {
        eprintln!(
            "Ready to render with {}",
            report.selected_encoder.as_deref().unwrap_or_default()
        );
    } else {
        eprintln!("FFmpeg is not ready to render MP4 video.");
    }

    Ok(())
}

/// List the known video encoders of the ffmpeg build, in selection order
pub fn list_encoders(ffmpeg: Option<PathBuf>) -> AppResult<()> {
    let binary = resolve_ffmpeg(ffmpeg);
    if !is_encoder_available(&binary) {
        return Err(EncoderError::NotFound(binary.display().to_string()).into());
    }

    log_available_encoders(&binary);
    let encoders = enumerate_video_encoders(&binary);
    if encoders.is_empty() {
        println!("No usable video encoders found.");
        return Ok(());
    }

    let config = Config::load_or_default(None).unwrap_or_default();
    println!("Available video encoders ({}):", binary.display());
    println!();
    for (index, encoder) in encoders.iter().enumerate() {
        let marker = if index == 0 { " (default)" } else { "" };
        println!("  [{}] {}{}", index, encoder.display_name, marker);
        println!(
            "      Encoder: {}  Codec: {:?}  {}",
            encoder.ffmpeg_name,
            encoder.codec,
            if encoder.is_hardware { "HW" } else { "SW" }
        );
    }
    println!();
    println!(
        "Bitrate at {}x{}: {}",
        config.width,
        config.height,
        format_bitrate(config.effective_bitrate_kbps())
    );

    Ok(())
}

/// ffmpeg binary from the flag, falling back to the config and environment
fn resolve_ffmpeg(ffmpeg: Option<PathBuf>) -> PathBuf {
    match ffmpeg {
        Some(path) => path,
        None => match Config::load_or_default(None) {
            Ok(config) => config.ffmpeg_binary(),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable config file");
                Config::default().ffmpeg_binary()
            }
        },
    }
}

/// Print an error with its troubleshooting hints
pub fn report_error(err: &AppError, failure_note: Option<&str>) {
    if matches!(err, AppError::Interrupted) {
        println!("\nProcess interrupted by user.");
        return;
    }

    if matches!(err, AppError::Other(_)) {
        tracing::error!(error = ?err, "Unexpected error");
    }
    println!("Error: {}", err);
    for hint in err.hints() {
        println!("{}", hint);
    }

    if let Some(note) = failure_note {
        println!("{}", note);
    }
}
