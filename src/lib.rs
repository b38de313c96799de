// SPDX-License-Identifier: MPL-2.0

//! sinewave - animated sine wave renderer and ffmpeg doctor
//!
//! This library renders an animated sine wave frame by frame with plotters
//! and streams the frames into an ffmpeg subprocess that writes an MP4 file.
//! It also inspects the ffmpeg installation for troubleshooting.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`plot`]: Curve sampling and frame rasterization
//! - [`media`]: ffmpeg detection and encoder selection
//! - [`pipelines`]: Animation frame loop and the ffmpeg recorder
//! - [`diagnostics`]: Encoder installation report
//! - [`config`]: Render settings
//! - [`storage`]: Output path handling
//!
//! # Example
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//!
//! let config = sinewave::Config::default();
//! let stop = AtomicBool::new(false);
//! let path = sinewave::pipelines::create_sine_wave_animation(&config, &stop, |_| {})?;
//! println!("Saved {}", path.display());
//! # Ok::<(), sinewave::AppError>(())
//! ```

pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod errors;
pub mod media;
pub mod pipelines;
pub mod plot;
pub mod storage;

// Re-export commonly used types
pub use config::{Config, ConfigOverrides};
pub use diagnostics::DiagnosticsReport;
pub use errors::{AppError, AppResult, EncoderError, RenderError};
pub use media::encoders::VideoQuality;
