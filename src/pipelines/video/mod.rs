// SPDX-License-Identifier: MPL-2.0

//! Video recording pipeline with encoder selection
//!
//! This module provides a video recording pipeline that:
//! - Picks the best encoder the ffmpeg build provides (libx264 preferred)
//! - Streams raw RGB frames into an ffmpeg subprocess
//! - Reports encoder failures as typed errors

pub mod encoder_selection;
pub mod recorder;

// Re-export commonly used types
pub use encoder_selection::{EncoderConfig, SelectedVideoEncoder, select_encoder};
pub use recorder::{VideoRecorder, VideoRecorderConfig};

// Re-export encoder types for convenience
pub use crate::media::encoders::VideoQuality;
