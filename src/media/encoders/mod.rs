// SPDX-License-Identifier: MPL-2.0

//! Media encoder selection and configuration
//!
//! This module provides centralized encoder handling with:
//! - ffmpeg binary lookup and availability checks
//! - Software encoder priority with hardware and MPEG-4 fallbacks
//! - Quality presets for easy configuration

pub mod detection;
pub mod video;

// Re-export commonly used types
pub use video::{EncoderInfo, VideoQuality};

pub use detection::{is_encoder_available, log_available_encoders, resolve_binary};
