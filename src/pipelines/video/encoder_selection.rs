// SPDX-License-Identifier: MPL-2.0

//! Encoder selection for the video recording pipeline
//!
//! This module turns the render settings into a concrete ffmpeg encoder and
//! the output arguments that configure it.

use crate::config::Config;
use crate::constants::encoding::{DEFAULT_VIDEO_ENCODER, OUTPUT_PIXEL_FORMAT};
use crate::errors::EncoderError;
use crate::media::encoders::detection::detect_video_encoders;
use crate::media::encoders::video::{
    ContainerFormat, EncoderInfo, VideoQuality, filter_known_encoders, select_video_encoder,
};
use std::path::Path;
use tracing::warn;

/// Configuration for encoder selection
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Video quality preset
    pub video_quality: VideoQuality,
    /// Video width (for bitrate calculation)
    pub width: u32,
    /// Video height (for bitrate calculation)
    pub height: u32,
    /// Optional bitrate override in kbps (takes precedence over quality preset)
    pub bitrate_override_kbps: Option<u32>,
    /// Optional ffmpeg encoder name (skips priority selection)
    pub encoder_override: Option<String>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        let config = Config::default();
        Self::from(&config)
    }
}

impl From<&Config> for EncoderConfig {
    fn from(config: &Config) -> Self {
        Self {
            video_quality: config.video_quality,
            width: config.width,
            height: config.height,
            bitrate_override_kbps: config.bitrate_kbps,
            encoder_override: config.encoder.clone(),
        }
    }
}

impl EncoderConfig {
    /// Effective bitrate in kbps
    pub fn bitrate_kbps(&self) -> u32 {
        self.bitrate_override_kbps
            .unwrap_or_else(|| self.video_quality.bitrate_kbps(self.width, self.height))
    }
}

/// Selected video encoder with configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedVideoEncoder {
    /// Encoder description
    pub info: EncoderInfo,
    /// Container format
    pub container: ContainerFormat,
    /// Target bitrate in kbps
    pub bitrate_kbps: u32,
    /// x264-style speed preset, for encoders that take one
    pub preset: Option<&'static str>,
}

impl SelectedVideoEncoder {
    /// File extension of the container
    pub fn extension(&self) -> &'static str {
        self.container.extension()
    }

    /// ffmpeg output options for this encoder (everything before the output path)
    pub fn output_args(&self) -> Vec<String> {
        let mut args = vec![
            "-c:v".to_string(),
            self.info.ffmpeg_name.clone(),
            "-b:v".to_string(),
            format!("{}k", self.bitrate_kbps),
        ];

        if let Some(preset) = self.preset {
            args.push("-preset".to_string());
            args.push(preset.to_string());
        }

        args.extend(self.info.codec.output_args().iter().map(|a| a.to_string()));

        args.extend([
            "-pix_fmt".to_string(),
            OUTPUT_PIXEL_FORMAT.to_string(),
            // Index at the front so playback can start before the file is fully read
            "-movflags".to_string(),
            "+faststart".to_string(),
            "-f".to_string(),
            self.container.muxer_name().to_string(),
        ]);

        args
    }
}

/// Select an encoder from the video encoder names an ffmpeg build lists
///
/// An empty `listed` means the build could not be queried; the requested
/// encoder (or libx264) is then used without checking.
pub fn select_encoder_from<S: AsRef<str>>(
    listed: &[S],
    config: &EncoderConfig,
) -> Result<SelectedVideoEncoder, EncoderError> {
    let encoders = filter_known_encoders(listed);
    let forced = match config.encoder_override.as_deref() {
        Some(name) => Some(name),
        None if listed.is_empty() => {
            warn!(
                encoder = DEFAULT_VIDEO_ENCODER,
                "Could not list ffmpeg encoders, falling back to default encoder"
            );
            Some(DEFAULT_VIDEO_ENCODER)
        }
        None => None,
    };

    let info = select_video_encoder(&encoders, listed, forced)?;
    let preset = info
        .accepts_x264_preset()
        .then(|| config.video_quality.x264_preset());

    Ok(SelectedVideoEncoder {
        container: info.codec.container_format(),
        bitrate_kbps: config.bitrate_kbps(),
        preset,
        info,
    })
}

/// Select the best available encoder of the ffmpeg build
pub fn select_encoder(
    binary: &Path,
    config: &EncoderConfig,
) -> Result<SelectedVideoEncoder, EncoderError> {
    select_encoder_from(&detect_video_encoders(binary), config)
}
