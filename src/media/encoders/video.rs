// SPDX-License-Identifier: MPL-2.0

//! Video encoder selection
//!
//! This module picks an ffmpeg video encoder for the animation based on:
//! - What the ffmpeg build provides (`ffmpeg -encoders`)
//! - A fixed priority table (libx264 first, MPEG-4 part 2 last)
//! - Configurable quality presets

use super::detection::{MediaKind, list_ffmpeg_encoders};
use crate::constants::encoding::{MAX_BITRATE_KBPS, MIN_BITRATE_KBPS};
use crate::errors::EncoderError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Video codec types in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VideoCodec {
    /// H.264 codec (best compatibility)
    H264,
    /// HEVC/H.265 codec (good compression)
    HEVC,
    /// MPEG-4 part 2 (last resort, always built into ffmpeg)
    MPEG4,
}

impl VideoCodec {
    /// Get the container format for this codec
    pub fn container_format(&self) -> ContainerFormat {
        ContainerFormat::MP4
    }

    /// Get the file extension for this codec's container
    pub fn file_extension(&self) -> &'static str {
        self.container_format().extension()
    }

    /// Extra output arguments the codec needs inside MP4
    pub fn output_args(&self) -> &'static [&'static str] {
        match self {
            // Apple players only accept the hvc1 sample entry
            VideoCodec::HEVC => &["-tag:v", "hvc1"],
            VideoCodec::H264 | VideoCodec::MPEG4 => &[],
        }
    }
}

/// Container formats for video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContainerFormat {
    /// MP4 container (good compatibility)
    MP4,
}

impl ContainerFormat {
    /// Get file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ContainerFormat::MP4 => "mp4",
        }
    }

    /// Get ffmpeg muxer name (`-f`)
    pub fn muxer_name(&self) -> &'static str {
        match self {
            ContainerFormat::MP4 => "mp4",
        }
    }
}

/// Video quality presets
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum VideoQuality {
    /// Low quality (high compression, smaller files)
    Low,
    /// Medium quality (balanced)
    Medium,
    /// High quality (low compression, larger files)
    #[default]
    High,
    /// Maximum quality (minimal compression)
    Maximum,
}

impl VideoQuality {
    /// All presets from lowest to highest quality
    pub const ALL: [VideoQuality; 4] = [
        VideoQuality::Low,
        VideoQuality::Medium,
        VideoQuality::High,
        VideoQuality::Maximum,
    ];

    /// Get display name for the preset
    pub fn display_name(&self) -> &'static str {
        match self {
            VideoQuality::Low => "Low",
            VideoQuality::Medium => "Medium",
            VideoQuality::High => "High",
            VideoQuality::Maximum => "Maximum",
        }
    }

    /// Get bitrate in kbps for given quality
    ///
    /// Bitrate scales with the pixel count:
    /// 1080p (2M pixels): Low ~4Mbps, Med ~8Mbps, High ~12Mbps, Max ~20Mbps
    pub fn bitrate_kbps(&self, width: u32, height: u32) -> u32 {
        let pixels = width as f64 * height as f64;
        let base_bitrate = match self {
            VideoQuality::Low => (pixels * 0.002) as u32,
            VideoQuality::Medium => (pixels * 0.004) as u32,
            VideoQuality::High => (pixels * 0.006) as u32,
            VideoQuality::Maximum => (pixels * 0.010) as u32,
        };
        base_bitrate.clamp(MIN_BITRATE_KBPS, MAX_BITRATE_KBPS)
    }

    /// Get x264/x265 preset name
    pub fn x264_preset(&self) -> &'static str {
        match self {
            VideoQuality::Low => "veryfast",
            VideoQuality::Medium => "fast",
            VideoQuality::High => "medium",
            VideoQuality::Maximum => "slow",
        }
    }
}

/// Information about an available encoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncoderInfo {
    /// ffmpeg encoder name (`-c:v`)
    pub ffmpeg_name: String,
    /// Display name for listings
    pub display_name: String,
    /// Codec type
    pub codec: VideoCodec,
    /// Whether this is hardware accelerated
    pub is_hardware: bool,
    /// Priority (lower = higher priority)
    pub priority: u32,
}

impl EncoderInfo {
    /// Whether the encoder understands `-preset <x264 preset>`
    pub fn accepts_x264_preset(&self) -> bool {
        matches!(self.ffmpeg_name.as_str(), "libx264" | "libx265")
    }
}

/// Known encoders: (ffmpeg name, display name, codec, hardware, priority)
///
/// Frames are produced in system memory as RGB, so encoders that take system
/// memory input directly come first. VA-API is left out: it needs an explicit
/// upload filter chain.
const ENCODER_SPECS: &[(&str, &str, VideoCodec, bool, u32)] = &[
    // Software H.264
    ("libx264", "x264 H.264 (SW)", VideoCodec::H264, false, 10),
    ("libopenh264", "OpenH264 H.264 (SW)", VideoCodec::H264, false, 11),
    // Hardware H.264
    ("h264_nvenc", "NVIDIA H.264 (HW)", VideoCodec::H264, true, 20),
    ("h264_qsv", "Intel QSV H.264 (HW)", VideoCodec::H264, true, 21),
    ("h264_amf", "AMD AMF H.264 (HW)", VideoCodec::H264, true, 22),
    ("h264_videotoolbox", "VideoToolbox H.264 (HW)", VideoCodec::H264, true, 23),
    // Software HEVC/H.265
    ("libx265", "x265 H.265 (SW)", VideoCodec::HEVC, false, 30),
    // Hardware HEVC/H.265
    ("hevc_nvenc", "NVIDIA H.265 (HW)", VideoCodec::HEVC, true, 40),
    ("hevc_videotoolbox", "VideoToolbox H.265 (HW)", VideoCodec::HEVC, true, 41),
    // Fallback
    ("mpeg4", "MPEG-4 Part 2 (SW)", VideoCodec::MPEG4, false, 90),
];

/// Look up a known encoder by its ffmpeg name
pub fn encoder_info_for(ffmpeg_name: &str) -> Option<EncoderInfo> {
    ENCODER_SPECS
        .iter()
        .find(|(name, ..)| *name == ffmpeg_name)
        .map(|(name, display_name, codec, is_hardware, priority)| EncoderInfo {
            ffmpeg_name: name.to_string(),
            display_name: display_name.to_string(),
            codec: *codec,
            is_hardware: *is_hardware,
            priority: *priority,
        })
}

/// Keep the known encoders present in `available`, sorted by priority
pub fn filter_known_encoders<S: AsRef<str>>(available: &[S]) -> Vec<EncoderInfo> {
    let mut encoders: Vec<EncoderInfo> = ENCODER_SPECS
        .iter()
        .filter(|(name, ..)| available.iter().any(|a| a.as_ref() == *name))
        .filter_map(|(name, ..)| encoder_info_for(name))
        .collect();

    // Sort by priority (lower number = higher priority)
    encoders.sort_by_key(|e| e.priority);
    encoders
}

/// Enumerate all available video encoders
///
/// Returns a list of available encoders sorted by priority
pub fn enumerate_video_encoders(binary: &Path) -> Vec<EncoderInfo> {
    let available: Vec<String> = list_ffmpeg_encoders(binary)
        .into_iter()
        .filter(|encoder| encoder.kind == MediaKind::Video)
        .map(|encoder| encoder.name)
        .collect();

    filter_known_encoders(&available)
}

/// Entry for an encoder outside the priority table
///
/// The codec only matters for the container tag, so anything not named
/// like an HEVC encoder is treated as H.264-compatible.
fn unlisted_encoder_info(ffmpeg_name: &str) -> EncoderInfo {
    let codec = if ffmpeg_name.starts_with("hevc") || ffmpeg_name.contains("x265") {
        VideoCodec::HEVC
    } else {
        VideoCodec::H264
    };

    EncoderInfo {
        ffmpeg_name: ffmpeg_name.to_string(),
        display_name: ffmpeg_name.to_string(),
        codec,
        is_hardware: false,
        priority: u32::MAX,
    }
}

/// Select the best video encoder from an enumerated list
///
/// `listed` holds every video encoder name the ffmpeg build reports and
/// `encoders` the known subset of it in priority order. A forced encoder name
/// must appear in `listed`, but need not be a known one. When the build
/// listing is empty (the query failed), the forced name is trusted and ffmpeg
/// itself reports a missing encoder at spawn time.
pub fn select_video_encoder<S: AsRef<str>>(
    encoders: &[EncoderInfo],
    listed: &[S],
    forced: Option<&str>,
) -> Result<EncoderInfo, EncoderError> {
    if let Some(name) = forced {
        if let Some(info) = encoders.iter().find(|e| e.ffmpeg_name == name) {
            info!(encoder = %name, "Using requested video encoder");
            return Ok(info.clone());
        }
        if listed.iter().any(|l| l.as_ref() == name) {
            info!(encoder = %name, "Using requested video encoder outside the priority table");
            return Ok(unlisted_encoder_info(name));
        }
        if !listed.is_empty() {
            return Err(EncoderError::Unsupported(name.to_string()));
        }
        debug!(encoder = %name, "Encoder listing unavailable, trusting requested encoder");
        return Ok(encoder_info_for(name).unwrap_or_else(|| unlisted_encoder_info(name)));
    }

    match encoders.first() {
        Some(info) => {
            info!(
                encoder = %info.ffmpeg_name,
                codec = ?info.codec,
                hardware = info.is_hardware,
                "Selected video encoder"
            );
            Ok(info.clone())
        }
        None => Err(EncoderError::NoUsableEncoder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_extensions() {
        assert_eq!(VideoCodec::H264.file_extension(), "mp4");
        assert_eq!(VideoCodec::HEVC.file_extension(), "mp4");
        assert_eq!(VideoCodec::MPEG4.file_extension(), "mp4");
    }

    #[test]
    fn test_quality_bitrates() {
        // 1920x1080 (Full HD)
        let low = VideoQuality::Low.bitrate_kbps(1920, 1080);
        let high = VideoQuality::High.bitrate_kbps(1920, 1080);
        assert!(low < high);
        assert!(low >= 500); // Minimum
        assert!(high <= 50000); // Maximum
    }

    #[test]
    fn test_small_frames_hit_minimum_bitrate() {
        assert_eq!(VideoQuality::Low.bitrate_kbps(160, 120), 500);
    }

    #[test]
    fn test_filter_known_encoders_orders_by_priority() {
        let available = ["mpeg4", "libx265", "libx264", "a64multi"];
        let encoders = filter_known_encoders(&available);
        let names: Vec<&str> = encoders.iter().map(|e| e.ffmpeg_name.as_str()).collect();
        assert_eq!(names, vec!["libx264", "libx265", "mpeg4"]);
    }

    #[test]
    fn test_select_prefers_first() {
        let listed = ["mpeg4", "libopenh264"];
        let encoders = filter_known_encoders(&listed);
        let selected = select_video_encoder(&encoders, &listed, None).unwrap();
        assert_eq!(selected.ffmpeg_name, "libopenh264");
    }

    #[test]
    fn test_forced_encoder_must_be_listed() {
        let listed = ["mpeg4"];
        let encoders = filter_known_encoders(&listed);
        assert_eq!(
            select_video_encoder(&encoders, &listed, Some("libx264")),
            Err(EncoderError::Unsupported("libx264".to_string()))
        );
        let nothing: [&str; 0] = [];
        let trusted = select_video_encoder(&[], &nothing, Some("libx264")).unwrap();
        assert_eq!(trusted.codec, VideoCodec::H264);
        assert_eq!(trusted.priority, 10);
    }

    #[test]
    fn test_forced_encoder_outside_table_is_accepted_when_listed() {
        let listed = ["libx264", "h264_v4l2m2m", "hevc_vaapi"];
        let encoders = filter_known_encoders(&listed);

        let v4l2 = select_video_encoder(&encoders, &listed, Some("h264_v4l2m2m")).unwrap();
        assert_eq!(v4l2.ffmpeg_name, "h264_v4l2m2m");
        assert_eq!(v4l2.codec, VideoCodec::H264);

        let vaapi = select_video_encoder(&encoders, &listed, Some("hevc_vaapi")).unwrap();
        assert_eq!(vaapi.codec, VideoCodec::HEVC);
    }

    #[test]
    fn test_no_encoders() {
        assert_eq!(
            select_video_encoder(&[], &["a64multi"], None),
            Err(EncoderError::NoUsableEncoder)
        );
    }

    #[test]
    fn test_hevc_gets_hvc1_tag() {
        assert_eq!(VideoCodec::HEVC.output_args(), &["-tag:v", "hvc1"]);
        assert!(VideoCodec::H264.output_args().is_empty());
    }
}
