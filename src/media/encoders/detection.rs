// SPDX-License-Identifier: MPL-2.0

//! FFmpeg encoder detection
//!
//! This module locates the ffmpeg executable and asks it which encoders and
//! muxers its build provides.

use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Media type of an ffmpeg encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaKind {
    Video,
    Audio,
    Subtitle,
}

/// One line of `ffmpeg -encoders`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FfmpegEncoder {
    /// Media type
    pub kind: MediaKind,
    /// Encoder name as passed to `-c:v`
    pub name: String,
    /// Human readable description
    pub description: String,
}

/// Locate an executable
///
/// A name with a directory component is checked as given; a bare name is
/// searched for in every `PATH` entry.
pub fn resolve_binary(name: &Path) -> Option<PathBuf> {
    if name.components().count() > 1 {
        return is_executable(name).then(|| name.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    resolve_in(name.as_os_str(), std::env::split_paths(&path_var))
}

/// Search a list of directories for an executable
pub fn resolve_in(
    name: &OsStr,
    dirs: impl IntoIterator<Item = PathBuf>,
) -> Option<PathBuf> {
    for dir in dirs {
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Some(candidate);
        }

        if !std::env::consts::EXE_SUFFIX.is_empty() && candidate.extension().is_none() {
            let with_suffix = candidate.with_extension(std::env::consts::EXE_EXTENSION);
            if is_executable(&with_suffix) {
                return Some(with_suffix);
            }
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Check whether the encoder binary runs
///
/// Runs `<binary> -version`. Returns `false` when the executable cannot be
/// started (for example when it is not on `PATH`) or exits with an error.
pub fn is_encoder_available(binary: &Path) -> bool {
    let status = Command::new(binary)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) => {
            debug!(binary = %binary.display(), ?status, "Encoder version query finished");
            status.success()
        }
        Err(e) => {
            debug!(binary = %binary.display(), error = %e, "Encoder binary could not be started");
            false
        }
    }
}

/// Run a query command and capture stdout on success
fn run_query(binary: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        debug!(binary = %binary.display(), ?args, status = ?output.status, "Encoder query failed");
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Full `-version` output of the encoder binary
pub fn version_output(binary: &Path) -> Option<String> {
    run_query(binary, &["-version"])
}

/// Extract the version from `ffmpeg version 6.1.1 Copyright ...`
pub fn parse_version_line(text: &str) -> Option<String> {
    let first = text.lines().next()?;
    let mut words = first.split_whitespace();
    while let Some(word) = words.next() {
        if word == "version" {
            return words.next().map(str::to_string);
        }
    }
    None
}

/// Extract the `configuration:` line (build flags) from `-version` output
pub fn parse_configuration_line(text: &str) -> Option<String> {
    text.lines()
        .find_map(|line| line.trim().strip_prefix("configuration:"))
        .map(|flags| flags.trim().to_string())
}

/// Lines after the `---` separator of ffmpeg's capability listings
fn listing_body(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .skip_while(|line| !line.trim_start().starts_with("--"))
        .skip(1)
}

/// Parse `ffmpeg -hide_banner -encoders`
pub fn parse_encoder_list(text: &str) -> Vec<FfmpegEncoder> {
    listing_body(text)
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let flags = parts.next()?;
            let name = parts.next()?;
            let kind = match flags.chars().next()? {
                'V' => MediaKind::Video,
                'A' => MediaKind::Audio,
                'S' => MediaKind::Subtitle,
                _ => return None,
            };
            Some(FfmpegEncoder {
                kind,
                name: name.to_string(),
                description: parts.collect::<Vec<_>>().join(" "),
            })
        })
        .collect()
}

/// Parse `ffmpeg -hide_banner -muxers` into the muxer names
pub fn parse_muxer_list(text: &str) -> Vec<String> {
    listing_body(text)
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let flags = parts.next()?;
            let names = parts.next()?;
            flags.contains('E').then_some(names)
        })
        .flat_map(|names| names.split(',').map(str::to_string))
        .collect()
}

/// All encoders the ffmpeg build provides
pub fn list_ffmpeg_encoders(binary: &Path) -> Vec<FfmpegEncoder> {
    run_query(binary, &["-hide_banner", "-encoders"])
        .map(|text| parse_encoder_list(&text))
        .unwrap_or_default()
}

/// Check whether the ffmpeg build can write a container format
pub fn supports_muxer(binary: &Path, muxer: &str) -> bool {
    run_query(binary, &["-hide_banner", "-muxers"])
        .map(|text| parse_muxer_list(&text).iter().any(|name| name == muxer))
        .unwrap_or(false)
}

/// Detect all available video encoders
///
/// Returns the encoder names in the order ffmpeg lists them.
pub fn detect_video_encoders(binary: &Path) -> Vec<String> {
    let available: Vec<String> = list_ffmpeg_encoders(binary)
        .into_iter()
        .filter(|encoder| encoder.kind == MediaKind::Video)
        .map(|encoder| encoder.name)
        .collect();

    info!("Detected {} video encoders", available.len());
    available
}

/// Log the known encoders this build offers (for debugging)
pub fn log_available_encoders(binary: &Path) {
    info!(binary = %binary.display(), "=== FFmpeg Encoder Detection ===");

    for encoder in super::video::enumerate_video_encoders(binary) {
        info!("  ✓ {} ({})", encoder.display_name, encoder.ffmpeg_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENCODERS: &str = "\
Encoders:
 V..... = Video
 A..... = Audio
 ------
 V....D libx264              libx264 H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10 (codec h264)
 V....D mpeg4                MPEG-4 part 2
 A....D aac                  AAC (Advanced Audio Coding)
 S..... srt                  SubRip subtitle
";

    const MUXERS: &str = "\
File formats:
 D. = Demuxing supported
 .E = Muxing supported
 --
  E matroska        Matroska
  E mp4             MP4 (MPEG-4 Part 14)
 D  mpegts          MPEG-TS (MPEG-2 Transport Stream)
";

    #[test]
    fn test_missing_binary_is_unavailable() {
        assert!(!is_encoder_available(Path::new(
            "sinewave-test-no-such-encoder-binary"
        )));
    }

    #[test]
    fn test_parse_encoder_list() {
        let encoders = parse_encoder_list(ENCODERS);
        assert_eq!(encoders.len(), 4);
        assert_eq!(encoders[0].name, "libx264");
        assert_eq!(encoders[0].kind, MediaKind::Video);
        assert!(encoders[0].description.starts_with("libx264 H.264"));
        assert_eq!(encoders[2].kind, MediaKind::Audio);
        assert_eq!(encoders[3].kind, MediaKind::Subtitle);
    }

    #[test]
    fn test_parse_muxer_list_skips_demuxers() {
        let muxers = parse_muxer_list(MUXERS);
        assert_eq!(muxers, vec!["matroska".to_string(), "mp4".to_string()]);
    }

    #[test]
    fn test_parse_version_and_configuration() {
        let text = "ffmpeg version 6.1.1-3ubuntu5 Copyright (c) 2000-2023 the FFmpeg developers\n\
                    built with gcc 13\n\
                    configuration: --prefix=/usr --enable-libx264\n";
        assert_eq!(parse_version_line(text).as_deref(), Some("6.1.1-3ubuntu5"));
        assert_eq!(
            parse_configuration_line(text).as_deref(),
            Some("--prefix=/usr --enable-libx264")
        );
        assert_eq!(parse_version_line(""), None);
    }

    #[test]
    fn test_resolve_in_empty_search_path() {
        assert_eq!(resolve_in(OsStr::new("ffmpeg"), Vec::new()), None);
    }
}
