// SPDX-License-Identifier: MPL-2.0

//! Encoder installation report
//!
//! Collects what is needed to debug a failing render:
//! - Where the ffmpeg executable resolves and whether it runs
//! - Its version and build configuration
//! - Companion tools and the contents of its installation directory
//! - The video encoders it offers and the one that would be selected
//! - System information and the executable search path

use crate::config::Config;
use crate::errors::AppResult;
use crate::media::encoders::detection::{
    is_encoder_available, parse_configuration_line, parse_version_line, resolve_binary,
    supports_muxer, version_output,
};
use crate::media::encoders::video::{EncoderInfo, enumerate_video_encoders};
use crate::storage::timestamped_name;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Tools shipped alongside ffmpeg in most distributions
const COMPANION_TOOLS: [&str; 2] = ["ffprobe", "ffplay"];

/// Prefix of the installation directory entries listed in the report
const LISTED_ENTRY_PREFIX: &str = "ff";

/// Presence of a tool next to the encoder binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanionTool {
    pub name: String,
    pub present: bool,
}

/// What was found out about the encoder executable
#[derive(Debug, Clone, Serialize)]
pub struct EncoderInstallation {
    /// Binary as requested (name or path)
    pub requested: String,
    /// Where it resolved on disk
    pub resolved_path: Option<PathBuf>,
    /// Whether `-version` succeeds
    pub runs: bool,
    /// Version token
    pub version: Option<String>,
    /// Build configuration flags
    pub configuration: Option<String>,
    /// Directory holding the binary
    pub install_dir: Option<PathBuf>,
    /// Companion tools in the installation directory
    pub companions: Vec<CompanionTool>,
    /// `ff*` entries of the installation directory
    pub install_dir_contents: Vec<String>,
}

/// Full diagnostics report
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub generated: String,
    pub app_version: String,
    pub os: String,
    pub arch: String,
    pub config_file: Option<PathBuf>,
    pub config_file_exists: bool,
    pub search_path: Vec<PathBuf>,
    pub encoder: EncoderInstallation,
    pub video_encoders: Vec<EncoderInfo>,
    pub selected_encoder: Option<String>,
    pub mp4_muxer: bool,
}

impl DiagnosticsReport {
    /// Inspect the encoder binary and the environment
    pub fn collect(binary: &Path) -> Self {
        info!(binary = %binary.display(), "Collecting diagnostics");

        let encoder = inspect_encoder(binary);
        let (video_encoders, mp4_muxer) = if encoder.runs {
            (enumerate_video_encoders(binary), supports_muxer(binary, "mp4"))
        } else {
            (Vec::new(), false)
        };
        let selected_encoder = video_encoders.first().map(|e| e.ffmpeg_name.clone());

        let search_path = std::env::var_os("PATH")
            .map(|path| std::env::split_paths(&path).collect())
            .unwrap_or_default();

        let config_file = Config::default_path();
        let config_file_exists = config_file.as_deref().is_some_and(Path::is_file);

        Self {
            generated: chrono::Local::now().to_rfc3339(),
            app_version: env!("GIT_VERSION").to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            config_file,
            config_file_exists,
            search_path,
            encoder,
            video_encoders,
            selected_encoder,
            mp4_muxer,
        }
    }

    /// Whether everything needed to render is in place
    pub fn is_healthy(&self) -> bool {
        self.encoder.runs && self.selected_encoder.is_some() && self.mp4_muxer
    }

    /// Render as Markdown
    pub fn to_markdown(&self) -> String {
        let mut report = String::new();

        report.push_str("# sinewave Encoder Report\n\n");
        report.push_str(&format!("Generated: {}\n\n", self.generated));

        report.push_str("## Application Information\n\n");
        report.push_str(&format!("**Version:** {}\n", self.app_version));
        match &self.config_file {
            Some(path) => report.push_str(&format!(
                "**Config File:** {} ({})\n",
                path.display(),
                if self.config_file_exists {
                    "present"
                } else {
                    "not present"
                }
            )),
            None => report.push_str("**Config File:** no config directory\n"),
        }
        report.push('\n');

        report.push_str("## System Information\n\n");
        report.push_str(&format!("**OS:** {}\n", self.os));
        report.push_str(&format!("**Architecture:** {}\n\n", self.arch));

        report.push_str(&self.format_installation());
        report.push_str(&self.format_video_encoders());

        report.push_str("## Search Path\n\n");
        if self.search_path.is_empty() {
            report.push_str("**PATH is not set**\n\n");
        } else {
            for dir in &self.search_path {
                report.push_str(&format!("- {}\n", dir.display()));
            }
            report.push('\n');
        }

        report
    }

    fn format_installation(&self) -> String {
        let encoder = &self.encoder;
        let mut info = String::from("## FFmpeg Installation\n\n");

        info.push_str(&format!("- **Requested:** {}\n", encoder.requested));
        match &encoder.resolved_path {
            Some(path) => info.push_str(&format!("- **Found at:** {}\n", path.display())),
            None => info.push_str("- **Found at:** not found\n"),
        }
        info.push_str(&format!("- **Runs:** {}\n", encoder.runs));
        if let Some(version) = &encoder.version {
            info.push_str(&format!("- **Version:** {}\n", version));
        }
        if let Some(configuration) = &encoder.configuration {
            info.push_str(&format!("- **Configuration:** `{}`\n", configuration));
        }
        info.push_str(&format!("- **MP4 Muxer:** {}\n", self.mp4_muxer));
        for tool in &encoder.companions {
            info.push_str(&format!("- **{} present:** {}\n", tool.name, tool.present));
        }
        info.push('\n');

        if let Some(dir) = &encoder.install_dir {
            info.push_str(&format!("### Contents of {}\n\n", dir.display()));
            if encoder.install_dir_contents.is_empty() {
                info.push_str("**No ffmpeg entries**\n");
            }
            for entry in &encoder.install_dir_contents {
                info.push_str(&format!("  - {}\n", entry));
            }
            info.push('\n');
        }

        info
    }

    fn format_video_encoders(&self) -> String {
        let mut info = String::from("## Video Encoders\n\n");

        if self.video_encoders.is_empty() {
            info.push_str("**No video encoders detected**\n\n");
            return info;
        }

        for (idx, encoder) in self.video_encoders.iter().enumerate() {
            let selected = if self.selected_encoder.as_deref() == Some(encoder.ffmpeg_name.as_str()) {
                " ✓ **SELECTED**"
            } else {
                ""
            };
            info.push_str(&format!(
                "### {} - {}{}\n\n",
                idx + 1,
                encoder.display_name,
                selected
            ));
            info.push_str(&format!("- **Codec:** {:?}\n", encoder.codec));
            info.push_str(&format!("- **FFmpeg Encoder:** {}\n", encoder.ffmpeg_name));
            info.push_str(&format!(
                "- **Hardware Accelerated:** {}\n",
                encoder.is_hardware
            ));
            info.push_str(&format!("- **Priority:** {}\n", encoder.priority));
            info.push('\n');
        }

        info
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the Markdown report
    ///
    /// A directory path gets a timestamped file name inside it.
    pub fn save(&self, path: &Path) -> AppResult<PathBuf> {
        let path = if path.is_dir() {
            path.join(timestamped_name("sinewave-doctor", "md"))
        } else {
            crate::storage::prepare_output_path(path, "md")?
        };

        std::fs::write(&path, self.to_markdown())?;
        info!(path = %path.display(), "Diagnostics report saved");
        Ok(path)
    }
}

/// Locate, run and inspect the encoder binary
pub fn inspect_encoder(binary: &Path) -> EncoderInstallation {
    let resolved_path = resolve_binary(binary);
    let runs = is_encoder_available(binary);
    let version_text = if runs { version_output(binary) } else { None };

    let install_dir = resolved_path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf);
    let (companions, install_dir_contents) = install_dir
        .as_deref()
        .map(inspect_install_dir)
        .unwrap_or_default();

    EncoderInstallation {
        requested: binary.display().to_string(),
        resolved_path,
        runs,
        version: version_text.as_deref().and_then(parse_version_line),
        configuration: version_text.as_deref().and_then(parse_configuration_line),
        install_dir,
        companions,
        install_dir_contents,
    }
}

/// Check for companion tools and list the `ff*` entries of a directory
pub fn inspect_install_dir(dir: &Path) -> (Vec<CompanionTool>, Vec<String>) {
    let companions = COMPANION_TOOLS
        .iter()
        .map(|name| {
            let file = format!("{}{}", name, std::env::consts::EXE_SUFFIX);
            CompanionTool {
                name: name.to_string(),
                present: dir.join(file).is_file(),
            }
        })
        .collect();

    let mut contents: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(LISTED_ENTRY_PREFIX))
            .collect(),
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "Cannot list installation directory");
            Vec::new()
        }
    };
    contents.sort();

    (companions, contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_install_dir() {
        let dir = tempfile::tempdir().unwrap();
        let exe = |name: &str| format!("{}{}", name, std::env::consts::EXE_SUFFIX);
        std::fs::write(dir.path().join(exe("ffmpeg")), b"").unwrap();
        std::fs::write(dir.path().join(exe("ffprobe")), b"").unwrap();
        std::fs::write(dir.path().join("README"), b"").unwrap();

        let (companions, contents) = inspect_install_dir(dir.path());

        assert_eq!(
            companions,
            vec![
                CompanionTool {
                    name: "ffprobe".to_string(),
                    present: true
                },
                CompanionTool {
                    name: "ffplay".to_string(),
                    present: false
                },
            ]
        );
        assert_eq!(contents, vec![exe("ffmpeg"), exe("ffprobe")]);
    }

    #[test]
    fn test_missing_encoder_report() {
        let report = DiagnosticsReport::collect(Path::new("sinewave-test-no-such-encoder-binary"));

        assert!(!report.encoder.runs);
        assert!(report.encoder.resolved_path.is_none());
        assert!(report.video_encoders.is_empty());
        assert!(!report.is_healthy());

        let markdown = report.to_markdown();
        assert!(markdown.contains("## FFmpeg Installation"));
        assert!(markdown.contains("**Found at:** not found"));
        assert!(markdown.contains("**No video encoders detected**"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["encoder"]["runs"], false);
    }

    #[test]
    fn test_save_into_directory_uses_timestamped_name() {
        let dir = tempfile::tempdir().unwrap();
        let report = DiagnosticsReport::collect(Path::new("sinewave-test-no-such-encoder-binary"));

        let path = report.save(dir.path()).unwrap();

        assert_eq!(path.parent(), Some(dir.path()));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("sinewave-doctor-"));
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("# sinewave Encoder Report"));
    }
}
