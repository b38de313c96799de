// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::animation::{
    DEFAULT_BITRATE_KBPS, DEFAULT_DURATION_SECS, DEFAULT_FPS, DEFAULT_OUTPUT, DEFAULT_SAMPLES,
    MAX_FPS,
};
use crate::constants::figure::{DEFAULT_HEIGHT, DEFAULT_WIDTH, MIN_EDGE};
use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_FFMPEG_BINARY, FFMPEG_ENV_VAR};
use crate::errors::{AppError, AppResult};
use crate::media::encoders::VideoQuality;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Render settings
///
/// Read from a JSON file; keys left out take their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output video path
    pub output: PathBuf,
    /// Animation length in seconds
    pub duration_secs: f64,
    /// Frames per second
    pub fps: u32,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Number of curve sample points
    pub samples: usize,
    /// Quality preset (bitrate when no explicit bitrate is set, encoder speed)
    pub video_quality: VideoQuality,
    /// Explicit video bitrate in kbps (takes precedence over the quality preset)
    pub bitrate_kbps: Option<u32>,
    /// Force an ffmpeg encoder by name (e.g. "libx264")
    pub encoder: Option<String>,
    /// ffmpeg executable (name on PATH or full path)
    pub ffmpeg_path: Option<PathBuf>,
    /// Draw title, axis labels, tick labels and grid
    pub annotations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            duration_secs: DEFAULT_DURATION_SECS,
            fps: DEFAULT_FPS,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            samples: DEFAULT_SAMPLES,
            video_quality: VideoQuality::default(),
            bitrate_kbps: Some(DEFAULT_BITRATE_KBPS),
            encoder: None,
            ffmpeg_path: None,
            annotations: true,
        }
    }
}

/// Values given on the command line, applied on top of the file config
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output: Option<PathBuf>,
    pub duration_secs: Option<f64>,
    pub fps: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub video_quality: Option<VideoQuality>,
    pub bitrate_kbps: Option<u32>,
    pub encoder: Option<String>,
    pub ffmpeg_path: Option<PathBuf>,
    pub annotations: Option<bool>,
}

impl Config {
    /// Default config file location (`<config_dir>/sinewave/config.json`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load a config file
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Load `explicit`, else the default config file if it exists, else defaults
    pub fn load_or_default(explicit: Option<&Path>) -> AppResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Apply command-line values
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(duration) = overrides.duration_secs {
            self.duration_secs = duration;
        }
        if let Some(fps) = overrides.fps {
            self.fps = fps;
        }
        if let Some(width) = overrides.width {
            self.width = width;
        }
        if let Some(height) = overrides.height {
            self.height = height;
        }
        if let Some(quality) = overrides.video_quality {
            self.video_quality = quality;
            // A preset chosen on the command line wins over the file/default bitrate
            if overrides.bitrate_kbps.is_none() {
                self.bitrate_kbps = None;
            }
        }
        if let Some(bitrate) = overrides.bitrate_kbps {
            self.bitrate_kbps = Some(bitrate);
        }
        if let Some(encoder) = overrides.encoder {
            self.encoder = Some(encoder);
        }
        if let Some(path) = overrides.ffmpeg_path {
            self.ffmpeg_path = Some(path);
        }
        if let Some(annotations) = overrides.annotations {
            self.annotations = annotations;
        }
        self
    }

    /// Check the settings before any work starts
    pub fn validate(&self) -> AppResult<()> {
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(AppError::Config(format!(
                "duration must be a positive number of seconds, got {}",
                self.duration_secs
            )));
        }

        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(AppError::Config(format!(
                "fps must be between 1 and {}, got {}",
                MAX_FPS, self.fps
            )));
        }

        for (name, edge) in [("width", self.width), ("height", self.height)] {
            if edge < MIN_EDGE {
                return Err(AppError::Config(format!(
                    "{} must be at least {} pixels, got {}",
                    name, MIN_EDGE, edge
                )));
            }
            // yuv420p subsamples chroma by two in both directions
            if edge % 2 != 0 {
                return Err(AppError::Config(format!(
                    "{} must be even, got {}",
                    name, edge
                )));
            }
        }

        if self.samples < 2 {
            return Err(AppError::Config(format!(
                "samples must be at least 2, got {}",
                self.samples
            )));
        }

        if self.bitrate_kbps == Some(0) {
            return Err(AppError::Config("bitrate must be positive".to_string()));
        }

        if self.output.as_os_str().is_empty() {
            return Err(AppError::Config("output path is empty".to_string()));
        }

        Ok(())
    }

    /// Number of frames in the animation
    pub fn frame_count(&self) -> u64 {
        ((self.duration_secs * self.fps as f64).round() as u64).max(1)
    }

    /// Presentation time of frame `index` in seconds
    pub fn frame_time(&self, index: u64) -> f64 {
        index as f64 / self.fps as f64
    }

    /// Effective video bitrate in kbps
    pub fn effective_bitrate_kbps(&self) -> u32 {
        self.bitrate_kbps
            .unwrap_or_else(|| self.video_quality.bitrate_kbps(self.width, self.height))
    }

    /// ffmpeg executable to run
    ///
    /// `SINEWAVE_FFMPEG` wins over `ffmpeg_path`, which wins over `ffmpeg` on PATH.
    pub fn ffmpeg_binary(&self) -> PathBuf {
        self.ffmpeg_binary_with(std::env::var_os(FFMPEG_ENV_VAR))
    }

    /// [`Config::ffmpeg_binary`] with the environment value passed in
    pub fn ffmpeg_binary_with(&self, env_override: Option<OsString>) -> PathBuf {
        env_override
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.ffmpeg_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FFMPEG_BINARY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_frame_count() {
        let config = Config::default();
        assert_eq!(config.frame_count(), 200);
        assert_eq!(config.frame_time(0), 0.0);
        assert_eq!(config.frame_time(20), 1.0);
    }

    #[test]
    fn test_frame_count_never_zero() {
        let config = Config {
            duration_secs: 0.01,
            fps: 1,
            ..Config::default()
        };
        assert_eq!(config.frame_count(), 1);
    }

    #[test]
    fn test_validate_rejects_odd_dimensions() {
        let config = Config {
            width: 801,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_edge_boundary() {
        let smallest = Config {
            width: MIN_EDGE,
            height: MIN_EDGE,
            ..Config::default()
        };
        assert!(smallest.validate().is_ok());

        let too_small = Config {
            width: MIN_EDGE - 2,
            ..smallest.clone()
        };
        assert!(matches!(too_small.validate(), Err(AppError::Config(_))));

        let too_short = Config {
            height: MIN_EDGE - 2,
            ..smallest
        };
        assert!(matches!(too_short.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_timing() {
        for (duration_secs, fps) in [(0.0, 20), (-1.0, 20), (f64::NAN, 20), (10.0, 0), (10.0, 1000)] {
            let config = Config {
                duration_secs,
                fps,
                ..Config::default()
            };
            assert!(config.validate().is_err(), "{} s @ {} fps", duration_secs, fps);
        }
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config: Config = serde_json::from_str(r#"{"fps": 30, "video_quality": "low"}"#).unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.video_quality, VideoQuality::Low);
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.bitrate_kbps, Some(DEFAULT_BITRATE_KBPS));
    }

    #[test]
    fn test_unknown_json_key_is_rejected() {
        assert!(serde_json::from_str::<Config>(r#"{"frames": 3}"#).is_err());
    }

    #[test]
    fn test_quality_override_drops_default_bitrate() {
        let config = Config::default().with_overrides(ConfigOverrides {
            video_quality: Some(VideoQuality::Low),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.bitrate_kbps, None);
        assert_eq!(
            config.effective_bitrate_kbps(),
            VideoQuality::Low.bitrate_kbps(DEFAULT_WIDTH, DEFAULT_HEIGHT)
        );

        let config = Config::default().with_overrides(ConfigOverrides {
            video_quality: Some(VideoQuality::Low),
            bitrate_kbps: Some(1200),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.effective_bitrate_kbps(), 1200);
    }

    #[test]
    fn test_ffmpeg_binary_precedence() {
        let config = Config {
            ffmpeg_path: Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")),
            ..Config::default()
        };
        assert_eq!(
            config.ffmpeg_binary_with(Some(OsString::from("/custom/ffmpeg"))),
            PathBuf::from("/custom/ffmpeg")
        );
        assert_eq!(
            config.ffmpeg_binary_with(Some(OsString::new())),
            PathBuf::from("/opt/ffmpeg/bin/ffmpeg")
        );
        assert_eq!(
            Config::default().ffmpeg_binary_with(None),
            PathBuf::from("ffmpeg")
        );
    }
}
