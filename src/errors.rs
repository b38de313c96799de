// SPDX-License-Identifier: MPL-2.0

//! Error types for the renderer and the encoder doctor

use std::fmt;
use std::path::{Path, PathBuf};

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Encoder-related errors
    Encoder(EncoderError),
    /// Frame rendering errors
    Render(RenderError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Output location is not writable
    PermissionDenied(PathBuf),
    /// Stopped by the user (Ctrl+C)
    Interrupted,
    /// Generic error with message
    Other(String),
}

/// Encoder-specific errors
#[derive(Debug, Clone, PartialEq)]
pub enum EncoderError {
    /// Encoder binary could not be found or does not run
    NotFound(String),
    /// Encoder process could not be started
    SpawnFailed(String),
    /// The ffmpeg build does not provide the requested encoder
    Unsupported(String),
    /// None of the known video encoders is available
    NoUsableEncoder,
    /// Encoder exited with an error
    Failed {
        /// Exit code, if the process was not killed by a signal
        status: Option<i32>,
        /// Trailing stderr lines
        details: String,
    },
}

/// Frame rendering errors
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Plotting backend failed
    Draw(String),
    /// Frame buffer does not match the configured size
    FrameSize { expected: usize, actual: usize },
    /// Saving a still image failed
    Save(String),
}

impl AppError {
    /// Guidance lines printed after the error message
    pub fn hints(&self) -> Vec<String> {
        match self {
            AppError::Encoder(EncoderError::NotFound(_)) => vec![
                "Please install FFmpeg and make sure it's in your PATH.".to_string(),
                format!(
                    "Or point {} at the ffmpeg executable.",
                    crate::constants::FFMPEG_ENV_VAR
                ),
            ],
            AppError::Encoder(EncoderError::Failed { .. }) => {
                vec!["Check if FFmpeg installation is correct.".to_string()]
            }
            AppError::Encoder(EncoderError::Unsupported(_) | EncoderError::NoUsableEncoder) => {
                vec!["Run `sinewave encoders` to see what this ffmpeg build offers.".to_string()]
            }
            AppError::PermissionDenied(_) => vec![
                "Try running with administrator privileges or choose a different output location."
                    .to_string(),
            ],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Encoder(e) => write!(f, "Encoder error: {}", e),
            AppError::Render(e) => write!(f, "Render error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::PermissionDenied(path) => {
                write!(f, "Permission error when writing to {}", path.display())
            }
            AppError::Interrupted => write!(f, "Process interrupted by user"),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for EncoderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncoderError::NotFound(binary) => {
                write!(f, "FFmpeg ({}) is not found in your system PATH", binary)
            }
            EncoderError::SpawnFailed(msg) => write!(f, "Failed to start FFmpeg: {}", msg),
            EncoderError::Unsupported(name) => {
                write!(f, "FFmpeg build does not provide encoder '{}'", name)
            }
            EncoderError::NoUsableEncoder => write!(f, "No usable video encoder found"),
            EncoderError::Failed { status, details } => {
                match status {
                    Some(code) => write!(f, "FFmpeg exited with status {}", code)?,
                    None => write!(f, "FFmpeg was terminated")?,
                }
                if !details.is_empty() {
                    write!(f, ": {}", details)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Draw(msg) => write!(f, "Drawing failed: {}", msg),
            RenderError::FrameSize { expected, actual } => write!(
                f,
                "Frame is {} bytes, expected {} bytes",
                actual, expected
            ),
            RenderError::Save(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for EncoderError {}
impl std::error::Error for RenderError {}

impl From<EncoderError> for AppError {
    fn from(err: EncoderError) -> Self {
        AppError::Encoder(err)
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Render(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Number of stderr lines kept in an encoder failure message
const STDERR_TAIL_LINES: usize = 5;

/// Turn a failed ffmpeg run into the matching error
///
/// ffmpeg reports everything on stderr, so the failure kind is recovered from
/// the text: a write permission problem on the output, an encoder missing from
/// this build, or anything else (kept as the last few stderr lines).
pub fn classify_ffmpeg_failure(stderr: &str, status: Option<i32>, output: &Path) -> AppError {
    if stderr.contains("Permission denied") {
        return AppError::PermissionDenied(output.to_path_buf());
    }

    if stderr.contains("Unknown encoder") || stderr.contains("Encoder not found") {
        let name = stderr
            .lines()
            .find_map(|line| {
                let start = line.find('\'')?;
                let rest = &line[start + 1..];
                let end = rest.find('\'')?;
                Some(rest[..end].to_string())
            })
            .unwrap_or_else(|| "unknown".to_string());
        return EncoderError::Unsupported(name).into();
    }

    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");

    EncoderError::Failed {
        status,
        details: tail,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_maps_to_output_path() {
        let stderr = "out/video.mp4: Permission denied\n";
        let err = classify_ffmpeg_failure(stderr, Some(1), Path::new("out/video.mp4"));
        assert_eq!(err, AppError::PermissionDenied(PathBuf::from("out/video.mp4")));
        assert!(err.hints()[0].contains("administrator privileges"));
    }

    #[test]
    fn test_unknown_encoder_is_unsupported() {
        let stderr = "Unknown encoder 'libx264'\n";
        let err = classify_ffmpeg_failure(stderr, Some(1), Path::new("a.mp4"));
        assert_eq!(
            err,
            AppError::Encoder(EncoderError::Unsupported("libx264".to_string()))
        );
    }

    #[test]
    fn test_generic_failure_keeps_stderr_tail() {
        let stderr = (1..=8)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let err = classify_ffmpeg_failure(&stderr, Some(187), Path::new("a.mp4"));
        match err {
            AppError::Encoder(EncoderError::Failed { status, details }) => {
                assert_eq!(status, Some(187));
                assert_eq!(details, "line 4\nline 5\nline 6\nline 7\nline 8");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_encoder_hints() {
        let err = AppError::from(EncoderError::NotFound("ffmpeg".to_string()));
        let hints = err.hints();
        assert_eq!(hints.len(), 2);
        assert!(hints[0].contains("PATH"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_interrupted_has_no_hints() {
        assert!(AppError::Interrupted.hints().is_empty());
    }
}
