// SPDX-License-Identifier: MPL-2.0

//! Storage utilities for output files

use crate::errors::{AppError, AppResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Path with `extension` appended when it has none
pub fn with_default_extension(path: &Path, extension: &str) -> PathBuf {
    if path.extension().is_none() {
        path.with_extension(extension)
    } else {
        path.to_path_buf()
    }
}

/// Make an output path ready for writing
///
/// Appends `extension` when the path has none and creates missing parent
/// directories. Returns the final path.
pub fn prepare_output_path(path: &Path, extension: &str) -> AppResult<PathBuf> {
    let path = with_default_extension(path, extension);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| storage_error(&path, e))?;
            info!(dir = %parent.display(), "Created output directory");
        }
    }

    if path.is_dir() {
        return Err(AppError::Storage(format!(
            "{} is a directory",
            path.display()
        )));
    }

    Ok(path)
}

fn storage_error(path: &Path, err: std::io::Error) -> AppError {
    match err.kind() {
        ErrorKind::PermissionDenied => AppError::PermissionDenied(path.to_path_buf()),
        _ => AppError::Storage(format!("{}: {}", path.display(), err)),
    }
}

/// Delete an incomplete output file, ignoring a missing file
pub fn remove_partial(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed partial output"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove partial output"),
    }
}

/// File name with a local timestamp, e.g. `sinewave-doctor-20250101_120000.md`
pub fn timestamped_name(prefix: &str, extension: &str) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Absolute form of a path for display, without resolving symlinks
pub fn display_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_default_extension() {
        assert_eq!(
            with_default_extension(Path::new("out/clip"), "mp4"),
            PathBuf::from("out/clip.mp4")
        );
        assert_eq!(
            with_default_extension(Path::new("clip.mov"), "mp4"),
            PathBuf::from("clip.mov")
        );
    }

    #[test]
    fn test_creates_nested_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b").join("clip.mp4");

        let prepared = prepare_output_path(&target, "mp4").unwrap();

        assert_eq!(prepared, target);
        assert!(dir.path().join("a").join("b").is_dir());
        assert!(!prepared.exists());
    }

    #[test]
    fn test_appends_missing_extension() {
        let dir = tempfile::tempdir().unwrap();
        let prepared = prepare_output_path(&dir.path().join("clip"), "mp4").unwrap();
        assert_eq!(prepared, dir.path().join("clip.mp4"));
    }

    #[test]
    fn test_bare_file_name_needs_no_dir() {
        let prepared = prepare_output_path(Path::new("clip.mp4"), "mp4").unwrap();
        assert_eq!(prepared, PathBuf::from("clip.mp4"));
    }

    #[test]
    fn test_directory_target_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.mp4");
        std::fs::create_dir(&target).unwrap();
        assert!(matches!(
            prepare_output_path(&target, "mp4"),
            Err(AppError::Storage(_))
        ));
    }

    #[test]
    fn test_remove_partial_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.mp4");
        remove_partial(&path);
        std::fs::write(&path, b"partial").unwrap();
        remove_partial(&path);
        assert!(!path.exists());
    }

    #[test]
    fn test_timestamped_name() {
        let name = timestamped_name("sinewave-doctor", "md");
        assert!(name.starts_with("sinewave-doctor-"));
        assert!(name.ends_with(".md"));
        assert_eq!(name.len(), "sinewave-doctor-".len() + 15 + ".md".len());
    }
}
