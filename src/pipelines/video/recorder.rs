// SPDX-License-Identifier: MPL-2.0

//! Video recording through an ffmpeg subprocess
//!
//! Raw RGB frames are written to ffmpeg's stdin; ffmpeg encodes and muxes
//! them into the output file. stderr is drained on a helper thread so a
//! chatty encoder can never block on a full pipe while we block on stdin.

use super::encoder_selection::SelectedVideoEncoder;
use crate::constants::encoding::{BYTES_PER_PIXEL, INPUT_PIXEL_FORMAT};
use crate::errors::{AppError, AppResult, EncoderError, RenderError, classify_ffmpeg_failure};
use crate::storage::remove_partial;
use std::ffi::OsString;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;
use tracing::{debug, error, info, warn};

/// Parameters for [`VideoRecorder::new`]
#[derive(Debug, Clone)]
pub struct VideoRecorderConfig<'a> {
    /// ffmpeg executable
    pub binary: &'a Path,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Frame rate
    pub framerate: u32,
    /// Output file path (overwritten)
    pub output_path: PathBuf,
    /// Encoder and its settings
    pub encoder: &'a SelectedVideoEncoder,
}

impl VideoRecorderConfig<'_> {
    /// Full ffmpeg argument list
    pub fn command_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-hide_banner",
            "-loglevel",
            "error",
            "-y",
            "-f",
            "rawvideo",
            "-pix_fmt",
            INPUT_PIXEL_FORMAT,
        ]
        .iter()
        .map(OsString::from)
        .collect();

        args.push("-s".into());
        args.push(format!("{}x{}", self.width, self.height).into());
        args.push("-r".into());
        args.push(self.framerate.to_string().into());
        args.push("-i".into());
        args.push("-".into());
        args.push("-an".into());
        args.extend(self.encoder.output_args().into_iter().map(OsString::from));
        args.push(self.output_path.clone().into_os_string());
        args
    }
}

/// Video recorder fed one frame at a time
#[derive(Debug)]
pub struct VideoRecorder {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_reader: Option<JoinHandle<String>>,
    file_path: PathBuf,
    frame_len: usize,
    frames_written: u64,
}

impl VideoRecorder {
    /// Spawn ffmpeg and get ready to accept frames
    pub fn new(config: VideoRecorderConfig<'_>) -> AppResult<Self> {
        info!(
            binary = %config.binary.display(),
            width = config.width,
            height = config.height,
            framerate = config.framerate,
            encoder = %config.encoder.info.ffmpeg_name,
            bitrate_kbps = config.encoder.bitrate_kbps,
            output = %config.output_path.display(),
            "Creating video recorder"
        );

        let args = config.command_args();
        debug!(?args, "ffmpeg arguments");

        let mut command = Command::new(config.binary);
        command
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        // Own process group: Ctrl+C in the terminal must reach only us, the
        // frame loop then stops ffmpeg itself
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    EncoderError::NotFound(config.binary.display().to_string())
                }
                _ => EncoderError::SpawnFailed(e.to_string()),
            })?;

        let stdin = child.stdin.take();
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            std::thread::spawn(move || {
                let mut bytes = Vec::new();
                if let Err(e) = stderr.read_to_end(&mut bytes) {
                    warn!(error = %e, "Failed to read ffmpeg stderr");
                }
                String::from_utf8_lossy(&bytes).into_owned()
            })
        });

        Ok(Self {
            child: Some(child),
            stdin,
            stderr_reader,
            file_path: config.output_path,
            frame_len: config.width as usize * config.height as usize * BYTES_PER_PIXEL,
            frames_written: 0,
        })
    }

    /// Hand one packed RGB frame to the encoder
    pub fn push_frame(&mut self, frame: &[u8]) -> AppResult<()> {
        if frame.len() != self.frame_len {
            return Err(RenderError::FrameSize {
                expected: self.frame_len,
                actual: frame.len(),
            }
            .into());
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(EncoderError::Failed {
                status: None,
                details: "encoder input already closed".to_string(),
            }
            .into());
        };

        match stdin.write_all(frame) {
            Ok(()) => {
                self.frames_written += 1;
                Ok(())
            }
            Err(e) => {
                // ffmpeg exited early; its stderr says why
                warn!(error = %e, frame = self.frames_written, "Writing frame to ffmpeg failed");
                Err(self.wait_for_failure())
            }
        }
    }

    /// Close the input, wait for ffmpeg and return the written file
    pub fn finish(mut self) -> AppResult<PathBuf> {
        drop(self.stdin.take());

        let Some(mut child) = self.child.take() else {
            return Err(AppError::Other("encoder already finished".to_string()));
        };

        let status = child
            .wait()
            .map_err(|e| EncoderError::Failed {
                status: None,
                details: e.to_string(),
            })?;
        let stderr = self.join_stderr();

        if !status.success() {
            error!(?status, stderr = %stderr.trim(), "ffmpeg failed");
            remove_partial(&self.file_path);
            return Err(classify_ffmpeg_failure(&stderr, status.code(), &self.file_path));
        }

        if !self.file_path.is_file() {
            return Err(EncoderError::Failed {
                status: status.code(),
                details: format!("{} was not written", self.file_path.display()),
            }
            .into());
        }

        info!(
            path = %self.file_path.display(),
            frames = self.frames_written,
            "Video recording finished"
        );
        Ok(self.file_path.clone())
    }

    /// Stop ffmpeg and delete the incomplete file
    pub fn abort(mut self) {
        info!(path = %self.file_path.display(), "Aborting video recording");
        self.kill();
        let _ = self.join_stderr();
        remove_partial(&self.file_path);
    }

    /// Reap an ffmpeg that stopped reading and classify its failure
    fn wait_for_failure(&mut self) -> AppError {
        drop(self.stdin.take());

        let status = self.child.take().and_then(|mut child| child.wait().ok());
        let stderr = self.join_stderr();
        remove_partial(&self.file_path);

        error!(?status, stderr = %stderr.trim(), "ffmpeg stopped accepting frames");
        classify_ffmpeg_failure(&stderr, status.and_then(|s| s.code()), &self.file_path)
    }

    fn join_stderr(&mut self) -> String {
        self.stderr_reader
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default()
    }

    fn kill(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                debug!(error = %e, "ffmpeg already exited");
            }
            let _ = child.wait();
        }
    }
}

impl Drop for VideoRecorder {
    fn drop(&mut self) {
        if self.child.is_some() {
            warn!(path = %self.file_path.display(), "Video recorder dropped while running");
            self.kill();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::video::encoder_selection::{EncoderConfig, select_encoder_from};

    fn selected() -> SelectedVideoEncoder {
        select_encoder_from(&["libx264"], &EncoderConfig::default()).unwrap()
    }

    #[test]
    fn test_command_args() {
        let encoder = selected();
        let config = VideoRecorderConfig {
            binary: Path::new("ffmpeg"),
            width: 800,
            height: 400,
            framerate: 20,
            output_path: PathBuf::from("out/sine.mp4"),
            encoder: &encoder,
        };

        let args: Vec<String> = config
            .command_args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        let input = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[input + 1], "-");
        assert!(args.windows(2).any(|w| w[0] == "-s" && w[1] == "800x400"));
        assert!(args.windows(2).any(|w| w[0] == "-r" && w[1] == "20"));
        assert!(args.windows(2).any(|w| w[0] == "-pix_fmt" && w[1] == "rgb24"));
        assert!(args.windows(2).any(|w| w[0] == "-c:v" && w[1] == "libx264"));
        assert_eq!(args.last().unwrap(), "out/sine.mp4");
    }

    #[test]
    fn test_missing_binary_reports_not_found() {
        let encoder = selected();
        let dir = tempfile::tempdir().unwrap();
        let result = VideoRecorder::new(VideoRecorderConfig {
            binary: Path::new("sinewave-test-no-such-encoder-binary"),
            width: 64,
            height: 64,
            framerate: 10,
            output_path: dir.path().join("out.mp4"),
            encoder: &encoder,
        });

        assert!(matches!(
            result,
            Err(AppError::Encoder(EncoderError::NotFound(_)))
        ));
    }
}
