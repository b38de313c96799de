// SPDX-License-Identifier: GPL-3.0-only

use clap::{Args, Parser, Subcommand};
use sinewave::{ConfigOverrides, VideoQuality};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser)]
#[command(name = "sinewave")]
#[command(about = "Render an animated sine wave to MP4 with ffmpeg")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the animation to a video file (default)
    Render(RenderArgs),

    /// Render a single frame to a PNG file
    Still(StillArgs),

    /// Inspect the ffmpeg installation
    Doctor {
        /// ffmpeg executable (name on PATH or full path)
        #[arg(long)]
        ffmpeg: Option<PathBuf>,

        /// Print the report as JSON instead of Markdown
        #[arg(long)]
        json: bool,

        /// Also save the Markdown report to this file or directory
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// List the video encoders ffmpeg offers, in selection order
    Encoders {
        /// ffmpeg executable (name on PATH or full path)
        #[arg(long)]
        ffmpeg: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct RenderArgs {
    /// Output file path (default: sine_wave_animation.mp4)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Animation duration in seconds
    #[arg(short, long)]
    duration: Option<f64>,

    /// Frames per second
    #[arg(short, long)]
    fps: Option<u32>,

    /// Frame width in pixels (even)
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels (even)
    #[arg(long)]
    height: Option<u32>,

    /// Quality preset (sets the bitrate unless --bitrate is given)
    #[arg(short, long, value_enum)]
    quality: Option<VideoQuality>,

    /// Video bitrate in kbps
    #[arg(short, long)]
    bitrate: Option<u32>,

    /// ffmpeg encoder to use (e.g. libx264)
    #[arg(short, long)]
    encoder: Option<String>,

    /// ffmpeg executable (name on PATH or full path)
    #[arg(long)]
    ffmpeg: Option<PathBuf>,

    /// JSON config file (default: <config dir>/sinewave/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Draw only the curve, without title, labels and grid
    #[arg(long)]
    no_annotations: bool,
}

impl RenderArgs {
    fn into_parts(self) -> (Option<PathBuf>, ConfigOverrides) {
        let overrides = ConfigOverrides {
            output: self.output,
            duration_secs: self.duration,
            fps: self.fps,
            width: self.width,
            height: self.height,
            video_quality: self.quality,
            bitrate_kbps: self.bitrate,
            encoder: self.encoder,
            ffmpeg_path: self.ffmpeg,
            annotations: self.no_annotations.then_some(false),
        };
        (self.config, overrides)
    }
}

#[derive(Args)]
struct StillArgs {
    /// Output PNG path (default: sine_wave.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Time of the frame in seconds
    #[arg(short, long, default_value = "0")]
    time: f64,

    /// Animation duration the time refers to
    #[arg(short, long)]
    duration: Option<f64>,

    /// Frame width in pixels (even)
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels (even)
    #[arg(long)]
    height: Option<u32>,

    /// JSON config file (default: <config dir>/sinewave/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Draw only the curve, without title, labels and grid
    #[arg(long)]
    no_annotations: bool,
}

fn main() -> ExitCode {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=sinewave=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (result, failure_note) = match cli.command {
        None => {
            let (config, overrides) = RenderArgs::default().into_parts();
            (
                cli::create_animation(config, overrides),
                Some("Animation creation failed."),
            )
        }
        Some(Commands::Render(args)) => {
            let (config, overrides) = args.into_parts();
            (
                cli::create_animation(config, overrides),
                Some("Animation creation failed."),
            )
        }
        Some(Commands::Still(args)) => {
            let overrides = ConfigOverrides {
                duration_secs: args.duration,
                width: args.width,
                height: args.height,
                annotations: args.no_annotations.then_some(false),
                ..ConfigOverrides::default()
            };
            (
                cli::render_still(args.config, overrides, args.time, args.output),
                Some("Still frame rendering failed."),
            )
        }
        Some(Commands::Doctor { ffmpeg, json, save }) => (cli::doctor(ffmpeg, json, save), None),
        Some(Commands::Encoders { ffmpeg }) => (cli::list_encoders(ffmpeg), None),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            cli::report_error(&err, failure_note);
            ExitCode::FAILURE
        }
    }
}
