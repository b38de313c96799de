// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Environment variable that overrides the ffmpeg executable
pub const FFMPEG_ENV_VAR: &str = "SINEWAVE_FFMPEG";

/// Default encoder executable name, looked up on PATH
pub const DEFAULT_FFMPEG_BINARY: &str = "ffmpeg";

/// Directory under the user config dir holding the config file
pub const CONFIG_DIR_NAME: &str = "sinewave";

/// Config file name inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Format bitrate for display (e.g., "8 Mbps" or "2.5 Mbps")
pub fn format_bitrate(kbps: u32) -> String {
    let mbps = kbps as f64 / 1000.0;
    if mbps == mbps.floor() {
        format!("{} Mbps", mbps as u32)
    } else {
        format!("{:.1} Mbps", mbps)
    }
}

/// Animation defaults
pub mod animation {
    /// Output file written when no path is given
    pub const DEFAULT_OUTPUT: &str = "sine_wave_animation.mp4";

    /// Still frame written by `sinewave still` when no path is given
    pub const DEFAULT_STILL_OUTPUT: &str = "sine_wave.png";

    /// Animation length in seconds
    pub const DEFAULT_DURATION_SECS: f64 = 10.0;

    /// Output frame rate
    pub const DEFAULT_FPS: u32 = 20;

    /// Highest accepted frame rate
    pub const MAX_FPS: u32 = 240;

    /// Number of curve sample points across the x domain
    pub const DEFAULT_SAMPLES: usize = 100;

    /// Video bitrate in kbps (5000k)
    pub const DEFAULT_BITRATE_KBPS: u32 = 5000;
}

/// Figure layout and styling
pub mod figure {
    use std::f64::consts::PI;

    /// Figure width in pixels (8 in at 100 dpi)
    pub const DEFAULT_WIDTH: u32 = 800;

    /// Figure height in pixels (4 in at 100 dpi)
    pub const DEFAULT_HEIGHT: u32 = 400;

    /// Smallest accepted frame edge
    pub const MIN_EDGE: u32 = 64;

    /// Start of the x domain
    pub const X_MIN: f64 = 0.0;

    /// End of the x domain (one full period)
    pub const X_MAX: f64 = 2.0 * PI;

    /// Lower y-axis limit, padded below the curve minimum
    pub const Y_MIN: f64 = -1.5;

    /// Upper y-axis limit, padded above the curve maximum
    pub const Y_MAX: f64 = 1.5;

    /// Curve stroke width in pixels
    pub const LINE_WIDTH: u32 = 3;

    /// Title prefix, followed by the frame time
    pub const TITLE: &str = "Animated Sine Wave";

    /// X axis label
    pub const X_LABEL: &str = "x";

    /// Y axis label
    pub const Y_LABEL: &str = "sin(x)";

    /// Font family for all figure text
    pub const FONT_FAMILY: &str = "sans-serif";

    /// Title font size
    pub const TITLE_FONT_SIZE: u32 = 22;

    /// Tick and axis label font size
    pub const LABEL_FONT_SIZE: u32 = 14;

    /// Outer margin around the chart
    pub const MARGIN: u32 = 12;

    /// Space reserved for x tick labels and description
    pub const X_LABEL_AREA: u32 = 40;

    /// Space reserved for y tick labels and description
    pub const Y_LABEL_AREA: u32 = 50;
}

/// Encoding constants
pub mod encoding {
    /// Raw pixel format written to the encoder's stdin
    pub const INPUT_PIXEL_FORMAT: &str = "rgb24";

    /// Bytes per pixel of [`INPUT_PIXEL_FORMAT`]
    pub const BYTES_PER_PIXEL: usize = 3;

    /// Encoder used when the ffmpeg build cannot be queried
    pub const DEFAULT_VIDEO_ENCODER: &str = "libx264";

    /// Pixel format of the encoded stream (widest player support)
    pub const OUTPUT_PIXEL_FORMAT: &str = "yuv420p";

    /// Lowest bitrate produced by the quality presets
    pub const MIN_BITRATE_KBPS: u32 = 500;

    /// Highest bitrate produced by the quality presets
    pub const MAX_BITRATE_KBPS: u32 = 50_000;
}

/// Timing constants
pub mod timing {
    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 50;
}
