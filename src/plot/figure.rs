// SPDX-License-Identifier: MPL-2.0

//! Frame rasterization
//!
//! Each frame is drawn with plotters' bitmap backend straight into a packed
//! RGB buffer, which is the layout the encoder reads from its stdin.

use super::wave::SineWave;
use crate::constants::encoding::BYTES_PER_PIXEL;
use crate::constants::figure::*;
use crate::errors::RenderError;
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

/// Curve color
const LINE_COLOR: RGBColor = RED;

/// Major grid line color
const BOLD_GRID_COLOR: RGBColor = RGBColor(200, 200, 200);

/// Minor grid line color
const LIGHT_GRID_COLOR: RGBColor = RGBColor(235, 235, 235);

fn draw_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Draw(err.to_string())
}

/// Animated sine wave figure
#[derive(Debug, Clone)]
pub struct Figure {
    width: u32,
    height: u32,
    wave: SineWave,
    annotations: bool,
}

impl Figure {
    /// Create a figure
    ///
    /// With `annotations` off only the background and the curve are drawn:
    /// no title, axis labels, tick labels or grid, and no font is loaded.
    pub fn new(width: u32, height: u32, samples: usize, annotations: bool) -> Self {
        Self {
            width,
            height,
            wave: SineWave::new(samples),
            annotations,
        }
    }

    /// Byte length of one RGB frame
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }

    /// Title shown on the frame at time `t`
    pub fn title_at(t: f64) -> String {
        format!("{} - Time: {:.1}s", TITLE, t)
    }

    /// Draw the frame at time `t` with the curve shifted by `phase`
    pub fn render_into(&self, t: f64, phase: f64, buf: &mut [u8]) -> Result<(), RenderError> {
        if buf.len() != self.frame_len() {
            return Err(RenderError::FrameSize {
                expected: self.frame_len(),
                actual: buf.len(),
            });
        }

        let root = BitMapBackend::with_buffer(buf, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let line_style = LINE_COLOR.stroke_width(LINE_WIDTH);

        if self.annotations {
            let mut chart = ChartBuilder::on(&root)
                .margin(MARGIN)
                .caption(Self::title_at(t), (FONT_FAMILY, TITLE_FONT_SIZE))
                .x_label_area_size(X_LABEL_AREA)
                .y_label_area_size(Y_LABEL_AREA)
                .build_cartesian_2d(X_MIN..X_MAX, Y_MIN..Y_MAX)
                .map_err(draw_err)?;

            chart
                .configure_mesh()
                .x_desc(X_LABEL)
                .y_desc(Y_LABEL)
                .label_style((FONT_FAMILY, LABEL_FONT_SIZE))
                .axis_desc_style((FONT_FAMILY, LABEL_FONT_SIZE))
                .x_label_formatter(&|v| format!("{:.1}", v))
                .y_label_formatter(&|v| format!("{:.1}", v))
                .bold_line_style(BOLD_GRID_COLOR.stroke_width(1))
                .light_line_style(LIGHT_GRID_COLOR.stroke_width(1))
                .draw()
                .map_err(draw_err)?;

            chart
                .draw_series(LineSeries::new(self.wave.points(phase), line_style))
                .map_err(draw_err)?;
        } else {
            let mut chart = ChartBuilder::on(&root)
                .margin(MARGIN)
                .build_cartesian_2d(X_MIN..X_MAX, Y_MIN..Y_MAX)
                .map_err(draw_err)?;

            chart
                .draw_series(LineSeries::new(self.wave.points(phase), line_style))
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Draw the frame at time `t` into a new buffer
    pub fn render(&self, t: f64, phase: f64) -> Result<Vec<u8>, RenderError> {
        let mut buf = vec![0u8; self.frame_len()];
        self.render_into(t, phase, &mut buf)?;
        Ok(buf)
    }

    /// Draw the frame at time `t` as an image
    pub fn render_image(&self, t: f64, phase: f64) -> Result<RgbImage, RenderError> {
        let buf = self.render(t, phase)?;
        let actual = buf.len();
        RgbImage::from_raw(self.width, self.height, buf).ok_or(RenderError::FrameSize {
            expected: self.frame_len(),
            actual,
        })
    }
}

/// Save a frame as PNG
pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), RenderError> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| RenderError::Save(format!("{}: {}", path.display(), e)))?;

    debug!(path = %path.display(), "Still frame saved");
    Ok(())
}
