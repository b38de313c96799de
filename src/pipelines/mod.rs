// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines for rendering and encoding
//!
//! # Pipeline Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │  Sine Wave   │ ──▶ │  Figure (plotters)│ ──▶ │  RGB frame   │
//! │  (phase t)   │     │  - title, grid    │     │  W x H x 3   │
//! └──────────────┘     └───────────────────┘     └──────┬───────┘
//!                                                       │
//!                      ┌───────────────────┐     ┌──────▼───────┐
//!                      │   MP4 File        │ ◀── │ ffmpeg stdin │
//!                      │                   │     │ libx264 etc. │
//!                      └───────────────────┘     └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`animation`]: Frame loop from settings to finished video, plus PNG stills
//! - [`video`]: Encoder selection and the ffmpeg recorder

pub mod animation;
pub mod video;

pub use animation::{Progress, create_sine_wave_animation, render_still};
