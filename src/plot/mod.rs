// SPDX-License-Identifier: MPL-2.0

//! Plot generation for the animation
//!
//! - [`wave`]: sample points and the time-dependent phase of the curve
//! - [`figure`]: rasterizes one frame with plotters into an RGB buffer

pub mod figure;
pub mod wave;

pub use figure::{Figure, save_png};
pub use wave::{SineWave, linspace};
