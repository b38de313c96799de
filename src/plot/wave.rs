// SPDX-License-Identifier: MPL-2.0

//! Sine wave samples

use crate::constants::figure::{X_MAX, X_MIN};
use std::f64::consts::PI;

/// `n` evenly spaced values from `start` to `end`, both ends included
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Sine curve sampled over one period, shifted over time
#[derive(Debug, Clone)]
pub struct SineWave {
    xs: Vec<f64>,
}

impl SineWave {
    /// Sample `samples` points across the figure's x domain
    pub fn new(samples: usize) -> Self {
        Self {
            xs: linspace(X_MIN, X_MAX, samples),
        }
    }

    /// Sample x coordinates
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Phase shift at time `t`: one full period over the whole animation
    pub fn phase_at(t: f64, duration: f64) -> f64 {
        2.0 * PI * t / duration
    }

    /// Curve values `sin(x + phase)`
    pub fn ys(&self, phase: f64) -> Vec<f64> {
        self.xs.iter().map(|x| (x + phase).sin()).collect()
    }

    /// Curve points `(x, sin(x + phase))`
    pub fn points(&self, phase: f64) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().map(move |&x| (x, (x + phase).sin()))
    }
}
