//! Sampling strategies for randomized particle parameters.
//!
//! Closed variant sets: every consumption site matches exhaustively, so a
//! new strategy forces every sampler to be updated.

use glam::DVec3;

use crate::data::color::Color;
use crate::data::gradient::ColorGradient;
use crate::math::Rng;

/// A scalar sampling strategy producing one value per draw.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ValueRange {
    /// Constant value (no randomization).
    Constant(f64),
    /// Uniform continuous distribution in [min, max).
    Uniform { min: f64, max: f64 },
    /// Uniform integer in [min, max] inclusive, returned as f64.
    UniformInt { min: i64, max: i64 },
    /// Uniformly random pick from a fixed set of options.
    Choice(Vec<f64>),
    /// Gaussian (normal) distribution via Box-Muller.
    Gaussian { mean: f64, std_dev: f64 },
}

impl ValueRange {
    pub fn sample(&self, rng: &mut Rng) -> f64 {
        match self {
            ValueRange::Constant(value) => *value,
            ValueRange::Uniform { min, max } => rng.next_range(*min, *max),
            ValueRange::UniformInt { min, max } => rng.next_int_range(*min, *max) as f64,
            ValueRange::Choice(options) => {
                if options.is_empty() {
                    0.0
                } else {
                    options[rng.next_int(options.len() as u32) as usize]
                }
            }
            ValueRange::Gaussian { mean, std_dev } => rng.next_gaussian(*mean, *std_dev),
        }
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        ValueRange::Constant(0.0)
    }
}

/// A vector sampling strategy; the uniform variant samples each axis
/// independently within per-axis bounds.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum VectorRange {
    Constant(DVec3),
    Uniform { min: DVec3, max: DVec3 },
}

impl VectorRange {
    pub fn sample(&self, rng: &mut Rng) -> DVec3 {
        match self {
            VectorRange::Constant(value) => *value,
            VectorRange::Uniform { min, max } => DVec3::new(
                rng.next_range(min.x, max.x),
                rng.next_range(min.y, max.y),
                rng.next_range(min.z, max.z),
            ),
        }
    }
}

impl Default for VectorRange {
    fn default() -> Self {
        VectorRange::Constant(DVec3::ZERO)
    }
}

/// Color sampling strategy, parameterized by lifetime progress.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ColorRange {
    /// Single constant color.
    Constant(Color),
    /// Gradient evaluated at lifetime progress.
    Animated(ColorGradient),
    /// Uniformly random pick from a fixed palette, per draw.
    Choice(Vec<Color>),
}

impl ColorRange {
    /// Sample a color for the given lifetime `progress` in [0, 1].
    pub fn sample(&self, progress: f64, rng: &mut Rng) -> Color {
        match self {
            ColorRange::Constant(color) => *color,
            ColorRange::Animated(gradient) => gradient.evaluate(progress),
            ColorRange::Choice(colors) => {
                if colors.is_empty() {
                    Color::WHITE
                } else {
                    colors[rng.next_int(colors.len() as u32) as usize]
                }
            }
        }
    }
}

impl Default for ColorRange {
    fn default() -> Self {
        ColorRange::Constant(Color::WHITE)
    }
}
