//! Animation data primitives: colors, keyframed gradients, value ranges.

pub mod color;
pub mod gradient;
pub mod range;

pub use color::Color;
pub use gradient::{ColorGradient, Gradient, Keyframe, Lerp, ScalarGradient};
pub use range::{ColorRange, ValueRange, VectorRange};
