//! Keyframed piecewise-linear gradients over normalized time [0, 1].

use crate::data::color::Color;
use crate::math::Easing;

/// A single keyframe in an animation timeline.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<V> {
    /// Normalized time in [0, 1].
    pub time: f64,
    /// The value at this keyframe.
    pub value: V,
}

impl<V> Keyframe<V> {
    pub fn new(time: f64, value: V) -> Self {
        Keyframe { time, value }
    }
}

/// Values that can be linearly interpolated inside a gradient.
pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f64) -> Self;
    /// Value returned when a gradient has no keyframes at all.
    fn neutral() -> Self;
}

impl Lerp for f64 {
    fn lerp(self, other: Self, t: f64) -> Self {
        crate::math::lerp(self, other, t)
    }

    fn neutral() -> Self {
        0.0
    }
}

impl Lerp for Color {
    fn lerp(self, other: Self, t: f64) -> Self {
        Color::lerp(self, other, t)
    }

    fn neutral() -> Self {
        Color::WHITE
    }
}

/// A gradient over keyframed values, sorted by time at construction.
///
/// Evaluation clamps time to [0, 1], returns the first/last value outside
/// the keyframe span, and linearly interpolates between the bracketing
/// keyframes otherwise.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Gradient<V> {
    keyframes: Vec<Keyframe<V>>,
}

/// Color-valued gradient.
pub type ColorGradient = Gradient<Color>;
/// Scalar-valued gradient (scale, opacity, speed...).
pub type ScalarGradient = Gradient<f64>;

impl<V: Lerp> Gradient<V> {
    pub fn new(mut keyframes: Vec<Keyframe<V>>) -> Self {
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Gradient { keyframes }
    }

    /// Constant gradient: one keyframe, returned for all t.
    pub fn constant(value: V) -> Self {
        Gradient {
            keyframes: vec![Keyframe::new(0.0, value)],
        }
    }

    /// Linear ramp from `start` at t=0 to `end` at t=1.
    pub fn between(start: V, end: V) -> Self {
        Gradient {
            keyframes: vec![Keyframe::new(0.0, start), Keyframe::new(1.0, end)],
        }
    }

    pub fn keyframes(&self) -> &[Keyframe<V>] {
        &self.keyframes
    }

    /// Evaluate the gradient at normalized time `t`.
    pub fn evaluate(&self, t: f64) -> V {
        self.evaluate_eased(t, Easing::Linear)
    }

    /// Evaluate with an easing remap applied to `t` before keyframe lookup.
    pub fn evaluate_eased(&self, t: f64, easing: Easing) -> V {
        match self.keyframes.len() {
            0 => return V::neutral(),
            1 => return self.keyframes[0].value,
            _ => {}
        }

        let t = easing.apply(t.clamp(0.0, 1.0));

        let next = self.keyframes.iter().position(|k| k.time >= t);
        match next {
            None => self.keyframes[self.keyframes.len() - 1].value,
            Some(0) => self.keyframes[0].value,
            Some(i) => {
                let prev = &self.keyframes[i - 1];
                let next = &self.keyframes[i];
                let local = (t - prev.time) / (next.time - prev.time);
                prev.value.lerp(next.value, local)
            }
        }
    }
}

impl ColorGradient {
    /// Fade from `color` to fully transparent over the lifetime.
    pub fn fade_out(color: Color) -> Self {
        Gradient::between(color, color.with_alpha(0.0))
    }
}
