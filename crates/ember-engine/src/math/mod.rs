//! Math primitives: easing curves, spline interpolation, seedable RNG.
//!
//! World coordinates use [`glam::DVec3`] throughout; hot-path code mutates
//! vectors in place (`+=`, `*=`) rather than allocating intermediates.

pub mod easing;
pub mod rng;

pub use easing::{bezier, bezier_vec3, catmull_rom, ease, hermite, lerp, lerp_vec3, Easing};
pub use rng::Rng;
