//! Seedable pseudo-random number generator (xorshift64).
//! Deterministic, fast, injectable into every sampling path so
//! simulations can be replayed exactly in tests.

use std::f64::consts::TAU;

use glam::DVec3;

/// Seedable pseudo-random number generator (xorshift64).
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random number in [0, upper_bound).
    pub fn next_int(&mut self, upper_bound: u32) -> u32 {
        (self.next_u64() % upper_bound as u64) as u32
    }

    /// Generate a random integer in [min, max] inclusive.
    pub fn next_int_range(&mut self, min: i64, max: i64) -> i64 {
        let span = (max - min + 1) as u64;
        min + (self.next_u64() % span) as i64
    }

    /// Generate a uniform f64 in [0, 1) with 53 bits of precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Generate a uniform f64 in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Draw from a Gaussian distribution via the Box-Muller transform.
    pub fn next_gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        // ln(0) is -inf; nudge u1 away from zero.
        let u1 = self.next_f64().max(f64::MIN_POSITIVE);
        let u2 = self.next_f64();
        let z0 = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
        mean + z0 * std_dev
    }

    /// Uniformly distributed unit vector on the sphere surface
    /// (inverse-CDF mapping of two uniform draws).
    pub fn next_unit_vector(&mut self) -> DVec3 {
        let theta = self.next_f64() * TAU;
        let phi = (2.0 * self.next_f64() - 1.0).acos();
        DVec3::new(
            phi.sin() * theta.cos(),
            phi.sin() * theta.sin(),
            phi.cos(),
        )
    }
}
