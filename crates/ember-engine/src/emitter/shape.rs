//! Stochastic spawn-point sampling for emitter shapes.

use std::f64::consts::TAU;

use glam::DVec3;

use crate::api::EmitterShape;
use crate::math::Rng;

/// Sample a random point within `shape`, offset from `center`.
///
/// Pure function of the shape parameters and the injected RNG, so spawn
/// positions replay exactly for a fixed seed. Exhaustive over the shape
/// variants by construction.
pub fn sample_point(shape: &EmitterShape, center: DVec3, rng: &mut Rng) -> DVec3 {
    match *shape {
        EmitterShape::Point => center,

        // Uniform point on the sphere surface via inverse-CDF angles.
        EmitterShape::Sphere { radius } => center + radius * rng.next_unit_vector(),

        // Volume-uniform: radius scaled by the cube root of a uniform
        // draw, not the draw itself.
        EmitterShape::SphereFilled { radius } => {
            let r = radius * rng.next_f64().cbrt();
            center + r * rng.next_unit_vector()
        }

        // Area-uniform in-plane sampling: sqrt of a uniform draw for the
        // radius, plane oriented by the configured normal.
        EmitterShape::Circle { radius, normal } => {
            let angle = rng.next_f64() * TAU;
            let r = radius * rng.next_f64().sqrt();
            let (u, v) = plane_basis(normal);
            center + u * (r * angle.cos()) + v * (r * angle.sin())
        }

        EmitterShape::Box {
            width,
            height,
            depth,
        } => {
            center
                + DVec3::new(
                    (rng.next_f64() - 0.5) * width,
                    (rng.next_f64() - 0.5) * height,
                    (rng.next_f64() - 0.5) * depth,
                )
        }

        EmitterShape::Line { start, end } => {
            let t = rng.next_f64();
            center + start + t * (end - start)
        }

        // Disc radius grows linearly along the height; in-disc sampling
        // stays area-uniform at each slice.
        EmitterShape::Cone { radius, height, .. } => {
            let t = rng.next_f64();
            let slice_radius = radius * t;
            let angle = rng.next_f64() * TAU;
            let r = slice_radius * rng.next_f64().sqrt();
            center + DVec3::new(r * angle.cos(), t * height, r * angle.sin())
        }
    }
}

/// Orthonormal basis for the plane perpendicular to `normal`.
/// A degenerate (zero-length) normal falls back to the Y axis.
fn plane_basis(normal: DVec3) -> (DVec3, DVec3) {
    let n = normal.normalize_or_zero();
    let n = if n == DVec3::ZERO { DVec3::Y } else { n };
    let helper = if n.x.abs() < 0.9 { DVec3::X } else { DVec3::Y };
    let u = n.cross(helper).normalize();
    let v = n.cross(u);
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: usize = 10_000;

    #[test]
    fn point_returns_center_exactly() {
        let mut rng = Rng::new(1);
        let center = DVec3::new(3.0, 4.0, 5.0);
        assert_eq!(sample_point(&EmitterShape::Point, center, &mut rng), center);
    }

    #[test]
    fn sphere_surface_samples_at_radius_without_bias() {
        let mut rng = Rng::new(2);
        let center = DVec3::new(1.0, 2.0, 3.0);
        let shape = EmitterShape::Sphere { radius: 2.5 };
        let mut mean = DVec3::ZERO;
        for _ in 0..SAMPLES {
            let p = sample_point(&shape, center, &mut rng);
            assert!((p.distance(center) - 2.5).abs() < 1e-9);
            mean += p - center;
        }
        // Mean direction near zero means no angular bias.
        assert!(mean.length() / (SAMPLES as f64) < 0.1);
    }

    #[test]
    fn filled_sphere_is_volume_uniform() {
        let mut rng = Rng::new(3);
        let shape = EmitterShape::SphereFilled { radius: 1.0 };
        // Volume-uniform sampling puts 1/8 of samples within r/2,
        // whereas radius-uniform would put half of them there.
        let mut inner = 0;
        for _ in 0..SAMPLES {
            let p = sample_point(&shape, DVec3::ZERO, &mut rng);
            let d = p.length();
            assert!(d <= 1.0 + 1e-9);
            if d < 0.5 {
                inner += 1;
            }
        }
        let fraction = inner as f64 / SAMPLES as f64;
        assert!((fraction - 0.125).abs() < 0.02, "inner fraction {}", fraction);
    }

    #[test]
    fn circle_stays_in_configured_plane() {
        let mut rng = Rng::new(4);
        let shape = EmitterShape::Circle {
            radius: 3.0,
            normal: DVec3::Y,
        };
        let center = DVec3::new(0.0, 7.0, 0.0);
        let mut outer = 0;
        for _ in 0..SAMPLES {
            let p = sample_point(&shape, center, &mut rng);
            assert!((p.y - 7.0).abs() < 1e-9);
            let r = (p - center).length();
            assert!(r <= 3.0 + 1e-9);
            // Area-uniform: 3/4 of samples lie beyond r/2.
            if r > 1.5 {
                outer += 1;
            }
        }
        let fraction = outer as f64 / SAMPLES as f64;
        assert!((fraction - 0.75).abs() < 0.02, "outer fraction {}", fraction);
    }

    #[test]
    fn circle_respects_arbitrary_normal() {
        let mut rng = Rng::new(5);
        let normal = DVec3::new(1.0, 1.0, 0.0);
        let shape = EmitterShape::Circle {
            radius: 1.0,
            normal,
        };
        for _ in 0..1000 {
            let offset = sample_point(&shape, DVec3::ZERO, &mut rng);
            // Every sample is perpendicular to the plane normal.
            assert!(offset.dot(normal.normalize()).abs() < 1e-9);
        }
    }

    #[test]
    fn box_bounds_each_axis() {
        let mut rng = Rng::new(6);
        let shape = EmitterShape::Box {
            width: 2.0,
            height: 4.0,
            depth: 6.0,
        };
        for _ in 0..SAMPLES {
            let p = sample_point(&shape, DVec3::ZERO, &mut rng);
            assert!(p.x.abs() <= 1.0);
            assert!(p.y.abs() <= 2.0);
            assert!(p.z.abs() <= 3.0);
        }
    }

    #[test]
    fn line_interpolates_between_endpoints() {
        let mut rng = Rng::new(7);
        let shape = EmitterShape::Line {
            start: DVec3::ZERO,
            end: DVec3::new(10.0, 0.0, 0.0),
        };
        let center = DVec3::new(0.0, 5.0, 0.0);
        for _ in 0..SAMPLES {
            let p = sample_point(&shape, center, &mut rng);
            assert_eq!(p.y, 5.0);
            assert_eq!(p.z, 0.0);
            assert!((0.0..=10.0).contains(&p.x));
        }
    }

    #[test]
    fn cone_radius_grows_with_height() {
        let mut rng = Rng::new(8);
        let shape = EmitterShape::Cone {
            radius: 2.0,
            height: 4.0,
            angle: 45.0,
        };
        for _ in 0..SAMPLES {
            let p = sample_point(&shape, DVec3::ZERO, &mut rng);
            assert!((0.0..=4.0).contains(&p.y));
            let t = p.y / 4.0;
            let planar = (p.x * p.x + p.z * p.z).sqrt();
            assert!(planar <= 2.0 * t + 1e-9, "r {} at t {}", planar, t);
        }
    }

    #[test]
    fn degenerate_circle_normal_falls_back() {
        let mut rng = Rng::new(9);
        let shape = EmitterShape::Circle {
            radius: 1.0,
            normal: DVec3::ZERO,
        };
        let p = sample_point(&shape, DVec3::ZERO, &mut rng);
        assert!(p.is_finite());
    }
}
