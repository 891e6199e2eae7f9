//! Seeded query point generation.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use surf_nearest::SphericalSurface;
use thiserror::Error;

/// Fraction of the sphere radius kept clear of query points.
///
/// Samples closer to the surface center than this fraction of the radius are
/// rejected and redrawn.
pub const EXCLUSION_FACTOR: f64 = 0.95;

/// Rejection ceiling per point before generation gives up.
pub const MAX_REJECTS_PER_POINT: usize = 10_000;

/// Errors from query point generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// Every sample for a point landed inside the exclusion zone.
    #[error(
        "gave up on point {index} after {attempts} rejected samples; \
         the coordinate range likely lies inside the exclusion zone"
    )]
    Unsatisfiable { index: usize, attempts: usize },
}

/// Generate `count` query points in the cube `[min, max)^3`, rejecting any
/// that land within [`EXCLUSION_FACTOR`] of the surface radius from its
/// center.
///
/// Generation is sequential and fully determined by `seed`: the same inputs
/// always produce the same points in the same order.
pub fn scatter_points(
    count: usize,
    min: f64,
    max: f64,
    surface: &SphericalSurface,
    seed: u64,
) -> Result<Vec<DVec3>, GenerateError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    scatter_points_with_rng(count, min, max, surface, &mut rng)
}

/// As [`scatter_points`], drawing from a caller-provided RNG.
pub fn scatter_points_with_rng<R: Rng>(
    count: usize,
    min: f64,
    max: f64,
    surface: &SphericalSurface,
    rng: &mut R,
) -> Result<Vec<DVec3>, GenerateError> {
    let clearance = surface.radius() * EXCLUSION_FACTOR;
    let center = surface.center();

    let mut points = Vec::with_capacity(count);
    for index in 0..count {
        let mut attempts = 0usize;
        let point = loop {
            let candidate = DVec3::new(
                rng.gen_range(min..max),
                rng.gen_range(min..max),
                rng.gen_range(min..max),
            );
            if (candidate - center).length() >= clearance {
                break candidate;
            }
            attempts += 1;
            if attempts >= MAX_REJECTS_PER_POINT {
                return Err(GenerateError::Unsatisfiable { index, attempts });
            }
        };
        points.push(point);
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_surface() -> SphericalSurface {
        SphericalSurface::new(DVec3::ZERO, 50.0)
    }

    #[test]
    fn same_seed_reproduces_points() {
        let surface = test_surface();
        let a = scatter_points(500, -100.0, 100.0, &surface, 42).unwrap();
        let b = scatter_points(500, -100.0, 100.0, &surface, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let surface = test_surface();
        let a = scatter_points(100, -100.0, 100.0, &surface, 1).unwrap();
        let b = scatter_points(100, -100.0, 100.0, &surface, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn points_respect_bounds_and_exclusion() {
        let surface = test_surface();
        let points = scatter_points(2_000, -100.0, 100.0, &surface, 7).unwrap();
        assert_eq!(points.len(), 2_000);
        for p in &points {
            for c in [p.x, p.y, p.z] {
                assert!((-100.0..100.0).contains(&c));
            }
            assert!(p.length() >= 50.0 * EXCLUSION_FACTOR);
        }
    }

    #[test]
    fn offset_center_shifts_the_exclusion_zone() {
        let center = DVec3::new(40.0, 0.0, 0.0);
        let surface = SphericalSurface::new(center, 30.0);
        let points = scatter_points(1_000, -100.0, 100.0, &surface, 11).unwrap();
        for p in &points {
            assert!((*p - center).length() >= 30.0 * EXCLUSION_FACTOR);
        }
    }

    #[test]
    fn range_inside_exclusion_zone_errors() {
        let surface = test_surface();
        let err = scatter_points(10, -1.0, 1.0, &surface, 42).unwrap_err();
        assert_eq!(
            err,
            GenerateError::Unsatisfiable {
                index: 0,
                attempts: MAX_REJECTS_PER_POINT,
            }
        );
    }

    #[test]
    fn degenerate_radius_disables_the_exclusion_zone() {
        let surface = SphericalSurface::new(DVec3::ZERO, 0.0);
        let points = scatter_points(50, -1.0, 1.0, &surface, 3).unwrap();
        assert_eq!(points.len(), 50);
    }
}
