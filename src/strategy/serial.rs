//! Single-threaded baseline.

use glam::DVec3;
use surf_nearest::{Projection, SphericalSurface};

use super::{project_range, ProjectorPolicy, StrategyError};

/// Project every point on the calling thread, in index order.
///
/// Under [`ProjectorPolicy::Reuse`] a single projector workspace serves the
/// whole batch. Because points are visited in order, a failure here always
/// reports the lowest failing index.
///
/// # Panics
/// Panics if `out.len() != points.len()`.
pub fn project_serial(
    points: &[DVec3],
    out: &mut [Projection],
    surface: &SphericalSurface,
    policy: ProjectorPolicy,
) -> Result<(), StrategyError> {
    assert_eq!(points.len(), out.len());
    project_range(points, out, 0, surface, policy)
}
