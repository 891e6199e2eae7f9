//! Static partition over scoped threads.

use glam::DVec3;
use surf_nearest::{Projection, SphericalSurface};

use super::{project_range, ProjectorPolicy, StrategyError};

/// Project points across up to `workers` threads, each owning one contiguous
/// band of the input.
///
/// Band boundaries match [`super::partition_ranges`]: ceiling-sized bands, so
/// the last thread may get a short band and trailing threads may get none.
/// Each worker writes only its own disjoint sub-slice of `out` and builds its
/// own projector workspace; threads share nothing mutable.
///
/// All bands run to completion even when one fails; the first failing band in
/// band order decides the returned error. A panicking band is resumed on the
/// calling thread.
///
/// # Panics
/// Panics if `out.len() != points.len()`.
pub fn project_partitioned(
    points: &[DVec3],
    out: &mut [Projection],
    surface: &SphericalSurface,
    workers: usize,
    policy: ProjectorPolicy,
) -> Result<(), StrategyError> {
    assert_eq!(points.len(), out.len());
    if points.is_empty() {
        return Ok(());
    }

    let workers = workers.max(1);
    let band = (points.len() + workers - 1) / workers;

    std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for (band_index, (band_points, band_out)) in
            points.chunks(band).zip(out.chunks_mut(band)).enumerate()
        {
            let base = band_index * band;
            handles.push(
                scope.spawn(move || project_range(band_points, band_out, base, surface, policy)),
            );
        }

        let mut outcome = Ok(());
        for handle in handles {
            let result = match handle.join() {
                Ok(result) => result,
                Err(payload) => std::panic::resume_unwind(payload),
            };
            if outcome.is_ok() {
                outcome = result;
            }
        }
        outcome
    })
}
