//! Work-stealing pool strategy.

use std::cell::RefCell;

use glam::DVec3;
use rayon::prelude::*;
use surf_nearest::{Projection, SphericalSurface};
use thread_local::ThreadLocal;

use super::{ProjectorPolicy, StrategyError, WorkerProjector};

/// Project points on a work-stealing pool of `workers` threads.
///
/// The scheduler decides how indices group into tasks, so no thread owns a
/// fixed band. Under [`ProjectorPolicy::Reuse`] each pool thread lazily
/// builds one projector workspace the first time it takes a task and keeps it
/// until the batch completes.
///
/// When several tasks fail concurrently, which failure is returned depends on
/// scheduling; only the serial strategy pins down the lowest failing index.
///
/// # Panics
/// Panics if `out.len() != points.len()`.
pub fn project_stealing(
    points: &[DVec3],
    out: &mut [Projection],
    surface: &SphericalSurface,
    workers: usize,
    policy: ProjectorPolicy,
) -> Result<(), StrategyError> {
    assert_eq!(points.len(), out.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()?;

    let cache: ThreadLocal<RefCell<WorkerProjector>> = ThreadLocal::new();
    pool.install(|| {
        points
            .par_iter()
            .zip(out.par_iter_mut())
            .enumerate()
            .try_for_each(|(index, (&point, slot))| {
                let worker =
                    cache.get_or(|| RefCell::new(WorkerProjector::new(surface, policy)));
                *slot = worker.borrow_mut().project(index, point)?;
                Ok(())
            })
    })
}
