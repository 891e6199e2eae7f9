//! Execution strategies for batch projection.
//!
//! Each strategy fills a caller-provided buffer with one projection per query
//! point. All of them run the same projection kernel; they differ only in how
//! the work is spread over threads and how projector workspaces are reused.

pub mod partitioned;
pub mod serial;
pub mod stealing;

pub use partitioned::project_partitioned;
pub use serial::project_serial;
pub use stealing::project_stealing;

use glam::DVec3;
use surf_nearest::{ProjectError, Projection, SphericalSurface, SurfaceProjector};
use thiserror::Error;

/// How a worker manages projector workspaces across the points it processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectorPolicy {
    /// One workspace per worker, re-initialized for each point.
    Reuse,
    /// A fresh workspace for every point.
    PerPoint,
}

/// Errors from running a projection strategy.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// The engine produced no candidate for a query point.
    #[error("projection failed at point {index} ({point}): {source}")]
    Projection {
        index: usize,
        point: DVec3,
        source: ProjectError,
    },
    /// The work-stealing pool could not be constructed.
    #[error("worker pool construction failed: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Projection kernel shared by all strategies.
///
/// Holds either a reusable projector workspace or just the surface, depending
/// on the [`ProjectorPolicy`], and tags engine failures with the index of the
/// offending point.
pub(crate) enum WorkerProjector<'a> {
    Reused(SurfaceProjector<'a, SphericalSurface>),
    PerPoint(&'a SphericalSurface),
}

impl<'a> WorkerProjector<'a> {
    pub(crate) fn new(surface: &'a SphericalSurface, policy: ProjectorPolicy) -> Self {
        match policy {
            ProjectorPolicy::Reuse => Self::Reused(SurfaceProjector::new(surface)),
            ProjectorPolicy::PerPoint => Self::PerPoint(surface),
        }
    }

    pub(crate) fn project(
        &mut self,
        index: usize,
        point: DVec3,
    ) -> Result<Projection, StrategyError> {
        let result = match self {
            Self::Reused(projector) => {
                projector.init(point);
                projector.nearest()
            }
            Self::PerPoint(surface) => {
                let mut projector = SurfaceProjector::new(*surface);
                projector.init(point);
                projector.nearest()
            }
        };
        result.map_err(|source| StrategyError::Projection {
            index,
            point,
            source,
        })
    }
}

/// Project `points[i]` into `out[i]` for each index, offsetting reported
/// failure indices by `base` so they refer to the full batch.
pub(crate) fn project_range(
    points: &[DVec3],
    out: &mut [Projection],
    base: usize,
    surface: &SphericalSurface,
    policy: ProjectorPolicy,
) -> Result<(), StrategyError> {
    let mut worker = WorkerProjector::new(surface, policy);
    for (offset, (&point, slot)) in points.iter().zip(out.iter_mut()).enumerate() {
        *slot = worker.project(base + offset, point)?;
    }
    Ok(())
}

/// Split `count` items into at most `workers` contiguous bands of ceiling
/// size, returned as `(start, end)` half-open ranges.
///
/// Every index lands in exactly one band. When `count` is not a multiple of
/// `workers` the last band is short, and some trailing workers may get no
/// band at all.
pub fn partition_ranges(count: usize, workers: usize) -> Vec<(usize, usize)> {
    if count == 0 || workers == 0 {
        return Vec::new();
    }
    let band = (count + workers - 1) / workers;
    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    while start < count {
        let end = (start + band).min(count);
        ranges.push((start, end));
        start = end;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(count: usize, workers: usize) {
        let ranges = partition_ranges(count, workers);
        assert!(ranges.len() <= workers.max(1));

        let mut next = 0;
        for &(start, end) in &ranges {
            assert_eq!(start, next, "bands must be contiguous and disjoint");
            assert!(end > start, "bands must be non-empty");
            next = end;
        }
        assert_eq!(next, count, "bands must cover every index");
    }

    #[test]
    fn bands_cover_exact_multiples() {
        assert_covers(12, 4);
        let ranges = partition_ranges(12, 4);
        assert_eq!(ranges, vec![(0, 3), (3, 6), (6, 9), (9, 12)]);
    }

    #[test]
    fn bands_cover_ragged_counts() {
        assert_covers(10, 4);
        let ranges = partition_ranges(10, 4);
        assert_eq!(ranges, vec![(0, 3), (3, 6), (6, 9), (9, 10)]);
    }

    #[test]
    fn more_workers_than_items_yields_single_item_bands() {
        assert_covers(5, 16);
        let ranges = partition_ranges(5, 16);
        assert_eq!(ranges.len(), 5);
        assert!(ranges.iter().all(|&(s, e)| e - s == 1));
    }

    #[test]
    fn empty_input_yields_no_bands() {
        assert!(partition_ranges(0, 4).is_empty());
        assert!(partition_ranges(7, 0).is_empty());
    }

    #[test]
    fn single_worker_gets_everything() {
        assert_eq!(partition_ranges(9, 1), vec![(0, 9)]);
    }
}
