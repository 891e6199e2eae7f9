//! Batch point-to-surface projection with interchangeable execution
//! strategies.
//!
//! The crate runs one workload three ways: a serial baseline, a static
//! partition over scoped threads, and a work-stealing pool. All three execute
//! the same deterministic projection kernel from [`surf_nearest`] and fill
//! identically shaped buffers, so their results can be compared index by
//! index and their wall-clock times reduced to a speedup table.
//!
//! # Example
//!
//! ```
//! use glam::DVec3;
//! use parproj::strategy::{project_serial, project_stealing, ProjectorPolicy};
//! use parproj::{check_equivalence, scatter_points};
//! use surf_nearest::{Projection, SphericalSurface};
//!
//! let surface = SphericalSurface::new(DVec3::ZERO, 50.0);
//! let points = scatter_points(256, -100.0, 100.0, &surface, 42)?;
//!
//! let mut serial = vec![Projection::default(); points.len()];
//! let mut stealing = vec![Projection::default(); points.len()];
//! project_serial(&points, &mut serial, &surface, ProjectorPolicy::Reuse)?;
//! project_stealing(&points, &mut stealing, &surface, 4, ProjectorPolicy::Reuse)?;
//!
//! assert!(check_equivalence(&serial, &stealing).is_clean());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod points;
pub mod report;
pub mod strategy;
pub mod util;
pub mod validate;

pub use points::{scatter_points, scatter_points_with_rng, GenerateError};
pub use report::{time_strategy, Report, ReportRow, StrategyTiming};
pub use strategy::{
    partition_ranges, project_partitioned, project_serial, project_stealing, ProjectorPolicy,
    StrategyError,
};
pub use validate::{check_equivalence, check_membership, EquivalenceReport, MembershipReport};
