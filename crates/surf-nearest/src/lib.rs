//! Nearest-point projection onto parametric surfaces and curves.
//!
//! Projectors follow a two-phase lifecycle: construction samples the geometry
//! over a parameter grid (the expensive step), while [`SurfaceProjector::init`]
//! re-binds an existing projector to a new query point using only that
//! workspace (the cheap step). One projector can therefore serve arbitrarily
//! many queries against the same surface, which is what batch callers should
//! do.
//!
//! Candidates are local distance minima refined by Newton iteration; the
//! nearest one is reported with its distance and surface parameters. A query
//! against degenerate geometry (e.g. a sphere with non-positive radius)
//! yields zero candidates and a typed error, never a fabricated result.
//!
//! # Example
//!
//! ```
//! use glam::DVec3;
//! use surf_nearest::{SphericalSurface, SurfaceProjector};
//!
//! let sphere = SphericalSurface::new(DVec3::ZERO, 1.0);
//! let mut projector = SurfaceProjector::new(&sphere);
//!
//! projector.init(DVec3::new(2.0, 0.0, 0.0));
//! let hit = projector.nearest().expect("query should project");
//! assert!((hit.point - DVec3::X).length() < 1e-9);
//! assert!((hit.distance - 1.0).abs() < 1e-9);
//! ```

mod curve;
mod error;
mod projector;
mod surface;

pub use curve::{CircularCurve, ParametricCurve};
pub use error::ProjectError;
pub use projector::{
    nearest_on_curve, nearest_on_surface, CurveProjection, CurveProjector, Projection,
    SurfaceProjector,
};
pub use surface::{ParametricSurface, SphericalSurface};
