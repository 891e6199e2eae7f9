use thiserror::Error;

/// Failure cases for nearest-point projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProjectError {
    /// The geometry cannot support projection (e.g. non-positive radius).
    #[error("degenerate geometry admits no projection candidates")]
    DegenerateGeometry,
    /// The extremum search produced no candidates for the query point.
    #[error("no projection candidates for the query point")]
    NoCandidates,
}
