//! Result validation: on-surface membership and cross-strategy agreement.

use glam::DVec3;
use surf_nearest::{Projection, SphericalSurface};

/// Tolerance for membership and equivalence checks.
pub const PROJECTION_TOL: f64 = 1e-8;

/// Counts from checking that projected points lie on the surface.
#[derive(Debug, Clone, Default)]
pub struct MembershipReport {
    /// Number of results checked.
    pub checked: usize,
    /// Results farther than [`PROJECTION_TOL`] from the surface.
    pub violations: usize,
    /// Largest observed distance from the surface.
    pub max_deviation: f64,
    /// Index of the result with the largest deviation.
    pub worst_index: Option<usize>,
}

impl MembershipReport {
    pub fn is_clean(&self) -> bool {
        self.violations == 0
    }

    pub fn print_summary(&self, label: &str) {
        if self.is_clean() {
            println!(
                "  {}: {} checked, 0 off surface (max deviation {:.2e})",
                label, self.checked, self.max_deviation
            );
        } else {
            println!(
                "  {}: {} checked, {} off surface (max deviation {:.2e} at {})",
                label,
                self.checked,
                self.violations,
                self.max_deviation,
                self.worst_index.unwrap_or(0)
            );
        }
    }
}

/// Check that every result in `results` lies on `surface`.
///
/// Always walks the whole slice; counting never stops at the first violation.
pub fn check_membership(results: &[Projection], surface: &SphericalSurface) -> MembershipReport {
    let mut report = MembershipReport {
        checked: results.len(),
        ..Default::default()
    };

    for (index, projection) in results.iter().enumerate() {
        let deviation =
            ((projection.point - surface.center()).length() - surface.radius()).abs();
        if deviation > report.max_deviation {
            report.max_deviation = deviation;
            report.worst_index = Some(index);
        }
        if deviation > PROJECTION_TOL {
            report.violations += 1;
        }
    }

    report
}

/// Counts from comparing two strategies' result buffers index by index.
#[derive(Debug, Clone, Default)]
pub struct EquivalenceReport {
    /// Number of index pairs compared.
    pub compared: usize,
    /// Pairs whose projected points differ by more than [`PROJECTION_TOL`].
    pub mismatches: usize,
    /// Largest observed distance between paired results.
    pub max_distance: f64,
    /// Index of the pair with the largest distance.
    pub worst_index: Option<usize>,
}

impl EquivalenceReport {
    pub fn is_clean(&self) -> bool {
        self.mismatches == 0
    }

    pub fn print_summary(&self, label: &str) {
        if self.is_clean() {
            println!(
                "  {}: {} compared, 0 mismatches (max distance {:.2e})",
                label, self.compared, self.max_distance
            );
        } else {
            println!(
                "  {}: {} compared, {} mismatches (max distance {:.2e} at {})",
                label,
                self.compared,
                self.mismatches,
                self.max_distance,
                self.worst_index.unwrap_or(0)
            );
        }
    }
}

/// Compare two result buffers index by index.
///
/// Always walks both slices in full, like [`check_membership`].
///
/// # Panics
/// Panics if the buffers differ in length.
pub fn check_equivalence(a: &[Projection], b: &[Projection]) -> EquivalenceReport {
    assert_eq!(a.len(), b.len());

    let mut report = EquivalenceReport {
        compared: a.len(),
        ..Default::default()
    };

    for (index, (pa, pb)) in a.iter().zip(b.iter()).enumerate() {
        let distance = (pa.point - pb.point).length();
        if distance > report.max_distance {
            report.max_distance = distance;
            report.worst_index = Some(index);
        }
        if distance > PROJECTION_TOL {
            report.mismatches += 1;
        }
    }

    report
}
