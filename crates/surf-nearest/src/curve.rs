use glam::DVec3;
use std::f64::consts::TAU;

use crate::surface::orthonormal_frame;

/// A twice-differentiable parametric curve C(t).
pub trait ParametricCurve {
    /// Parameter-domain bounds as (t_min, t_max).
    fn bounds(&self) -> (f64, f64);

    /// Whether t wraps around with period t_max - t_min.
    fn periodic(&self) -> bool {
        false
    }

    /// Evaluate the curve at t.
    fn value(&self, t: f64) -> DVec3;

    /// First derivative dC/dt.
    fn d1(&self, t: f64) -> DVec3;

    /// Second derivative d2C/dt2.
    fn d2(&self, t: f64) -> DVec3;

    /// True when the curve cannot support projection.
    fn is_degenerate(&self) -> bool {
        false
    }
}

/// A circle given by center, radius and the plane it lies in.
///
/// Parameterized as `C(t) = c + r (cos t X + sin t Y)` with t in [0, 2pi).
#[derive(Debug, Clone, Copy)]
pub struct CircularCurve {
    center: DVec3,
    radius: f64,
    x_axis: DVec3,
    y_axis: DVec3,
}

impl CircularCurve {
    /// Circle in the XY plane.
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self {
            center,
            radius,
            x_axis: DVec3::X,
            y_axis: DVec3::Y,
        }
    }

    /// Circle in the plane perpendicular to `normal` (must be non-zero).
    pub fn with_normal(center: DVec3, normal: DVec3, radius: f64) -> Self {
        let (x_axis, y_axis) = orthonormal_frame(normal.normalize());
        Self {
            center,
            radius,
            x_axis,
            y_axis,
        }
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl ParametricCurve for CircularCurve {
    fn bounds(&self) -> (f64, f64) {
        (0.0, TAU)
    }

    fn periodic(&self) -> bool {
        true
    }

    fn value(&self, t: f64) -> DVec3 {
        let (st, ct) = t.sin_cos();
        self.center + self.radius * (ct * self.x_axis + st * self.y_axis)
    }

    fn d1(&self, t: f64) -> DVec3 {
        let (st, ct) = t.sin_cos();
        self.radius * (-st * self.x_axis + ct * self.y_axis)
    }

    fn d2(&self, t: f64) -> DVec3 {
        let (st, ct) = t.sin_cos();
        -self.radius * (ct * self.x_axis + st * self.y_axis)
    }

    fn is_degenerate(&self) -> bool {
        self.radius <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_lies_on_circle() {
        let circle = CircularCurve::new(DVec3::new(2.0, 0.0, -1.0), 3.0);
        for &t in &[0.0, 0.9, 2.5, 5.8] {
            let p = circle.value(t);
            assert!(((p - circle.center()).length() - 3.0).abs() < 1e-12);
            assert!((p.z - (-1.0)).abs() < 1e-12, "point left the XY plane");
        }
    }

    #[test]
    fn test_d1_matches_finite_differences() {
        let circle = CircularCurve::with_normal(DVec3::ZERO, DVec3::new(1.0, -1.0, 2.0), 4.0);
        let h = 1e-6;
        for &t in &[0.4, 1.9, 4.2] {
            let fd = (circle.value(t + h) - circle.value(t - h)) / (2.0 * h);
            assert!((circle.d1(t) - fd).length() < 1e-5);
        }
    }

    #[test]
    fn test_d2_points_back_to_center() {
        let circle = CircularCurve::new(DVec3::new(1.0, 1.0, 1.0), 2.0);
        for &t in &[0.1, 3.0] {
            let expected = circle.center() - circle.value(t);
            assert!((circle.d2(t) - expected).length() < 1e-12);
        }
    }
}
