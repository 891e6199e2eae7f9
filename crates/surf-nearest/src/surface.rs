use glam::DVec3;
use std::f64::consts::{FRAC_PI_2, TAU};

/// A twice-differentiable parametric surface S(u, v).
///
/// The projector only touches surfaces through this trait: it samples
/// [`value`](ParametricSurface::value) over the parameter domain and refines
/// seeds with the analytic derivatives.
pub trait ParametricSurface {
    /// Parameter-domain bounds as ((u_min, u_max), (v_min, v_max)).
    fn bounds(&self) -> ((f64, f64), (f64, f64));

    /// Whether u wraps around with period u_max - u_min.
    fn u_periodic(&self) -> bool {
        false
    }

    /// Whether v wraps around with period v_max - v_min.
    fn v_periodic(&self) -> bool {
        false
    }

    /// Evaluate the surface at (u, v).
    fn value(&self, u: f64, v: f64) -> DVec3;

    /// First partial derivatives (dS/du, dS/dv).
    fn d1(&self, u: f64, v: f64) -> (DVec3, DVec3);

    /// Second partial derivatives (d2S/du2, d2S/dudv, d2S/dv2).
    fn d2(&self, u: f64, v: f64) -> (DVec3, DVec3, DVec3);

    /// True when the surface cannot support projection.
    fn is_degenerate(&self) -> bool {
        false
    }
}

/// Complete `z` to a right-handed orthonormal (x, y, z) frame.
///
/// `z` must be non-zero. For `z = +Z` this recovers the standard axes.
pub(crate) fn orthonormal_frame(z: DVec3) -> (DVec3, DVec3) {
    let pick = if z.x.abs() < 0.9 { DVec3::X } else { DVec3::Y };
    let y = z.cross(pick).normalize();
    let x = y.cross(z);
    (x, y)
}

/// A sphere given by center, radius and an orthonormal frame.
///
/// Parameterized as
/// `S(u, v) = c + r (cos v cos u X + cos v sin u Y + sin v Z)`
/// with u in [0, 2pi) (periodic) and v in [-pi/2, pi/2].
///
/// A non-positive radius is constructible but degenerate: projecting onto it
/// yields zero candidates rather than a made-up result.
#[derive(Debug, Clone, Copy)]
pub struct SphericalSurface {
    center: DVec3,
    radius: f64,
    x_axis: DVec3,
    y_axis: DVec3,
    z_axis: DVec3,
}

impl SphericalSurface {
    /// Sphere in the standard axis frame.
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self {
            center,
            radius,
            x_axis: DVec3::X,
            y_axis: DVec3::Y,
            z_axis: DVec3::Z,
        }
    }

    /// Sphere oriented so its poles lie along `axis` (must be non-zero).
    pub fn with_axis(center: DVec3, axis: DVec3, radius: f64) -> Self {
        let z_axis = axis.normalize();
        let (x_axis, y_axis) = orthonormal_frame(z_axis);
        Self {
            center,
            radius,
            x_axis,
            y_axis,
            z_axis,
        }
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl ParametricSurface for SphericalSurface {
    fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        ((0.0, TAU), (-FRAC_PI_2, FRAC_PI_2))
    }

    fn u_periodic(&self) -> bool {
        true
    }

    fn value(&self, u: f64, v: f64) -> DVec3 {
        let (su, cu) = u.sin_cos();
        let (sv, cv) = v.sin_cos();
        self.center + self.radius * (cv * cu * self.x_axis + cv * su * self.y_axis + sv * self.z_axis)
    }

    fn d1(&self, u: f64, v: f64) -> (DVec3, DVec3) {
        let (su, cu) = u.sin_cos();
        let (sv, cv) = v.sin_cos();
        let d_u = self.radius * cv * (-su * self.x_axis + cu * self.y_axis);
        let d_v = self.radius * (-sv * cu * self.x_axis - sv * su * self.y_axis + cv * self.z_axis);
        (d_u, d_v)
    }

    fn d2(&self, u: f64, v: f64) -> (DVec3, DVec3, DVec3) {
        let (su, cu) = u.sin_cos();
        let (sv, cv) = v.sin_cos();
        let d_uu = -self.radius * cv * (cu * self.x_axis + su * self.y_axis);
        let d_uv = self.radius * sv * (su * self.x_axis - cu * self.y_axis);
        let d_vv = -self.radius * (cv * cu * self.x_axis + cv * su * self.y_axis + sv * self.z_axis);
        (d_uu, d_uv, d_vv)
    }

    fn is_degenerate(&self) -> bool {
        self.radius <= 0.0
    }
}
