use glam::DVec3;

use crate::curve::ParametricCurve;
use crate::error::ProjectError;
use crate::surface::ParametricSurface;

/// Default parameter-grid resolution for surface projectors.
const GRID_NU: usize = 32;
const GRID_NV: usize = 16;
/// Default parameter-grid resolution for curve projectors.
const GRID_NT: usize = 64;
/// Newton iteration cap per seed.
const MAX_NEWTON_STEPS: usize = 30;
/// Convergence threshold on the parameter-space step length.
const STEP_TOL: f64 = 1e-12;
/// Relative threshold below which the Hessian is treated as singular.
const DET_EPS: f64 = 1e-12;
/// Relative spacing below which two candidates are merged.
const MERGE_TOL: f64 = 1e-7;
/// Tied grid cells can flood the seed list; only the best survive.
const MAX_SEEDS: usize = 16;

/// A point-to-surface projection candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Projection {
    /// Nearest point on the surface.
    pub point: DVec3,
    /// Euclidean distance from the query point.
    pub distance: f64,
    /// Surface parameters of `point`.
    pub u: f64,
    pub v: f64,
}

/// A point-to-curve projection candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CurveProjection {
    /// Nearest point on the curve.
    pub point: DVec3,
    /// Euclidean distance from the query point.
    pub distance: f64,
    /// Curve parameter of `point`.
    pub t: f64,
}

/// Reusable point-to-surface projection engine.
///
/// Construction samples the surface over a parameter grid, which is the
/// expensive step. [`init`](SurfaceProjector::init) re-binds the projector to
/// a new query point using only that workspace, so one projector can serve
/// arbitrarily many queries against the same surface.
pub struct SurfaceProjector<'a, S: ParametricSurface> {
    surface: &'a S,
    nu: usize,
    nv: usize,
    du: f64,
    dv: f64,
    u0: f64,
    v0: f64,
    samples: Vec<DVec3>,
    dist2: Vec<f64>,
    seeds: Vec<usize>,
    candidates: Vec<Projection>,
}

impl<'a, S: ParametricSurface> SurfaceProjector<'a, S> {
    /// Build a projector with the default sample-grid resolution.
    pub fn new(surface: &'a S) -> Self {
        Self::with_grid(surface, GRID_NU, GRID_NV)
    }

    /// Build a projector with an explicit sample-grid resolution.
    pub fn with_grid(surface: &'a S, nu: usize, nv: usize) -> Self {
        let nu = nu.max(2);
        let nv = nv.max(2);
        let ((u_min, u_max), (v_min, v_max)) = surface.bounds();
        let du = (u_max - u_min) / nu as f64;
        let dv = (v_max - v_min) / nv as f64;
        // Cell centers keep the samples away from seams and poles.
        let u0 = u_min + 0.5 * du;
        let v0 = v_min + 0.5 * dv;
        let mut samples = Vec::with_capacity(nu * nv);
        for j in 0..nv {
            let v = v0 + j as f64 * dv;
            for i in 0..nu {
                samples.push(surface.value(u0 + i as f64 * du, v));
            }
        }
        Self {
            surface,
            nu,
            nv,
            du,
            dv,
            u0,
            v0,
            samples,
            dist2: vec![0.0; nu * nv],
            seeds: Vec::new(),
            candidates: Vec::new(),
        }
    }

    /// Re-bind the projector to a new query point.
    ///
    /// Scans the sample grid for local minima of the squared distance and
    /// refines each seed with damped Newton iteration on the distance
    /// gradient. A pure function of (point, surface): repeated calls with
    /// the same point reproduce the same candidates.
    pub fn init(&mut self, point: DVec3) {
        self.candidates.clear();
        if self.surface.is_degenerate() {
            return;
        }

        self.collect_seeds(point);
        for k in 0..self.seeds.len() {
            let cell = self.seeds[k];
            let u = self.u0 + (cell % self.nu) as f64 * self.du;
            let v = self.v0 + (cell / self.nu) as f64 * self.dv;
            let (u, v) = self.refine(point, u, v);
            let hit = self.surface.value(u, v);
            self.candidates.push(Projection {
                point: hit,
                distance: (hit - point).length(),
                u,
                v,
            });
        }

        self.candidates
            .sort_by(|a, b| a.distance.total_cmp(&b.distance));
        let mut kept = 0;
        for idx in 0..self.candidates.len() {
            let cand = self.candidates[idx];
            let merge = MERGE_TOL * (1.0 + cand.point.length());
            let dup = self.candidates[..kept]
                .iter()
                .any(|c| (c.point - cand.point).length() < merge);
            if !dup {
                self.candidates[kept] = cand;
                kept += 1;
            }
        }
        self.candidates.truncate(kept);
    }

    /// Number of projection candidates found by the last [`init`](Self::init).
    pub fn num_solutions(&self) -> usize {
        self.candidates.len()
    }

    /// The nearest candidate, or why there is none.
    pub fn nearest(&self) -> Result<Projection, ProjectError> {
        if self.surface.is_degenerate() {
            return Err(ProjectError::DegenerateGeometry);
        }
        self.candidates
            .first()
            .copied()
            .ok_or(ProjectError::NoCandidates)
    }

    /// All candidates from the last [`init`](Self::init), nearest first.
    pub fn solutions(&self) -> &[Projection] {
        &self.candidates
    }

    fn collect_seeds(&mut self, point: DVec3) {
        self.seeds.clear();
        for (idx, s) in self.samples.iter().enumerate() {
            self.dist2[idx] = (*s - point).length_squared();
        }

        let (nu, nv) = (self.nu, self.nv);
        let wrap_u = self.surface.u_periodic();
        for j in 0..nv {
            for i in 0..nu {
                let d = self.dist2[j * nu + i];
                let mut is_min = true;
                'neighbors: for dj in -1i64..=1 {
                    let jj = j as i64 + dj;
                    if jj < 0 || jj >= nv as i64 {
                        continue;
                    }
                    for di in -1i64..=1 {
                        if di == 0 && dj == 0 {
                            continue;
                        }
                        let mut ii = i as i64 + di;
                        if ii < 0 || ii >= nu as i64 {
                            if !wrap_u {
                                continue;
                            }
                            ii = (ii + nu as i64) % nu as i64;
                        }
                        if self.dist2[jj as usize * nu + ii as usize] < d {
                            is_min = false;
                            break 'neighbors;
                        }
                    }
                }
                if is_min {
                    self.seeds.push(j * nu + i);
                }
            }
        }

        if self.seeds.len() > MAX_SEEDS {
            let (seeds, dist2) = (&mut self.seeds, &self.dist2);
            seeds.sort_by(|&a, &b| dist2[a].total_cmp(&dist2[b]));
            seeds.truncate(MAX_SEEDS);
        }
    }

    /// Newton iteration on the gradient of |S(u,v) - point|^2.
    ///
    /// Falls back to single-parameter steps when the Hessian is singular,
    /// which happens at parameterization poles where dS/du vanishes.
    fn refine(&self, point: DVec3, mut u: f64, mut v: f64) -> (f64, f64) {
        let ((u_min, u_max), (v_min, v_max)) = self.surface.bounds();
        let wrap_u = self.surface.u_periodic();
        let wrap_v = self.surface.v_periodic();
        let max_step = self.du.max(self.dv);

        for _ in 0..MAX_NEWTON_STEPS {
            let r = self.surface.value(u, v) - point;
            let (su, sv) = self.surface.d1(u, v);
            let (suu, suv, svv) = self.surface.d2(u, v);

            let gu = r.dot(su);
            let gv = r.dot(sv);
            let huu = su.dot(su) + r.dot(suu);
            let huv = su.dot(sv) + r.dot(suv);
            let hvv = sv.dot(sv) + r.dot(svv);

            let det = huu * hvv - huv * huv;
            let scale = huu.abs().max(hvv.abs()).max(huv.abs());
            let (mut step_u, mut step_v);
            if det.abs() > DET_EPS * scale * scale {
                step_u = (huv * gv - hvv * gu) / det;
                step_v = (huv * gu - huu * gv) / det;
            } else if hvv.abs() > DET_EPS * scale {
                step_u = 0.0;
                step_v = -gv / hvv;
            } else if huu.abs() > DET_EPS * scale {
                step_u = -gu / huu;
                step_v = 0.0;
            } else {
                break;
            }

            let norm = (step_u * step_u + step_v * step_v).sqrt();
            if norm > max_step {
                step_u *= max_step / norm;
                step_v *= max_step / norm;
            }
            u = wrap_or_clamp(u + step_u, u_min, u_max, wrap_u);
            v = wrap_or_clamp(v + step_v, v_min, v_max, wrap_v);
            if norm < STEP_TOL {
                break;
            }
        }
        (u, v)
    }
}

/// Project one point by constructing a throwaway projector.
///
/// Prefer a reused [`SurfaceProjector`] when projecting many points against
/// the same surface; this pays the full workspace construction per call.
pub fn nearest_on_surface<S: ParametricSurface>(
    point: DVec3,
    surface: &S,
) -> Result<Projection, ProjectError> {
    let mut projector = SurfaceProjector::new(surface);
    projector.init(point);
    projector.nearest()
}

/// Reusable point-to-curve projection engine.
///
/// Same lifecycle as [`SurfaceProjector`] with a one-dimensional parameter
/// grid and one-dimensional Newton refinement.
pub struct CurveProjector<'a, C: ParametricCurve> {
    curve: &'a C,
    nt: usize,
    dt: f64,
    t0: f64,
    samples: Vec<DVec3>,
    dist2: Vec<f64>,
    seeds: Vec<usize>,
    candidates: Vec<CurveProjection>,
}

impl<'a, C: ParametricCurve> CurveProjector<'a, C> {
    pub fn new(curve: &'a C) -> Self {
        Self::with_grid(curve, GRID_NT)
    }

    pub fn with_grid(curve: &'a C, nt: usize) -> Self {
        let nt = nt.max(2);
        let (t_min, t_max) = curve.bounds();
        let dt = (t_max - t_min) / nt as f64;
        let t0 = t_min + 0.5 * dt;
        let samples: Vec<DVec3> = (0..nt)
            .map(|i| curve.value(t0 + i as f64 * dt))
            .collect();
        Self {
            curve,
            nt,
            dt,
            t0,
            samples,
            dist2: vec![0.0; nt],
            seeds: Vec::new(),
            candidates: Vec::new(),
        }
    }

    /// Re-bind the projector to a new query point.
    pub fn init(&mut self, point: DVec3) {
        self.candidates.clear();
        if self.curve.is_degenerate() {
            return;
        }

        self.collect_seeds(point);
        for k in 0..self.seeds.len() {
            let t = self.refine(point, self.t0 + self.seeds[k] as f64 * self.dt);
            let hit = self.curve.value(t);
            self.candidates.push(CurveProjection {
                point: hit,
                distance: (hit - point).length(),
                t,
            });
        }

        self.candidates
            .sort_by(|a, b| a.distance.total_cmp(&b.distance));
        let mut kept = 0;
        for idx in 0..self.candidates.len() {
            let cand = self.candidates[idx];
            let merge = MERGE_TOL * (1.0 + cand.point.length());
            let dup = self.candidates[..kept]
                .iter()
                .any(|c| (c.point - cand.point).length() < merge);
            if !dup {
                self.candidates[kept] = cand;
                kept += 1;
            }
        }
        self.candidates.truncate(kept);
    }

    /// Number of projection candidates found by the last [`init`](Self::init).
    pub fn num_solutions(&self) -> usize {
        self.candidates.len()
    }

    /// The nearest candidate, or why there is none.
    pub fn nearest(&self) -> Result<CurveProjection, ProjectError> {
        if self.curve.is_degenerate() {
            return Err(ProjectError::DegenerateGeometry);
        }
        self.candidates
            .first()
            .copied()
            .ok_or(ProjectError::NoCandidates)
    }

    /// All candidates from the last [`init`](Self::init), nearest first.
    pub fn solutions(&self) -> &[CurveProjection] {
        &self.candidates
    }

    fn collect_seeds(&mut self, point: DVec3) {
        self.seeds.clear();
        for (idx, s) in self.samples.iter().enumerate() {
            self.dist2[idx] = (*s - point).length_squared();
        }

        let nt = self.nt;
        let wrap = self.curve.periodic();
        for i in 0..nt {
            let d = self.dist2[i];
            let mut is_min = true;
            for di in [-1i64, 1] {
                let mut ii = i as i64 + di;
                if ii < 0 || ii >= nt as i64 {
                    if !wrap {
                        continue;
                    }
                    ii = (ii + nt as i64) % nt as i64;
                }
                if self.dist2[ii as usize] < d {
                    is_min = false;
                    break;
                }
            }
            if is_min {
                self.seeds.push(i);
            }
        }

        if self.seeds.len() > MAX_SEEDS {
            let (seeds, dist2) = (&mut self.seeds, &self.dist2);
            seeds.sort_by(|&a, &b| dist2[a].total_cmp(&dist2[b]));
            seeds.truncate(MAX_SEEDS);
        }
    }

    fn refine(&self, point: DVec3, mut t: f64) -> f64 {
        let (t_min, t_max) = self.curve.bounds();
        let wrap = self.curve.periodic();

        for _ in 0..MAX_NEWTON_STEPS {
            let r = self.curve.value(t) - point;
            let d1 = self.curve.d1(t);
            let d2 = self.curve.d2(t);
            let g = r.dot(d1);
            let h = d1.dot(d1) + r.dot(d2);
            if h.abs() <= DET_EPS * d1.dot(d1).max(1.0) {
                break;
            }
            let mut step = -g / h;
            if step.abs() > self.dt {
                step = self.dt.copysign(step);
            }
            t = wrap_or_clamp(t + step, t_min, t_max, wrap);
            if step.abs() < STEP_TOL {
                break;
            }
        }
        t
    }
}

/// Project one point by constructing a throwaway curve projector.
pub fn nearest_on_curve<C: ParametricCurve>(
    point: DVec3,
    curve: &C,
) -> Result<CurveProjection, ProjectError> {
    let mut projector = CurveProjector::new(curve);
    projector.init(point);
    projector.nearest()
}

fn wrap_or_clamp(x: f64, min: f64, max: f64, periodic: bool) -> f64 {
    if periodic {
        (x - min).rem_euclid(max - min) + min
    } else {
        x.clamp(min, max)
    }
}
