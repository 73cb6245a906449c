//! Adaptive double-exponential ("tanh-sinh"/"exp-sinh") quadrature.
//!
//! spec.md explicitly excludes "a generic numerical-integration library" as
//! a Non-goal: these integrators are written as part of the core, tuned to
//! the two domains this crate actually needs (`[0, ∞)` and `[-1, 1]`), not
//! as a reusable general-purpose crate. They are treated as opaque black
//! boxes by their callers (spec.md §4.7): construct once per owning
//! [`crate::weight_function::WeightFunction1D`]/[`crate::weight_function::WeightFunction2D`]
//! (or [`crate::aperture::ApertureFilter::AngleAveraged`]), call repeatedly.

use crate::error::{Error, QuadratureStage, Result};

const MAX_LEVEL: u32 = 12;
const BASE_POINTS_PER_LEVEL: u32 = 6;

fn tolerance() -> f64 {
    f64::EPSILON.powf(2.0 / 3.0)
}

/// Double-exponential quadrature over the semi-infinite interval `[0, ∞)`.
///
/// Substitution `x = exp(π/2 · sinh(t))`, so
/// `∫₀^∞ f(x) dx = ∫_{-∞}^{∞} f(exp(π/2 sinh t)) · (π/2 cosh t) · exp(π/2 sinh t) dt`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpSinh {
    max_level: u32,
}

impl ExpSinh {
    pub fn new() -> Self {
        Self {
            max_level: MAX_LEVEL,
        }
    }

    /// Integrates `f` over `[0, ∞)`, adaptively refining the tanh-sinh
    /// lattice until two successive levels agree to `ε^(2/3)` or
    /// [`QuadratureStage`] is exceeded, in which case
    /// [`Error::Quadrature`] is returned.
    pub fn integrate(&self, f: impl Fn(f64) -> f64, stage: QuadratureStage) -> Result<f64> {
        let tol = tolerance();
        let mut prev = f64::NAN;
        for level in 0..=self.max_level {
            let h = 1.0 / (BASE_POINTS_PER_LEVEL as f64 * 2f64.powi(level as i32));
            let n_points = (6.0 / h) as i64;
            let mut sum = 0.0;
            for k in -n_points..=n_points {
                let t = k as f64 * h;
                let sh = (std::f64::consts::FRAC_PI_2 * t.sinh()).min(700.0);
                let x = sh.exp();
                if !x.is_finite() || x == 0.0 {
                    continue;
                }
                let dxdt = std::f64::consts::FRAC_PI_2 * t.cosh() * x;
                if !dxdt.is_finite() {
                    continue;
                }
                let fx = f(x);
                if fx.is_finite() {
                    sum += fx * dxdt;
                }
            }
            let estimate = sum * h;
            if level > 1 && (estimate - prev).abs() <= tol * estimate.abs().max(1.0) {
                return Ok(estimate);
            }
            prev = estimate;
        }
        Err(Error::Quadrature {
            stage,
            iterations: (self.max_level + 1) as usize,
        })
    }
}

/// Double-exponential quadrature over the finite interval `[-1, 1]`.
///
/// Substitution `x = tanh(π/2 · sinh(t))`, so
/// `∫_{-1}^{1} f(x) dx = ∫_{-∞}^{∞} f(tanh(π/2 sinh t)) · (π/2 cosh t) / cosh²(π/2 sinh t) dt`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TanhSinh {
    max_level: u32,
}

impl TanhSinh {
    pub fn new() -> Self {
        Self {
            max_level: MAX_LEVEL,
        }
    }

    /// Integrates `f` over `[-1, 1]`, same convergence/failure policy as
    /// [`ExpSinh::integrate`].
    pub fn integrate(&self, f: impl Fn(f64) -> f64, stage: QuadratureStage) -> Result<f64> {
        let tol = tolerance();
        let mut prev = f64::NAN;
        for level in 0..=self.max_level {
            let h = 1.0 / (BASE_POINTS_PER_LEVEL as f64 * 2f64.powi(level as i32));
            let n_points = (4.0 / h) as i64;
            let mut sum = 0.0;
            for k in -n_points..=n_points {
                let t = k as f64 * h;
                let sh = std::f64::consts::FRAC_PI_2 * t.sinh();
                let cosh_sh = sh.cosh();
                let x = sh.tanh();
                if !x.is_finite() {
                    continue;
                }
                let dxdt = std::f64::consts::FRAC_PI_2 * t.cosh() / (cosh_sh * cosh_sh);
                if !dxdt.is_finite() || dxdt == 0.0 {
                    continue;
                }
                let fx = f(x);
                if fx.is_finite() {
                    sum += fx * dxdt;
                }
            }
            let estimate = sum * h;
            if level > 1 && (estimate - prev).abs() <= tol * estimate.abs().max(1.0) {
                return Ok(estimate);
            }
            prev = estimate;
        }
        Err(Error::Quadrature {
            stage,
            iterations: (self.max_level + 1) as usize,
        })
    }

    /// Integrates `f` over `[a, b]` by affine remapping onto `[-1, 1]`.
    pub fn integrate_range(
        &self,
        a: f64,
        b: f64,
        f: impl Fn(f64) -> f64,
        stage: QuadratureStage,
    ) -> Result<f64> {
        let mid = 0.5 * (a + b);
        let half = 0.5 * (b - a);
        self.integrate(|u| f(mid + half * u), stage).map(|v| v * half)
    }
}
