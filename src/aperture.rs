//! Closed-form aperture filters `A(u)` / `A(u_x, u_y)` — the squared
//! modulus of the normalised Fourier transform of an entrance pupil,
//! evaluated at runtime (spec.md §3/§4.5).

use crate::error::{QuadratureStage, Result};
use crate::quadrature::TanhSinh;
use crate::special::{bessel_j0, jinc_pi, sinc_pi};
use crate::spline::CubicSpline;

fn annular_kernel(u: f64, eps: f64) -> f64 {
    if eps == 0.0 {
        return jinc_pi(std::f64::consts::PI * u).powi(2);
    }
    let num = jinc_pi(std::f64::consts::PI * u) - eps * eps * jinc_pi(std::f64::consts::PI * eps * u);
    (num / (1.0 - eps * eps)).powi(2)
}

/// A parameterised pupil transform. Radially-symmetric variants
/// (`Point`, `Circular`, `Annular`, `CrossAnnular`) expose both [`Self::eval`]
/// and [`Self::eval2d`]; genuinely non-symmetric variants (`Square`) only
/// give a meaningful answer through [`Self::eval2d`].
#[derive(Debug, Clone)]
pub enum ApertureFilter {
    /// `A ≡ 1`.
    Point,
    /// `A(u) = jinc_π(πu)²`.
    Circular,
    /// `A(u) = [(jinc_π(πu) - ε² jinc_π(πεu)) / (1 - ε²)]²`.
    Annular { epsilon: f64 },
    /// Product of normalised annular kernels at `u` and `αu`.
    CrossAnnular {
        alpha: f64,
        epsilon1: f64,
        epsilon2: f64,
    },
    /// `A(u_x, u_y) = (sinc_π(πu_x) · sinc_π(πu_y))²`.
    Square,
    /// Angle-average of a wrapped (possibly non-symmetric) aperture,
    /// precomputed on `N` points as `z ↦ ⟨wrapped⟩_θ(u(z))`, `z = 1/(1+u)`.
    AngleAveraged {
        wrapped: Box<ApertureFilter>,
        spline: CubicSpline,
        n: usize,
    },
    /// Wraps `A(u) · J_0(2π u β)` for a DIMM differential baseline ratio `β`.
    Dimm { wrapped: Box<ApertureFilter>, beta: f64 },
}

impl ApertureFilter {
    pub fn annular(epsilon: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&epsilon) {
            return Err(crate::error::Error::InvalidParameter(format!(
                "central obscuration epsilon must be in [0, 1), got {epsilon}"
            )));
        }
        Ok(Self::Annular { epsilon })
    }

    pub fn cross_annular(alpha: f64, epsilon1: f64, epsilon2: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&epsilon1) || !(0.0..1.0).contains(&epsilon2) {
            return Err(crate::error::Error::InvalidParameter(
                "cross-annular epsilons must be in [0, 1)".into(),
            ));
        }
        Ok(Self::CrossAnnular {
            alpha,
            epsilon1,
            epsilon2,
        })
    }

    /// Precomputes the angle-averaged wrapper of `wrapped` on `n` points,
    /// using [`TanhSinh`] quadrature over the half circle `θ ∈ [-π/2, π/2]`.
    pub fn angle_averaged(wrapped: ApertureFilter, n: usize) -> Result<Self> {
        if n < 2 {
            return Err(crate::error::Error::InvalidParameter(
                "angle_averaged requires at least 2 points".into(),
            ));
        }
        let tanh_sinh = TanhSinh::new();
        let mut y = Vec::with_capacity(n);
        for k in 0..n {
            let z = k as f64 / (n - 1) as f64;
            let value = if k == 0 {
                0.0
            } else if z >= 1.0 {
                wrapped.eval2d(0.0, 0.0)
            } else {
                let u = (1.0 - z) / z;
                let integral = tanh_sinh.integrate_range(
                    -std::f64::consts::FRAC_PI_2,
                    std::f64::consts::FRAC_PI_2,
                    |theta| wrapped.eval2d(u * theta.cos(), u * theta.sin()),
                    QuadratureStage::WeightFunctionPrecompute,
                )?;
                integral / std::f64::consts::PI
            };
            y.push(value);
        }
        let spline = CubicSpline::natural(y)?;
        Ok(Self::AngleAveraged {
            wrapped: Box::new(wrapped),
            spline,
            n,
        })
    }

    pub fn dimm(wrapped: ApertureFilter, beta: f64) -> Self {
        Self::Dimm {
            wrapped: Box::new(wrapped),
            beta,
        }
    }

    /// Radial evaluation `A(u)`.
    pub fn eval(&self, u: f64) -> f64 {
        match self {
            Self::Point => 1.0,
            Self::Circular => jinc_pi(std::f64::consts::PI * u).powi(2),
            Self::Annular { epsilon } => annular_kernel(u, *epsilon),
            Self::CrossAnnular {
                alpha,
                epsilon1,
                epsilon2,
            } => annular_kernel(u, *epsilon1) * annular_kernel(alpha * u, *epsilon2),
            Self::Square => self.eval2d(u, 0.0),
            Self::AngleAveraged { spline, n, .. } => {
                let z = 1.0 / (1.0 + u.abs());
                spline.eval(z * (*n - 1) as f64)
            }
            Self::Dimm { wrapped, beta } => {
                wrapped.eval(u) * bessel_j0(2.0 * std::f64::consts::PI * u * beta)
            }
        }
    }

    /// Non-axisymmetric evaluation `A(u_x, u_y)`. Radially-symmetric
    /// variants default to `A(√(u_x² + u_y²))` per spec.md §4.5.
    pub fn eval2d(&self, ux: f64, uy: f64) -> f64 {
        match self {
            Self::Square => {
                (sinc_pi(std::f64::consts::PI * ux) * sinc_pi(std::f64::consts::PI * uy)).powi(2)
            }
            _ => self.eval(ux.hypot(uy)),
        }
    }
}
