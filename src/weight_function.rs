//! Scintillation weight functions `W(h)` — altitude-resolved turbulence
//! sensitivity for a given spectral filter, aperture geometry, diameter and
//! wavelength (spec.md §3/§4.9).
//!
//! Both [`WeightFunction1D`] and [`WeightFunction2D`] precompute `W` on the
//! nonlinear grid `z = ρ_F / (ρ_F + D)` and interpolate with a clamped cubic
//! spline (zero first derivative at both ends), the same `z <-> u`
//! reparameterisation
//! [`crate::aperture::ApertureFilter::angle_averaged`] uses to flatten an
//! infinite radial domain onto `[0, 1)`.
//!
//! Working units are fixed: wavelength in nm, diameter/baseline in mm,
//! altitude in km (spec.md §6) — [`crate::special::WEIGHT_FUNCTION_SCALE`]
//! folds in the `10^13` conversion this mixed unit system needs.

use crate::aperture::ApertureFilter;
use crate::error::{Error, QuadratureStage, Result};
use crate::grid::UniformGrid;
use crate::quadrature::{ExpSinh, TanhSinh};
use crate::special::WEIGHT_FUNCTION_SCALE;
use crate::spectral_filter::SpectralFilter;
use crate::spline::{Boundary, CubicSpline};

/// Evaluates `(cos(πφ), sin(πφ))` for `φ ∈ [-1, 1]`, switching to the
/// complementary angle `θ = 1 - |φ|` away from the direct branch once `|φ|`
/// crosses `0.5` — spec.md §4.9/§9: "the `2D` radial→angular split uses the
/// branch `|φ|<0.5 ? cos(πφ) : −cos(πθ)` with an auxiliary θ; its purpose is
/// to avoid evaluating sin/cos near their ±1 saturation." The branch keeps
/// the trigonometric argument away from `±π/2`, where `cos` and `sin` are
/// each flattest and least sensitive to their input — i.e. worst
/// conditioned — while the complementary angle near `θ = 0` is exactly
/// where they are best conditioned.
fn cos_sin_pi_branch_avoiding(phi: f64) -> (f64, f64) {
    let a = phi.abs();
    if a < 0.5 {
        let arg = std::f64::consts::PI * phi;
        (arg.cos(), arg.sin())
    } else {
        let theta = 1.0 - a;
        let arg = std::f64::consts::PI * theta;
        let sign = phi.signum();
        (-arg.cos(), sign * arg.sin())
    }
}

/// Keeps the angular quadrature nodes strictly inside `(-π/2, π/2)`; the
/// endpoints themselves are never evaluated since `aperture.eval2d` can be
/// singular there for some geometries (e.g. a slit aperture edge-on).
const ANGLE_EPSILON: f64 = 1e-9;

fn radial_altitude(z: f64, diameter: f64, wavelength: f64) -> f64 {
    let rho_f = diameter * z / (1.0 - z);
    rho_f * rho_f / wavelength
}

fn validate_inputs(diameter: f64, wavelength: f64, n: usize) -> Result<()> {
    if diameter <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "diameter must be positive, got {diameter}"
        )));
    }
    if wavelength <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "wavelength must be positive, got {wavelength}"
        )));
    }
    if n < 2 {
        return Err(Error::InvalidParameter(
            "weight function precompute needs at least 2 grid points".into(),
        ));
    }
    Ok(())
}

/// The low-frequency-regularised radial integrand shared by the 1D and 2D
/// weight functions: `u^{-8/3} E(u²) A(xu)`, evaluated via `regular(u²)`
/// below `u = 1` to avoid cancellation (spec.md §4.7).
fn radial_integrand(u: f64, x: f64, filter: &SpectralFilter, a_of: impl Fn(f64) -> f64) -> f64 {
    let a = a_of(x * u);
    if u < 1.0 {
        u.powf(4.0 / 3.0) * filter.regular(u * u) * a
    } else {
        u.powf(-8.0 / 3.0) * filter.evaluate(u * u) * a
    }
}

/// Altitude-resolved scintillation weight for a radially-symmetric aperture.
#[derive(Debug, Clone)]
pub struct WeightFunction1D {
    grid_z: UniformGrid,
    spline: CubicSpline,
    diameter: f64,
    wavelength: f64,
}

impl WeightFunction1D {
    /// Precomputes `W` on `n` points of `z_k = k/(n-1)`, `k = 0..n-1` (spec.md
    /// §4.8 step 2), with a clamped zero first-derivative spline boundary
    /// (spec.md §4.8 step 3) matching `evaluate()`'s `z * (n - 1)` index map.
    pub fn new(
        filter: &SpectralFilter,
        aperture: &ApertureFilter,
        diameter: f64,
        wavelength: f64,
        n: usize,
    ) -> Result<Self> {
        validate_inputs(diameter, wavelength, n)?;
        let exp_sinh = ExpSinh::new();
        let mut w = Vec::with_capacity(n);
        for k in 0..n {
            if k == 0 {
                w.push(0.0);
                continue;
            }
            let z = k as f64 / (n - 1) as f64;
            let x = (1.0 - z) / z;
            let integral = exp_sinh.integrate(
                |u| radial_integrand(u, x, filter, |v| aperture.eval(v)),
                QuadratureStage::WeightFunctionPrecompute,
            )?;
            let h = radial_altitude(z, diameter, wavelength);
            w.push(WEIGHT_FUNCTION_SCALE * h.powf(5.0 / 6.0) * wavelength.powf(-7.0 / 6.0) * integral);
        }
        let spline = CubicSpline::new(w, Boundary::FirstOrder(0.0, 0.0))?;
        let grid_z = UniformGrid::new(0.0, 1.0 / (n - 1) as f64, n);
        Ok(Self {
            grid_z,
            spline,
            diameter,
            wavelength,
        })
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    pub fn z_grid(&self) -> &UniformGrid {
        &self.grid_z
    }

    /// `W(h)`, `0` for `h <= 0`.
    pub fn evaluate(&self, h: f64) -> f64 {
        if h <= 0.0 {
            return 0.0;
        }
        let rho_f = (self.wavelength * h).sqrt();
        let z = rho_f / (rho_f + self.diameter);
        let n = self.spline.len();
        self.spline.eval(z * (n - 1) as f64)
    }
}

/// Altitude-resolved scintillation weight for a non-axisymmetric aperture
/// at a fixed baseline orientation `phi`, angle-averaging the aperture's
/// response over the integration angle `θ` at each radius (spec.md §4.9).
#[derive(Debug, Clone)]
pub struct WeightFunction2D {
    grid_z: UniformGrid,
    spline: CubicSpline,
    diameter: f64,
    wavelength: f64,
    phi: f64,
}

impl WeightFunction2D {
    /// `phi` is the baseline/aperture-array orientation angle, radians.
    pub fn new(
        filter: &SpectralFilter,
        aperture: &ApertureFilter,
        diameter: f64,
        wavelength: f64,
        phi: f64,
        n: usize,
    ) -> Result<Self> {
        validate_inputs(diameter, wavelength, n)?;
        let exp_sinh = ExpSinh::new();
        let tanh_sinh = TanhSinh::new();
        let mut w = Vec::with_capacity(n);
        for k in 0..n {
            if k == 0 {
                w.push(0.0);
                continue;
            }
            let z = k as f64 / (n - 1) as f64;
            let x = (1.0 - z) / z;
            let (cos_phi, sin_phi) = (phi.cos(), phi.sin());
            let integral = exp_sinh.integrate(
                |u| {
                    radial_integrand(u, x, filter, |v| {
                        tanh_sinh
                            .integrate_range(
                                -std::f64::consts::FRAC_PI_2 + ANGLE_EPSILON,
                                std::f64::consts::FRAC_PI_2 - ANGLE_EPSILON,
                                |theta| {
                                    let (cos_theta, sin_theta) =
                                        cos_sin_pi_branch_avoiding(theta / std::f64::consts::PI);
                                    let cos_angle = cos_theta * cos_phi - sin_theta * sin_phi;
                                    let sin_angle = sin_theta * cos_phi + cos_theta * sin_phi;
                                    aperture.eval2d(v * cos_angle, v * sin_angle)
                                },
                                QuadratureStage::WeightFunctionPrecompute,
                            )
                            .unwrap_or(0.0)
                            / std::f64::consts::PI
                    })
                },
                QuadratureStage::WeightFunctionPrecompute,
            )?;
            let h = radial_altitude(z, diameter, wavelength);
            w.push(WEIGHT_FUNCTION_SCALE * h.powf(5.0 / 6.0) * wavelength.powf(-7.0 / 6.0) * integral);
        }
        let spline = CubicSpline::new(w, Boundary::FirstOrder(0.0, 0.0))?;
        let grid_z = UniformGrid::new(0.0, 1.0 / (n - 1) as f64, n);
        Ok(Self {
            grid_z,
            spline,
            diameter,
            wavelength,
            phi,
        })
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    pub fn z_grid(&self) -> &UniformGrid {
        &self.grid_z
    }

    pub fn evaluate(&self, h: f64) -> f64 {
        if h <= 0.0 {
            return 0.0;
        }
        let rho_f = (self.wavelength * h).sqrt();
        let z = rho_f / (rho_f + self.diameter);
        let n = self.spline.len();
        self.spline.eval(z * (n - 1) as f64)
    }
}
