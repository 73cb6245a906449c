//! Spectral filters `E(x)` — the post-Fourier kernel encoding a spectral
//! response `S(λ)` in the frequency variable `x = u²/λ` (spec.md §3/§4.6).

use num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::{Error, QuadratureStage, Result};
use crate::grid::UniformGrid;
use crate::quadrature::ExpSinh;
use crate::special::sinc_pi;
use crate::spectral_response::SpectralResponse;
use crate::spline::{Boundary, CubicSpline};

type Cpx = Complex<f64>;

/// A polychromatic spectral filter built from a [`SpectralResponse`] via a
/// carrier-shifted real-to-complex FFT (spec.md §3/§4.6).
#[derive(Debug, Clone)]
pub struct PolyFilter {
    /// Frequency grid of the FFT output, origin 0, step `Δf = 1 / (g.Δ · P)`.
    grid: UniformGrid,
    /// Real part of the carrier-shifted FFT, clamped zero first-derivative
    /// boundary spline.
    real: CubicSpline,
    /// Imaginary part, natural (zero second-derivative) boundary spline —
    /// the asymmetry is load-bearing for the near-zero regularisation below,
    /// not cosmetic (spec.md §9: "do not symmetrise these boundaries").
    imag: CubicSpline,
    carrier: f64,
    equiv_lambda: f64,
}

impl PolyFilter {
    /// Builds the carrier-shifted polychromatic filter for `response`.
    ///
    /// `size` is the requested FFT length; the transform actually used is
    /// `P = max(size, response.len())`. `carrier` defaults to the
    /// response's effective wavelength.
    pub fn new(response: &SpectralResponse, size: usize, carrier: Option<f64>) -> Result<Self> {
        let g = response.grid();
        let r = g.size();
        let p = size.max(r);
        let carrier = carrier.unwrap_or_else(|| response.effective_wavelength());
        let i_c = g.to_index(carrier).clamp(0, r as i64 - 1) as usize;

        // (a) geometric correction: divide by λ, (b) right-pad to length P.
        let mut corrected: Vec<f64> = (0..r).map(|i| response.values()[i] / g.value(i)).collect();
        corrected.resize(p, 0.0);

        // (c) periodically tile by 2, (d) slice [i_c, i_c + P).
        let mut tiled = corrected.clone();
        tiled.extend_from_slice(&corrected);
        let slice = &tiled[i_c..i_c + p];

        // Forward real -> complex FFT. rustfft has no aliased real-FFT path
        // (the in-place real/complex buffer-overlap trick spec.md §9
        // describes for FFTW-style libraries does not apply here), so a
        // dedicated complex buffer is allocated, per the alternative §9
        // allows: "reimplementations should either allocate two arrays...".
        let mut buffer: Vec<Cpx> = slice.iter().map(|&v| Complex::new(v, 0.0)).collect();
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(p);
        let mut scratch = vec![Cpx::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        fft.process_with_scratch(&mut buffer, &mut scratch);

        let n_bins = p / 2 + 1;
        let mut real: Vec<f64> = buffer[..n_bins].iter().map(|c| c.re).collect();
        let mut imag: Vec<f64> = buffer[..n_bins].iter().map(|c| c.im).collect();
        // Boundary at +∞: force the last bin to zero.
        *real.last_mut().unwrap() = 0.0;
        *imag.last_mut().unwrap() = 0.0;

        let delta_f = 1.0 / (g.delta() * p as f64);
        let grid = UniformGrid::new(0.0, delta_f, n_bins);
        let real = CubicSpline::new(real, Boundary::FirstOrder(0.0, 0.0))?;
        let imag = CubicSpline::new(imag, Boundary::default())?;

        let mut filter = Self {
            grid,
            real,
            imag,
            carrier,
            equiv_lambda: f64::NAN,
        };
        filter.equiv_lambda = filter.compute_equivalent_wavelength()?;
        Ok(filter)
    }

    pub fn carrier(&self) -> f64 {
        self.carrier
    }

    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }

    pub fn equivalent_wavelength(&self) -> f64 {
        self.equiv_lambda
    }

    /// `d = (|x|/2 - grid.origin) / grid.delta` — the factor 1/2 maps the
    /// queried frequency onto the response-frequency axis, a consequence of
    /// the periodic tiling in [`Self::new`].
    fn spline_index(&self, abs_x: f64) -> f64 {
        (abs_x / 2.0 - self.grid.origin()) / self.grid.delta()
    }

    /// `E(x)`, 0 outside the grid.
    pub fn evaluate(&self, x: f64) -> f64 {
        let a = x.abs();
        if a > self.grid.last() {
            return 0.0;
        }
        let cx = std::f64::consts::PI * self.carrier * a;
        let d = self.spline_index(a);
        let re = self.real.eval(d);
        let im = self.imag.eval(d);
        (cx.sin() * re - cx.cos() * im).powi(2)
    }

    /// The regularised form `E(x)/x²`, well-defined (and numerically
    /// stable) as `x -> 0`.
    ///
    /// Near `d < 1` the imaginary contribution `imag(d)/x` is replaced by a
    /// second-order Taylor expansion of the imaginary spline around index 1
    /// (using the stored second derivative `m_1`), divided by `2·Δ_g`,
    /// instead of evaluating `imag(d)/x` directly — the naive form
    /// catastrophically cancels for small `x` (spec.md §4.6/§9).
    pub fn regular(&self, x: f64) -> f64 {
        let a = x.abs();
        if a > self.grid.last() {
            return 0.0;
        }
        let cx = std::f64::consts::PI * self.carrier * a;
        let d = self.spline_index(a);
        let re = self.real.eval(d);
        let imag_over_x = if d < 1.0 {
            let y1 = self.imag.knots()[1];
            let yp1 = self.imag.eval_derivative(1.0);
            let m1 = self.imag.second_derivatives()[1];
            let dd = d - 1.0;
            let taylor = y1 + yp1 * dd + 0.5 * m1 * dd * dd;
            taylor / (2.0 * self.grid.delta())
        } else {
            self.imag.eval(d) / a
        };
        let sin_over_x = std::f64::consts::PI * self.carrier * sinc_pi(cx);
        (sin_over_x * re - cx.cos() * imag_over_x).powi(2)
    }

    fn compute_equivalent_wavelength(&self) -> Result<f64> {
        let exp_sinh = ExpSinh::new();
        let integral = exp_sinh.integrate(
            |x| {
                if x < 1.0 {
                    x.powf(1.0 / 6.0) * self.regular(x)
                } else {
                    x.powf(-11.0 / 6.0) * self.evaluate(x)
                }
            },
            QuadratureStage::EquivalentWavelength,
        )?;
        Ok(3.28 * integral.powf(-6.0 / 7.0))
    }

    /// Rescales `grid`, `carrier`, `equiv_λ` and both splines by `λ₀`, so
    /// that `equiv_λ = 1` afterward. The splines are scaled by `√λ₀` (not
    /// `λ₀`) so that `E` itself — quadratic in the splines — scales by
    /// `λ₀`, preserving `∫ E(x) dx` under the `x → x/λ₀` axis relabeling.
    pub fn normalise(&mut self) {
        let lambda0 = self.equiv_lambda;
        self.grid = self.grid.scale(1.0 / lambda0);
        self.carrier *= lambda0;
        self.real *= lambda0.sqrt();
        self.imag *= lambda0.sqrt();
        self.equiv_lambda = 1.0;
    }
}

/// A spectral filter `E(x)`: monochromatic, Gaussian-blurred monochromatic,
/// or the FFT-based polychromatic filter above.
#[derive(Debug, Clone)]
pub enum SpectralFilter {
    /// `E(x) = sin²(πx)`, `regular(x) = π² sinc_π(πx)²`.
    Mono,
    /// `E(x) = sin²(πx) · exp(-π²Λ²x²/(8 ln 2))`.
    Gauss { outer_scale: f64 },
    Poly(PolyFilter),
}

impl SpectralFilter {
    pub fn poly(response: &SpectralResponse, size: usize, carrier: Option<f64>) -> Result<Self> {
        Ok(Self::Poly(PolyFilter::new(response, size, carrier)?))
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Self::Mono => (std::f64::consts::PI * x).sin().powi(2),
            Self::Gauss { outer_scale } => {
                (std::f64::consts::PI * x).sin().powi(2) * gauss_envelope(*outer_scale, x)
            }
            Self::Poly(p) => p.evaluate(x),
        }
    }

    /// The regularised form used by the low-frequency branch of the
    /// weight-function integrand.
    pub fn regular(&self, x: f64) -> f64 {
        match self {
            Self::Mono => {
                std::f64::consts::PI.powi(2) * sinc_pi(std::f64::consts::PI * x).powi(2)
            }
            Self::Gauss { outer_scale } => {
                std::f64::consts::PI.powi(2)
                    * sinc_pi(std::f64::consts::PI * x).powi(2)
                    * gauss_envelope(*outer_scale, x)
            }
            Self::Poly(p) => p.regular(x),
        }
    }

    pub fn as_poly(&self) -> Option<&PolyFilter> {
        match self {
            Self::Poly(p) => Some(p),
            _ => None,
        }
    }

    pub fn normalise(&mut self) -> Result<()> {
        match self {
            Self::Poly(p) => {
                p.normalise();
                Ok(())
            }
            _ => Err(Error::InvalidParameter(
                "only the Poly spectral filter can be normalised".into(),
            )),
        }
    }
}

fn gauss_envelope(outer_scale: f64, x: f64) -> f64 {
    let ln2_8 = 8.0 * std::f64::consts::LN_2;
    (-std::f64::consts::PI.powi(2) * outer_scale.powi(2) * x.powi(2) / ln2_8).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mono_boundary_values() {
        let mono = SpectralFilter::Mono;
        assert_relative_eq!(mono.evaluate(0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(mono.evaluate(0.5), 1.0, epsilon = 1e-10);
        assert_relative_eq!(mono.evaluate(1.0), 0.0, epsilon = 1e-10);
        assert_relative_eq!(mono.regular(0.0), std::f64::consts::PI.powi(2), epsilon = 1e-10);
    }

    #[test]
    fn mono_is_even() {
        let mono = SpectralFilter::Mono;
        for x in [0.1, 0.37, 0.9] {
            assert_relative_eq!(mono.evaluate(x), mono.evaluate(-x), epsilon = 1e-10);
        }
    }

    #[test]
    fn mono_regular_matches_s5() {
        let mono = SpectralFilter::Mono;
        assert_relative_eq!(mono.regular(0.5), 4.0, epsilon = 1e-8);
        assert_relative_eq!(mono.regular(0.1), 9.549150281252, epsilon = 1e-6);
    }

    #[test]
    fn gauss_matches_s6() {
        let gauss = SpectralFilter::Gauss { outer_scale: 0.1 };
        assert_relative_eq!(gauss.evaluate(0.1), 0.09547450823, epsilon = 1e-8);
        assert_relative_eq!(gauss.evaluate(0.5), 0.99556025079, epsilon = 1e-8);
    }

    fn flat_response(n: usize, origin: f64, delta: f64) -> SpectralResponse {
        let grid = UniformGrid::new(origin, delta, n);
        SpectralResponse::new(grid, vec![1.0; n]).unwrap()
    }

    #[test]
    fn poly_filter_builds_and_evaluates() {
        let response = flat_response(64, 500.0, 1.0);
        let filter = SpectralFilter::poly(&response, 128, None).unwrap();
        let e0 = filter.evaluate(0.0);
        assert!(e0.abs() < 1e-6, "E(0) should vanish, got {e0}");
    }

    #[test]
    fn poly_filter_normalise_sets_equivalent_wavelength_to_one() {
        let response = flat_response(64, 500.0, 1.0);
        let mut filter = SpectralFilter::poly(&response, 128, None).unwrap();
        filter.normalise().unwrap();
        if let SpectralFilter::Poly(p) = &filter {
            assert_relative_eq!(p.equivalent_wavelength(), 1.0, epsilon = 1e-9);
            assert!(p.carrier() > 0.0 && p.carrier().is_finite());
            assert!(p.grid().origin().is_finite());
        } else {
            panic!("expected Poly variant");
        }
    }
}
