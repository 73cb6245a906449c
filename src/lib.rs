//! # scintweight
//!
//! Scintillation weight functions for MASS/DIMM-class atmospheric
//! turbulence profiling.
//!
//! Given a telescope spectral response `S(λ)`, an aperture geometry, and
//! optionally a differential baseline, this crate produces `W(h)`: the
//! contribution of a turbulent layer at altitude `h` to the observed
//! scintillation index.
//!
//! Working units are fixed throughout: wavelengths in nanometres, aperture
//! scale/baseline/grid-step in millimetres, altitude in kilometres
//! (spec.md §6).
//!
//! ## Example
//! ```
//! use scintweight::{ApertureFilter, SpectralFilter, WeightFunction1D};
//!
//! let filter = SpectralFilter::Mono;
//! let aperture = ApertureFilter::Circular;
//! let wf = WeightFunction1D::new(&filter, &aperture, 140.0, 550.0, 64).unwrap();
//! let w = wf.evaluate(8.0);
//! assert!(w >= 0.0);
//! ```

mod aperture;
mod error;
mod grid;
mod io;
mod quadrature;
mod special;
mod spectral_filter;
mod spectral_response;
mod spline;
mod weight_function;
mod weight_function_grid;

pub use aperture::ApertureFilter;
pub use error::{Error, QuadratureStage, Result};
pub use grid::UniformGrid;
pub use io::{write_weight_grid, write_weight_table};
pub use quadrature::{ExpSinh, TanhSinh};
pub use special::{
    bessel_j0, bessel_j1, bessel_j2, jinc_pi, sinc_pi, zinc_pi, KOLMOGOROV_CONSTANT,
    KOLMOGOROV_SCALE, WEIGHT_FUNCTION_SCALE,
};
pub use spectral_filter::{PolyFilter, SpectralFilter};
pub use spectral_response::SpectralResponse;
pub use spline::{Boundary, CubicSpline};
pub use weight_function::{WeightFunction1D, WeightFunction2D};
pub use weight_function_grid::WeightFunctionGrid2D;
