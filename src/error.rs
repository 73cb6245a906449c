use thiserror::Error;

/// The stage at which an adaptive quadrature failed to converge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadratureStage {
    /// Computing the equivalent wavelength of a [`crate::spectral_filter::SpectralFilter::Poly`].
    EquivalentWavelength,
    /// Precomputing the spline of a [`crate::weight_function::WeightFunction1D`]
    /// or [`crate::weight_function::WeightFunction2D`].
    WeightFunctionPrecompute,
}
impl std::fmt::Display for QuadratureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EquivalentWavelength => write!(f, "equivalent wavelength"),
            Self::WeightFunctionPrecompute => write!(f, "weight function precompute"),
        }
    }
}

/// The *only* publicly visible error from this crate. Each recoverable
/// failure in spec.md §4.11/§7 has a matching variant here.
#[derive(Error, Debug)]
pub enum Error {
    /// Raised only from iterable-based [`crate::grid::UniformGrid`] construction,
    /// at the first index whose value does not match `origin + index * delta`.
    #[error("non-uniform grid at index {index}: expected {expected}, found {actual}")]
    NonUniformGrid {
        index: usize,
        actual: f64,
        expected: f64,
    },

    /// Raised from [`crate::grid::UniformGrid::intersect`] (and transitively
    /// from [`crate::spectral_response::SpectralResponse::stack`]) when the
    /// two grids do not phase-match.
    #[error("grids do not phase-match and cannot be intersected")]
    MismatchedGrids,

    /// Out-of-range construction parameter: ε ≥ 1, N < 2, negative sizes, etc.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An adaptive double-exponential integrator exceeded its iteration cap
    /// without converging to the requested tolerance.
    #[error("quadrature failed to converge during {stage} after {iterations} iterations")]
    Quadrature {
        stage: QuadratureStage,
        iterations: usize,
    },

    /// Unreadable or malformed spectral-response input file.
    #[error("failed to read spectral response file: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV record in a spectral-response or weight-function file.
    #[error("malformed CSV record: {0}")]
    Csv(#[from] csv::Error),

    /// FFT plan construction failed. In practice `rustfft`'s planner never
    /// fails; this variant exists so the fallible path is typed rather than
    /// panicking, per spec.md §7's "assertions for FFT planning" policy —
    /// reaching it in this crate would itself be a bug.
    #[error("FFT plan construction failed: {0}")]
    FftPlan(String),
}

pub type Result<T> = std::result::Result<T, Error>;
