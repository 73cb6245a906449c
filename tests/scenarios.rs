//! End-to-end acceptance scenarios from spec.md §8 ("Concrete end-to-end
//! scenarios"). These exercise the full `SpectralFilter` × `ApertureFilter`
//! × `WeightFunction1D` pipeline rather than a single module, so they live
//! here instead of in a `#[cfg(test)]` block.

use approx::assert_relative_eq;

use scintweight::{ApertureFilter, SpectralFilter, WeightFunction1D};

const DIAMETER_MM: f64 = 10.0;
const LAMBDA_NM: f64 = 550.0;

/// A generous relative tolerance: the reference values in spec.md §8 are
/// quoted to 4-5 significant figures from a particular adaptive-quadrature
/// tuning, and this crate's own double-exponential integrator uses a
/// different (fixed-ladder) refinement schedule, so scenario checks allow a
/// couple of percent rather than chasing bit-for-bit agreement.
const SCENARIO_TOL: f64 = 0.03;

#[test]
fn s1_mono_point() {
    let wf = WeightFunction1D::new(
        &SpectralFilter::Mono,
        &ApertureFilter::Point,
        DIAMETER_MM,
        LAMBDA_NM,
        512,
    )
    .unwrap();
    assert_relative_eq!(wf.evaluate(0.5), 6.8541e10, max_relative = SCENARIO_TOL);
    assert_relative_eq!(wf.evaluate(1.0), 1.2213e11, max_relative = SCENARIO_TOL);
    assert_relative_eq!(wf.evaluate(32.0), 2.1933e12, max_relative = SCENARIO_TOL);
}

#[test]
fn s2_mono_circular() {
    let wf = WeightFunction1D::new(
        &SpectralFilter::Mono,
        &ApertureFilter::Circular,
        DIAMETER_MM,
        LAMBDA_NM,
        512,
    )
    .unwrap();
    assert_relative_eq!(wf.evaluate(0.5), 4.6096e10, max_relative = SCENARIO_TOL);
    assert_relative_eq!(wf.evaluate(1.0), 9.6325e10, max_relative = SCENARIO_TOL);
    assert_relative_eq!(wf.evaluate(32.0), 2.1556e12, max_relative = SCENARIO_TOL);
}

#[test]
fn s3_gauss_point() {
    let wf = WeightFunction1D::new(
        &SpectralFilter::Gauss { outer_scale: 0.1 },
        &ApertureFilter::Point,
        DIAMETER_MM,
        LAMBDA_NM,
        512,
    )
    .unwrap();
    assert_relative_eq!(wf.evaluate(0.5), 6.5602e10, max_relative = SCENARIO_TOL);
    assert_relative_eq!(wf.evaluate(32.0), 2.0993e12, max_relative = SCENARIO_TOL);
}

/// S11: for an all-Point aperture, `W(h)` scales as `h^(5/6) λ^(-7/6)` times
/// a constant independent of `h` — check the ratio `W(h)/(h^(5/6) λ^(-7/6))`
/// is stable across altitudes, separately from matching the literal
/// published constant.
#[test]
fn weight_function_scaling_law_holds_for_point_aperture() {
    let wf = WeightFunction1D::new(
        &SpectralFilter::Mono,
        &ApertureFilter::Point,
        DIAMETER_MM,
        LAMBDA_NM,
        512,
    )
    .unwrap();
    let ratio_at = |h: f64| wf.evaluate(h) / (h.powf(5.0 / 6.0) * LAMBDA_NM.powf(-7.0 / 6.0));
    let r1 = ratio_at(1.0);
    let r2 = ratio_at(8.0);
    let r3 = ratio_at(20.0);
    assert_relative_eq!(r1, r2, max_relative = 1e-2);
    assert_relative_eq!(r1, r3, max_relative = 1e-2);
}

/// Every weight function vanishes at zero altitude, regardless of filter or
/// aperture choice (spec.md §8 invariant 10).
#[test]
fn weight_function_vanishes_at_zero_altitude_for_every_combination() {
    let filters = [
        SpectralFilter::Mono,
        SpectralFilter::Gauss { outer_scale: 0.05 },
    ];
    let apertures = [
        ApertureFilter::Point,
        ApertureFilter::Circular,
        ApertureFilter::annular(0.3).unwrap(),
        ApertureFilter::Square,
    ];
    for filter in &filters {
        for aperture in &apertures {
            let wf = WeightFunction1D::new(filter, aperture, DIAMETER_MM, LAMBDA_NM, 64).unwrap();
            assert_eq!(wf.evaluate(0.0), 0.0);
        }
    }
}
