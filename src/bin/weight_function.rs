use clap::{Parser, ValueEnum};
use log::info;

use scintweight::{ApertureFilter, SpectralFilter, SpectralResponse, WeightFunction1D};

#[derive(Parser)]
#[command(author, version, about = "Computes a 1D scintillation weight function W(h)", long_about = None)]
struct Cli {
    /// Aperture diameter [mm]
    #[arg(short, long)]
    diameter: f64,

    /// Wavelength [nm], used directly for Mono/Gauss filters, or as the
    /// fallback carrier for a polychromatic filter with no spectral
    /// response file
    #[arg(short, long, default_value_t = 550.0)]
    wavelength: f64,

    /// Aperture geometry
    #[arg(value_enum, short, long, default_value_t = ApertureKind::Circular)]
    aperture: ApertureKind,

    /// Central obscuration ratio, for --aperture annular
    #[arg(long, default_value_t = 0.0)]
    epsilon: f64,

    /// DIMM differential baseline ratio (baseline / aperture diameter); when
    /// given, wraps the chosen aperture with a DIMM differential-image-motion
    /// term `A(u)·J_0(2πuβ)` (spec.md §3/§6: `--base_ratio`)
    #[arg(long)]
    base_ratio: Option<f64>,

    /// Spectral filter kind, when no --response file is given
    #[arg(value_enum, long, default_value_t = FilterKind::Mono)]
    filter: FilterKind,

    /// Gaussian outer-scale parameter Λ, for --filter gauss
    #[arg(long, default_value_t = 0.0)]
    outer_scale: f64,

    /// Whitespace-separated two-column spectral response file(s)
    /// (wavelength_nm, value); selects a polychromatic filter
    #[arg(long)]
    response: Vec<std::path::PathBuf>,

    /// FFT length for the polychromatic filter
    #[arg(long, default_value_t = 1024)]
    fft_size: usize,

    /// Number of altitudes to sample, evenly in [0, --altitude-max]
    #[arg(long, default_value_t = 200)]
    grid_size: usize,

    /// Maximum altitude sampled [km]
    #[arg(long, default_value_t = 25.0)]
    altitude_max: f64,

    /// Number of precomputation knots for the weight-function spline
    #[arg(long, default_value_t = 200)]
    n_precompute: usize,

    /// Angular precomputation points for non-axisymmetric apertures
    /// (currently only --aperture square), angle-averaged via
    /// `ApertureFilter::angle_averaged` before being handed to the radial
    /// `WeightFunction1D` (spec.md §4.5/§4.9)
    #[arg(long, default_value_t = 64)]
    angle_average_points: usize,

    /// Output CSV path
    #[arg(short, long)]
    output: std::path::PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum ApertureKind {
    Point,
    Circular,
    Annular,
    Square,
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterKind {
    Mono,
    Gauss,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let aperture = match cli.aperture {
        ApertureKind::Point => ApertureFilter::Point,
        ApertureKind::Circular => ApertureFilter::Circular,
        ApertureKind::Annular => ApertureFilter::annular(cli.epsilon)?,
        // Square is not radially symmetric: WeightFunction1D only ever
        // samples the radial slice `aperture.eval(u)`, which for a bare
        // `Square` is just the on-axis `sinc_π(πu)²` cut, not the
        // angle-averaged transfer function spec.md §4.9 requires off-axis.
        // Angle-average it first so the radial integration sees the correct
        // kernel (spec.md §4.5's `AngleAveraged` variant).
        ApertureKind::Square => {
            ApertureFilter::angle_averaged(ApertureFilter::Square, cli.angle_average_points)?
        }
    };
    let aperture = match cli.base_ratio {
        Some(beta) => ApertureFilter::dimm(aperture, beta),
        None => aperture,
    };

    let filter = if cli.response.is_empty() {
        match cli.filter {
            FilterKind::Mono => SpectralFilter::Mono,
            FilterKind::Gauss => SpectralFilter::Gauss {
                outer_scale: cli.outer_scale,
            },
        }
    } else {
        info!("stacking {} spectral response file(s)", cli.response.len());
        let response = SpectralResponse::stack_from_files(&cli.response)?;
        let mut filter = SpectralFilter::poly(&response, cli.fft_size, None)?;
        filter.normalise()?;
        filter
    };

    info!(
        "precomputing weight function: diameter={} mm, wavelength={} nm",
        cli.diameter, cli.wavelength
    );
    let wf = WeightFunction1D::new(
        &filter,
        &aperture,
        cli.diameter,
        cli.wavelength,
        cli.n_precompute,
    )?;

    let altitudes: Vec<f64> = (0..cli.grid_size)
        .map(|i| i as f64 / (cli.grid_size - 1) as f64 * cli.altitude_max)
        .collect();
    let weights: Vec<f64> = altitudes.iter().map(|&h| wf.evaluate(h)).collect();

    scintweight::write_weight_table(&cli.output, &altitudes, &weights)?;
    info!("wrote {} rows to {}", altitudes.len(), cli.output.display());
    Ok(())
}
