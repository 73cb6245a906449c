use clap::{Parser, ValueEnum};
use log::info;

use scintweight::{ApertureFilter, SpectralFilter, SpectralResponse, WeightFunctionGrid2D};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Computes a 2D scintillation weight grid W(x, y) for a regular subaperture array at a fixed altitude",
    long_about = None
)]
struct Cli {
    /// Aperture diameter [mm]
    #[arg(short, long)]
    diameter: f64,

    /// Wavelength [nm]
    #[arg(short, long, default_value_t = 550.0)]
    wavelength: f64,

    /// Altitude of the turbulent layer [km]
    #[arg(long)]
    altitude: f64,

    /// Aperture geometry evaluated over the 2D (u_x, u_y) plane
    #[arg(value_enum, short, long, default_value_t = ApertureKind::Square)]
    aperture: ApertureKind,

    /// Subaperture pitch along x [mm]
    #[arg(long, default_value_t = 500.0)]
    pitch_x: f64,

    /// Subaperture pitch along y [mm]
    #[arg(long, default_value_t = 500.0)]
    pitch_y: f64,

    /// Number of subaperture-array samples along x
    #[arg(long, default_value_t = 16)]
    nx: usize,

    /// Number of subaperture-array samples along y
    #[arg(long, default_value_t = 16)]
    ny: usize,

    /// Spectral filter kind, when no --response file is given
    #[arg(value_enum, long, default_value_t = FilterKind::Mono)]
    filter: FilterKind,

    /// Whitespace-separated two-column spectral response file(s)
    #[arg(long)]
    response: Vec<std::path::PathBuf>,

    /// FFT length for the polychromatic filter
    #[arg(long, default_value_t = 1024)]
    fft_size: usize,

    /// Output CSV path
    #[arg(short, long)]
    output: std::path::PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum ApertureKind {
    Square,
    Circular,
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterKind {
    Mono,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let aperture = match cli.aperture {
        ApertureKind::Square => ApertureFilter::Square,
        ApertureKind::Circular => ApertureFilter::Circular,
    };

    let filter = if cli.response.is_empty() {
        match cli.filter {
            FilterKind::Mono => SpectralFilter::Mono,
        }
    } else {
        info!("stacking {} spectral response file(s)", cli.response.len());
        let response = SpectralResponse::stack_from_files(&cli.response)?;
        let mut filter = SpectralFilter::poly(&response, cli.fft_size, None)?;
        filter.normalise()?;
        filter
    };

    info!(
        "computing weight grid at altitude {} km via 2D DCT-I ({} x {})",
        cli.altitude, cli.nx, cli.ny
    );
    let grid = WeightFunctionGrid2D::new(
        &filter,
        &aperture,
        cli.diameter,
        cli.wavelength,
        cli.altitude,
        cli.pitch_x,
        cli.pitch_y,
        cli.nx,
        cli.ny,
    )?;

    scintweight::write_weight_grid(&cli.output, &grid)?;
    info!(
        "wrote {} cells to {}",
        grid.nx() * grid.ny(),
        cli.output.display()
    );
    Ok(())
}
