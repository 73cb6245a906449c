use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};
use crate::grid::UniformGrid;

/// A tabulated spectral response `S(λ)` on a uniform wavelength grid (nm).
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralResponse {
    grid: UniformGrid,
    values: Vec<f64>,
}

impl SpectralResponse {
    /// Builds a response from a grid and matching values.
    pub fn new(grid: UniformGrid, values: Vec<f64>) -> Result<Self> {
        if grid.size() != values.len() {
            return Err(Error::InvalidParameter(format!(
                "grid size {} does not match {} values",
                grid.size(),
                values.len()
            )));
        }
        Ok(Self { grid, values })
    }

    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Divides every value by `Σ v_i`, so `Σ S_i = 1` afterwards.
    pub fn normalise(&mut self) {
        let sum: f64 = self.values.iter().sum();
        self.values.iter_mut().for_each(|v| *v /= sum);
    }

    /// Intersects the two grids and replaces the values on the intersection
    /// by their pointwise product, adopting the intersected grid. Requires
    /// the two grids to phase-match, else [`Error::MismatchedGrids`].
    pub fn stack(&self, other: &Self) -> Result<Self> {
        let grid = self.grid.intersect(&other.grid)?;
        let self_start = ((grid.origin() - self.grid.origin()) / self.grid.delta()).round() as usize;
        let other_start = ((grid.origin() - other.grid.origin()) / other.grid.delta()).round() as usize;
        let values = (0..grid.size())
            .map(|i| self.values[self_start + i] * other.values[other_start + i])
            .collect();
        Ok(Self { grid, values })
    }

    /// Weighted mean wavelength, weighted by `S(λ)/λ`:
    /// `effective_λ = origin + Δ · Σ i·(v_i/λ_i) / Σ(v_i/λ_i)`.
    pub fn effective_wavelength(&self) -> f64 {
        let mut num = 0.0;
        let mut den = 0.0;
        for (i, &v) in self.values.iter().enumerate() {
            let lambda = self.grid.value(i);
            let w = v / lambda;
            num += i as f64 * w;
            den += w;
        }
        self.grid.origin() + self.grid.delta() * (num / den)
    }

    /// Parses a whitespace-separated two-column `(wavelength_nm, value)`
    /// file with no header, in increasing λ order, uniformly spaced to
    /// exact equality — spec.md §6. Runs of whitespace are a single
    /// separator.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut lambdas = Vec::new();
        let mut values = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut cols = line.split_whitespace();
            let lambda: f64 = cols
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| Error::InvalidParameter(format!("malformed line: {line}")))?;
            let value: f64 = cols
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| Error::InvalidParameter(format!("malformed line: {line}")))?;
            lambdas.push(lambda);
            values.push(value);
        }
        let grid = UniformGrid::from_values(&lambdas)?;
        Self::new(grid, values)
    }

    /// Folds [`Self::from_file`] left-to-right over `paths`, stacking each
    /// newly loaded file *into* the running accumulator — i.e.
    /// `acc = file.stack(&acc)`, not `acc.stack(&file)`. See spec.md §9's
    /// open question: this adopts the latest file's grid as the
    /// intersection's origin, which only matters when the files' λ ranges
    /// nest asymmetrically; `Σ S` is identical either way.
    pub fn stack_from_files(paths: &[impl AsRef<Path>]) -> Result<Self> {
        let mut paths = paths.iter();
        let first = paths
            .next()
            .ok_or_else(|| Error::InvalidParameter("stack_from_files: no paths given".into()))?;
        let mut acc = Self::from_file(first)?;
        for path in paths {
            let next = Self::from_file(path)?;
            acc = next.stack(&acc)?;
        }
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn write_response(lines: &[(f64, f64)]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for (lambda, v) in lines {
            writeln!(file, "{lambda}   {v}").unwrap();
        }
        file
    }

    #[test]
    fn normalise_sums_to_one() {
        let grid = UniformGrid::new(500.0, 1.0, 5);
        let mut sr = SpectralResponse::new(grid, vec![1.0, 2.0, 3.0, 2.0, 1.0]).unwrap();
        sr.normalise();
        let sum: f64 = sr.values().iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn from_file_parses_whitespace_table() {
        let data = [(500.0, 0.1), (501.0, 0.4), (502.0, 0.1)];
        let file = write_response(&data);
        let sr = SpectralResponse::from_file(file.path()).unwrap();
        assert_eq!(sr.len(), 3);
        assert_relative_eq!(sr.grid().origin(), 500.0, epsilon = 0.0);
        assert_relative_eq!(sr.values()[1], 0.4, epsilon = 1e-12);
    }

    #[test]
    fn from_file_rejects_non_uniform_grid() {
        let data = [(500.0, 0.1), (501.0, 0.4), (502.5, 0.1)];
        let file = write_response(&data);
        assert!(SpectralResponse::from_file(file.path()).is_err());
    }

    #[test]
    fn stack_multiplies_on_intersection() {
        let a = SpectralResponse::new(UniformGrid::new(500.0, 1.0, 5), vec![1.0; 5]).unwrap();
        let b = SpectralResponse::new(UniformGrid::new(502.0, 1.0, 5), vec![2.0; 5]).unwrap();
        let stacked = a.stack(&b).unwrap();
        assert_eq!(stacked.grid().origin(), 502.0);
        assert_eq!(stacked.len(), 3);
        assert!(stacked.values().iter().all(|&v| v == 2.0));
    }

    #[test]
    fn effective_wavelength_of_flat_response_is_midpoint() {
        let grid = UniformGrid::new(500.0, 1.0, 3);
        let sr = SpectralResponse::new(grid, vec![1.0, 1.0, 1.0]).unwrap();
        // flat S(λ), weight 1/λ skews slightly toward the blue end but stays
        // inside the grid's range
        let leff = sr.effective_wavelength();
        assert!(leff >= 500.0 && leff <= 502.0);
    }
}
