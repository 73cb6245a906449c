//! CSV output for weight functions (spec.md §6).

use std::path::Path;

use crate::error::Result;
use crate::weight_function_grid::WeightFunctionGrid2D;

/// Writes `(altitude_m, weight)` rows to `path`, header included, using the
/// `csv` crate — grounded the same way `pierreaubert-autoEQ` uses it for
/// tabular frequency-response data.
pub fn write_weight_table(
    path: impl AsRef<Path>,
    altitudes: &[f64],
    weights: &[f64],
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["altitude_km", "weight"])?;
    for (h, w) in altitudes.iter().zip(weights.iter()) {
        writer.write_record([h.to_string(), w.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes a [`WeightFunctionGrid2D`] as `(x_m, y_m, weight)` rows, row-major
/// over `y` within each `x`.
pub fn write_weight_grid(path: impl AsRef<Path>, grid: &WeightFunctionGrid2D) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["x_mm", "y_mm", "weight"])?;
    for i in 0..grid.nx() {
        let x = grid.x_grid().value(i);
        for j in 0..grid.ny() {
            let y = grid.y_grid().value(j);
            writer.write_record([x.to_string(), y.to_string(), grid.value(i, j).to_string()])?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_weight_table_round_trips_row_count() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let altitudes = vec![0.0, 1000.0, 5000.0];
        let weights = vec![0.0, 0.2, 0.05];
        write_weight_table(file.path(), &altitudes, &weights).unwrap();
        let mut reader = csv::Reader::from_path(file.path()).unwrap();
        let count = reader.records().count();
        assert_eq!(count, 3);
    }
}
