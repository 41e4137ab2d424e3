use std::path::Path;

use crate::error::{Result, UniformityError};

use super::model::UniformityGrid;

// ---------------------------------------------------------------------------
// TSV grid output
// ---------------------------------------------------------------------------

/// Format like C's `%.18e` (`1.500000000000000000e+01`), `nan` for NaN.
pub fn format_scientific(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let raw = format!("{value:.18e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        None => raw,
    }
}

/// Write the grid (headers included) as a tab-separated matrix.
pub fn write_grid(grid: &UniformityGrid, path: &Path) -> Result<()> {
    let csv_err = |source| UniformityError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;

    for row in grid.to_matrix() {
        writer
            .write_record(row.iter().map(|&v| format_scientific(v)))
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|source| UniformityError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Wrote {}x{} grid to {}", grid.shape().0, grid.shape().1, path.display());
    Ok(())
}

/// Read a tab-separated grid back as a plain float matrix.
pub fn read_grid(path: &Path) -> Result<Vec<Vec<f64>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .map_err(|source| UniformityError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|source| UniformityError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let row = record
            .iter()
            .map(|tok| {
                tok.trim().parse::<f64>().map_err(|_| {
                    UniformityError::malformed(path, format!("row {row_no}: '{tok}' is not a number"))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::GridCell;

    #[test]
    fn scientific_format_matches_savetxt() {
        assert_eq!(format_scientific(15.0), "1.500000000000000000e+01");
        assert_eq!(format_scientific(-0.25), "-2.500000000000000000e-01");
        assert_eq!(format_scientific(0.0), "0.000000000000000000e+00");
        assert_eq!(format_scientific(f64::NAN), "nan");
    }

    #[test]
    fn grid_survives_a_round_trip() {
        let mut grid = UniformityGrid::new(vec![-1.5, 0.0, 2.25], vec![0.1, -0.3]);
        grid.set_height(GridCell { row: 1, col: 2 }, 40.123456789);
        grid.set_height(GridCell { row: 2, col: 3 }, 1.0 / 3.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.tsv");
        write_grid(&grid, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("nan\t"));
        assert_eq!(text.lines().count(), 3);

        let back = read_grid(&path).unwrap();
        let expected = grid.to_matrix();
        assert_eq!(back.len(), expected.len());
        for (r, (got, want)) in back.iter().zip(&expected).enumerate() {
            for (c, (g, w)) in got.iter().zip(want).enumerate() {
                if r == 0 && c == 0 {
                    assert!(g.is_nan());
                } else {
                    assert_eq!(g, w, "cell ({r}, {c})");
                }
            }
        }
    }
}
