use std::collections::HashSet;
use std::path::Path;

use crate::error::{FileRole, Result, UniformityError};

use super::model::{CoordinateText, ScanPosition, UniformityGrid};

// ---------------------------------------------------------------------------
// Manifest → positions + empty grid
// ---------------------------------------------------------------------------

/// Parsed scan position manifest together with the grid it spans.
#[derive(Debug, Clone)]
pub struct ScanLayout {
    /// Positions in manifest order.
    pub positions: Vec<ScanPosition>,
    pub grid: UniformityGrid,
}

impl ScanLayout {
    /// Expected scan file names, in manifest order.
    #[cfg(test)]
    pub fn file_names(&self) -> Vec<String> {
        self.positions.iter().map(ScanPosition::file_name).collect()
    }
}

/// Read a scan position manifest and build the empty uniformity grid.
///
/// Layout: one header line, then `x,y` per position. Line order does not
/// matter and positions may repeat; unique x and y tokens become the grid
/// headers (x ascending, y descending).
pub fn read_manifest(path: &Path) -> Result<ScanLayout> {
    let file = std::fs::File::open(path)
        .map_err(|e| UniformityError::from_io(FileRole::Manifest, path, e))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut positions = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|source| UniformityError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        // Line numbers are 1-based and the header is line 1.
        let line_no = row_no + 2;

        let coord = |idx: usize, name: &str| {
            let token = record.get(idx).unwrap_or("");
            CoordinateText::parse(token).ok_or_else(|| {
                UniformityError::malformed(
                    path,
                    format!("line {line_no}: {name} coordinate '{token}' is not a number"),
                )
            })
        };
        positions.push(ScanPosition::new(coord(0, "x")?, coord(1, "y")?));
    }

    let grid = grid_for(&positions);
    log::info!(
        "Manifest {}: {} positions on a {} x {} grid",
        path.display(),
        positions.len(),
        grid.x_headers().len(),
        grid.y_headers().len()
    );
    Ok(ScanLayout { positions, grid })
}

/// Empty grid spanned by the unique coordinate tokens of `positions`.
pub fn grid_for(positions: &[ScanPosition]) -> UniformityGrid {
    let mut x = unique_values(positions.iter().map(|p| &p.x));
    let mut y = unique_values(positions.iter().map(|p| &p.y));
    x.sort_by(|a, b| a.total_cmp(b));
    y.sort_by(|a, b| b.total_cmp(a));
    UniformityGrid::new(x, y)
}

/// Deduplicate by token text, then parse.
fn unique_values<'a>(tokens: impl Iterator<Item = &'a CoordinateText>) -> Vec<f64> {
    let mut seen = HashSet::new();
    tokens
        .filter(|t| seen.insert(*t))
        .map(|t| t.value().get())
        .collect()
}
