use std::fmt;
use std::ops::Deref;

use serde::Serialize;

use crate::error::{Axis, Result, UniformityError};

// ---------------------------------------------------------------------------
// Coordinates: text for file names, value for comparisons
// ---------------------------------------------------------------------------

/// A coordinate token exactly as the instrument wrote it (e.g. `"-12.50"`).
///
/// Only used to derive scan file names, so the original formatting is kept
/// byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CoordinateText(String);

impl CoordinateText {
    /// Accepts a trimmed, non-empty token that parses as a float.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() || token.parse::<f64>().is_err() {
            return None;
        }
        Some(CoordinateText(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the token. Validated at construction.
    pub fn value(&self) -> CoordinateValue {
        CoordinateValue(self.0.parse().unwrap_or(f64::NAN))
    }
}

impl fmt::Display for CoordinateText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Relative slack added to the absolute coordinate tolerance.
pub const REL_TOLERANCE: f64 = 1e-5;

/// A parsed coordinate, only ever compared within a tolerance.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct CoordinateValue(pub f64);

impl CoordinateValue {
    pub fn get(self) -> f64 {
        self.0
    }

    /// `|self - other| <= tolerance + REL_TOLERANCE * |other|`, with `other`
    /// the grid header. The relative term keeps a value exactly halfway
    /// between two headers matching both of them.
    pub fn is_close(self, other: f64, tolerance: f64) -> bool {
        (self.0 - other).abs() <= tolerance + REL_TOLERANCE * other.abs()
    }
}

// ---------------------------------------------------------------------------
// ScanPosition – one manifest line
// ---------------------------------------------------------------------------

/// One `x,y` line of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScanPosition {
    pub x: CoordinateText,
    pub y: CoordinateText,
}

impl ScanPosition {
    pub fn new(x: CoordinateText, y: CoordinateText) -> Self {
        ScanPosition { x, y }
    }

    /// File name the instrument uses for this position: `(x, y).txt`.
    pub fn file_name(&self) -> String {
        format!("({}, {}).txt", self.x, self.y)
    }

    /// Recover the coordinates from a `(x, y).txt` file name.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let inner = name
            .strip_suffix(".txt")?
            .strip_prefix('(')?
            .strip_suffix(')')?;
        let (x, y) = inner.split_once(',')?;
        Some(ScanPosition {
            x: CoordinateText::parse(x)?,
            y: CoordinateText::parse(y)?,
        })
    }
}

impl fmt::Display for ScanPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// HeightSamples – filtered, flattened scan values
// ---------------------------------------------------------------------------

/// Flattened height values of one scan with sentinel pixels removed.
/// Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightSamples(Vec<f64>);

impl HeightSamples {
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(UniformityError::EmptySample);
        }
        Ok(HeightSamples(values))
    }

    pub fn min(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn mean(&self) -> f64 {
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }

    /// Sample standard deviation (n - 1 denominator). Zero for a single value.
    pub fn std_dev(&self) -> f64 {
        let n = self.0.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let ss: f64 = self.0.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    }
}

impl Deref for HeightSamples {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// UniformityGrid
// ---------------------------------------------------------------------------

/// Interior cell of a [`UniformityGrid`], in full-matrix indices (so both are >= 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

/// Step heights keyed by scan coordinates.
///
/// As a matrix it is `(ny + 1) x (nx + 1)`: row 0 holds the ascending x
/// headers, column 0 the descending y headers, the corner is NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformityGrid {
    x: Vec<f64>,
    y: Vec<f64>,
    heights: Vec<f64>,
}

impl UniformityGrid {
    /// Empty grid; `x` must be ascending and `y` descending.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        let heights = vec![0.0; x.len() * y.len()];
        UniformityGrid { x, y, heights }
    }

    /// Column headers (ascending).
    pub fn x_headers(&self) -> &[f64] {
        &self.x
    }

    /// Row headers (descending).
    pub fn y_headers(&self) -> &[f64] {
        &self.y
    }

    /// Matrix shape including the header row and column.
    pub fn shape(&self) -> (usize, usize) {
        (self.y.len() + 1, self.x.len() + 1)
    }

    /// Find the single cell whose headers lie within `tolerance` of (x, y).
    pub fn resolve(&self, x: CoordinateValue, y: CoordinateValue, tolerance: f64) -> Result<GridCell> {
        let col = unique_match(&self.x, x, tolerance, Axis::X)?;
        let row = unique_match(&self.y, y, tolerance, Axis::Y)?;
        Ok(GridCell {
            row: row + 1,
            col: col + 1,
        })
    }

    pub fn height(&self, cell: GridCell) -> f64 {
        self.heights[self.offset(cell)]
    }

    pub fn set_height(&mut self, cell: GridCell, height: f64) {
        let i = self.offset(cell);
        self.heights[i] = height;
    }

    fn offset(&self, cell: GridCell) -> usize {
        (cell.row - 1) * self.x.len() + (cell.col - 1)
    }

    /// The full matrix, header row and column included.
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        let mut rows = Vec::with_capacity(self.y.len() + 1);

        let mut header = Vec::with_capacity(self.x.len() + 1);
        header.push(f64::NAN);
        header.extend_from_slice(&self.x);
        rows.push(header);

        for (r, &y) in self.y.iter().enumerate() {
            let mut row = Vec::with_capacity(self.x.len() + 1);
            row.push(y);
            row.extend_from_slice(&self.heights[r * self.x.len()..(r + 1) * self.x.len()]);
            rows.push(row);
        }
        rows
    }
}

fn unique_match(headers: &[f64], value: CoordinateValue, tolerance: f64, axis: Axis) -> Result<usize> {
    let mut hits = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| value.is_close(**h, tolerance))
        .map(|(i, _)| i);

    match (hits.next(), hits.count()) {
        (Some(i), 0) => Ok(i),
        (first, rest) => Err(UniformityError::CoordinateMatchFailure {
            axis,
            value: value.get(),
            matches: usize::from(first.is_some()) + rest,
        }),
    }
}
