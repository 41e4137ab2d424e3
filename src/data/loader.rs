use std::path::Path;

use crate::error::{FileRole, Result, UniformityError};

use super::filter::{drop_sentinels, SENTINEL_LIMIT};
use super::model::HeightSamples;

// ---------------------------------------------------------------------------
// Scan file format
// ---------------------------------------------------------------------------

/// Layout of a profilometer scan export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanFormat {
    /// Metadata lines before the height matrix.
    pub header_lines: usize,
    /// See [`SENTINEL_LIMIT`].
    pub sentinel_limit: f64,
}

impl Default for ScanFormat {
    fn default() -> Self {
        ScanFormat {
            header_lines: 3,
            sentinel_limit: SENTINEL_LIMIT,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one scan file and return its valid height samples.
///
/// Expected layout:
///
/// ```text
/// <metadata line>
/// <metadata line>
/// <metadata line>
/// 0.12   0.14   1e38   0.11
/// 0.13   0.15   0.16   0.10
/// ...
/// ```
///
/// The metadata lines are skipped unread, so they may be in any encoding;
/// only the matrix has to be UTF-8.
///
/// Rows must all have the same number of columns. The matrix is flattened
/// row-major and sentinel pixels are removed; a scan with nothing left is
/// [`UniformityError::EmptySample`].
pub fn load_scan(path: &Path, format: &ScanFormat) -> Result<HeightSamples> {
    let bytes =
        std::fs::read(path).map_err(|e| UniformityError::from_io(FileRole::ScanFile, path, e))?;

    let body = skip_lines(&bytes, format.header_lines);
    let text = std::str::from_utf8(body).map_err(|e| {
        UniformityError::malformed(
            path,
            format!("height matrix is not valid UTF-8 (byte {} of the matrix)", e.valid_up_to() + 1),
        )
    })?;

    let matrix = parse_matrix(text, format.header_lines)
        .map_err(|reason| UniformityError::malformed(path, reason))?;

    let n_raw: usize = matrix.iter().map(Vec::len).sum();
    let values = drop_sentinels(matrix.into_iter().flatten(), format.sentinel_limit);
    log::debug!(
        "{}: {} of {} pixels valid",
        path.display(),
        values.len(),
        n_raw
    );

    HeightSamples::new(values)
}

/// Everything after the first `n` newline-terminated lines.
fn skip_lines(bytes: &[u8], n: usize) -> &[u8] {
    let mut rest = bytes;
    for _ in 0..n {
        match rest.iter().position(|&b| b == b'\n') {
            Some(i) => rest = &rest[i + 1..],
            None => return &[],
        }
    }
    rest
}

/// Parse the whitespace-delimited matrix that follows `skip` header lines.
///
/// Blank lines and `#` comments are ignored. Line numbers in errors count
/// from the top of the file.
fn parse_matrix(text: &str, skip: usize) -> std::result::Result<Vec<Vec<f64>>, String> {
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line_no, line) in text.lines().enumerate().map(|(i, l)| (i + skip, l)) {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let row = line
            .split_whitespace()
            .enumerate()
            .map(|(col, tok)| {
                tok.parse::<f64>().map_err(|_| {
                    format!("line {}, column {}: '{tok}' is not a number", line_no + 1, col + 1)
                })
            })
            .collect::<std::result::Result<Vec<f64>, String>>()?;

        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(format!(
                    "line {} has {} values, expected {}",
                    line_no + 1,
                    row.len(),
                    first.len()
                ));
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(format!("no height rows after {skip} header line(s)"));
    }
    Ok(rows)
}
