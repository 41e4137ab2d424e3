use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Which input a missing file was supposed to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Manifest,
    ScanFile,
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRole::Manifest => write!(f, "scan position manifest"),
            FileRole::ScanFile => write!(f, "scan file"),
        }
    }
}

/// Grid axis used when a coordinate cannot be resolved to a single header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// A position that could not contribute a height to the grid.
#[derive(Debug)]
pub struct PositionFailure {
    pub file_name: String,
    pub error: UniformityError,
}

impl fmt::Display for PositionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_name, self.error)
    }
}

#[derive(Debug, Error)]
pub enum UniformityError {
    #[error("{role} not found: {}", .path.display())]
    FileNotFound { role: FileRole, path: PathBuf },

    #[error("malformed input in {}: {reason}", .path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("no valid height samples left after removing sentinel values")]
    EmptySample,

    #[error("found {found} peak(s), at least two are needed for a step height")]
    InsufficientPeaks { found: usize },

    #[error("{axis} = {value} matched {matches} grid header(s) within tolerance, expected exactly one")]
    CoordinateMatchFailure {
        axis: Axis,
        value: f64,
        matches: usize,
    },

    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} position(s) failed:\n{}", .failures.len(), list_failures(.failures))]
    Incomplete { failures: Vec<PositionFailure> },
}

fn list_failures(failures: &[PositionFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  {f}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl UniformityError {
    /// Map an I/O error, turning `NotFound` into [`UniformityError::FileNotFound`].
    pub fn from_io(role: FileRole, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            UniformityError::FileNotFound { role, path }
        } else {
            UniformityError::Io { path, source }
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        UniformityError::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UniformityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_becomes_file_not_found() {
        let err = UniformityError::from_io(
            FileRole::Manifest,
            "positions.txt",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(
            err,
            UniformityError::FileNotFound { role: FileRole::Manifest, .. }
        ));
        assert_eq!(
            err.to_string(),
            "scan position manifest not found: positions.txt"
        );
    }

    #[test]
    fn incomplete_lists_every_position() {
        let err = UniformityError::Incomplete {
            failures: vec![
                PositionFailure {
                    file_name: "(0, 0).txt".into(),
                    error: UniformityError::EmptySample,
                },
                PositionFailure {
                    file_name: "(1, 0).txt".into(),
                    error: UniformityError::InsufficientPeaks { found: 1 },
                },
            ],
        };
        let text = err.to_string();
        assert!(text.starts_with("2 position(s) failed"));
        assert!(text.contains("(0, 0).txt: no valid height samples"));
        assert!(text.contains("(1, 0).txt: found 1 peak(s)"));
    }
}
