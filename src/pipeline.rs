use std::collections::HashMap;
use std::path::Path;

use crate::analysis::{PeakAnalysis, PeakDetector};
use crate::config::RunConfig;
use crate::data::grid::{read_manifest, ScanLayout};
use crate::data::loader::load_scan;
use crate::data::model::{GridCell, ScanPosition, UniformityGrid};
use crate::error::{PositionFailure, Result, UniformityError};

// ---------------------------------------------------------------------------
// Per-position results
// ---------------------------------------------------------------------------

/// What happened to one manifest position.
#[derive(Debug)]
pub struct PositionOutcome {
    pub position: ScanPosition,
    pub file_name: String,
    /// Present whenever the scan could be loaded.
    pub analysis: Option<PeakAnalysis>,
    /// Cell written and the height written into it.
    pub result: Result<(GridCell, f64)>,
}

impl PositionOutcome {
    pub fn height(&self) -> Option<f64> {
        self.result.as_ref().ok().map(|&(_, h)| h)
    }
}

/// A finished run: the grid plus one outcome per manifest line.
#[derive(Debug)]
pub struct RunOutcome {
    pub grid: UniformityGrid,
    pub positions: Vec<PositionOutcome>,
}

impl RunOutcome {
    pub fn failure_count(&self) -> usize {
        self.positions.iter().filter(|p| p.result.is_err()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.failure_count() == 0
    }

    /// The grid if every position produced a height, otherwise every failure.
    pub fn into_grid(self) -> Result<UniformityGrid> {
        let failures: Vec<PositionFailure> = self
            .positions
            .into_iter()
            .filter_map(|p| match p.result {
                Ok(_) => None,
                Err(error) => Some(PositionFailure {
                    file_name: p.file_name,
                    error,
                }),
            })
            .collect();

        if failures.is_empty() {
            Ok(self.grid)
        } else {
            Err(UniformityError::Incomplete { failures })
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Read the manifest and measure every listed scan in `data_dir`.
///
/// Only a manifest problem is an `Err` here; per-position failures are
/// collected in the outcome so all of them can be reported together.
pub fn run(manifest: &Path, data_dir: &Path, config: &RunConfig) -> Result<RunOutcome> {
    let layout = read_manifest(manifest)?;
    Ok(run_layout(layout, data_dir, config))
}

/// Measure every position of an already-read layout.
pub fn run_layout(layout: ScanLayout, data_dir: &Path, config: &RunConfig) -> RunOutcome {
    let ScanLayout { positions, mut grid } = layout;
    let detector = PeakDetector::new(config.detector);
    let mut written: HashMap<GridCell, String> = HashMap::new();

    let outcomes: Vec<PositionOutcome> = positions
        .into_iter()
        .map(|position| {
            let file_name = position.file_name();
            let (analysis, result) = measure(&file_name, data_dir, &grid, &detector, config);

            match &result {
                Ok((cell, height)) => {
                    grid.set_height(*cell, *height);
                    if let Some(previous) = written.insert(*cell, file_name.clone()) {
                        log::warn!("{file_name} overwrites the height from {previous}");
                    }
                    log::debug!("{file_name}: step height {height:.4}");
                }
                Err(e) => log::error!("{file_name}: {e}"),
            }

            PositionOutcome {
                position,
                file_name,
                analysis,
                result,
            }
        })
        .collect();

    let outcome = RunOutcome {
        grid,
        positions: outcomes,
    };
    log::info!(
        "Measured {} of {} positions",
        outcome.positions.len() - outcome.failure_count(),
        outcome.positions.len()
    );
    outcome
}

/// Load → analyze → locate for one scan file.
fn measure(
    file_name: &str,
    data_dir: &Path,
    grid: &UniformityGrid,
    detector: &PeakDetector,
    config: &RunConfig,
) -> (Option<PeakAnalysis>, Result<(GridCell, f64)>) {
    let path = data_dir.join(file_name);
    let samples = match load_scan(&path, &config.format) {
        Ok(s) => s,
        Err(e) => return (None, Err(e)),
    };

    let analysis = detector.analyze(&samples);
    let result = analysis.step_height().and_then(|height| {
        let position = ScanPosition::from_file_name(file_name).ok_or_else(|| {
            UniformityError::malformed(&path, "file name is not of the form (x, y).txt")
        })?;
        let cell = grid.resolve(position.x.value(), position.y.value(), config.tolerance)?;
        Ok((cell, height))
    });

    (Some(analysis), result)
}
