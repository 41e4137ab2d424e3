use std::path::Path;

use anyhow::{bail, Result};

use crate::color::HeightColorMap;
use crate::config::RunConfig;
use crate::data::export::write_grid;
use crate::pipeline::{self, PositionOutcome, RunOutcome};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    /// Detector and matching settings used for runs started from the UI.
    pub config: RunConfig,

    /// Last finished run (None until a run completes).
    pub outcome: Option<RunOutcome>,

    /// Index into `outcome.positions` shown in the plot.
    pub selected: Option<usize>,

    /// Height → colour for the position list.
    pub color_map: Option<HeightColorMap>,

    /// Draw the raw-histogram peaks next to the density peaks.
    pub show_histogram_peaks: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            outcome: None,
            selected: None,
            color_map: None,
            show_histogram_peaks: true,
            status_message: None,
        }
    }

    /// Ingest a finished run, select its first position and rebuild colours.
    pub fn set_outcome(&mut self, outcome: RunOutcome) {
        self.color_map = HeightColorMap::new(outcome.positions.iter().filter_map(|p| p.height()));
        self.selected = (!outcome.positions.is_empty()).then_some(0);
        self.status_message = match outcome.failure_count() {
            0 => None,
            n => Some(format!("{n} position(s) failed")),
        };
        self.outcome = Some(outcome);
    }

    /// Run the pipeline and show its result.
    pub fn run(&mut self, manifest: &Path, data_dir: &Path) {
        match pipeline::run(manifest, data_dir, &self.config) {
            Ok(outcome) => self.set_outcome(outcome),
            Err(e) => {
                log::error!("Run failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn select(&mut self, index: usize) {
        if self.outcome.as_ref().is_some_and(|o| index < o.positions.len()) {
            self.selected = Some(index);
        }
    }

    pub fn selected_position(&self) -> Option<&PositionOutcome> {
        let outcome = self.outcome.as_ref()?;
        outcome.positions.get(self.selected?)
    }

    /// Write the grid; refused while any position is missing its height.
    pub fn save_grid(&self, path: &Path) -> Result<()> {
        let Some(outcome) = &self.outcome else {
            bail!("nothing to save, run an analysis first");
        };
        if !outcome.is_complete() {
            bail!(
                "{} position(s) failed, the grid would be incomplete",
                outcome.failure_count()
            );
        }
        write_grid(&outcome.grid, path)?;
        Ok(())
    }
}
