use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::analysis::DetectorConfig;
use crate::cli::Args;
use crate::data::loader::ScanFormat;

/// Coordinates closer than this are treated as the same grid header.
pub const DEFAULT_TOLERANCE: f64 = 0.1;

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Every tunable of a uniformity run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    pub format: ScanFormat,
    pub detector: DetectorConfig,
    /// Absolute tolerance when matching a position to grid headers.
    pub tolerance: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            format: ScanFormat::default(),
            detector: DetectorConfig::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl RunConfig {
    pub fn from_args(args: &Args) -> Self {
        let mut config = RunConfig::default();
        config.detector.n_bins = args.bins;
        config.detector.bandwidth_factor = args.bandwidth;
        config.tolerance = args.tolerance;
        config.format.header_lines = args.header_lines;
        config
    }
}

// ---------------------------------------------------------------------------
// Input / output locations
// ---------------------------------------------------------------------------

/// Manifest, scan directory and output file of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub manifest: PathBuf,
    pub data_dir: PathBuf,
    pub output: PathBuf,
}

impl RunPaths {
    /// Take paths from the command line, asking for any that are missing.
    pub fn resolve(args: &Args) -> Result<Self> {
        let manifest = match &args.manifest {
            Some(p) => p.clone(),
            None => pick_manifest(None)?,
        };
        let data_dir = match &args.data_dir {
            Some(p) => p.clone(),
            None => pick_data_dir(manifest.parent())?,
        };
        let output = match &args.output {
            Some(p) => p.clone(),
            None => pick_output(Some(&data_dir))?,
        };
        Ok(RunPaths {
            manifest,
            data_dir,
            output,
        })
    }
}

// ---------------------------------------------------------------------------
// Dialogs
// ---------------------------------------------------------------------------

pub fn pick_manifest(start: Option<&Path>) -> Result<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Select the Scan Positions file")
        .add_filter("Text files", &["txt"])
        .add_filter("All files", &["*"]);
    if let Some(dir) = start {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file().context("no scan positions file selected")
}

pub fn pick_data_dir(start: Option<&Path>) -> Result<PathBuf> {
    let mut dialog =
        rfd::FileDialog::new().set_title("Select the Folder Containing Your Scan Files");
    if let Some(dir) = start {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_folder().context("no scan data folder selected")
}

pub fn pick_output(start: Option<&Path>) -> Result<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Save your TSV results")
        .add_filter("TSV files", &["tsv"])
        .set_file_name("uniformity.tsv");
    if let Some(dir) = start {
        dialog = dialog.set_directory(dir);
    }
    dialog.save_file().context("no output file selected")
}
