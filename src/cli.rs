use std::path::PathBuf;

use clap::Parser;

/// Build a step-height uniformity grid from Profilm scan files.
///
/// Any of the three paths left out is asked for with a file dialog.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Scan positions file (header line, then `x,y` per line)
    #[arg(long, short = 'm')]
    pub manifest: Option<PathBuf>,

    /// Folder containing the `(x, y).txt` scan files
    #[arg(long, short = 'd')]
    pub data_dir: Option<PathBuf>,

    /// Output TSV file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Write a JSON summary of every position
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Histogram bin count
    #[arg(long, default_value_t = 100, value_parser = bin_count)]
    pub bins: usize,

    /// KDE bandwidth relative to the sample standard deviation
    #[arg(long, default_value_t = 0.05, value_parser = positive_finite)]
    pub bandwidth: f64,

    /// Absolute tolerance when matching positions to grid headers
    #[arg(long, default_value_t = 0.1, value_parser = non_negative_finite)]
    pub tolerance: f64,

    /// Metadata lines at the top of each scan file
    #[arg(long, default_value_t = 3)]
    pub header_lines: usize,

    /// Open the peak inspection viewer instead of writing the grid directly
    #[arg(long, default_value_t = false)]
    pub view: bool,
}

fn parse_float(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("'{s}' is not finite"))
    }
}

fn positive_finite(s: &str) -> Result<f64, String> {
    match parse_float(s)? {
        v if v > 0.0 => Ok(v),
        _ => Err("must be greater than 0".to_string()),
    }
}

fn non_negative_finite(s: &str) -> Result<f64, String> {
    match parse_float(s)? {
        v if v >= 0.0 => Ok(v),
        _ => Err("must not be negative".to_string()),
    }
}

fn bin_count(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("at least one bin is needed".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{s}' is not a whole number")),
    }
}
