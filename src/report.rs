use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::PeakSet;
use crate::pipeline::RunOutcome;

// ---------------------------------------------------------------------------
// JSON run summary
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PositionReport<'a> {
    pub file_name: &'a str,
    pub x: &'a str,
    pub y: &'a str,
    pub n_samples: Option<usize>,
    pub histogram_peaks: Option<&'a PeakSet>,
    pub density_peaks: Option<&'a PeakSet>,
    pub height: Option<f64>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub complete: bool,
    pub failures: usize,
    pub positions: Vec<PositionReport<'a>>,
}

impl<'a> RunReport<'a> {
    pub fn new(outcome: &'a RunOutcome) -> Self {
        let positions = outcome
            .positions
            .iter()
            .map(|p| PositionReport {
                file_name: &p.file_name,
                x: p.position.x.as_str(),
                y: p.position.y.as_str(),
                n_samples: p.analysis.as_ref().map(|a| a.n_samples),
                histogram_peaks: p.analysis.as_ref().map(|a| &a.coarse_peaks),
                density_peaks: p.analysis.as_ref().map(|a| &a.peaks),
                height: p.height(),
                error: p.result.as_ref().err().map(|e| e.to_string()),
            })
            .collect();

        RunReport {
            complete: outcome.is_complete(),
            failures: outcome.failure_count(),
            positions,
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating report {}", path.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)
            .context("writing JSON report")?;
        log::info!("Wrote run report to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::pipeline::run;

    #[test]
    fn report_lists_heights_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("positions.txt");
        std::fs::write(&manifest, "x,y\n0,0\n1,0\n").unwrap();
        std::fs::write(
            dir.path().join("(0, 0).txt"),
            "h\nh\nh\n1 1 1 1 5 5 5 5\n1 1 1 1 5 5 5 5\n",
        )
        .unwrap();

        let outcome = run(&manifest, dir.path(), &RunConfig::default()).unwrap();
        let report = RunReport::new(&outcome);
        let path = dir.path().join("report.json");
        report.write(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["complete"], false);
        assert_eq!(json["failures"], 1);
        assert_eq!(json["positions"][0]["file_name"], "(0, 0).txt");
        assert_eq!(json["positions"][0]["n_samples"], 16);
        assert!(json["positions"][0]["height"].as_f64().unwrap() > 3.8);
        assert!(json["positions"][1]["height"].is_null());
        assert!(json["positions"][1]["error"]
            .as_str()
            .unwrap()
            .contains("scan file not found"));
    }
}
