/// Peak detection: reduce a scan's height samples to its two dominant levels.
///
/// ```text
///  HeightSamples
///        │
///        ├──► histogram ──► find_peaks (30% prominence) ──► coarse PeakSet
///        │        │
///        │        ▼ edges, midpoints, bin width
///        └──► density (Gaussian KDE) ──► find_peaks (10%) ──► refined PeakSet
///                                                                 │
///                                                   step = p[1] - p[0]
/// ```
///
/// Only the refined set feeds the step height; the coarse one is kept for
/// visual cross-checking in the viewer.

pub mod density;
pub mod histogram;
pub mod peaks;

use serde::Serialize;

use crate::data::model::HeightSamples;
use crate::error::{Result, UniformityError};

use density::SmoothedDensity;
use histogram::HeightHistogram;
use peaks::{find_peaks, PeakCriteria};

// ---------------------------------------------------------------------------
// Detector configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    pub n_bins: usize,
    /// KDE kernel width relative to the sample standard deviation.
    pub bandwidth_factor: f64,
    pub histogram_criteria: PeakCriteria,
    pub density_criteria: PeakCriteria,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            n_bins: 100,
            bandwidth_factor: 0.05,
            histogram_criteria: PeakCriteria {
                min_distance: 10,
                rel_prominence: 0.3,
            },
            density_criteria: PeakCriteria {
                min_distance: 10,
                rel_prominence: 0.1,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// PeakSet
// ---------------------------------------------------------------------------

/// Detected peak heights, ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeakSet(Vec<f64>);

impl PeakSet {
    pub fn from_indices(positions: &[f64], indices: &[usize]) -> Self {
        let mut peaks: Vec<f64> = indices.iter().map(|&i| positions[i]).collect();
        peaks.sort_by(|a, b| a.total_cmp(b));
        PeakSet(peaks)
    }

    pub fn positions(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gap between the two lowest peaks. Extra peaks above them are ignored.
    pub fn step_height(&self) -> Result<f64> {
        match self.0.as_slice() {
            [low, high, ..] => Ok(high - low),
            other => Err(UniformityError::InsufficientPeaks { found: other.len() }),
        }
    }
}

// ---------------------------------------------------------------------------
// PeakAnalysis – everything computed for one scan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PeakAnalysis {
    pub n_samples: usize,
    pub histogram: HeightHistogram,
    /// `None` when the sample has no spread.
    pub density: Option<SmoothedDensity>,
    /// From the raw histogram.
    pub coarse_peaks: PeakSet,
    /// From the smoothed density; the one used for step heights.
    pub peaks: PeakSet,
}

impl PeakAnalysis {
    pub fn step_height(&self) -> Result<f64> {
        if self.density.is_none() {
            // A sample without spread is a single level.
            return Err(UniformityError::InsufficientPeaks { found: 1 });
        }
        self.peaks.step_height()
    }
}

// ---------------------------------------------------------------------------
// PeakDetector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct PeakDetector {
    config: DetectorConfig,
}

impl PeakDetector {
    pub fn new(config: DetectorConfig) -> Self {
        PeakDetector { config }
    }

    /// Histogram, density and both peak sets for one scan.
    pub fn analyze(&self, samples: &HeightSamples) -> PeakAnalysis {
        let histogram = HeightHistogram::new(samples, self.config.n_bins);
        let midpoints = histogram.midpoints();

        let coarse_idx = find_peaks(&histogram.counts_f64(), &self.config.histogram_criteria);
        let coarse_peaks = PeakSet::from_indices(&midpoints, &coarse_idx);

        let density = SmoothedDensity::estimate(
            samples,
            samples.std_dev(),
            &histogram,
            self.config.bandwidth_factor,
        );
        let peaks = match &density {
            Some(kde) => {
                let idx = find_peaks(kde.values(), &self.config.density_criteria);
                PeakSet::from_indices(kde.positions(), &idx)
            }
            None => PeakSet::default(),
        };

        log::debug!(
            "{} samples, range {:.4}..{:.4}, histogram peaks {:?}, density peaks {:?}",
            samples.len(),
            samples.min(),
            samples.max(),
            coarse_peaks.positions(),
            peaks.positions()
        );

        PeakAnalysis {
            n_samples: samples.len(),
            histogram,
            density,
            coarse_peaks,
            peaks,
        }
    }

    /// The refined peak set, which must hold at least two peaks.
    #[cfg(test)]
    pub fn detect(&self, samples: &HeightSamples) -> Result<PeakSet> {
        let analysis = self.analyze(samples);
        analysis.step_height()?;
        Ok(analysis.peaks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic Gaussian cluster: values on a fine grid, each repeated
    /// in proportion to the normal density.
    fn cluster(mean: f64, sigma: f64, peak_count: f64) -> Vec<f64> {
        let step = sigma / 200.0;
        let mut out = Vec::new();
        for i in -600..=600 {
            let z = i as f64 * step / sigma;
            let n = (peak_count * (-0.5 * z * z).exp()).round() as usize;
            out.extend(std::iter::repeat(mean + i as f64 * step).take(n));
        }
        out
    }

    #[test]
    fn two_clusters_give_two_peaks_at_their_means() {
        let mut values = cluster(10.0, 0.5, 20.0);
        values.extend(cluster(50.0, 0.5, 20.0));
        let samples = HeightSamples::new(values).unwrap();

        let detector = PeakDetector::default();
        let analysis = detector.analyze(&samples);
        let bin = analysis.histogram.bin_width();

        let peaks = detector.detect(&samples).unwrap();
        assert_eq!(peaks.len(), 2, "{:?}", peaks);
        assert!((peaks.positions()[0] - 10.0).abs() <= bin);
        assert!((peaks.positions()[1] - 50.0).abs() <= bin);

        let height = peaks.step_height().unwrap();
        assert!((height - 40.0).abs() <= bin, "height = {height}");
    }

    #[test]
    fn unequal_clusters_still_resolve() {
        let mut values = cluster(-3.0, 0.2, 40.0);
        values.extend(cluster(2.0, 0.3, 8.0));
        let samples = HeightSamples::new(values).unwrap();

        let analysis = PeakDetector::default().analyze(&samples);
        let bin = analysis.histogram.bin_width();
        let h = analysis.step_height().unwrap();
        assert!((h - 5.0).abs() <= 2.0 * bin, "height = {h}");
    }

    #[test]
    fn single_gaussian_has_insufficient_peaks() {
        let samples = HeightSamples::new(cluster(0.0, 1.0, 50.0)).unwrap();
        let err = PeakDetector::default().detect(&samples).unwrap_err();
        assert!(matches!(err, UniformityError::InsufficientPeaks { found: 1 }));
    }

    #[test]
    fn flat_scan_has_insufficient_peaks() {
        let samples = HeightSamples::new(vec![7.0; 64]).unwrap();
        let analysis = PeakDetector::default().analyze(&samples);
        assert!(analysis.density.is_none());
        assert!(matches!(
            analysis.step_height(),
            Err(UniformityError::InsufficientPeaks { found: 1 })
        ));
    }

    #[test]
    fn step_uses_lowest_two_peaks() {
        let set = PeakSet(vec![1.0, 4.0, 9.0]);
        assert_eq!(set.step_height().unwrap(), 3.0);
        assert!(matches!(
            PeakSet(vec![2.0]).step_height(),
            Err(UniformityError::InsufficientPeaks { found: 1 })
        ));
    }

    #[test]
    fn coarse_peaks_are_kept_for_cross_check() {
        let mut values = vec![0.0; 500];
        values.extend(vec![10.0; 500]);
        let samples = HeightSamples::new(values).unwrap();
        let analysis = PeakDetector::default().analyze(&samples);
        assert_eq!(analysis.coarse_peaks.len(), 2);
        assert_eq!(analysis.peaks.len(), 2);
    }

    #[test]
    fn flat_levels_at_range_ends_give_exact_step() {
        let mut values = vec![10.0; 120];
        values.extend(vec![50.0; 120]);
        let samples = HeightSamples::new(values).unwrap();
        let analysis = PeakDetector::default().analyze(&samples);
        assert_eq!(analysis.peaks.positions(), &[10.0, 50.0]);
        assert_eq!(analysis.step_height().unwrap(), 40.0);
    }
}
