use std::f64::consts::PI;

use super::histogram::HeightHistogram;

/// Kernel contributions beyond this many bandwidths are below 1e-14 and skipped.
const KERNEL_CUTOFF: f64 = 8.0;

// ---------------------------------------------------------------------------
// SmoothedDensity – Gaussian KDE on the histogram midpoints
// ---------------------------------------------------------------------------

/// Gaussian kernel density estimate scaled to expected counts per bin
/// (`pdf * bin_width * n`), so it overlays the raw histogram.
///
/// Evaluated at the outer histogram edges (sample minimum and maximum) and at
/// every bin midpoint in between, so `n_bins + 2` points. A level sitting at
/// either end of the range peaks on its own value instead of half a bin
/// inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedDensity {
    positions: Vec<f64>,
    values: Vec<f64>,
    bandwidth: f64,
}

impl SmoothedDensity {
    /// Kernel width is `bandwidth_factor` times the sample standard deviation.
    ///
    /// Returns `None` when the sample has no spread (every value identical or
    /// fewer than two values), since no kernel width can be derived from it.
    pub fn estimate(
        values: &[f64],
        std_dev: f64,
        histogram: &HeightHistogram,
        bandwidth_factor: f64,
    ) -> Option<Self> {
        let bandwidth = bandwidth_factor * std_dev;
        if !(bandwidth > 0.0) || !bandwidth.is_finite() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len() as f64;
        let norm = 1.0 / (n * bandwidth * (2.0 * PI).sqrt());
        let scale = histogram.bin_width() * n;
        let reach = KERNEL_CUTOFF * bandwidth;

        let positions = evaluation_points(histogram);
        let values = positions
            .iter()
            .map(|&x| {
                let lo = sorted.partition_point(|&v| v < x - reach);
                let hi = sorted.partition_point(|&v| v <= x + reach);
                let sum: f64 = sorted[lo..hi]
                    .iter()
                    .map(|&v| {
                        let z = (x - v) / bandwidth;
                        (-0.5 * z * z).exp()
                    })
                    .sum();
                sum * norm * scale
            })
            .collect();

        Some(SmoothedDensity {
            positions,
            values,
            bandwidth,
        })
    }

    /// Evaluation points: lowest edge, midpoints, highest edge.
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Expected counts per bin at each position.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

fn evaluation_points(histogram: &HeightHistogram) -> Vec<f64> {
    let edges = histogram.edges();
    let mut points = Vec::with_capacity(edges.len() + 1);
    points.push(edges[0]);
    points.extend(histogram.midpoints());
    points.push(edges[edges.len() - 1]);
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spread_sample() -> Vec<f64> {
        (0..2000).map(|i| (i as f64 / 2000.0) * 20.0 - 10.0).collect()
    }

    #[test]
    fn scaled_density_sums_to_sample_count() {
        let values = spread_sample();
        let hist = HeightHistogram::new(&values, 100);
        let std = 20.0 / 12f64.sqrt();
        let kde = SmoothedDensity::estimate(&values, std, &hist, 0.05).unwrap();

        // Interior mass is complete; only the kernel tails past the ends are lost.
        let total: f64 = kde.values()[1..=100].iter().sum();
        assert!(total > 1900.0 && total < 2000.0, "total = {total}");
        assert_eq!(kde.positions().len(), 102);
        assert!((kde.bandwidth() - 0.05 * std).abs() < 1e-12);
    }

    #[test]
    fn uniform_interior_matches_histogram_counts() {
        let values = spread_sample();
        let hist = HeightHistogram::new(&values, 100);
        let kde = SmoothedDensity::estimate(&values, 5.77, &hist, 0.05).unwrap();
        // 2000 evenly spaced values in 100 bins → 20 per bin.
        let mid = kde.values()[51];
        assert!((mid - 20.0).abs() < 0.5, "mid = {mid}");
    }

    #[test]
    fn range_ends_are_evaluated() {
        let values = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let hist = HeightHistogram::new(&values, 10);
        let kde = SmoothedDensity::estimate(&values, 0.5, &hist, 0.05).unwrap();
        let points = kde.positions();
        assert_eq!(points.len(), 12);
        assert_eq!(points[0], 0.0);
        assert!((points[1] - 0.05).abs() < 1e-12);
        assert_eq!(points[11], 1.0);
        // Both levels are densest exactly on their own value.
        assert!(kde.values()[0] > kde.values()[1]);
        assert!(kde.values()[11] > kde.values()[10]);
    }

    #[test]
    fn zero_spread_has_no_density() {
        let values = [4.0; 10];
        let hist = HeightHistogram::new(&values, 10);
        assert!(SmoothedDensity::estimate(&values, 0.0, &hist, 0.05).is_none());
    }
}
