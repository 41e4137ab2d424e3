// ---------------------------------------------------------------------------
// HeightHistogram – equal-width bins over min..max
// ---------------------------------------------------------------------------

/// Frequency histogram with `n` equal-width bins spanning the sample range.
///
/// Bins are half-open `[lo, hi)` except the last, which includes the maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightHistogram {
    edges: Vec<f64>,
    counts: Vec<u64>,
}

impl HeightHistogram {
    /// `values` must be non-empty and finite; `n_bins` must be > 0.
    pub fn new(values: &[f64], n_bins: usize) -> Self {
        let n_bins = n_bins.max(1);
        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let step = (hi - lo) / n_bins as f64;
        let mut edges: Vec<f64> = (0..=n_bins).map(|i| lo + i as f64 * step).collect();
        edges[n_bins] = hi;

        let mut counts = vec![0u64; n_bins];
        let scale = n_bins as f64 / (hi - lo);
        for &v in values {
            let mut i = (((v - lo) * scale) as usize).min(n_bins - 1);
            // Rounding can land one bin off; settle against the stored edges.
            if i > 0 && v < edges[i] {
                i -= 1;
            } else if i + 1 < n_bins && v >= edges[i + 1] {
                i += 1;
            }
            counts[i] += 1;
        }

        HeightHistogram { edges, counts }
    }

    /// `n_bins + 1` ascending boundaries.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    #[cfg(test)]
    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// Bin centres.
    pub fn midpoints(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    #[cfg(test)]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Counts as floats, for the peak search.
    pub fn counts_f64(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| c as f64).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_span_min_to_max() {
        let h = HeightHistogram::new(&[0.0, 1.0, 2.0, 10.0], 5);
        assert_eq!(h.edges(), &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(h.midpoints(), vec![1.0, 3.0, 5.0, 7.0, 9.0]);
        assert_eq!(h.bin_width(), 2.0);
    }

    #[test]
    fn left_edge_inclusive_last_bin_closed() {
        let h = HeightHistogram::new(&[0.0, 1.0, 2.0, 10.0], 5);
        assert_eq!(h.counts(), &[2, 1, 0, 0, 1]);
        assert_eq!(h.total(), 4);
    }

    #[test]
    fn constant_sample_gets_unit_range() {
        let h = HeightHistogram::new(&[3.0, 3.0, 3.0], 2);
        assert_eq!(h.edges(), &[2.5, 3.0, 3.5]);
        assert_eq!(h.counts(), &[0, 3]);
    }

    #[test]
    fn every_value_is_counted() {
        let values: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.731).sin() * 7.3).collect();
        let h = HeightHistogram::new(&values, 100);
        assert_eq!(h.n_bins(), 100);
        assert_eq!(h.total(), 1000);
    }
}
