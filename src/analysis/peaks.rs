// ---------------------------------------------------------------------------
// Local-maximum search with distance and prominence selection
// ---------------------------------------------------------------------------

/// Acceptance rules for [`find_peaks`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakCriteria {
    /// Minimum index distance between two kept peaks.
    pub min_distance: usize,
    /// Minimum prominence as a fraction of the curve's maximum.
    pub rel_prominence: f64,
}

/// Indices (ascending) of the peaks of `curve` that satisfy `criteria`.
///
/// The curve is treated as a density: zero outside its ends, so a maximum at
/// the first or last sample can still be a peak.
pub fn find_peaks(curve: &[f64], criteria: &PeakCriteria) -> Vec<usize> {
    if curve.is_empty() {
        return Vec::new();
    }

    let mut padded = Vec::with_capacity(curve.len() + 2);
    padded.push(0.0);
    padded.extend_from_slice(curve);
    padded.push(0.0);

    let max = curve.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_prominence = max * criteria.rel_prominence;

    let candidates = local_maxima(&padded);
    let spaced = select_by_distance(&padded, &candidates, criteria.min_distance);

    spaced
        .into_iter()
        .filter(|&p| prominence(&padded, p) >= min_prominence)
        .map(|p| p - 1)
        .collect()
}

/// Interior local maxima. A flat top counts once, at its middle (rounded down).
pub fn local_maxima(y: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if y.len() < 3 {
        return peaks;
    }

    let last = y.len() - 1;
    let mut i = 1;
    while i < last {
        if y[i - 1] < y[i] {
            let mut ahead = i + 1;
            while ahead < last && y[ahead] == y[i] {
                ahead += 1;
            }
            if y[ahead] < y[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
                continue;
            }
        }
        i += 1;
    }
    peaks
}

/// Keep the tallest peaks first, dropping any closer than `distance` to a
/// peak already kept. `peaks` must be ascending; the result is too.
pub fn select_by_distance(y: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    if distance <= 1 {
        return peaks.to_vec();
    }

    let mut keep = vec![true; peaks.len()];
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| y[peaks[a]].total_cmp(&y[peaks[b]]));

    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }
        for k in (0..j).rev() {
            if peaks[j] - peaks[k] >= distance {
                break;
            }
            keep[k] = false;
        }
        for k in j + 1..peaks.len() {
            if peaks[k] - peaks[j] >= distance {
                break;
            }
            keep[k] = false;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter(|(_, k)| *k)
        .map(|(&p, _)| p)
        .collect()
}

/// Height of `peak` above the higher of its two bases.
///
/// Each base is the lowest sample between the peak and the first strictly
/// higher sample on that side (or the curve end).
pub fn prominence(y: &[f64], peak: usize) -> f64 {
    let top = y[peak];

    let mut left_min = top;
    for &v in y[..=peak].iter().rev() {
        if v > top {
            break;
        }
        left_min = left_min.min(v);
    }

    let mut right_min = top;
    for &v in &y[peak..] {
        if v > top {
            break;
        }
        right_min = right_min.min(v);
    }

    top - left_min.max(right_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bump(n: usize, centre: f64, width: f64, height: f64) -> Vec<f64> {
        (0..n)
            .map(|i| height * (-((i as f64 - centre) / width).powi(2) / 2.0).exp())
            .collect()
    }

    fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
        a.iter().zip(b).map(|(x, y)| x + y).collect()
    }

    #[test]
    fn local_maxima_handles_plateaus() {
        let y = [0.0, 1.0, 3.0, 3.0, 3.0, 1.0, 2.0, 2.0, 0.0];
        assert_eq!(local_maxima(&y), vec![3, 6]);
    }

    #[test]
    fn rising_edge_is_not_a_maximum() {
        let y = [0.0, 1.0, 2.0, 3.0];
        assert!(local_maxima(&y).is_empty());
    }

    #[test]
    fn distance_keeps_the_taller_neighbour() {
        let y = [0.0, 5.0, 0.0, 7.0, 0.0, 0.0, 0.0, 0.0, 4.0, 0.0];
        let peaks = local_maxima(&y);
        assert_eq!(peaks, vec![1, 3, 8]);
        assert_eq!(select_by_distance(&y, &peaks, 3), vec![3, 8]);
        assert_eq!(select_by_distance(&y, &peaks, 1), vec![1, 3, 8]);
    }

    #[test]
    fn prominence_uses_higher_base() {
        let y = [0.0, 4.0, 1.0, 6.0, 3.0, 10.0, 0.0];
        assert_eq!(prominence(&y, 1), 3.0);
        assert_eq!(prominence(&y, 3), 3.0);
        assert_eq!(prominence(&y, 5), 10.0);
    }

    #[test]
    fn two_separated_bumps() {
        let y = add(&bump(100, 20.0, 3.0, 50.0), &bump(100, 75.0, 4.0, 30.0));
        let criteria = PeakCriteria {
            min_distance: 10,
            rel_prominence: 0.1,
        };
        assert_eq!(find_peaks(&y, &criteria), vec![20, 75]);
    }

    #[test]
    fn small_shoulder_is_rejected_by_prominence() {
        let y = add(&bump(100, 30.0, 3.0, 100.0), &bump(100, 60.0, 3.0, 5.0));
        let strict = PeakCriteria {
            min_distance: 10,
            rel_prominence: 0.1,
        };
        assert_eq!(find_peaks(&y, &strict), vec![30]);
        let loose = PeakCriteria {
            min_distance: 10,
            rel_prominence: 0.01,
        };
        assert_eq!(find_peaks(&y, &loose), vec![30, 60]);
    }

    #[test]
    fn close_bumps_collapse_to_one() {
        let y = add(&bump(100, 40.0, 1.0, 10.0), &bump(100, 45.0, 1.0, 8.0));
        let criteria = PeakCriteria {
            min_distance: 10,
            rel_prominence: 0.1,
        };
        assert_eq!(find_peaks(&y, &criteria), vec![40]);
    }

    #[test]
    fn maxima_on_the_ends_are_found() {
        let y = add(&bump(50, 0.0, 2.0, 9.0), &bump(50, 49.0, 2.0, 9.5));
        let criteria = PeakCriteria {
            min_distance: 10,
            rel_prominence: 0.3,
        };
        assert_eq!(find_peaks(&y, &criteria), vec![0, 49]);
    }
}
