// ---------------------------------------------------------------------------
// Sentinel filtering
// ---------------------------------------------------------------------------

/// Magnitude at or above which a pixel is the instrument's invalid marker.
///
/// Profilm writes missing pixels as roughly +/-1e38; anything this far out is
/// not a physical height.
pub const SENTINEL_LIMIT: f64 = 1_000_000.0;

/// Whether `value` is a real height reading (finite and below `limit`).
pub fn is_valid_height(value: f64, limit: f64) -> bool {
    value.abs() < limit
}

/// Keep only valid heights, preserving order.
pub fn drop_sentinels(values: impl IntoIterator<Item = f64>, limit: f64) -> Vec<f64> {
    values
        .into_iter()
        .filter(|&v| is_valid_height(v, limit))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_both_signs_of_sentinel() {
        let raw = [1.0, 1e38, -2.5, -1e38, 999_999.0, 1_000_000.0, -1_000_000.0];
        assert_eq!(
            drop_sentinels(raw, SENTINEL_LIMIT),
            vec![1.0, -2.5, 999_999.0]
        );
    }

    #[test]
    fn nan_and_infinity_are_not_heights() {
        assert!(!is_valid_height(f64::NAN, SENTINEL_LIMIT));
        assert!(!is_valid_height(f64::INFINITY, SENTINEL_LIMIT));
        assert!(is_valid_height(0.0, SENTINEL_LIMIT));
    }
}
