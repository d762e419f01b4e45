use serde::Serialize;

use crate::error::{AnalyzerError, Result};

// ── SummaryStats ──────────────────────────────────────────────────────────────

/// Descriptive statistics for one numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (divides by N-1).  NaN when `count < 2`.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl SummaryStats {
    /// Statistics of a field that has no usable value: zero count, NaN
    /// everywhere else.
    pub fn empty() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }

    /// Compute statistics over `values`, ignoring NaN.
    ///
    /// Returns `None` when no value remains.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let vals: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if vals.is_empty() {
            return None;
        }

        let count = vals.len();
        let mean = vals.iter().sum::<f64>() / count as f64;
        let min = vals.iter().copied().fold(f64::INFINITY, f64::min);
        let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let std = if count > 1 {
            let sq: f64 = vals.iter().map(|v| (v - mean).powi(2)).sum();
            (sq / (count as f64 - 1.0)).sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            count,
            mean,
            std,
            min,
            max,
        })
    }
}

// ── Smoothing ─────────────────────────────────────────────────────────────────

/// Centred moving average computed as a zero-padded, same-length convolution
/// with a box kernel of `window` taps of weight `1 / window`.
///
/// Output position `i` sums `values[i - (window - 1 - off) ..= i + off]`
/// where `off = (window - 1) / 2`; indices outside the input contribute zero,
/// so values near both ends are pulled towards zero.  The output always has
/// the same length as the input.
///
/// Fails with [`AnalyzerError::InvalidArgument`] when `window` is zero.
pub fn moving_average(values: &[f64], window: usize) -> Result<Vec<f64>> {
    if window < 1 {
        return Err(AnalyzerError::InvalidArgument(
            "window_size must be >= 1".to_string(),
        ));
    }
    if window == 1 {
        return Ok(values.to_vec());
    }

    let n = values.len();
    let weight = 1.0 / window as f64;
    let ahead = (window - 1) / 2;
    let behind = window - 1 - ahead;

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let lo = i.saturating_sub(behind);
        let hi = (i + ahead).min(n.saturating_sub(1));
        let acc: f64 = values[lo..=hi].iter().map(|v| v * weight).sum();
        out.push(acc);
    }
    Ok(out)
}

/// Trailing rolling mean over `window` positions with a minimum of one
/// observation.  Missing values still occupy a slot in the window but are
/// left out of the average; a window holding no value at all yields `None`.
///
/// Fails with [`AnalyzerError::InvalidArgument`] when `window` is zero.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Result<Vec<Option<f64>>> {
    if window < 1 {
        return Err(AnalyzerError::InvalidArgument(
            "rolling window must be >= 1".to_string(),
        ));
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    let mut count = 0usize;
    for (i, v) in values.iter().enumerate() {
        if let Some(v) = v {
            sum += v;
            count += 1;
        }
        if i >= window {
            if let Some(old) = values[i - window] {
                sum -= old;
                count -= 1;
            }
        }
        out.push((count > 0).then(|| sum / count as f64));
    }
    Ok(out)
}

/// Index of the largest finite value, first occurrence on ties.
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len(), "length mismatch: {a:?} vs {b:?}");
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
        }
    }

    // ── SummaryStats ──────────────────────────────────────────────────────────

    #[test]
    fn test_summary_two_values() {
        let stats = SummaryStats::compute(&[101.3, 98.1]).unwrap();
        assert_eq!(stats.count, 2);
        assert!((stats.mean - 99.7).abs() < 1e-9);
        assert!((stats.min - 98.1).abs() < 1e-9);
        assert!((stats.max - 101.3).abs() < 1e-9);
        // |101.3 - 98.1| / sqrt(2)
        assert!((stats.std - 2.262741699796952).abs() < 1e-9);
    }

    #[test]
    fn test_summary_single_value_std_is_nan() {
        let stats = SummaryStats::compute(&[4.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert!(stats.std.is_nan());
    }

    #[test]
    fn test_summary_ignores_nan_and_empty() {
        assert!(SummaryStats::compute(&[]).is_none());
        assert!(SummaryStats::compute(&[f64::NAN]).is_none());
        let stats = SummaryStats::compute(&[1.0, f64::NAN, 3.0]).unwrap();
        assert_eq!(stats.count, 2);
        assert!((stats.mean - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_empty_is_all_nan() {
        let stats = SummaryStats::empty();
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan() && stats.std.is_nan());
        assert!(stats.min.is_nan() && stats.max.is_nan());
    }

    // ── moving_average ────────────────────────────────────────────────────────

    #[test]
    fn test_moving_average_zero_window_is_invalid() {
        let err = moving_average(&[1.0, 2.0], 0).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidArgument(_)));
    }

    #[test]
    fn test_moving_average_window_one_is_identity() {
        let input = vec![3.5, -1.25, 0.0, 1e9, f64::MIN_POSITIVE];
        assert_eq!(moving_average(&input, 1).unwrap(), input);
    }

    #[test]
    fn test_moving_average_odd_window_attenuates_edges() {
        let out = moving_average(&[3.0, 3.0, 3.0, 3.0, 3.0], 3).unwrap();
        assert_close(&out, &[2.0, 3.0, 3.0, 3.0, 2.0]);
    }

    #[test]
    fn test_moving_average_even_window_matches_same_mode() {
        // Full convolution of [1..5] with four ones is [1,3,6,10,14,12,9,5];
        // the centred slice of length 5 starts at index 1.
        let out = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 4).unwrap();
        assert_close(&out, &[0.75, 1.5, 2.5, 3.5, 3.0]);
    }

    #[test]
    fn test_moving_average_preserves_length() {
        for n in 0..12 {
            let input: Vec<f64> = (0..n).map(|i| i as f64).collect();
            for w in 1..15 {
                assert_eq!(moving_average(&input, w).unwrap().len(), n);
            }
        }
    }

    #[test]
    fn test_moving_average_window_longer_than_input() {
        let out = moving_average(&[2.0, 4.0], 5).unwrap();
        // Every output sees both samples.
        assert_close(&out, &[1.2, 1.2]);
    }

    // ── rolling_mean ──────────────────────────────────────────────────────────

    #[test]
    fn test_rolling_mean_min_periods_one() {
        let values: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0].map(Some).to_vec();
        let out: Vec<f64> = rolling_mean(&values, 3).unwrap().into_iter().flatten().collect();
        assert_close(&out, &[1.0, 1.5, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_rolling_mean_gaps_take_window_slots() {
        let values = [Some(1.0), None, None, None, None, Some(6.0)];
        let out = rolling_mean(&values, 5).unwrap();
        assert_eq!(
            out,
            vec![Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(6.0)]
        );
    }

    #[test]
    fn test_rolling_mean_window_without_values_is_none() {
        let values = [Some(2.0), None, None, Some(4.0)];
        let out = rolling_mean(&values, 2).unwrap();
        assert_eq!(out, vec![Some(2.0), Some(2.0), None, Some(4.0)]);
    }

    #[test]
    fn test_rolling_mean_zero_window_is_invalid() {
        assert!(matches!(
            rolling_mean(&[Some(1.0)], 0),
            Err(AnalyzerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rolling_mean_empty() {
        assert!(rolling_mean(&[], 5).unwrap().is_empty());
    }

    // ── argmax ────────────────────────────────────────────────────────────────

    #[test]
    fn test_argmax_first_on_ties() {
        assert_eq!(argmax(&[1.0, 5.0, 5.0, 2.0]), Some(1));
        assert_eq!(argmax(&[f64::NAN, -1.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }
}
