use std::fmt::Write as _;

use crate::calculations::SummaryStats;

/// Format a float with a fixed number of decimals, spelling non-finite values
/// the way the summaries print them (`nan`, `inf`, `-inf`).
///
/// # Examples
///
/// ```
/// use trend_core::formatting::format_float;
///
/// assert_eq!(format_float(99.7, 3), "99.700");
/// assert_eq!(format_float(f64::NAN, 3), "nan");
/// assert_eq!(format_float(f64::NEG_INFINITY, 1), "-inf");
/// ```
pub fn format_float(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{:.prec$}", value, prec = decimals)
    }
}

/// Render a statistics block under `heading`.
///
/// # Examples
///
/// ```
/// use trend_core::calculations::SummaryStats;
/// use trend_core::formatting::format_summary;
///
/// let stats = SummaryStats::compute(&[101.3, 98.1]).unwrap();
/// let text = format_summary("Value statistics:", &stats);
/// assert!(text.contains("  Count: 2\n"));
/// assert!(text.contains("  Mean:  99.700\n"));
/// ```
pub fn format_summary(heading: &str, stats: &SummaryStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading);
    let _ = writeln!(out, "  Count: {}", stats.count);
    let _ = writeln!(out, "  Mean:  {}", format_float(stats.mean, 3));
    let _ = writeln!(out, "  Std:   {}", format_float(stats.std, 3));
    let _ = writeln!(out, "  Min:   {}", format_float(stats.min, 3));
    let _ = writeln!(out, "  Max:   {}", format_float(stats.max, 3));
    out
}

/// Render `(label, count)` pairs as an aligned two-column list under
/// `heading`, preserving the given order.
pub fn format_value_counts(heading: &str, counts: &[(String, usize)]) -> String {
    let width = counts.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading);
    for (label, count) in counts {
        let _ = writeln!(out, "  {:<width$}  {}", label, count, width = width);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float_rounding() {
        assert_eq!(format_float(2.262741699796952, 3), "2.263");
        assert_eq!(format_float(0.0, 2), "0.00");
        assert_eq!(format_float(f64::INFINITY, 3), "inf");
    }

    #[test]
    fn test_format_summary_full_block() {
        let stats = SummaryStats::compute(&[101.3, 98.1]).unwrap();
        let text = format_summary("Value statistics:", &stats);
        assert_eq!(
            text,
            "Value statistics:\n  Count: 2\n  Mean:  99.700\n  Std:   2.263\n  Min:   98.100\n  Max:   101.300\n"
        );
    }

    #[test]
    fn test_format_summary_single_value_prints_nan_std() {
        let stats = SummaryStats::compute(&[5.0]).unwrap();
        assert!(format_summary("Metric: x", &stats).contains("  Std:   nan\n"));
    }

    #[test]
    fn test_format_value_counts_aligns_labels() {
        let counts = vec![("PASS".to_string(), 10), ("FAIL".to_string(), 2), ("ABORTED".to_string(), 1)];
        let text = format_value_counts("Status counts:", &counts);
        assert_eq!(
            text,
            "Status counts:\n  PASS     10\n  FAIL     2\n  ABORTED  1\n"
        );
    }

    #[test]
    fn test_format_value_counts_empty() {
        assert_eq!(format_value_counts("Log levels:", &[]), "Log levels:\n");
    }
}
