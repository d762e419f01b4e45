//! Analysis pipelines for the four tools.
//!
//! Each pipeline takes a loaded [`Dataset`], applies the optional instrument
//! filter and computes every summary and trend series up front, returning a
//! report for the presentation layer.  A pipeline either succeeds completely
//! or fails before anything is shown.

use chrono::{DateTime, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;
use trend_core::calculations::{argmax, moving_average, rolling_mean, SummaryStats};
use trend_core::error::{AnalyzerError, Result};
use trend_core::models::Dataset;
use trend_core::settings::AnalyzerConfig;

use crate::aggregator::{alert_counts_by_instrument, daily_failures, value_counts};
use crate::filter::apply_instrument_filter;
use crate::synthetic::{generate_time_series, Signal};

// ── Public types ──────────────────────────────────────────────────────────────

/// Knobs shared by the dataset analyzers.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    /// Window of the trailing rolling mean.
    pub rolling_window: usize,
    /// Status value that is not a failure.
    pub pass_status: String,
    /// Log levels counted as alerts.
    pub alert_levels: Vec<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::from(&AnalyzerConfig::default())
    }
}

impl From<&AnalyzerConfig> for AnalysisOptions {
    fn from(config: &AnalyzerConfig) -> Self {
        Self {
            rolling_window: config.rolling_window,
            pass_status: config.pass_status.clone(),
            alert_levels: config.alert_levels.clone(),
        }
    }
}

/// A trailing rolling mean computed alongside a trend.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingSeries {
    pub window: usize,
    /// One value per point of the owning [`TrendSeries`].
    pub values: Vec<f64>,
}

/// A numeric field over time, sorted by timestamp, with unusable values
/// already removed.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub name: String,
    pub points: Vec<(DateTime<Utc>, f64)>,
    pub rolling: Option<RollingSeries>,
}

/// Summary and trend of one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricReport {
    pub metric: String,
    /// Chart title, including the instrument when filtered.
    pub title: String,
    pub summary: SummaryStats,
    /// `None` when the metric has no usable value to draw.
    pub trend: Option<TrendSeries>,
}

/// Output of the CSV analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvReport {
    pub title: String,
    /// `None` when there is no `value` column.
    pub value_summary: Option<SummaryStats>,
    /// `None` when there is no `status` column.
    pub status_counts: Option<Vec<(String, usize)>>,
    pub value_trend: Option<TrendSeries>,
    /// `None` when there is no `status` column.
    pub failures_per_day: Option<Vec<(NaiveDate, usize)>>,
}

/// Output of the JSON analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonReport {
    pub metric: MetricReport,
}

/// What the log analyzer found for the requested metric.
#[derive(Debug, Clone, PartialEq)]
pub enum LogMetric {
    /// No parsed line carried the key.
    NotFound(String),
    /// The key was present but never with a numeric value.
    NoValidValues(String),
    Found(MetricReport),
}

/// Output of the log analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct LogReport {
    pub level_counts: Vec<(String, usize)>,
    /// `None` when no metric was requested.
    pub metric: Option<LogMetric>,
    pub alert_levels: Vec<String>,
    /// Alert entries per instrument; empty when there are none.
    pub alert_counts: Vec<(String, usize)>,
}

/// Parameters of the synthetic smoothing demo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesOptions {
    pub points: usize,
    pub noise: f64,
    pub window: usize,
    pub seed: u64,
}

/// A noisy signal, its smoothed counterpart and the smoothed peak.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedSignal {
    pub signal: Signal,
    pub smoothed: Vec<f64>,
    pub window: usize,
    /// `(t, y)` of the largest smoothed value.
    pub peak: Option<(f64, f64)>,
    pub seed: u64,
}

// ── Pipelines ─────────────────────────────────────────────────────────────────

/// Summaries and trends for a CSV dataset with optional `value` and `status`
/// columns.
pub fn analyze_csv(
    dataset: Dataset,
    instrument: Option<&str>,
    options: &AnalysisOptions,
) -> Result<CsvReport> {
    let mut dataset = apply_instrument_filter(dataset, instrument)?;
    dataset.sort_by_timestamp();

    let (value_summary, value_trend) = if dataset.has_column("value") {
        let summary = summarize(&dataset, "value");
        let trend = trend_series(&dataset, "value", Some(options.rolling_window))?;
        (Some(summary), trend)
    } else {
        (None, None)
    };

    let report = CsvReport {
        title: with_instrument("Value over time", instrument),
        value_summary,
        status_counts: value_counts(&dataset, "status"),
        value_trend,
        failures_per_day: daily_failures(&dataset, &options.pass_status),
    };
    debug!(
        "CSV analysis: {} records, value column: {}, status column: {}",
        dataset.len(),
        report.value_summary.is_some(),
        report.status_counts.is_some()
    );
    Ok(report)
}

/// Summary and trend of `metric` in a JSON dataset.
///
/// Fails with [`AnalyzerError::UnknownMetric`] when no record carries the
/// metric after filtering.
pub fn analyze_json(
    dataset: Dataset,
    metric: &str,
    instrument: Option<&str>,
    options: &AnalysisOptions,
) -> Result<JsonReport> {
    let mut dataset = apply_instrument_filter(dataset, instrument)?;
    if !dataset.has_column(metric) {
        return Err(AnalyzerError::UnknownMetric(metric.to_string()));
    }
    dataset.sort_by_timestamp();

    let metric = MetricReport {
        metric: metric.to_string(),
        title: with_instrument(&format!("{metric} over time"), instrument),
        summary: summarize(&dataset, metric),
        trend: trend_series(&dataset, metric, Some(options.rolling_window))?,
    };
    Ok(JsonReport { metric })
}

/// Level counts, the optional metric and alert counts of a log dataset.
pub fn analyze_log(
    dataset: Dataset,
    metric: Option<&str>,
    instrument: Option<&str>,
    options: &AnalysisOptions,
) -> Result<LogReport> {
    let mut dataset = apply_instrument_filter(dataset, instrument)?;
    dataset.sort_by_timestamp();

    let metric = match metric {
        None => None,
        Some(name) if !dataset.has_column(name) => Some(LogMetric::NotFound(name.to_string())),
        Some(name) => match trend_series(&dataset, name, None)? {
            None => Some(LogMetric::NoValidValues(name.to_string())),
            Some(trend) => Some(LogMetric::Found(MetricReport {
                metric: name.to_string(),
                title: with_instrument(&format!("{name} over time"), instrument),
                summary: summarize(&dataset, name),
                trend: Some(trend),
            })),
        },
    };

    Ok(LogReport {
        level_counts: value_counts(&dataset, "level").unwrap_or_default(),
        metric,
        alert_levels: options.alert_levels.clone(),
        alert_counts: alert_counts_by_instrument(&dataset, &options.alert_levels),
    })
}

/// Generate the noisy sine signal and smooth it with the moving average.
pub fn build_time_series(options: &TimeSeriesOptions) -> Result<SmoothedSignal> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let signal = generate_time_series(options.points, options.noise, &mut rng);
    let smoothed = moving_average(&signal.y, options.window)?;
    let peak = argmax(&smoothed).map(|i| (signal.t[i], smoothed[i]));

    Ok(SmoothedSignal {
        signal,
        smoothed,
        window: options.window,
        peak,
        seed: options.seed,
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn with_instrument(base: &str, instrument: Option<&str>) -> String {
    match instrument {
        Some(id) => format!("{base} (instrument {id})"),
        None => base.to_string(),
    }
}

fn summarize(dataset: &Dataset, name: &str) -> SummaryStats {
    let values = dataset.metric_series(name).values();
    SummaryStats::compute(&values).unwrap_or_else(SummaryStats::empty)
}

/// Valid points of `name` (dataset must already be sorted) plus an optional
/// rolling mean.  `None` when nothing is left to draw.
///
/// The rolling window counts records, so a record without a usable value
/// still takes up a slot; the mean is reported at the valid points only.
fn trend_series(
    dataset: &Dataset,
    name: &str,
    rolling_window: Option<usize>,
) -> Result<Option<TrendSeries>> {
    let points = dataset.metric_series(name).valid_points();
    if points.is_empty() {
        return Ok(None);
    }

    let rolling = match rolling_window {
        Some(window) => {
            let values: Vec<Option<f64>> =
                dataset.records().iter().map(|r| r.number(name)).collect();
            let means = rolling_mean(&values, window)?;
            Some(RollingSeries {
                window,
                values: values
                    .into_iter()
                    .zip(means)
                    .filter_map(|(v, mean)| v.and(mean))
                    .collect(),
            })
        }
        None => None,
    };

    Ok(Some(TrendSeries {
        name: name.to_string(),
        points,
        rolling,
    }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
