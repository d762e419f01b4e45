//! Turns analysis reports into printed text and chart descriptions.

use trend_core::formatting::{format_float, format_summary, format_value_counts};
use trend_core::time_utils::to_epoch_seconds;
use trend_data::analysis::{
    CsvReport, JsonReport, LogMetric, LogReport, MetricReport, SmoothedSignal, TrendSeries,
};
use trend_render::charts::{
    Annotation, BarChart, Chart, Emphasis, Highlight, LineChart, Series, XAxisKind,
};

/// Shaded region of the smoothing demo, in seconds.
const REGION_OF_INTEREST: (f64, f64) = (3.0, 6.0);
/// Where the peak label sits relative to the peak, in data units.
const PEAK_LABEL_OFFSET: (f64, f64) = (0.3, 0.5);

/// A chart together with the file name it is saved under.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedChart {
    pub file_name: String,
    pub chart: Chart,
}

impl NamedChart {
    fn new(file_name: impl Into<String>, chart: impl Into<Chart>) -> Self {
        Self {
            file_name: file_name.into(),
            chart: chart.into(),
        }
    }
}

// ── Text ──────────────────────────────────────────────────────────────────────

pub fn render_csv_report(report: &CsvReport) -> String {
    let mut out = String::new();
    match &report.value_summary {
        Some(stats) => {
            out.push_str(&format_summary("Value statistics:", stats));
            out.push('\n');
        }
        None => out.push_str("No 'value' column found; skipping numeric summary.\n"),
    }
    match &report.status_counts {
        Some(counts) => {
            out.push_str(&format_value_counts("Status counts:", counts));
            out.push('\n');
        }
        None => out.push_str("No 'status' column found; skipping status summary.\n"),
    }
    out
}

pub fn render_json_report(report: &JsonReport) -> String {
    let mut out = metric_summary(&report.metric);
    out.push('\n');
    out
}

pub fn render_log_report(report: &LogReport) -> String {
    let mut out = format_value_counts("Log levels:", &report.level_counts);
    out.push('\n');

    match &report.metric {
        None => {}
        Some(LogMetric::NotFound(name)) => out.push_str(&format!(
            "Metric '{name}' not found in parsed logs; skipping metric plot.\n"
        )),
        Some(LogMetric::NoValidValues(name)) => {
            out.push_str(&format!("No valid values for metric '{name}'.\n"))
        }
        Some(LogMetric::Found(metric)) => {
            out.push_str(&metric_summary(metric));
            out.push('\n');
        }
    }

    if report.alert_counts.is_empty() {
        out.push_str(&format!(
            "No {} entries found in logs.\n",
            report.alert_levels.join("/")
        ));
    }
    out
}

pub fn render_time_series_summary(signal: &SmoothedSignal) -> String {
    let mut out = format!(
        "Generated {} samples (seed {}), moving average window {}.\n",
        signal.signal.t.len(),
        signal.seed,
        signal.window
    );
    if let Some((t, y)) = signal.peak {
        out.push_str(&format!(
            "Smoothed peak: {} at t = {} s\n",
            format_float(y, 2),
            format_float(t, 2)
        ));
    }
    out
}

fn metric_summary(metric: &MetricReport) -> String {
    format_summary(&format!("Metric: {}", metric.metric), &metric.summary)
}

// ── Charts ────────────────────────────────────────────────────────────────────

pub fn csv_charts(report: &CsvReport) -> Vec<NamedChart> {
    let mut charts = Vec::new();
    if let Some(trend) = &report.value_trend {
        charts.push(NamedChart::new(
            "value_trend.png",
            trend_chart(&report.title, "Value", "Value", trend),
        ));
    }
    if let Some(failures) = &report.failures_per_day {
        let bars = failures
            .iter()
            .map(|(date, count)| (date.to_string(), *count as u64))
            .collect();
        charts.push(NamedChart::new(
            "failures_per_day.png",
            BarChart::new("Failures per day", "Date", "Failure count", bars),
        ));
    }
    charts
}

pub fn json_charts(report: &JsonReport) -> Vec<NamedChart> {
    metric_chart(&report.metric, "Raw").into_iter().collect()
}

pub fn log_charts(report: &LogReport) -> Vec<NamedChart> {
    let mut charts = Vec::new();
    if let Some(LogMetric::Found(metric)) = &report.metric {
        charts.extend(metric_chart(metric, &metric.metric));
    }
    if !report.alert_counts.is_empty() {
        let levels = report.alert_levels.join("/");
        let bars = report
            .alert_counts
            .iter()
            .map(|(instrument, count)| (instrument.clone(), *count as u64))
            .collect();
        charts.push(NamedChart::new(
            "alert_counts.png",
            BarChart::new(
                format!("{levels} count per instrument"),
                "Instrument ID",
                format!("{levels} count"),
                bars,
            ),
        ));
    }
    charts
}

pub fn time_series_chart(signal: &SmoothedSignal) -> Chart {
    let t = &signal.signal.t;
    let noisy = t.iter().copied().zip(signal.signal.y.iter().copied()).collect();
    let smoothed = t.iter().copied().zip(signal.smoothed.iter().copied()).collect();

    let mut chart = LineChart::new(
        "Noisy Time Series with Moving Average Smoothing",
        "Time [s]",
        "Signal amplitude",
        XAxisKind::Numeric,
    )
    .with_series(Series::new("Noisy signal", noisy, Emphasis::Faint))
    .with_series(Series::new(
        format!("Moving average (window={})", signal.window),
        smoothed,
        Emphasis::Bold,
    ))
    .with_highlight(Highlight {
        start: REGION_OF_INTEREST.0,
        end: REGION_OF_INTEREST.1,
        label: "Region of interest".to_string(),
    })
    .with_grid(true);

    if let Some((t_max, y_max)) = signal.peak {
        chart = chart.with_annotation(Annotation {
            point: (t_max, y_max),
            text: format!("Peak ~ {}", format_float(y_max, 2)),
            text_offset: PEAK_LABEL_OFFSET,
        });
    }
    chart.into()
}

fn metric_chart(metric: &MetricReport, raw_label: &str) -> Option<NamedChart> {
    let trend = metric.trend.as_ref()?;
    Some(NamedChart::new(
        format!("{}_trend.png", file_stem(&metric.metric)),
        trend_chart(&metric.title, &metric.metric, raw_label, trend),
    ))
}

fn trend_chart(title: &str, y_label: &str, raw_label: &str, trend: &TrendSeries) -> LineChart {
    let xs: Vec<f64> = trend
        .points
        .iter()
        .map(|(ts, _)| to_epoch_seconds(*ts))
        .collect();
    let raw = xs
        .iter()
        .copied()
        .zip(trend.points.iter().map(|(_, v)| *v))
        .collect();

    let mut chart = LineChart::new(title, "Timestamp", y_label, XAxisKind::DateTime)
        .with_series(Series::new(raw_label, raw, Emphasis::Normal));
    if let Some(rolling) = &trend.rolling {
        let points = xs.iter().copied().zip(rolling.values.iter().copied()).collect();
        chart = chart.with_series(Series::new(
            format!("Rolling mean ({})", rolling.window),
            points,
            Emphasis::Normal,
        ));
    }
    chart
}

/// Replace characters that are awkward in file names.
pub fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use trend_data::analysis::{
        analyze_csv, analyze_json, analyze_log, build_time_series, AnalysisOptions,
        TimeSeriesOptions,
    };
    use trend_data::loader::{read_csv, read_json, read_log};

    const SAMPLE_CSV: &str = "timestamp,instrument_id,status,value\n\
        2025-02-01 10:00:01,IVD-001,PASS,101.3\n\
        2025-02-01 10:05:02,IVD-001,FAIL,98.1\n";

    const SAMPLE_LOG: &str = "2025-02-01 10:00:01,INFO,IVD-001,pressure_kpa=101.3\n\
        2025-02-01 10:05:02,WARN,IVD-001,pressure_kpa=98.1\n\
        2025-02-01 10:10:15,ERROR,IVD-002,pump_stall\n";

    fn csv_report(csv: &str) -> CsvReport {
        analyze_csv(read_csv(csv.as_bytes()).unwrap(), None, &AnalysisOptions::default()).unwrap()
    }

    fn log_report(log: &str, metric: Option<&str>) -> LogReport {
        analyze_log(
            read_log(log.as_bytes()).unwrap(),
            metric,
            None,
            &AnalysisOptions::default(),
        )
        .unwrap()
    }

    // ── CSV ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_csv_report_sample() {
        let text = render_csv_report(&csv_report(SAMPLE_CSV));
        assert!(text.starts_with("Value statistics:\n  Count: 2\n  Mean:  99.700\n"));
        assert!(text.contains("  Min:   98.100\n  Max:   101.300\n"));
        assert!(text.contains("Status counts:\n  PASS  1\n  FAIL  1\n"));
    }

    #[test]
    fn test_render_csv_report_placeholders() {
        let text = render_csv_report(&csv_report("timestamp,other\n2025-02-01,1\n"));
        assert_eq!(
            text,
            "No 'value' column found; skipping numeric summary.\n\
             No 'status' column found; skipping status summary.\n"
        );
    }

    #[test]
    fn test_csv_charts() {
        let charts = csv_charts(&csv_report(SAMPLE_CSV));
        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].file_name, "value_trend.png");
        let Chart::Line(line) = &charts[0].chart else {
            panic!("expected line chart");
        };
        assert_eq!(line.title, "Value over time");
        assert_eq!(line.x_kind, XAxisKind::DateTime);
        assert_eq!(line.series[0].label, "Value");
        assert_eq!(line.series[1].label, "Rolling mean (5)");
        assert!((line.series[1].points[1].1 - 99.7).abs() < 1e-9);

        assert_eq!(charts[1].file_name, "failures_per_day.png");
        let Chart::Bar(bar) = &charts[1].chart else {
            panic!("expected bar chart");
        };
        assert_eq!(bar.bars, vec![("2025-02-01".to_string(), 1)]);
    }

    // ── JSON ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_json_report_text_and_chart() {
        let json = r#"[
            {"timestamp": "2025-02-01T10:00:00", "pressure_kpa": 101.3},
            {"timestamp": "2025-02-01T10:05:00", "pressure_kpa": 98.1}
        ]"#;
        let report = analyze_json(
            read_json(json.as_bytes()).unwrap(),
            "pressure_kpa",
            None,
            &AnalysisOptions::default(),
        )
        .unwrap();

        let text = render_json_report(&report);
        assert!(text.starts_with("Metric: pressure_kpa\n  Count: 2\n"));

        let charts = json_charts(&report);
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].file_name, "pressure_kpa_trend.png");
        assert_eq!(charts[0].chart.title(), "pressure_kpa over time");
    }

    // ── Log ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_log_report_levels_and_metric() {
        let text = render_log_report(&log_report(SAMPLE_LOG, Some("pressure_kpa")));
        assert!(text.starts_with("Log levels:\n  INFO   1\n  WARN   1\n  ERROR  1\n\n"));
        assert!(text.contains("Metric: pressure_kpa\n  Count: 2\n"));
        assert!(!text.contains("No WARN/ERROR"));
    }

    #[test]
    fn test_render_log_report_placeholders() {
        let log = "2025-02-01 10:00:01,INFO,IVD-001,ok\n";
        let text = render_log_report(&log_report(log, Some("pressure_kpa")));
        assert!(text.contains("Metric 'pressure_kpa' not found in parsed logs; skipping metric plot.\n"));
        assert!(text.ends_with("No WARN/ERROR entries found in logs.\n"));
        assert!(log_charts(&log_report(log, Some("pressure_kpa"))).is_empty());
    }

    #[test]
    fn test_render_log_report_no_valid_values() {
        let log = "2025-02-01 10:00:01,INFO,IVD-001,pressure_kpa=bad\n";
        let text = render_log_report(&log_report(log, Some("pressure_kpa")));
        assert!(text.contains("No valid values for metric 'pressure_kpa'.\n"));
    }

    #[test]
    fn test_log_charts() {
        let charts = log_charts(&log_report(SAMPLE_LOG, Some("pressure_kpa")));
        let names: Vec<&str> = charts.iter().map(|c| c.file_name.as_str()).collect();
        assert_eq!(names, vec!["pressure_kpa_trend.png", "alert_counts.png"]);

        let Chart::Line(line) = &charts[0].chart else {
            panic!("expected line chart");
        };
        assert_eq!(line.series.len(), 1);
        assert_eq!(line.series[0].label, "pressure_kpa");

        let Chart::Bar(bar) = &charts[1].chart else {
            panic!("expected bar chart");
        };
        assert_eq!(bar.title, "WARN/ERROR count per instrument");
        assert_eq!(bar.x_label, "Instrument ID");
    }

    // ── Time series ───────────────────────────────────────────────────────────

    #[test]
    fn test_time_series_chart() {
        let signal = build_time_series(&TimeSeriesOptions {
            points: 500,
            noise: 0.4,
            window: 25,
            seed: 3,
        })
        .unwrap();
        let Chart::Line(chart) = time_series_chart(&signal) else {
            panic!("expected line chart");
        };
        assert_eq!(chart.title, "Noisy Time Series with Moving Average Smoothing");
        assert_eq!(chart.x_label, "Time [s]");
        assert_eq!(chart.y_label, "Signal amplitude");
        assert!(chart.grid);
        assert_eq!(chart.series[0].emphasis, Emphasis::Faint);
        assert_eq!(chart.series[1].label, "Moving average (window=25)");
        assert_eq!(chart.series[1].emphasis, Emphasis::Bold);
        assert_eq!(chart.series[1].points.len(), 500);

        let highlight = chart.highlight.unwrap();
        assert_eq!((highlight.start, highlight.end), (3.0, 6.0));

        let annotation = chart.annotation.unwrap();
        let (_, y_max) = signal.peak.unwrap();
        assert_eq!(annotation.text, format!("Peak ~ {:.2}", y_max));
        assert_eq!(annotation.text_offset, (0.3, 0.5));
    }

    #[test]
    fn test_render_time_series_summary() {
        let signal = build_time_series(&TimeSeriesOptions {
            points: 10,
            noise: 0.0,
            window: 1,
            seed: 9,
        })
        .unwrap();
        let text = render_time_series_summary(&signal);
        assert!(text.starts_with("Generated 10 samples (seed 9), moving average window 1.\n"));
        assert!(text.contains("Smoothed peak:"));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("pressure_kpa"), "pressure_kpa");
        assert_eq!(file_stem("flow/min rate"), "flow_min_rate");
    }
}
