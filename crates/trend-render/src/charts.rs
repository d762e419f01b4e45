//! Backend-neutral chart descriptions shared by the image and terminal
//! renderers.

use trend_core::time_utils::from_epoch_seconds;

/// Spans longer than this get date-only tick labels.
const DATE_ONLY_SPAN_S: f64 = 2.0 * 86_400.0;

// ── Model ─────────────────────────────────────────────────────────────────────

/// How x values are interpreted and labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAxisKind {
    Numeric,
    /// x values are Unix seconds.
    DateTime,
}

/// Visual weight of a line series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Thin and translucent, for raw noisy data.
    Faint,
    Normal,
    /// Thick, for the series the chart is about.
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub emphasis: Emphasis,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>, emphasis: Emphasis) -> Self {
        Self {
            label: label.into(),
            points,
            emphasis,
        }
    }
}

/// Shaded x interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub start: f64,
    pub end: f64,
    pub label: String,
}

/// A marked point with a text label placed at `point + text_offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub point: (f64, f64),
    pub text: String,
    pub text_offset: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_kind: XAxisKind,
    pub series: Vec<Series>,
    pub highlight: Option<Highlight>,
    pub annotation: Option<Annotation>,
    pub grid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<(String, u64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Line(LineChart),
    Bar(BarChart),
}

/// Inclusive axis ranges, always non-degenerate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl Bounds {
    pub fn x_span(&self) -> f64 {
        self.x.1 - self.x.0
    }

    pub fn y_span(&self) -> f64 {
        self.y.1 - self.y.0
    }
}

// ── LineChart ─────────────────────────────────────────────────────────────────

impl LineChart {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        x_kind: XAxisKind,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            x_kind,
            series: Vec::new(),
            highlight: None,
            annotation: None,
            grid: false,
        }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_highlight(mut self, highlight: Highlight) -> Self {
        self.highlight = Some(highlight);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    pub fn with_grid(mut self, grid: bool) -> Self {
        self.grid = grid;
        self
    }

    /// Total number of points over all series.
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Axis ranges covering every finite point and the annotation text.
    ///
    /// The y range gets a 5 % margin on both sides; a single x or y value
    /// is widened so the range never collapses.  `None` for an empty chart.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points: Vec<(f64, f64)> = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().copied())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        if points.is_empty() {
            return None;
        }
        if let Some(a) = &self.annotation {
            points.push(a.point);
            points.push((a.point.0 + a.text_offset.0, a.point.1 + a.text_offset.1));
        }

        let (mut x0, mut x1) = min_max(points.iter().map(|p| p.0));
        let (mut y0, mut y1) = min_max(points.iter().map(|p| p.1));

        if x1 - x0 <= f64::EPSILON {
            let pad = match self.x_kind {
                XAxisKind::DateTime => 3_600.0,
                XAxisKind::Numeric => 0.5,
            };
            x0 -= pad;
            x1 += pad;
        }
        if y1 - y0 <= f64::EPSILON {
            let pad = (y0.abs() * 0.05).max(0.5);
            y0 -= pad;
            y1 += pad;
        } else {
            let pad = (y1 - y0) * 0.05;
            y0 -= pad;
            y1 += pad;
        }

        Some(Bounds {
            x: (x0, x1),
            y: (y0, y1),
        })
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

// ── BarChart ──────────────────────────────────────────────────────────────────

impl BarChart {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        bars: Vec<(String, u64)>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            bars,
        }
    }

    /// Upper end of the count axis: 10 % headroom over the tallest bar,
    /// at least 1.
    pub fn y_max(&self) -> f64 {
        let max = self.bars.iter().map(|(_, c)| *c).max().unwrap_or(0) as f64;
        (max * 1.1).max(1.0)
    }

    /// Label of the bar centred on `x`, if `x` sits on a bar.
    pub fn label_at(&self, x: f64) -> Option<&str> {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return None;
        }
        self.bars.get(idx as usize).map(|(label, _)| label.as_str())
    }
}

// ── Chart ─────────────────────────────────────────────────────────────────────

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Line(c) => &c.title,
            Chart::Bar(c) => &c.title,
        }
    }
}

impl From<LineChart> for Chart {
    fn from(chart: LineChart) -> Self {
        Chart::Line(chart)
    }
}

impl From<BarChart> for Chart {
    fn from(chart: BarChart) -> Self {
        Chart::Bar(chart)
    }
}

// ── Tick labels ───────────────────────────────────────────────────────────────

/// Format an x tick.  Date axes use `YYYY-MM-DD` when the visible span
/// exceeds two days and `MM-DD HH:MM` otherwise.
pub fn format_x_tick(kind: XAxisKind, value: f64, span: f64) -> String {
    match kind {
        XAxisKind::Numeric => format_number_tick(value, span),
        XAxisKind::DateTime => match from_epoch_seconds(value) {
            Some(dt) if span > DATE_ONLY_SPAN_S => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%m-%d %H:%M").to_string(),
            None => String::new(),
        },
    }
}

/// Format a numeric tick with as many decimals as the span needs.
pub fn format_number_tick(value: f64, span: f64) -> String {
    let decimals = if span >= 10.0 {
        0
    } else if span >= 1.0 {
        1
    } else {
        2
    };
    let text = format!("{:.prec$}", value, prec = decimals);
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
