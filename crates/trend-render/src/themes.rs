use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    background_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_from_colorfgbg(value: Option<&str>) -> BackgroundType {
    value
        .and_then(|v| v.split(';').next_back())
        .and_then(|bg| bg.parse::<u8>().ok())
        .map(|bg| {
            if bg <= 6 {
                BackgroundType::Dark
            } else {
                BackgroundType::Light
            }
        })
        .unwrap_or(BackgroundType::Dark)
}

/// Styles used by the terminal chart viewer.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Frame ────────────────────────────────────────────────────────────────
    pub title: Style,
    pub border: Style,
    pub footer: Style,

    // ── Axes ─────────────────────────────────────────────────────────────────
    pub axis: Style,
    pub axis_title: Style,

    // ── Data ─────────────────────────────────────────────────────────────────
    /// Line colours, cycled per series.
    pub series: Vec<Color>,
    pub highlight: Style,
    pub annotation: Style,
    pub bar: Style,
    pub bar_value: Style,
    pub bar_label: Style,
}

impl Theme {
    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::DarkGray),
            footer: Style::default().fg(Color::DarkGray),

            axis: Style::default().fg(Color::Gray),
            axis_title: Style::default().fg(Color::White),

            series: vec![Color::Cyan, Color::Yellow, Color::Green, Color::Magenta],
            highlight: Style::default().fg(Color::DarkGray),
            annotation: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            bar: Style::default().fg(Color::Cyan),
            bar_value: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan),
            bar_label: Style::default().fg(Color::White),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::Gray),
            footer: Style::default().fg(Color::Gray),

            axis: Style::default().fg(Color::DarkGray),
            axis_title: Style::default().fg(Color::Black),

            series: vec![Color::Blue, Color::Red, Color::Green, Color::Magenta],
            highlight: Style::default().fg(Color::Gray),
            annotation: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            bar: Style::default().fg(Color::Blue),
            bar_value: Style::default()
                .fg(Color::White)
                .bg(Color::Blue),
            bar_label: Style::default().fg(Color::Black),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names (including `"auto"`).
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            _ => Self::auto_detect(),
        }
    }

    /// Colour of the `index`-th series.
    pub fn series_color(&self, index: usize) -> Color {
        if self.series.is_empty() {
            return Color::Reset;
        }
        self.series[index % self.series.len()]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
