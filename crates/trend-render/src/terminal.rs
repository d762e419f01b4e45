//! Interactive terminal chart viewer.
//!
//! [`ChartViewer`] pages through a list of [`Chart`]s in the alternate
//! screen: line charts are drawn with Braille datasets, bar charts with the
//! bar widget.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, BarChart as BarWidget, Block, Borders, Chart as ChartWidget, Dataset, GraphType,
        Paragraph,
    },
    Frame, Terminal,
};

use crate::charts::{format_number_tick, format_x_tick, BarChart, Chart, Emphasis, LineChart};
use crate::themes::Theme;

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    Next,
    Previous,
    Quit,
    Ignore,
}

/// Map a key press to a viewer action.
pub fn key_action(key: KeyEvent) -> ViewerAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => ViewerAction::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => ViewerAction::Quit,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => ViewerAction::Next,
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => ViewerAction::Previous,
        _ => ViewerAction::Ignore,
    }
}

// ── ChartViewer ───────────────────────────────────────────────────────────────

pub struct ChartViewer {
    charts: Vec<Chart>,
    current: usize,
    theme: Theme,
}

impl ChartViewer {
    pub fn new(charts: Vec<Chart>, theme: Theme) -> Self {
        Self {
            charts,
            current: 0,
            theme,
        }
    }

    /// Index of the chart on screen.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Apply `action`.  Returns `false` once the viewer should close.
    pub fn apply(&mut self, action: ViewerAction) -> bool {
        let n = self.charts.len();
        match action {
            ViewerAction::Quit => return false,
            ViewerAction::Next if n > 0 => self.current = (self.current + 1) % n,
            ViewerAction::Previous if n > 0 => self.current = (self.current + n - 1) % n,
            _ => {}
        }
        true
    }

    /// Draw the current chart plus a one-line footer into the whole frame.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        match self.charts.get(self.current) {
            Some(chart) => render_chart(frame, chunks[0], chart, &self.theme),
            None => render_no_data(frame, chunks[0], "No charts", &self.theme),
        }

        let footer = format!(
            " {}/{}  ←/→ switch chart  q quit ",
            (self.current + 1).min(self.charts.len()),
            self.charts.len()
        );
        frame.render_widget(
            Paragraph::new(Line::from(footer)).style(self.theme.footer),
            chunks[1],
        );
    }

    /// Take over the terminal until the user quits.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout.  The terminal is
    /// restored even when drawing fails.
    pub fn show(mut self) -> io::Result<()> {
        if self.charts.is_empty() {
            return Ok(());
        }

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result: io::Result<()> = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => {
                        if !self.apply(key_action(key)) {
                            break Ok(());
                        }
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }
        };

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Draw one chart into `area`.
pub fn render_chart(frame: &mut Frame, area: Rect, chart: &Chart, theme: &Theme) {
    match chart {
        Chart::Line(line) => render_line_chart(frame, area, line, theme),
        Chart::Bar(bar) => render_bar_chart(frame, area, bar, theme),
    }
}

fn titled_block<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled(format!(" {} ", title), theme.title))
}

fn render_no_data(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let paragraph = Paragraph::new(Line::from("No data to display"))
        .alignment(Alignment::Center)
        .style(theme.axis)
        .block(titled_block(title, theme));
    frame.render_widget(paragraph, area);
}

fn render_line_chart(frame: &mut Frame, area: Rect, chart: &LineChart, theme: &Theme) {
    let Some(bounds) = chart.bounds() else {
        render_no_data(frame, area, &chart.title, theme);
        return;
    };
    let (x0, x1) = bounds.x;
    let (y0, y1) = bounds.y;

    // Datasets borrow their points, so every point list is built up front.
    let series_points: Vec<Vec<(f64, f64)>> = chart
        .series
        .iter()
        .map(|s| {
            s.points
                .iter()
                .copied()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .collect()
        })
        .collect();
    let highlight_edges: Vec<Vec<(f64, f64)>> = chart
        .highlight
        .iter()
        .flat_map(|h| [vec![(h.start, y0), (h.start, y1)], vec![(h.end, y0), (h.end, y1)]])
        .collect();
    let annotation_point: Vec<(f64, f64)> = chart.annotation.iter().map(|a| a.point).collect();

    let mut datasets = Vec::new();
    for (i, (series, points)) in chart.series.iter().zip(&series_points).enumerate() {
        let base = Style::default().fg(theme.series_color(i));
        let style = match series.emphasis {
            Emphasis::Faint => base.add_modifier(Modifier::DIM),
            Emphasis::Normal => base,
            Emphasis::Bold => base.add_modifier(Modifier::BOLD),
        };
        datasets.push(
            Dataset::default()
                .name(series.label.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(style)
                .data(points),
        );
    }
    if let Some(h) = &chart.highlight {
        for (j, edge) in highlight_edges.iter().enumerate() {
            let mut dataset = Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.highlight)
                .data(edge);
            if j == 0 {
                dataset = dataset.name(h.label.clone());
            }
            datasets.push(dataset);
        }
    }
    if let Some(a) = &chart.annotation {
        datasets.push(
            Dataset::default()
                .name(a.text.clone())
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(theme.annotation)
                .data(&annotation_point),
        );
    }

    let x_span = bounds.x_span();
    let y_span = bounds.y_span();
    let x_labels: Vec<String> = [x0, (x0 + x1) / 2.0, x1]
        .iter()
        .map(|v| format_x_tick(chart.x_kind, *v, x_span))
        .collect();
    let y_labels: Vec<String> = [y0, (y0 + y1) / 2.0, y1]
        .iter()
        .map(|v| format_number_tick(*v, y_span))
        .collect();

    let widget = ChartWidget::new(datasets)
        .block(titled_block(&chart.title, theme))
        .x_axis(
            Axis::default()
                .title(Span::styled(chart.x_label.clone(), theme.axis_title))
                .style(theme.axis)
                .bounds([x0, x1])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(chart.y_label.clone(), theme.axis_title))
                .style(theme.axis)
                .bounds([y0, y1])
                .labels(y_labels),
        );
    frame.render_widget(widget, area);
}

fn render_bar_chart(frame: &mut Frame, area: Rect, chart: &BarChart, theme: &Theme) {
    if chart.bars.is_empty() {
        render_no_data(frame, area, &chart.title, theme);
        return;
    }

    let data: Vec<(&str, u64)> = chart
        .bars
        .iter()
        .map(|(label, count)| (label.as_str(), *count))
        .collect();
    let n = data.len() as u16;
    let inner_width = area.width.saturating_sub(2);
    let bar_width = (inner_width / n.max(1)).saturating_sub(1).clamp(1, 12);

    let widget = BarWidget::default()
        .block(titled_block(&chart.title, theme))
        .data(data.as_slice())
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(theme.bar)
        .value_style(theme.bar_value)
        .label_style(theme.bar_label);
    frame.render_widget(widget, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
