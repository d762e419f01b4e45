//! Chart images via `plotters`: SVG for `.svg` paths, PNG bitmaps otherwise.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;
use trend_core::error::{AnalyzerError, Result};

use crate::charts::{format_number_tick, format_x_tick, BarChart, Chart, Emphasis, LineChart};

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// Series colours, cycled in order.
const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];
const HIGHLIGHT_COLOR: RGBColor = RGBColor(255, 165, 0);
const FONT: &str = "sans-serif";

/// Render `chart` into an image file of `size` pixels.
///
/// A line chart without any point is rejected with
/// [`AnalyzerError::EmptyDataset`] instead of producing a blank image.
pub fn save_chart(chart: &Chart, path: &Path, size: (u32, u32)) -> Result<()> {
    if let Chart::Line(line) = chart {
        if line.is_empty() {
            return Err(AnalyzerError::EmptyDataset(format!(
                "nothing to plot for '{}'",
                line.title
            )));
        }
    }

    let result = if is_svg(path) {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_chart(&root, chart)
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw_chart(&root, chart)
    };
    result.map_err(|e| AnalyzerError::Render(format!("{}: {}", path.display(), e)))?;

    info!("Saved chart '{}' to {}", chart.title(), path.display());
    Ok(())
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

fn draw_chart<DB>(root: &DrawingArea<DB, Shift>, chart: &Chart) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    match chart {
        Chart::Line(line) => draw_line_chart(root, line)?,
        Chart::Bar(bar) => draw_bar_chart(root, bar)?,
    }
    root.present()?;
    Ok(())
}

fn series_style(index: usize, emphasis: Emphasis) -> ShapeStyle {
    let color = PALETTE[index % PALETTE.len()];
    match emphasis {
        Emphasis::Faint => color.mix(0.5).stroke_width(1),
        Emphasis::Normal => color.stroke_width(2),
        Emphasis::Bold => color.stroke_width(3),
    }
}

fn draw_line_chart<DB>(root: &DrawingArea<DB, Shift>, line: &LineChart) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let Some(bounds) = line.bounds() else {
        return Ok(());
    };
    let (x0, x1) = bounds.x;
    let (y0, y1) = bounds.y;
    let x_span = bounds.x_span();
    let y_span = bounds.y_span();

    let mut ctx = ChartBuilder::on(root)
        .caption(&line.title, (FONT, 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    let x_fmt = |v: &f64| format_x_tick(line.x_kind, *v, x_span);
    let y_fmt = |v: &f64| format_number_tick(*v, y_span);
    let mut mesh = ctx.configure_mesh();
    mesh.x_desc(line.x_label.as_str())
        .y_desc(line.y_label.as_str())
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .x_labels(8)
        .y_labels(8);
    if line.grid {
        mesh.light_line_style(BLACK.mix(0.05))
            .bold_line_style(BLACK.mix(0.2));
    } else {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    if let Some(h) = &line.highlight {
        let fill = HIGHLIGHT_COLOR.mix(0.15).filled();
        ctx.draw_series(std::iter::once(Rectangle::new(
            [(h.start, y0), (h.end, y1)],
            fill,
        )))?
        .label(h.label.as_str())
        .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 20, y + 6)], fill));
    }

    for (i, series) in line.series.iter().enumerate() {
        let style = series_style(i, series.emphasis);
        let points = series
            .points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite());
        ctx.draw_series(LineSeries::new(points, style))?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    if let Some(a) = &line.annotation {
        let (px, py) = a.point;
        let text_at = (
            (px + a.text_offset.0).min(x1),
            (py + a.text_offset.1).min(y1),
        );
        ctx.draw_series(std::iter::once(Circle::new((px, py), 5, BLACK.filled())))?;
        ctx.draw_series(std::iter::once(PathElement::new(
            vec![text_at, (px, py)],
            BLACK.stroke_width(1),
        )))?;
        ctx.draw_series(std::iter::once(Text::new(
            a.text.clone(),
            text_at,
            (FONT, 20).into_font(),
        )))?;
    }

    ctx.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_bar_chart<DB>(root: &DrawingArea<DB, Shift>, bar: &BarChart) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = bar.bars.len().max(1);
    let y_max = bar.y_max();

    let mut ctx = ChartBuilder::on(root)
        .caption(&bar.title, (FONT, 30))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

    let x_fmt = |v: &f64| bar.label_at(*v).unwrap_or_default().to_string();
    let y_fmt = |v: &f64| format!("{:.0}", v);
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc(bar.x_label.as_str())
        .y_desc(bar.y_label.as_str())
        .x_labels(n)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .draw()?;

    let color = PALETTE[0];
    ctx.draw_series(bar.bars.iter().enumerate().map(|(i, (_, count))| {
        let x = i as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *count as f64)], color.filled())
    }))?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
