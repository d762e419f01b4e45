use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;
use trend_cli::{bootstrap, report};
use trend_core::settings::TimeSeriesSettings;
use trend_data::analysis::{build_time_series, TimeSeriesOptions};
use trend_render::{save_chart, ChartViewer, Theme};

/// Image size of the saved plot, in pixels.
const PLOT_SIZE: (u32, u32) = (3000, 1500);

fn main() -> Result<()> {
    let settings = TimeSeriesSettings::parse();
    bootstrap::setup_logging(&settings.log_level)?;

    let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!("Noise seed: {}", seed);

    let signal = build_time_series(&TimeSeriesOptions {
        points: settings.points as usize,
        noise: settings.noise,
        window: settings.window,
        seed,
    })?;
    print!("{}", report::render_time_series_summary(&signal));

    let chart = report::time_series_chart(&signal);
    if let Some(parent) = settings.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    save_chart(&chart, &settings.output, PLOT_SIZE)?;

    if settings.show {
        ChartViewer::new(vec![chart], Theme::from_name(&settings.theme))
            .show()
            .context("terminal chart viewer failed")?;
    }
    Ok(())
}
