//! Writing chart images and opening the terminal viewer.

use anyhow::Context;
use tracing::{info, warn};
use trend_core::settings::AnalyzerConfig;
use trend_render::{save_chart, ChartViewer, Theme};

use crate::report::NamedChart;

/// Save `charts` under the configured output directory (unless `no_save`)
/// and then page through them in the terminal when `show` is set.
pub fn emit_charts(charts: Vec<NamedChart>, config: &AnalyzerConfig) -> anyhow::Result<()> {
    if charts.is_empty() {
        warn!("No charts to render");
        return Ok(());
    }

    if !config.no_save {
        std::fs::create_dir_all(&config.output_dir).with_context(|| {
            format!("creating output directory {}", config.output_dir.display())
        })?;
        for named in &charts {
            let path = config.output_dir.join(&named.file_name);
            save_chart(&named.chart, &path, config.chart_size())?;
        }
        info!(
            "Wrote {} chart(s) to {}",
            charts.len(),
            config.output_dir.display()
        );
    }

    if config.show {
        let charts = charts.into_iter().map(|named| named.chart).collect();
        ChartViewer::new(charts, Theme::from_name(&config.theme))
            .show()
            .context("terminal chart viewer failed")?;
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
