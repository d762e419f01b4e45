use anyhow::Result;
use clap::Parser;
use trend_cli::{bootstrap, output, report};
use trend_core::settings::{AnalyzerConfig, JsonSettings};
use trend_data::analysis::{analyze_json, AnalysisOptions};
use trend_data::loader::load_json;

fn main() -> Result<()> {
    let settings = JsonSettings::parse();
    let config = AnalyzerConfig::resolve(&settings.output)?;
    bootstrap::setup_logging(&config.log_level)?;

    tracing::info!("Loading JSON from {}", settings.json_file.display());
    let dataset = load_json(&settings.json_file)?;
    let analysis = analyze_json(
        dataset,
        &settings.metric,
        settings.instrument.as_deref(),
        &AnalysisOptions::from(&config),
    )?;

    print!("{}", report::render_json_report(&analysis));
    let charts = report::json_charts(&analysis);
    if charts.is_empty() {
        tracing::warn!("No valid values for metric '{}'; skipping plot", settings.metric);
    }
    output::emit_charts(charts, &config)
}
