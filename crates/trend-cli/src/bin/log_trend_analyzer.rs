use anyhow::Result;
use clap::Parser;
use trend_cli::{bootstrap, output, report};
use trend_core::settings::{AnalyzerConfig, LogSettings};
use trend_data::analysis::{analyze_log, AnalysisOptions};
use trend_data::loader::load_log;

fn main() -> Result<()> {
    let settings = LogSettings::parse();
    let config = AnalyzerConfig::resolve(&settings.output)?;
    bootstrap::setup_logging(&config.log_level)?;

    tracing::info!("Loading log from {}", settings.log_file.display());
    let dataset = load_log(&settings.log_file)?;
    let analysis = analyze_log(
        dataset,
        settings.metric.as_deref(),
        settings.instrument.as_deref(),
        &AnalysisOptions::from(&config),
    )?;

    print!("{}", report::render_log_report(&analysis));
    output::emit_charts(report::log_charts(&analysis), &config)
}
