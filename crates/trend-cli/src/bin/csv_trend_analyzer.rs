use anyhow::Result;
use clap::Parser;
use trend_cli::{bootstrap, output, report};
use trend_core::settings::{AnalyzerConfig, CsvSettings};
use trend_data::analysis::{analyze_csv, AnalysisOptions};
use trend_data::loader::load_csv;

fn main() -> Result<()> {
    let settings = CsvSettings::parse();
    let config = AnalyzerConfig::resolve(&settings.output)?;
    bootstrap::setup_logging(&config.log_level)?;

    tracing::info!("Loading CSV from {}", settings.csv_file.display());
    let dataset = load_csv(&settings.csv_file)?;
    let analysis = analyze_csv(
        dataset,
        settings.instrument.as_deref(),
        &AnalysisOptions::from(&config),
    )?;

    print!("{}", report::render_csv_report(&analysis));
    output::emit_charts(report::csv_charts(&analysis), &config)
}
