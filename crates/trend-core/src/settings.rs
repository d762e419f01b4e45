use clap::{Args, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ── Shared CLI options ─────────────────────────────────────────────────────────

/// Output and runtime options shared by every analyzer binary.
///
/// Every field is optional so that values from the config file are only
/// overridden when given explicitly on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Directory chart images are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Open the terminal chart viewer after rendering
    #[arg(long)]
    pub show: bool,

    /// Do not write chart images
    #[arg(long)]
    pub no_save: bool,

    /// Terminal viewer theme
    #[arg(long, value_parser = ["auto", "dark", "light"])]
    pub theme: Option<String>,

    /// Rolling-mean window in samples
    #[arg(long)]
    pub rolling_window: Option<usize>,

    /// Logging level
    #[arg(long, value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: Option<String>,

    /// Config file (defaults to ~/.trend-analyzer/config.json)
    #[arg(long, env = "TREND_ANALYZER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Store the effective options as the new defaults in the config file
    #[arg(long)]
    pub save_config: bool,
}

// ── Per-binary settings ────────────────────────────────────────────────────────

/// Parse CSV logs and analyze trends.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "csv-trend-analyzer",
    about = "Parse CSV logs and analyze trends.",
    version
)]
pub struct CsvSettings {
    /// Path to CSV file
    pub csv_file: PathBuf,

    /// Optional instrument_id to filter on
    #[arg(long)]
    pub instrument: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Parse JSON measurement logs and plot trends.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "json-trend-analyzer",
    about = "Parse JSON measurement logs and plot trends.",
    version
)]
pub struct JsonSettings {
    /// Path to JSON file
    pub json_file: PathBuf,

    /// Name of numeric metric field to analyze (e.g., pressure_kpa)
    #[arg(long)]
    pub metric: String,

    /// Optional instrument_id to filter on (e.g., IVD-001)
    #[arg(long)]
    pub instrument: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Parse plain-text log files and analyze trends.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "log-trend-analyzer",
    about = "Parse plain-text log files and analyze trends.",
    version
)]
pub struct LogSettings {
    /// Path to log file
    pub log_file: PathBuf,

    /// Numeric metric key to plot (e.g., pressure_kpa)
    #[arg(long)]
    pub metric: Option<String>,

    /// Optional instrument_id to filter on (e.g., IVD-001)
    #[arg(long)]
    pub instrument: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Plot a noisy synthetic signal together with its moving average.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "time-series-plot",
    about = "Plot a noisy sine wave and its moving-average smoothing.",
    version
)]
pub struct TimeSeriesSettings {
    /// Number of samples
    #[arg(long, default_value = "500", value_parser = clap::value_parser!(u32).range(1..))]
    pub points: u32,

    /// Standard deviation of the added Gaussian noise
    #[arg(long, default_value = "0.4")]
    pub noise: f64,

    /// Moving-average window in samples
    #[arg(long, default_value = "25")]
    pub window: usize,

    /// Seed for the noise generator (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where the chart is written; `.svg` selects SVG output, anything else PNG
    #[arg(long, default_value = "time_series_plot.png")]
    pub output: PathBuf,

    /// Open the terminal chart viewer after rendering
    #[arg(long)]
    pub show: bool,

    /// Terminal viewer theme
    #[arg(long, default_value = "auto", value_parser = ["auto", "dark", "light"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,
}

// ── AnalyzerConfig ─────────────────────────────────────────────────────────────

/// Persisted analyzer defaults, read from `~/.trend-analyzer/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Window of the trailing rolling mean drawn over raw series.
    pub rolling_window: usize,
    /// Directory chart images are written to.
    pub output_dir: PathBuf,
    /// Status value that does not count as a failure.
    pub pass_status: String,
    /// Log levels counted in the per-instrument alert chart.
    pub alert_levels: Vec<String>,
    /// Terminal viewer theme (`auto`, `dark`, `light`).
    pub theme: String,
    pub chart_width: u32,
    pub chart_height: u32,
    pub log_level: String,
    /// Open the terminal viewer after rendering.
    #[serde(skip)]
    pub show: bool,
    /// Skip writing chart images.
    #[serde(skip)]
    pub no_save: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            rolling_window: 5,
            output_dir: PathBuf::from("plots"),
            pass_status: "PASS".to_string(),
            alert_levels: vec!["WARN".to_string(), "ERROR".to_string()],
            theme: "auto".to_string(),
            chart_width: 1280,
            chart_height: 720,
            log_level: "INFO".to_string(),
            show: false,
            no_save: false,
        }
    }
}

impl AnalyzerConfig {
    /// Default location of the config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".trend-analyzer").join("config.json")
    }

    /// Load the config from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write the config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Load the config named by `args` (or the default path) and apply the
    /// explicit CLI overrides on top.  Persists the result when
    /// `--save-config` was given.
    pub fn resolve(args: &OutputArgs) -> Result<Self, std::io::Error> {
        let path = args.config.clone().unwrap_or_else(Self::config_path);
        let config = Self::load_from(&path).with_overrides(args);
        if args.save_config {
            config.save_to(&path)?;
        }
        Ok(config)
    }

    /// Apply every option that was given on the command line.
    pub fn with_overrides(mut self, args: &OutputArgs) -> Self {
        if let Some(dir) = &args.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(theme) = &args.theme {
            self.theme = theme.clone();
        }
        if let Some(window) = args.rolling_window {
            self.rolling_window = window;
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
        self.show = args.show;
        self.no_save = args.no_save;
        self
    }

    /// Size of rendered chart images in pixels.
    pub fn chart_size(&self) -> (u32, u32) {
        (self.chart_width, self.chart_height)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
