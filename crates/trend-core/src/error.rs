use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the trend analyzers.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// A required column or field is absent from the source data.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// No usable rows remain after parsing or filtering.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// The requested metric field does not exist in the parsed data.
    #[error("Metric '{0}' not found in data")]
    UnknownMetric(String),

    /// A caller-supplied argument is out of range (e.g. a zero smoothing window).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A CSV document could not be parsed.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The input parsed, but does not have the expected overall shape.
    #[error("Invalid input format: {0}")]
    InvalidFormat(String),

    /// A chart could not be drawn or written.
    #[error("Render error: {0}")]
    Render(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the trend crates.
pub type Result<T> = std::result::Result<T, AnalyzerError>;
