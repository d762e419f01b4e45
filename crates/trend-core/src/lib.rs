//! Shared building blocks for the trend analyzers.
//!
//! Holds the error taxonomy, the record/dataset model, timestamp parsing,
//! descriptive statistics and smoothing, text formatting of summaries, and
//! the CLI settings plus persisted configuration.

pub mod calculations;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{AnalyzerError, Result};
