//! Data ingestion and analysis for the trend analyzers.
//!
//! Parses log lines, loads CSV/JSON/log files into datasets, filters and
//! aggregates them, generates the synthetic demo signal and runs the
//! per-tool analysis pipelines.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod loader;
pub mod parser;
pub mod synthetic;

pub use trend_core as core;
