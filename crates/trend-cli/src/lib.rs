//! Shared plumbing of the trend analyzer binaries: logging setup, report
//! text, chart assembly and chart output.

pub mod bootstrap;
pub mod output;
pub mod report;
