//! Chart rendering for the trend analyzers.
//!
//! [`charts`] describes what to draw independently of any backend;
//! [`image`] writes PNG/SVG files with `plotters` and [`terminal`] pages
//! through charts interactively with `ratatui`.

pub mod charts;
pub mod image;
pub mod terminal;
pub mod themes;

pub use charts::Chart;
pub use image::save_chart;
pub use terminal::ChartViewer;
pub use themes::Theme;
