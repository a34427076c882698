//! Rendering layer: the Markdown report and the PNG comparison charts.

pub mod charts;
pub mod markdown;
pub mod output;

pub use output::{ensure_reports_dir, write_charts, write_report};
