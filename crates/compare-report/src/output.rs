//! Output file layout under `<results_dir>/reports/`.

use std::path::{Path, PathBuf};

use compare_core::error::Result;
use compare_data::analysis::BenchmarkAnalysis;
use tracing::info;

use crate::charts::render_charts;
use crate::markdown::render_report;

pub const REPORTS_DIR: &str = "reports";
pub const REPORT_FILE: &str = "benchmark_comparison_report.md";
pub const CHART_FILE: &str = "performance_comparison_charts.png";

/// Create `<results_dir>/reports/` if needed and return its path.
pub fn ensure_reports_dir(results_dir: &Path) -> Result<PathBuf> {
    let dir = results_dir.join(REPORTS_DIR);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Render the Markdown report into `reports_dir` and return the file path.
pub fn write_report(analysis: &BenchmarkAnalysis, reports_dir: &Path) -> Result<PathBuf> {
    let report = render_report(analysis)?;
    let path = reports_dir.join(REPORT_FILE);
    std::fs::write(&path, report)?;
    info!("Report saved to: {}", path.display());
    Ok(path)
}

/// Render the comparison charts into `reports_dir` and return the file path.
pub fn write_charts(analysis: &BenchmarkAnalysis, reports_dir: &Path) -> Result<PathBuf> {
    let path = reports_dir.join(CHART_FILE);
    render_charts(analysis, &path)?;
    info!("Charts saved to: {}", path.display());
    Ok(path)
}
