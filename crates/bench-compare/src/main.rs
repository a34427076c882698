mod bootstrap;

use std::process::ExitCode;

use anyhow::Result;
use compare_core::error::CompareError;
use compare_core::formatting::{format_count, format_number};
use compare_core::settings::{AnalysisConfig, Settings};
use compare_data::analysis::{analyze_results, AnalysisMetadata};
use compare_report::{ensure_reports_dir, write_charts, write_report};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let settings = match Settings::try_from_args(std::env::args_os()) {
        Ok(settings) => settings,
        Err(e) => {
            // --help and --version come through here as well.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = bootstrap::setup_logging(&settings.log_level) {
        eprintln!("Failed to initialise logging: {e}");
    }

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(settings: &Settings) -> Result<()> {
    let results_dir = settings.results_dir.as_path();
    if !results_dir.is_dir() {
        return Err(CompareError::ResultsDirNotFound(results_dir.to_path_buf()).into());
    }

    info!(
        "bench-compare v{} analyzing {}",
        env!("CARGO_PKG_VERSION"),
        results_dir.display()
    );

    let reports_dir = ensure_reports_dir(results_dir)?;
    let analysis = analyze_results(results_dir, &AnalysisConfig::default());

    info!("Generating comparison report...");
    let report_path = write_report(&analysis, &reports_dir)?;

    info!("Generating performance charts...");
    let chart_path = match write_charts(&analysis, &reports_dir) {
        Ok(path) => Some(path),
        Err(CompareError::NoChartData) => {
            warn!("No data available for charting");
            None
        }
        Err(e) => {
            error!("Error generating charts: {e}");
            None
        }
    };

    log_summary(&analysis.metadata);

    info!("Analysis complete!");
    info!("Report: {}", report_path.display());
    if let Some(path) = chart_path {
        info!("Charts: {}", path.display());
    }
    Ok(())
}

fn log_summary(meta: &AnalysisMetadata) {
    info!(
        "Loaded {} points from {} test files in {}s",
        format_count(meta.points_loaded as u64),
        meta.files_loaded,
        format_number(meta.load_time_seconds, 2)
    );
    if !meta.sampled_test_cases.is_empty() {
        warn!(
            "Sampled (every {}th line): {}",
            meta.sample_stride,
            meta.sampled_test_cases.join(", ")
        );
    }
}
