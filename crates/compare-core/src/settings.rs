use clap::Parser;
use std::path::PathBuf;

use crate::stats::DEFAULT_WINDOW_SECONDS;

/// Files larger than this are subsampled by the loader.
pub const SAMPLING_THRESHOLD_BYTES: u64 = 50 * 1024 * 1024;
/// Keep one line out of this many when subsampling.
pub const SAMPLE_STRIDE: usize = 10;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Compare load-test results and system metrics across benchmark targets
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bench-compare",
    about = "Compare load-test results and system metrics across benchmark targets",
    version
)]
pub struct Settings {
    /// Benchmark results directory (contains k6-results/ and prometheus-metrics/)
    pub results_dir: PathBuf,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,
}

impl Settings {
    /// Parse settings from an explicit argument list (program name first).
    ///
    /// Returns the clap error unchanged so the caller can decide how to print
    /// it and which exit code to use.
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args)
    }
}

// ── AnalysisConfig ─────────────────────────────────────────────────────────────

/// Tunables for the analysis pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Files strictly larger than this many bytes are subsampled.
    pub sampling_threshold_bytes: u64,
    /// Subsampling keeps every `sample_stride`-th line, starting with the first.
    pub sample_stride: usize,
    /// Assumed test duration used for operations-per-second.
    pub window_seconds: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sampling_threshold_bytes: SAMPLING_THRESHOLD_BYTES,
            sample_stride: SAMPLE_STRIDE,
            window_seconds: DEFAULT_WINDOW_SECONDS,
        }
    }
}
