//! Main analysis pipeline.
//!
//! Loads k6 results and Prometheus snapshots from a results directory and
//! returns a [`BenchmarkAnalysis`] ready for the report and chart renderers.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use compare_core::classifier::ClassifierTable;
use compare_core::models::{Application, PerApplication};
use compare_core::settings::AnalysisConfig;
use compare_core::stats::{LatencyStats, ThroughputStats};
use serde::Serialize;

use crate::aggregator::ResultAggregator;
use crate::prometheus::{load_prometheus_metrics, PrometheusSnapshot};
use crate::reader::{load_k6_results, LoadedTestCase};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    pub generated_at: DateTime<Local>,
    pub results_dir: PathBuf,
    /// Number of k6 files successfully loaded.
    pub files_loaded: usize,
    /// Total `Point` records across all loaded files.
    pub points_loaded: usize,
    /// Names of test cases read through line sampling.
    pub sampled_test_cases: Vec<String>,
    /// Line stride used for sampled test cases.
    pub sample_stride: usize,
    /// Size above which a file is sampled.
    pub sampling_threshold_bytes: u64,
    /// Assumed test duration behind every ops/sec figure.
    pub window_seconds: f64,
    /// Wall-clock seconds spent loading input files.
    pub load_time_seconds: f64,
}

/// Stats for one test case across every application.
#[derive(Debug, Clone, Serialize)]
pub struct TestCaseResult {
    pub name: String,
    pub sampled: bool,
    pub response_time: PerApplication<Option<LatencyStats>>,
    pub throughput: PerApplication<Option<ThroughputStats>>,
}

impl TestCaseResult {
    /// Application with the lowest mean response time.
    pub fn fastest(&self) -> Option<(Application, &LatencyStats)> {
        self.response_time
            .present()
            .min_by(|(_, a), (_, b)| a.mean.total_cmp(&b.mean))
    }

    /// Application with the highest operations per second.
    pub fn highest_throughput(&self) -> Option<(Application, &ThroughputStats)> {
        self.throughput
            .present()
            .max_by(|(_, a), (_, b)| a.ops_per_sec.total_cmp(&b.ops_per_sec))
    }

    /// `true` when no application has any data for this test case.
    pub fn is_empty(&self) -> bool {
        self.response_time.present().next().is_none() && self.throughput.present().next().is_none()
    }
}

/// The complete output of [`analyze_results`].
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkAnalysis {
    /// Test cases in name order.
    pub test_cases: Vec<TestCaseResult>,
    pub snapshots: PerApplication<Option<PrometheusSnapshot>>,
    pub metadata: AnalysisMetadata,
}

impl BenchmarkAnalysis {
    /// `true` when a snapshot exists for every application.
    pub fn has_all_snapshots(&self) -> bool {
        self.snapshots.is_complete()
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full analysis pipeline over `results_dir`.
///
/// 1. Load k6 result files (sampling large ones).
/// 2. Classify points and compute per-application stats.
/// 3. Load the latest Prometheus snapshot per application.
pub fn analyze_results(results_dir: &Path, config: &AnalysisConfig) -> BenchmarkAnalysis {
    let load_start = std::time::Instant::now();
    let test_cases = load_k6_results(results_dir, config);
    let snapshots = load_prometheus_metrics(results_dir);
    let load_time = load_start.elapsed().as_secs_f64();

    let mut analysis = build_analysis(
        &test_cases,
        snapshots,
        &ClassifierTable::default(),
        config,
        results_dir,
    );
    analysis.metadata.load_time_seconds = load_time;
    analysis
}

/// Compute stats for already-loaded test cases.
pub fn build_analysis(
    test_cases: &[LoadedTestCase],
    snapshots: PerApplication<Option<PrometheusSnapshot>>,
    table: &ClassifierTable,
    config: &AnalysisConfig,
    results_dir: &Path,
) -> BenchmarkAnalysis {
    let mut response_times = ResultAggregator::analyze_response_times(test_cases, table);
    let mut throughput =
        ResultAggregator::analyze_throughput(test_cases, table, config.window_seconds);

    let results: Vec<TestCaseResult> = test_cases
        .iter()
        .map(|tc| TestCaseResult {
            name: tc.name.clone(),
            sampled: tc.sampled,
            response_time: response_times.remove(&tc.name).unwrap_or_default(),
            throughput: throughput.remove(&tc.name).unwrap_or_default(),
        })
        .collect();

    let metadata = AnalysisMetadata {
        generated_at: Local::now(),
        results_dir: results_dir.to_path_buf(),
        files_loaded: test_cases.len(),
        points_loaded: test_cases.iter().map(|tc| tc.points.len()).sum(),
        sampled_test_cases: test_cases
            .iter()
            .filter(|tc| tc.sampled)
            .map(|tc| tc.name.clone())
            .collect(),
        sample_stride: config.sample_stride,
        sampling_threshold_bytes: config.sampling_threshold_bytes,
        window_seconds: config.window_seconds,
        load_time_seconds: 0.0,
    };

    BenchmarkAnalysis {
        test_cases: results,
        snapshots,
        metadata,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
