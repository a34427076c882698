//! Per-application accumulation of classified metric points.

use std::collections::BTreeMap;

use compare_core::classifier::ClassifierTable;
use compare_core::models::{MetricKind, MetricPoint, PerApplication};
use compare_core::stats::{LatencyStats, ThroughputStats};

use crate::reader::LoadedTestCase;

// ── AppAccumulator ────────────────────────────────────────────────────────────

/// Raw samples and counters gathered for one application in one test case.
#[derive(Debug, Clone, Default)]
pub struct AppAccumulator {
    pub latencies: Vec<f64>,
    pub operations: f64,
    pub errors: u64,
}

impl AppAccumulator {
    /// Fold one observation into the running totals.
    ///
    /// Non-finite values are ignored. An error observation counts once when
    /// its value is positive.
    pub fn record(&mut self, kind: MetricKind, value: f64) {
        if !value.is_finite() {
            return;
        }
        match kind {
            MetricKind::Latency => self.latencies.push(value),
            MetricKind::Operations => self.operations += value,
            MetricKind::Errors => {
                if value > 0.0 {
                    self.errors += 1;
                }
            }
        }
    }

    pub fn latency_stats(&self) -> Option<LatencyStats> {
        LatencyStats::from_samples(&self.latencies)
    }

    pub fn throughput_stats(&self, window_seconds: f64) -> Option<ThroughputStats> {
        ThroughputStats::new(self.operations, self.errors, window_seconds)
    }
}

// ── ResultAggregator ──────────────────────────────────────────────────────────

/// Response-time stats keyed by test case name.
pub type ResponseTimeAnalysis = BTreeMap<String, PerApplication<Option<LatencyStats>>>;
/// Throughput stats keyed by test case name.
pub type ThroughputAnalysis = BTreeMap<String, PerApplication<Option<ThroughputStats>>>;

/// Stateless helper that turns metric points into per-application stats.
pub struct ResultAggregator;

impl ResultAggregator {
    /// Route every point to its application's accumulator.
    ///
    /// Points the classifier cannot attribute are dropped.
    pub fn accumulate(
        points: &[MetricPoint],
        table: &ClassifierTable,
    ) -> PerApplication<AppAccumulator> {
        let mut accumulators: PerApplication<AppAccumulator> = PerApplication::default();
        for point in points {
            if let Some(attr) = table.classify(&point.metric) {
                accumulators
                    .get_mut(attr.application)
                    .record(attr.kind, point.data.value);
            }
        }
        accumulators
    }

    /// Latency stats per test case and application.
    pub fn analyze_response_times(
        test_cases: &[LoadedTestCase],
        table: &ClassifierTable,
    ) -> ResponseTimeAnalysis {
        test_cases
            .iter()
            .map(|tc| {
                let acc = Self::accumulate(&tc.points, table);
                (tc.name.clone(), acc.map(|_, a| a.latency_stats()))
            })
            .collect()
    }

    /// Throughput stats per test case and application.
    pub fn analyze_throughput(
        test_cases: &[LoadedTestCase],
        table: &ClassifierTable,
        window_seconds: f64,
    ) -> ThroughputAnalysis {
        test_cases
            .iter()
            .map(|tc| {
                let acc = Self::accumulate(&tc.points, table);
                (
                    tc.name.clone(),
                    acc.map(|_, a| a.throughput_stats(window_seconds)),
                )
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
