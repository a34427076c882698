use serde::Serialize;

/// Smallest sample size for which a 20-bucket quantile (p95) is computed.
pub const P95_MIN_SAMPLES: usize = 21;
/// Smallest sample size for which a 100-bucket quantile (p99) is computed.
pub const P99_MIN_SAMPLES: usize = 101;
/// Assumed test duration used to turn operation counts into a rate.
pub const DEFAULT_WINDOW_SECONDS: f64 = 300.0;

// ── Quantile helpers ──────────────────────────────────────────────────────────

/// Cut point `cut` of `buckets` equal-probability groups over a **sorted**
/// slice, using the exclusive method (sample treated as drawn from a larger
/// population, positions scaled by `n + 1`).
///
/// `sorted` must hold at least two values and `0 < cut < buckets`.
pub fn quantile_exclusive(sorted: &[f64], buckets: usize, cut: usize) -> f64 {
    let n = sorted.len();
    debug_assert!(n >= 2, "quantile_exclusive needs two or more samples");
    let m = n + 1;
    let j = (cut * m / buckets).clamp(1, n - 1);
    let delta = (cut * m) as f64 - (j * buckets) as f64;
    let buckets = buckets as f64;
    (sorted[j - 1] * (buckets - delta) + sorted[j] * delta) / buckets
}

/// Median of a **sorted** slice; the mean of the two middle values when the
/// length is even. Returns `0.0` for an empty slice.
pub fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// `errors / operations * 100`, or `0.0` when no operations were recorded.
pub fn error_rate_percent(errors: u64, operations: f64) -> f64 {
    if operations <= 0.0 {
        return 0.0;
    }
    errors as f64 / operations * 100.0
}

// ── LatencyStats ──────────────────────────────────────────────────────────────

/// Summary of response-time samples for one test case and application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// 95th percentile, or `max` below [`P95_MIN_SAMPLES`] samples.
    pub p95: f64,
    /// 99th percentile, or `max` below [`P99_MIN_SAMPLES`] samples.
    pub p99: f64,
}

impl LatencyStats {
    /// Summarize `samples`.
    ///
    /// Returns `None` for an empty slice; a zero-count summary is never built.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let min = sorted[0];
        let max = sorted[count - 1];
        let mean = sorted.iter().sum::<f64>() / count as f64;

        let p95 = if count >= P95_MIN_SAMPLES {
            quantile_exclusive(&sorted, 20, 19)
        } else {
            max
        };
        let p99 = if count >= P99_MIN_SAMPLES {
            quantile_exclusive(&sorted, 100, 99)
        } else {
            max
        };

        Some(Self {
            count,
            min,
            max,
            mean,
            median: median(&sorted),
            p95,
            p99,
        })
    }
}

// ── ThroughputStats ───────────────────────────────────────────────────────────

/// Operation and error totals for one test case and application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThroughputStats {
    pub operations: f64,
    pub errors: u64,
    pub error_rate_percent: f64,
    /// `operations / window_seconds`; the window is assumed, not measured.
    pub ops_per_sec: f64,
}

impl ThroughputStats {
    /// Derive rates from raw totals.
    ///
    /// Returns `None` when `operations` is zero.
    pub fn new(operations: f64, errors: u64, window_seconds: f64) -> Option<Self> {
        if operations <= 0.0 {
            return None;
        }
        let ops_per_sec = if window_seconds > 0.0 {
            operations / window_seconds
        } else {
            0.0
        };
        Some(Self {
            operations,
            errors,
            error_rate_percent: error_rate_percent(errors, operations),
            ops_per_sec,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(n: usize) -> Vec<f64> {
        (1..=n).map(|v| v as f64).collect()
    }

    // ── quantile_exclusive ────────────────────────────────────────────────────

    #[test]
    fn test_quantile_p95_of_21_values() {
        // statistics.quantiles(range(1, 22), n=20)[18] == 20.9
        let q = quantile_exclusive(&seq(21), 20, 19);
        assert!((q - 20.9).abs() < 1e-9, "got {q}");
    }

    #[test]
    fn test_quantile_p99_of_101_values() {
        let q = quantile_exclusive(&seq(101), 100, 99);
        assert!((q - 100.98).abs() < 1e-9, "got {q}");
    }

    #[test]
    fn test_quantile_median_cut_of_odd_sample() {
        let q = quantile_exclusive(&seq(5), 2, 1);
        assert!((q - 3.0).abs() < 1e-9);
    }

    // ── median ────────────────────────────────────────────────────────────────

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[1.0, 2.0, 9.0]), 2.0);
        assert_eq!(median(&[1.0, 2.0, 4.0, 9.0]), 3.0);
        assert_eq!(median(&[]), 0.0);
    }

    // ── LatencyStats ──────────────────────────────────────────────────────────

    #[test]
    fn test_latency_empty_is_no_data() {
        assert!(LatencyStats::from_samples(&[]).is_none());
    }

    #[test]
    fn test_latency_basic_fields() {
        let stats = LatencyStats::from_samples(&[20.0, 10.0]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 20.0);
        assert!((stats.mean - 15.0).abs() < 1e-9);
        assert!((stats.median - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_latency_small_samples_fall_back_to_max() {
        for n in 1..=20 {
            let samples: Vec<f64> = seq(n).into_iter().rev().collect();
            let stats = LatencyStats::from_samples(&samples).unwrap();
            assert_eq!(stats.p95, n as f64, "p95 for n={n}");
            assert_eq!(stats.p99, n as f64, "p99 for n={n}");
        }
    }

    #[test]
    fn test_latency_mid_samples_interpolate_p95_only() {
        for n in [21usize, 50, 100] {
            let samples = seq(n);
            let stats = LatencyStats::from_samples(&samples).unwrap();
            let expected = quantile_exclusive(&samples, 20, 19);
            assert!((stats.p95 - expected).abs() < 1e-9, "p95 for n={n}");
            assert!(stats.p95 < stats.max, "p95 for n={n} should interpolate");
            assert_eq!(stats.p99, n as f64, "p99 for n={n}");
        }
    }

    #[test]
    fn test_latency_large_samples_interpolate_p99() {
        let stats = LatencyStats::from_samples(&seq(101)).unwrap();
        assert!((stats.p99 - 100.98).abs() < 1e-9);
    }

    #[test]
    fn test_latency_unsorted_input() {
        let stats = LatencyStats::from_samples(&[5.0, 1.0, 3.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.max, 5.0);
    }

    // ── ThroughputStats ───────────────────────────────────────────────────────

    #[test]
    fn test_error_rate_zero_operations() {
        assert_eq!(error_rate_percent(5, 0.0), 0.0);
    }

    #[test]
    fn test_error_rate_ratio() {
        assert!((error_rate_percent(3, 200.0) - 1.5).abs() < 1e-9);
        assert_eq!(error_rate_percent(0, 10.0), 0.0);
    }

    #[test]
    fn test_throughput_no_operations_is_no_data() {
        assert!(ThroughputStats::new(0.0, 2, DEFAULT_WINDOW_SECONDS).is_none());
    }

    #[test]
    fn test_throughput_uses_fixed_window() {
        // 300 s is an assumed duration, not a measured one.
        let stats = ThroughputStats::new(600.0, 6, DEFAULT_WINDOW_SECONDS).unwrap();
        assert!((stats.ops_per_sec - 2.0).abs() < 1e-9);
        assert!((stats.error_rate_percent - 1.0).abs() < 1e-9);
        assert_eq!(stats.errors, 6);
    }
}
