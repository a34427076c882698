//! Markdown comparison report.
//!
//! Sections are emitted in a fixed order: caveats, per-application response
//! time and throughput tables, a cross-application table per test case, the
//! memory comparison (only when every application has a snapshot) and the
//! summary. Test case/application pairs without data produce no row.

use std::fmt::Write;

use compare_core::error::Result;
use compare_core::formatting::{format_count, format_fixed, format_number};
use compare_core::models::{Application, ErrorHealth};
use compare_data::analysis::{BenchmarkAnalysis, TestCaseResult};
use compare_data::prometheus::SnapshotValue;

/// Series compared in the memory table; each is matched as a substring.
pub const MEMORY_METRICS: &[&str] = &[
    "benchmark_memory_usage_bytes",
    "go_memstats_heap_alloc_bytes",
    "process_resident_memory_bytes",
];

const NOT_AVAILABLE: &str = "N/A";

/// Render the full report.
pub fn render_report(analysis: &BenchmarkAnalysis) -> Result<String> {
    let mut out = String::new();

    write_header(&mut out, analysis)?;
    write_response_times(&mut out, analysis)?;
    write_throughput(&mut out, analysis)?;
    write_cross_application(&mut out, analysis)?;
    if analysis.has_all_snapshots() {
        write_memory_comparison(&mut out, analysis)?;
    }
    write_summary(&mut out, analysis)?;

    Ok(out)
}

// ── Sections ──────────────────────────────────────────────────────────────────

fn write_header(out: &mut String, analysis: &BenchmarkAnalysis) -> std::fmt::Result {
    let meta = &analysis.metadata;
    writeln!(out, "# Go vs C# Performance Benchmark Report")?;
    writeln!(out)?;
    writeln!(
        out,
        "Generated on: {}",
        meta.generated_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out)?;
    writeln!(out, "Results directory: `{}`", meta.results_dir.display())?;
    writeln!(out)?;

    writeln!(out, "## Caveats")?;
    writeln!(out)?;
    writeln!(
        out,
        "- Operations per second assume a fixed {}-second test window; the actual test duration is not measured.",
        format_number(meta.window_seconds, 0)
    )?;
    for name in &meta.sampled_test_cases {
        writeln!(
            out,
            "- `{}` exceeded {} MB and was sampled (every {}th line); its counts and rates are approximate.",
            name,
            meta.sampling_threshold_bytes / (1024 * 1024),
            meta.sample_stride
        )?;
    }
    writeln!(out)
}

fn write_response_times(out: &mut String, analysis: &BenchmarkAnalysis) -> std::fmt::Result {
    writeln!(out, "## Response Time Analysis")?;
    writeln!(out)?;

    for app in Application::ALL {
        writeln!(out, "### {}", app.display_name())?;
        writeln!(out)?;

        let rows: Vec<_> = analysis
            .test_cases
            .iter()
            .filter_map(|tc| tc.response_time.get(app).as_ref().map(|s| (tc, s)))
            .collect();
        if rows.is_empty() {
            writeln!(out, "_No response time data._")?;
            writeln!(out)?;
            continue;
        }

        writeln!(
            out,
            "| Test | Count | Min (ms) | Mean (ms) | Median (ms) | P95 (ms) | P99 (ms) | Max (ms) |"
        )?;
        writeln!(
            out,
            "|------|-------|----------|-----------|-------------|----------|----------|----------|"
        )?;
        for (tc, stats) in rows {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} | {} |",
                tc.name,
                format_count(stats.count as u64),
                format_fixed(stats.min),
                format_fixed(stats.mean),
                format_fixed(stats.median),
                format_fixed(stats.p95),
                format_fixed(stats.p99),
                format_fixed(stats.max),
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_throughput(out: &mut String, analysis: &BenchmarkAnalysis) -> std::fmt::Result {
    writeln!(out, "## Throughput Analysis")?;
    writeln!(out)?;

    for app in Application::ALL {
        writeln!(out, "### {}", app.display_name())?;
        writeln!(out)?;

        let rows: Vec<_> = analysis
            .test_cases
            .iter()
            .filter_map(|tc| tc.throughput.get(app).as_ref().map(|s| (tc, s)))
            .collect();
        if rows.is_empty() {
            writeln!(out, "_No throughput data._")?;
            writeln!(out)?;
            continue;
        }

        writeln!(out, "| Test | Operations | Errors | Error Rate (%) | Ops/sec |")?;
        writeln!(out, "|------|------------|--------|----------------|---------|")?;
        for (tc, stats) in rows {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                tc.name,
                format_number(stats.operations, 0),
                format_count(stats.errors),
                format_fixed(stats.error_rate_percent),
                format_fixed(stats.ops_per_sec),
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_cross_application(out: &mut String, analysis: &BenchmarkAnalysis) -> std::fmt::Result {
    writeln!(out, "## Cross-Application Comparison")?;
    writeln!(out)?;

    for tc in analysis.test_cases.iter().filter(|tc| !tc.is_empty()) {
        writeln!(out, "### {}", tc.name)?;
        writeln!(out)?;
        writeln!(
            out,
            "| Application | Mean (ms) | P95 (ms) | Ops/sec | Error Rate (%) |"
        )?;
        writeln!(
            out,
            "|-------------|-----------|----------|---------|----------------|"
        )?;
        for app in Application::ALL {
            let latency = tc.response_time.get(app).as_ref();
            let throughput = tc.throughput.get(app).as_ref();
            if latency.is_none() && throughput.is_none() {
                continue;
            }
            writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                app.display_name(),
                fixed_or_na(latency.map(|s| s.mean)),
                fixed_or_na(latency.map(|s| s.p95)),
                fixed_or_na(throughput.map(|s| s.ops_per_sec)),
                fixed_or_na(throughput.map(|s| s.error_rate_percent)),
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_memory_comparison(out: &mut String, analysis: &BenchmarkAnalysis) -> std::fmt::Result {
    writeln!(out, "## Application Metrics Comparison")?;
    writeln!(out)?;
    writeln!(out, "### Memory Usage")?;
    writeln!(out)?;

    write!(out, "| Metric |")?;
    for app in Application::ALL {
        write!(out, " {} |", app.display_name())?;
    }
    writeln!(out)?;
    write!(out, "|--------|")?;
    for _ in Application::ALL {
        write!(out, "----|")?;
    }
    writeln!(out)?;

    for metric in MEMORY_METRICS {
        write!(out, "| {} |", metric)?;
        for (_, snapshot) in analysis.snapshots.iter() {
            let cell = snapshot
                .as_ref()
                .and_then(|s| s.find_containing(metric))
                .map(format_snapshot_value)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            write!(out, " {} |", cell)?;
        }
        writeln!(out)?;
    }
    writeln!(out)
}

fn write_summary(out: &mut String, analysis: &BenchmarkAnalysis) -> std::fmt::Result {
    writeln!(out, "## Summary and Recommendations")?;
    writeln!(out)?;
    writeln!(out, "### Key Findings")?;
    writeln!(out)?;

    let mut any_finding = false;
    for tc in &analysis.test_cases {
        if let Some((app, stats)) = tc.fastest() {
            any_finding = true;
            writeln!(
                out,
                "- **{}** fastest response time: {} ({}ms average)",
                tc.name,
                app.display_name(),
                format_fixed(stats.mean)
            )?;
        }
        if let Some((app, stats)) = tc.highest_throughput() {
            any_finding = true;
            writeln!(
                out,
                "- **{}** highest throughput: {} ({} ops/sec)",
                tc.name,
                app.display_name(),
                format_fixed(stats.ops_per_sec)
            )?;
        }
    }
    if !any_finding {
        writeln!(out, "- No attributable metric points were found.")?;
    }
    writeln!(out)?;

    write_error_health(out, analysis)?;

    writeln!(out, "### Recommendations")?;
    writeln!(out)?;
    writeln!(out, "Based on the benchmark results:")?;
    writeln!(out)?;
    writeln!(out, "1. Review application metrics in Grafana for detailed insights")?;
    writeln!(out, "2. Analyze memory usage patterns and garbage collection behavior")?;
    writeln!(out, "3. Consider connection pool tuning based on database stress test results")?;
    writeln!(out, "4. Monitor error rates and investigate any performance degradation")?;
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out)?;
    writeln!(out, "*This report was generated automatically by bench-compare.*")
}

fn write_error_health(out: &mut String, analysis: &BenchmarkAnalysis) -> std::fmt::Result {
    let with_throughput: Vec<&TestCaseResult> = analysis
        .test_cases
        .iter()
        .filter(|tc| tc.throughput.present().next().is_some())
        .collect();
    if with_throughput.is_empty() {
        return Ok(());
    }

    writeln!(out, "### Error Rate Health")?;
    writeln!(out)?;
    writeln!(out, "🟢 below 1% · 🟡 1–5% · 🔴 above 5%")?;
    writeln!(out)?;
    for tc in with_throughput {
        let cells: Vec<String> = tc
            .throughput
            .present()
            .map(|(app, stats)| {
                let health = ErrorHealth::from_error_rate(stats.error_rate_percent);
                format!(
                    "{} {} {}% ({})",
                    health.emoji(),
                    app.display_name(),
                    format_fixed(stats.error_rate_percent),
                    health.label()
                )
            })
            .collect();
        writeln!(out, "- **{}**: {}", tc.name, cells.join(", "))?;
    }
    writeln!(out)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn fixed_or_na(value: Option<f64>) -> String {
    value
        .map(format_fixed)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn format_snapshot_value(value: &SnapshotValue) -> String {
    match value {
        SnapshotValue::Number(v) => format_fixed(*v),
        SnapshotValue::Text(raw) => raw.clone(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use compare_core::classifier::ClassifierTable;
    use compare_core::models::{MetricPoint, PerApplication, PointData};
    use compare_core::settings::AnalysisConfig;
    use compare_data::analysis::build_analysis;
    use compare_data::prometheus::{parse_exposition, PrometheusSnapshot};
    use compare_data::reader::LoadedTestCase;
    use std::path::{Path, PathBuf};

    fn point(metric: &str, value: f64) -> MetricPoint {
        MetricPoint {
            metric: metric.to_string(),
            data: PointData {
                value,
                time: None,
                tags: None,
            },
        }
    }

    fn test_case(name: &str, points: Vec<MetricPoint>) -> LoadedTestCase {
        LoadedTestCase {
            name: name.to_string(),
            path: PathBuf::from(format!("{name}.json")),
            points,
            sampled: false,
            lines_read: 0,
            lines_skipped: 0,
        }
    }

    fn snapshot(text: &str) -> Option<PrometheusSnapshot> {
        Some(PrometheusSnapshot {
            file_name: "snap.txt".to_string(),
            metrics: parse_exposition(text),
        })
    }

    fn analysis_of(
        cases: Vec<LoadedTestCase>,
        snapshots: PerApplication<Option<PrometheusSnapshot>>,
    ) -> BenchmarkAnalysis {
        build_analysis(
            &cases,
            snapshots,
            &ClassifierTable::default(),
            &AnalysisConfig::default(),
            Path::new("/results"),
        )
    }

    fn sample_cases() -> Vec<LoadedTestCase> {
        vec![
            test_case(
                "api-load-test",
                vec![
                    point("go_response_time", 10.0),
                    point("go_response_time", 20.0),
                    point("csharp_dapper_response_time", 40.0),
                    point("go_operations", 600.0),
                    point("go_errors", 1.0),
                    point("csharp_dapper_operations", 300.0),
                    point("csharp_dapper_errors", 1.0),
                    point("csharp_dapper_errors", 1.0),
                    point("csharp_dapper_errors", 1.0),
                    point("csharp_dapper_errors", 1.0),
                    point("csharp_dapper_errors", 1.0),
                    point("csharp_dapper_errors", 1.0),
                ],
            ),
            test_case("empty-test", vec![point("vus", 10.0)]),
        ]
    }

    #[test]
    fn test_section_order() {
        let report = render_report(&analysis_of(sample_cases(), PerApplication::default())).unwrap();
        let positions: Vec<usize> = [
            "## Caveats",
            "## Response Time Analysis",
            "## Throughput Analysis",
            "## Cross-Application Comparison",
            "## Summary and Recommendations",
        ]
        .iter()
        .map(|h| report.find(h).unwrap_or_else(|| panic!("missing {h}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_response_time_row_uses_two_decimals() {
        let report = render_report(&analysis_of(sample_cases(), PerApplication::default())).unwrap();
        assert!(report
            .contains("| api-load-test | 2 | 10.00 | 15.00 | 15.00 | 20.00 | 20.00 | 20.00 |"));
    }

    #[test]
    fn test_no_data_rows_omitted() {
        let report = render_report(&analysis_of(sample_cases(), PerApplication::default())).unwrap();
        assert!(!report.contains("| empty-test |"));
        assert!(!report.contains("### empty-test"));
        // C# EF has no samples anywhere.
        assert!(report.contains("### C# EF\n\n_No response time data._"));
        assert!(!report.contains("| C# EF |"));
    }

    #[test]
    fn test_throughput_row() {
        let report = render_report(&analysis_of(sample_cases(), PerApplication::default())).unwrap();
        assert!(report.contains("| api-load-test | 600 | 1 | 0.17 | 2.00 |"));
        assert!(report.contains("| api-load-test | 300 | 6 | 2.00 | 1.00 |"));
    }

    #[test]
    fn test_cross_application_marks_missing_half() {
        let cases = vec![test_case(
            "t",
            vec![point("go_response_time", 5.0), point("csharp_ef_operations", 30.0)],
        )];
        let report = render_report(&analysis_of(cases, PerApplication::default())).unwrap();
        assert!(report.contains("| Go | 5.00 | 5.00 | N/A | N/A |"));
        assert!(report.contains("| C# EF | N/A | N/A | 0.10 | 0.00 |"));
    }

    #[test]
    fn test_summary_winner_and_health() {
        let report = render_report(&analysis_of(sample_cases(), PerApplication::default())).unwrap();
        assert!(report.contains("- **api-load-test** fastest response time: Go (15.00ms average)"));
        assert!(report.contains("- **api-load-test** highest throughput: Go (2.00 ops/sec)"));
        assert!(report.contains("🟢 Go 0.17% (healthy)"));
        assert!(report.contains("🟡 C# Dapper 2.00% (warning)"));
    }

    #[test]
    fn test_caveats_mention_window_and_sampling() {
        let mut cases = sample_cases();
        cases[0].sampled = true;
        let report = render_report(&analysis_of(cases, PerApplication::default())).unwrap();
        assert!(report.contains("fixed 300-second test window"));
        assert!(report.contains("`api-load-test` exceeded 50 MB and was sampled (every 10th line)"));
    }

    #[test]
    fn test_memory_section_requires_every_snapshot() {
        let partial = PerApplication {
            go: snapshot("benchmark_memory_usage_bytes 1024\n"),
            csharp_ef: None,
            csharp_dapper: snapshot("benchmark_memory_usage_bytes 2048\n"),
        };
        let report = render_report(&analysis_of(sample_cases(), partial)).unwrap();
        assert!(!report.contains("## Application Metrics Comparison"));
    }

    #[test]
    fn test_memory_section_values() {
        let snapshots = PerApplication {
            go: snapshot(
                "benchmark_memory_usage_bytes{type=\"heap\"} 1024\n\
                 go_memstats_heap_alloc_bytes 512\n",
            ),
            csharp_ef: snapshot("benchmark_memory_usage_bytes{type=\"heap\"} 2048\n"),
            csharp_dapper: snapshot("benchmark_memory_usage_bytes{type=\"heap\"} unknown\n"),
        };
        let report = render_report(&analysis_of(sample_cases(), snapshots)).unwrap();
        assert!(report.contains("## Application Metrics Comparison"));
        assert!(report.contains("| benchmark_memory_usage_bytes | 1,024.00 | 2,048.00 | unknown |"));
        assert!(report.contains("| go_memstats_heap_alloc_bytes | 512.00 | N/A | N/A |"));
    }

    #[test]
    fn test_empty_analysis_still_renders() {
        let report = render_report(&analysis_of(Vec::new(), PerApplication::default())).unwrap();
        assert!(report.contains("# Go vs C# Performance Benchmark Report"));
        assert!(report.contains("- No attributable metric points were found."));
        assert!(!report.contains("### Error Rate Health"));
    }
}
