//! k6 NDJSON result discovery and loading.
//!
//! Every `*.json` file under `<results>/k6-results/` is one test case. Each
//! line is a JSON record; only `"type": "Point"` records are kept.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use compare_core::error::{CompareError, Result};
use compare_core::models::MetricPoint;
use compare_core::settings::AnalysisConfig;
use tracing::{debug, error, info, warn};

/// Subdirectory of the results directory holding k6 output.
pub const K6_RESULTS_DIR: &str = "k6-results";

/// All points read from one k6 output file.
#[derive(Debug, Clone)]
pub struct LoadedTestCase {
    /// Test case name: the file name without extension.
    pub name: String,
    pub path: PathBuf,
    pub points: Vec<MetricPoint>,
    /// `true` when only every N-th line of the file was read.
    pub sampled: bool,
    /// Number of non-blank lines inspected.
    pub lines_read: usize,
    /// Lines that were malformed or not `Point` records.
    pub lines_skipped: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find the regular files directly inside `dir` with the given extension,
/// sorted by path.
pub fn find_files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == extension)
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load every test case under `<results_dir>/k6-results/`.
///
/// A missing directory yields an empty list. A file that cannot be read is
/// logged and skipped.
pub fn load_k6_results(results_dir: &Path, config: &AnalysisConfig) -> Vec<LoadedTestCase> {
    let k6_dir = results_dir.join(K6_RESULTS_DIR);
    if !k6_dir.is_dir() {
        error!("K6 results directory not found: {}", k6_dir.display());
        return Vec::new();
    }

    let files = find_files_with_extension(&k6_dir, "json");
    if files.is_empty() {
        warn!("No k6 result files found in {}", k6_dir.display());
    }

    let mut test_cases = Vec::with_capacity(files.len());
    for path in &files {
        match load_test_case(path, config) {
            Ok(test_case) => {
                info!(
                    "Loaded {} metric points for {}",
                    test_case.points.len(),
                    test_case.name
                );
                test_cases.push(test_case);
            }
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }
    test_cases
}

/// Load a single k6 output file.
///
/// Files larger than [`AnalysisConfig::sampling_threshold_bytes`] are
/// streamed and only every [`AnalysisConfig::sample_stride`]-th line is
/// parsed; smaller files are read whole.
pub fn load_test_case(path: &Path, config: &AnalysisConfig) -> Result<LoadedTestCase> {
    let name = test_case_name(path);
    let size = std::fs::metadata(path)
        .map_err(|source| CompareError::FileRead {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    let sampled = size > config.sampling_threshold_bytes;
    info!("Loading K6 results for {}...", name);

    let mut test_case = LoadedTestCase {
        name,
        path: path.to_path_buf(),
        points: Vec::new(),
        sampled,
        lines_read: 0,
        lines_skipped: 0,
    };

    if sampled {
        warn!(
            "{} is {:.1} MB; sampling every {} lines",
            path.display(),
            size as f64 / (1024.0 * 1024.0),
            config.sample_stride
        );
        let file = std::fs::File::open(path).map_err(|source| CompareError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let stride = config.sample_stride.max(1);
        let reader = std::io::BufReader::new(file);
        for (index, line_result) in reader.split(b'\n').enumerate() {
            if index % stride != 0 {
                continue;
            }
            let line = line_result.map_err(|source| CompareError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
            ingest_raw_line(&mut test_case, &line, index);
        }
    } else {
        let content = std::fs::read(path).map_err(|source| CompareError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        for (index, line) in content.split(|b| *b == b'\n').enumerate() {
            ingest_raw_line(&mut test_case, line, index);
        }
    }

    debug!(
        "File {}: {} read, {} skipped, {} points",
        path.display(),
        test_case.lines_read,
        test_case.lines_skipped,
        test_case.points.len(),
    );

    Ok(test_case)
}

/// Parse one NDJSON line into a [`MetricPoint`].
///
/// Returns `None` for blank lines, malformed JSON, records whose `type` is
/// not `"Point"`, and `Point` records without a numeric `data.value`.
pub fn parse_point_line(line: &str) -> Option<MetricPoint> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(trimmed).ok()?;
    if value.get("type").and_then(|t| t.as_str()) != Some("Point") {
        return None;
    }
    serde_json::from_value(value).ok()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Decode one raw line; a line that is not valid UTF-8 counts as skipped.
fn ingest_raw_line(test_case: &mut LoadedTestCase, raw: &[u8], index: usize) {
    match std::str::from_utf8(raw) {
        Ok(line) => ingest_line(test_case, line),
        Err(e) => {
            debug!(
                "{}: skipping line {} ({})",
                test_case.name,
                index + 1,
                e
            );
            test_case.lines_read += 1;
            test_case.lines_skipped += 1;
        }
    }
}

fn ingest_line(test_case: &mut LoadedTestCase, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    test_case.lines_read += 1;
    match parse_point_line(line) {
        Some(point) => test_case.points.push(point),
        None => test_case.lines_skipped += 1,
    }
}

fn test_case_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
