//! Prometheus exposition-format snapshot parsing.
//!
//! Snapshots are plain `name value` text dumps scraped at the end of a run.
//! Only the lexicographically last matching file per application is used.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use compare_core::error::{CompareError, Result};
use compare_core::models::{Application, PerApplication};
use regex::Regex;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::reader::find_files_with_extension;

/// Subdirectory of the results directory holding Prometheus snapshots.
pub const PROMETHEUS_METRICS_DIR: &str = "prometheus-metrics";

/// A sample value: numeric when it parses as `f64`, otherwise the raw text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SnapshotValue {
    Number(f64),
    Text(String),
}

impl SnapshotValue {
    fn parse(raw: &str) -> Self {
        match raw.parse::<f64>() {
            Ok(v) => SnapshotValue::Number(v),
            Err(_) => SnapshotValue::Text(raw.to_string()),
        }
    }
}

/// Parsed contents of one snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrometheusSnapshot {
    /// File name the snapshot was read from.
    pub file_name: String,
    /// Series name (including any label set) to value.
    pub metrics: BTreeMap<String, SnapshotValue>,
}

impl PrometheusSnapshot {
    /// Value of the first series, in name order, whose name contains `needle`.
    pub fn find_containing(&self, needle: &str) -> Option<&SnapshotValue> {
        self.metrics
            .iter()
            .find(|(name, _)| name.contains(needle))
            .map(|(_, value)| value)
    }

    /// Number of distinct series in the snapshot.
    pub fn series_count(&self) -> usize {
        self.metrics.len()
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

fn sample_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Greedy name capture: the split lands on the last whitespace run.
    RE.get_or_init(|| Regex::new(r"^(.*\S)\s+(\S+)$").expect("regex is valid"))
}

/// Parse exposition-format text into a name → value map.
///
/// Blank lines, `#` comments and lines without whitespace are skipped.
/// A repeated name keeps the last value seen.
pub fn parse_exposition(text: &str) -> BTreeMap<String, SnapshotValue> {
    let re = sample_line_regex();
    let mut metrics = BTreeMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(caps) = re.captures(line) else {
            continue;
        };
        metrics.insert(caps[1].to_string(), SnapshotValue::parse(&caps[2]));
    }

    metrics
}

/// Read and parse one snapshot file.
pub fn parse_snapshot_file(path: &Path) -> Result<PrometheusSnapshot> {
    let text = std::fs::read_to_string(path).map_err(|source| CompareError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = PrometheusSnapshot {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        metrics: parse_exposition(&text),
    };
    info!(
        "Parsed {} metrics from {}",
        snapshot.series_count(),
        snapshot.file_name
    );
    Ok(snapshot)
}

// ── Selection ─────────────────────────────────────────────────────────────────

/// Snapshot files in `dir` whose name contains `marker`, sorted by file name.
pub fn matching_snapshot_files(dir: &Path, marker: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = find_files_with_extension(dir, "txt")
        .into_iter()
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().contains(marker))
                .unwrap_or(false)
        })
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files
}

/// The most recent snapshot for `app`, by file-name order.
///
/// Files carrying the application's own marker win; otherwise the latest
/// shared snapshot (`*csharp_metrics*.txt` for the C# applications) is used.
pub fn select_latest_snapshot(dir: &Path, app: Application) -> Option<PathBuf> {
    let mut files = matching_snapshot_files(dir, app.snapshot_marker());
    if files.is_empty() {
        if let Some(shared) = app.shared_snapshot_marker() {
            files = matching_snapshot_files(dir, shared);
        }
    }
    if !files.is_empty() {
        info!("Found {} {} metrics files", files.len(), app.display_name());
    }
    files.into_iter().last()
}

/// Load the latest snapshot for every application from
/// `<results_dir>/prometheus-metrics/`.
///
/// A missing directory or an unreadable file leaves the affected entries
/// empty; nothing here is fatal.
pub fn load_prometheus_metrics(results_dir: &Path) -> PerApplication<Option<PrometheusSnapshot>> {
    let metrics_dir = results_dir.join(PROMETHEUS_METRICS_DIR);
    if !metrics_dir.is_dir() {
        error!(
            "Prometheus metrics directory not found: {}",
            metrics_dir.display()
        );
        return PerApplication::default();
    }

    PerApplication::from_fn(|app| {
        let path = select_latest_snapshot(&metrics_dir, app)?;
        match parse_snapshot_file(&path) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Skipping snapshot {}: {}", path.display(), e);
                None
            }
        }
    })
}
