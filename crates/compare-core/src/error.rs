use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the benchmark comparison tool.
#[derive(Error, Debug)]
pub enum CompareError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The results directory given on the command line does not exist.
    #[error("Results directory does not exist: {0}")]
    ResultsDirNotFound(PathBuf),

    /// An optional input directory (`k6-results`, `prometheus-metrics`) is absent.
    #[error("Directory not found: {0}")]
    MissingDirectory(PathBuf),

    /// There is nothing to plot.
    #[error("No data available for charting")]
    NoChartData,

    /// The chart backend failed to draw or encode the image.
    #[error("Chart rendering failed: {0}")]
    Chart(String),

    /// Writing into an in-memory report buffer failed.
    #[error("Report formatting failed: {0}")]
    Format(#[from] std::fmt::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the comparison crates.
pub type Result<T> = std::result::Result<T, CompareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = CompareError::FileRead {
            path: PathBuf::from("/results/k6-results/api.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/results/k6-results/api.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_results_dir_not_found() {
        let err = CompareError::ResultsDirNotFound(PathBuf::from("/missing/run"));
        assert_eq!(err.to_string(), "Results directory does not exist: /missing/run");
    }

    #[test]
    fn test_error_display_missing_directory() {
        let err = CompareError::MissingDirectory(PathBuf::from("/run/prometheus-metrics"));
        assert_eq!(err.to_string(), "Directory not found: /run/prometheus-metrics");
    }

    #[test]
    fn test_error_display_chart() {
        let err = CompareError::Chart("font not found".to_string());
        assert_eq!(err.to_string(), "Chart rendering failed: font not found");
    }

    #[test]
    fn test_error_display_no_chart_data() {
        assert_eq!(
            CompareError::NoChartData.to_string(),
            "No data available for charting"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CompareError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: CompareError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
