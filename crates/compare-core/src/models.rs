use serde::{Deserialize, Serialize};
use std::fmt;

/// The benchmarked server implementations, in report order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Application {
    /// The Go implementation.
    Go,
    /// The C# implementation backed by Entity Framework.
    CsharpEf,
    /// The C# implementation backed by Dapper.
    CsharpDapper,
}

impl Application {
    /// Every application, in the fixed order used by reports and charts.
    pub const ALL: [Application; 3] = [
        Application::Go,
        Application::CsharpEf,
        Application::CsharpDapper,
    ];

    /// Stable snake-case identifier, e.g. `"csharp_dapper"`.
    pub fn key(self) -> &'static str {
        match self {
            Application::Go => "go",
            Application::CsharpEf => "csharp_ef",
            Application::CsharpDapper => "csharp_dapper",
        }
    }

    /// Human-readable label used in report headings and chart legends.
    pub fn display_name(self) -> &'static str {
        match self {
            Application::Go => "Go",
            Application::CsharpEf => "C# EF",
            Application::CsharpDapper => "C# Dapper",
        }
    }

    /// Substring that identifies this application's Prometheus snapshot files.
    pub fn snapshot_marker(self) -> &'static str {
        match self {
            Application::Go => "go_metrics",
            Application::CsharpEf => "csharp_ef_metrics",
            Application::CsharpDapper => "csharp_dapper_metrics",
        }
    }

    /// Marker of a snapshot shared by several applications, used when no
    /// file carries [`snapshot_marker`](Self::snapshot_marker).
    pub fn shared_snapshot_marker(self) -> Option<&'static str> {
        match self {
            Application::Go => None,
            Application::CsharpEf | Application::CsharpDapper => Some("csharp_metrics"),
        }
    }
}

impl fmt::Display for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// What a metric point measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// A single response-time sample in milliseconds.
    Latency,
    /// An increment of the completed-operation counter.
    Operations,
    /// An error observation; counts when its value is positive.
    Errors,
}

/// One `"type": "Point"` record from a k6 NDJSON output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricPoint {
    /// Metric name, e.g. `"go_response_time"`.
    pub metric: String,
    /// Observation payload.
    pub data: PointData,
}

/// Payload of a [`MetricPoint`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointData {
    /// Observed value.
    pub value: f64,
    /// RFC 3339 timestamp as written by k6.
    #[serde(default)]
    pub time: Option<String>,
    /// k6 tags attached to the sample.
    #[serde(default)]
    pub tags: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Traffic-light classification of an error rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorHealth {
    /// Error rate below 1 %.
    Healthy,
    /// Error rate between 1 % and 5 % inclusive.
    Warning,
    /// Error rate above 5 %.
    Critical,
}

impl ErrorHealth {
    /// Classify an error rate given in percent.
    pub fn from_error_rate(percent: f64) -> Self {
        if percent < 1.0 {
            ErrorHealth::Healthy
        } else if percent <= 5.0 {
            ErrorHealth::Warning
        } else {
            ErrorHealth::Critical
        }
    }

    /// Traffic-light emoji for this tier.
    pub fn emoji(self) -> &'static str {
        match self {
            ErrorHealth::Healthy => "🟢",
            ErrorHealth::Warning => "🟡",
            ErrorHealth::Critical => "🔴",
        }
    }

    /// Lowercase tier label.
    pub fn label(self) -> &'static str {
        match self {
            ErrorHealth::Healthy => "healthy",
            ErrorHealth::Warning => "warning",
            ErrorHealth::Critical => "critical",
        }
    }
}

// ── PerApplication ────────────────────────────────────────────────────────────

/// One value per [`Application`], stored as named fields so the fixed
/// application set is enforced by the type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerApplication<T> {
    pub go: T,
    pub csharp_ef: T,
    pub csharp_dapper: T,
}

impl<T> PerApplication<T> {
    /// Build a record by calling `f` once per application.
    pub fn from_fn(mut f: impl FnMut(Application) -> T) -> Self {
        Self {
            go: f(Application::Go),
            csharp_ef: f(Application::CsharpEf),
            csharp_dapper: f(Application::CsharpDapper),
        }
    }

    pub fn get(&self, app: Application) -> &T {
        match app {
            Application::Go => &self.go,
            Application::CsharpEf => &self.csharp_ef,
            Application::CsharpDapper => &self.csharp_dapper,
        }
    }

    pub fn get_mut(&mut self, app: Application) -> &mut T {
        match app {
            Application::Go => &mut self.go,
            Application::CsharpEf => &mut self.csharp_ef,
            Application::CsharpDapper => &mut self.csharp_dapper,
        }
    }

    /// Iterate `(application, value)` pairs in [`Application::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Application, &T)> + '_ {
        Application::ALL.into_iter().map(move |app| (app, self.get(app)))
    }

    /// Transform every value, keeping the application keys.
    pub fn map<U>(&self, mut f: impl FnMut(Application, &T) -> U) -> PerApplication<U> {
        PerApplication::from_fn(|app| f(app, self.get(app)))
    }
}

impl<T> PerApplication<Option<T>> {
    /// Applications that carry a value, in report order.
    pub fn present(&self) -> impl Iterator<Item = (Application, &T)> + '_ {
        self.iter()
            .filter_map(|(app, value)| value.as_ref().map(|v| (app, v)))
    }

    /// `true` when every application carries a value.
    pub fn is_complete(&self) -> bool {
        self.iter().all(|(_, value)| value.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_order_is_fixed() {
        assert_eq!(
            Application::ALL,
            [
                Application::Go,
                Application::CsharpEf,
                Application::CsharpDapper
            ]
        );
        assert!(Application::Go < Application::CsharpDapper);
    }

    #[test]
    fn test_application_labels() {
        assert_eq!(Application::CsharpDapper.key(), "csharp_dapper");
        assert_eq!(Application::CsharpEf.display_name(), "C# EF");
        assert_eq!(Application::Go.to_string(), "Go");
        assert_eq!(Application::Go.snapshot_marker(), "go_metrics");
        assert_eq!(Application::Go.shared_snapshot_marker(), None);
        assert_eq!(
            Application::CsharpDapper.shared_snapshot_marker(),
            Some("csharp_metrics")
        );
    }

    #[test]
    fn test_application_serializes_as_key() {
        let json = serde_json::to_string(&Application::CsharpEf).unwrap();
        assert_eq!(json, "\"csharp_ef\"");
    }

    #[test]
    fn test_metric_point_deserializes_k6_shape() {
        let line = r#"{"type":"Point","metric":"go_response_time","data":{"time":"2024-01-15T10:00:00Z","value":12.5,"tags":{"status":"200"}}}"#;
        let point: MetricPoint = serde_json::from_str(line).unwrap();
        assert_eq!(point.metric, "go_response_time");
        assert_eq!(point.data.value, 12.5);
        assert_eq!(point.data.time.as_deref(), Some("2024-01-15T10:00:00Z"));
        assert!(point.data.tags.is_some());
    }

    #[test]
    fn test_metric_point_without_value_fails() {
        let line = r#"{"metric":"go_response_time","data":{}}"#;
        assert!(serde_json::from_str::<MetricPoint>(line).is_err());
    }

    #[test]
    fn test_error_health_boundaries() {
        assert_eq!(ErrorHealth::from_error_rate(0.0), ErrorHealth::Healthy);
        assert_eq!(ErrorHealth::from_error_rate(0.99), ErrorHealth::Healthy);
        assert_eq!(ErrorHealth::from_error_rate(1.0), ErrorHealth::Warning);
        assert_eq!(ErrorHealth::from_error_rate(5.0), ErrorHealth::Warning);
        assert_eq!(ErrorHealth::from_error_rate(5.01), ErrorHealth::Critical);
    }

    #[test]
    fn test_error_health_display() {
        assert_eq!(ErrorHealth::Healthy.emoji(), "🟢");
        assert_eq!(ErrorHealth::Critical.label(), "critical");
    }

    #[test]
    fn test_per_application_from_fn_and_get() {
        let record = PerApplication::from_fn(|app| app.key().len());
        assert_eq!(*record.get(Application::Go), 2);
        assert_eq!(*record.get(Application::CsharpDapper), 13);
    }

    #[test]
    fn test_per_application_get_mut() {
        let mut record: PerApplication<u32> = PerApplication::default();
        *record.get_mut(Application::CsharpEf) += 3;
        assert_eq!(record.csharp_ef, 3);
        assert_eq!(record.go, 0);
    }

    #[test]
    fn test_per_application_iter_order() {
        let record = PerApplication::from_fn(|app| app);
        let order: Vec<Application> = record.iter().map(|(app, _)| app).collect();
        assert_eq!(order, Application::ALL.to_vec());
    }

    #[test]
    fn test_per_application_present_and_complete() {
        let mut record: PerApplication<Option<f64>> = PerApplication::default();
        assert!(!record.is_complete());
        record.csharp_ef = Some(1.5);
        let present: Vec<Application> = record.present().map(|(app, _)| app).collect();
        assert_eq!(present, vec![Application::CsharpEf]);

        record.go = Some(1.0);
        record.csharp_dapper = Some(2.0);
        assert!(record.is_complete());
    }
}
