//! Metric-name attribution.
//!
//! Each k6 metric name is mapped to the application that produced it and to
//! the kind of measurement it carries. Both lookups walk an ordered rule list
//! and stop at the first substring that matches, so more specific markers
//! must come before any marker they contain.

use crate::models::{Application, MetricKind};

/// The `(application, kind)` pair a metric name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribution {
    pub application: Application,
    pub kind: MetricKind,
}

/// Ordered substring rules consulted by [`ClassifierTable::classify`].
#[derive(Debug, Clone)]
pub struct ClassifierTable {
    applications: Vec<(&'static str, Application)>,
    kinds: Vec<(&'static str, MetricKind)>,
}

/// Application markers. Qualified C# markers only; a bare `"csharp"` would
/// attribute one C# variant's metrics to the other.
const APPLICATION_RULES: &[(&str, Application)] = &[
    ("csharp_dapper", Application::CsharpDapper),
    ("csharp_ef", Application::CsharpEf),
    ("go_", Application::Go),
];

const KIND_RULES: &[(&str, MetricKind)] = &[
    ("response_time", MetricKind::Latency),
    ("duration", MetricKind::Latency),
    ("errors", MetricKind::Errors),
    ("failed", MetricKind::Errors),
    ("operations", MetricKind::Operations),
    ("requests", MetricKind::Operations),
    ("reqs", MetricKind::Operations),
];

impl Default for ClassifierTable {
    fn default() -> Self {
        Self {
            applications: APPLICATION_RULES.to_vec(),
            kinds: KIND_RULES.to_vec(),
        }
    }
}

impl ClassifierTable {
    /// Build a table from explicit rule lists, highest priority first.
    pub fn new(
        applications: Vec<(&'static str, Application)>,
        kinds: Vec<(&'static str, MetricKind)>,
    ) -> Self {
        Self {
            applications,
            kinds,
        }
    }

    /// First application whose marker occurs in `name`.
    pub fn application_for(&self, name: &str) -> Option<Application> {
        self.applications
            .iter()
            .find(|(marker, _)| name.contains(marker))
            .map(|&(_, app)| app)
    }

    /// First measurement kind whose marker occurs in `name`.
    pub fn kind_for(&self, name: &str) -> Option<MetricKind> {
        self.kinds
            .iter()
            .find(|(marker, _)| name.contains(marker))
            .map(|&(_, kind)| kind)
    }

    /// Resolve `name` to an [`Attribution`].
    ///
    /// Returns `None` unless both an application and a kind marker match.
    pub fn classify(&self, name: &str) -> Option<Attribution> {
        let application = self.application_for(name)?;
        let kind = self.kind_for(name)?;
        Some(Attribution { application, kind })
    }
}
