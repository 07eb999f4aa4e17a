//! Findings and the report handed to the rendering side.

use super::profiler::GcStats;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// What a finding points at. Evidence refers to data, it never owns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Evidence {
    /// Position in the event stream
    Event { index: usize },
    /// A `RunMetadata` field or command-line flag
    Metadata { field: String },
    /// A named `GcStats` value
    Statistic { name: &'static str, value: f64 },
}

impl Evidence {
    pub fn metadata(field: impl Into<String>) -> Self {
        Evidence::Metadata {
            field: field.into(),
        }
    }

    pub fn statistic(name: &'static str, value: f64) -> Self {
        Evidence::Statistic { name, value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub id: &'static str,
    pub severity: Severity,
    pub message: String,
    pub evidence: Vec<Evidence>,
}

impl Finding {
    pub fn new(id: &'static str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id,
            severity,
            message: message.into(),
            evidence: Vec::new(),
        }
    }

    pub fn with_evidence(mut self, evidence: impl IntoIterator<Item = Evidence>) -> Self {
        self.evidence.extend(evidence);
        self
    }
}

/// Statistics plus every finding, in rule order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub stats: GcStats,
    pub findings: Vec<Finding>,
}

impl AnalysisReport {
    pub fn finding(&self, id: &str) -> Option<&Finding> {
        self.findings.iter().find(|f| f.id == id)
    }

    pub fn has_finding(&self, id: &str) -> bool {
        self.finding(id).is_some()
    }

    pub fn max_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
