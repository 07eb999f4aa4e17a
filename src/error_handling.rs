use indexmap::IndexMap;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Failure to read the timestamp prefix of a line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecoratorError {
    #[error("no recognizable decorator prefix")]
    Unrecognized,
    #[error("malformed decorator '{0}'")]
    Malformed(String),
}

/// Failure to normalize a size or duration sub-field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasurementError {
    #[error("invalid measurement '{0}'")]
    Invalid(String),
    #[error("measurement '{0}' overflows the supported range")]
    Overflow(String),
    #[error("unknown unit in '{0}'")]
    UnknownUnit(String),
}

/// Programming defects in the event registry. These are never caused by input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("registry entry '{entry}' matched but capture group '{group}' is missing")]
    InvariantViolation { entry: &'static str, group: &'static str },
    #[error("registry entry '{entry}' failed to compile: {message}")]
    InvalidPattern { entry: &'static str, message: String },
}

/// Why a line produced a warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum WarningReason {
    Decorator(String),
    Measurement(String),
    Unclassified,
    TruncatedConstruct,
    MemoryAnomaly(String),
}

impl WarningReason {
    pub fn label(&self) -> &'static str {
        match self {
            WarningReason::Decorator(_) => "decorator",
            WarningReason::Measurement(_) => "measurement",
            WarningReason::Unclassified => "unclassified",
            WarningReason::TruncatedConstruct => "truncated_construct",
            WarningReason::MemoryAnomaly(_) => "memory_anomaly",
        }
    }

    pub fn severity(&self) -> WarningSeverity {
        match self {
            WarningReason::TruncatedConstruct => WarningSeverity::Medium,
            WarningReason::Unclassified => WarningSeverity::Medium,
            WarningReason::Decorator(_) | WarningReason::Measurement(_) => WarningSeverity::Soft,
            WarningReason::MemoryAnomaly(_) => WarningSeverity::Soft,
        }
    }
}

impl From<DecoratorError> for WarningReason {
    fn from(err: DecoratorError) -> Self {
        WarningReason::Decorator(err.to_string())
    }
}

impl From<MeasurementError> for WarningReason {
    fn from(err: MeasurementError) -> Self {
        WarningReason::Measurement(err.to_string())
    }
}

/// Severity levels for input-driven warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    Medium, // Unclassified line, truncated construct
    Soft,   // Bad sub-field, memory anomaly
}

/// A recoverable problem found while parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub line_number: usize,
    pub raw_text: String,
    pub reason: WarningReason,
}

impl Warning {
    pub fn new(line_number: usize, raw_text: impl Into<String>, reason: WarningReason) -> Self {
        Self {
            line_number,
            raw_text: raw_text.into(),
            reason,
        }
    }
}

/// Collects warnings in input order and keeps per-reason counts for summaries
#[derive(Debug, Default, Clone)]
pub struct WarningReporter {
    warnings: Vec<Warning>,
    counts: IndexMap<&'static str, usize>,
    examples: IndexMap<&'static str, Vec<String>>,
}

const MAX_EXAMPLES: usize = 3;

impl WarningReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, warning: Warning) {
        let label = warning.reason.label();
        *self.counts.entry(label).or_insert(0) += 1;

        let examples = self.examples.entry(label).or_default();
        if examples.len() < MAX_EXAMPLES {
            examples.push(format!("line {}: {}", warning.line_number, warning.raw_text));
        }

        tracing::trace!(line = warning.line_number, reason = label, "parse warning");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    pub fn count(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn has_medium(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.reason.severity() == WarningSeverity::Medium)
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// JSON summary: counts and a few examples per reason
    pub fn generate_summary(&self) -> Option<String> {
        if self.warnings.is_empty() {
            return None;
        }

        let mut summary = json!({});
        for (label, count) in &self.counts {
            let examples = self.examples.get(label).cloned().unwrap_or_default();
            summary[*label] = json!({
                "count": count,
                "examples": examples,
            });
        }

        Some(
            serde_json::to_string_pretty(&summary)
                .unwrap_or_else(|_| "Error serializing summary".to_string()),
        )
    }
}
