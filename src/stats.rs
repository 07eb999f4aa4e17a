use serde::Serialize;
use std::time::{Duration, Instant};

/// Counters collected during one parsing pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessingStats {
    pub lines_read: usize,
    pub canonical_lines: usize,
    pub events_created: usize,
    pub events_discardable: usize,
    pub lines_unknown: usize,
    pub constructs_truncated: usize,
    pub warnings: usize,
    #[serde(serialize_with = "serialize_millis")]
    pub processing_time: Duration,
    #[serde(skip)]
    pub start_time: Option<Instant>,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u128(d.as_millis())
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn finish(&mut self) {
        if let Some(start) = self.start_time {
            self.processing_time = start.elapsed();
        }
    }

    pub fn format_stats(&self) -> String {
        let mut output = format!(
            "Lines processed: {} total, {} canonical; Events created: {} total, {} discardable",
            self.lines_read, self.canonical_lines, self.events_created, self.events_discardable
        );

        if self.lines_unknown > 0 {
            output.push_str(&format!(", {} unknown", self.lines_unknown));
        }

        if self.constructs_truncated > 0 {
            output.push_str(&format!(", {} truncated", self.constructs_truncated));
        }

        if self.warnings > 0 {
            output.push_str(&format!(", {} warnings", self.warnings));
        }

        let processing_time_ms = self.processing_time.as_millis();
        output.push_str(&format!(" in {}ms", processing_time_ms));

        if processing_time_ms > 0 && self.lines_read > 0 {
            let lines_per_sec = (self.lines_read as f64 * 1000.0) / processing_time_ms as f64;
            output.push_str(&format!(" ({:.0} lines/s)", lines_per_sec));
        }

        output
    }
}
