use crate::kind::CollectorFamily;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Main configuration struct for gcscope
#[derive(Debug, Clone, Default, Serialize)]
pub struct GcScopeConfig {
    pub parser: ParserConfig,
    pub analysis: AnalysisConfig,
}

/// Parsing configuration
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParserConfig {
    /// Collector family to assume instead of detecting it from the log
    pub collector: Option<CollectorFamily>,
    /// Wall-clock JVM start; anchors logs that only carry datestamps
    pub jvm_start: Option<DateTime<FixedOffset>>,
    /// Keep informational lines (blank, tenuring, heap dumps...) in the event stream
    pub keep_discardable: bool,
}

/// Analysis thresholds
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisConfig {
    /// Share of wall-clock time spent paused at which the overhead limit applies
    pub overhead_pause_ratio: f64,
    /// Largest average share of the heap reclaimed per collection under overhead
    pub overhead_reclaim_ratio: f64,
    /// Throughput below this ratio is reported
    pub throughput_threshold: f64,
    pub max_pause_ms: u64,
    /// Occupancy after collection over the smallest capacity seen
    pub heap_undersized_ratio: f64,
    /// Occupancy after collection over the largest capacity seen
    pub heap_oversized_ratio: f64,
    /// Old-generation occupancy after collection over capacity, incremental CMS
    pub no_headroom_ratio: f64,
    /// GC pause time over total safepoint stopped time
    pub safepoint_gc_ratio: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            overhead_pause_ratio: 0.98,
            overhead_reclaim_ratio: 0.02,
            throughput_threshold: 0.90,
            max_pause_ms: 1000,
            heap_undersized_ratio: 0.90,
            heap_oversized_ratio: 0.25,
            no_headroom_ratio: 0.90,
            safepoint_gc_ratio: 0.80,
        }
    }
}

/// Family named by a config value, e.g. `g1`, `cms`, `parallel`
pub fn parse_collector(name: &str) -> Option<CollectorFamily> {
    match name.trim().to_ascii_lowercase().as_str() {
        "serial" => Some(CollectorFamily::Serial),
        "parallel" | "ps" => Some(CollectorFamily::Parallel),
        "cms" | "concurrent mark sweep" => Some(CollectorFamily::Cms),
        "g1" => Some(CollectorFamily::G1),
        "shenandoah" => Some(CollectorFamily::Shenandoah),
        "z" | "zgc" => Some(CollectorFamily::Z),
        _ => None,
    }
}
