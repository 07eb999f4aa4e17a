//! Analysis of a parsed log
//!
//! Computes run-wide statistics from the event stream and evaluates every
//! rule in [`rules::RULES`] against the stream, the run metadata and those
//! statistics. Analysis borrows the parsed log and never changes it, so
//! running it twice yields the same report.

mod profiler;
mod report;
pub mod rules;

pub use profiler::{GcStats, HeapSizing, KindStats, PauseDistribution};
pub use report::{AnalysisReport, Evidence, Finding, Severity};

use crate::config::AnalysisConfig;
use crate::pipeline::ParsedLog;
use rules::{RuleContext, RULES};

/// Main entry point for log analysis
pub fn analyze(log: &ParsedLog, config: &AnalysisConfig) -> AnalysisReport {
    let stats = GcStats::from_stream(&log.events);
    let ctx = RuleContext {
        events: &log.events,
        metadata: &log.metadata,
        stats: &stats,
        config,
    };

    let findings = RULES
        .iter()
        .filter_map(|(id, rule)| {
            let finding = rule(&ctx);
            if finding.is_some() {
                tracing::debug!(rule = *id, "rule fired");
            }
            finding
        })
        .collect();

    AnalysisReport { stats, findings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::pipeline::GcLogParser;

    #[test]
    fn test_analysis_is_idempotent() {
        let input = "\
1.000: [Full GC (System.gc()) [PSYoungGen: 512K->0K(1024K)] [ParOldGen: 2048K->1800K(4096K)] 2560K->1800K(5120K), [Metaspace: 2800K->2800K(1056768K)], 0.0500000 secs] [Times: user=0.10 sys=0.00, real=0.05 secs]
2.000: [GC (Allocation Failure) [PSYoungGen: 1024K->128K(1024K)] 2824K->1928K(5120K), 0.0100000 secs] [Times: user=0.02 sys=0.00, real=0.01 secs]
";
        let log = GcLogParser::parse_str(input, ParserConfig::default()).unwrap();
        let config = AnalysisConfig::default();
        let first = analyze(&log, &config);
        let second = analyze(&log, &config);
        assert_eq!(first, second);
        assert!(first.has_finding("explicit.gc"));
        assert_eq!(first.stats.pause_count, 2);
        assert_eq!(first.stats.full_collections, 1);
    }
}
