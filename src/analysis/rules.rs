//! The rule set. Each rule is a pure function of the finished stream, the run
//! metadata and the computed statistics, and yields at most one finding.

use super::profiler::GcStats;
use super::report::{Evidence, Finding, Severity};
use crate::config::AnalysisConfig;
use crate::event::{Event, Trigger};
use crate::kind::{CollectorFamily, EventKind};
use crate::metadata::RunMetadata;
use crate::stream::EventStream;

/// Events cited per finding
const MAX_EVIDENCE: usize = 10;

/// Parallel pauses shorter than this are too noisy to judge parallelism
const MIN_PARALLELISM_REAL_MS: u64 = 10;

pub struct RuleContext<'a> {
    pub events: &'a EventStream,
    pub metadata: &'a RunMetadata,
    pub stats: &'a GcStats,
    pub config: &'a AnalysisConfig,
}

pub type Rule = fn(&RuleContext<'_>) -> Option<Finding>;

/// Every rule, in evaluation order
pub static RULES: &[(&str, Rule)] = &[
    ("gc.overhead.limit", gc_overhead_limit),
    ("explicit.gc", explicit_gc),
    ("cms.incremental.no.headroom", cms_incremental_no_headroom),
    ("collector.flags.inconsistent", collector_flags_inconsistent),
    ("heap.undersized", heap_undersized),
    ("heap.oversized", heap_oversized),
    ("cms.concurrent.mode.failure", cms_concurrent_mode_failure),
    ("promotion.failed", promotion_failed),
    ("g1.to.space.exhausted", g1_to_space_exhausted),
    ("parallelism.inverted", parallelism_inverted),
    ("throughput.low", throughput_low),
    ("pause.max.exceeded", pause_max_exceeded),
    ("safepoint.non.gc.overhead", safepoint_non_gc_overhead),
    ("log.truncated", log_truncated),
];

/// Stream positions of matching events, capped for evidence
fn cite<'a>(
    events: &'a EventStream,
    predicate: impl Fn(&Event) -> bool + 'a,
) -> (usize, Vec<Evidence>) {
    let mut count = 0;
    let mut evidence = Vec::new();
    for (index, event) in events.iter().enumerate() {
        if predicate(event) {
            count += 1;
            if evidence.len() < MAX_EVIDENCE {
                evidence.push(Evidence::Event { index });
            }
        }
    }
    (count, evidence)
}

fn ratio(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn gc_overhead_limit(ctx: &RuleContext<'_>) -> Option<Finding> {
    let (reported, evidence) = cite(ctx.events, |e| {
        e.kind == EventKind::GcOverheadLimit || e.has_trigger(&Trigger::GcOverheadLimit)
    });
    if reported > 0 {
        return Some(
            Finding::new(
                "gc.overhead.limit",
                Severity::Critical,
                format!("the JVM reported the GC overhead limit {} time(s)", reported),
            )
            .with_evidence(evidence),
        );
    }

    let pause_ratio = ctx.stats.pause_ratio()?;
    let reclaimed = ctx.stats.mean_reclaimed_ratio?;
    if pause_ratio >= ctx.config.overhead_pause_ratio && reclaimed < ctx.config.overhead_reclaim_ratio
    {
        return Some(
            Finding::new(
                "gc.overhead.limit",
                Severity::Critical,
                format!(
                    "{} of wall-clock time is spent paused while collections reclaim {} of the heap",
                    ratio(pause_ratio),
                    ratio(reclaimed)
                ),
            )
            .with_evidence([
                Evidence::statistic("pause_ratio", pause_ratio),
                Evidence::statistic("mean_reclaimed_ratio", reclaimed),
            ]),
        );
    }
    None
}

fn explicit_gc(ctx: &RuleContext<'_>) -> Option<Finding> {
    let (count, evidence) = cite(ctx.events, |e| {
        e.kind.is_pausing() && e.has_trigger(&Trigger::SystemGc)
    });
    if count == 0 {
        return None;
    }
    let mut finding = Finding::new(
        "explicit.gc",
        Severity::Warning,
        format!("{} collection(s) were requested with System.gc()", count),
    )
    .with_evidence(evidence);
    if ctx.metadata.flag_enabled("ExplicitGCInvokesConcurrent") {
        finding = finding.with_evidence([Evidence::metadata("ExplicitGCInvokesConcurrent")]);
    }
    Some(finding)
}

fn cms_incremental_no_headroom(ctx: &RuleContext<'_>) -> Option<Finding> {
    if ctx.metadata.family() != CollectorFamily::Cms
        || !ctx.metadata.flag_enabled("CMSIncrementalMode")
    {
        return None;
    }
    let threshold = ctx.config.no_headroom_ratio;
    let (count, evidence) = cite(ctx.events, |e| {
        let Some(memory) = e.memory else {
            return false;
        };
        match (memory.old.after, memory.old.capacity) {
            (Some(after), Some(capacity)) if capacity.kilobytes() > 0 => {
                after.kilobytes() as f64 / capacity.kilobytes() as f64 >= threshold
            }
            _ => false,
        }
    });
    if count == 0 {
        return None;
    }
    Some(
        Finding::new(
            "cms.incremental.no.headroom",
            Severity::Warning,
            format!(
                "incremental CMS is enabled but the old generation stays above {} after {} collection(s)",
                ratio(threshold),
                count
            ),
        )
        .with_evidence([Evidence::metadata("CMSIncrementalMode")])
        .with_evidence(evidence),
    )
}

fn collector_flags_inconsistent(ctx: &RuleContext<'_>) -> Option<Finding> {
    let flags = &ctx.metadata.flag_families;
    let conflicting_flags = flags.len() > 1;
    let observed = ctx.metadata.observed_family;
    let contradicted = match (flags.last(), observed) {
        (Some(flagged), Some(observed)) => *flagged != observed,
        _ => false,
    };
    if !conflicting_flags && !contradicted {
        return None;
    }

    let named: Vec<&str> = flags.iter().map(|f| f.as_str()).collect();
    let message = match observed {
        Some(observed) if contradicted => format!(
            "flags select {} but the log shows {} events",
            named.join(", "),
            observed
        ),
        _ => format!("flags select several collectors: {}", named.join(", ")),
    };
    Some(
        Finding::new("collector.flags.inconsistent", Severity::Warning, message)
            .with_evidence([Evidence::metadata("flag_families")])
            .with_evidence(observed.map(|_| Evidence::metadata("observed_family"))),
    )
}

fn heap_undersized(ctx: &RuleContext<'_>) -> Option<Finding> {
    let heap = &ctx.stats.heap;
    let max_after = heap.max_occupancy_after?.kilobytes() as f64;
    let capacity = heap.max_capacity?.kilobytes() as f64;
    if capacity == 0.0 {
        return None;
    }
    let fill = max_after / capacity;
    (fill >= ctx.config.heap_undersized_ratio).then(|| {
        Finding::new(
            "heap.undersized",
            Severity::Warning,
            format!(
                "live data after collection reaches {} of the largest heap capacity",
                ratio(fill)
            ),
        )
        .with_evidence([
            Evidence::statistic("heap.max_occupancy_after_kb", max_after),
            Evidence::statistic("heap.max_capacity_kb", capacity),
        ])
    })
}

fn heap_oversized(ctx: &RuleContext<'_>) -> Option<Finding> {
    let heap = &ctx.stats.heap;
    let max_after = heap.max_occupancy_after?.kilobytes() as f64;
    let capacity = heap.min_capacity?.kilobytes() as f64;
    if capacity == 0.0 {
        return None;
    }
    let fill = max_after / capacity;
    (fill <= ctx.config.heap_oversized_ratio).then(|| {
        Finding::new(
            "heap.oversized",
            Severity::Info,
            format!(
                "live data after collection never exceeds {} of the smallest heap capacity",
                ratio(fill)
            ),
        )
        .with_evidence([
            Evidence::statistic("heap.max_occupancy_after_kb", max_after),
            Evidence::statistic("heap.min_capacity_kb", capacity),
        ])
    })
}

fn triggered(
    ctx: &RuleContext<'_>,
    id: &'static str,
    severity: Severity,
    what: &str,
    predicate: impl Fn(&Event) -> bool + 'static,
) -> Option<Finding> {
    let (count, evidence) = cite(ctx.events, predicate);
    (count > 0).then(|| {
        Finding::new(id, severity, format!("{} occurred {} time(s)", what, count))
            .with_evidence(evidence)
    })
}

fn cms_concurrent_mode_failure(ctx: &RuleContext<'_>) -> Option<Finding> {
    triggered(
        ctx,
        "cms.concurrent.mode.failure",
        Severity::Critical,
        "concurrent mode failure",
        |e| e.has_trigger(&Trigger::ConcurrentModeFailure),
    )
}

fn promotion_failed(ctx: &RuleContext<'_>) -> Option<Finding> {
    triggered(
        ctx,
        "promotion.failed",
        Severity::Critical,
        "promotion failure",
        |e| e.kind == EventKind::ParNewPromotionFailed || e.has_trigger(&Trigger::PromotionFailed),
    )
}

fn g1_to_space_exhausted(ctx: &RuleContext<'_>) -> Option<Finding> {
    triggered(
        ctx,
        "g1.to.space.exhausted",
        Severity::Critical,
        "to-space exhaustion",
        |e| e.has_trigger(&Trigger::ToSpaceExhausted),
    )
}

fn parallelism_inverted(ctx: &RuleContext<'_>) -> Option<Finding> {
    let (count, evidence) = cite(ctx.events, |e| {
        let Some(times) = e.times else {
            return false;
        };
        e.kind.is_parallel()
            && times.real.millis() >= MIN_PARALLELISM_REAL_MS
            && times.parallelism().is_some_and(|p| p < 1.0)
    });
    (count > 0).then(|| {
        Finding::new(
            "parallelism.inverted",
            Severity::Warning,
            format!(
                "{} parallel collection(s) used less CPU time than wall time",
                count
            ),
        )
        .with_evidence(evidence)
    })
}

fn throughput_low(ctx: &RuleContext<'_>) -> Option<Finding> {
    let throughput = ctx.stats.throughput?;
    (throughput < ctx.config.throughput_threshold).then(|| {
        Finding::new(
            "throughput.low",
            Severity::Warning,
            format!(
                "throughput is {} (threshold {})",
                ratio(throughput),
                ratio(ctx.config.throughput_threshold)
            ),
        )
        .with_evidence([Evidence::statistic("throughput", throughput)])
    })
}

fn pause_max_exceeded(ctx: &RuleContext<'_>) -> Option<Finding> {
    let limit = ctx.config.max_pause_ms;
    let (count, evidence) = cite(ctx.events, move |e| e.pause().millis() > limit);
    (count > 0).then(|| {
        let max = ctx.stats.max_pause.map(|d| d.millis()).unwrap_or(0);
        Finding::new(
            "pause.max.exceeded",
            Severity::Warning,
            format!(
                "{} pause(s) exceeded {}ms, the longest took {}ms",
                count, limit, max
            ),
        )
        .with_evidence([Evidence::statistic("max_pause_ms", max as f64)])
        .with_evidence(evidence)
    })
}

fn safepoint_non_gc_overhead(ctx: &RuleContext<'_>) -> Option<Finding> {
    let stopped = ctx.stats.total_safepoint.micros();
    if stopped == 0 {
        return None;
    }
    let gc_share = ctx.stats.total_pause.micros() as f64 / stopped as f64;
    (gc_share < ctx.config.safepoint_gc_ratio).then(|| {
        Finding::new(
            "safepoint.non.gc.overhead",
            Severity::Warning,
            format!(
                "collections account for only {} of safepoint stopped time",
                ratio(gc_share)
            ),
        )
        .with_evidence([
            Evidence::statistic("total_pause_ms", ctx.stats.total_pause.micros() as f64 / 1000.0),
            Evidence::statistic("total_safepoint_ms", stopped as f64 / 1000.0),
        ])
    })
}

fn log_truncated(ctx: &RuleContext<'_>) -> Option<Finding> {
    triggered(
        ctx,
        "log.truncated",
        Severity::Info,
        "an event cut off by the end of the log",
        |e| e.kind == EventKind::Truncated,
    )
}
