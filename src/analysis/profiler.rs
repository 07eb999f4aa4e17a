//! Aggregate statistics over a finished event stream.

use crate::event::Event;
use crate::kind::EventKind;
use crate::measurement::{Duration, Size};
use crate::stream::EventStream;
use indexmap::IndexMap;
use serde::Serialize;
use tdigests::TDigest;

/// Pause distribution estimated with a t-digest
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PauseDistribution {
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
}

impl PauseDistribution {
    fn from_digest(digest: &TDigest) -> Self {
        Self {
            p50_ms: digest.estimate_quantile(0.50),
            p95_ms: digest.estimate_quantile(0.95),
            p99_ms: digest.estimate_quantile(0.99),
        }
    }
}

/// Counts and durations for one event kind
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KindStats {
    pub count: usize,
    /// Events of this kind that carried a duration
    pub timed: usize,
    pub total: Duration,
    pub min: Option<Duration>,
    pub max: Option<Duration>,
}

impl KindStats {
    fn record(&mut self, event: &Event) {
        self.count += 1;
        if let Some(duration) = event.duration {
            self.timed += 1;
            self.total = self.total + duration;
            self.min = Some(self.min.map_or(duration, |m| m.min(duration)));
            self.max = Some(self.max.map_or(duration, |m| m.max(duration)));
        }
    }

    pub fn avg_ms(&self) -> Option<f64> {
        (self.timed > 0).then(|| self.total.micros() as f64 / self.timed as f64 / 1000.0)
    }
}

/// Heap sizing observed across collections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeapSizing {
    pub min_capacity: Option<Size>,
    pub max_capacity: Option<Size>,
    pub max_occupancy_after: Option<Size>,
    pub max_metaspace_after: Option<Size>,
}

impl HeapSizing {
    fn record(&mut self, event: &Event) {
        let Some(memory) = event.memory else {
            return;
        };
        let heap = memory.heap();
        if let Some(capacity) = heap.capacity {
            self.min_capacity = Some(self.min_capacity.map_or(capacity, |c| c.min(capacity)));
            self.max_capacity = Some(self.max_capacity.map_or(capacity, |c| c.max(capacity)));
        }
        if let Some(after) = heap.after {
            self.max_occupancy_after =
                Some(self.max_occupancy_after.map_or(after, |a| a.max(after)));
        }
        if let Some(after) = memory.metaspace.after {
            self.max_metaspace_after =
                Some(self.max_metaspace_after.map_or(after, |a| a.max(after)));
        }
    }
}

/// Run-wide statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GcStats {
    pub pause_count: usize,
    pub total_pause: Duration,
    pub max_pause: Option<Duration>,
    pub total_concurrent: Duration,
    /// Stopped time reported by safepoint lines, GC or not
    pub total_safepoint: Duration,
    pub first_timestamp_ms: Option<u64>,
    pub last_end_ms: Option<u64>,
    pub wall_clock_ms: u64,
    /// 1 - pause / wall clock
    pub throughput: Option<f64>,
    pub pause_distribution: Option<PauseDistribution>,
    pub full_collections: usize,
    /// Mean share of heap capacity freed per pause that reported heap data
    pub mean_reclaimed_ratio: Option<f64>,
    pub heap: HeapSizing,
    pub kinds: IndexMap<EventKind, KindStats>,
}

impl GcStats {
    pub fn from_stream(events: &EventStream) -> Self {
        let mut stats = GcStats::default();
        let mut pauses_ms = Vec::new();
        let mut reclaimed = Vec::new();

        for event in events {
            let kind = event.kind;
            if !kind.is_timed() && !kind.capabilities().has(crate::kind::Capability::CombinedData)
            {
                continue;
            }
            stats.kinds.entry(kind).or_default().record(event);
            stats.heap.record(event);

            if kind.is_timed() {
                stats.first_timestamp_ms = Some(
                    stats
                        .first_timestamp_ms
                        .map_or(event.timestamp_ms, |t| t.min(event.timestamp_ms)),
                );
                stats.last_end_ms =
                    Some(stats.last_end_ms.map_or(event.end_ms(), |t| t.max(event.end_ms())));
            }

            let duration = event.duration.unwrap_or(Duration::ZERO);
            if kind.is_pausing() {
                stats.pause_count += 1;
                stats.total_pause = stats.total_pause + duration;
                stats.max_pause = Some(stats.max_pause.map_or(duration, |m| m.max(duration)));
                pauses_ms.push(duration.micros() as f64 / 1000.0);
                if kind.is_full_collection() {
                    stats.full_collections += 1;
                }
                if let Some(ratio) = reclaimed_ratio(event) {
                    reclaimed.push(ratio);
                }
            } else if kind.is_concurrent() {
                stats.total_concurrent = stats.total_concurrent + duration;
            } else if kind.is_safepoint() {
                stats.total_safepoint = stats.total_safepoint + duration;
            }
        }

        if let (Some(first), Some(last)) = (stats.first_timestamp_ms, stats.last_end_ms) {
            stats.wall_clock_ms = last.saturating_sub(first);
        }
        if stats.wall_clock_ms > 0 {
            let paused = stats.total_pause.micros() as f64 / 1000.0;
            stats.throughput = Some(1.0 - paused / stats.wall_clock_ms as f64);
        }
        if !pauses_ms.is_empty() {
            let digest = TDigest::from_values(pauses_ms);
            stats.pause_distribution = Some(PauseDistribution::from_digest(&digest));
        }
        if !reclaimed.is_empty() {
            stats.mean_reclaimed_ratio = Some(reclaimed.iter().sum::<f64>() / reclaimed.len() as f64);
        }

        stats
    }

    /// Share of wall-clock time spent in pauses
    pub fn pause_ratio(&self) -> Option<f64> {
        self.throughput.map(|t| 1.0 - t)
    }

    pub fn kind(&self, kind: EventKind) -> Option<&KindStats> {
        self.kinds.get(&kind)
    }
}

/// Heap freed by one pause over heap capacity
fn reclaimed_ratio(event: &Event) -> Option<f64> {
    let heap = event.heap()?;
    let capacity = heap.capacity?.kilobytes();
    if capacity == 0 {
        return None;
    }
    Some(heap.reclaimed()?.kilobytes() as f64 / capacity as f64)
}
