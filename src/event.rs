use crate::kind::EventKind;
use crate::measurement::{Duration, Size};
use serde::Serialize;

/// Before/after/capacity for one memory area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Occupancy {
    pub before: Option<Size>,
    pub after: Option<Size>,
    pub capacity: Option<Size>,
}

impl Occupancy {
    pub fn new(before: Size, after: Size, capacity: Size) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
            capacity: Some(capacity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none() && self.capacity.is_none()
    }

    /// Space freed by the collection
    pub fn reclaimed(&self) -> Option<Size> {
        match (self.before, self.after) {
            (Some(before), Some(after)) => Some(before.saturating_sub(after)),
            _ => None,
        }
    }

    /// Occupancy anomalies: after above capacity, or after above before
    pub fn anomalies(&self) -> Vec<String> {
        let mut found = Vec::new();
        if let (Some(after), Some(capacity)) = (self.after, self.capacity) {
            if after > capacity {
                found.push(format!("occupancy after {} exceeds capacity {}", after, capacity));
            }
        }
        if let (Some(before), Some(after)) = (self.before, self.after) {
            if after > before {
                found.push(format!("occupancy grew from {} to {}", before, after));
            }
        }
        found
    }
}

/// Memory occupancy reported by a collection, optionally split by generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MemorySnapshot {
    pub combined: Occupancy,
    pub young: Occupancy,
    pub old: Occupancy,
    /// Metaspace or permanent generation
    pub metaspace: Occupancy,
}

impl MemorySnapshot {
    pub fn is_empty(&self) -> bool {
        self.combined.is_empty()
            && self.young.is_empty()
            && self.old.is_empty()
            && self.metaspace.is_empty()
    }

    /// Whole-heap view: the combined figures, or young + old when only
    /// per-generation figures were logged
    pub fn heap(&self) -> Occupancy {
        if !self.combined.is_empty() {
            return self.combined;
        }
        let add = |a: Option<Size>, b: Option<Size>| match (a, b) {
            (Some(a), Some(b)) => Size::from_kilobytes(a.kilobytes() + b.kilobytes()).ok(),
            _ => None,
        };
        Occupancy {
            before: add(self.young.before, self.old.before),
            after: add(self.young.after, self.old.after),
            capacity: add(self.young.capacity, self.old.capacity),
        }
    }

    pub fn anomalies(&self) -> Vec<String> {
        let mut found = Vec::new();
        for (area, occupancy) in [
            ("heap", &self.combined),
            ("young", &self.young),
            ("old", &self.old),
            ("metaspace", &self.metaspace),
        ] {
            for anomaly in occupancy.anomalies() {
                found.push(format!("{}: {}", area, anomaly));
            }
        }
        found
    }
}

/// Why a collection happened, or a notable condition logged with it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "trigger", content = "text", rename_all = "snake_case")]
pub enum Trigger {
    SystemGc,
    AllocationFailure,
    Ergonomics,
    MetadataGcThreshold,
    GcLockerInitiated,
    G1EvacuationPause,
    G1HumongousAllocation,
    HeapInspection,
    HeapDump,
    PromotionFailed,
    ConcurrentModeFailure,
    ToSpaceExhausted,
    GcOverheadLimit,
    Other(String),
}

impl Trigger {
    /// Map the text inside a cause parenthesis, e.g. `System.gc()`
    pub fn from_cause(cause: &str) -> Trigger {
        match cause.trim() {
            "System.gc()" | "System.gc" | "Java.lang.System.gc()" => Trigger::SystemGc,
            "Allocation Failure" | "Allocation Stall" => Trigger::AllocationFailure,
            "Ergonomics" => Trigger::Ergonomics,
            "Metadata GC Threshold" | "Metadata GC Clear Soft References"
            | "Last ditch collection" => Trigger::MetadataGcThreshold,
            "GCLocker Initiated GC" => Trigger::GcLockerInitiated,
            "G1 Evacuation Pause" => Trigger::G1EvacuationPause,
            "G1 Humongous Allocation" => Trigger::G1HumongousAllocation,
            "Heap Inspection Initiated GC" => Trigger::HeapInspection,
            "Heap Dump Initiated GC" => Trigger::HeapDump,
            "promotion failed" => Trigger::PromotionFailed,
            "concurrent mode failure" => Trigger::ConcurrentModeFailure,
            "to-space exhausted" | "to-space overflow" => Trigger::ToSpaceExhausted,
            other => Trigger::Other(other.to_string()),
        }
    }

    /// Conditions recognizable anywhere in an event's text
    pub fn scan(text: &str) -> Vec<Trigger> {
        let mut found = Vec::new();
        for (needle, trigger) in [
            ("promotion failed", Trigger::PromotionFailed),
            ("concurrent mode failure", Trigger::ConcurrentModeFailure),
            ("to-space exhausted", Trigger::ToSpaceExhausted),
            ("to-space overflow", Trigger::ToSpaceExhausted),
            ("GCTimeLimit", Trigger::GcOverheadLimit),
        ] {
            if text.contains(needle) && !found.contains(&trigger) {
                found.push(trigger);
            }
        }
        found
    }
}

/// `[Times: user=0.41 sys=0.03, real=0.22 secs]` or unified `User=0.01s Sys=0.00s Real=0.00s`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimesData {
    pub user: Duration,
    pub sys: Duration,
    pub real: Duration,
}

impl TimesData {
    /// (user + sys) / real; `None` when real is zero
    pub fn parallelism(&self) -> Option<f64> {
        if self.real.micros() == 0 {
            return None;
        }
        Some((self.user.micros() + self.sys.micros()) as f64 / self.real.micros() as f64)
    }
}

/// One classified log event. Created once by the classifier, never mutated after.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub kind: EventKind,
    /// Milliseconds since JVM start at which the event began. Unified logging
    /// prints pauses and concurrent phases when they end, so their duration is
    /// already subtracted. When `timestamp_inherited` is set the line had no
    /// usable decorator and this is the previous line's value.
    pub timestamp_ms: u64,
    pub timestamp_inherited: bool,
    pub duration: Option<Duration>,
    pub memory: Option<MemorySnapshot>,
    pub raw_text: String,
    pub line_number: usize,
    pub triggers: Vec<Trigger>,
    pub times: Option<TimesData>,
}

impl Event {
    pub fn new(kind: EventKind, timestamp_ms: u64, raw_text: impl Into<String>) -> Self {
        Self {
            kind,
            timestamp_ms,
            timestamp_inherited: false,
            duration: None,
            memory: None,
            raw_text: raw_text.into(),
            line_number: 0,
            triggers: Vec::new(),
            times: None,
        }
    }

    pub fn with_inherited_timestamp(mut self, inherited: bool) -> Self {
        self.timestamp_inherited = inherited;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_memory(mut self, memory: MemorySnapshot) -> Self {
        self.memory = if memory.is_empty() { None } else { Some(memory) };
        self
    }

    pub fn with_line_number(mut self, line_number: usize) -> Self {
        self.line_number = line_number;
        self
    }

    pub fn with_triggers(mut self, triggers: Vec<Trigger>) -> Self {
        self.triggers = triggers;
        self
    }

    pub fn with_times(mut self, times: Option<TimesData>) -> Self {
        self.times = times;
        self
    }

    pub fn has_trigger(&self, trigger: &Trigger) -> bool {
        self.triggers.contains(trigger)
    }

    /// Pause contribution; zero for non-pausing kinds
    pub fn pause(&self) -> Duration {
        if self.kind.is_pausing() {
            self.duration.unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        }
    }

    /// Timestamp at which the event finished, in milliseconds
    pub fn end_ms(&self) -> u64 {
        self.timestamp_ms + self.duration.map(|d| d.millis()).unwrap_or(0)
    }

    pub fn heap(&self) -> Option<Occupancy> {
        self.memory.map(|m| m.heap()).filter(|o| !o.is_empty())
    }
}
