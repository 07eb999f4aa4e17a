//! The closed set of event kinds and what each one is capable of.

use serde::{Serialize, Serializer};

/// Garbage collection algorithm in effect for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectorFamily {
    Serial,
    Parallel,
    Cms,
    G1,
    Shenandoah,
    Z,
    Unknown,
}

impl CollectorFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            CollectorFamily::Serial => "serial",
            CollectorFamily::Parallel => "parallel",
            CollectorFamily::Cms => "cms",
            CollectorFamily::G1 => "g1",
            CollectorFamily::Shenandoah => "shenandoah",
            CollectorFamily::Z => "z",
            CollectorFamily::Unknown => "unknown",
        }
    }

    /// Family selected by a `-XX:+Use...GC` flag
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag.trim_start_matches("-XX:+") {
            "UseSerialGC" => Some(CollectorFamily::Serial),
            "UseParallelGC" | "UseParallelOldGC" => Some(CollectorFamily::Parallel),
            "UseConcMarkSweepGC" | "UseParNewGC" => Some(CollectorFamily::Cms),
            "UseG1GC" => Some(CollectorFamily::G1),
            "UseShenandoahGC" => Some(CollectorFamily::Shenandoah),
            "UseZGC" => Some(CollectorFamily::Z),
            _ => None,
        }
    }

    /// Family named by a unified `Using ...` line
    pub fn from_using(name: &str) -> Self {
        match name.trim() {
            "Serial" => CollectorFamily::Serial,
            "Parallel" => CollectorFamily::Parallel,
            "Concurrent Mark Sweep" => CollectorFamily::Cms,
            "G1" => CollectorFamily::G1,
            "Shenandoah" => CollectorFamily::Shenandoah,
            "The Z Garbage Collector" | "ZGC" => CollectorFamily::Z,
            _ => CollectorFamily::Unknown,
        }
    }
}

impl std::fmt::Display for CollectorFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single capability an event kind may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Capability {
    /// Stops application threads
    Pausing = 1,
    /// Uses multiple GC worker threads
    Parallel = 1 << 1,
    /// Runs alongside application threads
    Concurrent = 1 << 2,
    /// Reports combined heap before/after/capacity
    CombinedData = 1 << 3,
    /// Reports young generation before/after/capacity only
    YoungData = 1 << 4,
    /// Carries nothing useful for analysis
    Discardable = 1 << 5,
    /// Feeds run metadata
    Header = 1 << 6,
    /// Safepoint stopped time, not a collector pause
    Safepoint = 1 << 7,
}

/// Set of capabilities
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities(u16);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);

    pub const fn of(caps: &[Capability]) -> Capabilities {
        let mut bits = 0u16;
        let mut i = 0;
        while i < caps.len() {
            bits |= caps[i] as u16;
            i += 1;
        }
        Capabilities(bits)
    }

    pub const fn has(self, cap: Capability) -> bool {
        self.0 & cap as u16 != 0
    }

    pub fn names(self) -> Vec<&'static str> {
        const ALL: [(Capability, &str); 8] = [
            (Capability::Pausing, "pausing"),
            (Capability::Parallel, "parallel"),
            (Capability::Concurrent, "concurrent"),
            (Capability::CombinedData, "combined_data"),
            (Capability::YoungData, "young_data"),
            (Capability::Discardable, "discardable"),
            (Capability::Header, "header"),
            (Capability::Safepoint, "safepoint"),
        ];
        ALL.iter()
            .filter(|(cap, _)| self.has(*cap))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

impl Serialize for Capabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

use Capability::*;

const PAUSE_SERIAL: Capabilities = Capabilities::of(&[Pausing, CombinedData]);
const PAUSE_PARALLEL: Capabilities = Capabilities::of(&[Pausing, Parallel, CombinedData]);
const CONCURRENT: Capabilities = Capabilities::of(&[Concurrent, Parallel]);
const HEADER: Capabilities = Capabilities::of(&[Header]);
const DISCARD: Capabilities = Capabilities::of(&[Discardable]);

macro_rules! event_kinds {
    ($( $(#[$doc:meta])* $variant:ident => ($name:literal, $family:ident, $caps:expr) ),+ $(,)?) => {
        /// One variant per recognized logging construct
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum EventKind {
            $( $(#[$doc])* $variant ),+
        }

        impl EventKind {
            pub const ALL: &'static [EventKind] = &[$( EventKind::$variant ),+];

            pub fn name(self) -> &'static str {
                match self {
                    $( EventKind::$variant => $name ),+
                }
            }

            pub fn family(self) -> CollectorFamily {
                match self {
                    $( EventKind::$variant => CollectorFamily::$family ),+
                }
            }

            pub fn capabilities(self) -> Capabilities {
                match self {
                    $( EventKind::$variant => $caps ),+
                }
            }
        }
    };
}

event_kinds! {
    // Headers and metadata
    HeaderVersion => ("header_version", Unknown, HEADER),
    HeaderMemory => ("header_memory", Unknown, HEADER),
    HeaderCommandLineFlags => ("header_command_line_flags", Unknown, HEADER),
    HeaderCpus => ("header_cpus", Unknown, HEADER),
    HeaderHeapCapacity => ("header_heap_capacity", Unknown, HEADER),
    UsingCollector => ("using_collector", Unknown, HEADER),

    // Informational lines
    LogRotation => ("log_rotation", Unknown, DISCARD),
    VmWarning => ("vm_warning", Unknown, DISCARD),
    Blank => ("blank", Unknown, DISCARD),
    Tenuring => ("tenuring", Unknown, DISCARD),
    HeapAtGc => ("heap_at_gc", Unknown, DISCARD),
    ClassUnloading => ("class_unloading", Unknown, DISCARD),
    ApplicationConcurrentTime => ("application_concurrent_time", Unknown, DISCARD),
    UnifiedInfo => ("unified_info", Unknown, DISCARD),
    /// Unified `GC(n) PSYoungGen: ...` logged outside a pause
    UnifiedGeneration => ("unified_generation", Unknown, DISCARD),
    /// `-XX:+PrintAdaptiveSizePolicy`, including G1 ergonomics
    AdaptiveSizePolicy => ("adaptive_size_policy", Unknown, DISCARD),
    /// `jstack`/`SIGQUIT` thread dumps written to the same stream
    ThreadDump => ("thread_dump", Unknown, DISCARD),
    /// `GC time would exceed GCTimeLimit of 98%`
    GcOverheadLimit => ("gc_overhead_limit", Unknown, Capabilities::NONE),

    // Safepoints
    ApplicationStoppedTime => ("application_stopped_time", Unknown, Capabilities::of(&[Safepoint])),
    UnifiedSafepoint => ("unified_safepoint", Unknown, Capabilities::of(&[Safepoint])),

    // Serial
    SerialNew => ("serial_new", Serial, Capabilities::of(&[Pausing, CombinedData, YoungData])),
    SerialOld => ("serial_old", Serial, PAUSE_SERIAL),

    // Parallel
    ParallelScavenge => ("parallel_scavenge", Parallel, Capabilities::of(&[Pausing, Parallel, CombinedData, YoungData])),
    ParallelSerialOld => ("parallel_serial_old", Parallel, PAUSE_SERIAL),
    ParallelCompactingOld => ("parallel_compacting_old", Parallel, PAUSE_PARALLEL),

    // CMS
    ParNew => ("par_new", Cms, Capabilities::of(&[Pausing, Parallel, CombinedData, YoungData])),
    ParNewPromotionFailed => ("par_new_promotion_failed", Cms, PAUSE_SERIAL),
    CmsInitialMark => ("cms_initial_mark", Cms, Capabilities::of(&[Pausing])),
    CmsRemark => ("cms_remark", Cms, Capabilities::of(&[Pausing, Parallel])),
    CmsConcurrent => ("cms_concurrent", Cms, CONCURRENT),
    CmsSerialOld => ("cms_serial_old", Cms, PAUSE_SERIAL),

    // G1 (legacy logging)
    G1YoungPause => ("g1_young_pause", G1, PAUSE_PARALLEL),
    G1MixedPause => ("g1_mixed_pause", G1, PAUSE_PARALLEL),
    G1YoungInitialMark => ("g1_young_initial_mark", G1, PAUSE_PARALLEL),
    G1FullGc => ("g1_full_gc", G1, PAUSE_SERIAL),
    G1Remark => ("g1_remark", G1, Capabilities::of(&[Pausing, Parallel])),
    G1Cleanup => ("g1_cleanup", G1, PAUSE_PARALLEL),
    G1Concurrent => ("g1_concurrent", G1, CONCURRENT),
    G1Detail => ("g1_detail", G1, DISCARD),

    // Unified logging, Serial and Parallel
    UnifiedYoungPause => ("unified_young_pause", Unknown, PAUSE_PARALLEL),
    UnifiedOldPause => ("unified_old_pause", Unknown, PAUSE_PARALLEL),

    // Unified logging, CMS (JDK 9 to 13)
    UnifiedParNew => ("unified_par_new", Cms, Capabilities::of(&[Pausing, Parallel, CombinedData, YoungData])),
    UnifiedCmsInitialMark => ("unified_cms_initial_mark", Cms, Capabilities::of(&[Pausing])),
    UnifiedCmsRemark => ("unified_cms_remark", Cms, Capabilities::of(&[Pausing, Parallel])),
    UnifiedCmsConcurrent => ("unified_cms_concurrent", Cms, CONCURRENT),

    // Unified logging, G1
    UnifiedG1YoungPause => ("unified_g1_young_pause", G1, PAUSE_PARALLEL),
    UnifiedG1MixedPause => ("unified_g1_mixed_pause", G1, PAUSE_PARALLEL),
    UnifiedG1FullGc => ("unified_g1_full_gc", G1, PAUSE_PARALLEL),
    UnifiedG1Remark => ("unified_g1_remark", G1, PAUSE_PARALLEL),
    UnifiedG1Cleanup => ("unified_g1_cleanup", G1, PAUSE_PARALLEL),
    UnifiedG1Concurrent => ("unified_g1_concurrent", G1, CONCURRENT),

    // Shenandoah
    ShenandoahInitMark => ("shenandoah_init_mark", Shenandoah, Capabilities::of(&[Pausing, Parallel])),
    ShenandoahFinalMark => ("shenandoah_final_mark", Shenandoah, Capabilities::of(&[Pausing, Parallel])),
    ShenandoahConcurrent => ("shenandoah_concurrent", Shenandoah, Capabilities::of(&[Concurrent, Parallel, CombinedData])),
    ShenandoahDegenerated => ("shenandoah_degenerated", Shenandoah, PAUSE_PARALLEL),
    ShenandoahFullGc => ("shenandoah_full_gc", Shenandoah, PAUSE_PARALLEL),

    // Z
    ZPause => ("z_pause", Z, Capabilities::of(&[Pausing, Parallel])),
    ZConcurrent => ("z_concurrent", Z, CONCURRENT),
    ZCollection => ("z_collection", Z, Capabilities::of(&[CombinedData])),

    // Produced by the pipeline, never by a pattern
    Truncated => ("truncated", Unknown, Capabilities::NONE),
    Unknown => ("unknown", Unknown, Capabilities::NONE),
}

impl EventKind {
    pub fn is_pausing(self) -> bool {
        self.capabilities().has(Capability::Pausing)
    }

    pub fn is_concurrent(self) -> bool {
        self.capabilities().has(Capability::Concurrent)
    }

    pub fn is_parallel(self) -> bool {
        self.capabilities().has(Capability::Parallel)
    }

    pub fn is_discardable(self) -> bool {
        self.capabilities().has(Capability::Discardable)
    }

    pub fn is_header(self) -> bool {
        self.capabilities().has(Capability::Header)
    }

    pub fn is_safepoint(self) -> bool {
        self.capabilities().has(Capability::Safepoint)
    }

    /// Full (whole-heap, stop-the-world) collections
    pub fn is_full_collection(self) -> bool {
        matches!(
            self,
            EventKind::SerialOld
                | EventKind::ParallelSerialOld
                | EventKind::ParallelCompactingOld
                | EventKind::ParNewPromotionFailed
                | EventKind::CmsSerialOld
                | EventKind::G1FullGc
                | EventKind::UnifiedOldPause
                | EventKind::UnifiedG1FullGc
                | EventKind::ShenandoahFullGc
        )
    }

    /// Kinds that carry timing and are expected to have a decorator
    pub fn is_timed(self) -> bool {
        let caps = self.capabilities();
        caps.has(Capability::Pausing)
            || caps.has(Capability::Concurrent)
            || caps.has(Capability::Safepoint)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
