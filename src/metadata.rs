//! Run-level facts gathered from header lines and the events themselves.

use crate::kind::{CollectorFamily, EventKind};
use crate::measurement::Size;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// 1.8.0_131-b11, 1.7.0_80
static LEGACY_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^1\.(?P<major>\d+)\.\d+(?:_(?P<update>\d+))?").expect("version pattern is valid")
});

// 11.0.2+9, 17.0.1+12-39, 9+181
static MODERN_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<major>\d+)(?:\.\d+\.(?P<update>\d+))?").expect("version pattern is valid")
});

/// Structured data pulled from a header line by the classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "header", rename_all = "snake_case")]
pub enum HeaderData {
    Version {
        version: String,
        bitness: Option<u8>,
        os: Option<String>,
    },
    Memory {
        physical_total: Option<Size>,
        physical_free: Option<Size>,
        swap_total: Option<Size>,
        swap_free: Option<Size>,
    },
    CommandLineFlags(Vec<String>),
    Cpus(u32),
    HeapCapacity {
        which: HeapCapacityKind,
        capacity: Size,
    },
    Collector(CollectorFamily),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeapCapacityKind {
    Min,
    Initial,
    Max,
}

impl HeapCapacityKind {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Min" => Some(HeapCapacityKind::Min),
            "Initial" => Some(HeapCapacityKind::Initial),
            "Max" => Some(HeapCapacityKind::Max),
            _ => None,
        }
    }
}

/// Everything known about the run that is not a collection event
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunMetadata {
    /// Family announced by a unified `Using ...` line or implied by event kinds
    pub observed_family: Option<CollectorFamily>,
    /// Every family selected by a `-XX:+Use...GC` flag, in flag order
    pub flag_families: Vec<CollectorFamily>,
    pub version: Option<String>,
    pub version_major: Option<u32>,
    pub version_update: Option<u32>,
    pub bitness: Option<u8>,
    pub os: Option<String>,
    pub flags: IndexMap<String, String>,
    pub physical_memory: Option<Size>,
    pub physical_memory_free: Option<Size>,
    pub swap: Option<Size>,
    pub swap_free: Option<Size>,
    pub cpus: Option<u32>,
    pub heap_min_capacity: Option<Size>,
    pub heap_initial_capacity: Option<Size>,
    pub heap_max_capacity: Option<Size>,
    /// Wall-clock instant corresponding to 0 ms
    pub anchor: Option<DateTime<FixedOffset>>,
    pub unified: bool,
    pub finished: bool,
}

impl RunMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective family: flags first, then what the log itself showed
    pub fn family(&self) -> CollectorFamily {
        self.flag_families
            .last()
            .copied()
            .or(self.observed_family)
            .unwrap_or(CollectorFamily::Unknown)
    }

    pub fn observe(&mut self, header: &HeaderData) {
        match header {
            HeaderData::Version {
                version,
                bitness,
                os,
            } => {
                let (major, update) = parse_version(version);
                self.version = Some(version.clone());
                self.version_major = major;
                self.version_update = update;
                if bitness.is_some() {
                    self.bitness = *bitness;
                }
                if os.is_some() {
                    self.os = os.clone();
                }
            }
            HeaderData::Memory {
                physical_total,
                physical_free,
                swap_total,
                swap_free,
            } => {
                self.physical_memory = physical_total.or(self.physical_memory);
                self.physical_memory_free = physical_free.or(self.physical_memory_free);
                self.swap = swap_total.or(self.swap);
                self.swap_free = swap_free.or(self.swap_free);
            }
            HeaderData::CommandLineFlags(flags) => {
                for flag in flags {
                    self.record_flag(flag);
                }
            }
            HeaderData::Cpus(cpus) => self.cpus = Some(*cpus),
            HeaderData::HeapCapacity { which, capacity } => match which {
                HeapCapacityKind::Min => self.heap_min_capacity = Some(*capacity),
                HeapCapacityKind::Initial => self.heap_initial_capacity = Some(*capacity),
                HeapCapacityKind::Max => self.heap_max_capacity = Some(*capacity),
            },
            HeaderData::Collector(family) => {
                if *family != CollectorFamily::Unknown {
                    self.observed_family = Some(*family);
                }
            }
        }
    }

    /// Note the family implied by a classified event, if not yet known
    pub fn observe_event(&mut self, kind: EventKind) {
        let family = kind.family();
        if self.observed_family.is_none() && family != CollectorFamily::Unknown {
            tracing::debug!(family = %family, kind = %kind, "collector family observed");
            self.observed_family = Some(family);
        }
    }

    /// Set the wall-clock anchor unless one is already fixed
    pub fn anchor_at(&mut self, anchor: DateTime<FixedOffset>) {
        if self.anchor.is_none() {
            self.anchor = Some(anchor);
        }
    }

    fn record_flag(&mut self, flag: &str) {
        if let Some(family) = CollectorFamily::from_flag(flag) {
            if !self.flag_families.contains(&family) {
                self.flag_families.push(family);
            }
        }

        let (name, value) = split_flag(flag);
        if name == "MaxHeapSize" {
            if let Ok(bytes) = value.parse::<u64>() {
                self.heap_max_capacity = Size::from_bytes(bytes).ok().or(self.heap_max_capacity);
            }
        } else if name == "InitialHeapSize" {
            if let Ok(bytes) = value.parse::<u64>() {
                self.heap_initial_capacity =
                    Size::from_bytes(bytes).ok().or(self.heap_initial_capacity);
            }
        }
        self.flags.insert(name, value);
    }

    /// Value recorded for a flag: `"true"`/`"false"` for booleans
    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(|v| v.as_str())
    }

    pub fn flag_enabled(&self, name: &str) -> bool {
        self.flag(name) == Some("true")
    }

    pub fn flag_u64(&self, name: &str) -> Option<u64> {
        self.flag(name).and_then(|v| v.parse().ok())
    }

    pub fn finish(&mut self) {
        self.finished = true;
    }
}

/// `-XX:+UseG1GC` → (`UseG1GC`, `true`), `-XX:MaxHeapSize=1024` → (`MaxHeapSize`, `1024`),
/// anything else keeps its text as the name with an empty value
fn split_flag(flag: &str) -> (String, String) {
    if let Some(rest) = flag.strip_prefix("-XX:") {
        if let Some(name) = rest.strip_prefix('+') {
            return (name.to_string(), "true".to_string());
        }
        if let Some(name) = rest.strip_prefix('-') {
            return (name.to_string(), "false".to_string());
        }
        if let Some((name, value)) = rest.split_once('=') {
            return (name.to_string(), value.to_string());
        }
        return (rest.to_string(), String::new());
    }
    (flag.to_string(), String::new())
}

/// Major version and update number from a runtime version string
pub fn parse_version(version: &str) -> (Option<u32>, Option<u32>) {
    let caps = LEGACY_VERSION
        .captures(version)
        .or_else(|| MODERN_VERSION.captures(version));
    match caps {
        Some(caps) => (
            caps.name("major").and_then(|m| m.as_str().parse().ok()),
            caps.name("update")
                .and_then(|m| m.as_str().parse().ok())
                .or(Some(0)),
        ),
        None => (None, None),
    }
}
