//! Event registry and classifier.
//!
//! The registry is one ordered table of definitions (see `patterns`). Each
//! definition pairs an [`EventKind`] with a pattern template and the list of
//! fields its named capture groups provide. Templates are expanded and
//! compiled once per process; classification walks the table in order and
//! the first matching definition wins.
//!
//! Precedence is encoded by table order plus three guards:
//! - the dialect (legacy `-XX:+PrintGC*` output vs unified `-Xlog` output),
//!   decided by the line's decorator;
//! - an optional set of collector families, for texts that several
//!   collectors print identically (`Pause Full`, `Concurrent Mark`);
//! - an optional set of unified tags, for informational entries that accept
//!   any text logged under a detail tag such as `gc,heap`. A line whose
//!   decorator carries no tags at all passes this guard.

mod extract;
mod patterns;

pub use patterns::DEFINITIONS;

use crate::decorator::Decorator;
use crate::error_handling::{DecoratorError, RegistryError, WarningReason};
use crate::event::{Event, Trigger};
use crate::kind::{CollectorFamily, EventKind};
use crate::measurement::DurationUnit;
use crate::metadata::HeaderData;
use crate::preprocess::CanonicalLine;
use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static REGISTRY: Lazy<Result<Registry, RegistryError>> = Lazy::new(|| {
    let registry = Registry::compile(DEFINITIONS)?;
    tracing::debug!(entries = registry.len(), "event registry compiled");
    Ok(registry)
});

/// Which logging framework produced a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Legacy,
    Unified,
    Any,
}

impl Dialect {
    fn accepts(self, unified: bool) -> bool {
        match self {
            Dialect::Any => true,
            Dialect::Legacy => !unified,
            Dialect::Unified => unified,
        }
    }
}

/// Memory area a capture group prefix refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Heap,
    Young,
    Old,
    Metaspace,
}

impl Area {
    /// Group names for before, after, capacity
    pub fn groups(self) -> [&'static str; 3] {
        match self {
            Area::Heap => ["heap_before", "heap_after", "heap_capacity"],
            Area::Young => ["young_before", "young_after", "young_capacity"],
            Area::Old => ["old_before", "old_after", "old_capacity"],
            Area::Metaspace => ["meta_before", "meta_after", "meta_capacity"],
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Area> {
        match prefix {
            "heap" => Some(Area::Heap),
            "young" => Some(Area::Young),
            "old" => Some(Area::Old),
            "meta" => Some(Area::Metaspace),
            _ => None,
        }
    }
}

/// Header facts a definition can extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Version,
    Memory,
    Flags,
    Cpus,
    HeapCapacity,
    Collector,
}

/// A value a definition extracts, backed by one or more named groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `before->after(capacity)`
    Memory(Area),
    /// `before->after`
    Transition(Area),
    /// `after(capacity)`
    Occupancy(Area),
    Duration(DurationUnit),
    /// CMS `cpu/wall secs`; the wall time becomes the duration
    ConcurrentTime,
    Trigger,
    Times,
    Header(HeaderField),
}

impl Field {
    /// Capture groups that must all participate for the field to be present
    pub fn groups(self) -> Vec<&'static str> {
        match self {
            Field::Memory(area) => area.groups().to_vec(),
            Field::Transition(area) => area.groups()[..2].to_vec(),
            Field::Occupancy(area) => area.groups()[1..].to_vec(),
            Field::Duration(_) => vec!["duration"],
            Field::ConcurrentTime => vec!["cpu", "wall"],
            Field::Trigger => vec!["trigger"],
            Field::Times => vec!["times_user", "times_sys", "times_real"],
            Field::Header(HeaderField::Version) => vec!["jre"],
            Field::Header(HeaderField::Memory) => vec!["physical_total"],
            Field::Header(HeaderField::Flags) => vec!["flags"],
            Field::Header(HeaderField::Cpus) => vec!["cpus"],
            Field::Header(HeaderField::HeapCapacity) => vec!["which", "capacity"],
            Field::Header(HeaderField::Collector) => vec!["collector"],
        }
    }
}

/// One row of the registry table
#[derive(Debug, Clone, Copy)]
pub struct Definition {
    pub name: &'static str,
    pub kind: EventKind,
    pub dialect: Dialect,
    pub template: &'static str,
    /// Fields whose groups always participate when the pattern matches
    pub fields: &'static [Field],
    /// Fields inside optional parts of the pattern
    pub optional: &'static [Field],
    /// Families this definition applies to; empty means all
    pub families: &'static [CollectorFamily],
    /// Unified tags, one of which the line must carry; empty means any
    pub tags: &'static [&'static str],
}

impl Definition {
    pub const fn new(
        name: &'static str,
        kind: EventKind,
        dialect: Dialect,
        template: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            dialect,
            template,
            fields: &[],
            optional: &[],
            families: &[],
            tags: &[],
        }
    }

    pub const fn requires(mut self, fields: &'static [Field]) -> Self {
        self.fields = fields;
        self
    }

    pub const fn optional(mut self, fields: &'static [Field]) -> Self {
        self.optional = fields;
        self
    }

    pub const fn only_for(mut self, families: &'static [CollectorFamily]) -> Self {
        self.families = families;
        self
    }

    pub const fn tagged(mut self, tags: &'static [&'static str]) -> Self {
        self.tags = tags;
        self
    }

    fn applies_to(&self, decorator: Option<&Decorator>, family: CollectorFamily) -> bool {
        let unified = decorator.map(|d| d.unified).unwrap_or(false);
        let tagged = self.tags.is_empty()
            || match decorator {
                Some(d) if d.tags.is_some() => self.tags.iter().any(|tag| d.has_tag(tag)),
                _ => true,
            };
        self.dialect.accepts(unified)
            && (self.families.is_empty() || self.families.contains(&family))
            && tagged
    }
}

/// A compiled definition
#[derive(Debug)]
pub struct Entry {
    pub definition: &'static Definition,
    regex: Regex,
}

impl Entry {
    pub fn is_match(&self, body: &str) -> bool {
        self.regex.is_match(body)
    }
}

/// The compiled, ordered table
#[derive(Debug)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    /// The process-wide registry, compiled on first use
    pub fn global() -> Result<&'static Registry, RegistryError> {
        match &*REGISTRY {
            Ok(registry) => Ok(registry),
            Err(err) => Err(err.clone()),
        }
    }

    pub fn compile(definitions: &'static [Definition]) -> Result<Registry, RegistryError> {
        let mut entries = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let expanded = patterns::expand(definition.template).map_err(|message| {
                RegistryError::InvalidPattern {
                    entry: definition.name,
                    message,
                }
            })?;
            let regex = Regex::new(&format!(r"^(?:{})\s*$", expanded)).map_err(|err| {
                RegistryError::InvalidPattern {
                    entry: definition.name,
                    message: err.to_string(),
                }
            })?;
            entries.push(Entry { definition, regex });
        }
        Ok(Registry { entries })
    }

    /// Check that every group a definition's fields name exists in its pattern
    pub fn validate(&self) -> Result<(), RegistryError> {
        for entry in &self.entries {
            let definition = entry.definition;
            for field in definition.fields.iter().chain(definition.optional) {
                for group in field.groups() {
                    if !entry.regex.capture_names().flatten().any(|name| name == group) {
                        return Err(RegistryError::InvariantViolation {
                            entry: definition.name,
                            group,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// First entry whose guards accept the line's decorator and the family,
    /// and whose pattern matches `body`
    pub fn find<'b>(
        &self,
        body: &'b str,
        decorator: Option<&Decorator>,
        family: CollectorFamily,
    ) -> Option<(&Entry, Captures<'b>)> {
        self.entries
            .iter()
            .filter(|entry| entry.definition.applies_to(decorator, family))
            .find_map(|entry| entry.regex.captures(body).map(|caps| (entry, caps)))
    }

    /// Kind only, for callers that do not need fields
    pub fn kind_of(
        &self,
        body: &str,
        decorator: Option<&Decorator>,
        family: CollectorFamily,
    ) -> EventKind {
        self.find(body, decorator, family)
            .map(|(entry, _)| entry.definition.kind)
            .unwrap_or(EventKind::Unknown)
    }
}

/// Result of classifying one canonical line
#[derive(Debug, Clone)]
pub struct Classified {
    pub event: Event,
    pub header: Option<HeaderData>,
    pub decorator: Option<Decorator>,
    /// Name of the matching definition
    pub definition: Option<&'static str>,
    pub warnings: Vec<WarningReason>,
}

/// Stateful front end to the registry: tracks the timestamp anchor, the last
/// known timestamp, and the collector family guarding family-specific entries
#[derive(Debug)]
pub struct Classifier {
    registry: &'static Registry,
    anchor: Option<DateTime<FixedOffset>>,
    last_timestamp_ms: u64,
    family: CollectorFamily,
}

impl Classifier {
    pub fn new() -> Result<Self, RegistryError> {
        Ok(Self {
            registry: Registry::global()?,
            anchor: None,
            last_timestamp_ms: 0,
            family: CollectorFamily::Unknown,
        })
    }

    pub fn with_anchor(mut self, anchor: Option<DateTime<FixedOffset>>) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_family(mut self, family: CollectorFamily) -> Self {
        self.family = family;
        self
    }

    pub fn set_family(&mut self, family: CollectorFamily) {
        self.family = family;
    }

    pub fn family(&self) -> CollectorFamily {
        self.family
    }

    pub fn anchor(&self) -> Option<DateTime<FixedOffset>> {
        self.anchor
    }

    pub fn classify(&mut self, line: &CanonicalLine) -> Result<Classified, RegistryError> {
        let mut warnings = Vec::new();
        let (decorator, body) = match Decorator::parse(&line.text) {
            Ok((decorator, body)) => (Some(decorator), body),
            Err(DecoratorError::Unrecognized) => (None, line.text.as_str()),
            Err(err) => {
                warnings.push(err.into());
                (None, line.text.as_str())
            }
        };

        let (timestamp_ms, inherited) = self.timestamp(decorator.as_ref());
        let unified = decorator.as_ref().map(|d| d.unified).unwrap_or(false);

        if line.truncated {
            warnings.push(WarningReason::TruncatedConstruct);
            let event = Event::new(EventKind::Truncated, timestamp_ms, line.text.clone())
                .with_inherited_timestamp(inherited)
                .with_line_number(line.line_number)
                .with_triggers(Trigger::scan(body));
            return Ok(Classified {
                event,
                header: None,
                decorator,
                definition: None,
                warnings,
            });
        }

        let body = body.trim_end();
        let Some((entry, caps)) = self.registry.find(body, decorator.as_ref(), self.family) else {
            tracing::trace!(line = line.line_number, "unclassified line");
            warnings.push(WarningReason::Unclassified);
            let event = Event::new(EventKind::Unknown, timestamp_ms, line.text.clone())
                .with_inherited_timestamp(inherited)
                .with_line_number(line.line_number);
            return Ok(Classified {
                event,
                header: None,
                decorator,
                definition: None,
                warnings,
            });
        };

        let definition = entry.definition;
        tracing::trace!(line = line.line_number, entry = definition.name, "classified");
        let extracted = extract::extract(definition, &caps)?;
        warnings.extend(extracted.warnings);

        let mut triggers = extracted.triggers;
        for trigger in Trigger::scan(body) {
            if !triggers.contains(&trigger) {
                triggers.push(trigger);
            }
        }

        for anomaly in extracted.memory.anomalies() {
            warnings.push(WarningReason::MemoryAnomaly(anomaly));
        }

        // Unified logging stamps a timed event when it ends
        let timestamp_ms = match extracted.duration {
            Some(duration) if unified && is_timed_collection(definition.kind) => {
                timestamp_ms.saturating_sub(duration.millis())
            }
            _ => timestamp_ms,
        };

        let mut event = Event::new(definition.kind, timestamp_ms, line.text.clone())
            .with_inherited_timestamp(inherited)
            .with_line_number(line.line_number)
            .with_memory(extracted.memory)
            .with_triggers(triggers)
            .with_times(extracted.times);
        if let Some(duration) = extracted.duration {
            event = event.with_duration(duration);
        }

        Ok(Classified {
            event,
            header: extracted.header,
            decorator,
            definition: Some(definition.name),
            warnings,
        })
    }

    /// Normalized timestamp, and whether it was borrowed: lines without a
    /// usable decorator reuse the last one
    fn timestamp(&mut self, decorator: Option<&Decorator>) -> (u64, bool) {
        let Some(decorator) = decorator else {
            return (self.last_timestamp_ms, true);
        };
        if self.anchor.is_none() {
            self.anchor = decorator.implied_start().or(decorator.datestamp);
        }
        match decorator.timestamp_ms(self.anchor) {
            Some(ts) => {
                self.last_timestamp_ms = ts;
                (ts, false)
            }
            None => (self.last_timestamp_ms, true),
        }
    }
}

/// Pauses and concurrent phases, whose duration runs up to the logged time
fn is_timed_collection(kind: EventKind) -> bool {
    kind.is_pausing() || kind.is_concurrent()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::RegistryError;

    fn canonical(text: &str) -> CanonicalLine {
        CanonicalLine::new(1, text)
    }

    fn classify(text: &str) -> Classified {
        Classifier::new().unwrap().classify(&canonical(text)).unwrap()
    }

    fn classify_as(family: CollectorFamily, text: &str) -> Classified {
        Classifier::new()
            .unwrap()
            .with_family(family)
            .classify(&canonical(text))
            .unwrap()
    }

    #[test]
    fn test_global_registry_validates() {
        let registry = Registry::global().unwrap();
        assert!(!registry.is_empty());
        registry.validate().unwrap();
    }

    #[test]
    fn test_validate_reports_missing_group() {
        static BROKEN: &[Definition] = &[Definition::new(
            "broken",
            EventKind::SerialNew,
            Dialect::Legacy,
            r"\[GC {mem:heap}\]",
        )
        .requires(&[Field::Duration(DurationUnit::Seconds)])];
        let registry = Registry::compile(BROKEN).unwrap();
        assert_eq!(
            registry.validate(),
            Err(RegistryError::InvariantViolation {
                entry: "broken",
                group: "duration"
            })
        );
    }

    #[test]
    fn test_unknown_placeholder_is_invalid_pattern() {
        static BROKEN: &[Definition] = &[Definition::new(
            "broken",
            EventKind::SerialNew,
            Dialect::Legacy,
            r"\[GC {nonsense}\]",
        )];
        assert!(matches!(
            Registry::compile(BROKEN),
            Err(RegistryError::InvalidPattern { entry: "broken", .. })
        ));
    }

    #[test]
    fn test_every_kind_but_pipeline_kinds_has_a_definition() {
        for kind in EventKind::ALL {
            if matches!(kind, EventKind::Truncated | EventKind::Unknown) {
                assert!(DEFINITIONS.iter().all(|d| d.kind != *kind));
            } else {
                assert!(
                    DEFINITIONS.iter().any(|d| d.kind == *kind),
                    "{} has no definition",
                    kind
                );
            }
        }
    }

    #[test]
    fn test_unmatched_line_is_unknown_with_warning() {
        let classified = classify("12.000: something the registry has never seen");
        assert_eq!(classified.event.kind, EventKind::Unknown);
        assert_eq!(classified.event.timestamp_ms, 12_000);
        assert_eq!(classified.warnings, vec![WarningReason::Unclassified]);
    }

    #[test]
    fn test_undecorated_line_reuses_last_timestamp() {
        let mut classifier = Classifier::new().unwrap();
        classifier
            .classify(&canonical("5.000: [CMS-concurrent-mark-start]"))
            .unwrap();
        let next = classifier
            .classify(&canonical("Desired survivor size 1 bytes, new threshold 1 (max 15)"))
            .unwrap();
        assert_eq!(next.event.kind, EventKind::Tenuring);
        assert_eq!(next.event.timestamp_ms, 5_000);
        assert!(next.event.timestamp_inherited);
    }

    #[test]
    fn test_malformed_decorator_marks_timestamp_inherited() {
        let mut classifier = Classifier::new().unwrap();
        let first = classifier
            .classify(&canonical("5.000: [CMS-concurrent-mark-start]"))
            .unwrap();
        assert!(!first.event.timestamp_inherited);

        let bad = classifier
            .classify(&canonical("2016-13-45T18:43:49.025-0700: [CMS-concurrent-mark-start]"))
            .unwrap();
        assert!(bad.decorator.is_none());
        assert_eq!(bad.event.timestamp_ms, 5_000);
        assert!(bad.event.timestamp_inherited);
        assert!(matches!(bad.warnings[0], WarningReason::Decorator(_)));
    }

    #[test]
    fn test_unified_timed_events_are_stamped_at_start() {
        let mut classifier = Classifier::new().unwrap().with_family(CollectorFamily::Parallel);
        let mut stamp = |text: &str| classifier.classify(&canonical(text)).unwrap().event;
        let first = stamp("[1.000s][info][gc] GC(0) Pause Young (Allocation Failure) 10M->2M(64M) 500.000ms");
        let second = stamp("[2.000s][info][gc] GC(1) Pause Young (Allocation Failure) 11M->3M(64M) 500.000ms");
        assert_eq!(first.timestamp_ms, 500);
        assert_eq!(first.end_ms(), 1_000);
        assert_eq!(second.timestamp_ms, 1_500);

        // A duration longer than the uptime clamps at zero
        let early = stamp("[0.100s][info][gc] GC(2) Pause Full (System.gc()) 3M->1M(64M) 250.000ms");
        assert_eq!(early.timestamp_ms, 0);

        // Safepoint totals and legacy pauses keep the logged time
        let safepoint = stamp("[3.000s][info][safepoint] Total time for which application threads were stopped: 0.5000000 seconds, Stopping threads took: 0.0000211 seconds");
        assert_eq!(safepoint.timestamp_ms, 3_000);
        let legacy = stamp("4.000: [GC (Allocation Failure) [PSYoungGen: 1024K->512K(2048K)] 1024K->600K(4096K), 0.5000000 secs]");
        assert_eq!(legacy.timestamp_ms, 4_000);
    }

    #[test]
    fn test_unified_text_outside_known_shapes_is_reported() {
        let garbled = classify_as(
            CollectorFamily::G1,
            "[0.070s][info][gc] GC(1) Pause Remark garbled text here",
        );
        assert_eq!(garbled.event.kind, EventKind::Unknown);
        assert_eq!(garbled.warnings, vec![WarningReason::Unclassified]);

        // CMS remark is not G1's remark
        let remark = "[1.703s][info][gc] GC(1) Pause Remark 8M->8M(14M) 3.000ms";
        assert_eq!(classify_as(CollectorFamily::Cms, remark).event.kind, EventKind::UnifiedCmsRemark);
        assert_eq!(classify_as(CollectorFamily::G1, remark).event.kind, EventKind::UnifiedG1Remark);
    }

    #[test]
    fn test_detail_tags_guard_informational_entry() {
        let tagged = classify_as(
            CollectorFamily::G1,
            "[0.060s][info][gc,heap] GC(0) Eden regions: 24->0(20)",
        );
        assert_eq!(tagged.event.kind, EventKind::UnifiedInfo);
        assert!(tagged.warnings.is_empty());

        let plain = classify_as(CollectorFamily::G1, "[0.060s][info][gc] GC(0) Eden regions: 24->0(20)");
        assert_eq!(plain.event.kind, EventKind::Unknown);

        // Without tag decorations there is nothing to tell details apart by
        let untagged = classify_as(CollectorFamily::G1, "[0.060s] GC(0) Eden regions: 24->0(20)");
        assert_eq!(untagged.event.kind, EventKind::UnifiedInfo);
    }

    #[test]
    fn test_first_datestamp_anchors_datestamp_only_lines() {
        let mut classifier = Classifier::new().unwrap();
        let first = classifier
            .classify(&canonical("2016-10-10T18:43:49.025-0700: [CMS-concurrent-mark-start]"))
            .unwrap();
        assert_eq!(first.event.timestamp_ms, 0);
        let second = classifier
            .classify(&canonical("2016-10-10T18:43:50.525-0700: [CMS-concurrent-reset-start]"))
            .unwrap();
        assert_eq!(second.event.timestamp_ms, 1_500);
    }

    #[test]
    fn test_size_overflow_becomes_warning_and_missing_field() {
        let classified = classify(
            "1.000: [GC (Allocation Failure) [PSYoungGen: 99999999999K->10K(20K)] 30K->20K(40K), 0.0100000 secs]",
        );
        assert_eq!(classified.event.kind, EventKind::ParallelScavenge);
        let memory = classified.event.memory.unwrap();
        assert_eq!(memory.young.before, None);
        assert_eq!(memory.combined.after.map(|s| s.kilobytes()), Some(20));
        assert!(classified
            .warnings
            .iter()
            .any(|w| matches!(w, WarningReason::Measurement(_))));
    }

    #[test]
    fn test_memory_anomaly_is_warning_not_failure() {
        let classified =
            classify("1.000: [GC pause (G1 Evacuation Pause) (young) 10M->50M(20M), 0.0010000 secs]");
        assert_eq!(classified.event.kind, EventKind::G1YoungPause);
        let anomalies = classified
            .warnings
            .iter()
            .filter(|w| matches!(w, WarningReason::MemoryAnomaly(_)))
            .count();
        assert_eq!(anomalies, 2);
    }

    #[test]
    fn test_truncated_line_bypasses_registry() {
        let mut line = canonical("3.000: [GC (Allocation Failure) 3.000: [ParNew");
        line.truncated = true;
        let classified = Classifier::new().unwrap().classify(&line).unwrap();
        assert_eq!(classified.event.kind, EventKind::Truncated);
        assert_eq!(classified.event.timestamp_ms, 3_000);
        assert_eq!(classified.warnings, vec![WarningReason::TruncatedConstruct]);
    }

    #[test]
    fn test_family_guard_selects_entry() {
        let line = "[1.000s][info][gc,phases] GC(2) Concurrent Mark 1.234ms";
        assert_eq!(
            classify_as(CollectorFamily::Z, line).event.kind,
            EventKind::ZConcurrent
        );
        assert_eq!(
            classify_as(CollectorFamily::G1, line).event.kind,
            EventKind::UnifiedG1Concurrent
        );

        let full = "[2.000s][info][gc] GC(3) Pause Full (System.gc()) 20M->10M(64M) 30.000ms";
        assert_eq!(
            classify_as(CollectorFamily::G1, full).event.kind,
            EventKind::UnifiedG1FullGc
        );
        assert_eq!(
            classify_as(CollectorFamily::Parallel, full).event.kind,
            EventKind::UnifiedOldPause
        );
    }

    #[test]
    fn test_dialect_guard_selects_entry() {
        let legacy = "1.000: Total time for which application threads were stopped: 0.0001215 seconds, Stopping threads took: 0.0000211 seconds";
        assert_eq!(classify(legacy).event.kind, EventKind::ApplicationStoppedTime);
        let unified = "[1.000s][info][safepoint] Total time for which application threads were stopped: 0.0001215 seconds, Stopping threads took: 0.0000211 seconds";
        assert_eq!(classify(unified).event.kind, EventKind::UnifiedSafepoint);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "did not participate")]
    fn test_required_group_outside_match_panics_in_debug() {
        static DRIFTED: &[Definition] = &[Definition::new(
            "drifted",
            EventKind::SerialNew,
            Dialect::Legacy,
            r"\[X(?:, {secs})?\]",
        )
        .requires(&[Field::Duration(DurationUnit::Seconds)])];
        let registry = Registry::compile(DRIFTED).unwrap();
        let (entry, caps) = registry.find("[X]", None, CollectorFamily::Unknown).unwrap();
        let _ = extract::extract(entry.definition, &caps);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn test_required_group_outside_match_is_error_in_release() {
        static DRIFTED: &[Definition] = &[Definition::new(
            "drifted",
            EventKind::SerialNew,
            Dialect::Legacy,
            r"\[X(?:, {secs})?\]",
        )
        .requires(&[Field::Duration(DurationUnit::Seconds)])];
        let registry = Registry::compile(DRIFTED).unwrap();
        let (entry, caps) = registry.find("[X]", None, CollectorFamily::Unknown).unwrap();
        assert_eq!(
            extract::extract(entry.definition, &caps).err(),
            Some(RegistryError::InvariantViolation {
                entry: "drifted",
                group: "duration"
            })
        );
    }
}
