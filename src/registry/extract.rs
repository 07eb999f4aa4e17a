use super::{Area, Definition, Field, HeaderField};
use crate::error_handling::{RegistryError, WarningReason};
use crate::event::{MemorySnapshot, Occupancy, TimesData, Trigger};
use crate::kind::CollectorFamily;
use crate::measurement::{Duration, DurationUnit, Size};
use crate::metadata::{HeaderData, HeapCapacityKind};
use regex::Captures;

/// Fields pulled out of one matched line
#[derive(Debug, Default)]
pub(crate) struct Extracted {
    pub duration: Option<Duration>,
    pub memory: MemorySnapshot,
    pub triggers: Vec<Trigger>,
    pub times: Option<TimesData>,
    pub header: Option<HeaderData>,
    pub warnings: Vec<WarningReason>,
}

/// Extract every declared field. A required group that did not participate
/// means the pattern and its field list disagree.
pub(crate) fn extract(
    definition: &'static Definition,
    caps: &Captures<'_>,
) -> Result<Extracted, RegistryError> {
    let mut out = Extracted::default();

    for field in definition.fields {
        for group in field.groups() {
            let present = caps.name(group).is_some();
            debug_assert!(
                present,
                "registry entry '{}': group '{}' did not participate",
                definition.name,
                group
            );
            if !present {
                tracing::warn!(entry = definition.name, group, "registry invariant violated");
                return Err(RegistryError::InvariantViolation {
                    entry: definition.name,
                    group,
                });
            }
        }
        apply(definition, *field, caps, &mut out)?;
    }

    for field in definition.optional {
        if field.groups().iter().all(|group| caps.name(group).is_some()) {
            apply(definition, *field, caps, &mut out)?;
        }
    }

    Ok(out)
}

fn apply(
    definition: &'static Definition,
    field: Field,
    caps: &Captures<'_>,
    out: &mut Extracted,
) -> Result<(), RegistryError> {
    match field {
        Field::Memory(area) | Field::Transition(area) | Field::Occupancy(area) => {
            let [before, after, capacity] = area.groups();
            let occupancy = Occupancy {
                before: size(caps, before, out),
                after: size(caps, after, out),
                capacity: size(caps, capacity, out),
            };
            *area_mut(&mut out.memory, area) = occupancy;
        }
        Field::Duration(unit) => {
            out.duration = duration(caps, "duration", unit, out);
        }
        Field::ConcurrentTime => {
            out.duration = duration(caps, "wall", DurationUnit::Seconds, out);
        }
        Field::Trigger => {
            if let Some(cause) = caps.name("trigger") {
                out.triggers.push(Trigger::from_cause(cause.as_str()));
            }
        }
        Field::Times => {
            let user = duration(caps, "times_user", DurationUnit::Seconds, out);
            let sys = duration(caps, "times_sys", DurationUnit::Seconds, out);
            let real = duration(caps, "times_real", DurationUnit::Seconds, out);
            if let (Some(user), Some(sys), Some(real)) = (user, sys, real) {
                out.times = Some(TimesData { user, sys, real });
            }
        }
        Field::Header(header) => {
            out.header = header_data(definition, header, caps, out)?;
        }
    }
    Ok(())
}

fn area_mut(memory: &mut MemorySnapshot, area: Area) -> &mut Occupancy {
    match area {
        Area::Heap => &mut memory.combined,
        Area::Young => &mut memory.young,
        Area::Old => &mut memory.old,
        Area::Metaspace => &mut memory.metaspace,
    }
}

/// Parse an optional size group; bad values become warnings and `None`
fn size(caps: &Captures<'_>, group: &str, out: &mut Extracted) -> Option<Size> {
    let text = caps.name(group)?.as_str();
    match Size::parse(text) {
        Ok(size) => Some(size),
        Err(err) => {
            out.warnings.push(err.into());
            None
        }
    }
}

fn duration(
    caps: &Captures<'_>,
    group: &str,
    unit: DurationUnit,
    out: &mut Extracted,
) -> Option<Duration> {
    let text = caps.name(group)?.as_str();
    match Duration::from_parts(text, unit) {
        Ok(duration) => Some(duration),
        Err(err) => {
            out.warnings.push(err.into());
            None
        }
    }
}

fn header_data(
    definition: &'static Definition,
    header: HeaderField,
    caps: &Captures<'_>,
    out: &mut Extracted,
) -> Result<Option<HeaderData>, RegistryError> {
    let text = |group: &str| caps.name(group).map(|m| m.as_str().to_string());
    let data = match header {
        HeaderField::Version => HeaderData::Version {
            version: text("jre").unwrap_or_default(),
            bitness: caps.name("bits").and_then(|m| m.as_str().parse().ok()),
            os: text("os"),
        },
        HeaderField::Memory => HeaderData::Memory {
            physical_total: size(caps, "physical_total", out),
            physical_free: size(caps, "physical_free", out),
            swap_total: size(caps, "swap_total", out),
            swap_free: size(caps, "swap_free", out),
        },
        HeaderField::Flags => HeaderData::CommandLineFlags(
            caps.name("flags")
                .map(|m| m.as_str().split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        ),
        HeaderField::Cpus => {
            let raw = caps.name("cpus").map(|m| m.as_str()).unwrap_or_default();
            match raw.parse() {
                Ok(cpus) => HeaderData::Cpus(cpus),
                Err(_) => {
                    out.warnings
                        .push(WarningReason::Measurement(format!("invalid CPU count '{}'", raw)));
                    return Ok(None);
                }
            }
        }
        HeaderField::HeapCapacity => {
            let which = caps
                .name("which")
                .and_then(|m| HeapCapacityKind::from_label(m.as_str()))
                .ok_or(RegistryError::InvariantViolation {
                    entry: definition.name,
                    group: "which",
                })?;
            match size(caps, "capacity", out) {
                Some(capacity) => HeaderData::HeapCapacity { which, capacity },
                None => return Ok(None),
            }
        }
        HeaderField::Collector => HeaderData::Collector(CollectorFamily::from_using(
            caps.name("collector").map(|m| m.as_str()).unwrap_or_default(),
        )),
    };
    Ok(Some(data))
}
