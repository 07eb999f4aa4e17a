//! Line-prefix timestamps ("decorators").
//!
//! Legacy logs prefix each line with a datestamp, an uptime in seconds, or both:
//!
//! ```text
//! 2016-10-10T18:43:49.025-0700: 251.781: [CMS-concurrent-mark-start]
//! ```
//!
//! Unified logging (`-Xlog`) wraps decorations in brackets instead:
//!
//! ```text
//! [2020-02-14T15:21:55.207-0500][0.052s][info][gc,start] GC(0) Pause Young ...
//! ```

use crate::error_handling::DecoratorError;
use crate::measurement::{Duration, DurationUnit};
use chrono::{DateTime, FixedOffset, TimeDelta};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub(crate) const DATESTAMP: &str = r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[.,]\d{3}[-+]\d{4}";
pub(crate) const UPTIME: &str = r"\d+[.,]\d{3}";

static LEGACY_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?:(?P<datestamp>{ds})(?:: {ds})*: )?(?:(?P<uptime>{up})(?:: {up})*: ?)?",
        ds = DATESTAMP,
        up = UPTIME
    ))
    .expect("legacy decorator pattern is valid")
});

static DATESTAMP_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}$", DATESTAMP)).expect("datestamp pattern is valid"));

static UNIFIED_UPTIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<value>\d+[.,]\d+)s$").expect("uptime pattern is valid"));

static UNIFIED_UPTIME_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<value>\d+)(?P<unit>ms|ns)$").expect("uptime unit pattern is valid")
});

static UNIFIED_LEVEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:trace|debug|info|warning|error)\s*$").expect("level pattern is valid")
});

static UNIFIED_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][a-z0-9_]*(?:,[a-z0-9_]+)*\s*$").expect("tags pattern is valid")
});

/// Where the normalized timestamp came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoratorSource {
    UptimeSeconds,
    UptimeMillis,
    Datestamp,
    DatestampAndUptime,
    /// Unified decorations with level/tags but no time field
    TagsOnly,
}

/// Parsed line prefix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decorator {
    pub uptime_ms: Option<u64>,
    pub datestamp: Option<DateTime<FixedOffset>>,
    pub source: DecoratorSource,
    pub unified: bool,
    pub level: Option<String>,
    pub tags: Option<String>,
}

impl Decorator {
    /// Parse the decorator at the start of `line`, returning it and the remaining body
    pub fn parse(line: &str) -> Result<(Decorator, &str), DecoratorError> {
        if line.starts_with('[') {
            if let Some(parsed) = parse_unified(line)? {
                return Ok(parsed);
            }
        }
        parse_legacy(line)
    }

    /// Normalized milliseconds since JVM start. Uptime wins over datestamp; a
    /// datestamp alone is measured from `anchor` (never negative).
    pub fn timestamp_ms(&self, anchor: Option<DateTime<FixedOffset>>) -> Option<u64> {
        if let Some(uptime) = self.uptime_ms {
            return Some(uptime);
        }
        match (self.datestamp, anchor) {
            (Some(ds), Some(anchor)) => Some((ds - anchor).num_milliseconds().max(0) as u64),
            _ => None,
        }
    }

    /// JVM start instant implied by a decorator carrying both fields; `None`
    /// when the uptime reaches back past the representable calendar range
    pub fn implied_start(&self) -> Option<DateTime<FixedOffset>> {
        let (ds, uptime) = (self.datestamp?, self.uptime_ms?);
        let uptime = TimeDelta::try_milliseconds(i64::try_from(uptime).ok()?)?;
        ds.checked_sub_signed(uptime)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .as_deref()
            .map(|tags| tags.split(',').any(|t| t == tag))
            .unwrap_or(false)
    }
}

fn parse_legacy(line: &str) -> Result<(Decorator, &str), DecoratorError> {
    let caps = LEGACY_PREFIX
        .captures(line)
        .ok_or(DecoratorError::Unrecognized)?;
    let datestamp = caps.name("datestamp").map(|m| m.as_str());
    let uptime = caps.name("uptime").map(|m| m.as_str());
    if datestamp.is_none() && uptime.is_none() {
        return Err(DecoratorError::Unrecognized);
    }

    let datestamp = datestamp.map(parse_datestamp).transpose()?;
    let uptime_ms = uptime.map(|up| seconds_to_ms(up)).transpose()?;
    let source = match (datestamp.is_some(), uptime_ms.is_some()) {
        (true, true) => DecoratorSource::DatestampAndUptime,
        (true, false) => DecoratorSource::Datestamp,
        _ => DecoratorSource::UptimeSeconds,
    };

    let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
    Ok((
        Decorator {
            uptime_ms,
            datestamp,
            source,
            unified: false,
            level: None,
            tags: None,
        },
        &line[end..],
    ))
}

/// Returns `Ok(None)` when the leading brackets are not unified decorations
fn parse_unified(line: &str) -> Result<Option<(Decorator, &str)>, DecoratorError> {
    let mut rest = line;
    let mut decorator = Decorator {
        uptime_ms: None,
        datestamp: None,
        source: DecoratorSource::TagsOnly,
        unified: true,
        level: None,
        tags: None,
    };
    let mut recognized = false;
    let mut millis_source = false;

    while rest.starts_with('[') {
        let Some(close) = rest.find(']') else {
            break;
        };
        let token = &rest[1..close];

        if DATESTAMP_ONLY.is_match(token) {
            decorator.datestamp = Some(parse_datestamp(token)?);
        } else if let Some(caps) = UNIFIED_UPTIME.captures(token) {
            decorator.uptime_ms = Some(seconds_to_ms(&caps["value"])?);
        } else if let Some(caps) = UNIFIED_UPTIME_UNIT.captures(token) {
            let unit = if &caps["unit"] == "ms" {
                DurationUnit::Millis
            } else {
                DurationUnit::Nanos
            };
            let uptime = Duration::from_parts(&caps["value"], unit)
                .map_err(|_| DecoratorError::Malformed(token.to_string()))?;
            decorator.uptime_ms = Some(uptime.millis());
            millis_source = true;
        } else if UNIFIED_LEVEL.is_match(token) {
            decorator.level = Some(token.trim().to_string());
        } else if UNIFIED_TAGS.is_match(token) {
            decorator.tags = Some(token.trim().to_string());
        } else if recognized && token.trim().bytes().all(|b| b.is_ascii_digit()) {
            // pid / tid decorations
        } else {
            break;
        }

        recognized = true;
        rest = &rest[close + 1..];
    }

    if !recognized {
        return Ok(None);
    }

    decorator.source = match (decorator.datestamp.is_some(), decorator.uptime_ms.is_some()) {
        (true, true) => DecoratorSource::DatestampAndUptime,
        (true, false) => DecoratorSource::Datestamp,
        (false, true) if millis_source => DecoratorSource::UptimeMillis,
        (false, true) => DecoratorSource::UptimeSeconds,
        (false, false) => DecoratorSource::TagsOnly,
    };

    Ok(Some((decorator, rest.trim_start())))
}

fn parse_datestamp(text: &str) -> Result<DateTime<FixedOffset>, DecoratorError> {
    let normalized = text.replace(',', ".");
    DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.3f%z")
        .map_err(|_| DecoratorError::Malformed(text.to_string()))
}

fn seconds_to_ms(text: &str) -> Result<u64, DecoratorError> {
    Duration::from_parts(text, DurationUnit::Seconds)
        .map(|d| d.millis())
        .map_err(|_| DecoratorError::Malformed(text.to_string()))
}
