//! Re-assembly of multi-line and interleaved raw output into canonical lines.
//!
//! The JVM writes some collections in several pieces: an opening line, tenuring
//! or per-phase detail lines, and a closing summary. Concurrent phases logged
//! by another thread can land in the middle, sometimes inside the same
//! physical line. A family machine buffers an open construct, strips foreign
//! fragments into a side channel, and emits one canonical line on close,
//! followed by the side-channel lines in their original order.

mod g1;
mod legacy;
mod unified;

pub use g1::G1Preprocessor;
pub use legacy::LegacyPreprocessor;
pub use unified::UnifiedPreprocessor;

use crate::decorator::{Decorator, DATESTAMP, UPTIME};
use crate::kind::CollectorFamily;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Closing shape shared by legacy constructs: a `secs]` duration, optionally
/// followed by the `[Times: ...]` block
static COMPLETE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"secs\](?:\s*\[Times: [^\]]*\])?\s*$").expect("complete pattern is valid")
});

/// A concurrent-phase line the logging thread wrote into the middle of a pause
static FRAGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?:{ds}: )?(?:{up}: )?\[(?:CMS-concurrent-[a-z-]+(?:: {d}/{d} secs)?|GC concurrent-[a-z-]+(?:, {d} secs)?)\](?: \[Times: [^\]]*\])?",
        ds = DATESTAMP,
        up = UPTIME,
        d = r"\d+[.,]\d+"
    ))
    .expect("fragment pattern is valid")
});

/// Diagnostics printed inside a pause by `-XX:+PrintReferenceGC` and by G1
/// under `-XX:+PrintAdaptiveSizePolicy`
static NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?:{ds}: )?(?:{up}: )?\[(?:(?:Soft|Weak|Final|Phantom)Reference, (?:\d+ refs, )+{d} secs|JNI Weak Reference, {d} secs|G1Ergonomics \([^)]*\) [^\]]*)\]",
        ds = DATESTAMP,
        up = UPTIME,
        d = r"\d+[.,]\d+"
    ))
    .expect("noise pattern is valid")
});

/// `-XX:+PrintAdaptiveSizePolicy` output for Parallel, which starts inside
/// the pause's opening line and runs to its end
static ADAPTIVE_TAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*(?:PS)?AdaptiveSize\w*(?:::\w+)?:.*$").expect("adaptive pattern is valid")
});

/// One physical input line and its 1-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub number: usize,
    pub text: String,
}

impl RawLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        let mut text = text.into();
        let trimmed = text.trim_end_matches(['\r', '\n']).len();
        text.truncate(trimmed);
        Self { number, text }
    }
}

/// One logical event, ready for classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalLine {
    /// Position of the first raw line that contributed
    pub line_number: usize,
    pub text: String,
    /// The construct was still open when input ended
    pub truncated: bool,
}

impl CanonicalLine {
    pub fn new(line_number: usize, text: impl Into<String>) -> Self {
        Self {
            line_number,
            text: text.into(),
            truncated: false,
        }
    }

    pub fn truncated(line_number: usize, text: impl Into<String>) -> Self {
        Self {
            line_number,
            text: text.into(),
            truncated: true,
        }
    }
}

impl From<RawLine> for CanonicalLine {
    fn from(raw: RawLine) -> Self {
        CanonicalLine::new(raw.number, raw.text)
    }
}

/// A family-specific line re-assembler
pub trait Preprocessor: Send {
    fn feed(&mut self, line: RawLine) -> Vec<CanonicalLine>;
    /// Flush at end of input; an open construct comes out truncated
    fn finish(&mut self) -> Vec<CanonicalLine>;
}

/// Body of a line after its decorator, or the whole line when it has none
pub(crate) fn body_of(text: &str) -> (Option<Decorator>, &str) {
    match Decorator::parse(text) {
        Ok((decorator, body)) => (Some(decorator), body),
        Err(_) => (None, text),
    }
}

pub(crate) fn is_complete(text: &str) -> bool {
    COMPLETE.is_match(text)
}

/// Remove embedded concurrent fragments, returning them as their own lines.
/// Reference-processing and adaptive-size diagnostics are dropped.
pub(crate) fn strip_fragments(text: &str, line_number: usize) -> (String, Vec<CanonicalLine>) {
    let text = strip_noise(text);
    let text = text.as_str();
    let mut kept = String::with_capacity(text.len());
    let mut fragments = Vec::new();
    let mut last = 0;
    for m in FRAGMENT.find_iter(text) {
        // A line that is itself a concurrent phase is not a fragment
        if m.start() == 0 {
            continue;
        }
        kept.push_str(&text[last..m.start()]);
        fragments.push(CanonicalLine::new(line_number, m.as_str()));
        last = m.end();
    }
    kept.push_str(&text[last..]);
    (kept, fragments)
}

fn strip_noise(text: &str) -> String {
    let mut kept = NOISE.replace_all(text, "").into_owned();
    if let Some(m) = ADAPTIVE_TAIL.find(&kept) {
        // A line that is itself adaptive-size output is left for the registry
        if !kept[..m.start()].trim().is_empty() {
            kept.truncate(m.start());
            kept.push(' ');
        }
    }
    kept
}

/// Whole adaptive-size lines printed between a pause's opening and closing lines
pub(crate) fn is_adaptive_size(text: &str) -> bool {
    let text = text.trim_start();
    text.starts_with("AdaptiveSize")
        || text.starts_with("PSAdaptiveSize")
        || text.starts_with("avg_")
}

/// Whole lines that belong to another, concurrently logged event
pub(crate) fn is_foreign(body: &str) -> bool {
    let body = body.trim_start();
    body.starts_with("[CMS-concurrent")
        || body.starts_with("[GC concurrent")
        || body.starts_with("CMS: abort preclean")
        || body.starts_with("Total time for which application threads were stopped")
        || body.starts_with("Application time:")
}

/// Entry point: passes lines through until the dialect and family can be
/// told apart, then hands the rest of the run to one family machine
pub struct GcPreprocessor {
    family: Option<CollectorFamily>,
    machine: Option<Box<dyn Preprocessor>>,
    machine_name: Option<&'static str>,
}

impl GcPreprocessor {
    pub fn new() -> Self {
        Self {
            family: None,
            machine: None,
            machine_name: None,
        }
    }

    /// Fix the family instead of detecting it
    pub fn with_family(family: CollectorFamily) -> Self {
        Self {
            family: Some(family).filter(|f| *f != CollectorFamily::Unknown),
            ..Self::new()
        }
    }

    /// Name of the machine in use, once one has been chosen
    pub fn machine_name(&self) -> Option<&'static str> {
        self.machine_name
    }

    fn select(&self, text: &str) -> Option<(&'static str, Box<dyn Preprocessor>)> {
        let (decorator, body) = body_of(text);
        let body = body.trim_start();

        if decorator.as_ref().map(|d| d.unified).unwrap_or(false) {
            let family = match body.strip_prefix("Using ") {
                Some(name) => Some(CollectorFamily::from_using(name)),
                None if body.starts_with("GC(") => Some(self.family.unwrap_or(CollectorFamily::Unknown)),
                None => None,
            }?;
            let family = self.family.unwrap_or(family);
            return Some(("unified", Box::new(UnifiedPreprocessor::new(family))));
        }

        let family = if let Some(flags) = body.strip_prefix("CommandLine flags: ") {
            flags
                .split_whitespace()
                .filter_map(CollectorFamily::from_flag)
                .last()
                .unwrap_or(CollectorFamily::Parallel)
        } else if body.starts_with("[GC pause")
            || body.starts_with("[GC remark")
            || body.starts_with("[GC cleanup")
            || body.starts_with("[GC concurrent")
        {
            CollectorFamily::G1
        } else if body.starts_with("[GC") || body.starts_with("[Full GC") || body.starts_with("[CMS-") {
            CollectorFamily::Unknown
        } else {
            return None;
        };

        match self.family.unwrap_or(family) {
            CollectorFamily::G1 => Some(("g1", Box::new(G1Preprocessor::new()))),
            _ => Some(("legacy", Box::new(LegacyPreprocessor::new()))),
        }
    }
}

impl Default for GcPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor for GcPreprocessor {
    fn feed(&mut self, line: RawLine) -> Vec<CanonicalLine> {
        if self.machine.is_none() {
            match self.select(&line.text) {
                Some((name, machine)) => {
                    tracing::debug!(machine = name, line = line.number, "preprocessor selected");
                    self.machine = Some(machine);
                    self.machine_name = Some(name);
                }
                None => return vec![line.into()],
            }
        }
        match self.machine.as_mut() {
            Some(machine) => machine.feed(line),
            None => vec![line.into()],
        }
    }

    fn finish(&mut self) -> Vec<CanonicalLine> {
        self.machine
            .as_mut()
            .map(|machine| machine.finish())
            .unwrap_or_default()
    }
}

/// Run a whole input through a preprocessor
pub fn preprocess_all<P: Preprocessor + ?Sized>(
    preprocessor: &mut P,
    lines: impl IntoIterator<Item = RawLine>,
) -> Vec<CanonicalLine> {
    let mut out = Vec::new();
    for line in lines {
        out.extend(preprocessor.feed(line));
    }
    out.extend(preprocessor.finish());
    out
}
