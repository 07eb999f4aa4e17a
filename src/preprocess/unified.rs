//! Unified logging (`-Xlog:gc*`, JDK 9 and later).
//!
//! With detailed tags a pause is logged as a `gc,start` line, a run of
//! per-phase lines for the same `GC(n)`, the `gc` summary and a `gc,cpu`
//! line. The summary and the cpu times become one canonical line. Serial,
//! Parallel and CMS also log per-generation `gc,heap` lines; those are kept
//! as `[Name: before->after(capacity)]` blocks between the summary and the
//! cpu times. Z and Shenandoah summaries stand on their own, so their lines
//! pass through.

use super::{body_of, CanonicalLine, Preprocessor, RawLine};
use crate::decorator::Decorator;
use crate::kind::CollectorFamily;
use once_cell::sync::Lazy;
use regex::Regex;

static GC_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^GC\((?P<id>\d+)\) ").expect("gc id pattern is valid"));

static GENERATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^GC\(\d+\) (?P<name>PSYoungGen|DefNew|ParNew|ParOldGen|PSOldGen|Tenured|CMS|Metaspace): (?P<occupancy>\d+[KMG]->\d+[KMG]\(\d+[KMG]\))\s*$",
    )
    .expect("generation pattern is valid")
});

struct Construct {
    gc_id: u64,
    start: CanonicalLine,
    summary: Option<CanonicalLine>,
    /// Per-generation blocks seen before the summary
    generations: Vec<String>,
    side: Vec<CanonicalLine>,
}

/// Role of one line relative to an open `GC(n)`
enum Role {
    Start,
    Summary,
    Cpu,
    Detail,
    Other,
}

pub struct UnifiedPreprocessor {
    open: Option<Construct>,
    buffering: bool,
}

impl UnifiedPreprocessor {
    pub fn new(family: CollectorFamily) -> Self {
        Self {
            open: None,
            buffering: !matches!(family, CollectorFamily::Z | CollectorFamily::Shenandoah),
        }
    }

    fn gc_id(body: &str) -> Option<u64> {
        GC_ID
            .captures(body)
            .and_then(|caps| caps["id"].parse().ok())
    }

    fn role(decorator: &Decorator, body: &str) -> Role {
        if decorator.has_tag("start") {
            Role::Start
        } else if decorator.has_tag("cpu") {
            Role::Cpu
        } else if decorator.tags.as_deref() == Some("gc") {
            Role::Summary
        } else if decorator.has_tag("marking") || body.contains("Concurrent") {
            Role::Other
        } else {
            Role::Detail
        }
    }

    /// `GC(0) PSYoungGen: 65536K->10720K(76288K)` as `[PSYoungGen: 65536K->10720K(76288K)]`
    fn generation(body: &str) -> Option<String> {
        GENERATION
            .captures(body)
            .map(|caps| format!("[{}: {}]", &caps["name"], &caps["occupancy"]))
    }

    /// The summary with its generation blocks appended. G1 logs a metaspace
    /// line but no generations; that alone is not appended.
    fn summarize(mut summary: CanonicalLine, generations: Vec<String>) -> CanonicalLine {
        if generations.iter().any(|g| !g.starts_with("[Metaspace:")) {
            for generation in generations {
                summary.text.push(' ');
                summary.text.push_str(&generation);
            }
        }
        summary
    }

    fn emit(construct: Construct, out: &mut Vec<CanonicalLine>) {
        match construct.summary {
            Some(summary) => out.push(summary),
            None => {
                tracing::warn!(
                    gc_id = construct.gc_id,
                    line = construct.start.line_number,
                    "GC started but never summarized"
                );
                out.push(CanonicalLine::truncated(
                    construct.start.line_number,
                    construct.start.text,
                ));
            }
        }
        out.extend(construct.side);
    }

    fn close(&mut self, out: &mut Vec<CanonicalLine>) {
        if let Some(construct) = self.open.take() {
            Self::emit(construct, out);
        }
    }

    /// Handle a line while nothing is buffered
    fn start(&mut self, raw: RawLine, out: &mut Vec<CanonicalLine>) {
        let (decorator, body) = body_of(&raw.text);
        let opening = match (&decorator, Self::gc_id(body)) {
            (Some(decorator), Some(id)) if self.buffering && decorator.unified => {
                matches!(Self::role(decorator, body), Role::Start).then_some(id)
            }
            _ => None,
        };
        match opening {
            Some(gc_id) => {
                self.open = Some(Construct {
                    gc_id,
                    start: raw.into(),
                    summary: None,
                    generations: Vec::new(),
                    side: Vec::new(),
                })
            }
            None => out.push(raw.into()),
        }
    }
}

impl Preprocessor for UnifiedPreprocessor {
    fn feed(&mut self, raw: RawLine) -> Vec<CanonicalLine> {
        let mut out = Vec::new();
        let Some(construct) = self.open.as_mut() else {
            self.start(raw, &mut out);
            return out;
        };

        let (decorator, body) = body_of(&raw.text);
        let same_id = Self::gc_id(body) == Some(construct.gc_id);
        let role = match (&decorator, same_id) {
            (Some(decorator), true) => Self::role(decorator, body),
            _ => Role::Other,
        };

        match role {
            Role::Cpu => {
                let cpu = GC_ID.replace(body, "");
                let merged = match construct.summary.take() {
                    Some(mut summary) => {
                        summary.text.push(' ');
                        summary.text.push_str(cpu.trim());
                        summary
                    }
                    None => CanonicalLine::new(
                        construct.start.line_number,
                        format!("{} {}", construct.start.text, cpu.trim()),
                    ),
                };
                let side = std::mem::take(&mut construct.side);
                self.open = None;
                out.push(merged);
                out.extend(side);
            }
            Role::Summary => {
                if construct.summary.is_some() {
                    self.close(&mut out);
                    out.push(raw.into());
                } else {
                    let generations = std::mem::take(&mut construct.generations);
                    construct.summary = Some(Self::summarize(raw.into(), generations));
                }
            }
            Role::Detail => {
                if let Some(generation) = Self::generation(body) {
                    construct.generations.push(generation);
                }
            }
            Role::Start => {
                self.close(&mut out);
                self.start(raw, &mut out);
            }
            Role::Other => {
                if construct.summary.is_some() {
                    self.close(&mut out);
                    self.start(raw, &mut out);
                } else {
                    construct.side.push(raw.into());
                }
            }
        }
        out
    }

    fn finish(&mut self) -> Vec<CanonicalLine> {
        let mut out = Vec::new();
        self.close(&mut out);
        out
    }
}
