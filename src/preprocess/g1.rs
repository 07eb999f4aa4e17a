//! G1 output from JDK 7 and 8 (`-XX:+PrintGCDetails`).
//!
//! A detailed pause prints a header line, an indented per-phase breakdown, an
//! `[Eden: ...]` summary and a `[Times: ...]` line. The breakdown is dropped;
//! header, summary and times are joined with single spaces.

use super::{body_of, is_complete, is_foreign, strip_fragments, CanonicalLine, Preprocessor, RawLine};

struct Construct {
    line_number: usize,
    text: String,
    /// The header reached its closing `secs]`
    head_complete: bool,
    side: Vec<CanonicalLine>,
}

#[derive(Default)]
pub struct G1Preprocessor {
    open: Option<Construct>,
}

impl G1Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn opens_construct(text: &str) -> bool {
        let (_, body) = body_of(text);
        body.starts_with("[GC pause")
            || body.starts_with("[GC remark")
            || body.starts_with("[GC cleanup")
            || body.starts_with("[Full GC")
    }

    /// Indented per-phase lines, e.g. `   [Parallel Time: 3.2 ms, GC Workers: 4]`
    fn is_detail(text: &str) -> bool {
        let trimmed = text.trim_start();
        text.len() != trimmed.len()
            && trimmed.starts_with('[')
            && !trimmed.starts_with("[Eden:")
            && !trimmed.starts_with("[Times:")
    }

    fn start(&mut self, raw: RawLine, out: &mut Vec<CanonicalLine>) {
        if !Self::opens_construct(&raw.text) {
            out.push(raw.into());
            return;
        }
        let (text, side) = strip_fragments(&raw.text, raw.number);
        let head_complete = is_complete(&text);
        if head_complete && text.contains("[Times:") {
            out.push(CanonicalLine::new(raw.number, text));
            out.extend(side);
            return;
        }
        self.open = Some(Construct {
            line_number: raw.number,
            text,
            head_complete,
            side,
        });
    }

    fn close(&mut self, out: &mut Vec<CanonicalLine>) {
        let Some(construct) = self.open.take() else {
            return;
        };
        if construct.head_complete {
            out.push(CanonicalLine::new(construct.line_number, construct.text));
        } else {
            tracing::warn!(line = construct.line_number, "G1 pause header left open");
            out.push(CanonicalLine::truncated(
                construct.line_number,
                construct.text.trim_end(),
            ));
        }
        out.extend(construct.side);
    }
}

impl Preprocessor for G1Preprocessor {
    fn feed(&mut self, raw: RawLine) -> Vec<CanonicalLine> {
        let mut out = Vec::new();
        let Some(construct) = self.open.as_mut() else {
            self.start(raw, &mut out);
            return out;
        };

        if Self::is_detail(&raw.text) {
            return out;
        }
        let (_, body) = body_of(&raw.text);
        if is_foreign(body) {
            construct.side.push(raw.into());
            return out;
        }

        if !construct.head_complete {
            if Self::opens_construct(&raw.text) {
                self.close(&mut out);
                self.start(raw, &mut out);
                return out;
            }
            let (text, fragments) = strip_fragments(&raw.text, raw.number);
            let joined_len = construct.text.trim_end().len();
            construct.text.truncate(joined_len);
            construct.text.push_str(&text);
            construct.side.extend(fragments);
            construct.head_complete = is_complete(&construct.text);
            if construct.head_complete && construct.text.contains("[Times:") {
                self.close(&mut out);
            }
            return out;
        }

        let trimmed = raw.text.trim();
        if trimmed.starts_with("[Eden:") {
            construct.text.push(' ');
            construct.text.push_str(trimmed);
        } else if trimmed.starts_with("[Times:") {
            construct.text.push(' ');
            construct.text.push_str(trimmed);
            self.close(&mut out);
        } else {
            self.close(&mut out);
            self.start(raw, &mut out);
        }
        out
    }

    fn finish(&mut self) -> Vec<CanonicalLine> {
        let mut out = Vec::new();
        self.close(&mut out);
        out
    }
}
