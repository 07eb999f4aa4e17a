//! Serial, Parallel and CMS output from JDK 8 and earlier.

use super::{
    body_of, is_adaptive_size, is_complete, is_foreign, strip_fragments, CanonicalLine,
    Preprocessor, RawLine,
};

struct Construct {
    line_number: usize,
    text: String,
    side: Vec<CanonicalLine>,
}

/// Joins a pause that `-XX:+PrintTenuringDistribution`,
/// `-XX:+PrintAdaptiveSizePolicy` or a concurrent thread split over several
/// physical lines
#[derive(Default)]
pub struct LegacyPreprocessor {
    open: Option<Construct>,
}

impl LegacyPreprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn opens_construct(text: &str) -> bool {
        let (_, body) = body_of(text);
        body.starts_with("[GC") || body.starts_with("[Full GC")
    }

    fn is_tenuring(text: &str) -> bool {
        let text = text.trim_start();
        text.starts_with("Desired survivor size") || text.starts_with("- age")
    }

    fn start(&mut self, raw: RawLine, out: &mut Vec<CanonicalLine>) {
        let (text, fragments) = strip_fragments(&raw.text, raw.number);
        if is_complete(&text) {
            out.push(CanonicalLine::new(raw.number, text));
            out.extend(fragments);
        } else {
            self.open = Some(Construct {
                line_number: raw.number,
                text,
                side: fragments,
            });
        }
    }

    fn close_truncated(&mut self, out: &mut Vec<CanonicalLine>) {
        if let Some(construct) = self.open.take() {
            tracing::warn!(line = construct.line_number, "construct left open");
            out.push(CanonicalLine::truncated(
                construct.line_number,
                construct.text.trim_end(),
            ));
            out.extend(construct.side);
        }
    }
}

impl Preprocessor for LegacyPreprocessor {
    fn feed(&mut self, raw: RawLine) -> Vec<CanonicalLine> {
        let mut out = Vec::new();

        let Some(construct) = self.open.as_mut() else {
            if Self::opens_construct(&raw.text) {
                self.start(raw, &mut out);
            } else {
                out.push(raw.into());
            }
            return out;
        };

        if Self::is_tenuring(&raw.text) || is_adaptive_size(&raw.text) {
            return out;
        }
        let (_, body) = body_of(&raw.text);
        if is_foreign(body) {
            construct.side.push(raw.into());
            return out;
        }
        if Self::opens_construct(&raw.text) {
            let (text, _) = strip_fragments(&raw.text, raw.number);
            if is_complete(&text) {
                // A whole event from another thread
                construct.side.push(raw.into());
            } else {
                self.close_truncated(&mut out);
                self.start(raw, &mut out);
            }
            return out;
        }

        let (text, fragments) = strip_fragments(&raw.text, raw.number);
        let joined_len = construct.text.trim_end().len();
        construct.text.truncate(joined_len);
        // `[PSYoungGen: ...` resumes after the cause; `: 17472K->...` after `[DefNew`
        if text.starts_with('[') {
            construct.text.push(' ');
        }
        construct.text.push_str(&text);
        construct.side.extend(fragments);

        if is_complete(&construct.text) {
            if let Some(construct) = self.open.take() {
                out.push(CanonicalLine::new(construct.line_number, construct.text));
                out.extend(construct.side);
            }
        }
        out
    }

    fn finish(&mut self) -> Vec<CanonicalLine> {
        let mut out = Vec::new();
        self.close_truncated(&mut out);
        out
    }
}
