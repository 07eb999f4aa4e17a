//! Raw lines in, events out.
//!
//! [`GcLogParser`] drives one run: every raw line goes through the
//! preprocessor, every canonical line through the classifier. Header data
//! accumulates in [`RunMetadata`], and the family it reveals narrows the
//! classifier's family-guarded entries.

use crate::config::ParserConfig;
use crate::error_handling::{RegistryError, Warning, WarningReporter};
use crate::kind::EventKind;
use crate::metadata::RunMetadata;
use crate::preprocess::{CanonicalLine, GcPreprocessor, Preprocessor, RawLine};
use crate::registry::Classifier;
use crate::stats::ProcessingStats;
use crate::stream::EventStream;
use serde::Serialize;

/// Everything one parsing pass produced
#[derive(Debug, Clone, Serialize)]
pub struct ParsedLog {
    pub events: EventStream,
    pub metadata: RunMetadata,
    pub warnings: Vec<Warning>,
    /// Per-reason counts and examples, `None` when there were no warnings
    #[serde(skip)]
    pub warning_summary: Option<String>,
    pub stats: ProcessingStats,
}

/// Incremental parser for one log file
pub struct GcLogParser {
    config: ParserConfig,
    preprocessor: GcPreprocessor,
    classifier: Classifier,
    metadata: RunMetadata,
    events: EventStream,
    reporter: WarningReporter,
    stats: ProcessingStats,
}

impl GcLogParser {
    pub fn new(config: ParserConfig) -> Result<Self, RegistryError> {
        let preprocessor = match config.collector {
            Some(family) => GcPreprocessor::with_family(family),
            None => GcPreprocessor::new(),
        };
        let mut classifier = Classifier::new()?.with_anchor(config.jvm_start);
        let mut metadata = RunMetadata::new();
        if let Some(family) = config.collector {
            classifier.set_family(family);
        }
        if let Some(start) = config.jvm_start {
            metadata.anchor_at(start);
        }

        Ok(Self {
            config,
            preprocessor,
            classifier,
            metadata,
            events: EventStream::new(),
            reporter: WarningReporter::new(),
            stats: ProcessingStats::new(),
        })
    }

    /// Parse a whole log held in memory
    pub fn parse_str(input: &str, config: ParserConfig) -> Result<ParsedLog, RegistryError> {
        Self::parse_lines(input.lines(), config)
    }

    pub fn parse_lines<I, S>(lines: I, config: ParserConfig) -> Result<ParsedLog, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parser = Self::new(config)?;
        for line in lines {
            parser.feed_line(line.as_ref())?;
        }
        parser.finish()
    }

    pub fn feed_line(&mut self, text: &str) -> Result<(), RegistryError> {
        self.stats.lines_read += 1;
        let raw = RawLine::new(self.stats.lines_read, text);
        for line in self.preprocessor.feed(raw) {
            self.accept(line)?;
        }
        Ok(())
    }

    /// Events classified so far
    pub fn events(&self) -> &EventStream {
        &self.events
    }

    pub fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }

    /// Flush any open construct and finalize the run
    pub fn finish(mut self) -> Result<ParsedLog, RegistryError> {
        for line in self.preprocessor.finish() {
            self.accept(line)?;
        }

        if let Some(anchor) = self.classifier.anchor() {
            self.metadata.anchor_at(anchor);
        }
        self.metadata.finish();
        self.stats.warnings = self.reporter.len();
        self.stats.finish();
        tracing::debug!(stats = %self.stats.format_stats(), "parse finished");

        let warning_summary = self.reporter.generate_summary();
        Ok(ParsedLog {
            events: self.events,
            metadata: self.metadata,
            warnings: self.reporter.into_warnings(),
            warning_summary,
            stats: self.stats,
        })
    }

    fn accept(&mut self, line: CanonicalLine) -> Result<(), RegistryError> {
        self.stats.canonical_lines += 1;
        if line.truncated {
            self.stats.constructs_truncated += 1;
        }

        let classified = self.classifier.classify(&line)?;
        let kind = classified.event.kind;

        if classified.decorator.as_ref().is_some_and(|d| d.unified) {
            self.metadata.unified = true;
        }
        if let Some(header) = &classified.header {
            self.metadata.observe(header);
        }
        self.metadata.observe_event(kind);
        self.sync_family();

        for reason in classified.warnings {
            self.reporter
                .report(Warning::new(line.line_number, line.text.as_str(), reason));
        }

        if kind == EventKind::Unknown {
            self.stats.lines_unknown += 1;
        }
        if kind.is_discardable() {
            self.stats.events_discardable += 1;
            if !self.config.keep_discardable {
                return Ok(());
            }
        }

        self.stats.events_created += 1;
        self.events.push(classified.event);
        Ok(())
    }

    /// Keep the classifier's family guard in step with what the run revealed
    fn sync_family(&mut self) {
        let family = self.config.collector.unwrap_or_else(|| self.metadata.family());
        if family != self.classifier.family() {
            tracing::debug!(family = %family, "collector family updated");
            self.classifier.set_family(family);
        }
    }
}
