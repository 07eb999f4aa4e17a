// Core library for gcscope: garbage-collector log parsing and analysis

pub mod analysis;
pub mod config;
pub mod config_file;
pub mod decorator;
pub mod error_handling;
pub mod event;
pub mod kind;
pub mod measurement;
pub mod metadata;
pub mod pipeline;
pub mod preprocess;
pub mod registry;
pub mod stats;
pub mod stream;

pub use analysis::{analyze, AnalysisReport, Evidence, Finding, GcStats, Severity};
pub use config::{AnalysisConfig, GcScopeConfig, ParserConfig};
pub use config_file::ConfigFile;
pub use decorator::{Decorator, DecoratorSource};
pub use error_handling::{
    DecoratorError, MeasurementError, RegistryError, Warning, WarningReason, WarningReporter,
};
pub use event::{Event, MemorySnapshot, Occupancy, TimesData, Trigger};
pub use kind::{Capability, CollectorFamily, EventKind};
pub use measurement::{Duration, Size};
pub use metadata::RunMetadata;
pub use pipeline::{GcLogParser, ParsedLog};
pub use preprocess::{CanonicalLine, GcPreprocessor, Preprocessor, RawLine};
pub use registry::{Classifier, Registry};
pub use stats::ProcessingStats;
pub use stream::EventStream;

/// Parse a whole log and analyze it with one configuration
pub fn parse_and_analyze(
    input: &str,
    config: &GcScopeConfig,
) -> Result<(ParsedLog, AnalysisReport), RegistryError> {
    let log = GcLogParser::parse_str(input, config.parser.clone())?;
    let report = analyze(&log, &config.analysis);
    Ok((log, report))
}
