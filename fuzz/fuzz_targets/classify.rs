#![no_main]

use gcscope::{GcLogParser, ParserConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Malformed input becomes warnings; only panics are failures.
        let log = GcLogParser::parse_str(input, ParserConfig::default())
            .expect("registry compiles");
        let _ = gcscope::analyze(&log, &gcscope::AnalysisConfig::default());
    }
});
