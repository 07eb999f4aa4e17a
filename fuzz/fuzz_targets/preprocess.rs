#![no_main]

use gcscope::preprocess::preprocess_all;
use gcscope::{CollectorFamily, GcPreprocessor, RawLine};
use libfuzzer_sys::fuzz_target;

const FAMILIES: [Option<CollectorFamily>; 4] = [
    None,
    Some(CollectorFamily::Cms),
    Some(CollectorFamily::G1),
    Some(CollectorFamily::Z),
];

fuzz_target!(|data: &[u8]| {
    let Some((&tag, rest)) = data.split_first() else {
        return;
    };
    let Ok(input) = std::str::from_utf8(rest) else {
        return;
    };

    let mut preprocessor = match FAMILIES[tag as usize % FAMILIES.len()] {
        Some(family) => GcPreprocessor::with_family(family),
        None => GcPreprocessor::new(),
    };
    let raw: Vec<RawLine> = input
        .lines()
        .enumerate()
        .map(|(i, l)| RawLine::new(i + 1, l))
        .collect();
    let total = raw.len();
    let out = preprocess_all(&mut preprocessor, raw);

    // Every canonical line points back at a raw line
    assert!(out.iter().all(|l| l.line_number >= 1 && l.line_number <= total));
});
