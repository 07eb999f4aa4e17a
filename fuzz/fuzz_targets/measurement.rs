#![no_main]

use gcscope::{Decorator, Duration, Size};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = Size::parse(input);
        let _ = Duration::parse(input);
        let _ = Decorator::parse(input);
    }
});
