#![no_main]

use libfuzzer_sys::fuzz_target;
use weir_core::canonicalize_json_str;

// Canonicalization must terminate on any input and be idempotent on
// whatever it accepts.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(first) = canonicalize_json_str(text) else {
        return;
    };
    let second = canonicalize_json_str(&first).expect("canonical output must stay valid JSON");
    assert_eq!(first, second);
});
