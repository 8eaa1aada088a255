#![no_main]

use libfuzzer_sys::fuzz_target;
use weir_core::Payload;

// The boundary parser must never panic, and anything it accepts must
// survive a re-serialize/re-parse with the same kind tag.
fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let Ok(payload) = Payload::from_value(value) else {
        return;
    };
    let wire = payload.to_value().expect("accepted payload must serialize");
    let reparsed = Payload::from_value(wire).expect("serialized payload must parse");
    assert_eq!(payload.kind(), reparsed.kind());
});
