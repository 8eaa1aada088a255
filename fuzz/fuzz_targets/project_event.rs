#![no_main]

use libfuzzer_sys::fuzz_target;
use weir_core::{SignedEvent, StreamView, rollup_stream};

// The projector takes whatever the store feeds it without panicking,
// whether or not the chain verifies.
fuzz_target!(|data: &[u8]| {
    let Ok(events) = serde_json::from_slice::<Vec<SignedEvent>>(data) else {
        return;
    };

    let _ = rollup_stream("s-fuzz", &events, None);

    if let Ok(mut view) = StreamView::new("s-fuzz", events.first()) {
        for event in events {
            view.add_event(event, None);
        }
    }
});
