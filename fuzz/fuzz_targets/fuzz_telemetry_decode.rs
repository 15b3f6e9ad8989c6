//! Fuzz target: `TelemetryFrame::from_str`
//!
//! Whatever decodes must re-encode to a line that decodes to the same
//! frame.
//!
//! cargo fuzz run fuzz_telemetry_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use trafficlight::serial::TelemetryFrame;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(frame) = text.parse::<TelemetryFrame>() {
        let line = frame.to_line();
        let again: TelemetryFrame = line.parse().expect("re-encoded frame must decode");
        assert_eq!(again, frame);
    }
});
