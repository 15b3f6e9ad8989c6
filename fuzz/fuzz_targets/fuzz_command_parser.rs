//! Fuzz target: `IntervalUpdate::from_str`
//!
//! Any accepted command must carry three positive intervals and must
//! apply cleanly; a rejected one must leave the durations untouched.
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use trafficlight::PhaseDurations;
use trafficlight::serial::IntervalUpdate;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let mut durations = PhaseDurations::default();
    match text.parse::<IntervalUpdate>() {
        Ok(update) => {
            assert!(update.red_ms > 0 && update.yellow_ms > 0 && update.green_ms > 0);
            assert!(update.apply_to(&mut durations).is_ok());
            assert_eq!(durations.red_ms, update.red_ms);
        }
        Err(_) => assert_eq!(durations, PhaseDurations::default()),
    }
});
