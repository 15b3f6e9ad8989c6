//! Fuzz target: `LineBuffer::push`
//!
//! Feeds arbitrary bytes into the serial line framer.  It must never
//! panic, never buffer more than one line's worth, and never yield a
//! line longer than the buffer.
//!
//! cargo fuzz run fuzz_line_buffer

#![no_main]

use libfuzzer_sys::fuzz_target;
use trafficlight::serial::LineBuffer;
use trafficlight::serial::line::MAX_LINE_LEN;

fuzz_target!(|data: &[u8]| {
    let mut framer = LineBuffer::new();
    for &byte in data {
        if let Some(Ok(line)) = framer.push(byte) {
            assert!(line.len() <= MAX_LINE_LEN);
            assert_eq!(line.as_str(), line.trim());
        }
        assert!(framer.pending() <= MAX_LINE_LEN);
    }

    // After a reset the framer must accept a clean line again.
    framer.reset();
    for &byte in b"1,2,3" {
        assert!(framer.push(byte).is_none());
    }
    assert_eq!(framer.push(b'\n').map(|r| r.is_ok()), Some(true));
});
