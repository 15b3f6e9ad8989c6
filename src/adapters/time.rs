//! Host time adapter.
//!
//! Monotonic millisecond clock backed by `std::time::Instant`, truncated
//! to `u32` so it wraps after ~49.7 days exactly like a microcontroller
//! `millis()` counter.

use std::time::Instant;

use crate::app::ports::Clock;

pub struct HostClock {
    start: Instant,
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for HostClock {
    fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}
