//! Port traits: the hexagonal boundary between controller logic and the
//! fixture.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (potentiometer, lamps, serial line, clock, event sinks)
//! implement these traits.  The [`Controller`](super::service::Controller)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::drivers::renderer::LedLevels;
use crate::scheduler::TaskId;

// ───────────────────────────────────────────────────────────────
// Analog port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Potentiometer input.
pub trait AnalogPort {
    /// One raw ADC sample (0..=1023 on a 10-bit converter).
    fn read_raw(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// LED port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// The three lamp outputs.
pub trait LedPort {
    /// Drive all three lamps at once (0 = dark, 255 = full).
    fn write_levels(&mut self, levels: LedLevels);
}

// ───────────────────────────────────────────────────────────────
// Serial port (driven adapter: domain ↔ command channel)
// ───────────────────────────────────────────────────────────────

/// Line-oriented text channel used for commands and telemetry.
pub trait SerialPort {
    /// Next pending input byte, `None` when nothing is buffered.
    /// Must not block.
    fn read_byte(&mut self) -> Option<u8>;

    /// Emit one line; the adapter appends the line terminator.
    fn write_line(&mut self, line: &str);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond counter.
///
/// Wraps at `u32::MAX` like a microcontroller `millis()` counter; every
/// consumer compares timestamps with `wrapping_sub`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the task bodies)
// ───────────────────────────────────────────────────────────────

/// Callback the [`Scheduler`](crate::scheduler::Scheduler) invokes for
/// every task that is due.  The scheduler knows periods and timestamps,
/// nothing about what a task does.
pub trait SchedulerDelegate {
    fn on_task_due(&mut self, task: TaskId, now_ms: u32);
}
