//! Per-evaluation context handed to every phase handler.
//!
//! Handlers never touch [`SharedState`](crate::shared::SharedState)
//! directly.  They read timing and durations from here and write the
//! pattern, flicker counter and timer-restart request back; the engine
//! publishes the result once the handler returns.

use crate::config::PhaseDurations;
use crate::shared::DisplayPattern;

pub struct PhaseContext<'a> {
    /// Hold times in force for this evaluation.
    pub durations: &'a PhaseDurations,
    /// Time since the phase timer was last started (wrapping-safe).
    pub elapsed_ms: u32,
    /// Commanded pattern; handlers overwrite it.
    pub pattern: DisplayPattern,
    /// Toggles done in the current flicker phase.
    pub flicker_count: u8,
    /// Set by a handler to restart the phase timer without a transition.
    pub restart_timer: bool,
}

impl<'a> PhaseContext<'a> {
    pub fn new(
        durations: &'a PhaseDurations,
        elapsed_ms: u32,
        pattern: DisplayPattern,
        flicker_count: u8,
    ) -> Self {
        Self {
            durations,
            elapsed_ms,
            pattern,
            flicker_count,
            restart_timer: false,
        }
    }
}
