//! Function-pointer finite state machine for the traffic-light cycle.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  PhaseTable                                              │
//! │  ┌──────────────┬───────────┬─────────────────────────┐  │
//! │  │ PhaseId      │ on_enter  │ on_update               │  │
//! │  ├──────────────┼───────────┼─────────────────────────┤  │
//! │  │ Red          │ fn(ctx)   │ fn(ctx)->Option<PhaseId>│  │
//! │  │ Yellow1      │ fn(ctx)   │ fn(ctx)->Option<PhaseId>│  │
//! │  │ Green        │ fn(ctx)   │ fn(ctx)->Option<PhaseId>│  │
//! │  │ FlickerGreen │ fn(ctx)   │ fn(ctx)->Option<PhaseId>│  │
//! │  │ Yellow2      │ fn(ctx)   │ fn(ctx)->Option<PhaseId>│  │
//! │  └──────────────┴───────────┴─────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** phase with
//! the time elapsed since the phase timer was last started.  If it
//! returns `Some(next)`, the engine runs `on_enter` for `next`, restarts
//! the phase timer and publishes the new phase.
//!
//! Phase, phase timer and pattern live in [`SharedState`] because the
//! mode arbiter rewrites them from interrupt context.  The flicker
//! counter is owned here; only the main loop touches it.

pub mod context;
pub mod phases;

use context::PhaseContext;
use log::{debug, info};

use crate::config::PhaseDurations;
use crate::shared::SharedState;

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// The five phases of the cycle.
/// Must stay in sync with the table built in [`phases::build_phase_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PhaseId {
    Red = 0,
    Yellow1 = 1,
    Green = 2,
    FlickerGreen = 3,
    Yellow2 = 4,
}

impl PhaseId {
    /// Total number of phases, used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert an index back to `PhaseId`.  Panics on out-of-range in
    /// debug builds; returns `Red` in release (the cycle's start).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Red,
            1 => Self::Yellow1,
            2 => Self::Green,
            3 => Self::FlickerGreen,
            4 => Self::Yellow2,
            _ => {
                debug_assert!(false, "invalid phase index: {idx}");
                Self::Red
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Runs exactly once when a phase is entered.
pub type PhaseActionFn = fn(&mut PhaseContext<'_>);

/// Per-tick update.  Returns `Some(next)` to trigger a transition.
pub type PhaseUpdateFn = fn(&mut PhaseContext<'_>) -> Option<PhaseId>;

/// Static descriptor for a single phase.
pub struct PhaseDescriptor {
    pub id: PhaseId,
    pub name: &'static str,
    pub on_enter: Option<PhaseActionFn>,
    pub on_update: PhaseUpdateFn,
}

/// A completed phase change, reported to the caller for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: PhaseId,
    pub to: PhaseId,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct TrafficLight {
    table: [PhaseDescriptor; PhaseId::COUNT],
    flicker_count: u8,
}

impl TrafficLight {
    pub fn new() -> Self {
        Self {
            table: phases::build_phase_table(),
            flicker_count: 0,
        }
    }

    /// Begin the cycle in RED with the phase timer started at `now_ms`.
    pub fn start(&mut self, shared: &SharedState, durations: &PhaseDurations, now_ms: u32) {
        info!("Traffic light starting in phase: {}", self.name(PhaseId::Red));
        self.enter(PhaseId::Red, shared, durations, now_ms);
    }

    /// Evaluate the current phase once.
    ///
    /// A no-op while any override mode is active: the machine is
    /// suspended, not reset.  Durations are read fresh on every call, so
    /// an update takes effect at the next evaluation.
    pub fn update(
        &mut self,
        shared: &SharedState,
        durations: &PhaseDurations,
        now_ms: u32,
    ) -> Option<PhaseTransition> {
        if shared.any_mode_active() {
            return None;
        }

        let current = shared.phase();
        let elapsed_ms = now_ms.wrapping_sub(shared.phase_start_ms());
        let mut ctx =
            PhaseContext::new(durations, elapsed_ms, shared.pattern(), self.flicker_count);

        let next = (self.table[current as usize].on_update)(&mut ctx);

        // A button may have taken over while the handler ran, or may
        // take over during the store; either way the forced pattern stays.
        if !shared.publish_phase_pattern(ctx.pattern) {
            return None;
        }

        self.flicker_count = ctx.flicker_count;
        if ctx.restart_timer {
            shared.restart_phase_timer(now_ms);
        }

        let next = next?;
        info!(
            "Phase transition: {} -> {}",
            self.name(current),
            self.name(next)
        );
        self.enter(next, shared, durations, now_ms);
        Some(PhaseTransition {
            from: current,
            to: next,
        })
    }

    /// Flicker toggles completed in the current FLICKER_GREEN phase.
    pub fn flicker_count(&self) -> u8 {
        self.flicker_count
    }

    pub fn name(&self, phase: PhaseId) -> &'static str {
        self.table[phase as usize].name
    }

    fn enter(
        &mut self,
        next: PhaseId,
        shared: &SharedState,
        durations: &PhaseDurations,
        now_ms: u32,
    ) {
        let descriptor = &self.table[next as usize];
        if let Some(enter) = descriptor.on_enter {
            let mut ctx = PhaseContext::new(durations, 0, shared.pattern(), self.flicker_count);
            enter(&mut ctx);
            self.flicker_count = ctx.flicker_count;
            shared.publish_phase_pattern(ctx.pattern);
        }
        shared.enter_phase(descriptor.id, now_ms);
        debug!("entered {} at {}ms", descriptor.name, now_ms);
    }
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}
