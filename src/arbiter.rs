//! Mode arbiter: three mutually exclusive button overrides.
//!
//! | Button | Mode        | Forced pattern | Label    |
//! |--------|-------------|----------------|----------|
//! | 1      | `SolidRed`  | RED            | `PCINT1` |
//! | 2      | `BlinkAll`  | TOGGLE_ALL     | `PCINT2` |
//! | 3      | `Dark`      | OFF            | `PCINT3` |
//!
//! A press toggles its mode.  Activating a mode replaces any other
//! active one and suspends the traffic-light state machine.  Pressing
//! the same button again releases it and restarts the cycle from a fresh
//! RED hold.
//!
//! Everything here is lock-free and allocation-free; [`ModeArbiter::toggle`]
//! is safe to call from interrupt context.  It does not log; the main
//! loop reports the returned [`ModeChange`].

use crate::fsm::PhaseId;
use crate::shared::{Mode, SharedState};

/// Outcome of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    /// `mode` became active, replacing `replaced` if one was active.
    Activated { mode: Mode, replaced: Option<Mode> },
    /// `mode` was released; the cycle restarts in RED.
    Deactivated(Mode),
}

pub struct ModeArbiter<'a> {
    shared: &'a SharedState,
}

impl<'a> ModeArbiter<'a> {
    pub fn new(shared: &'a SharedState) -> Self {
        Self { shared }
    }

    /// Toggle `mode` in response to one button press at `now_ms`.
    pub fn toggle(&self, mode: Mode, now_ms: u32) -> ModeChange {
        if self.shared.is_mode_active(mode) {
            self.deactivate(mode, now_ms)
        } else {
            self.activate(mode)
        }
    }

    pub fn active(&self) -> Option<Mode> {
        self.shared.active_mode()
    }

    fn activate(&self, mode: Mode) -> ModeChange {
        // Mode first: the state machine re-reads the mode slot after
        // every pattern it stores and puts the forced pattern back.
        let replaced = self.shared.swap_mode(mode);
        self.shared.set_pattern(mode.pattern());
        ModeChange::Activated { mode, replaced }
    }

    fn deactivate(&self, mode: Mode, now_ms: u32) -> ModeChange {
        // Phase and timer are published before the mode slot is released.
        self.shared.enter_phase(PhaseId::Red, now_ms);
        self.shared.clear_mode(mode);
        ModeChange::Deactivated(mode)
    }
}
