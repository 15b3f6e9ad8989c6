//! Edge-triggered button inputs.
//!
//! ## Hardware
//!
//! Three active-low momentary switches with pull-ups.  A pin-change
//! interrupt fires on every level change; the handler samples the pin
//! and passes the level to [`ButtonBank::on_pin_change`].  Targets
//! without pin-change interrupts call [`ButtonBank::poll`] from the main
//! loop instead.
//!
//! ## Edge detection
//!
//! Only a HIGH→LOW transition counts as a press.  There is no time-based
//! debounce: contact bounce that produces a second falling edge toggles
//! the mode again, exactly as the fixture always behaved.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::arbiter::{ModeArbiter, ModeChange};
use crate::shared::{Mode, SharedState};

/// Previous-level tracker for one input.
pub struct EdgeDetector {
    last_high: AtomicBool,
}

impl EdgeDetector {
    /// Idle level is HIGH (pull-up, switch open).
    pub const fn new() -> Self {
        Self {
            last_high: AtomicBool::new(true),
        }
    }

    /// Record the current level.  Returns `true` on a falling edge.
    pub fn update(&self, is_high: bool) -> bool {
        let was_high = self.last_high.swap(is_high, Ordering::AcqRel);
        was_high && !is_high
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Physical buttons, in wiring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    One,
    Two,
    Three,
}

impl ButtonId {
    pub const ALL: [Self; 3] = [Self::One, Self::Two, Self::Three];

    /// Mode this button toggles.
    pub const fn mode(self) -> Mode {
        match self {
            Self::One => Mode::SolidRed,
            Self::Two => Mode::BlinkAll,
            Self::Three => Mode::Dark,
        }
    }

    /// 1-based button number as printed on the fixture.
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }
}

/// Edge detectors for all three buttons.  `const`-constructible so it can
/// sit in a `static` next to [`SharedState`].
pub struct ButtonBank {
    detectors: [EdgeDetector; 3],
}

impl ButtonBank {
    pub const fn new() -> Self {
        Self {
            detectors: [EdgeDetector::new(), EdgeDetector::new(), EdgeDetector::new()],
        }
    }

    /// Pin-change handler for `button`.
    /// Safe to call from interrupt context (lock-free, no logging).
    pub fn on_pin_change(
        &self,
        button: ButtonId,
        is_high: bool,
        shared: &SharedState,
        now_ms: u32,
    ) -> Option<ModeChange> {
        if !self.detectors[button as usize].update(is_high) {
            return None;
        }
        Some(ModeArbiter::new(shared).toggle(button.mode(), now_ms))
    }

    /// Sample all three levels at once, in [`ButtonId::ALL`] order.
    pub fn poll(
        &self,
        levels: [bool; 3],
        shared: &SharedState,
        now_ms: u32,
    ) -> [Option<ModeChange>; 3] {
        let mut changes = [None; 3];
        for (i, button) in ButtonId::ALL.into_iter().enumerate() {
            changes[i] = self.on_pin_change(button, levels[i], shared, now_ms);
        }
        changes
    }
}

impl Default for ButtonBank {
    fn default() -> Self {
        Self::new()
    }
}
