//! State shared between button interrupts and the main loop.
//!
//! ```text
//! ┌──────────────┐   mode, pattern,      ┌──────────────┐
//! │ Button ISRs  │── phase, phase start ─▶│              │
//! │ (arbiter)    │                        │ SharedState  │
//! └──────────────┘                        │  (atomics)   │
//! ┌──────────────┐   pattern, phase,      │              │
//! │ Main loop    │◀─ brightness ─────────▶│              │
//! └──────────────┘                        └──────────────┘
//! ```
//!
//! Every field is a single-word atomic.  Writers that must publish
//! several fields (mode deactivation: phase start, phase, mode) store
//! the guarding field last with `Release`; readers load it first with
//! `Acquire`.  The mode slot and the pattern use `SeqCst`: the state
//! machine stores its pattern and then re-reads the mode, while an
//! activation swaps the mode and then stores the forced pattern, so one
//! of the two always sees the other (see
//! [`SharedState::publish_phase_pattern`]).
//!
//! `SharedState::new()` is `const`, so the state can live in a `static`
//! next to the interrupt vectors.

use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};

use crate::config::BRIGHTNESS_MAX;
use crate::fsm::PhaseId;

// ---------------------------------------------------------------------------
// Display pattern
// ---------------------------------------------------------------------------

/// The LED display value currently commanded, regardless of who set it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DisplayPattern {
    Off = 0,
    Red = 1,
    Yellow = 2,
    Green = 3,
    /// All three lamps; driven by the blink mode.
    ToggleAll = 9,
}

impl DisplayPattern {
    /// Decode a raw pattern byte.  Unknown values yield `None`.
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Off),
            1 => Some(Self::Red),
            2 => Some(Self::Yellow),
            3 => Some(Self::Green),
            9 => Some(Self::ToggleAll),
            _ => None,
        }
    }

    /// Which lamps this pattern lights.
    pub const fn lamps(self) -> Lamps {
        match self {
            Self::Off => Lamps::NONE,
            Self::Red => Lamps::new(true, false, false),
            Self::Yellow => Lamps::new(false, true, false),
            Self::Green => Lamps::new(false, false, true),
            Self::ToggleAll => Lamps::ALL,
        }
    }
}

/// On/off summary of the three lamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lamps {
    pub red: bool,
    pub yellow: bool,
    pub green: bool,
}

impl Lamps {
    pub const NONE: Self = Self::new(false, false, false);
    pub const ALL: Self = Self::new(true, true, true);

    pub const fn new(red: bool, yellow: bool, green: bool) -> Self {
        Self { red, yellow, green }
    }
}

// ---------------------------------------------------------------------------
// Override modes
// ---------------------------------------------------------------------------

/// The three mutually exclusive button override modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    /// Mode A (button 1): red lamp held solid.
    SolidRed = 1,
    /// Mode B (button 2): all lamps blink together.
    BlinkAll = 2,
    /// Mode C (button 3): everything dark.
    Dark = 3,
}

impl Mode {
    pub const ALL: [Self; 3] = [Self::SolidRed, Self::BlinkAll, Self::Dark];

    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::SolidRed),
            2 => Some(Self::BlinkAll),
            3 => Some(Self::Dark),
            _ => None,
        }
    }

    /// Pattern forced while the mode is active.
    pub const fn pattern(self) -> DisplayPattern {
        match self {
            Self::SolidRed => DisplayPattern::Red,
            Self::BlinkAll => DisplayPattern::ToggleAll,
            Self::Dark => DisplayPattern::Off,
        }
    }

    /// Telemetry label, named after the pin-change interrupt that drives it.
    pub const fn label(self) -> &'static str {
        match self {
            Self::SolidRed => "PCINT1",
            Self::BlinkAll => "PCINT2",
            Self::Dark => "PCINT3",
        }
    }
}

/// Telemetry label for the active mode, `"Default"` when none is.
pub const fn mode_label(mode: Option<Mode>) -> &'static str {
    match mode {
        Some(m) => m.label(),
        None => "Default",
    }
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

const NO_MODE: u8 = 0;

pub struct SharedState {
    /// Active mode, `NO_MODE` when the state machine runs.  One slot for
    /// all three modes keeps "at most one active" true by construction.
    mode: AtomicU8,
    pattern: AtomicU8,
    phase: AtomicU8,
    phase_start_ms: AtomicU32,
    brightness: AtomicU8,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(NO_MODE),
            pattern: AtomicU8::new(DisplayPattern::Off as u8),
            phase: AtomicU8::new(PhaseId::Red as u8),
            phase_start_ms: AtomicU32::new(0),
            brightness: AtomicU8::new(BRIGHTNESS_MAX),
        }
    }

    // ── Modes ─────────────────────────────────────────────────

    pub fn active_mode(&self) -> Option<Mode> {
        Mode::from_raw(self.mode.load(Ordering::SeqCst))
    }

    pub fn is_mode_active(&self, mode: Mode) -> bool {
        self.active_mode() == Some(mode)
    }

    pub fn any_mode_active(&self) -> bool {
        self.mode.load(Ordering::SeqCst) != NO_MODE
    }

    /// Install `mode`, clearing whichever mode was active before.
    pub(crate) fn swap_mode(&self, mode: Mode) -> Option<Mode> {
        Mode::from_raw(self.mode.swap(mode as u8, Ordering::SeqCst))
    }

    /// Clear `mode` if it is still the active one.
    pub(crate) fn clear_mode(&self, mode: Mode) -> bool {
        self.mode
            .compare_exchange(mode as u8, NO_MODE, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    // ── Pattern ───────────────────────────────────────────────

    /// Current pattern; an undecodable byte reads as `Off`.
    pub fn pattern(&self) -> DisplayPattern {
        DisplayPattern::from_raw(self.pattern.load(Ordering::SeqCst))
            .unwrap_or(DisplayPattern::Off)
    }

    pub fn set_pattern(&self, pattern: DisplayPattern) {
        self.pattern.store(pattern as u8, Ordering::SeqCst);
    }

    /// Store a pattern computed by the state machine.
    ///
    /// A mode activated around the store keeps its forced pattern: the
    /// mode slot is re-read after the store and, while a mode is active,
    /// its pattern is put back.  Returns `false` if a mode took over.
    pub fn publish_phase_pattern(&self, pattern: DisplayPattern) -> bool {
        self.set_pattern(pattern);
        let Some(mut mode) = self.active_mode() else {
            return true;
        };
        loop {
            self.set_pattern(mode.pattern());
            match self.active_mode() {
                Some(again) if again != mode => mode = again,
                _ => return false,
            }
        }
    }

    /// Replace the pattern only if it still equals `current`.
    pub fn replace_pattern(&self, current: DisplayPattern, new: DisplayPattern) -> bool {
        self.pattern
            .compare_exchange(current as u8, new as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    // ── Phase ─────────────────────────────────────────────────

    pub fn phase(&self) -> PhaseId {
        PhaseId::from_index(self.phase.load(Ordering::Acquire) as usize)
    }

    pub fn phase_start_ms(&self) -> u32 {
        self.phase_start_ms.load(Ordering::Acquire)
    }

    /// Restart the phase timer without changing phase.
    pub fn restart_phase_timer(&self, now_ms: u32) {
        self.phase_start_ms.store(now_ms, Ordering::Release);
    }

    /// Enter `phase` with a fresh timestamp.
    pub fn enter_phase(&self, phase: PhaseId, now_ms: u32) {
        self.phase_start_ms.store(now_ms, Ordering::Release);
        self.phase.store(phase as u8, Ordering::Release);
    }

    // ── Brightness ────────────────────────────────────────────

    pub fn brightness(&self) -> u8 {
        self.brightness.load(Ordering::Relaxed)
    }

    pub fn set_brightness(&self, level: u8) {
        self.brightness.store(level, Ordering::Relaxed);
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
