//! LED renderer: commanded pattern + brightness → three lamp intensities.
//!
//! ## Render paths
//!
//! | Active mode | Path     | Output                                        |
//! |-------------|----------|-----------------------------------------------|
//! | `BlinkAll`  | blink    | all lamps at 255 / all dark, own 500 ms timer |
//! | any other   | standard | lamp(s) of the pattern at the pot brightness  |
//!
//! The standard path is a pure function of its inputs.  The blink path
//! keeps one timestamp and toggles the shared pattern itself, so it runs
//! at the render rate independently of the scheduler.

use crate::config::BRIGHTNESS_MAX;
use crate::shared::{DisplayPattern, Mode, SharedState};

/// Intensity of each lamp, 0 = dark, 255 = full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedLevels {
    pub red: u8,
    pub yellow: u8,
    pub green: u8,
}

impl LedLevels {
    pub const OFF: Self = Self::uniform(0);

    pub const fn new(red: u8, yellow: u8, green: u8) -> Self {
        Self { red, yellow, green }
    }

    pub const fn uniform(level: u8) -> Self {
        Self::new(level, level, level)
    }
}

/// Standard render: light the lamp(s) of `pattern` at `brightness`.
pub fn render_pattern(pattern: DisplayPattern, brightness: u8) -> LedLevels {
    let lamps = pattern.lamps();
    let on = |lit: bool| if lit { brightness } else { 0 };
    LedLevels::new(on(lamps.red), on(lamps.yellow), on(lamps.green))
}

pub struct LedRenderer {
    blink_period_ms: u32,
    /// Last blink toggle; `None` while the blink mode is not active.
    last_toggle_ms: Option<u32>,
}

impl LedRenderer {
    pub fn new(blink_period_ms: u32) -> Self {
        Self {
            blink_period_ms,
            last_toggle_ms: None,
        }
    }

    /// Compute the lamp levels for this pass.
    pub fn render(&mut self, shared: &SharedState, brightness: u8, now_ms: u32) -> LedLevels {
        if shared.is_mode_active(Mode::BlinkAll) {
            return self.render_blink(shared, now_ms);
        }
        self.last_toggle_ms = None;
        render_pattern(shared.pattern(), brightness)
    }

    fn render_blink(&mut self, shared: &SharedState, now_ms: u32) -> LedLevels {
        let last = *self.last_toggle_ms.get_or_insert(now_ms);
        if now_ms.wrapping_sub(last) >= self.blink_period_ms {
            self.last_toggle_ms = Some(now_ms);
            let current = shared.pattern();
            let next = if current == DisplayPattern::ToggleAll {
                DisplayPattern::Off
            } else {
                DisplayPattern::ToggleAll
            };
            // Only toggle what the blink mode itself wrote; undo if a
            // button switched modes under us.
            if shared.replace_pattern(current, next) && !shared.is_mode_active(Mode::BlinkAll) {
                shared.replace_pattern(next, current);
            }
        }
        if shared.pattern() == DisplayPattern::ToggleAll {
            LedLevels::uniform(BRIGHTNESS_MAX)
        } else {
            LedLevels::OFF
        }
    }
}
