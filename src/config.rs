//! Controller configuration parameters
//!
//! All tunable parameters for the traffic-light fixture.
//! Phase hold times can additionally be changed at runtime over the
//! serial command channel; see [`PhaseDurations`].

use serde::{Deserialize, Serialize};

use crate::error::{CommandError, ConfigError};

/// Number of GREEN/OFF toggles in the flicker phase (3 on/off pairs).
pub const FLICKER_TOGGLES: u8 = 6;
/// The flicker toggles are spread over this window.
pub const FLICKER_WINDOW_MS: u32 = 1000;
/// Time between two flicker toggles.
pub const FLICKER_PERIOD_MS: u32 = FLICKER_WINDOW_MS / FLICKER_TOGGLES as u32;
/// Top of the LED intensity range.
pub const BRIGHTNESS_MAX: u8 = 255;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Phase hold times ---
    /// RED hold time (milliseconds)
    pub red_ms: u32,
    /// YELLOW hold time, used on both sides of GREEN (milliseconds)
    pub yellow_ms: u32,
    /// Solid GREEN hold time before flickering starts (milliseconds)
    pub green_ms: u32,

    // --- Task periods ---
    /// State-machine tick period (milliseconds)
    pub state_tick_ms: u32,
    /// Telemetry line period (milliseconds)
    pub telemetry_period_ms: u32,
    /// Command intake period (milliseconds)
    pub command_period_ms: u32,

    // --- Rendering ---
    /// Half-period of the all-lamps blink mode (milliseconds)
    pub blink_period_ms: u32,
    /// Largest raw value the potentiometer ADC produces
    pub adc_max: u16,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Phase hold times
            red_ms: 2000,
            yellow_ms: 500,
            green_ms: 2000,

            // Task periods
            state_tick_ms: 10,        // 100 Hz
            telemetry_period_ms: 100, // 10 Hz
            command_period_ms: 500,   // 2 Hz

            // Rendering
            blink_period_ms: 500,
            adc_max: 1023, // 10-bit ADC
        }
    }
}

impl ControllerConfig {
    /// Reject values the controller cannot run with.
    /// Nothing is clamped: a zero period is an error, not a default.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(u32, &'static str); 7] = [
            (self.red_ms, "red_ms must be > 0"),
            (self.yellow_ms, "yellow_ms must be > 0"),
            (self.green_ms, "green_ms must be > 0"),
            (self.state_tick_ms, "state_tick_ms must be > 0"),
            (self.telemetry_period_ms, "telemetry_period_ms must be > 0"),
            (self.command_period_ms, "command_period_ms must be > 0"),
            (self.blink_period_ms, "blink_period_ms must be > 0"),
        ];
        for (value, reason) in checks {
            if value == 0 {
                return Err(ConfigError::ValidationFailed(reason));
            }
        }
        if self.adc_max == 0 {
            return Err(ConfigError::ValidationFailed("adc_max must be > 0"));
        }
        Ok(())
    }

    /// Initial phase durations derived from this config.
    pub fn phase_durations(&self) -> Result<PhaseDurations, ConfigError> {
        PhaseDurations::new(self.red_ms, self.yellow_ms, self.green_ms)
            .map_err(|_| ConfigError::ValidationFailed("phase hold times must be > 0"))
    }
}

/// Hold times of the traffic-light phases.
///
/// Every field is strictly positive.  Updates go through
/// [`PhaseDurations::apply`] so a rejected update leaves all three
/// hold times untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    pub red_ms: u32,
    pub yellow_ms: u32,
    pub green_ms: u32,
    /// Derived, never changed at runtime.
    pub flicker_period_ms: u32,
}

impl PhaseDurations {
    pub fn new(red_ms: u32, yellow_ms: u32, green_ms: u32) -> Result<Self, CommandError> {
        if red_ms == 0 || yellow_ms == 0 || green_ms == 0 {
            return Err(CommandError::InvalidIntervals);
        }
        Ok(Self {
            red_ms,
            yellow_ms,
            green_ms,
            flicker_period_ms: FLICKER_PERIOD_MS,
        })
    }

    /// Replace the three hold times, all or nothing.
    pub fn apply(
        &mut self,
        red_ms: u32,
        yellow_ms: u32,
        green_ms: u32,
    ) -> Result<(), CommandError> {
        *self = Self::new(red_ms, yellow_ms, green_ms)?;
        Ok(())
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        let c = ControllerConfig::default();
        Self {
            red_ms: c.red_ms,
            yellow_ms: c.yellow_ms,
            green_ms: c.green_ms,
            flicker_period_ms: FLICKER_PERIOD_MS,
        }
    }
}
