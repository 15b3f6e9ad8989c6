//! Potentiometer brightness source.
//!
//! Samples the dimmer pot through an [`AnalogPort`] and maps the raw ADC
//! reading linearly onto the LED intensity range.  Holds no state beyond
//! the ADC range.

use crate::app::ports::AnalogPort;
use crate::config::BRIGHTNESS_MAX;

/// Linear map of `raw` from `0..=in_max` onto `0..=out_max`.
///
/// Readings above `in_max` clamp to `out_max`; a zero input range maps
/// everything to zero.
pub const fn map_range(raw: u16, in_max: u16, out_max: u8) -> u8 {
    if in_max == 0 {
        return 0;
    }
    let raw = if raw > in_max { in_max } else { raw };
    (raw as u32 * out_max as u32 / in_max as u32) as u8
}

pub struct BrightnessSource {
    adc_max: u16,
}

impl BrightnessSource {
    pub fn new(adc_max: u16) -> Self {
        Self { adc_max }
    }

    /// Take one sample and return the mapped brightness.
    pub fn sample(&self, adc: &mut impl AnalogPort) -> u8 {
        map_range(adc.read_raw(), self.adc_max, BRIGHTNESS_MAX)
    }
}
