//! Sensor subsystem.
//!
//! The fixture has a single analog input: the dimmer potentiometer.

pub mod brightness;

pub use brightness::{BrightnessSource, map_range};
