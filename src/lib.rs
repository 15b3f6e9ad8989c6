//! Traffic-light controller library.
//!
//! A three-lamp PWM traffic light with a timed five-phase cycle, three
//! mutually exclusive button override modes, a potentiometer dimmer and
//! a line-based serial channel for interval updates and telemetry.
//!
//! Everything the button interrupts touch lives in [`shared::SharedState`]
//! as atomics; everything else is owned by [`app::Controller`] and reached
//! through the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod arbiter;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod scheduler;
pub mod sensors;
pub mod serial;
pub mod shared;

pub use app::{AppEvent, Controller};
pub use config::{ControllerConfig, PhaseDurations};
pub use error::{CommandError, ConfigError, Error, LineError, Result};
pub use shared::{DisplayPattern, Mode, SharedState};
