//! embedded-hal bindings: bridges real peripherals to the port traits.
//!
//! - [`PwmLamps`] drives the three lamps from any `SetDutyCycle` channels.
//! - [`ButtonInputs`] samples three `InputPin`s for targets that poll the
//!   buttons instead of taking pin-change interrupts.
//! - [`Fixture`] bundles an ADC, the lamps and a serial line into the one
//!   value [`Controller::run_once`](crate::app::Controller::run_once)
//!   expects.

use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{AnalogPort, LedPort, SerialPort};
use crate::config::BRIGHTNESS_MAX;
use crate::drivers::renderer::LedLevels;

// ── Lamps ─────────────────────────────────────────────────────

/// Three PWM channels, one per lamp (common cathode).
pub struct PwmLamps<R, Y, G> {
    red: R,
    yellow: Y,
    green: G,
}

impl<R, Y, G> PwmLamps<R, Y, G>
where
    R: SetDutyCycle,
    Y: SetDutyCycle,
    G: SetDutyCycle,
{
    pub fn new(red: R, yellow: Y, green: G) -> Self {
        Self { red, yellow, green }
    }

    pub fn release(self) -> (R, Y, G) {
        (self.red, self.yellow, self.green)
    }
}

/// Scale a 0..=255 level onto a channel's duty range.
fn level_to_duty(level: u8, max_duty: u16) -> u16 {
    (level as u32 * max_duty as u32 / BRIGHTNESS_MAX as u32) as u16
}

fn drive(channel: &mut impl SetDutyCycle, level: u8, name: &str) {
    let duty = level_to_duty(level, channel.max_duty_cycle());
    if channel.set_duty_cycle(duty).is_err() {
        warn!("{} lamp: duty update failed", name);
    }
}

impl<R, Y, G> LedPort for PwmLamps<R, Y, G>
where
    R: SetDutyCycle,
    Y: SetDutyCycle,
    G: SetDutyCycle,
{
    fn write_levels(&mut self, levels: LedLevels) {
        drive(&mut self.red, levels.red, "red");
        drive(&mut self.yellow, levels.yellow, "yellow");
        drive(&mut self.green, levels.green, "green");
    }
}

// ── Buttons ───────────────────────────────────────────────────

/// The three override buttons, active low with pull-ups.
pub struct ButtonInputs<A, B, C> {
    one: A,
    two: B,
    three: C,
}

impl<A, B, C> ButtonInputs<A, B, C>
where
    A: InputPin,
    B: InputPin,
    C: InputPin,
{
    pub fn new(one: A, two: B, three: C) -> Self {
        Self { one, two, three }
    }

    /// Current levels in button order, `true` = HIGH (released).
    /// A failed read counts as released so it can never fake a press.
    pub fn levels(&mut self) -> [bool; 3] {
        [
            self.one.is_high().unwrap_or(true),
            self.two.is_high().unwrap_or(true),
            self.three.is_high().unwrap_or(true),
        ]
    }
}

// ── Port bundle ───────────────────────────────────────────────

/// One value implementing every hardware port, each delegated to its
/// own peripheral.
pub struct Fixture<A, L, S> {
    pub adc: A,
    pub lamps: L,
    pub serial: S,
}

impl<A, L, S> Fixture<A, L, S> {
    pub fn new(adc: A, lamps: L, serial: S) -> Self {
        Self { adc, lamps, serial }
    }
}

impl<A: AnalogPort, L, S> AnalogPort for Fixture<A, L, S> {
    fn read_raw(&mut self) -> u16 {
        self.adc.read_raw()
    }
}

impl<A, L: LedPort, S> LedPort for Fixture<A, L, S> {
    fn write_levels(&mut self, levels: LedLevels) {
        self.lamps.write_levels(levels);
    }
}

impl<A, L, S: SerialPort> SerialPort for Fixture<A, L, S> {
    fn read_byte(&mut self) -> Option<u8> {
        self.serial.read_byte()
    }

    fn write_line(&mut self, line: &str) {
        self.serial.write_line(line);
    }
}
