//! Host simulation adapter.
//!
//! [`SimFixture`] stands in for the whole board: a settable pot, a byte
//! queue for serial input, captured output lines and the last lamp
//! levels.  [`SimDirective`] is the console syntax the host binary uses
//! for things a real fixture does with its hands:
//!
//! ```text
//! !pot <0..=1023>     turn the dimmer
//! !press <1|2|3>      press and release a button
//! !quit               stop the simulator
//! ```
//!
//! Any other line is fed to the serial command channel unchanged.

use core::fmt;
use core::str::FromStr;
use std::collections::VecDeque;

use crate::app::ports::{AnalogPort, LedPort, SerialPort};
use crate::arbiter::ModeChange;
use crate::drivers::button::{ButtonBank, ButtonId};
use crate::drivers::renderer::LedLevels;
use crate::shared::SharedState;

/// Prefix that marks a console line as a simulator directive.
pub const DIRECTIVE_PREFIX: char = '!';

const ADC_MAX: u16 = 1023;

#[derive(Debug, Default)]
pub struct SimFixture {
    pot_raw: u16,
    input: VecDeque<u8>,
    output: Vec<String>,
    levels: LedLevels,
}

impl SimFixture {
    /// Pot starts fully clockwise.
    pub fn new() -> Self {
        Self {
            pot_raw: ADC_MAX,
            ..Default::default()
        }
    }

    pub fn set_pot(&mut self, raw: u16) {
        self.pot_raw = raw.min(ADC_MAX);
    }

    /// Queue one line of serial input, terminator included.
    pub fn feed_line(&mut self, line: &str) {
        self.input.extend(line.bytes());
        self.input.push_back(b'\n');
    }

    /// Lines written since the last call.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    pub fn levels(&self) -> LedLevels {
        self.levels
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }
}

impl AnalogPort for SimFixture {
    fn read_raw(&mut self) -> u16 {
        self.pot_raw
    }
}

impl LedPort for SimFixture {
    fn write_levels(&mut self, levels: LedLevels) {
        self.levels = levels;
    }
}

impl SerialPort for SimFixture {
    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn write_line(&mut self, line: &str) {
        self.output.push(line.to_owned());
    }
}

/// Press and release `button`: one falling edge, then back to idle.
pub fn press(
    bank: &ButtonBank,
    button: ButtonId,
    shared: &SharedState,
    now_ms: u32,
) -> Option<ModeChange> {
    let change = bank.on_pin_change(button, false, shared, now_ms);
    bank.on_pin_change(button, true, shared, now_ms);
    change
}

// ── Directives ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimDirective {
    Pot(u16),
    Press(ButtonId),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    NotADirective,
    Unknown(String),
    BadArgument(&'static str),
}

impl fmt::Display for DirectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotADirective => write!(f, "directives start with '{DIRECTIVE_PREFIX}'"),
            Self::Unknown(name) => {
                write!(f, "unknown directive '{name}' (try !pot, !press, !quit)")
            }
            Self::BadArgument(usage) => write!(f, "usage: {usage}"),
        }
    }
}

impl std::error::Error for DirectiveError {}

impl FromStr for SimDirective {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .trim()
            .strip_prefix(DIRECTIVE_PREFIX)
            .ok_or(DirectiveError::NotADirective)?;
        let mut words = body.split_whitespace();
        let name = words.next().unwrap_or("");
        let arg = words.next();
        match name {
            "pot" => arg
                .and_then(|a| a.parse::<u16>().ok())
                .filter(|raw| *raw <= ADC_MAX)
                .map(Self::Pot)
                .ok_or(DirectiveError::BadArgument("!pot <0..=1023>")),
            "press" => arg
                .and_then(|a| a.parse::<u8>().ok())
                .and_then(ButtonId::from_number)
                .map(Self::Press)
                .ok_or(DirectiveError::BadArgument("!press <1|2|3>")),
            "quit" => Ok(Self::Quit),
            other => Err(DirectiveError::Unknown(other.to_owned())),
        }
    }
}
