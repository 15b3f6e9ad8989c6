//! Interval-update commands.
//!
//! Wire format, one command per line:
//!
//! ```text
//! <red_ms>,<yellow_ms>,<green_ms>        e.g.  2000,500,2000
//! ```
//!
//! Every field must be a positive decimal integer that fits in `u32`.
//! Whitespace around fields is ignored.

use core::fmt;
use core::str::FromStr;

use crate::config::PhaseDurations;
use crate::error::CommandError;

/// A parsed, validated `red,yellow,green` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalUpdate {
    pub red_ms: u32,
    pub yellow_ms: u32,
    pub green_ms: u32,
}

impl IntervalUpdate {
    /// Install the new hold times.  All three change or none do.
    pub fn apply_to(&self, durations: &mut PhaseDurations) -> Result<(), CommandError> {
        durations.apply(self.red_ms, self.yellow_ms, self.green_ms)
    }
}

impl FromStr for IntervalUpdate {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.trim().split(',');
        let (Some(red), Some(yellow), Some(green), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(CommandError::Format);
        };
        Ok(Self {
            red_ms: parse_interval(red)?,
            yellow_ms: parse_interval(yellow)?,
            green_ms: parse_interval(green)?,
        })
    }
}

/// Signed parse so that `-5` is an invalid interval rather than a
/// malformed command.
fn parse_interval(field: &str) -> Result<u32, CommandError> {
    let value: i64 = field
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidIntervals)?;
    if value <= 0 {
        return Err(CommandError::InvalidIntervals);
    }
    u32::try_from(value).map_err(|_| CommandError::InvalidIntervals)
}

/// Reply line sent back after a command is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandReply {
    Updated(IntervalUpdate),
    Rejected(CommandError),
}

impl From<Result<IntervalUpdate, CommandError>> for CommandReply {
    fn from(result: Result<IntervalUpdate, CommandError>) -> Self {
        match result {
            Ok(update) => Self::Updated(update),
            Err(e) => Self::Rejected(e),
        }
    }
}

impl fmt::Display for CommandReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated(u) => write!(
                f,
                "Intervals updated to: {}, {}, {}",
                u.red_ms, u.yellow_ms, u.green_ms
            ),
            Self::Rejected(e) => write!(f, "{e}"),
        }
    }
}
