//! Periodic status line.
//!
//! ```text
//! B:<brightness> M:<mode label> O:<red>,<yellow>,<green>
//! B:187 M:Default O:0,1,0
//! ```
//!
//! `O:` flags come from the commanded pattern, not from the PWM levels:
//! a lamp dimmed to zero still reports `1`, and TOGGLE_ALL reports
//! `1,1,1`.  The decoder accepts optional whitespace after each tag,
//! matching what host dashboards send back.

use core::fmt::{self, Write as _};
use core::str::FromStr;

use heapless::String;

use crate::shared::{Lamps, Mode, SharedState, mode_label};

/// Room for the longest frame: `B:255 M:Default O:1,1,1`.
pub const MAX_FRAME_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryFrame {
    pub brightness: u8,
    pub mode: Option<Mode>,
    pub lamps: Lamps,
}

impl TelemetryFrame {
    /// Snapshot the shared state.
    pub fn capture(shared: &SharedState) -> Self {
        Self {
            brightness: shared.brightness(),
            mode: shared.active_mode(),
            lamps: shared.pattern().lamps(),
        }
    }

    pub fn to_line(&self) -> String<MAX_FRAME_LEN> {
        let mut line = String::new();
        // Cannot overflow: every field has a bounded width.
        let _ = write!(line, "{self}");
        line
    }
}

impl fmt::Display for TelemetryFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "B:{} M:{} O:{},{},{}",
            self.brightness,
            mode_label(self.mode),
            u8::from(self.lamps.red),
            u8::from(self.lamps.yellow),
            u8::from(self.lamps.green)
        )
    }
}

/// Why a status line failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryParseError {
    MissingField(&'static str),
    BadBrightness,
    UnknownMode,
    BadLamps,
}

impl fmt::Display for TelemetryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(tag) => write!(f, "missing {tag} field"),
            Self::BadBrightness => write!(f, "brightness is not 0..=255"),
            Self::UnknownMode => write!(f, "unknown mode label"),
            Self::BadLamps => write!(f, "lamp flags must be three 0/1 values"),
        }
    }
}

impl core::error::Error for TelemetryParseError {}

impl FromStr for TelemetryFrame {
    type Err = TelemetryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = field(s.trim_start(), "B:")?;
        let (brightness, rest) = split_token(rest);
        let brightness = brightness
            .parse()
            .map_err(|_| TelemetryParseError::BadBrightness)?;

        let rest = field(rest.trim_start(), "M:")?;
        let (label, rest) = split_token(rest);
        let mode = parse_mode(label)?;

        let rest = field(rest.trim_start(), "O:")?;
        let (flags, _) = split_token(rest);
        let lamps = parse_lamps(flags)?;

        Ok(Self {
            brightness,
            mode,
            lamps,
        })
    }
}

/// Strip `tag` and any whitespace that follows it.
fn field<'a>(s: &'a str, tag: &'static str) -> Result<&'a str, TelemetryParseError> {
    s.strip_prefix(tag)
        .map(str::trim_start)
        .ok_or(TelemetryParseError::MissingField(tag))
}

fn split_token(s: &str) -> (&str, &str) {
    s.split_once(char::is_whitespace).unwrap_or((s, ""))
}

fn parse_mode(label: &str) -> Result<Option<Mode>, TelemetryParseError> {
    if label == mode_label(None) {
        return Ok(None);
    }
    Mode::ALL
        .into_iter()
        .find(|m| m.label() == label)
        .map(Some)
        .ok_or(TelemetryParseError::UnknownMode)
}

fn parse_lamps(flags: &str) -> Result<Lamps, TelemetryParseError> {
    let mut it = flags.split(',').map(|f| match f {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(TelemetryParseError::BadLamps),
    });
    let (Some(red), Some(yellow), Some(green), None) = (it.next(), it.next(), it.next(), it.next())
    else {
        return Err(TelemetryParseError::BadLamps);
    };
    Ok(Lamps::new(red?, yellow?, green?))
}
