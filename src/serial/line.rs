//! Newline framing over a byte-oriented serial port.
//!
//! The framer accumulates bytes into a fixed buffer and yields complete
//! lines.  Partial input is kept across polls: a line may arrive over
//! several command-intake passes.
//!
//! ```text
//!            byte != '\n'                    buffer full
//!          ┌──────────────┐            ┌─────────────────────┐
//!          ▼              │            │                     ▼
//!   ┌──────────────┐──────┘────────────┘      ┌──────────────────┐
//!   │  Collecting  │                           │   Discarding     │
//!   └──────────────┘◀──────── '\n' ────────────└──────────────────┘
//!          │ '\n'                              (yields TooLong)
//!          ▼
//!     complete line
//! ```

use heapless::{String, Vec};

use crate::app::ports::SerialPort;
use crate::error::LineError;

/// Longest accepted line, excluding the terminator.
pub const MAX_LINE_LEN: usize = 64;

/// A received line with surrounding whitespace (and any `\r`) removed.
pub type Line = String<MAX_LINE_LEN>;

enum FramerState {
    Collecting,
    /// Overflowed; dropping bytes up to the next newline.
    Discarding,
}

/// Streaming line framer.
pub struct LineBuffer {
    state: FramerState,
    buf: Vec<u8, MAX_LINE_LEN>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            state: FramerState::Collecting,
            buf: Vec::new(),
        }
    }

    /// Feed one byte.  Returns `Some` when it completes a line.
    pub fn push(&mut self, byte: u8) -> Option<Result<Line, LineError>> {
        match self.state {
            FramerState::Collecting if byte == b'\n' => {
                let line = finish(&self.buf);
                self.buf.clear();
                Some(line)
            }
            FramerState::Collecting => {
                if self.buf.push(byte).is_err() {
                    self.buf.clear();
                    self.state = FramerState::Discarding;
                }
                None
            }
            FramerState::Discarding if byte == b'\n' => {
                self.state = FramerState::Collecting;
                Some(Err(LineError::TooLong))
            }
            FramerState::Discarding => None,
        }
    }

    /// Drain the port until one non-blank line (or framing error) is
    /// complete.  Blank lines are skipped.  Returns `None` once the port
    /// has no more bytes; partial input stays buffered.
    pub fn poll(&mut self, port: &mut impl SerialPort) -> Option<Result<Line, LineError>> {
        while let Some(byte) = port.read_byte() {
            match self.push(byte) {
                Some(Ok(line)) if line.is_empty() => continue,
                Some(result) => return Some(result),
                None => {}
            }
        }
        None
    }

    /// Bytes of the line currently being collected.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    pub fn reset(&mut self) {
        self.buf.clear();
        self.state = FramerState::Collecting;
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn finish(raw: &[u8]) -> Result<Line, LineError> {
    let text = core::str::from_utf8(raw).map_err(|_| LineError::NotUtf8)?;
    let mut line = Line::new();
    line.push_str(text.trim()).map_err(|()| LineError::TooLong)?;
    Ok(line)
}
