//! Serial command and telemetry channel.
//!
//! - [`line`]: newline framing over a [`SerialPort`](crate::app::ports::SerialPort).
//! - [`command`]: `red,yellow,green` interval updates and their replies.
//! - [`telemetry`]: the periodic `B:… M:… O:…` status line.

pub mod command;
pub mod line;
pub mod telemetry;

pub use command::{CommandReply, IntervalUpdate};
pub use line::LineBuffer;
pub use telemetry::TelemetryFrame;
