//! Outbound application events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; the host binary logs them.

use crate::config::PhaseDurations;
use crate::error::Error;
use crate::fsm::PhaseId;
use crate::shared::Mode;

/// Structured events emitted by the controller core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The controller has started (carries the initial phase).
    Started(PhaseId),

    /// The traffic-light cycle moved to the next phase.
    PhaseChanged { from: PhaseId, to: PhaseId },

    /// A button changed the override mode.  `None` is the normal cycle.
    ModeChanged { from: Option<Mode>, to: Option<Mode> },

    /// A serial command installed new hold times.
    IntervalsUpdated(PhaseDurations),

    /// A serial line was rejected; durations are unchanged.
    CommandRejected(Error),
}
