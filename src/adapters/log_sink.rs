//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each controller event as one
//! structured line through the `log` facade.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::shared::mode_label;

/// Adapter that logs every [`AppEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(phase) => {
                info!("START | initial_phase={:?}", phase);
            }
            AppEvent::PhaseChanged { from, to } => {
                info!("PHASE | {:?} -> {:?}", from, to);
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE  | {} -> {}", mode_label(*from), mode_label(*to));
            }
            AppEvent::IntervalsUpdated(d) => {
                info!(
                    "CMD   | red={}ms yellow={}ms green={}ms flicker={}ms",
                    d.red_ms, d.yellow_ms, d.green_ms, d.flicker_period_ms
                );
            }
            AppEvent::CommandRejected(e) => {
                warn!("CMD   | rejected: {}", e);
            }
        }
    }
}
