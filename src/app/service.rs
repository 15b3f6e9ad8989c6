//! Controller service: the hexagonal core.
//!
//! [`Controller`] owns the state machine, renderer, brightness source,
//! command framer, hold times and the task scheduler.  It shares only
//! [`SharedState`] with the button interrupts.  All I/O flows through port
//! traits passed in at call sites, so the whole controller runs against
//! mock adapters in tests.
//!
//! ```text
//!  AnalogPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          Controller          │
//!     LedPort ◀── │  FSM · Renderer · Scheduler  │
//!                 │                              │
//!  SerialPort ◀─▶ │  command intake · telemetry  │
//!                 └──────────────┬───────────────┘
//!                                │ atomics
//!                         SharedState ◀── button ISRs
//! ```
//!
//! ## One pass of the main loop ([`Controller::run_once`])
//!
//! 1. Sample the pot and publish brightness.
//! 2. Report any mode change the buttons made since the last pass.
//! 3. Render and drive the lamps (every pass, not scheduled).
//! 4. Run whichever periodic tasks are due: state-machine tick,
//!    telemetry line, command intake.

use log::{debug, info, warn};

use crate::config::{ControllerConfig, PhaseDurations};
use crate::error::{self, CommandError, Error};
use crate::drivers::renderer::LedRenderer;
use crate::fsm::{PhaseId, TrafficLight};
use crate::scheduler::{Scheduler, TaskId};
use crate::sensors::BrightnessSource;
use crate::serial::{CommandReply, IntervalUpdate, LineBuffer, TelemetryFrame};
use crate::shared::{Mode, SharedState, mode_label};

use super::events::AppEvent;
use super::ports::{AnalogPort, EventSink, LedPort, SchedulerDelegate, SerialPort};

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

/// The controller aggregate.  The scheduler is kept apart from the rest
/// so it can drive the core mutably while it iterates its task table.
pub struct Controller<'a> {
    scheduler: Scheduler,
    core: ControllerCore<'a>,
}

struct ControllerCore<'a> {
    shared: &'a SharedState,
    light: TrafficLight,
    durations: PhaseDurations,
    brightness: BrightnessSource,
    renderer: LedRenderer,
    line: LineBuffer,
    /// Mode seen on the previous pass, for change reporting.
    last_mode: Option<Mode>,
}

impl<'a> Controller<'a> {
    /// Construct the controller from configuration.
    ///
    /// Does **not** start the cycle; call [`start`](Self::start) next.
    pub fn new(shared: &'a SharedState, config: &ControllerConfig) -> error::Result<Self> {
        config.validate()?;
        let durations = config.phase_durations()?;

        let mut scheduler = Scheduler::new();
        scheduler.add(TaskId::StateMachine, config.state_tick_ms);
        scheduler.add(TaskId::Telemetry, config.telemetry_period_ms);
        scheduler.add(TaskId::CommandIntake, config.command_period_ms);

        Ok(Self {
            scheduler,
            core: ControllerCore {
                shared,
                light: TrafficLight::new(),
                durations,
                brightness: BrightnessSource::new(config.adc_max),
                renderer: LedRenderer::new(config.blink_period_ms),
                line: LineBuffer::new(),
                last_mode: None,
            },
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Begin the cycle in RED at `now_ms`.
    pub fn start(&mut self, now_ms: u32, sink: &mut impl EventSink) {
        let core = &mut self.core;
        core.light.start(core.shared, &core.durations, now_ms);
        core.last_mode = core.shared.active_mode();
        sink.emit(&AppEvent::Started(PhaseId::Red));
        info!(
            "Controller started: red={}ms yellow={}ms green={}ms",
            core.durations.red_ms, core.durations.yellow_ms, core.durations.green_ms
        );
    }

    // ── Per-pass orchestration ────────────────────────────────

    /// Run one main-loop pass.  Returns the number of periodic tasks run.
    ///
    /// `hw` satisfies all three hardware ports at once; this avoids
    /// juggling several mutable borrows of one fixture.
    pub fn run_once<H, S>(&mut self, hw: &mut H, sink: &mut S, now_ms: u32) -> usize
    where
        H: AnalogPort + LedPort + SerialPort,
        S: EventSink,
    {
        let core = &mut self.core;

        // 1. Brightness
        let level = core.brightness.sample(&mut *hw);
        core.shared.set_brightness(level);

        // 2. Mode changes made from interrupt context
        core.report_mode_change(&mut *sink);

        // 3. Lamps
        let levels = core.renderer.render(core.shared, level, now_ms);
        hw.write_levels(levels);

        // 4. Periodic tasks
        let mut dispatch = TaskDispatch { core, hw, sink };
        self.scheduler.execute(now_ms, &mut dispatch)
    }

    // ── Commands ──────────────────────────────────────────────

    /// Parse and apply one `red,yellow,green` line.  On error nothing
    /// changes.
    pub fn apply_command(&mut self, line: &str) -> Result<IntervalUpdate, CommandError> {
        self.core.apply_command(line)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Hold times currently in force.
    pub fn durations(&self) -> PhaseDurations {
        self.core.durations
    }

    pub fn shared(&self) -> &'a SharedState {
        self.core.shared
    }

    pub fn phase(&self) -> PhaseId {
        self.core.shared.phase()
    }

    pub fn flicker_count(&self) -> u8 {
        self.core.light.flicker_count()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}

impl ControllerCore<'_> {
    fn report_mode_change(&mut self, sink: &mut impl EventSink) {
        let mode = self.shared.active_mode();
        if mode == self.last_mode {
            return;
        }
        info!("Mode: {} -> {}", mode_label(self.last_mode), mode_label(mode));
        sink.emit(&AppEvent::ModeChanged {
            from: self.last_mode,
            to: mode,
        });
        self.last_mode = mode;
    }

    fn apply_command(&mut self, line: &str) -> Result<IntervalUpdate, CommandError> {
        let update: IntervalUpdate = line.parse()?;
        update.apply_to(&mut self.durations)?;
        Ok(update)
    }

    // ── Task bodies ───────────────────────────────────────────

    fn tick_state_machine(&mut self, sink: &mut impl EventSink, now_ms: u32) {
        if let Some(t) = self.light.update(self.shared, &self.durations, now_ms) {
            sink.emit(&AppEvent::PhaseChanged {
                from: t.from,
                to: t.to,
            });
        }
    }

    fn emit_telemetry(&self, port: &mut impl SerialPort) {
        let frame = TelemetryFrame::capture(self.shared);
        port.write_line(frame.to_line().as_str());
    }

    fn intake_command(&mut self, port: &mut impl SerialPort, sink: &mut impl EventSink) {
        let Some(received) = self.line.poll(port) else {
            return;
        };
        let result = match received {
            Ok(line) => {
                debug!("Command line: {:?}", line.as_str());
                self.apply_command(&line).map_err(|e| (e, Error::Command(e)))
            }
            Err(e) => Err((CommandError::from(e), Error::Line(e))),
        };
        let reply = match result {
            Ok(update) => {
                info!(
                    "Intervals updated: red={}ms yellow={}ms green={}ms",
                    update.red_ms, update.yellow_ms, update.green_ms
                );
                sink.emit(&AppEvent::IntervalsUpdated(self.durations));
                CommandReply::Updated(update)
            }
            Err((reason, error)) => {
                warn!("Command rejected: {}", error);
                sink.emit(&AppEvent::CommandRejected(error));
                CommandReply::Rejected(reason)
            }
        };
        let mut text = heapless::String::<64>::new();
        // Longest reply is 56 bytes (three 10-digit values).
        let _ = core::fmt::write(&mut text, format_args!("{reply}"));
        port.write_line(text.as_str());
    }
}

// ───────────────────────────────────────────────────────────────
// Scheduler dispatch
// ───────────────────────────────────────────────────────────────

/// Routes due tasks to their bodies for one pass.
struct TaskDispatch<'c, 'a, H, S> {
    core: &'c mut ControllerCore<'a>,
    hw: &'c mut H,
    sink: &'c mut S,
}

impl<H: SerialPort, S: EventSink> SchedulerDelegate for TaskDispatch<'_, '_, H, S> {
    fn on_task_due(&mut self, task: TaskId, now_ms: u32) {
        match task {
            TaskId::StateMachine => self.core.tick_state_machine(&mut *self.sink, now_ms),
            TaskId::Telemetry => self.core.emit_telemetry(&mut *self.hw),
            TaskId::CommandIntake => self.core.intake_command(&mut *self.hw, &mut *self.sink),
        }
    }
}
