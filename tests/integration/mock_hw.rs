//! Mock fixture for integration tests.
//!
//! Records every lamp write and serial line so tests can assert on the
//! full output history without real ADC/PWM/UART peripherals.

use std::collections::VecDeque;

use trafficlight::app::events::AppEvent;
use trafficlight::app::ports::{AnalogPort, EventSink, LedPort, SerialPort};
use trafficlight::drivers::renderer::LedLevels;
use trafficlight::{Controller, ControllerConfig, DisplayPattern, SharedState};

// ── MockFixture ───────────────────────────────────────────────

pub struct MockFixture {
    pub pot_raw: u16,
    pub input: VecDeque<u8>,
    pub lines: Vec<String>,
    pub levels: Vec<LedLevels>,
}

#[allow(dead_code)]
impl MockFixture {
    pub fn new() -> Self {
        Self {
            pot_raw: 1023,
            input: VecDeque::new(),
            lines: Vec::new(),
            levels: Vec::new(),
        }
    }

    pub fn send(&mut self, line: &str) {
        self.input.extend(line.bytes());
        self.input.push_back(b'\n');
    }

    pub fn last_levels(&self) -> LedLevels {
        self.levels.last().copied().unwrap_or_default()
    }

    /// Status lines only (`B:` prefix).
    pub fn telemetry(&self) -> Vec<&str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|l| l.starts_with("B:"))
            .collect()
    }

    /// Everything that is not a status line.
    pub fn replies(&self) -> Vec<&str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|l| !l.starts_with("B:"))
            .collect()
    }
}

impl Default for MockFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalogPort for MockFixture {
    fn read_raw(&mut self) -> u16 {
        self.pot_raw
    }
}

impl LedPort for MockFixture {
    fn write_levels(&mut self, levels: LedLevels) {
        self.levels.push(levels);
    }
}

impl SerialPort for MockFixture {
    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Bench: controller + fixture + sink + virtual clock ────────

pub struct Bench<'a> {
    pub controller: Controller<'a>,
    pub hw: MockFixture,
    pub sink: RecordingSink,
    pub now: u32,
}

#[allow(dead_code)]
impl<'a> Bench<'a> {
    /// Start a default controller at t = 0.
    pub fn start(shared: &'a SharedState) -> Self {
        Self::start_with(shared, &ControllerConfig::default(), 0)
    }

    pub fn start_with(shared: &'a SharedState, config: &ControllerConfig, now: u32) -> Self {
        let mut controller = Controller::new(shared, config).expect("valid config");
        let mut sink = RecordingSink::new();
        controller.start(now, &mut sink);
        let mut bench = Self {
            controller,
            hw: MockFixture::new(),
            sink,
            now,
        };
        bench.pass();
        bench
    }

    /// One main-loop pass at the current time.
    pub fn pass(&mut self) {
        self.controller.run_once(&mut self.hw, &mut self.sink, self.now);
    }

    /// Advance 1 ms at a time up to and including `until`.
    pub fn run_until(&mut self, until: u32) {
        while self.now != until {
            self.now = self.now.wrapping_add(1);
            self.pass();
        }
    }

    /// Like [`run_until`](Self::run_until), recording the commanded
    /// pattern after every pass as `(time, pattern)` change points.
    pub fn pattern_changes_until(&mut self, until: u32) -> Vec<(u32, DisplayPattern)> {
        let shared = self.controller.shared();
        let mut changes = vec![(self.now, shared.pattern())];
        while self.now != until {
            self.now = self.now.wrapping_add(1);
            self.pass();
            let p = shared.pattern();
            if changes.last().map(|(_, last)| *last) != Some(p) {
                changes.push((self.now, p));
            }
        }
        changes
    }
}
