//! Traffic-light controller: host simulator entry point.
//!
//! Runs the complete controller against a simulated fixture.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  SimFixture          LogEventSink     HostClock              │
//! │  (Analog+Led+Serial) (EventSink)      (Clock)                │
//! │  ConsoleLogger (stderr)                                      │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │               Controller (pure logic)                  │  │
//! │  │  FSM · Renderer · Scheduler · Command channel          │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  SharedState (static) ◀── ButtonBank (static, "ISR" side)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! stdin lines go to the serial command channel; lines starting with `!`
//! are simulator directives (`!pot`, `!press`, `!quit`).  Telemetry and
//! command replies print on stdout, logs on stderr.
#![deny(unused_must_use)]

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use log::{info, warn};

use trafficlight::adapters::console_log;
use trafficlight::adapters::log_sink::LogEventSink;
use trafficlight::adapters::sim::{self, DIRECTIVE_PREFIX, SimDirective, SimFixture};
use trafficlight::adapters::time::HostClock;
use trafficlight::app::ports::Clock;
use trafficlight::drivers::button::ButtonBank;
use trafficlight::{Controller, ControllerConfig, SharedState};

/// Written by the button "interrupts", read by the main loop.
static SHARED: SharedState = SharedState::new();
static BUTTONS: ButtonBank = ButtonBank::new();

/// Main-loop pass interval.
const PASS_INTERVAL: Duration = Duration::from_millis(1);

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    console_log::init().map_err(|e| anyhow!("logger init failed: {e}"))?;
    info!("trafficlight v{} (host simulator)", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = match config_path(std::env::args().skip(1))? {
        Some(path) => load_config(&path)?,
        None => ControllerConfig::default(),
    };

    // ── 3. Controller and adapters ────────────────────────────
    let mut controller = Controller::new(&SHARED, &config).context("invalid configuration")?;
    let clock = HostClock::new();
    let mut fixture = SimFixture::new();
    let mut sink = LogEventSink::new();
    let console = spawn_console_reader();

    controller.start(clock.now_ms(), &mut sink);
    info!("Ready. Type r,y,g intervals or !pot / !press / !quit.");

    // ── 4. Main loop ──────────────────────────────────────────
    let mut console_open = true;
    loop {
        while console_open {
            match console.try_recv() {
                Ok(line) => {
                    if !handle_console_line(&line, &mut fixture, clock.now_ms()) {
                        info!("Quit requested");
                        return Ok(());
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("stdin closed; simulator keeps running (Ctrl-C to stop)");
                    console_open = false;
                }
            }
        }

        controller.run_once(&mut fixture, &mut sink, clock.now_ms());
        for line in fixture.take_output() {
            println!("{line}");
        }
        std::thread::sleep(PASS_INTERVAL);
    }
}

/// Apply one console line.  Returns `false` when the user asked to quit.
fn handle_console_line(line: &str, fixture: &mut SimFixture, now_ms: u32) -> bool {
    if !line.trim_start().starts_with(DIRECTIVE_PREFIX) {
        fixture.feed_line(line);
        return true;
    }
    match line.parse::<SimDirective>() {
        Ok(SimDirective::Pot(raw)) => fixture.set_pot(raw),
        Ok(SimDirective::Press(button)) => {
            // Stands in for the pin-change interrupt.
            sim::press(&BUTTONS, button, &SHARED, now_ms);
        }
        Ok(SimDirective::Quit) => return false,
        Err(e) => warn!("{}", e),
    }
    true
}

/// Forward stdin lines to the main loop without blocking it.
fn spawn_console_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// `--config <path>` is the only option.
fn config_path(mut args: impl Iterator<Item = String>) -> Result<Option<PathBuf>> {
    let mut path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let value = args.next().context("--config needs a file path")?;
                path = Some(PathBuf::from(value));
            }
            "--help" | "-h" => {
                println!("usage: trafficlight [--config <file.json>]");
                std::process::exit(0);
            }
            other => bail!("unknown argument '{other}' (try --help)"),
        }
    }
    Ok(path)
}

fn load_config(path: &Path) -> Result<ControllerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: ControllerConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate().context("invalid configuration")?;
    info!("Config loaded from {}", path.display());
    Ok(config)
}
