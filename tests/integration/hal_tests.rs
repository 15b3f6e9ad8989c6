//! The controller driven through the embedded-hal adapters.
//!
//! PWM channels and input pins are mocked at the trait level, so these
//! tests cover the same wiring a board binary would use.

use std::cell::Cell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType as DigitalErrorType, InputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};

use super::mock_hw::RecordingSink;

use trafficlight::adapters::hal::{ButtonInputs, Fixture, PwmLamps};
use trafficlight::app::ports::{AnalogPort, SerialPort};
use trafficlight::arbiter::ModeChange;
use trafficlight::drivers::button::ButtonBank;
use trafficlight::{Controller, ControllerConfig, Mode, SharedState};

// ── Mock peripherals ──────────────────────────────────────────

/// PWM channel whose duty stays observable after it is moved into the lamps.
#[derive(Clone)]
struct Channel {
    max: u16,
    duty: Rc<Cell<u16>>,
}

impl Channel {
    fn new(max: u16) -> Self {
        Self {
            max,
            duty: Rc::new(Cell::new(0)),
        }
    }
}

impl PwmErrorType for Channel {
    type Error = Infallible;
}

impl SetDutyCycle for Channel {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty.set(duty);
        Ok(())
    }
}

/// Input pin whose level the test flips from outside.
#[derive(Clone)]
struct Pin(Rc<Cell<bool>>);

impl Pin {
    fn released() -> Self {
        Self(Rc::new(Cell::new(true)))
    }
}

impl DigitalErrorType for Pin {
    type Error = Infallible;
}

impl InputPin for Pin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.get())
    }
}

struct Pot(u16);

impl AnalogPort for Pot {
    fn read_raw(&mut self) -> u16 {
        self.0
    }
}

#[derive(Default)]
struct Uart {
    rx: VecDeque<u8>,
    tx: Vec<String>,
}

impl SerialPort for Uart {
    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write_line(&mut self, line: &str) {
        self.tx.push(line.to_owned());
    }
}

fn duties(channels: &[Channel; 3]) -> [u16; 3] {
    [
        channels[0].duty.get(),
        channels[1].duty.get(),
        channels[2].duty.get(),
    ]
}

// ── Tests ─────────────────────────────────────────────────────

#[test]
fn red_phase_drives_red_channel_at_pot_scale() {
    let shared = SharedState::new();
    let channels = [Channel::new(1000), Channel::new(1000), Channel::new(1000)];
    let lamps = PwmLamps::new(channels[0].clone(), channels[1].clone(), channels[2].clone());
    let mut hw = Fixture::new(Pot(1023), lamps, Uart::default());
    let mut sink = RecordingSink::new();

    let mut controller =
        Controller::new(&shared, &ControllerConfig::default()).expect("valid config");
    controller.start(0, &mut sink);
    controller.run_once(&mut hw, &mut sink, 0);
    controller.run_once(&mut hw, &mut sink, 1);
    assert_eq!(duties(&channels), [1000, 0, 0]);

    hw.adc.0 = 0;
    controller.run_once(&mut hw, &mut sink, 2);
    assert_eq!(duties(&channels), [0, 0, 0]);
    assert_eq!(hw.serial.tx.first().map(String::as_str), Some("B:255 M:Default O:1,0,0"));
}

#[test]
fn serial_command_through_fixture() {
    let shared = SharedState::new();
    let channels = [Channel::new(255), Channel::new(255), Channel::new(255)];
    let lamps = PwmLamps::new(channels[0].clone(), channels[1].clone(), channels[2].clone());
    let mut hw = Fixture::new(Pot(1023), lamps, Uart::default());
    let mut sink = RecordingSink::new();

    let mut controller =
        Controller::new(&shared, &ControllerConfig::default()).expect("valid config");
    controller.start(0, &mut sink);
    hw.serial.rx.extend(b"100,100,100\r\n");
    for now in 0..=500 {
        controller.run_once(&mut hw, &mut sink, now);
    }
    assert!(hw.serial.tx.iter().any(|l| l == "Intervals updated to: 100, 100, 100"));
    assert_eq!(controller.durations().red_ms, 100);
}

#[test]
fn polled_buttons_toggle_modes_once_per_press() {
    let shared = SharedState::new();
    let bank = ButtonBank::new();
    let pins = [Pin::released(), Pin::released(), Pin::released()];
    let mut inputs = ButtonInputs::new(pins[0].clone(), pins[1].clone(), pins[2].clone());

    assert_eq!(bank.poll(inputs.levels(), &shared, 0), [None, None, None]);

    pins[1].0.set(false);
    let changes = bank.poll(inputs.levels(), &shared, 5);
    assert_eq!(
        changes[1],
        Some(ModeChange::Activated {
            mode: Mode::BlinkAll,
            replaced: None
        })
    );
    // Held down: no repeat.
    assert_eq!(bank.poll(inputs.levels(), &shared, 10), [None, None, None]);
    assert_eq!(shared.active_mode(), Some(Mode::BlinkAll));

    pins[1].0.set(true);
    bank.poll(inputs.levels(), &shared, 15);
    pins[1].0.set(false);
    let changes = bank.poll(inputs.levels(), &shared, 20);
    assert_eq!(changes[1], Some(ModeChange::Deactivated(Mode::BlinkAll)));
    assert_eq!(shared.active_mode(), None);
}
