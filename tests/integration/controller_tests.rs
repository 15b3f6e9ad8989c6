//! Integration tests for the Controller → FSM → renderer → serial pipeline.
//!
//! The controller runs against [`MockFixture`](super::mock_hw::MockFixture)
//! with a virtual clock advanced one millisecond per main-loop pass.

use super::mock_hw::Bench;

use trafficlight::app::events::AppEvent;
use trafficlight::drivers::button::{ButtonBank, ButtonId};
use trafficlight::drivers::renderer::LedLevels;
use trafficlight::fsm::PhaseId;
use trafficlight::{ControllerConfig, DisplayPattern, Mode, PhaseDurations, SharedState};

fn press(bank: &ButtonBank, button: ButtonId, shared: &SharedState, now: u32) {
    bank.on_pin_change(button, false, shared, now);
    bank.on_pin_change(button, true, shared, now);
}

fn phase_changes(events: &[AppEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, AppEvent::PhaseChanged { .. }))
        .count()
}

// ── Default cycle ─────────────────────────────────────────────

#[test]
fn default_cycle_pattern_timeline() {
    let shared = SharedState::new();
    let mut b = Bench::start(&shared);

    let changes = b.pattern_changes_until(8000);
    assert_eq!(
        changes,
        vec![
            (0, DisplayPattern::Red),
            (2000, DisplayPattern::Yellow),
            (2500, DisplayPattern::Green),
            // Flicker: toggles land on the 10 ms state tick, 170 ms apart.
            (4670, DisplayPattern::Off),
            (4840, DisplayPattern::Green),
            (5010, DisplayPattern::Off),
            (5180, DisplayPattern::Green),
            (5350, DisplayPattern::Off),
            // Sixth toggle moves straight on to YELLOW_2.
            (5520, DisplayPattern::Yellow),
            (6020, DisplayPattern::Red),
        ]
    );
    assert_eq!(b.controller.phase(), PhaseId::Red);
    assert_eq!(phase_changes(&b.sink.events), 5);
}

#[test]
fn lamps_follow_pattern_at_pot_brightness() {
    let shared = SharedState::new();
    let mut b = Bench::start(&shared);
    b.hw.pot_raw = 512;
    b.run_until(2100);
    assert_eq!(b.hw.last_levels(), LedLevels::new(0, 127, 0));
    assert_eq!(b.hw.telemetry().last().copied(), Some("B:127 M:Default O:0,1,0"));
}

#[test]
fn telemetry_every_100ms() {
    let shared = SharedState::new();
    let mut b = Bench::start(&shared);
    b.run_until(999);
    assert_eq!(b.hw.telemetry().len(), 10);
    assert!(b.hw.telemetry().iter().all(|l| *l == "B:255 M:Default O:1,0,0"));
}

#[test]
fn cycle_survives_clock_wraparound() {
    let shared = SharedState::new();
    let start = u32::MAX - 1000;
    let mut b = Bench::start_with(&shared, &ControllerConfig::default(), start);
    b.run_until(start.wrapping_add(1999));
    assert_eq!(b.controller.phase(), PhaseId::Red);
    b.run_until(start.wrapping_add(2000));
    assert_eq!(b.controller.phase(), PhaseId::Yellow1);
}

// ── Mode A: solid red ─────────────────────────────────────────

#[test]
fn mode_a_forces_red_and_suspends_cycle() {
    let shared = SharedState::new();
    let bank = ButtonBank::new();
    let mut b = Bench::start(&shared);

    b.run_until(3000);
    assert_eq!(b.controller.phase(), PhaseId::Green);

    press(&bank, ButtonId::One, &shared, b.now);
    assert_eq!(shared.pattern(), DisplayPattern::Red);

    b.run_until(20_000);
    assert_eq!(b.controller.phase(), PhaseId::Green);
    assert_eq!(shared.pattern(), DisplayPattern::Red);
    assert_eq!(b.hw.last_levels(), LedLevels::new(255, 0, 0));
    assert_eq!(b.hw.telemetry().last().copied(), Some("B:255 M:PCINT1 O:1,0,0"));
    assert_eq!(phase_changes(&b.sink.events), 2);
    assert!(b.sink.events.contains(&AppEvent::ModeChanged {
        from: None,
        to: Some(Mode::SolidRed)
    }));
}

#[test]
fn mode_a_mid_flicker_holds_solid_red() {
    let shared = SharedState::new();
    let bank = ButtonBank::new();
    let mut b = Bench::start(&shared);

    // First flicker toggle at 4670 left the lamps OFF.
    b.run_until(4700);
    assert_eq!(b.controller.phase(), PhaseId::FlickerGreen);
    assert_eq!(shared.pattern(), DisplayPattern::Off);
    assert_eq!(b.controller.flicker_count(), 1);

    press(&bank, ButtonId::One, &shared, b.now);
    assert_eq!(shared.pattern(), DisplayPattern::Red);

    let changes = b.pattern_changes_until(10_000);
    assert_eq!(changes, vec![(4700, DisplayPattern::Red)]);
    assert_eq!(b.controller.phase(), PhaseId::FlickerGreen);
    assert_eq!(b.controller.flicker_count(), 1);
    assert_eq!(b.hw.last_levels(), LedLevels::new(255, 0, 0));
    assert_eq!(b.hw.telemetry().last().copied(), Some("B:255 M:PCINT1 O:1,0,0"));
    assert_eq!(phase_changes(&b.sink.events), 3);
}

// ── Mode C: dark, and release behavior ────────────────────────

#[test]
fn release_restarts_with_a_fresh_red_hold() {
    let shared = SharedState::new();
    let bank = ButtonBank::new();
    let mut b = Bench::start(&shared);

    b.run_until(4700);
    assert_eq!(b.controller.phase(), PhaseId::FlickerGreen);

    press(&bank, ButtonId::Three, &shared, b.now);
    b.run_until(6000);
    assert_eq!(b.hw.last_levels(), LedLevels::OFF);
    assert_eq!(b.controller.phase(), PhaseId::FlickerGreen);

    press(&bank, ButtonId::Three, &shared, b.now);
    assert_eq!(shared.active_mode(), None);
    assert_eq!(b.controller.phase(), PhaseId::Red);
    assert_eq!(shared.phase_start_ms(), 6000);

    let changes = b.pattern_changes_until(8100);
    assert_eq!(
        changes,
        vec![
            (6000, DisplayPattern::Off),
            // Next state tick re-asserts RED.
            (6010, DisplayPattern::Red),
            (8000, DisplayPattern::Yellow),
        ]
    );
    assert!(b.sink.events.contains(&AppEvent::ModeChanged {
        from: Some(Mode::Dark),
        to: None
    }));
}

#[test]
fn switching_modes_keeps_exactly_one_active() {
    let shared = SharedState::new();
    let bank = ButtonBank::new();
    let mut b = Bench::start(&shared);

    press(&bank, ButtonId::One, &shared, b.now);
    b.run_until(100);
    press(&bank, ButtonId::Three, &shared, b.now);
    b.run_until(200);
    assert_eq!(shared.active_mode(), Some(Mode::Dark));
    assert_eq!(b.hw.telemetry().last().copied(), Some("B:255 M:PCINT3 O:0,0,0"));
    assert!(b.sink.events.contains(&AppEvent::ModeChanged {
        from: Some(Mode::SolidRed),
        to: Some(Mode::Dark)
    }));
}

// ── Mode B: blink all ─────────────────────────────────────────

#[test]
fn mode_b_blinks_at_full_scale_every_500ms() {
    let shared = SharedState::new();
    let bank = ButtonBank::new();
    let mut b = Bench::start(&shared);
    b.hw.pot_raw = 0;

    b.run_until(1000);
    press(&bank, ButtonId::Two, &shared, b.now);

    // Blink timer arms on the first pass (t = 1001).
    b.run_until(1400);
    assert_eq!(b.hw.last_levels(), LedLevels::uniform(255));
    b.run_until(1600);
    assert_eq!(b.hw.last_levels(), LedLevels::OFF);
    assert_eq!(b.hw.telemetry().last().copied(), Some("B:0 M:PCINT2 O:0,0,0"));
    b.run_until(2100);
    assert_eq!(b.hw.last_levels(), LedLevels::uniform(255));
    assert_eq!(b.hw.telemetry().last().copied(), Some("B:0 M:PCINT2 O:1,1,1"));
    assert_eq!(b.controller.phase(), PhaseId::Red);
}

#[test]
fn toggle_all_left_behind_is_drawn_all_on_until_next_tick() {
    let shared = SharedState::new();
    let bank = ButtonBank::new();
    let mut b = Bench::start(&shared);
    b.hw.pot_raw = 512;

    b.run_until(1000);
    press(&bank, ButtonId::Two, &shared, b.now);
    press(&bank, ButtonId::Two, &shared, b.now);
    assert_eq!(shared.pattern(), DisplayPattern::ToggleAll);

    b.run_until(1001);
    assert_eq!(b.hw.last_levels(), LedLevels::uniform(127));
    b.run_until(1011);
    assert_eq!(b.hw.last_levels(), LedLevels::new(127, 0, 0));
}

// ── Serial commands ───────────────────────────────────────────

#[test]
fn interval_update_takes_effect_in_current_phase() {
    let shared = SharedState::new();
    let mut b = Bench::start(&shared);
    b.hw.send("1000,300,1000");

    b.run_until(999);
    assert_eq!(b.hw.replies(), vec!["Intervals updated to: 1000, 300, 1000"]);
    assert_eq!(b.controller.phase(), PhaseId::Red);
    b.run_until(1000);
    assert_eq!(b.controller.phase(), PhaseId::Yellow1);
    b.run_until(1300);
    assert_eq!(b.controller.phase(), PhaseId::Green);
    let applied = b.sink.events.iter().find_map(|e| match e {
        AppEvent::IntervalsUpdated(d) => Some((d.red_ms, d.yellow_ms, d.green_ms)),
        _ => None,
    });
    assert_eq!(applied, Some((1000, 300, 1000)));
}

#[test]
fn rejected_commands_reply_and_change_nothing() {
    let shared = SharedState::new();
    let mut b = Bench::start(&shared);
    b.hw.send("0,500,2000");
    b.hw.send("2000,500");
    b.hw.send("abc,1,1");

    // One line per intake pass: at 500, 1000 and 1500 ms.
    b.run_until(600);
    assert_eq!(b.hw.replies().len(), 1);
    b.run_until(1600);
    assert_eq!(
        b.hw.replies(),
        vec![
            "Invalid intervals provided.",
            "Invalid input format. Use: 2000,500,2000",
            "Invalid intervals provided.",
        ]
    );
    assert_eq!(b.controller.durations(), PhaseDurations::default());
    assert_eq!(
        b.sink
            .events
            .iter()
            .filter(|e| matches!(e, AppEvent::CommandRejected(_)))
            .count(),
        3
    );
}

#[test]
fn overlong_line_gets_format_reply() {
    let shared = SharedState::new();
    let mut b = Bench::start(&shared);
    b.hw.send(&"1".repeat(200));
    b.hw.send("500,500,500");
    b.run_until(1100);
    assert_eq!(
        b.hw.replies(),
        vec![
            "Invalid input format. Use: 2000,500,2000",
            "Intervals updated to: 500, 500, 500",
        ]
    );
}

#[test]
fn blank_lines_are_ignored() {
    let shared = SharedState::new();
    let mut b = Bench::start(&shared);
    b.hw.send("");
    b.hw.send("   ");
    b.hw.send("3000,500,3000");
    b.run_until(600);
    assert_eq!(b.hw.replies(), vec!["Intervals updated to: 3000, 500, 3000"]);
}
