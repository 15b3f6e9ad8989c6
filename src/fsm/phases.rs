//! Concrete phase handler functions and table builder.
//!
//! ```text
//!  RED ──[red_ms]──▶ YELLOW_1 ──[yellow_ms]──▶ GREEN
//!   ▲                                            │
//!   │                                       [green_ms]
//!   │                                            ▼
//!  YELLOW_2 ◀──[6 toggles]── FLICKER_GREEN (GREEN/OFF every 166 ms)
//! ```

use super::context::PhaseContext;
use super::{PhaseDescriptor, PhaseId};
use crate::config::FLICKER_TOGGLES;
use crate::shared::DisplayPattern;

/// Build the phase table.  Called once at construction.
pub fn build_phase_table() -> [PhaseDescriptor; PhaseId::COUNT] {
    [
        // Index 0: Red
        PhaseDescriptor {
            id: PhaseId::Red,
            name: "Red",
            on_enter: Some(show_red),
            on_update: red_update,
        },
        // Index 1: Yellow before green
        PhaseDescriptor {
            id: PhaseId::Yellow1,
            name: "Yellow1",
            on_enter: Some(show_yellow),
            on_update: yellow1_update,
        },
        // Index 2: Green
        PhaseDescriptor {
            id: PhaseId::Green,
            name: "Green",
            on_enter: Some(show_green),
            on_update: green_update,
        },
        // Index 3: Flicker green
        PhaseDescriptor {
            id: PhaseId::FlickerGreen,
            name: "FlickerGreen",
            on_enter: Some(flicker_enter),
            on_update: flicker_update,
        },
        // Index 4: Yellow after green
        PhaseDescriptor {
            id: PhaseId::Yellow2,
            name: "Yellow2",
            on_enter: Some(show_yellow),
            on_update: yellow2_update,
        },
    ]
}

// ── Entry actions ─────────────────────────────────────────────

fn show_red(ctx: &mut PhaseContext<'_>) {
    ctx.pattern = DisplayPattern::Red;
}

fn show_yellow(ctx: &mut PhaseContext<'_>) {
    ctx.pattern = DisplayPattern::Yellow;
}

fn show_green(ctx: &mut PhaseContext<'_>) {
    ctx.pattern = DisplayPattern::Green;
}

fn flicker_enter(ctx: &mut PhaseContext<'_>) {
    ctx.flicker_count = 0;
}

// ── Updates ───────────────────────────────────────────────────
//
// Solid phases re-assert their pattern every tick: after a mode is
// released the machine restarts in RED but the pattern still holds
// whatever the mode left behind.

fn hold(
    ctx: &mut PhaseContext<'_>,
    pattern: DisplayPattern,
    hold_ms: u32,
    next: PhaseId,
) -> Option<PhaseId> {
    ctx.pattern = pattern;
    (ctx.elapsed_ms >= hold_ms).then_some(next)
}

fn red_update(ctx: &mut PhaseContext<'_>) -> Option<PhaseId> {
    let hold_ms = ctx.durations.red_ms;
    hold(ctx, DisplayPattern::Red, hold_ms, PhaseId::Yellow1)
}

fn yellow1_update(ctx: &mut PhaseContext<'_>) -> Option<PhaseId> {
    let hold_ms = ctx.durations.yellow_ms;
    hold(ctx, DisplayPattern::Yellow, hold_ms, PhaseId::Green)
}

fn green_update(ctx: &mut PhaseContext<'_>) -> Option<PhaseId> {
    let hold_ms = ctx.durations.green_ms;
    hold(ctx, DisplayPattern::Green, hold_ms, PhaseId::FlickerGreen)
}

fn flicker_update(ctx: &mut PhaseContext<'_>) -> Option<PhaseId> {
    if ctx.elapsed_ms < ctx.durations.flicker_period_ms {
        return None;
    }
    ctx.restart_timer = true;
    ctx.pattern = if ctx.pattern == DisplayPattern::Green {
        DisplayPattern::Off
    } else {
        DisplayPattern::Green
    };
    ctx.flicker_count = ctx.flicker_count.saturating_add(1);
    (ctx.flicker_count >= FLICKER_TOGGLES).then_some(PhaseId::Yellow2)
}

fn yellow2_update(ctx: &mut PhaseContext<'_>) -> Option<PhaseId> {
    let hold_ms = ctx.durations.yellow_ms;
    hold(ctx, DisplayPattern::Yellow, hold_ms, PhaseId::Red)
}
