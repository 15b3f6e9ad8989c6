//! Cooperative periodic task scheduler.
//!
//! A fixed table of (task, period, last run) entries evaluated once per
//! main-loop pass.  Due tasks are handed to a [`SchedulerDelegate`] and run
//! to completion one after another, in table order; nothing is preempted.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Task table                                                  │
//! │  ┌────────────────┬──────────┬──────────────┐                │
//! │  │ TaskId         │ period   │ last_run_ms  │                │
//! │  ├────────────────┼──────────┼──────────────┤                │
//! │  │ StateMachine   │   10 ms  │ …            │                │
//! │  │ Telemetry      │  100 ms  │ …            │                │
//! │  │ CommandIntake  │  500 ms  │ …            │                │
//! │  └────────────────┴──────────┴──────────────┘                │
//! │                          │ due?                              │
//! │                          ▼                                   │
//! │               SchedulerDelegate::on_task_due                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use heapless::Vec;
use log::{debug, info, warn};

use crate::app::ports::SchedulerDelegate;

// ═══════════════════════════════════════════════════════════════
//  Task identity
// ═══════════════════════════════════════════════════════════════

/// The periodic background tasks of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskId {
    /// Traffic-light state-machine tick.
    StateMachine,
    /// Status line emission.
    Telemetry,
    /// Command line intake.
    CommandIntake,
}

impl TaskId {
    pub const fn label(self) -> &'static str {
        match self {
            Self::StateMachine => "state-machine",
            Self::Telemetry => "telemetry",
            Self::CommandIntake => "command-intake",
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Maximum number of tasks (stack-allocated).
const MAX_TASKS: usize = 4;

#[derive(Debug, Clone)]
struct Task {
    id: TaskId,
    period_ms: u32,
    /// `None` until the first run, so a new task is due immediately.
    last_run_ms: Option<u32>,
    enabled: bool,
}

impl Task {
    fn is_due(&self, now_ms: u32) -> bool {
        self.enabled
            && self
                .last_run_ms
                .is_none_or(|last| now_ms.wrapping_sub(last) >= self.period_ms)
    }
}

/// The scheduler engine.
///
/// Decoupled from what the tasks do: when a task is due it invokes the
/// [`SchedulerDelegate`] callback, which makes the timing logic testable
/// on its own.
pub struct Scheduler {
    tasks: Vec<Task, MAX_TASKS>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Register `id` to run every `period_ms`.  Returns the slot index, or
    /// `None` if the table is full or the task is already registered.
    pub fn add(&mut self, id: TaskId, period_ms: u32) -> Option<usize> {
        if self.tasks.iter().any(|t| t.id == id) {
            warn!("Scheduler: '{}' already registered", id.label());
            return None;
        }
        let task = Task {
            id,
            period_ms,
            last_run_ms: None,
            enabled: true,
        };
        if self.tasks.push(task).is_err() {
            warn!("Scheduler: table full, '{}' not added", id.label());
            return None;
        }
        let slot = self.tasks.len() - 1;
        info!(
            "Scheduler: added '{}' every {}ms at slot {}",
            id.label(),
            period_ms,
            slot
        );
        Some(slot)
    }

    /// Enable or disable one task.  A re-enabled task keeps its last-run
    /// stamp.  Returns `false` if `id` is not registered.
    pub fn set_enabled(&mut self, id: TaskId, enabled: bool) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Run every due task once, in table order.  Returns how many ran.
    pub fn execute(&mut self, now_ms: u32, delegate: &mut dyn SchedulerDelegate) -> usize {
        let mut ran = 0;
        for task in self.tasks.iter_mut() {
            if !task.is_due(now_ms) {
                continue;
            }
            debug!("Scheduler: '{}' due at {}ms", task.id.label(), now_ms);
            task.last_run_ms = Some(now_ms);
            delegate.on_task_due(task.id, now_ms);
            ran += 1;
        }
        ran
    }

    pub fn period_of(&self, id: TaskId) -> Option<u32> {
        self.tasks.iter().find(|t| t.id == id).map(|t| t.period_ms)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
