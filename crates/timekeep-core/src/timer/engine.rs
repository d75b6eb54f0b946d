//! Countdown state machine.
//!
//! The machine has no clock of its own: every call to [`Countdown::step`]
//! is one elapsed second. [`super::CountdownSession`] drives it from a timer.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Focusing -> OnBreak -> Finished
//!            |           |
//!            +-----------+--> Cancelled
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut countdown = Countdown::new();
//! countdown.start(Preset::Short.into())?; // Focusing / 1500
//! countdown.step();                        // Focusing / 1499
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::preset::Durations;
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Focusing,
    OnBreak,
    Finished,
    Cancelled,
}

impl Phase {
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::Focusing | Phase::OnBreak)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Finished | Phase::Cancelled)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Idle => "idle",
            Phase::Focusing => "focusing",
            Phase::OnBreak => "on break",
            Phase::Finished => "finished",
            Phase::Cancelled => "cancelled",
        })
    }
}

/// One `(phase, remaining)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub phase: Phase,
    pub remaining_secs: u64,
}

impl Tick {
    pub fn new(phase: Phase, remaining_secs: u64) -> Self {
        Self {
            phase,
            remaining_secs,
        }
    }

    /// `"M min S sec"`.
    pub fn format_remaining(&self) -> String {
        format!(
            "{} min {} sec",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }
}

/// Core countdown state machine.
#[derive(Debug, Clone)]
pub struct Countdown {
    phase: Phase,
    durations: Option<Durations>,
    remaining_secs: u64,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            durations: None,
            remaining_secs: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn durations(&self) -> Option<Durations> {
        self.durations
    }

    /// Length of the current phase, 0 outside an active phase.
    pub fn phase_total_secs(&self) -> u64 {
        match (self.phase, self.durations) {
            (Phase::Focusing, Some(d)) => d.focus_secs(),
            (Phase::OnBreak, Some(d)) => d.break_secs(),
            _ => 0,
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        let total = self.phase_total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    pub fn current(&self) -> Tick {
        Tick::new(self.phase, self.remaining_secs)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Enter `Focusing` and return the opening tick.
    ///
    /// # Errors
    /// `SessionActive` unless the machine is `Idle`.
    pub fn start(&mut self, durations: Durations) -> Result<Tick> {
        if self.phase != Phase::Idle {
            return Err(CoreError::SessionActive);
        }
        self.durations = Some(durations);
        self.phase = Phase::Focusing;
        self.remaining_secs = durations.focus_secs();
        Ok(self.current())
    }

    /// Advance one second. Returns the next tick, or `None` once terminal.
    ///
    /// A phase reports `0` before the following step moves on, so the final
    /// step yields `Finished / 0` exactly once.
    pub fn step(&mut self) -> Option<Tick> {
        let durations = self.durations?;
        match self.phase {
            Phase::Focusing | Phase::OnBreak if self.remaining_secs > 0 => {
                self.remaining_secs -= 1;
            }
            Phase::Focusing => {
                self.phase = Phase::OnBreak;
                self.remaining_secs = durations.break_secs();
            }
            Phase::OnBreak => {
                self.phase = Phase::Finished;
            }
            Phase::Idle | Phase::Finished | Phase::Cancelled => return None,
        }
        Some(self.current())
    }

    /// Stop an active countdown. Returns whether anything changed; idle and
    /// terminal machines are left as they are.
    pub fn cancel(&mut self) -> bool {
        if !self.phase.is_active() {
            return false;
        }
        self.phase = Phase::Cancelled;
        true
    }
}
