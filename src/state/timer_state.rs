//! Timer state and phase value types

use serde::{Deserialize, Serialize};

/// Lifecycle state shared by the countdown clock and the phase sequencer.
///
/// `Finished` is both the initial state (nothing configured yet) and the
/// terminal state (last phase elapsed or explicit reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    #[default]
    Finished,
    Initialized,
    Running,
    Paused,
}

impl TimerState {
    pub fn is_finished(&self) -> bool {
        *self == TimerState::Finished
    }
}

/// Kind of a phase in an interval sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Work,
    Rest,
}

/// One work or rest segment with a fixed duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub kind: PhaseKind,
    pub duration_ms: u64,
}

impl Phase {
    pub fn work(duration_ms: u64) -> Self {
        Self { kind: PhaseKind::Work, duration_ms }
    }

    pub fn rest(duration_ms: u64) -> Self {
        Self { kind: PhaseKind::Rest, duration_ms }
    }
}
