//! Render-facing progress snapshot

use serde::{Deserialize, Serialize};

use super::{PhaseKind, TimerState};

/// Point-in-time view of the running sequence for progress rendering.
///
/// Built from the sequencer's query surface; consumers only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub state: TimerState,
    pub phase: Option<PhaseKind>,
    pub total_ms: u64,
    pub remaining_ms: u64,
    /// Remaining share of the current phase, 1.0 at the start
    pub fraction: f64,
    /// Remaining seconds, one decimal
    pub label: String,
    /// Phases still queued after the current one
    pub phases_left: u64,
}

impl ProgressSnapshot {
    /// Snapshot of a sequencer with nothing configured
    pub fn idle() -> Self {
        Self {
            state: TimerState::Finished,
            phase: None,
            total_ms: 0,
            remaining_ms: 0,
            fraction: 0.0,
            label: "0.0".to_string(),
            phases_left: 0,
        }
    }
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}
