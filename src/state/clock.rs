//! Single-phase countdown clock with pause/resume

use std::time::{Duration, Instant};
use tracing::debug;

use super::TimerState;
use crate::error::TimerError;

/// Wall-clock countdown for exactly one phase.
///
/// The clock never reads the system time itself: every time-dependent call
/// takes the caller's `now`. Remaining time is always recomputed from the
/// running anchor, so irregular or missed polls cause no drift.
///
/// Elapse is detected lazily: the first [`CountdownClock::remaining`] call that
/// observes zero while running moves the clock to `Finished` and latches an
/// elapsed event, which the owner collects with [`CountdownClock::take_elapsed`].
#[derive(Debug, Clone, Default)]
pub struct CountdownClock {
    state: TimerState,
    duration_ms: u64,
    /// Frozen value while paused, initial value while initialized
    remaining_ms: u64,
    /// Instant of the most recent start/resume
    running_anchor: Option<Instant>,
    /// Time already counted down before `running_anchor`
    elapsed_baseline_ms: u64,
    elapsed_pending: bool,
}

impl CountdownClock {
    /// Create a clock already initialized with `duration_ms`
    pub fn with_duration(duration_ms: u64) -> Self {
        let mut clock = Self::default();
        clock.init(duration_ms);
        clock
    }

    /// Create a clock that is already running from `now`
    pub fn started(duration_ms: u64, now: Instant) -> Self {
        Self {
            state: TimerState::Running,
            duration_ms,
            remaining_ms: duration_ms,
            running_anchor: Some(now),
            elapsed_baseline_ms: 0,
            elapsed_pending: false,
        }
    }

    /// Reset to a fresh countdown of `duration_ms`. Valid from any state.
    pub fn init(&mut self, duration_ms: u64) {
        *self = Self {
            state: TimerState::Initialized,
            duration_ms,
            remaining_ms: duration_ms,
            running_anchor: None,
            elapsed_baseline_ms: 0,
            elapsed_pending: false,
        };
    }

    /// Start or resume the countdown.
    ///
    /// Resuming moves the effective start instant back by the time already
    /// counted down, so the remaining time continues where the pause froze it.
    pub fn start(&mut self, now: Instant) -> Result<(), TimerError> {
        match self.state {
            TimerState::Finished => Err(TimerError::InvalidState("clock already finished")),
            TimerState::Running => Ok(()),
            TimerState::Initialized | TimerState::Paused => {
                self.elapsed_baseline_ms = self.duration_ms - self.remaining_ms;
                self.running_anchor = Some(now);
                self.state = TimerState::Running;
                Ok(())
            }
        }
    }

    /// Freeze the countdown.
    ///
    /// A clock that has not started yet, or is already paused, is left as is.
    /// If the phase has already run out at `now` the clock finishes instead.
    pub fn pause(&mut self, now: Instant) -> Result<(), TimerError> {
        match self.state {
            TimerState::Finished => Err(TimerError::InvalidState("clock already finished")),
            TimerState::Initialized | TimerState::Paused => Ok(()),
            TimerState::Running => {
                let remaining = self.remaining(now);
                if self.state == TimerState::Running {
                    self.remaining_ms = remaining;
                    self.elapsed_baseline_ms = self.duration_ms - remaining;
                    self.running_anchor = None;
                    self.state = TimerState::Paused;
                }
                Ok(())
            }
        }
    }

    /// Remaining milliseconds at `now`.
    ///
    /// While running this is also the elapse check: reaching zero finishes the
    /// clock and latches the elapsed event. Later calls keep returning 0.
    pub fn remaining(&mut self, now: Instant) -> u64 {
        match self.state {
            TimerState::Finished => 0,
            TimerState::Initialized | TimerState::Paused => self.remaining_ms,
            TimerState::Running => {
                let remaining = self.duration_ms.saturating_sub(self.counted_down_ms(now));
                if remaining == 0 {
                    self.finish();
                }
                remaining
            }
        }
    }

    /// Consume the latched elapsed event, true at most once per elapse
    pub fn take_elapsed(&mut self) -> bool {
        std::mem::take(&mut self.elapsed_pending)
    }

    /// Remaining fraction of the phase in `[0, 1]`; zero-length phases report 0
    pub fn fraction(&mut self, now: Instant) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.remaining(now) as f64 / self.duration_ms as f64
    }

    /// Remaining seconds with one decimal, truncated to tenths ("2.0", "0.2")
    pub fn label(&mut self, now: Instant) -> String {
        format_tenths(self.remaining(now))
    }

    /// Configured duration of the phase
    pub fn total(&self) -> u64 {
        self.duration_ms
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    fn counted_down_ms(&self, now: Instant) -> u64 {
        let since_anchor = self
            .running_anchor
            .map(|anchor| whole_millis(now.saturating_duration_since(anchor)))
            .unwrap_or(0);
        self.elapsed_baseline_ms.saturating_add(since_anchor)
    }

    fn finish(&mut self) {
        debug!("Countdown of {}ms elapsed", self.duration_ms);
        self.state = TimerState::Finished;
        self.remaining_ms = 0;
        self.running_anchor = None;
        self.elapsed_baseline_ms = self.duration_ms;
        self.elapsed_pending = true;
    }
}

/// Milliseconds in `d`, saturating at `u64::MAX`
fn whole_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Format milliseconds as seconds truncated to one decimal
pub fn format_tenths(ms: u64) -> String {
    format!("{:.1}", (ms / 100) as f64 / 10.0)
}
