//! Phase sequencer: ordering of work/rest phases and transition notifications

use std::{sync::Arc, time::Instant};
use tracing::{debug, info};

use super::{
    clock::format_tenths, CountdownClock, ObserverId, ObserverRegistry, Phase, PhaseEvent,
    PhaseKind, PhaseObserver, PhaseQueue, ProgressSnapshot, TimerState,
};
use crate::error::TimerError;

/// Owns the phase queue and the current phase, and delegates timing to a
/// [`CountdownClock`] that is replaced for every phase.
///
/// The sequencer is driven by [`PhaseSequencer::poll`], called repeatedly at
/// the driver's render cadence. All mutation takes `&mut self`, so callers
/// serialize access and observers cannot re-enter a transition in progress.
#[derive(Debug, Default)]
pub struct PhaseSequencer {
    queue: PhaseQueue,
    current: Option<Phase>,
    clock: CountdownClock,
    observers: ObserverRegistry,
}

impl PhaseSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh phase sequence and leave it `Initialized`.
    ///
    /// Any in-flight phase and queue are discarded without notification. On
    /// error the sequencer is left untouched.
    pub fn configure(&mut self, work_ms: i64, rest_ms: i64, repetitions: i64) -> Result<(), TimerError> {
        let (work_ms, rest_ms, repetitions) = validate(work_ms, rest_ms, repetitions)?;

        let mut queue = PhaseQueue::generate(work_ms, rest_ms, repetitions);
        let first = queue.dequeue();
        self.clock = first
            .map(|phase| CountdownClock::with_duration(phase.duration_ms))
            .unwrap_or_default();
        self.current = first;
        self.queue = queue;

        info!(
            "Configured {} repetitions of {}ms work / {}ms rest",
            repetitions, work_ms, rest_ms
        );
        Ok(())
    }

    /// Start or resume the current phase.
    ///
    /// An elapse already noticed by a query is delivered first, so starting
    /// after the last phase ran out fails with `InvalidState`.
    pub fn start(&mut self, now: Instant) -> Result<(), TimerError> {
        let phase = self.settle(now)?;
        if self.clock.is_running() {
            return Ok(());
        }
        self.clock.start(now)?;
        self.observers.notify(PhaseEvent::started(phase.kind));
        Ok(())
    }

    /// Pause the current phase
    pub fn pause(&mut self, now: Instant) -> Result<(), TimerError> {
        let phase = self.settle(now)?;
        let was_running = self.clock.is_running();
        self.clock.pause(now)?;
        if was_running && self.clock.state() == TimerState::Paused {
            self.observers.notify(PhaseEvent::paused(phase.kind));
        }
        Ok(())
    }

    /// Drop the sequence and return to `Finished` without notifying anyone
    pub fn reset(&mut self) {
        self.queue = PhaseQueue::default();
        self.current = None;
        self.clock = CountdownClock::default();
    }

    /// Advance the sequence if the current phase has elapsed at `now`.
    ///
    /// Emits the finished notification for the completed phase, then either
    /// starts the next phase at `now` (followed by its started notification)
    /// or finishes the sequence. Returns the events delivered during this call.
    pub fn poll(&mut self, now: Instant) -> Vec<PhaseEvent> {
        let Some(completed) = self.current else {
            return Vec::new();
        };

        if self.clock.is_running() {
            self.clock.remaining(now);
        }
        if !self.clock.take_elapsed() {
            return Vec::new();
        }

        let mut events = vec![PhaseEvent::finished(completed.kind)];
        match self.queue.dequeue() {
            Some(next) => {
                debug!("{:?} phase finished, starting {:?} for {}ms", completed.kind, next.kind, next.duration_ms);
                self.clock = CountdownClock::started(next.duration_ms, now);
                self.current = Some(next);
                events.push(PhaseEvent::started(next.kind));
            }
            None => {
                debug!("{:?} phase finished, sequence complete", completed.kind);
                self.current = None;
                self.clock = CountdownClock::default();
                events.push(PhaseEvent::SequenceFinished);
            }
        }

        for event in &events {
            self.observers.notify(*event);
        }
        events
    }

    pub fn add_observer(&mut self, observer: Arc<dyn PhaseObserver>) -> ObserverId {
        self.observers.add(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }

    /// `Finished` only once the whole sequence is done. A phase whose elapse
    /// was noticed by a query but not yet polled still reports `Running`.
    pub fn state(&self) -> TimerState {
        match (self.current, self.clock.state()) {
            (None, _) => TimerState::Finished,
            (Some(_), TimerState::Finished) => TimerState::Running,
            (Some(_), state) => state,
        }
    }

    /// Remaining time of the current phase; also performs the elapse check
    pub fn remaining(&mut self, now: Instant) -> u64 {
        self.clock.remaining(now)
    }

    /// Configured duration of the current phase, 0 when finished
    pub fn total(&self) -> u64 {
        self.current.map(|phase| phase.duration_ms).unwrap_or(0)
    }

    pub fn current_phase_kind(&self) -> Option<PhaseKind> {
        self.current.map(|phase| phase.kind)
    }

    /// Phases still queued after the current one
    pub fn phases_left(&self) -> u64 {
        self.queue.len()
    }

    pub fn snapshot(&mut self, now: Instant) -> ProgressSnapshot {
        let remaining_ms = self.clock.remaining(now);
        let total_ms = self.total();
        let fraction = if total_ms == 0 {
            0.0
        } else {
            remaining_ms as f64 / total_ms as f64
        };

        ProgressSnapshot {
            state: self.state(),
            phase: self.current_phase_kind(),
            total_ms,
            remaining_ms,
            fraction,
            label: format_tenths(remaining_ms),
            phases_left: self.phases_left(),
        }
    }

    /// Deliver any pending elapse at `now` and return the phase left current
    fn settle(&mut self, now: Instant) -> Result<Phase, TimerError> {
        if self.current.is_none() {
            return Err(TimerError::InvalidState("no phase initialized"));
        }
        self.poll(now);
        self.current.ok_or(TimerError::InvalidState("sequence finished"))
    }
}

/// Check a raw configuration and convert it to unsigned values
pub fn validate(work_ms: i64, rest_ms: i64, repetitions: i64) -> Result<(u64, u64, u32), TimerError> {
    let work_ms = u64::try_from(work_ms)
        .map_err(|_| TimerError::InvalidConfiguration(format!("work duration {}ms is negative", work_ms)))?;
    let rest_ms = u64::try_from(rest_ms)
        .map_err(|_| TimerError::InvalidConfiguration(format!("rest duration {}ms is negative", rest_ms)))?;
    if repetitions < 1 {
        return Err(TimerError::InvalidConfiguration(format!(
            "repetitions must be at least 1, got {}",
            repetitions
        )));
    }
    let repetitions = u32::try_from(repetitions)
        .map_err(|_| TimerError::InvalidConfiguration(format!("{} repetitions is too many", repetitions)))?;
    Ok((work_ms, rest_ms, repetitions))
}
