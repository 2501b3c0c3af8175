//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use super::{PhaseEvent, PhaseSequencer, ProgressSnapshot};
use crate::{
    error::{AppError, TimerError},
    services::{BroadcastObserver, IntervalConfig, IntervalStore, TracingObserver},
};

/// Running tally of phase transitions seen on the event channel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    pub last_event: Option<PhaseEvent>,
    pub last_event_time: Option<DateTime<Utc>>,
    pub phases_completed: u64,
    pub sequences_completed: u64,
}

impl EventLog {
    pub fn record(&mut self, event: PhaseEvent) {
        match event {
            PhaseEvent::WorkFinished | PhaseEvent::RestFinished => self.phases_completed += 1,
            PhaseEvent::SequenceFinished => self.sequences_completed += 1,
            PhaseEvent::WorkStarted
            | PhaseEvent::WorkPaused
            | PhaseEvent::RestStarted
            | PhaseEvent::RestPaused => {}
        }
        self.last_event = Some(event);
        self.last_event_time = Some(Utc::now());
    }
}

/// Application state shared by the ticker task and the HTTP handlers.
///
/// The sequencer lives behind a single lock, so every poll, start, pause and
/// configure runs on one logical timeline.
#[derive(Debug)]
pub struct AppState {
    /// The interval-timer core
    pub sequencer: Arc<Mutex<PhaseSequencer>>,
    /// Saved interval configurations
    pub store: IntervalStore,
    /// Poll cadence of the ticker task
    pub tick_interval: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Phase transitions published by the core
    pub event_tx: broadcast::Sender<PhaseEvent>,
    pub event_log: Arc<Mutex<EventLog>>,
    /// Latest progress snapshot for render consumers
    pub snapshot_tx: watch::Sender<ProgressSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<ProgressSnapshot>,
}

impl AppState {
    /// Create the state with an unconfigured sequencer wired to the default observers
    pub fn new(port: u16, host: String, tick_interval: Duration, store: IntervalStore) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let (snapshot_tx, snapshot_rx) = watch::channel(ProgressSnapshot::idle());

        let mut sequencer = PhaseSequencer::new();
        sequencer.add_observer(Arc::new(TracingObserver));
        sequencer.add_observer(Arc::new(BroadcastObserver::new(event_tx.clone())));

        Self {
            sequencer: Arc::new(Mutex::new(sequencer)),
            store,
            tick_interval,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            event_tx,
            event_log: Arc::new(Mutex::new(EventLog::default())),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Configure the sequencer from a record without storing it
    pub fn apply_config(&self, config: &IntervalConfig) -> Result<ProgressSnapshot, AppError> {
        self.with_sequencer("configure", |sequencer, _| {
            sequencer.configure(config.work_ms, config.rest_ms, config.repetitions)
        })
    }

    /// Validate and store a new configuration, then configure the sequencer with it
    pub fn save_config(&self, config: IntervalConfig) -> Result<ProgressSnapshot, AppError> {
        config.validate()?;
        self.store.upsert(config.clone())?;
        info!(
            "Saved interval configuration: work={}ms rest={}ms repetitions={}",
            config.work_ms, config.rest_ms, config.repetitions
        );
        self.apply_config(&config)
    }

    /// Restart from the most recently saved configuration
    pub fn reconfigure(&self) -> Result<ProgressSnapshot, AppError> {
        let config = self.store.latest()?;
        self.apply_config(&config)
    }

    /// Start or resume the current phase
    pub fn start(&self) -> Result<ProgressSnapshot, AppError> {
        self.with_sequencer("start", |sequencer, now| sequencer.start(now))
    }

    /// Pause the current phase
    pub fn pause(&self) -> Result<ProgressSnapshot, AppError> {
        self.with_sequencer("pause", |sequencer, now| sequencer.pause(now))
    }

    /// Drop the current sequence
    pub fn reset(&self) -> Result<ProgressSnapshot, AppError> {
        self.with_sequencer("reset", |sequencer, _| {
            sequencer.reset();
            Ok(())
        })
    }

    /// Poll the sequencer once and publish the resulting snapshot
    pub fn tick(&self) -> Result<Vec<PhaseEvent>, AppError> {
        let now = Instant::now();
        let (events, snapshot) = {
            let mut sequencer = self.lock_sequencer()?;
            let events = sequencer.poll(now);
            (events, sequencer.snapshot(now))
        };
        self.publish_snapshot(snapshot);
        Ok(events)
    }

    /// Current progress computed at the time of the call
    pub fn get_snapshot(&self) -> Result<ProgressSnapshot, AppError> {
        Ok(self.lock_sequencer()?.snapshot(Instant::now()))
    }

    /// Subscribe to phase transitions
    pub fn subscribe_events(&self) -> broadcast::Receiver<PhaseEvent> {
        self.event_tx.subscribe()
    }

    pub fn record_event(&self, event: PhaseEvent) -> Result<(), AppError> {
        let mut log = self.event_log.lock().map_err(|_| AppError::Poisoned("event log"))?;
        log.record(event);
        Ok(())
    }

    pub fn get_event_log(&self) -> Result<EventLog, AppError> {
        self.event_log
            .lock()
            .map(|log| log.clone())
            .map_err(|_| AppError::Poisoned("event log"))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Run a control operation on the sequencer, then record and publish the outcome
    fn with_sequencer<F>(&self, action: &str, op: F) -> Result<ProgressSnapshot, AppError>
    where
        F: FnOnce(&mut PhaseSequencer, Instant) -> Result<(), TimerError>,
    {
        let now = Instant::now();
        let snapshot = {
            let mut sequencer = self.lock_sequencer()?;
            op(&mut *sequencer, now)?;
            sequencer.snapshot(now)
        };

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.publish_snapshot(snapshot.clone());
        Ok(snapshot)
    }

    fn lock_sequencer(&self) -> Result<MutexGuard<'_, PhaseSequencer>, AppError> {
        self.sequencer.lock().map_err(|_| AppError::Poisoned("sequencer"))
    }

    fn publish_snapshot(&self, snapshot: ProgressSnapshot) {
        if let Err(e) = self.snapshot_tx.send(snapshot) {
            warn!("Failed to publish progress snapshot: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{PhaseKind, TimerState};

    fn test_state() -> AppState {
        AppState::new(0, "127.0.0.1".to_string(), Duration::from_millis(5), IntervalStore::in_memory())
    }

    #[test]
    fn start_before_configure_is_invalid_state() {
        let state = test_state();
        assert!(matches!(state.start(), Err(AppError::Timer(TimerError::InvalidState(_)))));
        assert!(matches!(state.pause(), Err(AppError::Timer(TimerError::InvalidState(_)))));
        assert_eq!(state.get_last_action().0, None);
    }

    #[test]
    fn save_config_stores_and_configures() {
        let state = test_state();
        let snapshot = state.save_config(IntervalConfig::new(30_000, 10_000, 3)).unwrap();

        assert_eq!(snapshot.state, TimerState::Initialized);
        assert_eq!(snapshot.phase, Some(PhaseKind::Work));
        assert_eq!(snapshot.total_ms, 30_000);
        assert_eq!(state.store.latest().unwrap().repetitions, 3);
        assert_eq!(state.get_last_action().0.as_deref(), Some("configure"));
        assert_eq!(state.snapshot_tx.borrow().total_ms, 30_000);
    }

    #[test]
    fn invalid_config_is_not_stored() {
        let state = test_state();
        let result = state.save_config(IntervalConfig::new(1000, 1000, 0));
        assert!(matches!(result, Err(AppError::Timer(TimerError::InvalidConfiguration(_)))));
        assert!(state.store.is_empty());
    }

    #[test]
    fn reconfigure_uses_default_when_store_is_empty() {
        let state = test_state();
        let snapshot = state.reconfigure().unwrap();
        assert_eq!(snapshot.state, TimerState::Initialized);
        assert_eq!(snapshot.total_ms, 0);
        assert_eq!(snapshot.phases_left, 1);
    }

    #[test]
    fn tick_publishes_events_on_the_channel() {
        let state = test_state();
        let mut events = state.subscribe_events();
        state.apply_config(&IntervalConfig::new(0, 0, 1)).unwrap();
        state.start().unwrap();

        assert_eq!(
            state.tick().unwrap(),
            vec![PhaseEvent::WorkFinished, PhaseEvent::RestStarted]
        );
        assert_eq!(
            state.tick().unwrap(),
            vec![PhaseEvent::RestFinished, PhaseEvent::SequenceFinished]
        );
        assert!(state.tick().unwrap().is_empty());

        assert_eq!(events.try_recv().unwrap(), PhaseEvent::WorkStarted);
        assert_eq!(events.try_recv().unwrap(), PhaseEvent::WorkFinished);
        assert_eq!(events.try_recv().unwrap(), PhaseEvent::RestStarted);
        assert_eq!(events.try_recv().unwrap(), PhaseEvent::RestFinished);
        assert_eq!(events.try_recv().unwrap(), PhaseEvent::SequenceFinished);
        assert_eq!(state.get_snapshot().unwrap().state, TimerState::Finished);
    }

    #[test]
    fn pause_publishes_paused_event() {
        let state = test_state();
        let mut events = state.subscribe_events();
        state.apply_config(&IntervalConfig::new(60_000, 1000, 1)).unwrap();
        state.start().unwrap();
        let snapshot = state.pause().unwrap();

        assert_eq!(snapshot.state, TimerState::Paused);
        assert_eq!(events.try_recv().unwrap(), PhaseEvent::WorkStarted);
        assert_eq!(events.try_recv().unwrap(), PhaseEvent::WorkPaused);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn event_log_counts_transitions() {
        let mut log = EventLog::default();
        log.record(PhaseEvent::WorkStarted);
        assert_eq!(log.phases_completed, 0);
        log.record(PhaseEvent::WorkFinished);
        log.record(PhaseEvent::RestFinished);
        log.record(PhaseEvent::SequenceFinished);
        assert_eq!(log.phases_completed, 2);
        assert_eq!(log.sequences_completed, 1);
        assert_eq!(log.last_event, Some(PhaseEvent::SequenceFinished));
        assert!(log.last_event_time.is_some());
    }
}
