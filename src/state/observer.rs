//! Phase-transition observer contract and registry

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::PhaseKind;

/// Receiver of phase-transition notifications.
///
/// The finished callbacks fire exactly once per completed phase or sequence.
/// The started callbacks fire whenever a phase begins running, on first start,
/// on resume, and on the seamless hand-over from the previous phase. The paused
/// callbacks fire when a running phase is frozen.
///
/// Callbacks run synchronously on the thread that polls the sequencer. They
/// cannot call back into the sequencer that notifies them (it is mutably
/// borrowed for the whole notification round), and a panicking observer is
/// not caught.
pub trait PhaseObserver: Send + Sync {
    fn on_work_started(&self) {}
    fn on_work_paused(&self) {}
    fn on_work_finished(&self) {}
    fn on_rest_started(&self) {}
    fn on_rest_paused(&self) {}
    fn on_rest_finished(&self) {}
    fn on_sequence_finished(&self) {}
}

/// A single notification emitted by the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseEvent {
    WorkStarted,
    WorkPaused,
    WorkFinished,
    RestStarted,
    RestPaused,
    RestFinished,
    SequenceFinished,
}

impl PhaseEvent {
    /// The event for a phase that begins running
    pub fn started(kind: PhaseKind) -> Self {
        match kind {
            PhaseKind::Work => PhaseEvent::WorkStarted,
            PhaseKind::Rest => PhaseEvent::RestStarted,
        }
    }

    /// The event for a running phase that is frozen
    pub fn paused(kind: PhaseKind) -> Self {
        match kind {
            PhaseKind::Work => PhaseEvent::WorkPaused,
            PhaseKind::Rest => PhaseEvent::RestPaused,
        }
    }

    /// The "phase finished" event for a completed phase
    pub fn finished(kind: PhaseKind) -> Self {
        match kind {
            PhaseKind::Work => PhaseEvent::WorkFinished,
            PhaseKind::Rest => PhaseEvent::RestFinished,
        }
    }

    /// True for the three completion events
    pub fn is_finish(&self) -> bool {
        matches!(
            self,
            PhaseEvent::WorkFinished | PhaseEvent::RestFinished | PhaseEvent::SequenceFinished
        )
    }

    fn deliver(self, observer: &dyn PhaseObserver) {
        match self {
            PhaseEvent::WorkStarted => observer.on_work_started(),
            PhaseEvent::WorkPaused => observer.on_work_paused(),
            PhaseEvent::WorkFinished => observer.on_work_finished(),
            PhaseEvent::RestStarted => observer.on_rest_started(),
            PhaseEvent::RestPaused => observer.on_rest_paused(),
            PhaseEvent::RestFinished => observer.on_rest_finished(),
            PhaseEvent::SequenceFinished => observer.on_sequence_finished(),
        }
    }
}

/// Handle returned on registration, used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Observers in registration order.
///
/// Each notification round iterates over a snapshot taken when the round
/// begins, so registry changes never affect a round in progress.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<(ObserverId, Arc<dyn PhaseObserver>)>,
    next_id: u64,
}

impl ObserverRegistry {
    pub fn add(&mut self, observer: Arc<dyn PhaseObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns false if `id` was not registered
    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver `event` to every registered observer
    pub fn notify(&self, event: PhaseEvent) {
        let round: Vec<Arc<dyn PhaseObserver>> =
            self.observers.iter().map(|(_, o)| Arc::clone(o)).collect();
        for observer in round {
            event.deliver(observer.as_ref());
        }
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
