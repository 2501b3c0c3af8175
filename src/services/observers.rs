//! Observers that forward phase transitions out of the timer core

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::state::{PhaseEvent, PhaseObserver};

/// Logs every phase transition
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PhaseObserver for TracingObserver {
    fn on_work_started(&self) {
        info!("Work phase started");
    }

    fn on_work_paused(&self) {
        info!("Work phase paused");
    }

    fn on_rest_started(&self) {
        info!("Rest phase started");
    }

    fn on_rest_paused(&self) {
        info!("Rest phase paused");
    }

    fn on_work_finished(&self) {
        info!("Work phase finished");
    }

    fn on_rest_finished(&self) {
        info!("Rest phase finished");
    }

    fn on_sequence_finished(&self) {
        info!("Interval sequence finished");
    }
}

/// Publishes phase transitions on a broadcast channel.
///
/// This is where playback and UI collaborators subscribe; sending never
/// blocks the polling thread.
#[derive(Debug)]
pub struct BroadcastObserver {
    tx: broadcast::Sender<PhaseEvent>,
}

impl BroadcastObserver {
    pub fn new(tx: broadcast::Sender<PhaseEvent>) -> Self {
        Self { tx }
    }

    fn publish(&self, event: PhaseEvent) {
        // No subscribers is not an error
        if self.tx.send(event).is_err() {
            debug!("No subscribers for phase event {:?}", event);
        }
    }
}

impl PhaseObserver for BroadcastObserver {
    fn on_work_started(&self) {
        self.publish(PhaseEvent::WorkStarted);
    }

    fn on_work_paused(&self) {
        self.publish(PhaseEvent::WorkPaused);
    }

    fn on_rest_started(&self) {
        self.publish(PhaseEvent::RestStarted);
    }

    fn on_rest_paused(&self) {
        self.publish(PhaseEvent::RestPaused);
    }

    fn on_work_finished(&self) {
        self.publish(PhaseEvent::WorkFinished);
    }

    fn on_rest_finished(&self) {
        self.publish(PhaseEvent::RestFinished);
    }

    fn on_sequence_finished(&self) {
        self.publish(PhaseEvent::SequenceFinished);
    }
}
