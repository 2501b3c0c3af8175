//! Ticker background task: the polling cadence that drives the timer core

use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Poll the sequencer at `state.tick_interval` and publish progress snapshots.
///
/// This stands in for a render loop: each tick is one "frame". Ticks that are
/// late are simply delayed, since remaining time is recomputed from absolute
/// instants on every poll.
pub async fn ticker_task(state: Arc<AppState>) {
    info!("Starting ticker task with {}ms cadence", state.tick_interval.as_millis());

    let mut interval = interval(state.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        match state.tick() {
            Ok(events) if !events.is_empty() => {
                debug!("Tick delivered phase events: {:?}", events);
            }
            Ok(_) => {}
            Err(e) => {
                error!("Ticker failed to poll the sequencer: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::{
        services::{IntervalConfig, IntervalStore},
        state::{PhaseEvent, TimerState},
    };

    #[tokio::test]
    async fn ticker_drives_sequence_to_completion() {
        let state = Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            Duration::from_millis(2),
            IntervalStore::in_memory(),
        ));
        let mut events = state.subscribe_events();
        state.apply_config(&IntervalConfig::new(20, 10, 2)).unwrap();
        state.start().unwrap();

        let handle = tokio::spawn(ticker_task(Arc::clone(&state)));

        let mut received = Vec::new();
        while received.last() != Some(&PhaseEvent::SequenceFinished) {
            let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
                .await
                .expect("sequence did not finish in time")
                .unwrap();
            if event.is_finish() {
                received.push(event);
            }
        }
        handle.abort();

        assert_eq!(
            received,
            vec![
                PhaseEvent::WorkFinished,
                PhaseEvent::RestFinished,
                PhaseEvent::WorkFinished,
                PhaseEvent::RestFinished,
                PhaseEvent::SequenceFinished,
            ]
        );
        assert_eq!(state.get_snapshot().unwrap().state, TimerState::Finished);
    }
}
