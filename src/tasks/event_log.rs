//! Event log background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Consume phase events from the broadcast channel and keep the event log current
pub async fn event_log_task(state: Arc<AppState>) {
    info!("Starting event log task");

    let mut events_rx = state.subscribe_events();

    loop {
        match events_rx.recv().await {
            Ok(event) => {
                debug!("Event log received {:?}", event);
                if let Err(e) = state.record_event(event) {
                    warn!("Failed to record phase event: {}", e);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Event log lagged, skipped {} phase events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Phase event channel closed, stopping event log task");
                break;
            }
        }
    }
}
