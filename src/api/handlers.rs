//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    error::{AppError, TimerError},
    services::IntervalConfig,
    state::{AppState, ProgressSnapshot},
};
use super::responses::{ApiResponse, HealthResponse, IntervalRequest, StatusResponse};

type HandlerResult<T> = Result<Json<T>, (StatusCode, Json<ApiResponse>)>;

/// Map a failed operation to a status code and an error body
fn reject(action: &str, err: AppError) -> (StatusCode, Json<ApiResponse>) {
    let status = match &err {
        AppError::Timer(TimerError::InvalidState(_)) => StatusCode::CONFLICT,
        AppError::Timer(TimerError::InvalidConfiguration(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Store(_) | AppError::Poisoned(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("Failed to {}: {}", action, err);
    } else {
        warn!("Rejected {}: {}", action, err);
    }
    (status, Json(ApiResponse::error(err.to_string())))
}

fn respond(action: &str, message: &str, result: Result<ProgressSnapshot, AppError>) -> HandlerResult<ApiResponse> {
    match result {
        Ok(progress) => {
            info!("{} endpoint called - {}", action, message);
            Ok(Json(ApiResponse::ok(message.to_string(), progress)))
        }
        Err(e) => Err(reject(action, e)),
    }
}

/// Handle POST /intervals - Save a configuration and load it
pub async fn save_interval_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IntervalRequest>,
) -> HandlerResult<ApiResponse> {
    respond(
        "intervals",
        "Interval configuration saved",
        state.save_config(IntervalConfig::from(request)),
    )
}

/// Handle GET /intervals/latest - Return the most recent configuration
pub async fn latest_interval_handler(State(state): State<Arc<AppState>>) -> HandlerResult<IntervalConfig> {
    state
        .store
        .latest()
        .map(Json)
        .map_err(|e| reject("load latest interval", AppError::from(e)))
}

/// Handle POST /configure - Restart from the latest saved configuration
pub async fn configure_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    respond("configure", "Sequence configured", state.reconfigure())
}

/// Handle POST /start - Start or resume the current phase
pub async fn start_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    respond("start", "Timer running", state.start())
}

/// Handle POST /pause - Pause the current phase
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    respond("pause", "Timer paused", state.pause())
}

/// Handle POST /reset - Drop the current sequence
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    respond("reset", "Sequence cleared", state.reset())
}

/// Handle GET /status - Return current progress and event history
pub async fn status_handler(State(state): State<Arc<AppState>>) -> HandlerResult<StatusResponse> {
    let progress = state.get_snapshot().map_err(|e| reject("read progress", e))?;
    let events = state.get_event_log().map_err(|e| reject("read event log", e))?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        progress,
        events,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
