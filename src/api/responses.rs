//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    services::IntervalConfig,
    state::{EventLog, ProgressSnapshot},
};

/// Body of `POST /intervals`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalRequest {
    pub work_ms: i64,
    pub rest_ms: i64,
    pub repetitions: i64,
}

impl From<IntervalRequest> for IntervalConfig {
    fn from(request: IntervalRequest) -> Self {
        IntervalConfig::new(request.work_ms, request.rest_ms, request.repetitions)
    }
}

/// API response structure for control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub progress: Option<ProgressSnapshot>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, progress: Option<ProgressSnapshot>) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            progress,
        }
    }

    /// Create a success response carrying the resulting progress
    pub fn ok(message: String, progress: ProgressSnapshot) -> Self {
        Self::new("ok".to_string(), message, Some(progress))
    }

    /// Create an error response
    pub fn error(message: String) -> Self {
        Self::new("error".to_string(), message, None)
    }
}

/// Status response with the current progress and transition history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub progress: ProgressSnapshot,
    pub events: EventLog,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
