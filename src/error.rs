//! Error types for the interval timer

use thiserror::Error;

/// Errors raised by the interval-timer core.
///
/// Both variants indicate a caller bug: they are reported synchronously by the
/// call that caused them and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// `start`/`pause` on a finished or never-configured timer
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Negative durations or fewer than one repetition
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Errors surfaced by the shared application state
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to lock {0}")]
    Poisoned(&'static str),
}

/// Errors raised by the interval record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}
