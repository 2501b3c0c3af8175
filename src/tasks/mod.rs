//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod event_log;
pub mod ticker;

// Re-export main functions
pub use event_log::event_log_task;
pub use ticker::ticker_task;
