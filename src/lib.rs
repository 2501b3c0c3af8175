//! Interval Timer - alternates work and rest phases and reports each transition
//!
//! The core is a phase sequencer driven by a free-running countdown clock.
//! It is polled at a render cadence, detects elapse lazily at query time, and
//! reports transitions to registered observers. The rest of the crate wraps
//! it in a small HTTP service with a JSON record store for configurations.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{AppError, StoreError, TimerError};
pub use state::{AppState, CountdownClock, PhaseKind, PhaseObserver, PhaseSequencer, TimerState};
pub use utils::signals::shutdown_signal;
