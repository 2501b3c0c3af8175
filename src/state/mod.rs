//! State management module
//!
//! The interval-timer core (phase queue, countdown clock, sequencer and the
//! observer contract) plus the shared application state that drives it.

pub mod app_state;
pub mod clock;
pub mod observer;
pub mod queue;
pub mod sequencer;
pub mod snapshot;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, EventLog};
pub use clock::CountdownClock;
pub use observer::{ObserverId, ObserverRegistry, PhaseEvent, PhaseObserver};
pub use queue::PhaseQueue;
pub use sequencer::PhaseSequencer;
pub use snapshot::ProgressSnapshot;
pub use timer_state::{Phase, PhaseKind, TimerState};
