//! External collaborators of the timer core
//!
//! The interval record store and the observers that carry phase transitions
//! to logging and to channel subscribers.

pub mod observers;
pub mod store;

// Re-export main types
pub use observers::{BroadcastObserver, TracingObserver};
pub use store::{IntervalConfig, IntervalStore};
