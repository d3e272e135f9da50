//! Common utilities and abstractions for services

/// Reactive property system for fine-grained state updates
pub mod property;
/// Owned one-shot timers with a cancel-then-rearm discipline
pub mod timer;

pub use property::Property;
pub use timer::ResettableTimer;
