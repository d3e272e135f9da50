/// Shared service utilities
pub mod common;
/// Overlay interaction and reconciliation engine
pub mod overlay;

pub use overlay::{OverlayService, OverlayServiceConfig};
