//! Overlay interaction and reconciliation engine.
//!
//! Mirrors and drives a remote media-playback backend that is reachable only
//! through a polling HTTP API. The service merges polled remote truth with
//! optimistic local gestures (recency-gated, per field), runs the
//! minimized/hover visibility state machine with its grace and auto-hide
//! timers, coalesces drag movement to one position update per rendering
//! frame, and rate-limits outgoing commands at both the endpoint and the
//! button layer.

/// Backend wire format and HTTP client.
pub mod api;
/// Debounced, timeout-bounded command dispatch.
pub mod dispatch;
/// Frame-coalesced drag handling.
pub mod drag;
/// Error taxonomy for the overlay engine.
pub mod error;
/// Position clamping and centering math.
pub mod position;
/// Recency-gated merge of remote snapshots into local state.
pub mod reconcile;
/// Composition root owning all overlay state.
pub mod service;
/// Core data model shared across the engine.
pub mod types;
/// Presentation-mode and auto-hide state machine.
pub mod visibility;

mod monitoring;

pub use api::BackendClient;
pub use dispatch::{Command, CommandDispatcher, DispatchOutcome};
pub use drag::{DragController, Point};
pub use error::OverlayError;
pub use position::{Layout, Position, Size};
pub use reconcile::{ActionRecency, UserField, reconcile};
pub use service::{OverlayService, OverlayServiceConfig, PlaybackProperties};
pub use types::{ButtonId, HostEvent, LoopConfig, LoopMode, PlaybackSnapshot, PresentationMode};
pub use visibility::{Effect, VisibilityEvent, VisibilityMachine};
