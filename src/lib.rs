//! Loopdeck - interaction and reconciliation engine for a floating
//! media-control overlay.
//!
//! The overlay mirrors and drives a remote playback backend that is only
//! reachable through a polling HTTP API. This crate is the engine behind
//! the surface: it merges intermittently polled remote truth with
//! optimistic, not-yet-confirmed local gestures without flicker or state
//! regression, runs the minimized/hover and auto-hide state machines, and
//! handles frame-coalesced dragging with boundary clamping. Rendering, OS
//! window flags, and the backend itself live elsewhere.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use loopdeck::services::overlay::{OverlayService, OverlayServiceConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let (service, mut host_events) =
//!     OverlayService::start(OverlayServiceConfig::default()).await?;
//!
//! // Gestures apply optimistically and dispatch in the background.
//! service.play_pause().await;
//! assert!(!service.playback.is_playing.get());
//! # Ok(())
//! # }
//! ```

/// Configuration schema and file loading.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Reactive services powering the overlay.
pub mod services;

/// Tracing/logging initialization.
pub mod tracing_config;

pub use core::{LoopdeckError, Result};
