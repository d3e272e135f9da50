//! Debounced, timeout-bounded command dispatch.
//!
//! Every control gesture funnels through here. Repeats on the same endpoint
//! inside the debounce window are silent no-ops, issued requests race a
//! fixed deadline, and every failure resolves to a recorded error message
//! rather than a returned `Err` — the optimistic local state applied before
//! dispatch is never rolled back, the next expired poll corrects it.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::api::BackendClient;
use super::error::OverlayError;
use crate::services::common::Property;

/// A control action accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Toggle play/pause.
    PlayPause,
    /// Skip to the previous track.
    Previous,
    /// Skip to the next track.
    Next,
    /// Raise the volume one step.
    VolumeUp,
    /// Lower the volume one step.
    VolumeDown,
    /// Toggle mute.
    Mute,
    /// Set the loop mode and repeat count.
    SetLoop {
        /// Wire index of the loop mode: 0 none, 1 playlist, 2 song.
        state_index: u8,
        /// Repeat count to configure; 0 means infinite.
        loop_count: u32,
    },
}

impl Command {
    /// Endpoint path this command posts to. Also the debounce key.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::PlayPause => "/playpause",
            Self::Previous => "/prev",
            Self::Next => "/next",
            Self::VolumeUp => "/volumeup",
            Self::VolumeDown => "/volumedown",
            Self::Mute => "/mute",
            Self::SetLoop { .. } => "/loop",
        }
    }

    fn body(&self) -> Option<serde_json::Value> {
        match self {
            Self::SetLoop {
                state_index,
                loop_count,
            } => Some(json!({
                "state_index": state_index,
                "loop_count": loop_count,
            })),
            _ => None,
        }
    }
}

/// Outcome of a dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Request was issued and acknowledged.
    Delivered,
    /// Suppressed by the endpoint debounce window. Not an error.
    Debounced,
    /// Request was issued but failed or timed out; the message was recorded.
    Failed,
}

/// Pass a key through a debounce window, recording the issue time when the
/// key is allowed through. Keys are never evicted.
pub(crate) fn debounce_gate<K: Eq + Hash>(
    log: &mut HashMap<K, Instant>,
    key: K,
    now: Instant,
    window: Duration,
) -> bool {
    if let Some(last) = log.get(&key) {
        if now.saturating_duration_since(*last) < window {
            return false;
        }
    }
    log.insert(key, now);
    true
}

/// Rate-limited gateway for control requests to the backend.
#[derive(Debug)]
pub struct CommandDispatcher {
    client: BackendClient,
    last_issue: Mutex<HashMap<&'static str, Instant>>,
    debounce: Duration,
    timeout: Duration,
    last_error: Property<Option<String>>,
}

impl CommandDispatcher {
    /// Create a dispatcher writing failures into the given error property.
    pub fn new(
        client: BackendClient,
        debounce: Duration,
        timeout: Duration,
        last_error: Property<Option<String>>,
    ) -> Self {
        Self {
            client,
            last_issue: Mutex::new(HashMap::new()),
            debounce,
            timeout,
            last_error,
        }
    }

    /// Issue a command, subject to the endpoint debounce and the deadline.
    ///
    /// Never returns an error: failures are surfaced through the shared
    /// error property and reported in the outcome.
    pub async fn dispatch(&self, command: Command) -> DispatchOutcome {
        let endpoint = command.endpoint();

        {
            let mut log = self.last_issue.lock().await;
            if !debounce_gate(&mut log, endpoint, Instant::now(), self.debounce) {
                debug!(endpoint, "command debounced");
                return DispatchOutcome::Debounced;
            }
        }

        let request = self.client.post(endpoint, command.body());
        let result = match tokio::time::timeout(self.timeout, request).await {
            Err(_) => Err(OverlayError::CommandTimeout { endpoint }),
            Ok(Err(err)) => Err(OverlayError::CommandFailure {
                endpoint,
                detail: err.to_string(),
            }),
            Ok(Ok(())) => Ok(()),
        };

        match result {
            Ok(()) => {
                debug!(endpoint, "command delivered");
                DispatchOutcome::Delivered
            }
            Err(err) => {
                warn!(endpoint, error = %err, "command failed");
                self.last_error.set(Some(err.to_string()));
                DispatchOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn gate_passes_first_and_blocks_repeats_inside_window() {
        let mut log = HashMap::new();
        let window = Duration::from_millis(150);
        let base = Instant::now();

        assert!(debounce_gate(&mut log, "/playpause", base, window));
        assert!(!debounce_gate(
            &mut log,
            "/playpause",
            base + Duration::from_millis(100),
            window
        ));
        assert!(debounce_gate(
            &mut log,
            "/playpause",
            base + Duration::from_millis(200),
            window
        ));
    }

    #[test]
    fn gate_tracks_keys_independently() {
        let mut log = HashMap::new();
        let window = Duration::from_millis(150);
        let base = Instant::now();

        assert!(debounce_gate(&mut log, "/playpause", base, window));
        assert!(debounce_gate(&mut log, "/next", base, window));
        assert!(!debounce_gate(
            &mut log,
            "/next",
            base + Duration::from_millis(1),
            window
        ));
    }

    #[test]
    fn blocked_attempts_do_not_refresh_the_window() {
        let mut log = HashMap::new();
        let window = Duration::from_millis(150);
        let base = Instant::now();

        assert!(debounce_gate(&mut log, "/mute", base, window));
        assert!(!debounce_gate(
            &mut log,
            "/mute",
            base + Duration::from_millis(140),
            window
        ));
        // 160ms after the *issue*, not after the blocked attempt.
        assert!(debounce_gate(
            &mut log,
            "/mute",
            base + Duration::from_millis(160),
            window
        ));
    }

    #[test]
    fn loop_command_serializes_its_payload() {
        let command = Command::SetLoop {
            state_index: 2,
            loop_count: 4,
        };

        assert_eq!(command.endpoint(), "/loop");
        assert_eq!(
            command.body().unwrap(),
            json!({"state_index": 2, "loop_count": 4})
        );
    }

    #[test]
    fn plain_commands_have_no_body() {
        for command in [
            Command::PlayPause,
            Command::Previous,
            Command::Next,
            Command::VolumeUp,
            Command::VolumeDown,
            Command::Mute,
        ] {
            assert!(command.body().is_none());
        }
    }

    #[tokio::test]
    async fn repeat_dispatch_to_same_endpoint_is_a_silent_noop() {
        // Nothing is listening on this port; the first dispatch fails fast
        // while the second must short-circuit before any network attempt.
        let client = BackendClient::new("http://127.0.0.1:9").unwrap();
        let dispatcher = CommandDispatcher::new(
            client,
            Duration::from_secs(60),
            Duration::from_millis(500),
            Property::new(None),
        );

        assert_eq!(
            dispatcher.dispatch(Command::PlayPause).await,
            DispatchOutcome::Failed
        );
        assert_eq!(
            dispatcher.dispatch(Command::PlayPause).await,
            DispatchOutcome::Debounced
        );
    }

    #[tokio::test]
    async fn failures_surface_through_the_error_property() {
        let last_error = Property::new(None);
        let client = BackendClient::new("http://127.0.0.1:9").unwrap();
        let dispatcher = CommandDispatcher::new(
            client,
            Duration::from_millis(0),
            Duration::from_millis(500),
            last_error.clone(),
        );

        dispatcher.dispatch(Command::Next).await;

        let message = last_error.get().unwrap();
        assert!(message.starts_with("Failed to call /next:"), "{message}");
    }
}
