//! Recency-gated merge of polled remote snapshots into local state.
//!
//! The backend's own state lags behind issued commands, so a poll that races
//! ahead of a just-clicked gesture would visibly revert the optimistic local
//! value. The merge therefore keeps any field the user touched within the
//! recency window and adopts the remote value only once that window expires.
//! Last-applied-wins is deliberately not used anywhere here.

use std::time::{Duration, Instant};

use super::types::PlaybackSnapshot;

/// Fields whose remote value can be outranked by a recent local gesture.
///
/// Loop mode and repeat count form a single gesture family and share one
/// recency entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    /// Play/pause state.
    IsPlaying,
    /// Mute state.
    IsMuted,
    /// Volume percentage.
    Volume,
    /// Loop mode and repeat count.
    Loop,
}

/// Timestamps of the last local gesture per reconcilable field.
///
/// Written only by the service on user gestures; the reconciler reads it and
/// never writes. A field with no entry, or an entry older than the window,
/// counts as "not recently user-touched".
#[derive(Debug, Clone, Copy)]
pub struct ActionRecency {
    window: Duration,
    is_playing: Option<Instant>,
    is_muted: Option<Instant>,
    volume: Option<Instant>,
    loop_family: Option<Instant>,
}

impl ActionRecency {
    /// Create an empty recency map with the given window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            is_playing: None,
            is_muted: None,
            volume: None,
            loop_family: None,
        }
    }

    /// Record a local gesture on the given field.
    pub fn mark(&mut self, field: UserField, now: Instant) {
        let slot = match field {
            UserField::IsPlaying => &mut self.is_playing,
            UserField::IsMuted => &mut self.is_muted,
            UserField::Volume => &mut self.volume,
            UserField::Loop => &mut self.loop_family,
        };
        *slot = Some(now);
    }

    /// Whether the field was user-touched within the recency window.
    pub fn is_recent(&self, field: UserField, now: Instant) -> bool {
        let stamp = match field {
            UserField::IsPlaying => self.is_playing,
            UserField::IsMuted => self.is_muted,
            UserField::Volume => self.volume,
            UserField::Loop => self.loop_family,
        };
        stamp.is_some_and(|at| now.saturating_duration_since(at) <= self.window)
    }
}

/// Merge a freshly polled snapshot into the previous local state.
///
/// Per reconcilable field: keep the local value while its recency entry is
/// inside the window, otherwise adopt the remote value exactly. Title and
/// artist are not user-settable and are always adopted, as is `loops_done`
/// (host-computed progress, never gated on loop recency).
pub fn reconcile(
    prev: &PlaybackSnapshot,
    recency: &ActionRecency,
    remote: &PlaybackSnapshot,
    now: Instant,
) -> PlaybackSnapshot {
    let keep_loop = recency.is_recent(UserField::Loop, now);

    PlaybackSnapshot {
        title: remote.title.clone(),
        artist: remote.artist.clone(),
        is_playing: if recency.is_recent(UserField::IsPlaying, now) {
            prev.is_playing
        } else {
            remote.is_playing
        },
        is_muted: if recency.is_recent(UserField::IsMuted, now) {
            prev.is_muted
        } else {
            remote.is_muted
        },
        volume: if recency.is_recent(UserField::Volume, now) {
            prev.volume
        } else {
            remote.volume
        },
        loop_mode: if keep_loop {
            prev.loop_mode
        } else {
            remote.loop_mode
        },
        song_loop_count: if keep_loop {
            prev.song_loop_count
        } else {
            remote.song_loop_count
        },
        loops_done: remote.loops_done,
    }
}
