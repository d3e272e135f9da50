use std::fmt;

/// Presentation mode of the overlay card.
///
/// Distinct from the hidden/auto-hidden flags: the mode says which card is
/// shown, the flags say whether anything is shown at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    /// Compact card; input passes through to whatever is beneath it.
    Minimized,

    /// Expanded card with the full control surface.
    Hover,
}

/// Loop mode for track or playlist repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// No looping
    None,

    /// Loop the entire playlist
    Playlist,

    /// Loop the current song
    Song,
}

impl LoopMode {
    /// Advance to the next mode in the fixed cycle
    /// none → playlist → song → none.
    pub fn cycle(self) -> Self {
        match self {
            Self::None => Self::Playlist,
            Self::Playlist => Self::Song,
            Self::Song => Self::None,
        }
    }

    /// Wire index used by the backend's `/loop` endpoint.
    pub fn state_index(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Playlist => 1,
            Self::Song => 2,
        }
    }
}

impl From<&str> for LoopMode {
    fn from(state: &str) -> Self {
        match state {
            "Playlist" => Self::Playlist,
            "Song" => Self::Song,
            _ => Self::None,
        }
    }
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::Playlist => "playlist",
            Self::Song => "song",
        };
        write!(f, "{label}")
    }
}

/// Loop mode and song repeat count, always mutated together.
///
/// A count of 0 is the "repeat forever" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Current loop mode.
    pub mode: LoopMode,

    /// How many times the current song should repeat; 0 means infinite.
    pub count: u32,
}

impl LoopConfig {
    /// Advance the mode one step in the cycle.
    ///
    /// Leaving song mode resets the count to 1.
    pub fn cycled(self) -> Self {
        let mode = self.mode.cycle();
        let count = if self.mode == LoopMode::Song && mode != LoopMode::Song {
            1
        } else {
            self.count
        };
        Self { mode, count }
    }

    /// Raise the repeat count. No upper bound.
    pub fn incremented(self) -> Self {
        Self {
            count: self.count.saturating_add(1),
            ..self
        }
    }

    /// Lower the repeat count, flooring at the infinite sentinel (0).
    pub fn decremented(self) -> Self {
        Self {
            count: self.count.saturating_sub(1),
            ..self
        }
    }

    /// Display label for the repeats still to go, given the backend's
    /// progress telemetry. Never less than 1 for a finite count; "∞" for
    /// the infinite sentinel.
    pub fn remaining_label(self, loops_done: u32) -> String {
        if self.count == 0 {
            "∞".to_string()
        } else {
            self.count.saturating_sub(loops_done).max(1).to_string()
        }
    }
}

/// One coherent snapshot of playback state.
///
/// Polling produces a fresh snapshot per cycle; the reconciler merges it
/// into the previous local snapshot field by field, never in place.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    /// Current track title.
    pub title: String,

    /// Current track artist.
    pub artist: String,

    /// Whether playback is running.
    pub is_playing: bool,

    /// Whether output is muted.
    pub is_muted: bool,

    /// Output volume in percent, 0..=100.
    pub volume: u8,

    /// Current loop mode.
    pub loop_mode: LoopMode,

    /// Song repeat count; 0 means infinite.
    pub song_loop_count: u32,

    /// Repeats the backend has already played. Display-only telemetry.
    pub loops_done: u32,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            title: "No song detected".to_string(),
            artist: String::new(),
            is_playing: true,
            is_muted: false,
            volume: 75,
            loop_mode: LoopMode::Song,
            song_loop_count: 3,
            loops_done: 0,
        }
    }
}

/// Identifier of a control on the overlay surface.
///
/// Used for the per-button click debounce; the endpoint debounce lives one
/// layer below in the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    /// Play/pause toggle.
    PlayPause,
    /// Previous-track button.
    Previous,
    /// Next-track button.
    Next,
    /// Volume-up button.
    VolumeUp,
    /// Volume-down button.
    VolumeDown,
    /// Mute toggle.
    Mute,
    /// Loop-mode cycle button.
    LoopCycle,
    /// Repeat-count increment button.
    LoopIncrement,
    /// Repeat-count decrement button.
    LoopDecrement,
}

/// Signals emitted towards the host window process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Raise the overlay window above other windows.
    BringToFront,

    /// Presentation mode changed; the host toggles click pass-through on it.
    ModeChanged(PresentationMode),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_cycle_has_period_three() {
        for mode in [LoopMode::None, LoopMode::Playlist, LoopMode::Song] {
            assert_eq!(mode.cycle().cycle().cycle(), mode);
        }
        assert_eq!(LoopMode::None.cycle(), LoopMode::Playlist);
        assert_eq!(LoopMode::Playlist.cycle(), LoopMode::Song);
        assert_eq!(LoopMode::Song.cycle(), LoopMode::None);
    }

    #[test]
    fn leaving_song_resets_count() {
        let config = LoopConfig {
            mode: LoopMode::Song,
            count: 7,
        };
        let next = config.cycled();

        assert_eq!(next.mode, LoopMode::None);
        assert_eq!(next.count, 1);
    }

    #[test]
    fn cycling_between_other_modes_keeps_count() {
        let config = LoopConfig {
            mode: LoopMode::None,
            count: 4,
        };
        let next = config.cycled();

        assert_eq!(next.mode, LoopMode::Playlist);
        assert_eq!(next.count, 4);
    }

    #[test]
    fn decrement_floors_at_infinite_sentinel() {
        let config = LoopConfig {
            mode: LoopMode::Song,
            count: 1,
        };

        let zero = config.decremented();
        assert_eq!(zero.count, 0);
        assert_eq!(zero.decremented().count, 0);
    }

    #[test]
    fn increment_is_unbounded() {
        let config = LoopConfig {
            mode: LoopMode::Song,
            count: 0,
        };

        assert_eq!(config.incremented().count, 1);
        assert_eq!(config.incremented().incremented().count, 2);
    }

    #[test]
    fn remaining_label_counts_down_and_floors_at_one() {
        let config = LoopConfig {
            mode: LoopMode::Song,
            count: 5,
        };

        assert_eq!(config.remaining_label(2), "3");
        assert_eq!(config.remaining_label(9), "1");
    }

    #[test]
    fn remaining_label_shows_infinity_for_zero_count() {
        let config = LoopConfig {
            mode: LoopMode::Song,
            count: 0,
        };

        assert_eq!(config.remaining_label(0), "∞");
        assert_eq!(config.remaining_label(42), "∞");
    }

    #[test]
    fn loop_mode_parses_backend_labels() {
        assert_eq!(LoopMode::from("Playlist"), LoopMode::Playlist);
        assert_eq!(LoopMode::from("Song"), LoopMode::Song);
        assert_eq!(LoopMode::from("Off"), LoopMode::None);
        assert_eq!(LoopMode::from(""), LoopMode::None);
    }
}
