use serde::Deserialize;

use super::error::OverlayError;
use super::types::{LoopMode, PlaybackSnapshot};

/// Volume assumed when the backend omits the field.
pub(crate) const DEFAULT_VOLUME: u8 = 75;

/// Wire shape of `GET /songinfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct SongInfo {
    /// Track title.
    #[serde(default)]
    pub title: String,

    /// Track artist.
    #[serde(default)]
    pub artist: String,

    /// Whether playback is running.
    #[serde(default)]
    pub is_playing: bool,

    /// Mute flag; older backends omit it.
    pub is_muted: Option<bool>,

    /// Volume in percent; older backends omit it.
    pub volume: Option<u8>,
}

/// Wire shape of `GET /status`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoopStatus {
    /// Loop state label, "Playlist" or "Song"; anything else means none.
    pub loop_state: Option<String>,

    /// Configured repeat count.
    pub loop_count: Option<u32>,

    /// Repeats already played.
    pub loops_done: Option<u32>,
}

/// Assemble one coherent remote snapshot from the two poll responses,
/// applying the backend's documented fallbacks for omitted fields.
pub fn snapshot_from(song: SongInfo, status: LoopStatus) -> PlaybackSnapshot {
    PlaybackSnapshot {
        title: song.title,
        artist: song.artist,
        is_playing: song.is_playing,
        is_muted: song.is_muted.unwrap_or(false),
        volume: song.volume.unwrap_or(DEFAULT_VOLUME).min(100),
        loop_mode: status
            .loop_state
            .as_deref()
            .map(LoopMode::from)
            .unwrap_or(LoopMode::None),
        song_loop_count: status.loop_count.unwrap_or(1),
        loops_done: status.loops_done.unwrap_or(0),
    }
}

/// Thin HTTP client over the playback backend's JSON API.
///
/// All requests target a fixed base origin. The client itself carries no
/// debounce or timeout policy; that lives in the dispatcher and poller.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for the given base origin, e.g. `http://127.0.0.1:5000`.
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, OverlayError> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            base_url: base_url.into(),
        })
    }

    /// Base origin this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL a host should open in a browser for the credential flow.
    /// The flow itself is handled entirely by the backend.
    pub fn auth_url(&self) -> String {
        format!("{}/spotify-auth", self.base_url)
    }

    /// Fetch the current song info.
    ///
    /// # Errors
    /// Returns error on transport failure, non-success status, or a body
    /// that does not decode as song info.
    pub async fn song_info(&self) -> Result<SongInfo, OverlayError> {
        self.get_json("/songinfo").await
    }

    /// Fetch the current loop status.
    ///
    /// # Errors
    /// Returns error on transport failure, non-success status, or a body
    /// that does not decode as loop status.
    pub async fn loop_status(&self) -> Result<LoopStatus, OverlayError> {
        self.get_json("/status").await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, OverlayError> {
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OverlayError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| OverlayError::MalformedBody(e.to_string()))
    }

    /// Issue a control POST. The response body is ignored beyond
    /// success/failure.
    ///
    /// # Errors
    /// Returns error on transport failure or a non-success status.
    pub async fn post(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<(), OverlayError> {
        let mut request = self.http.post(format!("{}{path}", self.base_url));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OverlayError::Status(status.as_u16()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn song_info_fills_in_missing_optionals() {
        let song: SongInfo =
            serde_json::from_str(r#"{"title": "Track", "artist": "Artist", "is_playing": true}"#)
                .unwrap();
        let status: LoopStatus = serde_json::from_str("{}").unwrap();

        let snapshot = snapshot_from(song, status);

        assert_eq!(snapshot.title, "Track");
        assert!(snapshot.is_playing);
        assert!(!snapshot.is_muted);
        assert_eq!(snapshot.volume, DEFAULT_VOLUME);
        assert_eq!(snapshot.loop_mode, LoopMode::None);
        assert_eq!(snapshot.song_loop_count, 1);
        assert_eq!(snapshot.loops_done, 0);
    }

    #[test]
    fn status_labels_map_to_loop_modes() {
        let song: SongInfo = serde_json::from_str(r#"{"is_playing": false}"#)
            .unwrap();
        let status: LoopStatus = serde_json::from_str(
            r#"{"loop_state": "Song", "loop_count": 5, "loops_done": 2}"#,
        )
        .unwrap();

        let snapshot = snapshot_from(song.clone(), status);
        assert_eq!(snapshot.loop_mode, LoopMode::Song);
        assert_eq!(snapshot.song_loop_count, 5);
        assert_eq!(snapshot.loops_done, 2);

        let playlist: LoopStatus =
            serde_json::from_str(r#"{"loop_state": "Playlist"}"#).unwrap();
        assert_eq!(snapshot_from(song.clone(), playlist).loop_mode, LoopMode::Playlist);

        let unknown: LoopStatus =
            serde_json::from_str(r#"{"loop_state": "Whatever"}"#).unwrap();
        assert_eq!(snapshot_from(song, unknown).loop_mode, LoopMode::None);
    }

    #[test]
    fn volume_is_clamped_to_percentage_range() {
        let song: SongInfo = serde_json::from_str(r#"{"is_playing": true, "volume": 255}"#)
            .unwrap();
        let status: LoopStatus = serde_json::from_str("{}").unwrap();

        assert_eq!(snapshot_from(song, status).volume, 100);
    }
}
