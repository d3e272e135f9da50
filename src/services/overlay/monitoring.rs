use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::api::{BackendClient, snapshot_from};
use super::error::OverlayError;
use super::reconcile::{ActionRecency, reconcile};
use super::service::PlaybackProperties;
use crate::services::common::Property;

/// Background poll loop keeping local state in sync with the backend.
///
/// One cycle fetches song info and loop status sequentially; reconciliation
/// only ever runs against a complete cycle. Failures flip the connectivity
/// flag and leave playback state untouched; the loop never stops on error,
/// resilience is cadence-based. Polling is fully suspended while the
/// overlay is hidden and resumes with an immediate fetch.
pub(crate) struct PollMonitor {
    pub(crate) client: BackendClient,
    pub(crate) interval: Duration,
    pub(crate) playback: PlaybackProperties,
    pub(crate) recency: Arc<Mutex<ActionRecency>>,
    pub(crate) hidden: Property<bool>,
    pub(crate) connected: Property<bool>,
    pub(crate) last_error: Property<Option<String>>,
}

impl PollMonitor {
    pub(crate) async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if self.hidden.get() {
                self.wait_until_visible().await;
                ticker.reset_immediately();
                continue;
            }

            self.poll_once().await;
        }
    }

    async fn wait_until_visible(&self) {
        let stream = self.hidden.watch();
        tokio::pin!(stream);
        while let Some(hidden) = stream.next().await {
            if !hidden {
                break;
            }
        }
    }

    async fn poll_once(&self) {
        let cycle = async {
            let song = self.client.song_info().await?;
            let status = self.client.loop_status().await?;
            Ok::<_, OverlayError>(snapshot_from(song, status))
        };

        match cycle.await {
            Ok(remote) => {
                let prev = self.playback.snapshot();
                let recency = self.recency.lock().await;
                let next = reconcile(&prev, &recency, &remote, Instant::now());
                drop(recency);

                self.playback.apply(&next);
                self.connected.set(true);
                self.last_error.set(None);
                debug!(title = %next.title, playing = next.is_playing, "poll cycle reconciled");
            }
            Err(err) => {
                self.connected.set(false);
                self.last_error
                    .set(Some(format!("Backend not connected: {err}")));
                debug!(error = %err, "poll cycle failed");
            }
        }
    }
}
