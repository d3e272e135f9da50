use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use super::api::BackendClient;
use super::dispatch::{Command, CommandDispatcher, debounce_gate};
use super::drag::{DragController, Point};
use super::error::OverlayError;
use super::monitoring::PollMonitor;
use super::position::{Layout, Position};
use super::reconcile::{ActionRecency, UserField};
use super::types::{ButtonId, HostEvent, LoopConfig, LoopMode, PlaybackSnapshot, PresentationMode};
use super::visibility::{Effect, VisibilityEvent, VisibilityMachine};
use crate::services::common::{Property, ResettableTimer};

/// Configuration for the overlay service.
#[derive(Debug, Clone)]
pub struct OverlayServiceConfig {
    /// Base origin of the playback backend.
    pub base_url: String,

    /// Interval between poll cycles.
    pub poll_interval: Duration,

    /// How long a local gesture outranks polled remote values.
    pub recency_window: Duration,

    /// Minimum spacing between two requests to the same endpoint.
    pub endpoint_debounce: Duration,

    /// Minimum spacing between two clicks on the same control.
    pub button_debounce: Duration,

    /// Deadline for a single control request.
    pub command_timeout: Duration,

    /// Grace period between pointer-leave and minimizing.
    pub minimize_grace: Duration,

    /// Idle time before the minimized card dims itself.
    pub auto_hide_delay: Duration,

    /// Volume change per volume gesture, in percent.
    pub volume_step: u8,
}

impl Default for OverlayServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            poll_interval: Duration::from_millis(2000),
            recency_window: Duration::from_millis(3000),
            endpoint_debounce: Duration::from_millis(150),
            button_debounce: Duration::from_millis(200),
            command_timeout: Duration::from_millis(3000),
            minimize_grace: Duration::from_millis(100),
            auto_hide_delay: Duration::from_millis(8000),
            volume_step: 10,
        }
    }
}

impl From<&crate::config::Config> for OverlayServiceConfig {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            base_url: config.backend.base_url.clone(),
            poll_interval: Duration::from_millis(config.timing.poll_interval_ms),
            recency_window: Duration::from_millis(config.timing.recency_window_ms),
            endpoint_debounce: Duration::from_millis(config.timing.endpoint_debounce_ms),
            button_debounce: Duration::from_millis(config.timing.button_debounce_ms),
            command_timeout: Duration::from_millis(config.timing.command_timeout_ms),
            minimize_grace: Duration::from_millis(config.timing.minimize_grace_ms),
            auto_hide_delay: Duration::from_millis(config.timing.auto_hide_ms),
            volume_step: config.playback.volume_step,
        }
    }
}

/// Reactive playback state, one property per field.
///
/// Fine-grained properties let the presentation layer subscribe to exactly
/// the fields it renders; unchanged fields never notify.
#[derive(Debug, Clone)]
pub struct PlaybackProperties {
    /// Current track title.
    pub title: Property<String>,
    /// Current track artist.
    pub artist: Property<String>,
    /// Whether playback is running.
    pub is_playing: Property<bool>,
    /// Whether output is muted.
    pub is_muted: Property<bool>,
    /// Output volume in percent.
    pub volume: Property<u8>,
    /// Loop mode and repeat count.
    pub loop_config: Property<LoopConfig>,
    /// Repeats the backend has already played.
    pub loops_done: Property<u32>,
}

impl PlaybackProperties {
    fn with_defaults() -> Self {
        let defaults = PlaybackSnapshot::default();
        Self {
            title: Property::new(defaults.title),
            artist: Property::new(defaults.artist),
            is_playing: Property::new(defaults.is_playing),
            is_muted: Property::new(defaults.is_muted),
            volume: Property::new(defaults.volume),
            loop_config: Property::new(LoopConfig {
                mode: defaults.loop_mode,
                count: defaults.song_loop_count,
            }),
            loops_done: Property::new(defaults.loops_done),
        }
    }

    /// Assemble the current values into one coherent snapshot.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let loop_config = self.loop_config.get();
        PlaybackSnapshot {
            title: self.title.get(),
            artist: self.artist.get(),
            is_playing: self.is_playing.get(),
            is_muted: self.is_muted.get(),
            volume: self.volume.get(),
            loop_mode: loop_config.mode,
            song_loop_count: loop_config.count,
            loops_done: self.loops_done.get(),
        }
    }

    /// Apply a merged snapshot field by field.
    pub(crate) fn apply(&self, snapshot: &PlaybackSnapshot) {
        self.title.set(snapshot.title.clone());
        self.artist.set(snapshot.artist.clone());
        self.is_playing.set(snapshot.is_playing);
        self.is_muted.set(snapshot.is_muted);
        self.volume.set(snapshot.volume);
        self.loop_config.set(LoopConfig {
            mode: snapshot.loop_mode,
            count: snapshot.song_loop_count,
        });
        self.loops_done.set(snapshot.loops_done);
    }
}

/// Background tasks die with the last service handle.
#[derive(Debug)]
struct TaskGuards {
    poll: JoinHandle<()>,
    visibility: JoinHandle<()>,
}

impl Drop for TaskGuards {
    fn drop(&mut self) {
        self.poll.abort();
        self.visibility.abort();
    }
}

/// The overlay's composition root.
///
/// Owns every piece of observable state and wires user gestures to the
/// command dispatcher, poll results to the reconciler, and pointer events
/// to the drag controller and visibility machine. Optimistic updates and
/// their recency stamps are applied before a command is dispatched, which
/// is what gives the surface immediate feedback irrespective of network
/// latency.
#[derive(Debug, Clone)]
pub struct OverlayService {
    client: BackendClient,
    dispatcher: Arc<CommandDispatcher>,

    /// Reactive playback state.
    pub playback: PlaybackProperties,
    /// Whether the last poll cycle reached the backend.
    pub connected: Property<bool>,
    /// Most recent surfaced error message, if any.
    pub last_error: Property<Option<String>>,
    /// Current presentation mode.
    pub mode: Property<PresentationMode>,
    /// Host-controlled full suppression flag.
    pub hidden: Property<bool>,
    /// Inactivity-driven dim flag; visible effect only while minimized.
    pub auto_hidden: Property<bool>,
    /// Card position; `None` until the first drag establishes one.
    pub position: Property<Option<Position>>,

    drag: Arc<Mutex<DragController>>,
    recency: Arc<Mutex<ActionRecency>>,
    last_click: Arc<Mutex<HashMap<ButtonId, Instant>>>,
    host_events: mpsc::UnboundedSender<HostEvent>,
    visibility_events: mpsc::UnboundedSender<VisibilityEvent>,
    button_debounce: Duration,
    volume_step: u8,
    _tasks: Arc<TaskGuards>,
}

impl OverlayService {
    /// Start the service: spawns the poll loop and the visibility loop.
    ///
    /// Returns the service handle plus the stream of host events
    /// (bring-to-front, mode changes) the window process consumes.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed.
    pub async fn start(
        config: OverlayServiceConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<HostEvent>), OverlayError> {
        info!(base_url = %config.base_url, "starting overlay service");

        let client = BackendClient::new(config.base_url.clone())?;
        let last_error = Property::new(None);
        let dispatcher = Arc::new(CommandDispatcher::new(
            client.clone(),
            config.endpoint_debounce,
            config.command_timeout,
            last_error.clone(),
        ));

        let playback = PlaybackProperties::with_defaults();
        let connected = Property::new(false);
        let mode = Property::new(PresentationMode::Minimized);
        let hidden = Property::new(false);
        let auto_hidden = Property::new(false);
        let position = Property::new(None);
        let recency = Arc::new(Mutex::new(ActionRecency::new(config.recency_window)));

        let (host_tx, host_rx) = mpsc::unbounded_channel();
        let (visibility_tx, visibility_rx) = mpsc::unbounded_channel();

        let poll = tokio::spawn(
            PollMonitor {
                client: client.clone(),
                interval: config.poll_interval,
                playback: playback.clone(),
                recency: Arc::clone(&recency),
                hidden: hidden.clone(),
                connected: connected.clone(),
                last_error: last_error.clone(),
            }
            .run(),
        );

        let visibility = tokio::spawn(
            VisibilityLoop {
                events: visibility_rx,
                events_tx: visibility_tx.clone(),
                machine: VisibilityMachine::new(),
                mode: mode.clone(),
                auto_hidden: auto_hidden.clone(),
                host_events: host_tx.clone(),
                grace_delay: config.minimize_grace,
                auto_hide_delay: config.auto_hide_delay,
            }
            .run(),
        );

        // Startup counts as an interaction: the idle countdown begins now.
        let _ = visibility_tx.send(VisibilityEvent::Interaction);

        let service = Self {
            client,
            dispatcher,
            playback,
            connected,
            last_error,
            mode,
            hidden,
            auto_hidden,
            position,
            drag: Arc::new(Mutex::new(DragController::new())),
            recency,
            last_click: Arc::new(Mutex::new(HashMap::new())),
            host_events: host_tx,
            visibility_events: visibility_tx,
            button_debounce: config.button_debounce,
            volume_step: config.volume_step,
            _tasks: Arc::new(TaskGuards { poll, visibility }),
        };

        Ok((service, host_rx))
    }

    /// Toggle play/pause.
    pub async fn play_pause(&self) {
        if !self.button(ButtonId::PlayPause).await {
            return;
        }
        self.playback.is_playing.update(|playing| !playing);
        self.mark(UserField::IsPlaying).await;
        self.dispatcher.dispatch(Command::PlayPause).await;
    }

    /// Skip to the previous track.
    pub async fn previous_track(&self) {
        if !self.button(ButtonId::Previous).await {
            return;
        }
        // Track changes restart the backend's loop bookkeeping.
        self.mark(UserField::Loop).await;
        self.dispatcher.dispatch(Command::Previous).await;
    }

    /// Skip to the next track.
    pub async fn next_track(&self) {
        if !self.button(ButtonId::Next).await {
            return;
        }
        self.mark(UserField::Loop).await;
        self.dispatcher.dispatch(Command::Next).await;
    }

    /// Raise the volume one step.
    pub async fn volume_up(&self) {
        if !self.button(ButtonId::VolumeUp).await {
            return;
        }
        let step = self.volume_step;
        self.playback
            .volume
            .update(|volume| volume.saturating_add(step).min(100));
        self.mark(UserField::Volume).await;
        self.dispatcher.dispatch(Command::VolumeUp).await;
    }

    /// Lower the volume one step.
    pub async fn volume_down(&self) {
        if !self.button(ButtonId::VolumeDown).await {
            return;
        }
        let step = self.volume_step;
        self.playback
            .volume
            .update(|volume| volume.saturating_sub(step));
        self.mark(UserField::Volume).await;
        self.dispatcher.dispatch(Command::VolumeDown).await;
    }

    /// Toggle mute.
    pub async fn toggle_mute(&self) {
        if !self.button(ButtonId::Mute).await {
            return;
        }
        self.playback.is_muted.update(|muted| !muted);
        self.mark(UserField::IsMuted).await;
        self.dispatcher.dispatch(Command::Mute).await;
    }

    /// Advance the loop mode one step in the none → playlist → song cycle.
    pub async fn cycle_loop_mode(&self) {
        if !self.button(ButtonId::LoopCycle).await {
            return;
        }
        let next = self.playback.loop_config.get().cycled();
        self.playback.loop_config.set(next);
        self.mark(UserField::Loop).await;

        // The count only travels with song mode; other modes reset to 1 on
        // the wire.
        let loop_count = if next.mode == LoopMode::Song {
            next.count
        } else {
            1
        };
        self.dispatcher
            .dispatch(Command::SetLoop {
                state_index: next.mode.state_index(),
                loop_count,
            })
            .await;
    }

    /// Raise the song repeat count.
    pub async fn increase_loop_count(&self) {
        if !self.button(ButtonId::LoopIncrement).await {
            return;
        }
        let next = self.playback.loop_config.get().incremented();
        self.playback.loop_config.set(next);
        self.mark(UserField::Loop).await;
        self.dispatcher
            .dispatch(Command::SetLoop {
                state_index: next.mode.state_index(),
                loop_count: next.count,
            })
            .await;
    }

    /// Lower the song repeat count, flooring at the infinite sentinel.
    pub async fn decrease_loop_count(&self) {
        if !self.button(ButtonId::LoopDecrement).await {
            return;
        }
        let next = self.playback.loop_config.get().decremented();
        self.playback.loop_config.set(next);
        self.mark(UserField::Loop).await;
        self.dispatcher
            .dispatch(Command::SetLoop {
                state_index: next.mode.state_index(),
                loop_count: next.count,
            })
            .await;
    }

    /// Display label for the repeats still to go ("∞" for the sentinel).
    pub fn remaining_loops_label(&self) -> String {
        self.playback
            .loop_config
            .get()
            .remaining_label(self.playback.loops_done.get())
    }

    /// Pointer pressed on the card.
    ///
    /// Always raises the window and counts as an interaction; starts a drag
    /// unless the press landed on a control element.
    pub async fn pointer_down(&self, pointer: Point, layout: Layout, on_control: bool) {
        let _ = self.host_events.send(HostEvent::BringToFront);
        self.send_visibility(VisibilityEvent::Interaction);
        if on_control {
            return;
        }

        let mut drag = self.drag.lock().await;
        let baseline = drag.pointer_down(pointer, self.position.get(), layout);
        self.position.set(Some(baseline));
        self.send_visibility(VisibilityEvent::DragStarted);
    }

    /// Pointer moved during a drag.
    ///
    /// Returns `true` when the presentation layer must schedule a frame
    /// callback (at most one is ever pending).
    pub async fn pointer_move(&self, pointer: Point) -> bool {
        self.drag.lock().await.pointer_move(pointer)
    }

    /// Frame callback: applies the latest buffered move, clamped to bounds.
    pub async fn frame(&self, layout: Layout) {
        if let Some(position) = self.drag.lock().await.frame(layout) {
            self.position.set(Some(position));
        }
    }

    /// Pointer released; pending moves are discarded.
    pub async fn pointer_up(&self) {
        self.drag.lock().await.pointer_up();
        self.send_visibility(VisibilityEvent::DragEnded);
    }

    /// Pointer entered the card.
    pub fn pointer_enter(&self) {
        self.send_visibility(VisibilityEvent::PointerEnter);
    }

    /// Pointer left the card.
    pub fn pointer_leave(&self) {
        self.send_visibility(VisibilityEvent::PointerLeave);
    }

    /// Host command: fully suppress or restore the overlay.
    ///
    /// While hidden, polling and the auto-hide timer are paused.
    pub fn set_hidden(&self, hidden: bool) {
        self.hidden.set(hidden);
        self.send_visibility(VisibilityEvent::SetHidden(hidden));
    }

    /// URL for the backend's credential flow, for the host to open.
    pub fn auth_url(&self) -> String {
        self.client.auth_url()
    }

    /// Per-button click debounce. The interaction side effect fires even
    /// for clicks the debounce swallows.
    async fn button(&self, id: ButtonId) -> bool {
        self.send_visibility(VisibilityEvent::Interaction);
        let mut log = self.last_click.lock().await;
        debounce_gate(&mut log, id, Instant::now(), self.button_debounce)
    }

    async fn mark(&self, field: UserField) {
        self.recency.lock().await.mark(field, Instant::now());
    }

    fn send_visibility(&self, event: VisibilityEvent) {
        let _ = self.visibility_events.send(event);
    }
}

/// Single owner of the visibility machine and its two timers.
///
/// All stimuli arrive through one channel, including the timers' own
/// wakeups, so transitions are strictly ordered.
struct VisibilityLoop {
    events: mpsc::UnboundedReceiver<VisibilityEvent>,
    events_tx: mpsc::UnboundedSender<VisibilityEvent>,
    machine: VisibilityMachine,
    mode: Property<PresentationMode>,
    auto_hidden: Property<bool>,
    host_events: mpsc::UnboundedSender<HostEvent>,
    grace_delay: Duration,
    auto_hide_delay: Duration,
}

impl VisibilityLoop {
    async fn run(mut self) {
        let mut grace = ResettableTimer::new();
        let mut auto_hide = ResettableTimer::new();

        while let Some(event) = self.events.recv().await {
            let effects = self.machine.handle(event);
            self.mode.set(self.machine.mode());
            self.auto_hidden.set(self.machine.auto_hidden());

            for effect in effects {
                match effect {
                    Effect::ArmGrace => {
                        let tx = self.events_tx.clone();
                        grace.arm(self.grace_delay, move || {
                            let _ = tx.send(VisibilityEvent::GraceElapsed);
                        });
                    }
                    Effect::CancelGrace => grace.cancel(),
                    Effect::ArmAutoHide => {
                        let tx = self.events_tx.clone();
                        auto_hide.arm(self.auto_hide_delay, move || {
                            let _ = tx.send(VisibilityEvent::AutoHideElapsed);
                        });
                    }
                    Effect::CancelAutoHide => auto_hide.cancel(),
                    Effect::ModeChanged(mode) => {
                        let _ = self.host_events.send(HostEvent::ModeChanged(mode));
                    }
                }
            }
        }
    }
}
