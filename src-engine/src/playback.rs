//! Playback state management: the frame-acquisition and display-refresh
//! state machine.
//!
//! This module manages the playback lifecycle, including:
//! - Source loading (still image or video stream)
//! - The periodic tick driving video frame display
//! - Tool mode and stroke overlay state
//! - Compositing and saving annotated frames
//! - Event broadcasting to subscribed front-ends
//!
//! A loaded stream is advanced by a spawned tick task that exclusively owns
//! the `FrameStream`. The manager and the task share only the current-frame
//! cell and a stop flag, so a tick can never read from a half-released
//! source: `load` sets the flag and joins the task before touching anything
//! else.

use crate::compositor;
use crate::config;
use crate::encoder;
use crate::error::{EncodeError, LoadError, PlayerError, SaveError};
use crate::frame::Frame;
use crate::media::{FrameStream, MediaSource};
use crate::overlay::AnnotationOverlay;
use markpad_common::{PlayerState, StrokeColor, StrokePoint, StrokeRecord, ToolMode};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Mutex, RwLock};
use tracing::{info, warn};

/// Handle to stop an armed tick task.
pub type StopHandle = Arc<AtomicBool>;

/// Events broadcast to subscribed front-ends.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// Playback state changed
    StateChanged(PlayerState),
    /// A new source was loaded and its first frame published
    SourceLoaded {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    /// A tick published a new frame to the display sink
    FramePublished,
    /// The annotation tool changed
    ToolChanged(ToolMode),
    /// The player is shutting down
    Shutdown,
}

/// Accepts decoded frames for presentation.
///
/// Implementations must not block and must not call back into the
/// `PlaybackManager`; the hand-off is the only crossing between the tick
/// task and the presentation context.
pub trait DisplaySink: Send + Sync {
    fn present(&self, frame: Frame);
}

/// Stock sink backed by a bounded channel. Frames are dropped when the
/// presentation side lags rather than stalling the tick.
pub struct ChannelSink {
    tx: mpsc::Sender<Frame>,
}

impl ChannelSink {
    /// Create a sink and the receiver the presentation layer reads from.
    pub fn new(capacity: usize) -> (Arc<Self>, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Arc::new(Self { tx }), rx)
    }
}

impl DisplaySink for ChannelSink {
    fn present(&self, frame: Frame) {
        // Dropping on a full channel keeps the tick non-blocking
        let _ = self.tx.try_send(frame);
    }
}

/// The live state of one loaded source.
struct PlaybackSession {
    path: PathBuf,
    /// Most recently produced frame, shared with the tick task
    current: Arc<StdMutex<Frame>>,
    stop: StopHandle,
    tick_task: Option<tokio::task::JoinHandle<()>>,
}

/// Playback state manager: owns the loaded source, decides when a new
/// frame must be produced, and publishes frames to the display sink.
pub struct PlaybackManager {
    state: RwLock<PlayerState>,
    session: Mutex<Option<PlaybackSession>>,
    overlay: Mutex<AnnotationOverlay>,
    event_tx: broadcast::Sender<PlayerEvent>,
    sink: Arc<dyn DisplaySink>,
}

impl PlaybackManager {
    /// Create a manager publishing frames to `sink`. Ink defaults come
    /// from the user configuration.
    pub fn new(sink: Arc<dyn DisplaySink>) -> Self {
        let cfg = config::load_config();
        let mut overlay = AnnotationOverlay::new();
        overlay.set_style(cfg.ink.color, cfg.ink.width);

        let (event_tx, _) = broadcast::channel(100);
        Self {
            state: RwLock::new(PlayerState::Empty),
            session: Mutex::new(None),
            overlay: Mutex::new(overlay),
            event_tx,
            sink,
        }
    }

    /// Subscribe to player events.
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }

    /// Broadcast an event to all subscribers.
    fn broadcast(&self, event: PlayerEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.event_tx.send(event);
    }

    /// Get the current playback state.
    pub async fn state(&self) -> PlayerState {
        *self.state.read().await
    }

    /// Set the playback state and broadcast the change.
    async fn set_state(&self, new_state: PlayerState) {
        {
            let mut state = self.state.write().await;
            *state = new_state;
        }
        self.broadcast(PlayerEvent::StateChanged(new_state));
    }

    /// Path of the loaded source, if any.
    pub async fn source_path(&self) -> Option<PathBuf> {
        self.session.lock().await.as_ref().map(|s| s.path.clone())
    }

    /// Most recently produced frame, if any.
    pub async fn current_frame(&self) -> Option<Frame> {
        let session = self.session.lock().await;
        session
            .as_ref()
            .map(|s| s.current.lock().expect("frame cell poisoned").clone())
    }

    /// Load a media source from `path`, classifying it by extension.
    ///
    /// Any previously loaded source is fully released first: the old tick
    /// task is joined before its stream and frame are dropped, so no stale
    /// callback survives this call, whether the load succeeds or not. On
    /// success a first frame has already been published to the display
    /// sink, for streams as well as stills; on failure the player is empty.
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        // Disarm and join before opening: a failed open must still leave
        // the old timer stopped
        self.release_session().await;
        let source = match MediaSource::open(path) {
            Ok(source) => source,
            Err(e) => {
                self.set_state(PlayerState::Empty).await;
                return Err(e);
            }
        };
        self.load_source(path.to_path_buf(), source).await
    }

    /// Load an already-opened source (injection seam for front-ends and
    /// tests; `load` is the path-based convenience over this). A failed
    /// load leaves the player empty, never on the previous source.
    pub async fn load_source(
        &self,
        path: PathBuf,
        source: MediaSource,
    ) -> Result<(), LoadError> {
        self.release_session().await;
        match self.install_source(path, source).await {
            Ok(()) => Ok(()),
            Err(e) => {
                // The old session is already gone; the state must say so
                // rather than claim a frame that no longer exists
                self.set_state(PlayerState::Empty).await;
                Err(e)
            }
        }
    }

    async fn install_source(&self, path: PathBuf, source: MediaSource) -> Result<(), LoadError> {
        match source {
            MediaSource::Still(frame) => {
                if frame.is_empty() {
                    return Err(LoadError::DecodeFailed(
                        "decoded image has no pixels".to_string(),
                    ));
                }
                let (width, height) = (frame.width, frame.height);
                let current = Arc::new(StdMutex::new(frame.clone()));
                self.sink.present(frame);

                let mut session = self.session.lock().await;
                *session = Some(PlaybackSession {
                    path: path.clone(),
                    current,
                    stop: Arc::new(AtomicBool::new(false)),
                    tick_task: None,
                });
                drop(session);

                self.overlay.lock().await.clear();
                self.set_state(PlayerState::Still).await;
                self.broadcast(PlayerEvent::SourceLoaded {
                    path: path.clone(),
                    width,
                    height,
                });
                info!("Loaded still image {}x{}: {}", width, height, path.display());
                Ok(())
            }
            MediaSource::Stream(mut stream) => {
                // First-frame preview: every load yields an immediately
                // displayable frame before the tick is armed
                let first = stream
                    .read_next()
                    .map_err(|e| LoadError::StreamOpenFailed(e.to_string()))?
                    .ok_or_else(|| {
                        LoadError::StreamOpenFailed("stream produced no frames".to_string())
                    })?;
                let (width, height) = (first.width, first.height);
                let interval = match config::load_config().playback.interval_ms {
                    Some(ms) if ms > 0 => Duration::from_millis(ms),
                    _ => stream.frame_interval(),
                };
                let current = Arc::new(StdMutex::new(first.clone()));
                self.sink.present(first);

                let stop: StopHandle = Arc::new(AtomicBool::new(false));
                let tick_task =
                    self.arm_playback(stream, interval, current.clone(), stop.clone());

                let mut session = self.session.lock().await;
                *session = Some(PlaybackSession {
                    path: path.clone(),
                    current,
                    stop,
                    tick_task: Some(tick_task),
                });
                drop(session);

                self.overlay.lock().await.clear();
                self.set_state(PlayerState::Playing).await;
                self.broadcast(PlayerEvent::SourceLoaded {
                    path: path.clone(),
                    width,
                    height,
                });
                info!(
                    "Loaded stream {}x{} at {:?}/frame: {}",
                    width,
                    height,
                    interval,
                    path.display()
                );
                Ok(())
            }
        }
    }

    /// Spawn the periodic tick task. The task owns the stream; each tick
    /// checks the stop flag, reads one frame, and publishes it. Exhaustion
    /// and transient read errors both rewind to the start, so the stream
    /// never ends from the player's perspective.
    fn arm_playback(
        &self,
        mut stream: Box<dyn FrameStream>,
        interval: Duration,
        current: Arc<StdMutex<Frame>>,
        stop: StopHandle,
    ) -> tokio::task::JoinHandle<()> {
        let sink = self.sink.clone();
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first interval tick completes immediately; consume it so
            // the eager preview frame stays the only publish at load time
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if stop.load(Ordering::SeqCst) {
                    break;
                }
                match stream.read_next() {
                    Ok(Some(frame)) => {
                        *current.lock().expect("frame cell poisoned") = frame.clone();
                        sink.present(frame);
                        let _ = event_tx.send(PlayerEvent::FramePublished);
                    }
                    Ok(None) => {
                        // End of stream: loop back, publish nothing this tick
                        if let Err(e) = stream.rewind() {
                            warn!("Failed to rewind stream: {}", e);
                        }
                    }
                    Err(e) => {
                        warn!("Frame read failed, restarting stream: {}", e);
                        if let Err(e) = stream.rewind() {
                            warn!("Failed to rewind stream: {}", e);
                        }
                    }
                }
            }
        })
    }

    /// Release the current session: disarm the tick, wait out any in-flight
    /// tick body, then drop the stream and frame. No-op when nothing is
    /// loaded; safe to call repeatedly.
    async fn release_session(&self) {
        let old = self.session.lock().await.take();
        if let Some(mut session) = old {
            session.stop.store(true, Ordering::SeqCst);
            if let Some(task) = session.tick_task.take() {
                if let Err(e) = task.await {
                    warn!("Tick task ended abnormally: {}", e);
                }
            }
            // Stream and current frame drop here, after the join
        }
    }

    /// Set the annotation tool. Has no effect while no source is loaded.
    pub async fn set_tool_mode(&self, mode: ToolMode) {
        if *self.state.read().await == PlayerState::Empty {
            return;
        }
        self.overlay.lock().await.set_mode(mode);
        self.broadcast(PlayerEvent::ToolChanged(mode));
    }

    /// Current annotation tool.
    pub async fn tool_mode(&self) -> ToolMode {
        self.overlay.lock().await.mode()
    }

    /// Set the ink style for subsequently drawn strokes.
    pub async fn set_ink_style(&self, color: StrokeColor, width: f32) {
        self.overlay.lock().await.set_style(color, width);
    }

    /// Begin a stroke at `point` (canvas passthrough).
    pub async fn begin_stroke(&self, point: StrokePoint) {
        self.overlay.lock().await.begin_stroke(point);
    }

    /// Extend the in-progress stroke (canvas passthrough).
    pub async fn extend_stroke(&self, point: StrokePoint) {
        self.overlay.lock().await.extend_stroke(point);
    }

    /// Finish the in-progress stroke (canvas passthrough).
    pub async fn finish_stroke(&self) {
        self.overlay.lock().await.finish_stroke();
    }

    /// Install a pre-recorded stroke set (stroke sidecar files).
    pub async fn install_strokes(&self, strokes: Vec<StrokeRecord>) {
        self.overlay.lock().await.install_strokes(strokes);
    }

    /// Drop all recorded strokes.
    pub async fn clear_overlay(&self) {
        self.overlay.lock().await.clear();
    }

    /// Composite the current frame with the rendered stroke overlay.
    ///
    /// Additive blend, clamped; an empty overlay yields a frame identical
    /// to the displayed one.
    pub async fn composite(&self) -> Result<Frame, PlayerError> {
        let base = self
            .current_frame()
            .await
            .ok_or(PlayerError::NoActiveFrame)?;
        let rendered = self.overlay.lock().await.render(base.width, base.height);
        compositor::composite(&base, &rendered)
    }

    /// Encode `frame` to `path` via the external encoder.
    pub fn save(&self, path: &Path, frame: &Frame) -> Result<(), EncodeError> {
        encoder::save_frame(path, frame)
    }

    /// Composite and save in one step. With no explicit path, a
    /// timestamped file in the configured output directory is used.
    /// Returns the path written.
    pub async fn save_annotated(&self, path: Option<PathBuf>) -> Result<PathBuf, SaveError> {
        let composite = self.composite().await?;
        let path = match path {
            Some(p) => p,
            None => encoder::generate_output_path()?,
        };
        self.save(&path, &composite)?;
        Ok(path)
    }

    /// Release all resources and return to the empty state.
    pub async fn shutdown(&self) {
        self.release_session().await;
        self.overlay.lock().await.clear();
        self.set_state(PlayerState::Empty).await;
        self.broadcast(PlayerEvent::Shutdown);
        info!("Playback shut down");
    }
}
