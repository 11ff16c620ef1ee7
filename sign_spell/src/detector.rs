//! Continuous detection loop: poll one hand pose per frame, classify it,
//! report the letter, draw the overlay.
//!
//! The controller is a plain `Idle → Running → Idle` state machine. The
//! surrounding frame loop calls [`Detector::cycle`] once per frame while
//! Running; cancellation is cooperative and level-triggered — a `stop()` is
//! observed at the top of the next cycle, and a poll already in flight when
//! the stop arrives completes normally but its result is discarded.
//!
//! All capabilities sit behind traits so the loop runs identically against
//! the keyboard simulator, a real camera backend, or test fakes.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use hand_pose::{HandPose, Landmark, CONNECTIONS};
use sign_alphabet::{classify, Letter};

// ════════════════════════════════════════════════════════════════════════════
// Frame / Capture
// ════════════════════════════════════════════════════════════════════════════

/// One video frame, ARGB pixels row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Frame {
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Frame { width, height, pixels: vec![color; width * height] }
    }
}

/// What the keypoint source yields each polling cycle: the frame plus zero
/// or more hand estimates. Only `hands[0]` is consumed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Capture {
    pub frame: Frame,
    pub hands: Vec<HandPose>,
}

impl Default for Frame {
    fn default() -> Self {
        Frame { width: 0, height: 0, pixels: Vec::new() }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Capability seams
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The camera / media stream vanished between cycles. Transient: the
    /// loop skips the cycle and keeps running.
    #[error("camera stream unavailable")]
    StreamUnavailable,
    #[error("pose estimation failed: {0}")]
    Estimation(String),
}

/// Supplies at most one hand pose per video frame. Polling may suspend
/// until the estimate for the current frame is available.
pub trait KeypointSource {
    fn poll(&mut self) -> Result<Capture, SourceError>;
}

#[derive(Debug, thiserror::Error)]
#[error("renderer failure: {0}")]
pub struct RenderError(pub String);

/// Overlay drawing surface. The loop calls these strictly in the order
/// frame → points → connections each cycle; failures are non-fatal.
pub trait Renderer {
    fn draw_frame(&mut self, frame: &Frame) -> Result<(), RenderError>;
    fn draw_points(&mut self, points: &[Landmark]) -> Result<(), RenderError>;
    fn draw_connections(
        &mut self,
        points: &[Landmark],
        pairs: &[(usize, usize)],
    ) -> Result<(), RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("detection consumer disconnected")]
    Disconnected,
    #[error("{0}")]
    Other(String),
}

/// Consumer of classified letters. Invoked at most once per cycle, with no
/// debouncing: identical letters across consecutive cycles each fire.
pub trait DetectionSink {
    fn on_detection(&mut self, letter: Letter) -> Result<(), SinkError>;
}

impl DetectionSink for Sender<Letter> {
    fn on_detection(&mut self, letter: Letter) -> Result<(), SinkError> {
        self.send(letter).map_err(|_| SinkError::Disconnected)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("no keypoint source available")]
    SourceUnavailable,
    #[error("no renderer available")]
    RendererUnavailable,
}

// ════════════════════════════════════════════════════════════════════════════
// Session flag — shared cooperative-cancellation state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct SessionFlag {
    running: AtomicBool,
    epoch: AtomicU64,
}

/// Cloneable stop handle. A cycle whose entry epoch no longer matches the
/// session's — because a stop, or a stop/start pair, arrived while its poll
/// was in flight — discards its result instead of acting on it.
#[derive(Clone, Debug)]
pub struct SessionHandle(Arc<SessionFlag>);

impl SessionHandle {
    pub fn stop(&self) {
        self.0.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.0.running.load(Ordering::SeqCst)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Detector
// ════════════════════════════════════════════════════════════════════════════

/// The detection loop controller. Owns its capabilities and the session
/// state; single-writer on both.
pub struct Detector<S, R, K> {
    source: Option<S>,
    renderer: Option<R>,
    sink: K,
    session: Arc<SessionFlag>,
}

impl<S, R, K> Detector<S, R, K>
where
    S: KeypointSource,
    R: Renderer,
    K: DetectionSink,
{
    pub fn new(source: Option<S>, renderer: Option<R>, sink: K) -> Self {
        Detector {
            source,
            renderer,
            sink,
            session: Arc::new(SessionFlag::default()),
        }
    }

    /// Transition Idle → Running. A no-op when already Running; an error
    /// when a capability is absent, in which case the loop stays Idle.
    pub fn start(&mut self) -> Result<(), StartError> {
        if self.is_running() {
            return Ok(());
        }
        if self.source.is_none() {
            return Err(StartError::SourceUnavailable);
        }
        if self.renderer.is_none() {
            return Err(StartError::RendererUnavailable);
        }
        self.session.epoch.fetch_add(1, Ordering::SeqCst);
        self.session.running.store(true, Ordering::SeqCst);
        log::info!("detection started");
        Ok(())
    }

    /// Transition Running → Idle. Level-triggered: an in-flight poll is not
    /// interrupted, only its result is suppressed.
    pub fn stop(&self) {
        self.session.running.store(false, Ordering::SeqCst);
        log::info!("detection stopped");
    }

    pub fn is_running(&self) -> bool {
        self.session.running.load(Ordering::SeqCst)
    }

    /// Handle for stopping the session from elsewhere (input handler, a
    /// source callback, another thread).
    pub fn handle(&self) -> SessionHandle {
        SessionHandle(Arc::clone(&self.session))
    }

    /// The renderer, for presenting its surface after a cycle.
    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    /// Run one polling cycle. Does nothing when Idle. Any failure inside a
    /// cycle is logged and confined to that cycle — the session stays
    /// Running and the next frame gets a fresh cycle.
    pub fn cycle(&mut self) {
        let entered = self.session.epoch.load(Ordering::SeqCst);
        if !self.is_running() {
            return;
        }
        let (source, renderer) = match (self.source.as_mut(), self.renderer.as_mut()) {
            (Some(s), Some(r)) => (s, r),
            _ => return,
        };

        let capture = match source.poll() {
            Ok(c) => c,
            Err(e) => {
                log::warn!("pose acquisition failed, skipping cycle: {e}");
                return;
            }
        };

        // Superseded while the poll was in flight: discard the result.
        if !self.session.running.load(Ordering::SeqCst)
            || self.session.epoch.load(Ordering::SeqCst) != entered
        {
            return;
        }

        let hand = capture.hands.first();

        if let Some(letter) = hand.and_then(classify) {
            if let Err(e) = self.sink.on_detection(letter) {
                log::warn!("detection sink failed: {e}");
            }
        }

        if let Err(e) = renderer.draw_frame(&capture.frame) {
            log::warn!("renderer failed on frame: {e}");
        }
        if let Some(pose) = hand {
            if let Err(e) = renderer.draw_points(pose.points()) {
                log::warn!("renderer failed on points: {e}");
            }
            if let Err(e) = renderer.draw_connections(pose.points(), &CONNECTIONS) {
                log::warn!("renderer failed on connections: {e}");
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
