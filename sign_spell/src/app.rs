//! Top-level application state machine.
//!
//! `AppState` owns the detection loop, the playback sequencer, the simulated
//! keypoint source's shape selector, and the detected-letter buffer. It
//! processes [`InputEvent`]s and runs one detection cycle per frame while
//! detection is on. Everything except the window itself lives here, so the
//! state machine is fully testable headless.

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

use sign_alphabet::Letter;

use crate::detector::Detector;
use crate::sequencer::{
    Sequencer, DEFAULT_ADVANCE_INTERVAL, MAX_ADVANCE_INTERVAL, MIN_ADVANCE_INTERVAL,
};
use crate::sim::{SimKeypointSource, SimShape, SimShapeHandle};
use crate::visualizer::{AppView, VideoPanel, Visualizer};

/// Keep the on-screen detected buffer from growing without bound.
const DETECTED_CAP: usize = 42;

// ════════════════════════════════════════════════════════════════════════════
// InputEvent
// ════════════════════════════════════════════════════════════════════════════

/// One user action, produced by the window's key handler (or by tests).
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Start detection when idle, stop it when running.
    ToggleDetection,
    /// Pick the simulated hand shape.
    SelectShape(SimShape),
    /// Begin playback of the phrase.
    Play,
    /// Cancel playback.
    Reset,
    /// Replace the phrase.
    SetPhrase(String),
    /// Ask for a new phrase on the terminal (run loop prompts, then sends
    /// `SetPhrase`).
    EditPhrase,
    /// Clear the detected-letter buffer.
    ClearDetected,
    /// Quit the application.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

pub struct AppConfig {
    pub phrase: String,
    /// Cadence of the playback display. Clamp with
    /// [`AppConfig::clamp_interval`] when taking user input.
    pub advance_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            phrase: "HELLO WORLD".to_string(),
            advance_interval: DEFAULT_ADVANCE_INTERVAL,
        }
    }
}

impl AppConfig {
    /// Constrain a user-supplied cadence to the supported 2–3 s window.
    pub fn clamp_interval(interval: Duration) -> Duration {
        interval.clamp(MIN_ADVANCE_INTERVAL, MAX_ADVANCE_INTERVAL)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    detector: Detector<SimKeypointSource, VideoPanel, Sender<Letter>>,
    detection_rx: Receiver<Letter>,
    shape: SimShapeHandle,
    sequencer: Sequencer,
    detected: String,
    pub status: String,
}

impl AppState {
    pub fn new(cfg: AppConfig) -> Self {
        let (source, shape) = SimKeypointSource::new();
        let panel = VideoPanel::new(crate::sim::SIM_FRAME_W, crate::sim::SIM_FRAME_H);
        let (tx, detection_rx) = mpsc::channel();
        let detector = Detector::new(Some(source), Some(panel), tx);

        let sequencer = Sequencer::new(cfg.advance_interval);
        sequencer.set_source_text(&cfg.phrase);

        AppState {
            detector,
            detection_rx,
            shape,
            sequencer,
            detected: String::new(),
            status: format!(
                "Ready — phrase \"{}\", {}ms per letter",
                cfg.phrase,
                cfg.advance_interval.as_millis()
            ),
        }
    }

    // ── Process one InputEvent ────────────────────────────────────────────

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::ToggleDetection => {
                if self.detector.is_running() {
                    self.detector.stop();
                    self.status = "Detection stopped".to_string();
                } else {
                    match self.detector.start() {
                        Ok(()) => self.status = "Detection running".to_string(),
                        Err(e) => self.status = format!("Cannot start detection: {}", e),
                    }
                }
            }

            InputEvent::SelectShape(shape) => {
                self.shape.set(shape);
                self.status = format!("Sim hand: {}", shape.label());
            }

            InputEvent::Play => {
                self.sequencer.play();
                self.status = if self.sequencer.is_running() {
                    format!("Playing {} letters", self.sequencer.letters().len())
                } else {
                    "Nothing to play — set a phrase with letters first".to_string()
                };
            }

            InputEvent::Reset => {
                self.sequencer.reset();
                self.status = "Playback reset".to_string();
            }

            InputEvent::SetPhrase(text) => {
                self.sequencer.set_source_text(&text);
                self.status = format!(
                    "Phrase \"{}\" — {} letters",
                    self.sequencer.source_text(),
                    self.sequencer.letters().len()
                );
            }

            InputEvent::ClearDetected => {
                self.detected.clear();
                self.status = "Detected letters cleared".to_string();
            }

            // Handled by the run loop (terminal prompt / shutdown).
            InputEvent::EditPhrase | InputEvent::Quit => {}
        }
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    pub fn tick(&mut self) {
        if self.detector.is_running() {
            self.detector.cycle();
        }
        while let Ok(letter) = self.detection_rx.try_recv() {
            self.detected.push(letter.as_char());
        }
        if self.detected.len() > DETECTED_CAP {
            let cut = self.detected.len() - DETECTED_CAP;
            self.detected.drain(..cut);
        }
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn detected(&self) -> &str {
        &self.detected
    }

    pub fn is_detecting(&self) -> bool {
        self.detector.is_running()
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn view(&self) -> AppView<'_> {
        AppView {
            panel: self.detector.renderer(),
            detecting: self.detector.is_running(),
            sim_shape: self.shape.get(),
            detected: &self.detected,
            phrase: self.sequencer.source_text(),
            letters: self.sequencer.letters().iter().map(Letter::as_char).collect(),
            current_letter: self.sequencer.current_letter(),
            progress: self.sequencer.progress(),
            status: &self.status,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application. Creates the window, wires the input channel,
/// and drives the event/detect/render loop at ~60 fps.
pub fn run(cfg: AppConfig) -> Result<(), String> {
    let (input_tx, input_rx) = mpsc::channel::<InputEvent>();
    let mut vis = Visualizer::new(input_tx)?;
    let mut app = AppState::new(cfg);

    while vis.is_open() {
        if !vis.poll_input() {
            break;
        }

        loop {
            match input_rx.try_recv() {
                Ok(InputEvent::Quit) => return Ok(()),
                Ok(InputEvent::EditPhrase) => {
                    let phrase = prompt_phrase();
                    if !phrase.is_empty() {
                        app.handle_input(InputEvent::SetPhrase(phrase));
                    }
                }
                Ok(event) => app.handle_input(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }

        app.tick();
        vis.render(&app.view());
    }

    Ok(())
}

/// Read a new phrase from the terminal. Playback keeps its current sequence
/// if one is running; the sequencer ignores the edit in that case.
fn prompt_phrase() -> String {
    print!("  Phrase: ");
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn make_app() -> AppState {
        AppState::new(AppConfig {
            phrase: "AB".to_string(),
            advance_interval: Duration::from_millis(60),
        })
    }

    #[test]
    fn toggle_starts_and_stops_detection() {
        let mut app = make_app();
        assert!(!app.is_detecting());
        app.handle_input(InputEvent::ToggleDetection);
        assert!(app.is_detecting());
        app.handle_input(InputEvent::ToggleDetection);
        assert!(!app.is_detecting());
    }

    #[test]
    fn detection_cycles_accumulate_letters_without_debouncing() {
        let mut app = make_app();
        app.handle_input(InputEvent::ToggleDetection);
        app.handle_input(InputEvent::SelectShape(SimShape::Fist));
        app.tick();
        app.tick();
        assert_eq!(app.detected(), "AA");
    }

    #[test]
    fn no_hand_produces_no_letters() {
        let mut app = make_app();
        app.handle_input(InputEvent::ToggleDetection);
        app.tick();
        app.tick();
        assert_eq!(app.detected(), "");
    }

    #[test]
    fn idle_ticks_do_not_poll_the_source() {
        let mut app = make_app();
        app.handle_input(InputEvent::SelectShape(SimShape::FlatHand));
        app.tick();
        assert_eq!(app.detected(), "");
    }

    #[test]
    fn clear_empties_the_detected_buffer() {
        let mut app = make_app();
        app.handle_input(InputEvent::ToggleDetection);
        app.handle_input(InputEvent::SelectShape(SimShape::CuppedHand));
        app.tick();
        assert_eq!(app.detected(), "C");
        app.handle_input(InputEvent::ClearDetected);
        assert_eq!(app.detected(), "");
    }

    #[test]
    fn detected_buffer_is_capped() {
        let mut app = make_app();
        app.handle_input(InputEvent::ToggleDetection);
        app.handle_input(InputEvent::SelectShape(SimShape::Fist));
        for _ in 0..(DETECTED_CAP + 20) {
            app.tick();
        }
        assert_eq!(app.detected().len(), DETECTED_CAP);
        assert!(app.detected().chars().all(|c| c == 'A'));
    }

    #[test]
    fn play_and_reset_drive_the_sequencer() {
        let mut app = make_app();
        app.handle_input(InputEvent::Play);
        assert!(app.sequencer().is_running());
        assert_eq!(app.sequencer().current_index(), Some(0));
        app.handle_input(InputEvent::Reset);
        assert!(!app.sequencer().is_running());
        assert_eq!(app.sequencer().current_index(), None);
    }

    #[test]
    fn set_phrase_refilters_letters() {
        let mut app = make_app();
        app.handle_input(InputEvent::SetPhrase("Go 2 the zoo!".to_string()));
        let letters: String = app
            .sequencer()
            .letters()
            .iter()
            .map(Letter::as_char)
            .collect();
        assert_eq!(letters, "GOTHEZOO");
    }

    #[test]
    fn phrase_edit_during_playback_is_ignored() {
        let mut app = make_app();
        app.handle_input(InputEvent::Play);
        app.handle_input(InputEvent::SetPhrase("XYZ".to_string()));
        let letters: String = app
            .sequencer()
            .letters()
            .iter()
            .map(Letter::as_char)
            .collect();
        assert_eq!(letters, "AB");
        app.handle_input(InputEvent::Reset);
    }

    #[test]
    fn view_reflects_playback_state() {
        let mut app = make_app();
        app.handle_input(InputEvent::Play);
        let view = app.view();
        assert_eq!(view.current_letter.map(|l| l.as_char()), Some('A'));
        assert_eq!(view.progress, Some((1, 2)));
        app.handle_input(InputEvent::Reset);
        let view = app.view();
        assert!(view.current_letter.is_none());
    }

    #[test]
    fn interval_clamping() {
        assert_eq!(
            AppConfig::clamp_interval(Duration::from_millis(500)),
            MIN_ADVANCE_INTERVAL
        );
        assert_eq!(
            AppConfig::clamp_interval(Duration::from_secs(10)),
            MAX_ADVANCE_INTERVAL
        );
        let mid = Duration::from_millis(2500);
        assert_eq!(AppConfig::clamp_interval(mid), mid);
    }
}
