//! Timed text-to-sign playback.
//!
//! The sequencer owns a phrase, derives its spellable letters, and advances
//! through them one per interval on a timer thread. The state machine is
//! `Idle → Running(index) → … → Idle`, with a single terminal transition per
//! completed `play()`. Cancellation is epoch-based: `play()` and `reset()`
//! bump the epoch under the state lock, so a pending advance that wakes up
//! with a stale epoch exits without touching anything — two overlapping
//! advance chains cannot both act.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use sign_alphabet::Letter;

/// Default letter cadence: three seconds leaves time to read the
/// instruction and shape the hand.
pub const DEFAULT_ADVANCE_INTERVAL: Duration = Duration::from_secs(3);
/// Configuration bounds for the cadence. The sequencer itself accepts any
/// interval (tests run fast); the interactive configurator clamps to these.
pub const MIN_ADVANCE_INTERVAL: Duration = Duration::from_secs(2);
pub const MAX_ADVANCE_INTERVAL: Duration = Duration::from_secs(3);

// ════════════════════════════════════════════════════════════════════════════
// State
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct SeqInner {
    source_text: String,
    letters: Vec<Letter>,
    current: Option<usize>,
    running: bool,
    epoch: u64,
}

/// The playback sequencer. Cheap accessors snapshot state under a mutex;
/// the advance chain runs on its own thread per `play()`.
pub struct Sequencer {
    inner: Arc<Mutex<SeqInner>>,
    interval: Duration,
}

impl Sequencer {
    pub fn new(interval: Duration) -> Self {
        Sequencer {
            inner: Arc::new(Mutex::new(SeqInner::default())),
            interval,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SeqInner> {
        // A panicked advance thread must not wedge playback controls.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the phrase and recompute its spellable letters. Ignored
    /// entirely while a playback is running — mid-playback edits must not
    /// corrupt the active sequence.
    pub fn set_source_text(&self, text: &str) {
        let mut s = self.lock();
        if s.running {
            log::debug!("phrase edit ignored during playback");
            return;
        }
        s.source_text = text.to_string();
        s.letters = Letter::sequence(text);
    }

    /// Begin playback from the first letter. A no-op when already running or
    /// when the phrase has no spellable letters.
    pub fn play(&self) {
        let epoch = {
            let mut s = self.lock();
            if s.running || s.letters.is_empty() {
                return;
            }
            s.epoch += 1;
            s.running = true;
            s.current = Some(0);
            s.epoch
        };
        let inner = Arc::clone(&self.inner);
        let interval = self.interval;
        thread::spawn(move || advance_chain(inner, interval, epoch));
    }

    /// Cancel any pending advance and return to Idle. Idempotent.
    pub fn reset(&self) {
        let mut s = self.lock();
        s.epoch += 1;
        s.running = false;
        s.current = None;
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    pub fn current_index(&self) -> Option<usize> {
        self.lock().current
    }

    /// The letter currently on display, when playback is mid-sequence.
    pub fn current_letter(&self) -> Option<Letter> {
        let s = self.lock();
        s.current.and_then(|i| s.letters.get(i).copied())
    }

    /// One-based "letter i of n" for the display, when active.
    pub fn progress(&self) -> Option<(usize, usize)> {
        let s = self.lock();
        s.current.map(|i| (i + 1, s.letters.len()))
    }

    pub fn letters(&self) -> Vec<Letter> {
        self.lock().letters.clone()
    }

    pub fn source_text(&self) -> String {
        self.lock().source_text.clone()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Advance chain — one thread per play()
// ════════════════════════════════════════════════════════════════════════════

fn advance_chain(inner: Arc<Mutex<SeqInner>>, interval: Duration, epoch: u64) {
    loop {
        thread::sleep(interval);
        let mut s = inner.lock().unwrap_or_else(PoisonError::into_inner);
        if s.epoch != epoch || !s.running {
            // Superseded by reset() or a later play(); this chain is dead.
            return;
        }
        match s.current {
            Some(i) if i + 1 < s.letters.len() => {
                s.current = Some(i + 1);
            }
            _ => {
                // Terminal transition, reached exactly once per run.
                s.running = false;
                s.current = None;
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    // Fast cadence for tests; assertions land well between advances.
    const TICK: Duration = Duration::from_millis(60);

    fn settle(n: u32) {
        thread::sleep(TICK * n / 2);
    }

    fn seq(text: &str) -> Sequencer {
        let s = Sequencer::new(TICK);
        s.set_source_text(text);
        s
    }

    fn chars(letters: &[Letter]) -> String {
        letters.iter().map(Letter::as_char).collect()
    }

    #[test]
    fn source_text_is_filtered_to_letters() {
        let s = seq("Hello, World! 123");
        assert_eq!(chars(&s.letters()), "HELLOWORLD");
        assert_eq!(s.source_text(), "Hello, World! 123");
    }

    #[test]
    fn play_with_no_letters_is_a_noop() {
        let s = seq("123 !?");
        s.play();
        assert!(!s.is_running());
        assert_eq!(s.current_index(), None);
    }

    #[test]
    fn play_starts_at_the_first_letter() {
        let s = seq("ab");
        s.play();
        assert!(s.is_running());
        assert_eq!(s.current_index(), Some(0));
        assert_eq!(s.current_letter().map(|l| l.as_char()), Some('A'));
        assert_eq!(s.progress(), Some((1, 2)));
        s.reset();
    }

    #[test]
    fn full_run_visits_each_letter_once_then_terminates() {
        let s = seq("AB");
        s.play();
        assert_eq!(s.current_index(), Some(0));
        settle(3); // past the first advance
        assert_eq!(s.current_index(), Some(1));
        settle(3); // past the terminal advance
        assert!(!s.is_running());
        assert_eq!(s.current_index(), None);
        // Terminal state is stable: nothing revisits index 0.
        settle(3);
        assert_eq!(s.current_index(), None);
        assert!(!s.is_running());
    }

    #[test]
    fn reset_cancels_the_pending_advance() {
        let s = seq("ABC");
        s.play();
        s.reset();
        assert!(!s.is_running());
        assert_eq!(s.current_index(), None);
        // Wait past the configured interval: the cancelled chain must not
        // move the index.
        settle(4);
        assert_eq!(s.current_index(), None);
        assert!(!s.is_running());
    }

    #[test]
    fn reset_is_idempotent() {
        let s = seq("AB");
        s.play();
        s.reset();
        let after_once = (s.is_running(), s.current_index());
        s.reset();
        assert_eq!((s.is_running(), s.current_index()), after_once);
    }

    #[test]
    fn reset_on_idle_sequencer_is_harmless() {
        let s = seq("AB");
        s.reset();
        assert!(!s.is_running());
        assert_eq!(s.current_index(), None);
    }

    #[test]
    fn play_after_reset_starts_over() {
        let s = seq("AB");
        s.play();
        s.reset();
        s.play();
        assert_eq!(s.current_index(), Some(0));
        s.reset();
    }

    #[test]
    fn play_while_running_is_a_noop() {
        let s = seq("ABC");
        s.play();
        s.play();
        assert_eq!(s.current_index(), Some(0));
        // One advance later we are at index 1, not 0 again — no second
        // chain restarted the sequence.
        settle(3);
        assert_eq!(s.current_index(), Some(1));
        s.reset();
    }

    #[test]
    fn phrase_edits_during_playback_are_ignored() {
        let s = seq("AB");
        s.play();
        s.set_source_text("XYZ");
        assert_eq!(chars(&s.letters()), "AB");
        assert_eq!(s.source_text(), "AB");
        s.reset();
        // Once idle, edits apply again.
        s.set_source_text("XYZ");
        assert_eq!(chars(&s.letters()), "XYZ");
    }

    #[test]
    fn single_letter_run_terminates_after_one_interval() {
        let s = seq("Q");
        s.play();
        assert_eq!(s.current_letter().map(|l| l.as_char()), Some('Q'));
        settle(3);
        assert!(!s.is_running());
        assert_eq!(s.current_letter(), None);
    }
}
