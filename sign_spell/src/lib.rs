//! # sign_spell
//!
//! Two-way fingerspelling translator built on the `hand_pose` landmark model
//! and the `sign_alphabet` classifier:
//!
//! * **Detection** — a continuous loop polls a [`detector::KeypointSource`]
//!   for one hand pose per frame, classifies it, reports letters to a
//!   [`detector::DetectionSink`], and draws the landmark skeleton through a
//!   [`detector::Renderer`].
//! * **Playback** — the [`sequencer::Sequencer`] steps through the spellable
//!   letters of a phrase on a fixed cadence, showing one instructional
//!   display at a time.
//!
//! ## Key bindings
//!
//! | Key | Action |
//! |---|---|
//! | `D` | Start / stop the detection loop |
//! | `1` / `2` / `3` | Simulated hand: fist / flat hand / cupped hand |
//! | `0` | Simulated hand: none |
//! | `Space` | Play the phrase, one letter per interval |
//! | `R` | Reset playback |
//! | `T` | Type a new phrase (terminal prompt) |
//! | `C` | Clear the detected-letter buffer |
//! | `Q` | Quit |
//!
//! There is no camera or machine-learning backend here: the
//! [`sim::SimKeypointSource`] synthesises poses the keyboard selects, and a
//! real backend would plug in behind the same [`detector::KeypointSource`]
//! seam.

pub mod app;
pub mod detector;
pub mod sequencer;
pub mod sim;
pub mod visualizer;
