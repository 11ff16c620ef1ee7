//! Simulated keypoint source.
//!
//! Stands in for a camera + pose-estimation backend the same way a keyboard
//! simulator stands in for absent hardware: the window's number keys pick
//! one of the synthetic hand shapes, and each poll yields a synthetic video
//! frame plus that shape with a slight wobble so the overlay visibly
//! tracks. A real backend would implement [`KeypointSource`] instead.

use std::sync::{Arc, Mutex, PoisonError};

use hand_pose::{synth, HandPose};

use crate::detector::{Capture, Frame, KeypointSource, SourceError};

/// Native resolution of the simulated camera.
pub const SIM_FRAME_W: usize = 640;
pub const SIM_FRAME_H: usize = 480;

// ════════════════════════════════════════════════════════════════════════════
// Shape selection
// ════════════════════════════════════════════════════════════════════════════

/// Which synthetic hand the simulator is currently showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimShape {
    #[default]
    NoHand,
    Fist,
    FlatHand,
    CuppedHand,
}

impl SimShape {
    pub fn label(&self) -> &'static str {
        match self {
            SimShape::NoHand => "no hand",
            SimShape::Fist => "fist",
            SimShape::FlatHand => "flat hand",
            SimShape::CuppedHand => "cupped hand",
        }
    }
}

/// Shared selector: the window loop sets it, the source reads it each poll.
#[derive(Clone, Debug, Default)]
pub struct SimShapeHandle(Arc<Mutex<SimShape>>);

impl SimShapeHandle {
    pub fn set(&self, shape: SimShape) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = shape;
    }

    pub fn get(&self) -> SimShape {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimKeypointSource
// ════════════════════════════════════════════════════════════════════════════

pub struct SimKeypointSource {
    shape: SimShapeHandle,
    frame_no: u64,
}

impl SimKeypointSource {
    pub fn new() -> (Self, SimShapeHandle) {
        let shape = SimShapeHandle::default();
        (
            SimKeypointSource { shape: shape.clone(), frame_no: 0 },
            shape,
        )
    }

    /// A dim vertical gradient, cheap to produce every cycle.
    fn background(&self) -> Frame {
        let mut pixels = vec![0u32; SIM_FRAME_W * SIM_FRAME_H];
        for row in 0..SIM_FRAME_H {
            let shade = 0x18u32 + (row * 0x20 / SIM_FRAME_H) as u32;
            let color = 0xFF000000 | (shade << 16) | (shade << 8) | (shade + 0x10);
            let start = row * SIM_FRAME_W;
            pixels[start..start + SIM_FRAME_W].fill(color);
        }
        Frame { width: SIM_FRAME_W, height: SIM_FRAME_H, pixels }
    }

    fn pose(&self) -> Option<HandPose> {
        match self.shape.get() {
            SimShape::NoHand => None,
            SimShape::Fist => Some(synth::closed_fist()),
            SimShape::FlatHand => Some(synth::flat_hand()),
            SimShape::CuppedHand => Some(synth::cupped_hand()),
        }
    }
}

impl KeypointSource for SimKeypointSource {
    fn poll(&mut self) -> Result<Capture, SourceError> {
        self.frame_no += 1;
        let t = self.frame_no as f32;
        // Translation-only wobble: classification is unaffected.
        let dx = (t * 0.11).sin() * 5.0;
        let dy = (t * 0.07).cos() * 4.0;
        let hands = self
            .pose()
            .map(|p| p.translated(dx, dy))
            .into_iter()
            .collect();
        Ok(Capture { frame: self.background(), hands })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use sign_alphabet::classify;

    #[test]
    fn default_shape_yields_no_hands() {
        let (mut source, _) = SimKeypointSource::new();
        let capture = source.poll().unwrap();
        assert!(capture.hands.is_empty());
        assert_eq!(capture.frame.width, SIM_FRAME_W);
        assert_eq!(capture.frame.height, SIM_FRAME_H);
    }

    #[test]
    fn selected_shapes_classify_as_their_letters() {
        let (mut source, shape) = SimKeypointSource::new();
        for (s, expect) in [
            (SimShape::Fist, 'A'),
            (SimShape::FlatHand, 'B'),
            (SimShape::CuppedHand, 'C'),
        ] {
            shape.set(s);
            let capture = source.poll().unwrap();
            let letter = classify(&capture.hands[0]);
            assert_eq!(letter.map(|l| l.as_char()), Some(expect), "{:?}", s);
        }
    }

    #[test]
    fn wobble_never_breaks_classification() {
        let (mut source, shape) = SimKeypointSource::new();
        shape.set(SimShape::CuppedHand);
        for _ in 0..120 {
            let capture = source.poll().unwrap();
            assert_eq!(
                classify(&capture.hands[0]).map(|l| l.as_char()),
                Some('C')
            );
        }
    }
}
