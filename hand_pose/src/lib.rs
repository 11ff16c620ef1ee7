//! # hand_pose
//!
//! Data model for a single estimated hand: 21 named landmarks in the
//! MediaPipe index convention, the fixed skeleton adjacency used for overlay
//! rendering, and synthetic pose builders for the simulator and for tests.
//!
//! Frame space: `x` grows rightward, `y` grows **downward** (screen space),
//! `z` is optional depth and is `0.0` for 2D sources.
//!
//! A pose is *complete* when it carries exactly [`LANDMARK_COUNT`] points in
//! index order. Anything shorter is not an error — downstream consumers treat
//! it as "no detection".

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices (MediaPipe hand landmark convention)
// ════════════════════════════════════════════════════════════════════════════

/// Landmark indices. Tips sit at 4/8/12/16/20; each non-thumb finger's PIP
/// joint is two indices below its tip.
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// Number of landmarks in a complete hand pose.
pub const LANDMARK_COUNT: usize = 21;

/// The four non-thumb fingertip indices, thumb excluded.
pub const FINGERTIPS: [usize; 4] = [
    landmarks::INDEX_TIP,
    landmarks::MIDDLE_TIP,
    landmarks::RING_TIP,
    landmarks::PINKY_TIP,
];

/// Fixed skeleton adjacency: thumb chain 0-1-2-3-4, then index, middle, ring
/// and pinky each rooted at the wrist.
pub const CONNECTIONS: [(usize, usize); 20] = [
    (0, 1), (1, 2), (2, 3), (3, 4),       // thumb
    (0, 5), (5, 6), (6, 7), (7, 8),       // index
    (0, 9), (9, 10), (10, 11), (11, 12),  // middle
    (0, 13), (13, 14), (14, 15), (15, 16), // ring
    (0, 17), (17, 18), (18, 19), (19, 20), // pinky
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One tracked anatomical point on a hand.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }

    /// Planar Euclidean distance, in frame units. Depth is ignored because
    /// the classifier thresholds are calibrated against 2D screen distances.
    pub fn distance_2d(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandPose
// ════════════════════════════════════════════════════════════════════════════

/// One frame's estimated hand: an ordered sequence of landmarks, created
/// fresh each polling cycle and discarded after classification.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandPose {
    points: Vec<Landmark>,
}

impl HandPose {
    pub fn new(points: Vec<Landmark>) -> Self {
        HandPose { points }
    }

    /// True when the pose carries exactly [`LANDMARK_COUNT`] landmarks.
    pub fn is_complete(&self) -> bool {
        self.points.len() == LANDMARK_COUNT
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Translate every landmark by `(dx, dy)`. Used by the simulator's
    /// per-frame wobble; classification is translation-invariant.
    pub fn translated(&self, dx: f32, dy: f32) -> HandPose {
        HandPose {
            points: self
                .points
                .iter()
                .map(|p| Landmark { x: p.x + dx, y: p.y + dy, z: p.z })
                .collect(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Synthetic poses — simulator input and test fixtures
// ════════════════════════════════════════════════════════════════════════════

/// Deterministic synthetic poses, laid out in a 640×480 frame.
///
/// These stand in for a camera + pose-estimation backend the same way the
/// keyboard simulator stands in for hardware elsewhere: the geometry is
/// exaggerated so each pose is an unambiguous fixture for the classifier.
pub mod synth {
    use super::{landmarks as lm, HandPose, Landmark, LANDMARK_COUNT};

    const WRIST: (f32, f32) = (320.0, 420.0);

    // Per-finger joint columns (index, middle, ring, pinky).
    const FINGER_X: [f32; 4] = [286.0, 316.0, 346.0, 374.0];
    const MCP_Y: f32 = 330.0;
    const PIP_Y: f32 = 288.0;
    const DIP_EXTENDED_Y: f32 = 258.0;
    const TIP_EXTENDED_Y: f32 = 228.0;
    const DIP_CLOSED_Y: f32 = 315.0;
    const TIP_CLOSED_Y: f32 = 332.0;

    fn base() -> Vec<Landmark> {
        let mut p = vec![Landmark::default(); LANDMARK_COUNT];
        p[lm::WRIST] = Landmark::new(WRIST.0, WRIST.1);
        p[lm::THUMB_CMC] = Landmark::new(282.0, 395.0);
        p[lm::THUMB_MCP] = Landmark::new(258.0, 368.0);
        p[lm::THUMB_IP] = Landmark::new(240.0, 342.0);
        p[lm::THUMB_TIP] = Landmark::new(226.0, 318.0);
        for (f, &x) in FINGER_X.iter().enumerate() {
            let mcp = lm::INDEX_MCP + f * 4;
            p[mcp] = Landmark::new(x, MCP_Y);
            p[mcp + 1] = Landmark::new(x, PIP_Y);
        }
        p
    }

    fn set_finger(p: &mut [Landmark], finger: usize, extended: bool) {
        let x = FINGER_X[finger];
        let dip = lm::INDEX_DIP + finger * 4;
        if extended {
            p[dip] = Landmark::new(x, DIP_EXTENDED_Y);
            p[dip + 1] = Landmark::new(x, TIP_EXTENDED_Y);
        } else {
            p[dip] = Landmark::new(x, DIP_CLOSED_Y);
            p[dip + 1] = Landmark::new(x, TIP_CLOSED_Y);
        }
    }

    /// Closed fist: all four fingertips below their PIP joints, thumb folded
    /// across the fingers. Classifies as `A`.
    pub fn closed_fist() -> HandPose {
        let mut p = base();
        for f in 0..4 {
            set_finger(&mut p, f, false);
        }
        // Thumb folded across the index; span to index tip stays below 20.
        p[lm::THUMB_IP] = Landmark::new(282.0, 352.0);
        p[lm::THUMB_TIP] = Landmark::new(300.0, 345.0);
        HandPose::new(p)
    }

    /// Flat open hand: all four fingertips above their PIP joints.
    /// Classifies as `B`.
    pub fn flat_hand() -> HandPose {
        let mut p = base();
        for f in 0..4 {
            set_finger(&mut p, f, true);
        }
        HandPose::new(p)
    }

    /// Cupped hand: index and middle gently extended, ring and pinky curled,
    /// thumb tip roughly 30 frame units from the index tip. Fails the A and
    /// B rules and lands in the C span.
    pub fn cupped_hand() -> HandPose {
        let mut p = base();
        set_finger(&mut p, 2, false);
        set_finger(&mut p, 3, false);
        // Index and middle barely above their PIPs, curling inward.
        p[lm::INDEX_DIP] = Landmark::new(292.0, 282.0);
        p[lm::INDEX_TIP] = Landmark::new(290.0, 280.0);
        p[lm::MIDDLE_DIP] = Landmark::new(320.0, 281.0);
        p[lm::MIDDLE_TIP] = Landmark::new(318.0, 278.0);
        // Thumb curls toward the index tip.
        p[lm::THUMB_IP] = Landmark::new(254.0, 318.0);
        p[lm::THUMB_TIP] = Landmark::new(266.0, 300.0);
        HandPose::new(p)
    }

    /// A malformed pose with only `count` landmarks. Consumers must treat it
    /// as "no detection".
    pub fn truncated(count: usize) -> HandPose {
        let mut p = base();
        p.truncate(count);
        HandPose::new(p)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
