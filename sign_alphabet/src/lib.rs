//! # sign_alphabet
//!
//! The letter domain of the fingerspelling translator:
//!
//! * [`Letter`] — a character in `A`–`Z`, plus [`Letter::sequence`] for
//!   turning arbitrary text into a spellable letter list;
//! * [`classify`] — the deterministic geometric classifier mapping one
//!   [`HandPose`] to an optional letter;
//! * [`guide`] / [`guide_for_char`] — the static per-letter hand-position
//!   instruction and vector glyph lookup.
//!
//! ## Classifier rules
//!
//! Evaluated in fixed priority order; the first match wins, which
//! deterministically tie-breaks ambiguous poses:
//!
//! | # | Letter | Condition |
//! |---|--------|-----------|
//! | 1 | `A` | index, middle, ring, pinky tips all closed (thumb free) |
//! | 2 | `B` | those four tips all extended |
//! | 3 | `C` | thumb-tip ↔ index-tip distance strictly in (20, 50) |
//!
//! A fingertip is *extended* when its `y` is numerically above (less than,
//! screen space) its PIP joint two indices below it; *closed* is the
//! negation. The C-shape span is a coarse proxy for a curved hand and is
//! ambiguous with partially-closed hands of similar span; that is a
//! documented limitation of the heuristic, not a bug to silently fix. The
//! literal bounds are pinned by the boundary tests below; changing them or the rule
//! order requires re-validating all three rules against the
//! `hand_pose::synth` fixtures.

use hand_pose::{landmarks, HandPose};

// ════════════════════════════════════════════════════════════════════════════
// Letter
// ════════════════════════════════════════════════════════════════════════════

/// One letter of the manual alphabet, guaranteed to be in `A`–`Z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Letter(char);

impl Letter {
    /// Uppercases `c` and accepts it only if the result is in `A`–`Z`.
    pub fn from_char(c: char) -> Option<Letter> {
        let up = c.to_ascii_uppercase();
        if up.is_ascii_uppercase() {
            Some(Letter(up))
        } else {
            None
        }
    }

    pub fn as_char(&self) -> char {
        self.0
    }

    /// Zero-based position in the alphabet (`A` = 0 … `Z` = 25).
    pub fn index(&self) -> usize {
        (self.0 as u8 - b'A') as usize
    }

    /// Filter `text` down to its spellable letters: uppercased, `A`–`Z`
    /// only, original order preserved. Everything else is silently dropped.
    pub fn sequence(text: &str) -> Vec<Letter> {
        text.chars().filter_map(Letter::from_char).collect()
    }
}

impl std::fmt::Display for Letter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Classifier
// ════════════════════════════════════════════════════════════════════════════

/// Exclusive lower bound for the C-shape thumb–index span, in frame units.
pub const C_SPAN_MIN: f32 = 20.0;
/// Exclusive upper bound for the C-shape thumb–index span, in frame units.
pub const C_SPAN_MAX: f32 = 50.0;

/// True when the fingertip at `tip` sits above its PIP joint (screen space,
/// y grows downward). `tip` must be one of 8, 12, 16, 20.
fn finger_extended(pose: &HandPose, tip: usize) -> bool {
    match (pose.landmark(tip), pose.landmark(tip - 2)) {
        (Some(t), Some(p)) => t.y < p.y,
        _ => false,
    }
}

fn finger_closed(pose: &HandPose, tip: usize) -> bool {
    !finger_extended(pose, tip)
}

/// Thumb-tip to index-tip planar distance.
fn thumb_index_span(pose: &HandPose) -> Option<f32> {
    let thumb = pose.landmark(landmarks::THUMB_TIP)?;
    let index = pose.landmark(landmarks::INDEX_TIP)?;
    Some(thumb.distance_2d(index))
}

/// Classify one hand pose into a letter.
///
/// Pure and non-blocking. An incomplete pose (fewer than the full 21
/// landmarks) yields `None` — malformed input is a normal "no detection"
/// case, never an error.
pub fn classify(pose: &HandPose) -> Option<Letter> {
    if !pose.is_complete() {
        return None;
    }

    let four = hand_pose::FINGERTIPS;

    // Rule 1 — A: closed fist, thumb unconstrained.
    if four.iter().all(|&tip| finger_closed(pose, tip)) {
        return Some(Letter('A'));
    }

    // Rule 2 — B: flat hand.
    if four.iter().all(|&tip| finger_extended(pose, tip)) {
        return Some(Letter('B'));
    }

    // Rule 3 — C: curved hand, approximated by the thumb–index span.
    if let Some(span) = thumb_index_span(pose) {
        if span > C_SPAN_MIN && span < C_SPAN_MAX {
            return Some(Letter('C'));
        }
    }

    None
}

// ════════════════════════════════════════════════════════════════════════════
// Instruction & glyph guide
// ════════════════════════════════════════════════════════════════════════════

/// One guide entry: how to shape the hand for a letter, plus the outline
/// glyph as an SVG path in a 100×90 viewbox.
#[derive(Clone, Copy, Debug)]
pub struct SignEntry {
    pub description: &'static str,
    pub glyph: &'static str,
}

/// Look up the guide entry for a letter. Total over `Letter`.
pub fn guide(letter: Letter) -> &'static SignEntry {
    &GUIDE[letter.index()]
}

/// Char-keyed lookup with the documented fallback: any key outside `A`–`Z`
/// yields the `A` entry.
pub fn guide_for_char(c: char) -> &'static SignEntry {
    match Letter::from_char(c) {
        Some(letter) => guide(letter),
        None => &GUIDE[0],
    }
}

const GUIDE: [SignEntry; 26] = [
    SignEntry {
        description: "Make a fist with your thumb on the side of your index finger",
        glyph: "M50 20 Q45 15 40 20 L40 60 Q40 70 50 70 L60 70 Q70 70 70 60 L70 20 Q65 15 60 20 L55 25 L50 20 Z M45 25 L65 25",
    },
    SignEntry {
        description: "Hold your hand flat with fingers together and straight up, thumb folded across your palm",
        glyph: "M30 20 L30 70 L40 70 L40 30 L60 30 L60 50 L70 50 L70 70 L40 70 L40 60 L60 60 L60 40 L40 40",
    },
    SignEntry {
        description: "Curve your hand into a C shape, like holding a small cup",
        glyph: "M60 20 Q70 20 70 30 L70 60 Q70 70 60 70 L40 70 Q30 70 30 60 L30 30 Q30 20 40 20",
    },
    SignEntry {
        description: "Point your index finger straight up, touch your thumb to the tips of your other three fingers",
        glyph: "M45 20 L45 70 L35 70 L35 20 Z M50 25 L50 65 L60 65 Q65 65 65 60 L65 30 Q65 25 60 25 Z",
    },
    SignEntry {
        description: "Bend all your fingertips down to touch your thumb tip",
        glyph: "M45 25 Q40 20 35 25 L35 35 Q35 40 40 40 L60 40 Q65 40 65 35 L65 25 Q60 20 55 25 L50 30 L45 25 Z",
    },
    SignEntry {
        description: "Touch the tip of your thumb to the tip of your index finger, keep other three fingers straight up",
        glyph: "M40 20 L40 30 L45 30 L45 25 L50 25 L50 30 L45 30 L45 70 L40 70 L40 60 L50 60 L50 70 L45 70",
    },
    SignEntry {
        description: "Point your index finger and thumb out horizontally, like making a gun shape",
        glyph: "M30 30 L30 35 L70 35 L70 30 Z M45 20 L45 50 L55 50 L55 20 Z",
    },
    SignEntry {
        description: "Extend your index and middle fingers horizontally, side by side",
        glyph: "M30 30 L30 35 L70 35 L70 30 Z M40 20 L40 50 L45 50 L45 20 Z M55 20 L55 50 L60 50 L60 20 Z",
    },
    SignEntry {
        description: "Make a fist and stick your pinky finger straight up",
        glyph: "M50 20 L50 70 L45 70 L45 25 L40 25 L40 20 L60 20 L60 25 L55 25 L55 70 L50 70",
    },
    SignEntry {
        description: "Make the \"I\" sign, then draw the letter J in the air with your pinky",
        glyph: "M50 20 L50 60 Q50 70 40 70 L35 70 Q25 70 25 60 L25 55 L30 55 L30 60 Q30 65 35 65 L40 65 Q45 65 45 60 L45 20 Z",
    },
    SignEntry {
        description: "Hold up your index and middle fingers in a V shape, with your thumb touching the side of your middle finger",
        glyph: "M40 20 L40 70 L35 70 L35 20 Z M50 30 L65 20 L70 25 L55 35 L70 45 L65 50 L50 40 L45 35 L50 30",
    },
    SignEntry {
        description: "Make an L shape with your thumb and index finger, other fingers folded down",
        glyph: "M40 20 L40 65 L65 65 L65 70 L35 70 L35 20 Z M50 25 L50 30 L60 30 L60 25 Z",
    },
    SignEntry {
        description: "Make a fist with your thumb tucked under your first three fingers",
        glyph: "M35 20 L35 70 L40 70 L40 25 L45 35 L50 25 L55 35 L60 25 L60 70 L65 70 L65 20 L60 20 L50 35 L40 20 Z",
    },
    SignEntry {
        description: "Make a fist with your thumb tucked under your first two fingers",
        glyph: "M35 20 L35 70 L40 70 L40 30 L55 60 L60 60 L60 20 L55 20 L55 50 L40 20 Z",
    },
    SignEntry {
        description: "Form an O shape by touching all your fingertips to your thumb tip",
        glyph: "M50 20 Q40 20 40 30 L40 60 Q40 70 50 70 Q60 70 60 60 L60 30 Q60 20 50 20 Z",
    },
    SignEntry {
        description: "Like the K sign, but point your fingers downward",
        glyph: "M35 20 L35 70 L40 70 L40 45 L55 45 Q65 45 65 35 L65 25 Q65 15 55 15 L35 15 L35 20 Z M40 20 L55 20 Q60 20 60 25 L60 35 Q60 40 55 40 L40 40",
    },
    SignEntry {
        description: "Point your thumb and index finger down, like an upside-down G",
        glyph: "M50 20 Q40 20 40 30 L40 60 Q40 70 50 70 Q60 70 60 60 L60 30 Q60 20 50 20 Z M55 55 L65 65",
    },
    SignEntry {
        description: "Cross your index finger over your middle finger, both pointing up",
        glyph: "M35 20 L35 70 L40 70 L40 45 L50 70 L55 70 L45 45 L55 45 Q65 45 65 35 L65 25 Q65 15 55 15 L35 15 L35 20 Z M40 20 L55 20 Q60 20 60 25 L60 35 Q60 40 55 40 L40 40",
    },
    SignEntry {
        description: "Make a fist with your thumb folded over your fingers",
        glyph: "M50 20 Q40 20 40 30 Q40 40 50 40 Q60 40 60 50 Q60 60 50 60 Q40 60 40 70 L60 70 Q70 70 70 60 Q70 50 60 50 Q50 50 50 40 Q50 30 60 30 Q70 30 70 20",
    },
    SignEntry {
        description: "Make a fist with your thumb poking up between your index and middle finger",
        glyph: "M30 20 L30 25 L45 25 L45 70 L55 70 L55 25 L70 25 L70 20 Z",
    },
    SignEntry {
        description: "Hold your index and middle fingers straight up, side by side",
        glyph: "M35 20 L35 60 Q35 70 45 70 L55 70 Q65 70 65 60 L65 20 L60 20 L60 60 Q60 65 55 65 L45 65 Q40 65 40 60 L40 20 Z",
    },
    SignEntry {
        description: "Hold your index and middle fingers up in a V shape (peace sign)",
        glyph: "M35 20 L50 70 L55 70 L70 20 L65 20 L52.5 60 L47.5 60 L35 20 Z",
    },
    SignEntry {
        description: "Hold your index, middle, and ring fingers straight up",
        glyph: "M30 20 L40 70 L45 70 L50 40 L55 70 L60 70 L70 20 L65 20 L57.5 60 L52.5 40 L47.5 60 L42.5 40 L35 20 Z",
    },
    SignEntry {
        description: "Make a fist and hook your index finger",
        glyph: "M35 20 L65 70 L70 65 L45 25 L70 25 L65 20 L35 50 L35 20 Z M65 20 L35 70 L40 75 L65 45 L40 45 L35 50",
    },
    SignEntry {
        description: "Stick out your thumb and pinky, fold down your other three fingers",
        glyph: "M35 20 L50 40 L50 70 L55 70 L55 40 L70 20 L65 25 L52.5 35 L47.5 35 L35 25 Z",
    },
    SignEntry {
        description: "Use your index finger to draw the letter Z in the air",
        glyph: "M30 20 L70 20 L70 25 L40 60 L70 60 L70 65 L30 65 L30 60 L60 25 L30 25 Z",
    },
];

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_pose::{landmarks, synth, Landmark};

    // ── Letter ────────────────────────────────────────────────────────────

    #[test]
    fn sequence_filters_and_uppercases() {
        let letters = Letter::sequence("Hello, World! 123");
        let chars: String = letters.iter().map(Letter::as_char).collect();
        assert_eq!(chars, "HELLOWORLD");
    }

    #[test]
    fn sequence_of_only_noise_is_empty() {
        assert!(Letter::sequence("42 — ?!").is_empty());
    }

    #[test]
    fn from_char_rejects_non_letters() {
        assert_eq!(Letter::from_char('h').map(|l| l.as_char()), Some('H'));
        assert!(Letter::from_char('7').is_none());
        assert!(Letter::from_char('é').is_none());
    }

    // ── Classifier ────────────────────────────────────────────────────────

    #[test]
    fn incomplete_pose_is_no_detection() {
        for count in [0, 1, 10, 20] {
            assert_eq!(classify(&synth::truncated(count)), None, "count {}", count);
        }
    }

    #[test]
    fn closed_fist_classifies_as_a() {
        assert_eq!(classify(&synth::closed_fist()), Some(Letter('A')));
    }

    #[test]
    fn flat_hand_classifies_as_b() {
        assert_eq!(classify(&synth::flat_hand()), Some(Letter('B')));
    }

    #[test]
    fn cupped_hand_classifies_as_c() {
        assert_eq!(classify(&synth::cupped_hand()), Some(Letter('C')));
    }

    #[test]
    fn a_rule_precedes_c_rule() {
        // A fist whose thumb-index span also lands in (20, 50) must still
        // read as A: rule 1 wins on priority.
        let mut points = synth::closed_fist().points().to_vec();
        points[landmarks::THUMB_TIP] = Landmark::new(262.0, 350.0);
        let pose = hand_pose::HandPose::new(points);
        let span = pose
            .landmark(landmarks::THUMB_TIP)
            .unwrap()
            .distance_2d(pose.landmark(landmarks::INDEX_TIP).unwrap());
        assert!(span > C_SPAN_MIN && span < C_SPAN_MAX);
        assert_eq!(classify(&pose), Some(Letter('A')));
    }

    #[test]
    fn c_span_bounds_are_exclusive() {
        // Start from the cupped hand and pin the thumb tip exactly 20 and
        // exactly 50 units from the index tip: both must miss.
        let base = synth::cupped_hand();
        let index = *base.landmark(landmarks::INDEX_TIP).unwrap();
        for span in [20.0f32, 50.0] {
            let mut points = base.points().to_vec();
            points[landmarks::THUMB_TIP] = Landmark::new(index.x - span, index.y);
            let pose = hand_pose::HandPose::new(points);
            assert_eq!(classify(&pose), None, "span {} should be excluded", span);
        }
    }

    #[test]
    fn wide_open_span_is_no_detection() {
        // Mixed fingers with a huge thumb-index span matches nothing.
        let base = synth::cupped_hand();
        let mut points = base.points().to_vec();
        points[landmarks::THUMB_TIP] = Landmark::new(100.0, 100.0);
        assert_eq!(classify(&hand_pose::HandPose::new(points)), None);
    }

    #[test]
    fn classification_is_translation_invariant() {
        let moved = synth::cupped_hand().translated(-40.0, 25.0);
        assert_eq!(classify(&moved), Some(Letter('C')));
    }

    // ── Guide ─────────────────────────────────────────────────────────────

    #[test]
    fn every_letter_has_a_guide_entry() {
        for c in 'A'..='Z' {
            let letter = Letter::from_char(c).unwrap();
            let entry = guide(letter);
            assert!(!entry.description.is_empty());
            assert!(entry.glyph.starts_with('M'));
        }
    }

    #[test]
    fn guide_for_char_falls_back_to_a() {
        let a = guide(Letter('A'));
        assert_eq!(guide_for_char('!').description, a.description);
        assert_eq!(guide_for_char('3').glyph, a.glyph);
        assert_eq!(guide_for_char('c').description, guide(Letter('C')).description);
    }
}
