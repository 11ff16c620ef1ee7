//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────┬───────────────────────────┐
//! │  VIDEO PANEL (640×480)       │  DETECTED LETTERS         │
//! │  frame + landmark skeleton   │  PHRASE                   │
//! │                              │  ┌─────────┐              │
//! │                              │  │ big     │ instruction  │
//! │                              │  │ letter  │ text         │
//! │  detection state             │  └─────────┘ i of n       │
//! │  status bar / key legend                                 │
//! └──────────────────────────────┴───────────────────────────┘
//! ```
//!
//! [`VideoPanel`] is the offscreen surface the detection loop draws into
//! through the [`Renderer`] seam; the window blits it each frame.

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use hand_pose::Landmark;
use sign_alphabet::{guide, Letter};

use std::sync::mpsc::Sender;

use crate::app::InputEvent;
use crate::detector::{Frame, RenderError, Renderer};
use crate::sim::SimShape;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 1024;
pub const WIN_H: usize = 600;
const VIDEO_X: usize = 16;
const VIDEO_Y: usize = 48;
const VIDEO_W: usize = 640;
const VIDEO_H: usize = 480;
const SIDE_X: usize = VIDEO_X + VIDEO_W + 24;
const STATUS_Y: usize = WIN_H - 36;
const BG_COLOR: u32 = 0xFF1A1A2E;
const PANEL_BG: u32 = 0xFF16213E;
const TEXT_BG: u32 = 0xFF0F3460;
const POINT_COLOR: u32 = 0xFF22D3EE;
const BONE_COLOR: u32 = 0xFF0891B2;
const ACCENT: u32 = 0xFF2DD4BF;

// ════════════════════════════════════════════════════════════════════════════
// VideoPanel — the Renderer capability
// ════════════════════════════════════════════════════════════════════════════

/// Offscreen video surface owned by the detection loop. Receives the frame
/// blit, the landmark dots, and the skeleton connections, in that order.
pub struct VideoPanel {
    width: usize,
    height: usize,
    buf: Vec<u32>,
}

impl VideoPanel {
    pub fn new(width: usize, height: usize) -> Self {
        VideoPanel { width, height, buf: vec![PANEL_BG; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.buf
    }

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    fn dot(&mut self, cx: f32, cy: f32, r: isize, color: u32) {
        let (cx, cy) = (cx as isize, cy as isize);
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn line(&mut self, a: &Landmark, b: &Landmark, color: u32) {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.set_pixel((a.x + dx * t) as isize, (a.y + dy * t) as isize, color);
        }
    }
}

impl Renderer for VideoPanel {
    fn draw_frame(&mut self, frame: &Frame) -> Result<(), RenderError> {
        if frame.width != self.width || frame.height != self.height {
            return Err(RenderError(format!(
                "frame {}x{} does not fit panel {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        self.buf.copy_from_slice(&frame.pixels);
        Ok(())
    }

    fn draw_points(&mut self, points: &[Landmark]) -> Result<(), RenderError> {
        for p in points {
            self.dot(p.x, p.y, 3, POINT_COLOR);
        }
        Ok(())
    }

    fn draw_connections(
        &mut self,
        points: &[Landmark],
        pairs: &[(usize, usize)],
    ) -> Result<(), RenderError> {
        for &(a, b) in pairs {
            if let (Some(pa), Some(pb)) = (points.get(a), points.get(b)) {
                self.line(pa, pb, BONE_COLOR);
            }
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppView — one frame's worth of display state
// ════════════════════════════════════════════════════════════════════════════

/// Snapshot handed from the app state to the window each frame.
pub struct AppView<'a> {
    pub panel: Option<&'a VideoPanel>,
    pub detecting: bool,
    pub sim_shape: SimShape,
    pub detected: &'a str,
    pub phrase: String,
    pub letters: String,
    pub current_letter: Option<Letter>,
    pub progress: Option<(usize, usize)>,
    pub status: &'a str,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf: Vec<u32>,
    input_tx: Sender<InputEvent>,
}

impl Visualizer {
    pub fn new(input_tx: Sender<InputEvent>) -> Result<Self, String> {
        let mut window = Window::new(
            "Sign Spell — Fingerspelling Translator",
            WIN_W,
            WIN_H,
            WindowOptions { resize: false, ..WindowOptions::default() },
        )
        .map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer { window, buf: vec![BG_COLOR; WIN_W * WIN_H], input_tx })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll keyboard input and forward it as [`InputEvent`]s.
    /// Returns false when the window should close.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() {
            return false;
        }

        let one_shot = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);

        if one_shot(&self.window, Key::Q) {
            let _ = self.input_tx.send(InputEvent::Quit);
            return false;
        }
        if one_shot(&self.window, Key::D) {
            let _ = self.input_tx.send(InputEvent::ToggleDetection);
        }
        if one_shot(&self.window, Key::Space) {
            let _ = self.input_tx.send(InputEvent::Play);
        }
        if one_shot(&self.window, Key::R) {
            let _ = self.input_tx.send(InputEvent::Reset);
        }
        if one_shot(&self.window, Key::T) {
            let _ = self.input_tx.send(InputEvent::EditPhrase);
        }
        if one_shot(&self.window, Key::C) {
            let _ = self.input_tx.send(InputEvent::ClearDetected);
        }
        for (key, shape) in [
            (Key::Key0, SimShape::NoHand),
            (Key::Key1, SimShape::Fist),
            (Key::Key2, SimShape::FlatHand),
            (Key::Key3, SimShape::CuppedHand),
        ] {
            if one_shot(&self.window, key) {
                let _ = self.input_tx.send(InputEvent::SelectShape(shape));
            }
        }

        true
    }

    /// Render one frame.
    pub fn render(&mut self, view: &AppView<'_>) {
        self.buf.fill(BG_COLOR);

        self.draw_label_scaled("SIGN SPELL", VIDEO_X, 14, 3, ACCENT);
        self.draw_label("FINGERSPELLING TRANSLATOR", VIDEO_X + 140, 22, 0xFF888888);

        // ── Video panel ───────────────────────────────────────────────────
        match view.panel {
            Some(panel) if view.detecting => self.blit_panel(panel),
            _ => {
                self.fill_rect(VIDEO_X, VIDEO_Y, VIDEO_W, VIDEO_H, PANEL_BG);
                self.draw_label_scaled(
                    "CAMERA IDLE",
                    VIDEO_X + VIDEO_W / 2 - 66,
                    VIDEO_Y + VIDEO_H / 2 - 8,
                    3,
                    0xFF555577,
                );
            }
        }
        self.draw_border(VIDEO_X, VIDEO_Y, VIDEO_W, VIDEO_H, TEXT_BG);

        let mode = if view.detecting {
            format!("DETECTING — SIM HAND: {}", view.sim_shape.label().to_uppercase())
        } else {
            "DETECTION OFF".to_string()
        };
        self.draw_label(&mode, VIDEO_X, VIDEO_Y + VIDEO_H + 10, 0xFFAADDFF);

        // ── Detected letters ──────────────────────────────────────────────
        self.draw_label("DETECTED LETTERS", SIDE_X, VIDEO_Y, 0xFFFFD700);
        self.fill_rect(SIDE_X, VIDEO_Y + 12, WIN_W - SIDE_X - 16, 30, TEXT_BG);
        self.draw_label_scaled(view.detected, SIDE_X + 6, VIDEO_Y + 20, 2, 0xFFEEEEEE);

        // ── Phrase ────────────────────────────────────────────────────────
        self.draw_label("PHRASE", SIDE_X, VIDEO_Y + 56, 0xFFFFD700);
        self.draw_label(&view.phrase, SIDE_X, VIDEO_Y + 68, 0xFFCCCCCC);
        self.draw_label(
            &format!("LETTERS: {}", view.letters),
            SIDE_X,
            VIDEO_Y + 80,
            0xFF8899BB,
        );

        // ── Playback display ──────────────────────────────────────────────
        let py = VIDEO_Y + 110;
        match view.current_letter {
            Some(letter) => {
                // Big letter card with its hand-shape instruction.
                self.fill_rect(SIDE_X, py, 64, 84, TEXT_BG);
                self.draw_border(SIDE_X, py, 64, 84, ACCENT);
                self.draw_label_scaled(&letter.to_string(), SIDE_X + 17, py + 18, 10, ACCENT);

                let entry = guide(letter);
                for (i, line) in wrap(entry.description, 30).iter().enumerate() {
                    self.draw_label(line, SIDE_X + 76, py + 4 + i * 10, 0xFFDDDDDD);
                    if py + 4 + i * 10 > STATUS_Y {
                        break;
                    }
                }
                if let Some((i, n)) = view.progress {
                    self.draw_label(
                        &format!("LETTER {} OF {}", i, n),
                        SIDE_X,
                        py + 96,
                        0xFFAADDFF,
                    );
                }
            }
            None => {
                let n = view.letters.len();
                let hint = if n == 0 {
                    "TYPE A PHRASE WITH T, THEN PRESS SPACE".to_string()
                } else {
                    format!("READY — SPACE PLAYS {} LETTERS", n)
                };
                self.draw_label(&hint, SIDE_X, py, 0xFF8899BB);
            }
        }

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        self.draw_label(view.status, 10, STATUS_Y + 6, 0xFFEEEEEE);
        self.draw_label(
            "D=detect  1/2/3=fist/flat/cupped  0=no hand  Space=play  R=reset  T=phrase  C=clear  Q=quit",
            10,
            STATUS_Y + 20,
            0xFF888888,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Blit ──────────────────────────────────────────────────────────────

    fn blit_panel(&mut self, panel: &VideoPanel) {
        let w = panel.width().min(VIDEO_W);
        let h = panel.height().min(VIDEO_H);
        let src = panel.pixels();
        for row in 0..h {
            let from = row * panel.width();
            let to = (VIDEO_Y + row) * WIN_W + VIDEO_X;
            self.buf[to..to + w].copy_from_slice(&src[from..from + w]);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for col in x..(x + w).min(WIN_W) {
            if y < WIN_H {
                self.buf[y * WIN_W + col] = color;
            }
            if y + h - 1 < WIN_H {
                self.buf[(y + h - 1) * WIN_W + col] = color;
            }
        }
        for row in y..(y + h).min(WIN_H) {
            if x < WIN_W {
                self.buf[row * WIN_W + x] = color;
            }
            if x + w - 1 < WIN_W {
                self.buf[row * WIN_W + x + w - 1] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    /// Minimal bitmap font — 3×5 characters for labels.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        self.draw_label_scaled(text, x, y, 1, color);
    }

    fn draw_label_scaled(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        for sy in 0..scale {
                            for sx in 0..scale {
                                self.set_pixel(
                                    cx + col * scale + sx,
                                    y + row * scale + sy,
                                    color,
                                );
                            }
                        }
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > WIN_W {
                break;
            }
        }
    }
}

/// Greedy word wrap at `width` characters.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
