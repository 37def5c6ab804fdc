//! Input model: pointer positions, modifier keys, buttons, and the
//! per-session drawing state (mode, color, brush width).
//!
//! `DrawingState` is owned by the session controller and passed explicitly
//! into the stroke and fill paths. Nothing in the engine reads it implicitly.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use frames::Color;
use tracing::debug;

use crate::consts::{DEFAULT_BRUSH_WIDTH, MAX_BRUSH_WIDTH, MIN_BRUSH_WIDTH};

/// A point in canvas pixel space. Fractional positions are allowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The integer pixel address this point falls in, before bounds checks.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn pixel(self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }
}

/// What a primary-button press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Freehand stroke in the current color.
    #[default]
    Brush,
    /// Freehand stroke in the background color.
    Eraser,
    /// Flood fill at the pressed pixel.
    Fill,
}

/// Keyboard/mouse modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"z"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Ctrl+Z (or Cmd+Z) requests an undo. Shifted, it is left for redo.
    #[must_use]
    pub fn is_undo(&self, modifiers: Modifiers) -> bool {
        (modifiers.ctrl || modifiers.meta) && !modifiers.shift && self.0 == "z"
    }
}

/// Per-session drawing controls.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingState {
    pub mode: Mode,
    pub color: Color,
    pub width: f64,
    pub background: Color,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self { mode: Mode::Brush, color: Color::BLACK, width: DEFAULT_BRUSH_WIDTH, background: Color::WHITE }
    }
}

impl DrawingState {
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        debug!(?mode, "mode changed");
    }

    /// Pick a new brush color. Picking a color while erasing returns to the brush.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        if self.mode == Mode::Eraser {
            self.mode = Mode::Brush;
        }
        debug!(%color, mode = ?self.mode, "color changed");
    }

    /// Set the brush width, clamped to the supported range.
    pub fn set_width(&mut self, width: f64) {
        if !width.is_finite() {
            return;
        }
        self.width = width.clamp(MIN_BRUSH_WIDTH, MAX_BRUSH_WIDTH);
        debug!(width = self.width, "brush width changed");
    }

    /// Color a stroke is rasterized and broadcast with. The eraser paints
    /// the background color.
    #[must_use]
    pub fn stroke_color(&self) -> Color {
        match self.mode {
            Mode::Eraser => self.background,
            Mode::Brush | Mode::Fill => self.color,
        }
    }
}
