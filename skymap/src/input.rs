//! Input model: modifier keys, mouse buttons, and the gesture state machine.
//!
//! The sky view has a single gesture: dragging pans the sky under the
//! pointer. Everything else (wheel zoom, arrow-key panning, picking) is a
//! one-shot event handled directly by the engine.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;

/// Modifier keys that change keyboard step sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Coarse steps: arrow keys pan ten times further.
    pub shift: bool,
    /// Fine steps: arrow keys pan a tenth as far.
    pub alt: bool,
}

impl Modifiers {
    /// Multiplier applied to keyboard pan steps. Shift wins when both are held.
    #[must_use]
    pub fn step_scale(self) -> f64 {
        if self.shift {
            10.0
        } else if self.alt {
            0.1
        } else {
            1.0
        }
    }
}

/// Pointer button that started a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Drags the sky.
    Primary,
    /// Also drags the sky.
    Middle,
    /// Picks the coordinate under the pointer.
    Secondary,
}

/// Browser key name, e.g. `"ArrowLeft"` or `"+"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Unit pan direction `(azimuth, altitude)` for an arrow key.
    #[must_use]
    pub fn pan_direction(&self) -> Option<(f64, f64)> {
        match self.0.as_str() {
            "ArrowLeft" => Some((-1.0, 0.0)),
            "ArrowRight" => Some((1.0, 0.0)),
            "ArrowUp" => Some((0.0, 1.0)),
            "ArrowDown" => Some((0.0, -1.0)),
            _ => None,
        }
    }

    /// Zoom direction: `-1` narrows the view (zoom in), `1` widens it.
    #[must_use]
    pub fn zoom_direction(&self) -> Option<i32> {
        match self.0.as_str() {
            "+" | "=" => Some(-1),
            "-" | "_" => Some(1),
            _ => None,
        }
    }
}

/// Scroll amount from a wheel or trackpad, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    pub dx: f64,
    /// Positive scrolls down, which widens the view.
    pub dy: f64,
}

/// Where the pointer gesture currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    #[default]
    Idle,
    /// Dragging the sky; `last_screen` is the previous pointer position.
    Panning { last_screen: Point },
}
