//! Mouse state tracker.
//!
//! [`MouseState`] turns winit cursor, button and wheel events into pointer
//! deltas and scroll notches, and keeps per-frame button edges for queries.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixels of trackpad scroll treated as one wheel notch.
const PIXELS_PER_NOTCH: f64 = 40.0;

/// Bit for `button` in the held/edge masks. Buttons beyond the first three
/// share one bit.
fn button_bit(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 1,
        MouseButton::Right => 1 << 1,
        MouseButton::Middle => 1 << 2,
        MouseButton::Back | MouseButton::Forward | MouseButton::Other(_) => 1 << 3,
    }
}

/// Frame-coherent mouse state.
///
/// The `on_*` handlers return what the event contributed (a motion delta or a
/// scroll amount) so callers can forward it immediately, while the accessors
/// report totals since the last [`clear_transients`](Self::clear_transients).
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Option<Vec2>,
    delta: Vec2,
    held: u8,
    went_down: u8,
    went_up: u8,
    scroll: f32,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event and return the motion since the previous one.
    ///
    /// The first position seen (and the first after the cursor re-enters the
    /// window) yields a zero delta so the camera does not jump.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> Vec2 {
        let new_pos = Vec2::new(x as f32, y as f32);
        let step = match self.position {
            Some(prev) => new_pos - prev,
            None => Vec2::ZERO,
        };
        self.delta += step;
        self.position = Some(new_pos);
        step
    }

    /// Record a button edge from a `MouseInput` event.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        let bit = button_bit(button);
        if state.is_pressed() {
            self.held |= bit;
            self.went_down |= bit;
        } else {
            self.held &= !bit;
            self.went_up |= bit;
        }
    }

    /// Process a `MouseWheel` event and return it in notches (positive = away from the user).
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) -> f32 {
        let notches = match delta {
            MouseScrollDelta::LineDelta(_x, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_NOTCH) as f32,
        };
        self.scroll += notches;
        notches
    }

    /// Process a `CursorLeft` event. The next move re-anchors the position.
    pub fn on_cursor_left(&mut self) {
        self.position = None;
    }

    /// Forget this frame's motion, scroll and button edges. Held buttons
    /// stay held.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll = 0.0;
        self.went_down = 0;
        self.went_up = 0;
    }

    /// Last known cursor position, if the cursor has been seen in the window.
    #[must_use]
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Movement accumulated since the last clear.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    #[must_use]
    pub fn is_held(&self, button: MouseButton) -> bool {
        self.held & button_bit(button) != 0
    }

    #[must_use]
    pub fn went_down(&self, button: MouseButton) -> bool {
        self.went_down & button_bit(button) != 0
    }

    #[must_use]
    pub fn went_up(&self, button: MouseButton) -> bool {
        self.went_up & button_bit(button) != 0
    }

    /// Scroll notches accumulated this frame.
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }
}
