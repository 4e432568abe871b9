//! Buffers winit input between frames.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::keyboard::{KeyboardState, RawKeyEvent};
use crate::mouse::MouseState;
use crate::orbit::PointerEvent;

/// Everything that happened since the previous frame, in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub pointer: Vec<PointerEvent>,
    /// Number of fresh pause-key presses. Odd counts flip the pause flag.
    pub pause_presses: u32,
    pub quit_requested: bool,
}

impl FrameInput {
    /// Whether the presses in this frame change the pause state.
    pub fn toggles_pause(&self) -> bool {
        self.pause_presses % 2 == 1
    }
}

/// Translates raw window events into [`FrameInput`].
#[derive(Debug, Clone)]
pub struct InputCollector {
    mouse: MouseState,
    keyboard: KeyboardState,
    pause_key: KeyCode,
    quit_key: KeyCode,
    pending: FrameInput,
}

impl InputCollector {
    pub fn new(pause_key: KeyCode) -> Self {
        Self {
            mouse: MouseState::new(),
            keyboard: KeyboardState::new(),
            pause_key,
            quit_key: KeyCode::Escape,
            pending: FrameInput::default(),
        }
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let delta = self.mouse.on_cursor_moved(x, y);
        if delta != Vec2::ZERO {
            self.pending.pointer.push(PointerEvent::Motion(delta));
        }
    }

    pub fn on_cursor_left(&mut self) {
        self.mouse.on_cursor_left();
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.mouse.on_button(button, state);
        self.pending
            .pointer
            .push(PointerEvent::Button { button, state });
    }

    pub fn on_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        let notches = self.mouse.on_scroll(delta);
        if notches != 0.0 {
            self.pending.pointer.push(PointerEvent::Scroll(notches));
        }
    }

    pub fn on_key(&mut self, event: RawKeyEvent) {
        if !self.keyboard.process_raw(event) {
            return;
        }
        let PhysicalKey::Code(code) = event.key else {
            return;
        };
        if code == self.pause_key {
            self.pending.pause_presses += 1;
        }
        if code == self.quit_key {
            self.pending.quit_requested = true;
        }
    }

    /// Take this frame's input and reset per-frame state.
    pub fn drain(&mut self) -> FrameInput {
        self.mouse.clear_transients();
        self.keyboard.clear_transients();
        std::mem::take(&mut self.pending)
    }

    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }
}
