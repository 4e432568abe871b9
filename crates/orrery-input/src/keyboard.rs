//! Keyboard state tracker keyed by physical key code.
//!
//! Physical codes keep the pause and quit keys in the same place regardless of
//! the user's keyboard layout.

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Minimal description of a key event, constructible in tests.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    pub repeat: bool,
}

impl From<&KeyEvent> for RawKeyEvent {
    fn from(event: &KeyEvent) -> Self {
        Self {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        }
    }
}

/// Held keys plus the press edges seen since the last clear.
///
/// Keys the platform cannot identify are dropped. Auto-repeat events never
/// count as new presses, so a held pause key toggles exactly once.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
    just_pressed: HashSet<KeyCode>,
    just_released: HashSet<KeyCode>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a winit [`KeyEvent`].
    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent::from(event));
    }

    /// Process a [`RawKeyEvent`]. Returns `true` if it was a fresh press.
    pub fn process_raw(&mut self, event: RawKeyEvent) -> bool {
        let PhysicalKey::Code(code) = event.key else {
            return false;
        };
        if event.repeat {
            return false;
        }
        match event.state {
            ElementState::Pressed => {
                let fresh = self.held.insert(code);
                if fresh {
                    self.just_pressed.insert(code);
                }
                fresh
            }
            ElementState::Released => {
                self.held.remove(&code);
                self.just_released.insert(code);
                false
            }
        }
    }

    #[must_use]
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    #[must_use]
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed.contains(&key)
    }

    #[must_use]
    pub fn just_released(&self, key: KeyCode) -> bool {
        self.just_released.contains(&key)
    }

    /// Forget press/release edges. Call at the end of each frame.
    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}
