//! Pointer and keyboard handling for the orrery camera.
//!
//! Winit events are collected into a [`FrameInput`] by [`InputCollector`]; the
//! frame loop drains it once per frame and feeds the pointer events through an
//! [`OrbitController`], which owns the drag state machine and mutates a
//! [`CameraState`].

pub mod collector;
pub mod keyboard;
pub mod keys;
pub mod mouse;
pub mod orbit;

pub use collector::{FrameInput, InputCollector};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use keys::{UnknownKey, parse_key_code};
pub use mouse::MouseState;
pub use orbit::{CameraState, DragState, OrbitController, OrbitSettings, PointerEvent};
