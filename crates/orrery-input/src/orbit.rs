//! Orbit camera controller: drag to rotate, scroll to zoom.

use glam::Vec2;
use winit::event::{ElementState, MouseButton};

/// Zoom distance the viewer starts at (the camera sits 100 units back).
pub const INITIAL_ZOOM: f32 = -100.0;

/// Yaw, pitch and zoom read by the frame loop when building the view matrix.
///
/// Angles are in degrees. `zoom_distance` is the view-space Z translation, so
/// it is negative while the scene is in front of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Rotation about the world Y axis.
    pub yaw: f32,
    /// Rotation about the camera X axis, applied after zoom.
    pub pitch: f32,
    pub zoom_distance: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            zoom_distance: INITIAL_ZOOM,
        }
    }
}

/// Primary-button drag state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Pointer input after conversion from winit events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Button {
        button: MouseButton,
        state: ElementState,
    },
    /// Cursor motion in pixels since the previous motion event.
    Motion(Vec2),
    /// Wheel movement in notches, positive away from the user.
    Scroll(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSettings {
    /// Degrees of yaw/pitch per pixel of drag.
    pub drag_sensitivity: f32,
    /// Zoom change per scroll notch.
    pub zoom_step: f32,
    /// Optional `(min, max)` clamp on zoom distance.
    pub zoom_limits: Option<(f32, f32)>,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.2,
            zoom_step: 2.0,
            zoom_limits: None,
        }
    }
}

/// Drives a [`CameraState`] from pointer events.
#[derive(Debug, Clone, Default)]
pub struct OrbitController {
    settings: OrbitSettings,
    drag: DragState,
}

impl OrbitController {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            settings,
            drag: DragState::Idle,
        }
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    /// Dispatch one pointer event.
    pub fn handle(&mut self, camera: &mut CameraState, event: PointerEvent) {
        match event {
            PointerEvent::Button { button, state } => self.on_button(button, state),
            PointerEvent::Motion(delta) => self.on_motion(camera, delta),
            PointerEvent::Scroll(notches) => self.on_scroll(camera, notches),
        }
    }

    /// Only the left button starts or ends a drag.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        let next = match state {
            ElementState::Pressed => DragState::Dragging,
            ElementState::Released => DragState::Idle,
        };
        if next != self.drag {
            tracing::trace!(from = ?self.drag, to = ?next, "drag state");
        }
        self.drag = next;
    }

    /// Horizontal motion turns yaw, vertical motion turns pitch, while dragging.
    pub fn on_motion(&mut self, camera: &mut CameraState, delta: Vec2) {
        if self.drag != DragState::Dragging {
            return;
        }
        camera.yaw += delta.x * self.settings.drag_sensitivity;
        camera.pitch += delta.y * self.settings.drag_sensitivity;
    }

    /// Positive notches zoom in (toward the sun).
    pub fn on_scroll(&mut self, camera: &mut CameraState, notches: f32) {
        let mut zoom = camera.zoom_distance + notches * self.settings.zoom_step;
        if let Some((lo, hi)) = self.settings.zoom_limits {
            zoom = zoom.clamp(lo, hi);
        }
        camera.zoom_distance = zoom;
    }
}
