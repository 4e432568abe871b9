//! Perspective projection and the per-frame camera uniform.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 5000.0,
        }
    }
}

impl Projection {
    /// Reverse-Z perspective matrix: near maps to depth 1, far to 0.
    pub fn matrix(&self) -> Mat4 {
        // Swapping near and far flips the depth range.
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.far,
            self.near,
        )
    }

    /// Update the aspect ratio from a surface size. Zero heights are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

/// GPU-side camera data at group 0, binding 0.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// World-space eye position; `w` is unused.
    pub camera_pos: [f32; 4],
}

impl CameraUniform {
    pub fn new(view: Mat4, projection: &Projection, eye: Vec3) -> Self {
        Self {
            view_proj: (projection.matrix() * view).to_cols_array_2d(),
            camera_pos: eye.extend(1.0).to_array(),
        }
    }
}
