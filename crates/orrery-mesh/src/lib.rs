//! Procedural primitives for the orrery: tilted UV spheres and flat ring strips.
//!
//! Meshes are built on the CPU once at startup and uploaded by the renderer.

mod ring;
mod sphere;
pub mod vertex_format;

pub use ring::{RING_SEGMENTS, ring};
pub use sphere::sphere;
pub use vertex_format::{MESH_VERTEX_ATTRIBUTES, MESH_VERTEX_LAYOUT, MeshVertex};

/// Indexed triangle-list geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    /// Triangle-list indices into `vertices`.
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Errors from primitive generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// A ring needs at least three segments to enclose any area.
    #[error("ring needs at least 3 segments, got {0}")]
    TooFewSegments(u32),

    #[error("invalid ring radii: inner {inner}, outer {outer}")]
    InvalidRadii { inner: f32, outer: f32 },
}
