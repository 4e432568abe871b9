//! Flat annulus built as a closed quad strip in the local XZ plane.

use crate::{Mesh, MeshError, MeshVertex};

/// Segment count used for planetary rings.
pub const RING_SEGMENTS: u32 = 64;

/// Generate a ring between `inner_radius` and `outer_radius`.
///
/// For each of the `segments + 1` steps around the circle an outer vertex
/// (UV `(1, i % 2)`) is emitted followed by an inner vertex (UV `(0, i % 2)`).
/// U therefore spans the ring radially and V alternates per pair, stretching a
/// one-dimensional gradient texture around the circle. The final pair sits at
/// exactly the same positions as the first, closing the loop; the texture seam
/// there is accepted.
///
/// The strip is returned as a triangle list of `segments * 2` triangles.
pub fn ring(inner_radius: f32, outer_radius: f32, segments: u32) -> Result<Mesh, MeshError> {
    if segments < 3 {
        return Err(MeshError::TooFewSegments(segments));
    }
    if !(inner_radius.is_finite() && outer_radius.is_finite())
        || inner_radius < 0.0
        || outer_radius <= inner_radius
    {
        return Err(MeshError::InvalidRadii {
            inner: inner_radius,
            outer: outer_radius,
        });
    }

    let mut vertices = Vec::with_capacity(2 * (segments as usize + 1));
    for i in 0..=segments {
        // Step `segments` reuses angle 0 so the strip closes bit-exactly.
        let theta = std::f32::consts::TAU * (i % segments) as f32 / segments as f32;
        let (z, x) = theta.sin_cos();
        let v = (i % 2) as f32;

        vertices.push(MeshVertex {
            position: [x * outer_radius, 0.0, z * outer_radius],
            normal: [0.0, 1.0, 0.0],
            uv: [1.0, v],
        });
        vertices.push(MeshVertex {
            position: [x * inner_radius, 0.0, z * inner_radius],
            normal: [0.0, 1.0, 0.0],
            uv: [0.0, v],
        });
    }

    let mut indices = Vec::with_capacity(segments as usize * 6);
    for i in 0..segments {
        let outer = 2 * i;
        let inner = outer + 1;
        let next_outer = outer + 2;
        let next_inner = outer + 3;
        indices.extend_from_slice(&[outer, inner, next_outer, next_outer, inner, next_inner]);
    }

    Ok(Mesh { vertices, indices })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_count_is_two_per_step() {
        let mesh = ring(3.0, 5.0, RING_SEGMENTS).unwrap();
        assert_eq!(mesh.vertex_count(), 2 * (RING_SEGMENTS as usize + 1));
        assert_eq!(mesh.triangle_count(), 2 * RING_SEGMENTS as usize);
    }

    #[test]
    fn test_loop_closes_exactly() {
        let mesh = ring(3.0, 5.0, 64).unwrap();
        let n = mesh.vertex_count();
        assert_eq!(mesh.vertices[0].position, mesh.vertices[n - 2].position);
        assert_eq!(mesh.vertices[1].position, mesh.vertices[n - 1].position);
    }

    #[test]
    fn test_flat_in_xz_plane_between_radii() {
        let mesh = ring(3.0, 5.0, 64).unwrap();
        for (k, v) in mesh.vertices.iter().enumerate() {
            let [x, y, z] = v.position;
            assert_eq!(y, 0.0);
            let r = (x * x + z * z).sqrt();
            let expected = if k % 2 == 0 { 5.0 } else { 3.0 };
            assert!((r - expected).abs() < 1e-4, "vertex {k} at radius {r}");
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn test_uvs_alternate_per_pair() {
        let mesh = ring(3.0, 5.0, 8).unwrap();
        for (i, pair) in mesh.vertices.chunks(2).enumerate() {
            let v = (i % 2) as f32;
            assert_eq!(pair[0].uv, [1.0, v]);
            assert_eq!(pair[1].uv, [0.0, v]);
        }
    }

    #[test]
    fn test_indices_valid() {
        let mesh = ring(1.0, 2.0, 3).unwrap();
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn test_rejects_too_few_segments() {
        assert_eq!(ring(3.0, 5.0, 2), Err(MeshError::TooFewSegments(2)));
        assert!(ring(3.0, 5.0, 3).is_ok());
    }

    #[test]
    fn test_rejects_bad_radii() {
        assert!(matches!(ring(5.0, 3.0, 64), Err(MeshError::InvalidRadii { .. })));
        assert!(matches!(ring(-1.0, 3.0, 64), Err(MeshError::InvalidRadii { .. })));
        assert!(matches!(ring(1.0, f32::NAN, 64), Err(MeshError::InvalidRadii { .. })));
        assert!(ring(0.0, 3.0, 64).is_ok());
    }
}
