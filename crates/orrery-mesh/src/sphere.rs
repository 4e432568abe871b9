//! Latitude/longitude UV sphere with a baked axial tilt.

use glam::{Mat3, Vec3};

use crate::{Mesh, MeshVertex};

/// Generate a UV sphere of `radius`, tilted about its local X axis by `axial_tilt_deg`.
///
/// Poles sit on the local Y axis before tilting. Texture coordinates follow the
/// sphere's own parameterization: U runs with longitude from 0 to 1, V runs from
/// the north pole (0) to the south pole (1), so an equirectangular map wraps
/// once without tiling.
///
/// The seam column and the pole rows are duplicated, giving
/// `(slices + 1) * (stacks + 1)` vertices and `slices * stacks * 2` triangles.
/// `slices` is clamped to at least 3 and `stacks` to at least 2.
pub fn sphere(radius: f32, slices: u32, stacks: u32, axial_tilt_deg: f32) -> Mesh {
    let slices = slices.max(3);
    let stacks = stacks.max(2);
    let tilt = Mat3::from_rotation_x(axial_tilt_deg.to_radians());

    let mut vertices = Vec::with_capacity(((slices + 1) * (stacks + 1)) as usize);
    for stack in 0..=stacks {
        let v = stack as f32 / stacks as f32;
        let polar = v * std::f32::consts::PI;
        let (sin_polar, cos_polar) = polar.sin_cos();

        for slice in 0..=slices {
            let u = slice as f32 / slices as f32;
            let azimuth = u * std::f32::consts::TAU;
            let (sin_az, cos_az) = azimuth.sin_cos();

            // -z keeps the texture unmirrored when seen from outside.
            let unit = tilt * Vec3::new(sin_polar * cos_az, cos_polar, -sin_polar * sin_az);
            vertices.push(MeshVertex {
                position: (unit * radius).to_array(),
                normal: unit.to_array(),
                uv: [u, v],
            });
        }
    }

    let row = slices + 1;
    let mut indices = Vec::with_capacity((slices * stacks * 6) as usize);
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack * row + slice;
            let b = a + row;
            let c = a + 1;
            let d = b + 1;
            indices.extend_from_slice(&[a, b, c, c, b, d]);
        }
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(v: &MeshVertex) -> Vec3 {
        Vec3::from_array(v.position)
    }

    #[test]
    fn test_counts() {
        let mesh = sphere(1.0, 32, 32, 0.0);
        assert_eq!(mesh.vertex_count(), 33 * 33);
        assert_eq!(mesh.indices.len(), 32 * 32 * 6);
        assert_eq!(mesh.triangle_count(), 32 * 32 * 2);
    }

    #[test]
    fn test_vertices_on_radius() {
        let mesh = sphere(2.5, 16, 12, 26.73);
        for v in &mesh.vertices {
            let len = pos(v).length();
            assert!((len - 2.5).abs() < 1e-4, "vertex off sphere: length = {len}");
        }
    }

    #[test]
    fn test_indices_valid() {
        let mesh = sphere(1.0, 8, 6, 0.0);
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn test_uvs_cover_unit_square() {
        let mesh = sphere(1.0, 10, 10, 0.0);
        for v in &mesh.vertices {
            assert!((0.0..=1.0).contains(&v.uv[0]), "U out of range: {}", v.uv[0]);
            assert!((0.0..=1.0).contains(&v.uv[1]), "V out of range: {}", v.uv[1]);
        }
        assert_eq!(mesh.vertices.first().unwrap().uv, [0.0, 0.0]);
        assert_eq!(mesh.vertices.last().unwrap().uv, [1.0, 1.0]);
    }

    #[test]
    fn test_untilted_poles_on_y_axis() {
        let mesh = sphere(1.0, 8, 8, 0.0);
        let north = pos(&mesh.vertices[0]);
        let south = pos(mesh.vertices.last().unwrap());
        assert!((north - Vec3::Y).length() < 1e-5);
        assert!((south + Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_tilt_rotates_pole_about_x() {
        let mesh = sphere(1.0, 8, 8, 90.0);
        let north = pos(&mesh.vertices[0]);
        assert!((north - Vec3::Z).length() < 1e-5, "north pole at {north}");
    }

    #[test]
    fn test_normals_are_unit_and_outward() {
        let mesh = sphere(3.0, 12, 12, 23.44);
        for v in &mesh.vertices {
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!((pos(v) / 3.0 - n).length() < 1e-5);
        }
    }

    #[test]
    fn test_triangles_wind_counter_clockwise_from_outside() {
        let mesh = sphere(1.0, 16, 16, 0.0);
        let mut checked = 0;
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| pos(&mesh.vertices[tri[k] as usize]));
            let face = (b - a).cross(c - a);
            // Triangles touching a pole are degenerate.
            if face.length() < 1e-6 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(face.dot(centroid) > 0.0);
            checked += 1;
        }
        assert!(checked > 0);
    }

    #[test]
    fn test_degenerate_tessellation_clamped() {
        let mesh = sphere(1.0, 0, 1, 0.0);
        assert_eq!(mesh.vertex_count(), 4 * 3);
    }
}
