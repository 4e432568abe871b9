//! Transform chains and the per-frame draw list.
//!
//! Each body's model matrix is composed directly from its orbit parameters
//! instead of through a mutable matrix stack:
//!
//! ```text
//! planet = Ry(angle) * T(distance, 0, 0)
//! ring   = planet
//! moon   = planet(parent) * Ry(moon angle) * T(moon distance, 0, 0)
//! ```
//!
//! Radius and axial tilt are baked into each body's mesh, so they do not appear
//! in the chain.

use glam::{Mat4, Vec3};
use orrery_input::CameraState;

use crate::body::Body;
use crate::state::SceneState;

/// View matrix for the orbit camera: `T(0, 0, zoom) * Rx(pitch) * Ry(yaw)`.
pub fn view_matrix(camera: &CameraState) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, camera.zoom_distance))
        * Mat4::from_rotation_x(camera.pitch.to_radians())
        * Mat4::from_rotation_y(camera.yaw.to_radians())
}

/// World-space camera position implied by [`view_matrix`].
pub fn camera_position(camera: &CameraState) -> Vec3 {
    view_matrix(camera).inverse().w_axis.truncate()
}

/// Rotate by `angle_deg` about the parent's Y axis, then step out along X.
pub fn orbit_frame(angle_deg: f32, distance: f32) -> Mat4 {
    Mat4::from_rotation_y(angle_deg.to_radians())
        * Mat4::from_translation(Vec3::new(distance, 0.0, 0.0))
}

pub fn body_model(body: &Body) -> Mat4 {
    orbit_frame(body.current_angle, body.orbit_distance)
}

/// Model matrix for a satellite orbiting `parent`.
pub fn satellite_model(parent: &Body, satellite: &Body) -> Mat4 {
    body_model(parent) * body_model(satellite)
}

/// What a [`DrawItem`] draws. Indices refer to [`SceneState::bodies`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Renderable {
    Starfield,
    Sun,
    Planet(usize),
    Ring(usize),
    Moon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Full texture colour, no light applied.
    Unlit,
    /// Diffuse and specular from the point light at the sun.
    Lit,
}

/// One draw call for the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub renderable: Renderable,
    pub model: Mat4,
    pub shading: Shading,
    /// Texture coordinate multiplier; above 1 tiles the texture.
    pub uv_scale: f32,
}

impl DrawItem {
    fn new(renderable: Renderable, model: Mat4, shading: Shading) -> Self {
        Self {
            renderable,
            model,
            shading,
            uv_scale: 1.0,
        }
    }

    /// Rings are alpha blended and must be drawn after opaque geometry.
    pub fn is_translucent(&self) -> bool {
        matches!(self.renderable, Renderable::Ring(_))
    }

    /// World-space origin of the item's local frame.
    pub fn origin(&self) -> Vec3 {
        self.model.w_axis.truncate()
    }
}

/// Build the frame's draw calls in scene order: starfield, sun, then each
/// planet followed by its ring and, for the moon's parent, the moon.
pub fn build_draw_list(scene: &SceneState, starfield_tile_factor: f32) -> Vec<DrawItem> {
    let mut items = Vec::with_capacity(scene.bodies.len() + 4);

    items.push(DrawItem {
        uv_scale: starfield_tile_factor,
        ..DrawItem::new(Renderable::Starfield, Mat4::IDENTITY, Shading::Unlit)
    });
    items.push(DrawItem::new(Renderable::Sun, Mat4::IDENTITY, Shading::Unlit));

    for (index, body) in scene.bodies.iter().enumerate() {
        let frame = body_model(body);
        items.push(DrawItem::new(Renderable::Planet(index), frame, Shading::Lit));

        if body.ring.is_some() {
            // The ring plane contains the sun, so Lambert shading would leave
            // it at ambient.
            items.push(DrawItem::new(Renderable::Ring(index), frame, Shading::Unlit));
        }
        if body.name == scene.moon.parent {
            let model = satellite_model(body, &scene.moon.body);
            items.push(DrawItem::new(Renderable::Moon, model, Shading::Lit));
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_default_view_puts_origin_in_front() {
        let view = view_matrix(&CameraState::default());
        let origin = view.transform_point3(Vec3::ZERO);
        assert!(approx(origin, Vec3::new(0.0, 0.0, -100.0)));
        assert!(approx(camera_position(&CameraState::default()), Vec3::new(0.0, 0.0, 100.0)));
    }

    #[test]
    fn test_yaw_turns_scene_about_y() {
        let cam = CameraState {
            yaw: 90.0,
            ..Default::default()
        };
        let p = view_matrix(&cam).transform_point3(Vec3::new(10.0, 0.0, 0.0));
        assert!(approx(p, Vec3::new(0.0, 0.0, -110.0)), "got {p}");
    }

    #[test]
    fn test_pitch_applied_after_yaw() {
        let cam = CameraState {
            yaw: 90.0,
            pitch: 90.0,
            zoom_distance: 0.0,
        };
        // Ry(90) takes +X to -Z, then Rx(90) takes -Z to +Y.
        let p = view_matrix(&cam).transform_point3(Vec3::X);
        assert!(approx(p, Vec3::Y), "got {p}");
    }

    #[test]
    fn test_orbit_frame_places_body_on_circle() {
        assert!(approx(orbit_frame(0.0, 100.0).transform_point3(Vec3::ZERO), Vec3::new(100.0, 0.0, 0.0)));
        assert!(approx(orbit_frame(90.0, 100.0).transform_point3(Vec3::ZERO), Vec3::new(0.0, 0.0, -100.0)));
        for deg in [13.0, 170.0, 259.5] {
            let p = orbit_frame(deg, 40.0).transform_point3(Vec3::ZERO);
            assert!((p.length() - 40.0).abs() < 1e-3);
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn test_draw_list_order() {
        let scene = SceneState::solar_system();
        let order: Vec<_> = build_draw_list(&scene, 100.0)
            .iter()
            .map(|d| d.renderable)
            .collect();
        assert_eq!(
            order,
            vec![
                Renderable::Starfield,
                Renderable::Sun,
                Renderable::Planet(0),
                Renderable::Planet(1),
                Renderable::Planet(2),
                Renderable::Moon,
                Renderable::Planet(3),
                Renderable::Planet(4),
                Renderable::Planet(5),
                Renderable::Ring(5),
                Renderable::Planet(6),
                Renderable::Planet(7),
            ]
        );
    }

    #[test]
    fn test_background_and_sun_unlit_planets_lit() {
        let scene = SceneState::solar_system();
        let items = build_draw_list(&scene, 100.0);
        assert_eq!(items[0].shading, Shading::Unlit);
        assert_eq!(items[0].uv_scale, 100.0);
        assert_eq!(items[1].shading, Shading::Unlit);
        assert_eq!(items[1].uv_scale, 1.0);
        for item in &items {
            if let Renderable::Planet(_) | Renderable::Moon = item.renderable {
                assert_eq!(item.shading, Shading::Lit);
            }
        }
        assert_eq!(items.iter().filter(|d| d.is_translucent()).count(), 1);
    }

    #[test]
    fn test_ring_shares_saturn_frame() {
        let mut scene = SceneState::solar_system();
        scene.advance_frames(1000);
        let items = build_draw_list(&scene, 1.0);
        let saturn = items.iter().find(|d| d.renderable == Renderable::Planet(5)).unwrap();
        let ring = items.iter().find(|d| d.renderable == Renderable::Ring(5)).unwrap();
        assert_eq!(saturn.model, ring.model);
    }

    #[test]
    fn test_moon_stays_at_fixed_distance_from_earth() {
        let mut scene = SceneState::solar_system();
        for _ in 0..50 {
            scene.advance_frames(7);
            let items = build_draw_list(&scene, 1.0);
            let earth = items.iter().find(|d| d.renderable == Renderable::Planet(2)).unwrap();
            let moon = items.iter().find(|d| d.renderable == Renderable::Moon).unwrap();
            let gap = (moon.origin() - earth.origin()).length();
            assert!((gap - 1.5).abs() < 1e-3, "moon is {gap} from earth");
        }
    }

    #[test]
    fn test_satellite_model_matches_draw_list() {
        let mut scene = SceneState::solar_system();
        scene.advance_frames(12);
        let earth = scene.body("earth").unwrap();
        let expected = satellite_model(earth, &scene.moon.body);
        let items = build_draw_list(&scene, 1.0);
        let moon = items.iter().find(|d| d.renderable == Renderable::Moon).unwrap();
        assert_eq!(moon.model, expected);
    }

    #[test]
    fn test_ring_is_unlit_and_edge_on_to_the_sun() {
        let mut scene = SceneState::solar_system();
        scene.advance_frames(37);
        let items = build_draw_list(&scene, 1.0);
        let ring = items.iter().find(|d| d.renderable == Renderable::Ring(5)).unwrap();
        assert_eq!(ring.shading, Shading::Unlit);

        let normal = ring.model.transform_vector3(Vec3::Y);
        let to_sun = (Vec3::ZERO - ring.origin()).normalize();
        assert!(normal.dot(to_sun).abs() < 1e-5);
    }
}
