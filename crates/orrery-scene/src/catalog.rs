//! The fixed solar system the viewer shows.
//!
//! Distances are compressed and radii exaggerated so every planet is visible
//! from the default zoom. Speeds are degrees per simulation step; axial tilts
//! are the real obliquities.

use crate::body::{BodySpec, RingSpec};

/// Unlit scenery drawn before the planets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneryItem {
    pub name: &'static str,
    pub radius: f32,
    pub texture: &'static str,
}

pub const STARFIELD: SceneryItem = SceneryItem {
    name: "stars",
    radius: 1000.0,
    texture: "8k_stars.jpg",
};

pub const SUN: SceneryItem = SceneryItem {
    name: "sun",
    radius: 2.0,
    texture: "8k_sun.jpg",
};

pub const SATURN_RING: RingSpec = RingSpec {
    inner_radius: 3.0,
    outer_radius: 5.0,
    segments: 64,
    texture: "8k_saturn_ring_alpha.png",
};

/// Planets in draw order, innermost first.
pub const PLANETS: [BodySpec; 8] = [
    planet("mercury", 0.3, 40.0, 0.415, 0.03, "8k_mercury.jpg"),
    planet("venus", 0.7, 70.0, 0.162, 177.4, "4k_venus_atmosphere.jpg"),
    planet("earth", 1.0, 100.0, 0.1, 23.44, "8k_earth_daymap.jpg"),
    planet("mars", 0.5, 150.0, 0.053, 25.19, "8k_mars.jpg"),
    planet("jupiter", 3.0, 300.0, 0.0084, 3.13, "8k_jupiter.jpg"),
    BodySpec {
        ring: Some(SATURN_RING),
        ..planet("saturn", 2.5, 500.0, 0.0034, 26.73, "8k_saturn.jpg")
    },
    planet("uranus", 2.0, 700.0, 0.0011, 97.77, "2k_uranus.jpg"),
    planet("neptune", 1.8, 900.0, 0.0006, 28.32, "2k_neptune.jpg"),
];

/// Earth's moon. Its speed is fixed and unrelated to Earth's.
pub const MOON: BodySpec = planet("moon", 0.3, 1.5, 2.0, 6.68, "8k_moon.jpg");

pub const MOON_PARENT: &str = "earth";

const fn planet(
    name: &'static str,
    radius: f32,
    orbit_distance: f32,
    angular_speed: f32,
    axial_tilt: f32,
    texture: &'static str,
) -> BodySpec {
    BodySpec {
        name,
        radius,
        orbit_distance,
        angular_speed,
        axial_tilt,
        texture,
        ring: None,
    }
}

/// Every texture the scene needs as `(key, file name)` pairs.
///
/// Keys are body names, plus `"<planet>_ring"` for rings.
pub fn texture_manifest() -> Vec<(String, &'static str)> {
    let mut manifest = vec![
        (STARFIELD.name.to_string(), STARFIELD.texture),
        (SUN.name.to_string(), SUN.texture),
    ];
    for spec in &PLANETS {
        manifest.push((spec.name.to_string(), spec.texture));
        if let Some(ring) = &spec.ring {
            manifest.push((ring_texture_key(spec.name), ring.texture));
        }
    }
    manifest.push((MOON.name.to_string(), MOON.texture));
    manifest
}

/// Texture key for the ring of `planet`.
pub fn ring_texture_key(planet: &str) -> String {
    format!("{planet}_ring")
}
