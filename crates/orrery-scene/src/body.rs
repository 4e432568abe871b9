//! Celestial body records.

/// Static description of a body as it appears in the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySpec {
    pub name: &'static str,
    /// Sphere radius in scene units.
    pub radius: f32,
    /// Distance from the parent's centre in scene units.
    pub orbit_distance: f32,
    /// Degrees added to the orbital angle on every simulation step.
    pub angular_speed: f32,
    /// Tilt of the spin axis about the body's local X axis, in degrees.
    pub axial_tilt: f32,
    /// Texture file name, relative to the texture directory.
    pub texture: &'static str,
    pub ring: Option<RingSpec>,
}

/// A flat ring drawn in a planet's orbital frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSpec {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub segments: u32,
    pub texture: &'static str,
}

/// A body with its live orbital angle.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: &'static str,
    pub radius: f32,
    pub orbit_distance: f32,
    pub angular_speed: f32,
    pub axial_tilt: f32,
    /// Current orbital angle in degrees, kept in `[0, 360)`.
    pub current_angle: f32,
    pub texture: &'static str,
    pub ring: Option<RingSpec>,
}

impl Body {
    pub fn from_spec(spec: &BodySpec) -> Self {
        Self {
            name: spec.name,
            radius: spec.radius,
            orbit_distance: spec.orbit_distance,
            angular_speed: spec.angular_speed,
            axial_tilt: spec.axial_tilt,
            current_angle: 0.0,
            texture: spec.texture,
            ring: spec.ring,
        }
    }

    /// Advance the orbital angle by one step.
    pub fn step(&mut self) {
        self.current_angle = wrap_degrees(self.current_angle + self.angular_speed);
    }
}

/// A body orbiting one of the planets rather than the sun.
#[derive(Debug, Clone, PartialEq)]
pub struct Satellite {
    pub body: Body,
    /// Name of the planet it orbits.
    pub parent: &'static str,
}

pub(crate) fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
