use orrery_input::CameraState;

use crate::body::{Body, BodySpec, Satellite};
use crate::catalog::{MOON, MOON_PARENT, PLANETS};

/// Everything that changes from frame to frame.
///
/// Owned by the frame loop and passed by reference to the update and draw-list
/// steps.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    /// Planets in draw order.
    pub bodies: Vec<Body>,
    pub moon: Satellite,
    pub camera: CameraState,
    paused: bool,
    steps: u64,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::solar_system()
    }
}

impl SceneState {
    /// The built-in solar system with all angles at zero.
    pub fn solar_system() -> Self {
        Self::new(&PLANETS, &MOON, MOON_PARENT)
    }

    pub fn new(planets: &[BodySpec], moon: &BodySpec, moon_parent: &'static str) -> Self {
        Self {
            bodies: planets.iter().map(Body::from_spec).collect(),
            moon: Satellite {
                body: Body::from_spec(moon),
                parent: moon_parent,
            },
            camera: CameraState::default(),
            paused: false,
            steps: 0,
        }
    }

    /// Advance every orbital angle by one step unless paused.
    ///
    /// Returns whether anything moved.
    pub fn advance(&mut self) -> bool {
        if self.paused {
            return false;
        }
        for body in &mut self.bodies {
            body.step();
        }
        self.moon.body.step();
        self.steps += 1;
        true
    }

    /// Run `n` steps. Returns how many actually advanced.
    pub fn advance_frames(&mut self, n: u32) -> u32 {
        (0..n).map(|_| self.advance()).filter(|&moved| moved).count() as u32
    }

    /// Flip the pause flag and return the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.set_paused(!self.paused);
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused != self.paused {
            tracing::info!(paused, step = self.steps, "orbital animation toggled");
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of steps taken since startup.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn body(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.name == name)
    }

    /// Index of the moon's parent in [`bodies`](Self::bodies).
    pub fn moon_parent_index(&self) -> Option<usize> {
        self.bodies.iter().position(|b| b.name == self.moon.parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angles(scene: &SceneState) -> Vec<f32> {
        scene
            .bodies
            .iter()
            .map(|b| b.current_angle)
            .chain(std::iter::once(scene.moon.body.current_angle))
            .collect()
    }

    #[test]
    fn test_starts_at_zero_and_unpaused() {
        let scene = SceneState::solar_system();
        assert_eq!(scene.bodies.len(), 8);
        assert!(angles(&scene).iter().all(|&a| a == 0.0));
        assert!(!scene.is_paused());
        assert_eq!(scene.camera, CameraState::default());
    }

    #[test]
    fn test_one_frame_moves_earth_by_its_speed() {
        let mut scene = SceneState::solar_system();
        assert!(scene.advance());
        assert_eq!(scene.body("earth").unwrap().current_angle, 0.1);
        assert_eq!(scene.moon.body.current_angle, 2.0);
    }

    #[test]
    fn test_n_frames_advance_by_n_times_speed() {
        let mut scene = SceneState::solar_system();
        let n = 500;
        assert_eq!(scene.advance_frames(n), n);
        for body in &scene.bodies {
            let expected = (n as f32 * body.angular_speed).rem_euclid(360.0);
            assert!(
                (body.current_angle - expected).abs() < 1e-2,
                "{}: {} vs {expected}",
                body.name,
                body.current_angle
            );
        }
        // 500 * 2.0 = 1000 = 2 full turns + 280.
        assert!((scene.moon.body.current_angle - 280.0).abs() < 1e-3);
    }

    #[test]
    fn test_paused_frames_freeze_every_angle() {
        let mut scene = SceneState::solar_system();
        scene.advance_frames(3);
        let before = angles(&scene);

        assert!(scene.toggle_pause());
        assert_eq!(scene.advance_frames(10), 0);
        assert!(!scene.advance());
        assert_eq!(angles(&scene), before);
        assert_eq!(scene.steps(), 3);

        assert!(!scene.toggle_pause());
        scene.advance();
        assert_ne!(angles(&scene), before);
    }

    #[test]
    fn test_pause_after_one_frame_holds_earth() {
        let mut scene = SceneState::solar_system();
        scene.advance();
        let s = scene.body("earth").unwrap().current_angle;
        scene.toggle_pause();
        scene.advance_frames(10);
        assert_eq!(scene.body("earth").unwrap().current_angle, s);
    }

    #[test]
    fn test_pause_leaves_camera_writable() {
        let mut scene = SceneState::solar_system();
        scene.set_paused(true);
        scene.camera.yaw = 45.0;
        scene.advance();
        assert_eq!(scene.camera.yaw, 45.0);
    }

    #[test]
    fn test_angles_never_decrease_mod_360_while_running() {
        let mut scene = SceneState::solar_system();
        let mut prev = angles(&scene);
        for _ in 0..400 {
            scene.advance();
            let now = angles(&scene);
            for (a, b) in prev.iter().zip(&now) {
                // A drop is only allowed when wrapping past 360.
                assert!(b >= a || (*a > 180.0 && *b < 180.0), "angle went back: {a} -> {b}");
            }
            prev = now;
        }
    }

    #[test]
    fn test_moon_parent_is_earth() {
        let scene = SceneState::solar_system();
        let idx = scene.moon_parent_index().unwrap();
        assert_eq!(scene.bodies[idx].name, "earth");
    }
}
