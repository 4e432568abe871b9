//! The per-frame update: input dispatch followed by the simulation step.
//!
//! Kept free of window and GPU state so a whole frame of logic can be driven
//! from tests.

use std::time::Instant;

use orrery_config::StepMode;
use orrery_input::{FrameInput, OrbitController};
use orrery_scene::SceneState;

use crate::game_loop::GameLoop;

/// Decides how many simulation steps each rendered frame gets.
#[derive(Debug, Clone)]
pub enum Stepper {
    /// Exactly one step per frame.
    PerFrame,
    /// Steps at [`FIXED_DT`](crate::game_loop::FIXED_DT) of wall-clock time.
    FixedRate(GameLoop),
}

impl Stepper {
    pub fn from_mode(mode: StepMode) -> Self {
        match mode {
            StepMode::PerFrame => Self::PerFrame,
            StepMode::FixedRate => Self::FixedRate(GameLoop::new()),
        }
    }

    pub fn steps_due(&mut self, now: Instant) -> u32 {
        match self {
            Self::PerFrame => 1,
            Self::FixedRate(game_loop) => game_loop.steps_at(now),
        }
    }
}

/// What one frame update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameOutcome {
    /// Steps the scene actually advanced (zero while paused).
    pub steps_taken: u32,
    pub pause_toggled: bool,
    pub quit: bool,
}

/// Apply one frame of input to the camera and pause flag, then advance the
/// orbits by `steps` unless paused. Nothing advances once quit is requested.
pub fn update_frame(
    scene: &mut SceneState,
    controller: &mut OrbitController,
    input: FrameInput,
    steps: u32,
) -> FrameOutcome {
    if input.quit_requested {
        return FrameOutcome {
            quit: true,
            ..FrameOutcome::default()
        };
    }

    for event in input.pointer.iter().copied() {
        controller.handle(&mut scene.camera, event);
    }

    let pause_toggled = input.toggles_pause();
    if pause_toggled {
        scene.toggle_pause();
    }

    FrameOutcome {
        steps_taken: scene.advance_frames(steps),
        pause_toggled,
        quit: false,
    }
}
