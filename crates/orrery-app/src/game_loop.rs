//! Frame pacing: the frame-rate cap and the fixed-timestep accumulator.

use std::time::{Duration, Instant};
use tracing::warn;

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame the accumulator will absorb. Slower frames are clamped so a
/// stall does not turn into a burst of catch-up steps.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Fixed-timestep accumulator.
///
/// Converts wall-clock frame times into a whole number of simulation steps.
#[derive(Debug, Clone)]
pub struct GameLoop {
    previous_time: Option<Instant>,
    accumulator: f64,
    update_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            previous_time: None,
            accumulator: 0.0,
            update_count: 0,
        }
    }

    /// Measure the time since the previous call and return how many fixed
    /// steps are due. The first call only starts the clock.
    pub fn steps_at(&mut self, now: Instant) -> u32 {
        let Some(previous) = self.previous_time.replace(now) else {
            return 0;
        };
        self.accumulate(now.saturating_duration_since(previous).as_secs_f64())
    }

    /// Add `frame_time` seconds and drain whole steps from the accumulator.
    pub fn accumulate(&mut self, frame_time: f64) -> u32 {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        let mut steps = 0;
        while self.accumulator >= FIXED_DT {
            self.accumulator -= FIXED_DT;
            steps += 1;
        }
        self.update_count += u64::from(steps);
        steps
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        self.accumulator / FIXED_DT
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Caps the redraw rate by handing out frame deadlines.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    /// `None` when uncapped.
    frame_duration: Option<Duration>,
    deadline: Instant,
}

impl FrameLimiter {
    /// A limiter whose first frame is due at `now`. A target of 0 fps means
    /// uncapped: every frame is due immediately.
    pub fn new(target_fps: u32, now: Instant) -> Self {
        Self {
            frame_duration: (target_fps > 0)
                .then(|| Duration::from_secs_f64(1.0 / f64::from(target_fps))),
            deadline: now,
        }
    }

    pub fn frame_duration(&self) -> Option<Duration> {
        self.frame_duration
    }

    pub fn is_uncapped(&self) -> bool {
        self.frame_duration.is_none()
    }

    /// When the next frame should start, or `None` when uncapped.
    pub fn deadline(&self) -> Option<Instant> {
        self.frame_duration.map(|_| self.deadline)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.is_uncapped() || now >= self.deadline
    }

    /// Move the deadline one frame forward. If that still lies in the past the
    /// missed frames are dropped rather than rendered back to back.
    pub fn schedule_next(&mut self, now: Instant) -> Option<Instant> {
        let frame = self.frame_duration?;
        self.deadline += frame;
        if self.deadline <= now {
            self.deadline = now + frame;
        }
        Some(self.deadline)
    }
}
