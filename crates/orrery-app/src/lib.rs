//! The orrery viewer: window, frame loop and scene rendering.

pub mod frame;
pub mod game_loop;
pub mod renderer;
pub mod window;

pub use frame::{FrameOutcome, Stepper, update_frame};
pub use game_loop::{FIXED_DT, FrameLimiter, GameLoop};
pub use renderer::{RendererError, SolarSystemRenderer, build_meshes, texture_key, texture_requests};
pub use window::{AppError, AppState, run};
