//! Scene model for the orrery: the static body catalog, the per-frame
//! [`SceneState`], and the transform chains that place every body.

pub mod body;
pub mod catalog;
mod state;
pub mod transform;

pub use body::{Body, BodySpec, RingSpec, Satellite};
pub use catalog::{
    MOON, MOON_PARENT, PLANETS, SATURN_RING, STARFIELD, SUN, SceneryItem, ring_texture_key,
    texture_manifest,
};
pub use orrery_input::CameraState;
pub use state::SceneState;
pub use transform::{DrawItem, Renderable, Shading, build_draw_list, view_matrix};
