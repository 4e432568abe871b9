//! wgpu rendering for the orrery: device and surface setup, textures, depth,
//! mesh upload and the textured body pipeline.

pub mod body_pipeline;
pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod texture;

pub use body_pipeline::{
    BODY_SHADER_SOURCE, BodyDraw, BodyPipeline, BodyRenderer, DrawUniform, LightUniform,
    SUN_LIGHT_COLOR, draw_order, draw_stride,
};
pub use buffer::MeshBuffer;
pub use camera::{CameraUniform, Projection};
pub use depth::DepthBuffer;
pub use gpu::{
    RenderContext, RenderContextError, SurfaceError, clamp_surface_size,
    init_render_context_blocking,
};
pub use pass::{FrameEncoder, RenderPassBuilder, SPACE_BLACK};
pub use texture::{
    ManagedTexture, TEXTURE_FORMAT, TextureError, TextureManager, TextureRequest,
    TextureSetError, TextureWrap, decode_image, fit_within, stream_texture_set,
};
