//! Pipeline and renderer for textured celestial bodies.
//!
//! One shader covers every body. Per-draw data (model matrix, lit flag and
//! texture coordinate scale) lives in a single uniform buffer addressed by
//! dynamic offset, so a frame costs one buffer write no matter how many bodies
//! it draws. Opaque draws are issued first; translucent ones follow with depth
//! writes disabled.

use std::mem;
use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use orrery_mesh::MESH_VERTEX_LAYOUT;

use crate::buffer::MeshBuffer;
use crate::camera::CameraUniform;
use crate::depth::DepthBuffer;
use crate::texture::ManagedTexture;

pub const BODY_SHADER_SOURCE: &str = include_str!("body.wgsl");

/// Warm white of the sun's light.
pub const SUN_LIGHT_COLOR: Vec3 = Vec3::new(1.0, 1.0, 0.8);

const INITIAL_DRAW_CAPACITY: usize = 16;

/// Point light at group 0, binding 1.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub color: [f32; 4],
    /// x: ambient, y: specular strength, w: shininess.
    pub params: [f32; 4],
}

impl LightUniform {
    pub fn point(position: Vec3, color: Vec3, ambient: f32) -> Self {
        Self {
            position: position.extend(1.0).to_array(),
            color: color.extend(1.0).to_array(),
            params: [ambient, 0.3, 0.0, 32.0],
        }
    }
}

impl Default for LightUniform {
    /// The sun: at the origin, warm white, faint ambient fill.
    fn default() -> Self {
        Self::point(Vec3::ZERO, SUN_LIGHT_COLOR, 0.05)
    }
}

/// Per-draw data at group 2, binding 0.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    /// x: lit flag, y: uv scale.
    pub params: [f32; 4],
}

impl DrawUniform {
    pub fn new(model: Mat4, lit: bool, uv_scale: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            params: [if lit { 1.0 } else { 0.0 }, uv_scale, 0.0, 0.0],
        }
    }
}

/// One body to draw this frame.
pub struct BodyDraw<'a> {
    pub mesh: &'a MeshBuffer,
    pub texture: &'a ManagedTexture,
    pub model: Mat4,
    pub lit: bool,
    pub uv_scale: f32,
    /// Alpha blended, drawn after every opaque body.
    pub translucent: bool,
}

/// Distance between consecutive [`DrawUniform`]s in the draw buffer.
pub fn draw_stride(min_uniform_alignment: u32) -> u64 {
    let size = mem::size_of::<DrawUniform>() as u64;
    size.next_multiple_of(u64::from(min_uniform_alignment.max(1)))
}

/// Submission order: opaque draws in list order, then translucent ones.
pub fn draw_order(translucent: &[bool]) -> Vec<usize> {
    let opaque = translucent.iter().enumerate().filter(|(_, t)| !**t);
    let blended = translucent.iter().enumerate().filter(|(_, t)| **t);
    opaque.chain(blended).map(|(i, _)| i).collect()
}

/// The opaque and translucent variants of the body pipeline.
pub struct BodyPipeline {
    pub opaque: wgpu::RenderPipeline,
    pub translucent: wgpu::RenderPipeline,
    /// Camera + light (group 0).
    pub frame_bind_group_layout: wgpu::BindGroupLayout,
    /// Per-draw uniform with dynamic offset (group 2).
    pub draw_bind_group_layout: wgpu::BindGroupLayout,
}

impl BodyPipeline {
    /// `texture_bind_group_layout` is the layout for group 1 (texture + sampler).
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("body-shader"),
            source: wgpu::ShaderSource::Wgsl(BODY_SHADER_SOURCE.into()),
        });

        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("body-frame-bind-group-layout"),
                entries: &[
                    uniform_entry(
                        0,
                        wgpu::ShaderStages::VERTEX_FRAGMENT,
                        false,
                        mem::size_of::<CameraUniform>(),
                    ),
                    uniform_entry(
                        1,
                        wgpu::ShaderStages::FRAGMENT,
                        false,
                        mem::size_of::<LightUniform>(),
                    ),
                ],
            });

        let draw_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("body-draw-bind-group-layout"),
                entries: &[uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                    true,
                    mem::size_of::<DrawUniform>(),
                )],
            });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("body-pipeline-layout"),
            bind_group_layouts: &[
                &frame_bind_group_layout,
                texture_bind_group_layout,
                &draw_bind_group_layout,
            ],
            immediate_size: 0,
        });

        let build = |label: &str, blend: Option<wgpu::BlendState>, depth_write: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[MESH_VERTEX_LAYOUT],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // The starfield is seen from inside and the ring from both sides.
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(DepthBuffer::stencil_state(depth_write)),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview_mask: None,
                cache: None,
            })
        };

        let opaque = build("body-pipeline-opaque", None, true);
        let translucent = build(
            "body-pipeline-translucent",
            Some(wgpu::BlendState::ALPHA_BLENDING),
            false,
        );

        Self {
            opaque,
            translucent,
            frame_bind_group_layout,
            draw_bind_group_layout,
        }
    }
}

fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    has_dynamic_offset: bool,
    size: usize,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset,
            min_binding_size: NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

/// Owns the body pipeline and its uniform buffers.
pub struct BodyRenderer {
    pipeline: BodyPipeline,
    camera_buffer: wgpu::Buffer,
    light_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_stride: u64,
    draw_capacity: usize,
    staging: Vec<u8>,
}

impl BodyRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
        light: LightUniform,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let pipeline = BodyPipeline::new(device, surface_format, texture_bind_group_layout);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("body-camera-uniform"),
            contents: bytemuck::bytes_of(&CameraUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("body-light-uniform"),
            contents: bytemuck::bytes_of(&light),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("body-frame-bind-group"),
            layout: &pipeline.frame_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
            ],
        });

        let draw_stride = draw_stride(device.limits().min_uniform_buffer_offset_alignment);
        let (draw_buffer, draw_bind_group) =
            create_draw_buffer(device, &pipeline, draw_stride, INITIAL_DRAW_CAPACITY);

        Self {
            pipeline,
            camera_buffer,
            light_buffer,
            frame_bind_group,
            draw_buffer,
            draw_bind_group,
            draw_stride,
            draw_capacity: INITIAL_DRAW_CAPACITY,
            staging: Vec::new(),
        }
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &CameraUniform) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(camera));
    }

    pub fn update_light(&self, queue: &wgpu::Queue, light: &LightUniform) {
        queue.write_buffer(&self.light_buffer, 0, bytemuck::bytes_of(light));
    }

    /// Upload per-draw uniforms. Must run before [`render`](Self::render)
    /// with the same slice.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, draws: &[BodyDraw<'_>]) {
        if draws.is_empty() {
            return;
        }
        if draws.len() > self.draw_capacity {
            let capacity = draws.len().next_power_of_two();
            log::debug!("Growing body draw buffer to {capacity} slots");
            let (buffer, bind_group) =
                create_draw_buffer(device, &self.pipeline, self.draw_stride, capacity);
            self.draw_buffer = buffer;
            self.draw_bind_group = bind_group;
            self.draw_capacity = capacity;
        }

        let stride = self.draw_stride as usize;
        self.staging.clear();
        self.staging.resize(stride * draws.len(), 0);
        for (slot, draw) in self.staging.chunks_exact_mut(stride).zip(draws) {
            let uniform = DrawUniform::new(draw.model, draw.lit, draw.uv_scale);
            let bytes = bytemuck::bytes_of(&uniform);
            slot[..bytes.len()].copy_from_slice(bytes);
        }
        queue.write_buffer(&self.draw_buffer, 0, &self.staging);
    }

    /// Record every draw into `pass`: opaque first, translucent last.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>, draws: &[BodyDraw<'_>]) {
        let flags: Vec<bool> = draws.iter().map(|d| d.translucent).collect();
        let mut current: Option<bool> = None;

        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        for index in draw_order(&flags) {
            let draw = &draws[index];
            if current != Some(draw.translucent) {
                let pipeline = if draw.translucent {
                    &self.pipeline.translucent
                } else {
                    &self.pipeline.opaque
                };
                pass.set_pipeline(pipeline);
                current = Some(draw.translucent);
            }
            let offset = (index as u64 * self.draw_stride) as u32;
            pass.set_bind_group(1, &draw.texture.bind_group, &[]);
            pass.set_bind_group(2, &self.draw_bind_group, &[offset]);
            draw.mesh.draw(pass);
        }
    }
}

fn create_draw_buffer(
    device: &wgpu::Device,
    pipeline: &BodyPipeline,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("body-draw-uniforms"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("body-draw-bind-group"),
        layout: &pipeline.draw_bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: NonZeroU64::new(mem::size_of::<DrawUniform>() as u64),
            }),
        }],
    });
    (buffer, bind_group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{TextureManager, TextureWrap, create_test_device_queue};

    #[test]
    fn test_uniform_sizes_match_wgsl() {
        assert_eq!(mem::size_of::<DrawUniform>(), 80);
        assert_eq!(mem::size_of::<LightUniform>(), 48);
    }

    #[test]
    fn test_draw_stride_respects_alignment() {
        assert_eq!(draw_stride(256), 256);
        assert_eq!(draw_stride(64), 128);
        assert_eq!(draw_stride(16), 80);
        assert_eq!(draw_stride(0), 80);
    }

    #[test]
    fn test_translucent_draws_go_last() {
        assert_eq!(
            draw_order(&[false, false, true, false, false]),
            vec![0, 1, 3, 4, 2]
        );
        assert_eq!(draw_order(&[]), Vec::<usize>::new());
    }

    #[test]
    fn test_draw_uniform_flags() {
        let lit = DrawUniform::new(Mat4::IDENTITY, true, 1.0);
        let tiled = DrawUniform::new(Mat4::IDENTITY, false, 100.0);
        assert_eq!(lit.params[..2], [1.0, 1.0]);
        assert_eq!(tiled.params[..2], [0.0, 100.0]);
    }

    #[test]
    fn test_default_light_is_sun() {
        let light = LightUniform::default();
        assert_eq!(light.position, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(light.color[..3], [1.0, 1.0, 0.8]);
    }

    #[test]
    fn test_shader_declares_entry_points() {
        assert!(BODY_SHADER_SOURCE.contains("fn vs_main"));
        assert!(BODY_SHADER_SOURCE.contains("fn fs_main"));
    }

    #[test]
    fn test_renderer_grows_draw_buffer() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let mut textures = TextureManager::new(&device);
        let texture = textures
            .create_texture(&device, &queue, "white", &[255; 4], 1, 1, TextureWrap::Repeat)
            .unwrap();
        let mesh = MeshBuffer::upload(&device, "ball", &orrery_mesh::sphere(1.0, 8, 4, 0.0));
        let mut renderer = BodyRenderer::new(
            &device,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            textures.bind_group_layout(),
            LightUniform::default(),
        );

        let draws: Vec<_> = (0..40)
            .map(|i| BodyDraw {
                mesh: &mesh,
                texture: &texture,
                model: Mat4::from_translation(Vec3::X * i as f32),
                lit: true,
                uv_scale: 1.0,
                translucent: false,
            })
            .collect();
        renderer.prepare(&device, &queue, &draws);
        assert_eq!(renderer.draw_capacity, 64);
        assert_eq!(renderer.draw_buffer.size(), 64 * renderer.draw_stride);
    }
}
