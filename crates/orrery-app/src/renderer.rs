//! GPU resources for the solar system and the per-frame draw.

use std::collections::HashMap;
use std::sync::Arc;

use orrery_config::RenderConfig;
use orrery_mesh::{Mesh, MeshError};
use orrery_render::{
    BodyDraw, BodyRenderer, CameraUniform, DepthBuffer, FrameEncoder, LightUniform,
    ManagedTexture, MeshBuffer, Projection, RenderContext, RenderPassBuilder, SurfaceError,
    TextureManager, TextureRequest, TextureWrap,
};
use orrery_scene::catalog::{PLANETS, STARFIELD, SUN, ring_texture_key, texture_manifest};
use orrery_scene::transform::camera_position;
use orrery_scene::{Renderable, SceneState, Shading, build_draw_list, view_matrix};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("failed to build mesh for {what}: {source}")]
    Mesh {
        what: String,
        #[source]
        source: MeshError,
    },

    #[error("no texture loaded under key '{0}'")]
    MissingTexture(String),
}

/// Texture requests for the whole scene. Rings clamp; everything else repeats.
pub fn texture_requests() -> Vec<TextureRequest> {
    let ring_keys: Vec<String> = PLANETS
        .iter()
        .filter(|p| p.ring.is_some())
        .map(|p| ring_texture_key(p.name))
        .collect();

    texture_manifest()
        .into_iter()
        .map(|(key, file)| {
            let wrap = if ring_keys.contains(&key) {
                TextureWrap::Clamp
            } else {
                TextureWrap::Repeat
            };
            TextureRequest::new(key, file, wrap)
        })
        .collect()
}

/// Texture key used by each renderable.
pub fn texture_key(scene: &SceneState, renderable: Renderable) -> Option<String> {
    match renderable {
        Renderable::Starfield => Some(STARFIELD.name.to_string()),
        Renderable::Sun => Some(SUN.name.to_string()),
        Renderable::Planet(i) => scene.bodies.get(i).map(|b| b.name.to_string()),
        Renderable::Ring(i) => scene.bodies.get(i).map(|b| ring_texture_key(b.name)),
        Renderable::Moon => Some(scene.moon.body.name.to_string()),
    }
}

/// CPU meshes for everything the scene can draw. Radius and axial tilt are
/// baked in, so the draw list only carries orbital transforms.
pub fn build_meshes(
    scene: &SceneState,
    config: &RenderConfig,
) -> Result<Vec<(Renderable, Mesh)>, RendererError> {
    let (slices, stacks) = (config.sphere_slices, config.sphere_stacks);
    let mut meshes = vec![
        (
            Renderable::Starfield,
            orrery_mesh::sphere(
                config.starfield_radius,
                config.starfield_slices,
                config.starfield_stacks,
                0.0,
            ),
        ),
        (
            Renderable::Sun,
            orrery_mesh::sphere(SUN.radius, slices, stacks, 0.0),
        ),
    ];

    for (index, body) in scene.bodies.iter().enumerate() {
        meshes.push((
            Renderable::Planet(index),
            orrery_mesh::sphere(body.radius, slices, stacks, body.axial_tilt),
        ));
        if let Some(ring) = &body.ring {
            let mesh = orrery_mesh::ring(ring.inner_radius, ring.outer_radius, ring.segments)
                .map_err(|source| RendererError::Mesh {
                    what: ring_texture_key(body.name),
                    source,
                })?;
            meshes.push((Renderable::Ring(index), mesh));
        }
    }

    let moon = &scene.moon.body;
    meshes.push((
        Renderable::Moon,
        orrery_mesh::sphere(moon.radius, slices, stacks, moon.axial_tilt),
    ));
    Ok(meshes)
}

/// Owns every GPU resource the scene needs after startup.
pub struct SolarSystemRenderer {
    bodies: BodyRenderer,
    depth: DepthBuffer,
    projection: Projection,
    meshes: HashMap<Renderable, MeshBuffer>,
    textures: HashMap<Renderable, Arc<ManagedTexture>>,
    starfield_tile_factor: f32,
}

impl SolarSystemRenderer {
    /// Upload meshes and resolve textures. `textures` must already hold the
    /// set from [`texture_requests`].
    pub fn new(
        gpu: &RenderContext,
        config: &RenderConfig,
        textures: &TextureManager,
        scene: &SceneState,
    ) -> Result<Self, RendererError> {
        let mut meshes = HashMap::new();
        let mut bound = HashMap::new();
        for (renderable, mesh) in build_meshes(scene, config)? {
            let key = texture_key(scene, renderable)
                .ok_or_else(|| RendererError::MissingTexture(format!("{renderable:?}")))?;
            let texture = textures
                .get(&key)
                .ok_or_else(|| RendererError::MissingTexture(key.clone()))?;
            meshes.insert(renderable, MeshBuffer::upload(&gpu.device, &key, &mesh));
            bound.insert(renderable, texture);
        }

        let (width, height) = gpu.size();
        let mut projection = Projection {
            fov_y_degrees: config.fov_degrees,
            aspect: 1.0,
            near: config.near,
            far: config.far,
        };
        projection.set_viewport(width, height);

        let bodies = BodyRenderer::new(
            &gpu.device,
            gpu.surface_format,
            textures.bind_group_layout(),
            LightUniform::default(),
        );
        info!(meshes = meshes.len(), "Scene renderer ready");

        Ok(Self {
            bodies,
            depth: DepthBuffer::new(&gpu.device, width, height),
            projection,
            meshes,
            textures: bound,
            starfield_tile_factor: config.starfield_tile_factor,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.projection.set_viewport(width, height);
        if self.depth.resize(device, width, height) {
            debug!(width, height, "Depth buffer resized");
        }
    }

    /// Draw one frame of `scene` and present it.
    pub fn render(&mut self, gpu: &RenderContext, scene: &SceneState) -> Result<(), SurfaceError> {
        let surface_texture = gpu.get_current_texture()?;

        let camera = CameraUniform::new(
            view_matrix(&scene.camera),
            &self.projection,
            camera_position(&scene.camera),
        );
        self.bodies.update_camera(&gpu.queue, &camera);

        let items = build_draw_list(scene, self.starfield_tile_factor);
        let draws: Vec<BodyDraw<'_>> = items
            .iter()
            .filter_map(|item| {
                Some(BodyDraw {
                    mesh: self.meshes.get(&item.renderable)?,
                    texture: self.textures.get(&item.renderable)?,
                    model: item.model,
                    lit: item.shading == Shading::Lit,
                    uv_scale: item.uv_scale,
                    translucent: item.is_translucent(),
                })
            })
            .collect();
        self.bodies.prepare(&gpu.device, &gpu.queue, &draws);

        let mut frame = FrameEncoder::new(&gpu.device, surface_texture);
        {
            let builder = RenderPassBuilder::new()
                .depth(self.depth.view.clone(), DepthBuffer::CLEAR_VALUE)
                .label("solar-system-pass");
            let mut pass = frame.begin_render_pass(&builder);
            self.bodies.render(&mut pass, &draws);
        }
        frame.submit(&gpu.queue);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_renderable_has_a_manifest_texture() {
        let scene = SceneState::solar_system();
        let keys: Vec<String> = texture_requests().into_iter().map(|r| r.key).collect();
        for item in build_draw_list(&scene, 1.0) {
            let key = texture_key(&scene, item.renderable).unwrap();
            assert!(keys.contains(&key), "{key} missing from manifest");
        }
    }

    #[test]
    fn test_only_ring_textures_clamp() {
        let requests = texture_requests();
        let clamped: Vec<_> = requests
            .iter()
            .filter(|r| r.wrap == TextureWrap::Clamp)
            .map(|r| r.key.as_str())
            .collect();
        assert_eq!(clamped, ["saturn_ring"]);
        assert_eq!(requests.len(), 12);
    }

    #[test]
    fn test_meshes_cover_draw_list() {
        let scene = SceneState::solar_system();
        let config = RenderConfig {
            sphere_slices: 8,
            sphere_stacks: 4,
            starfield_slices: 8,
            starfield_stacks: 4,
            ..RenderConfig::default()
        };
        let meshes = build_meshes(&scene, &config).unwrap();
        for item in build_draw_list(&scene, 1.0) {
            assert!(meshes.iter().any(|(r, _)| *r == item.renderable));
        }
        assert_eq!(meshes.len(), 12);
    }

    #[test]
    fn test_ring_mesh_is_closed_strip() {
        let scene = SceneState::solar_system();
        let meshes = build_meshes(&scene, &RenderConfig::default()).unwrap();
        let (_, ring) = meshes
            .iter()
            .find(|(r, _)| matches!(r, Renderable::Ring(_)))
            .unwrap();
        assert_eq!(ring.vertices.len(), 2 * (64 + 1));
    }

    #[test]
    fn test_planet_mesh_has_baked_radius() {
        let scene = SceneState::solar_system();
        let config = RenderConfig::default();
        let meshes = build_meshes(&scene, &config).unwrap();
        let jupiter = scene.bodies.iter().position(|b| b.name == "jupiter").unwrap();
        let (_, mesh) = meshes
            .iter()
            .find(|(r, _)| *r == Renderable::Planet(jupiter))
            .unwrap();
        for v in &mesh.vertices {
            let r = glam::Vec3::from(v.position).length();
            assert!((r - 3.0).abs() < 1e-4);
        }
    }
}
