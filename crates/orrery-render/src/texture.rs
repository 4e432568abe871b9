//! Image decoding, GPU texture upload and bind groups.
//!
//! [`TextureManager`] owns the shared samplers and layout. Textures are keyed by
//! name and handed out as [`Arc<ManagedTexture>`] with a ready-to-bind
//! [`wgpu::BindGroup`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;

/// All textures are uploaded as 8-bit sRGB RGBA.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// A GPU texture with its view, bind group, and metadata.
pub struct ManagedTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    /// Pre-built bind group for group 1 of the body pipeline.
    pub bind_group: wgpu::BindGroup,
    /// Width and height in texels.
    pub dimensions: (u32, u32),
    pub wrap: TextureWrap,
}

/// Addressing mode applied outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureWrap {
    /// Tile the image. Needed for scaled texture coordinates.
    #[default]
    Repeat,
    /// Stretch the edge texels.
    Clamp,
}

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("texture file '{}' not found", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to decode texture '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },
}

/// One or more textures of a set failed to load.
#[derive(Debug, thiserror::Error)]
#[error("{} of {requested} textures failed to load", failed.len())]
pub struct TextureSetError {
    pub requested: usize,
    /// `(key, cause)` for every texture that failed.
    pub failed: Vec<(String, TextureError)>,
}

/// A texture to load from the texture directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRequest {
    pub key: String,
    /// File name relative to the texture directory.
    pub file: PathBuf,
    pub wrap: TextureWrap,
}

impl TextureRequest {
    pub fn new(key: impl Into<String>, file: impl Into<PathBuf>, wrap: TextureWrap) -> Self {
        Self {
            key: key.into(),
            file: file.into(),
            wrap,
        }
    }
}

/// Read an image file from disk and convert it to RGBA8.
pub fn decode_image(path: &Path) -> Result<RgbaImage, TextureError> {
    if !path.is_file() {
        return Err(TextureError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let image = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.into_rgba8())
}

/// Downscale `image` so neither side exceeds `max_dimension`, keeping aspect.
pub fn fit_within(image: RgbaImage, max_dimension: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let largest = width.max(height);
    if largest <= max_dimension || max_dimension == 0 {
        return image;
    }
    let scale = max_dimension as f64 / largest as f64;
    let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_dimension);
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_dimension);
    log::warn!(
        "Texture {width}x{height} exceeds device limit {max_dimension}, resizing to {new_width}x{new_height}"
    );
    image::imageops::resize(
        &image,
        new_width,
        new_height,
        image::imageops::FilterType::Triangle,
    )
}

/// Decode every request under `dir` and hand each image to `upload` before
/// the next one is decoded, so at most one decoded image is alive at a time.
///
/// Missing files are checked for up front; if any are absent nothing is
/// decoded or uploaded. Otherwise a decode or upload failure does not stop
/// the remaining entries, and every failure is logged and returned together.
pub fn stream_texture_set(
    dir: &Path,
    requests: &[TextureRequest],
    mut upload: impl FnMut(&TextureRequest, RgbaImage) -> Result<(), TextureError>,
) -> Result<(), TextureSetError> {
    let missing: Vec<(String, TextureError)> = requests
        .iter()
        .filter_map(|request| {
            let path = dir.join(&request.file);
            (!path.is_file()).then(|| (request.key.clone(), TextureError::FileNotFound { path }))
        })
        .collect();
    if !missing.is_empty() {
        for (_, err) in &missing {
            log::error!("{err}");
        }
        return Err(TextureSetError {
            requested: requests.len(),
            failed: missing,
        });
    }

    let mut failed = Vec::new();
    for request in requests {
        let path = dir.join(&request.file);
        let result = decode_image(&path).and_then(|image| {
            log::debug!(
                "Decoded '{}' from {} ({}x{})",
                request.key,
                path.display(),
                image.width(),
                image.height()
            );
            upload(request, image)
        });
        if let Err(err) = result {
            log::error!("Texture '{}' failed: {err}", request.key);
            failed.push((request.key.clone(), err));
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(TextureSetError {
            requested: requests.len(),
            failed,
        })
    }
}

/// Owns the sampler pair, the texture bind group layout and the named textures.
pub struct TextureManager {
    textures: HashMap<String, Arc<ManagedTexture>>,
    sampler_repeat: wgpu::Sampler,
    sampler_clamp: wgpu::Sampler,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl TextureManager {
    pub fn new(device: &wgpu::Device) -> Self {
        let sampler_repeat =
            device.create_sampler(&linear_sampler("sampler-repeat", wgpu::AddressMode::Repeat));
        let sampler_clamp = device.create_sampler(&linear_sampler(
            "sampler-clamp",
            wgpu::AddressMode::ClampToEdge,
        ));

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture-bind-group-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Self {
            textures: HashMap::new(),
            sampler_repeat,
            sampler_clamp,
            bind_group_layout,
        }
    }

    /// Upload RGBA8 pixels as a named texture. Returns the cached texture if
    /// `name` already exists.
    #[allow(clippy::too_many_arguments)]
    pub fn create_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        data: &[u8],
        width: u32,
        height: u32,
        wrap: TextureWrap,
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        if let Some(existing) = self.textures.get(name) {
            return Ok(Arc::clone(existing));
        }

        validate_dimensions(width, height)?;
        validate_data_size(data, width, height)?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(name),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: None,
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = match wrap {
            TextureWrap::Repeat => &self.sampler_repeat,
            TextureWrap::Clamp => &self.sampler_clamp,
        };
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{name}-bind-group")),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        let managed = Arc::new(ManagedTexture {
            texture,
            view,
            bind_group,
            dimensions: (width, height),
            wrap,
        });
        self.textures.insert(name.to_string(), Arc::clone(&managed));
        log::info!("Created texture '{name}' ({width}x{height}, {wrap:?})");
        Ok(managed)
    }

    /// Upload an already decoded image, shrinking it to the device limit first.
    pub fn create_from_image(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        image: RgbaImage,
        wrap: TextureWrap,
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        let image = fit_within(image, device.limits().max_texture_dimension_2d);
        let (width, height) = image.dimensions();
        self.create_texture(device, queue, name, image.as_raw(), width, height, wrap)
    }

    /// Decode `path` and upload it under `name`.
    pub fn load_from_path(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        path: &Path,
        wrap: TextureWrap,
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        if let Some(existing) = self.textures.get(name) {
            return Ok(Arc::clone(existing));
        }
        let image = decode_image(path)?;
        self.create_from_image(device, queue, name, image, wrap)
    }

    /// Load a whole texture set, one image at a time.
    ///
    /// Nothing is uploaded when a file is missing. A decode failure leaves the
    /// other entries uploaded, so callers treat any error as fatal and drop
    /// the manager.
    pub fn load_texture_set(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        dir: &Path,
        requests: &[TextureRequest],
    ) -> Result<(), TextureSetError> {
        stream_texture_set(dir, requests, |request, image| {
            self.create_from_image(device, queue, &request.key, image, request.wrap)
                .map(|_| ())
        })
    }

    pub fn get(&self, name: &str) -> Option<Arc<ManagedTexture>> {
        self.textures.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// The shared bind group layout for texture + sampler pairs.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }
}

fn linear_sampler(
    label: &'static str,
    address_mode: wgpu::AddressMode,
) -> wgpu::SamplerDescriptor<'static> {
    wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    }
}

fn validate_dimensions(width: u32, height: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    Ok(())
}

fn validate_data_size(data: &[u8], width: u32, height: u32) -> Result<(), TextureError> {
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: data.len(),
            expected,
            width,
            height,
        });
    }
    Ok(())
}

/// Create a test GPU device and queue. Returns `None` if no GPU is available.
#[cfg(test)]
pub(crate) fn create_test_device_queue() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;

        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()
    })
}
