//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Camera and keyboard settings.
    pub input: InputConfig,
    /// Where textures are read from.
    pub assets: AssetConfig,
    /// Orbital animation settings.
    pub simulation: SimulationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial inner width in physical pixels.
    pub width: u32,
    /// Initial inner height in physical pixels.
    pub height: u32,
    /// Allow the user to resize the window.
    pub resizable: bool,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Frame rate cap (0 = uncapped).
    pub target_fps: u32,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Longitude subdivisions for planet, sun and moon spheres.
    pub sphere_slices: u32,
    /// Latitude subdivisions for planet, sun and moon spheres.
    pub sphere_stacks: u32,
    /// Radius of the background star sphere.
    pub starfield_radius: f32,
    /// Longitude subdivisions of the star sphere.
    pub starfield_slices: u32,
    /// Latitude subdivisions of the star sphere.
    pub starfield_stacks: u32,
    /// How many times the star texture repeats across the sphere.
    pub starfield_tile_factor: f32,
}

/// Camera and keyboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Degrees of rotation per pixel of drag.
    pub drag_sensitivity: f32,
    /// Zoom change per scroll notch.
    pub zoom_step: f32,
    /// Lower bound on zoom distance. `None` leaves it unbounded.
    pub min_zoom: Option<f32>,
    /// Upper bound on zoom distance. `None` leaves it unbounded.
    pub max_zoom: Option<f32>,
    /// Key that toggles the animation pause, by winit `KeyCode` name.
    pub pause_key: String,
}

/// Asset locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory holding the body textures.
    pub texture_dir: PathBuf,
}

/// How orbital angles advance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum StepMode {
    /// One step per rendered frame. Animation speed follows the frame rate.
    #[default]
    PerFrame,
    /// Steps at a fixed 60 Hz regardless of the achieved frame rate.
    FixedRate,
}

/// Orbital animation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub step_mode: StepMode,
    /// Start with the animation frozen.
    pub start_paused: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            resizable: false,
            title: "Orrery".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            vsync: true,
            fov_degrees: 45.0,
            near: 0.1,
            far: 5000.0,
            sphere_slices: 32,
            sphere_stacks: 32,
            starfield_radius: 1000.0,
            starfield_slices: 64,
            starfield_stacks: 64,
            starfield_tile_factor: 100.0,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.2,
            zoom_step: 2.0,
            min_zoom: None,
            max_zoom: None,
            pause_key: "Space".to_string(),
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("textures"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for the viewer, e.g. `~/.config/orrery` on Linux.
///
/// Falls back to the working directory when the platform has no config dir.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("orrery"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(|source| {
                ConfigError::ReadError {
                    path: config_path.clone(),
                    source,
                }
            })?;
            let config: Config = ron::from_str(&contents).map_err(|source| ConfigError::ParseError {
                path: config_path.clone(),
                source,
            })?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Zoom bounds as a `(min, max)` pair, if both ends are configured and ordered.
    pub fn zoom_limits(&self) -> Option<(f32, f32)> {
        match (self.input.min_zoom, self.input.max_zoom) {
            (Some(lo), Some(hi)) if lo <= hi => Some((lo, hi)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 800"));
        assert!(ron_str.contains("target_fps: 60"));
        assert!(ron_str.contains("step_mode: PerFrame"));
    }

    #[test]
    fn test_defaults_match_classic_viewer() {
        let config = Config::default();
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert_eq!(config.render.fov_degrees, 45.0);
        assert_eq!(config.render.far, 5000.0);
        assert_eq!(config.input.drag_sensitivity, 0.2);
        assert_eq!(config.input.zoom_step, 2.0);
        assert_eq!(config.input.pause_key, "Space");
        assert_eq!(config.assets.texture_dir, PathBuf::from("textures"));
        assert!(config.zoom_limits().is_none());
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (width: 1024), render: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.input, InputConfig::default());
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_fixed_rate_step_mode_parses() {
        let config: Config =
            ron::from_str("(simulation: (step_mode: FixedRate, start_paused: true))").unwrap();
        assert_eq!(config.simulation.step_mode, StepMode::FixedRate);
        assert!(config.simulation.start_paused);
    }

    #[test]
    fn test_zoom_limits_need_both_ends_in_order() {
        let mut config = Config::default();
        config.input.min_zoom = Some(-400.0);
        assert!(config.zoom_limits().is_none());
        config.input.max_zoom = Some(-5.0);
        assert_eq!(config.zoom_limits(), Some((-400.0, -5.0)));
        config.input.max_zoom = Some(-500.0);
        assert!(config.zoom_limits().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.assets.texture_dir = PathBuf::from("/opt/orrery/textures");
        config.input.min_zoom = Some(-1000.0);

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_invalid_ron_produces_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_ron_comments_accepted() {
        let ron_str = "// viewer settings\n(\n  // nothing overridden\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }
}
