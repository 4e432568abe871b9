//! Configuration for the orrery viewer.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line via clap. Every section falls back to its defaults when absent,
//! so older or partial config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AssetConfig, Config, DebugConfig, InputConfig, RenderConfig, SimulationConfig, StepMode,
    WindowConfig, default_config_dir,
};
pub use error::ConfigError;
