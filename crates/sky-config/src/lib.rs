//! Configuration for the sky simulation.
//!
//! Settings persist to disk as a RON file, can be overridden from the command
//! line via clap, and can be re-read to detect edits while running. Every
//! section tolerates missing and unknown fields.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CameraConfig, Config, DebugConfig, FlightConfig, SimulationConfig};
pub use error::ConfigError;

/// Name of the settings file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Default config directory: `<platform config dir>/sky-sim`, or `None` when
/// the platform has no config directory.
pub fn default_config_dir() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sky-sim"))
}
