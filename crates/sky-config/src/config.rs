//! Configuration structs with defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CONFIG_FILE_NAME;
use crate::error::ConfigError;

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Initial camera pose and projection.
    pub camera: CameraConfig,
    /// Camera flight model.
    pub flight: FlightConfig,
    /// Frame loop settings.
    pub simulation: SimulationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Camera placement and lens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// World-space start position.
    pub start_position: [f64; 3],
    /// Start orientation as a quaternion (x, y, z, w). Normalized on use.
    pub start_orientation: [f32; 4],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Viewport width divided by height.
    pub aspect_ratio: f32,
}

/// Keyboard-style flight model for the camera.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlightConfig {
    /// Turn rate for yaw, pitch and roll.
    pub radians_per_second: f32,
    /// Acceleration applied per thrust direction, units per second squared.
    pub thrust: f32,
    /// Thrust multiplier while boosting.
    pub boost_multiplier: f32,
    /// Fraction of velocity lost per second (0 disables drag).
    pub resistance: f32,
    /// The camera cannot go below this distance from the world origin.
    pub ground_radius: f64,
}

/// Frame loop settings for the headless driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of frames to simulate.
    pub frames: u32,
    /// Fixed time step per frame in seconds.
    pub frame_seconds: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log the camera pose every N frames (0 disables).
    pub log_every_n_frames: u32,
    /// Re-read `config.ron` every N frames and apply changes (0 disables).
    pub reload_every_n_frames: u32,
}

// --- Default implementations ---

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: [6.946963, 6.913678, 2.205330],
            start_orientation: [0.404703, 0.910458, 0.040314, 0.075190],
            fov_degrees: 45.0,
            near: 0.01,
            far: 100.0,
            aspect_ratio: 1.0,
        }
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            radians_per_second: 1.0,
            thrust: 1.0,
            boost_multiplier: 10.0,
            resistance: 0.1,
            ground_radius: 10.0,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            frame_seconds: 1.0 / 60.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_every_n_frames: 60,
            reload_every_n_frames: 120,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
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
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Re-read the file: `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
