//! Headless sky camera simulation.
//!
//! Flies the camera along a built-in script around a planet and produces the
//! per-frame view, camera-relative model, and projection matrices a renderer
//! would upload. Configuration is loaded from `config.ron` and can be
//! overridden via CLI flags.
//! Run with `cargo run -p sky-sim -- --frames 1200 --log-level debug`.

use std::path::PathBuf;

use clap::Parser;
use glam::DVec3;
use sky_config::{CameraConfig, CliArgs, Config};
use sky_math::{Rotation, Transform4x4};
use sky_scene::{FlightController, FlightInput, SceneObject};
use tracing::{info, warn};

/// Everything that changes from frame to frame.
struct Simulation {
    camera: SceneObject,
    planet: SceneObject,
    controller: FlightController,
    projection: Transform4x4,
    log_every_n_frames: u32,
    reload_every_n_frames: u32,
    config_source: Option<ConfigSource>,
    stats: SimulationStats,
}

/// Where the running settings came from, kept for periodic reloads.
struct ConfigSource {
    dir: PathBuf,
    /// The file contents as last read, before CLI overrides.
    file_config: Config,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct SimulationStats {
    frames: u32,
    collisions: u32,
    non_finite_frames: u32,
    lowest_altitude: Option<f64>,
}

impl Simulation {
    fn new(config: &Config) -> Self {
        let camera = SceneObject::new(
            DVec3::from_array(config.camera.start_position),
            Rotation::from_array(config.camera.start_orientation),
        );
        if !camera.orientation().is_finite() {
            warn!(
                orientation = ?config.camera.start_orientation,
                "configured start orientation is degenerate"
            );
        }

        Self {
            camera,
            // The planet sits at the world origin, unrotated.
            planet: SceneObject::default(),
            controller: FlightController::new(config.flight.clone()),
            projection: projection_from(&config.camera),
            log_every_n_frames: config.debug.log_every_n_frames,
            reload_every_n_frames: config.debug.reload_every_n_frames,
            config_source: None,
            stats: SimulationStats::default(),
        }
    }

    /// Re-read `config.ron` from `dir` every `reload_every_n_frames` frames.
    /// `file_config` is what was loaded from it at startup.
    fn watch_config(&mut self, dir: PathBuf, file_config: Config) {
        self.config_source = Some(ConfigSource { dir, file_config });
    }

    /// Apply edits to the config file: flight tuning, lens and logging
    /// cadence. The camera pose and the frame loop are left alone.
    fn reload_config(&mut self) {
        let Some(source) = self.config_source.as_mut() else {
            return;
        };
        match source.file_config.reload(&source.dir) {
            Ok(Some(new_config)) => {
                info!(dir = %source.dir.display(), "applying edited config");
                self.controller = FlightController::new(new_config.flight.clone());
                self.projection = projection_from(&new_config.camera);
                self.log_every_n_frames = new_config.debug.log_every_n_frames;
                self.reload_every_n_frames = new_config.debug.reload_every_n_frames;
                source.file_config = new_config;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "config reload failed, keeping current settings"),
        }
    }

    fn altitude(&self) -> f64 {
        self.camera.position().length() - self.controller.config().ground_radius
    }

    fn step(&mut self, frame: u32, total_frames: u32, seconds: f32) {
        if self.reload_every_n_frames > 0 && frame > 0 && frame % self.reload_every_n_frames == 0
        {
            self.reload_config();
        }

        let input = scripted_input(frame, total_frames);
        if self.controller.apply(&mut self.camera, &input, seconds) {
            self.stats.collisions += 1;
        }

        let view = self.camera.view_matrix();
        let model = self.planet.model_matrix(&self.camera);
        let model_view = view * model;

        if !view.is_finite() || !model_view.is_finite() {
            self.stats.non_finite_frames += 1;
            warn!(frame, "non-finite matrix produced");
        }

        let altitude = self.altitude();
        self.stats.lowest_altitude = Some(match self.stats.lowest_altitude {
            Some(lowest) => lowest.min(altitude),
            None => altitude,
        });
        self.stats.frames += 1;

        if self.log_every_n_frames > 0 && frame % self.log_every_n_frames == 0 {
            let position = self.camera.position();
            let view_axis = self.camera.view_axis();
            info!(
                frame,
                altitude,
                x = position.x,
                y = position.y,
                z = position.z,
                speed = self.camera.velocity().magnitude(),
                view = %view_axis,
                "camera pose"
            );
            tracing::debug!(planet_in_eye_space = %model_view.translation(), "model-view");
        }
    }

    fn run(&mut self, frames: u32, seconds: f32) -> &SimulationStats {
        for frame in 0..frames {
            self.step(frame, frames, seconds);
        }
        &self.stats
    }
}

fn projection_from(camera: &CameraConfig) -> Transform4x4 {
    let projection = Transform4x4::projection_matrix(
        camera.near,
        camera.far,
        camera.fov_degrees,
        camera.aspect_ratio,
    );
    if !projection.is_finite() {
        warn!(
            near = camera.near,
            far = camera.far,
            fov = camera.fov_degrees,
            aspect = camera.aspect_ratio,
            "projection matrix is not finite"
        );
    }
    projection
}

/// The built-in flight: cruise, turn, dive with boost, roll, descend, stop,
/// then coast. Phases scale with the run length.
fn scripted_input(frame: u32, total_frames: u32) -> FlightInput {
    let progress = if total_frames == 0 {
        0.0
    } else {
        frame as f32 / total_frames as f32
    };

    let mut input = FlightInput::default();
    match progress {
        p if p < 0.25 => input.forward = true,
        p if p < 0.40 => {
            input.forward = true;
            input.yaw_right = true;
        }
        p if p < 0.60 => {
            input.forward = true;
            input.boost = true;
            input.pitch_down = true;
        }
        p if p < 0.70 => input.roll_right = true,
        p if p < 0.85 => input.descend = true,
        p if p < 0.87 => input.full_stop = true,
        _ => {}
    }
    input
}

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args
        .config
        .clone()
        .or_else(sky_config::default_config_dir)
        .unwrap_or_else(|| {
            eprintln!("No platform config directory, using the working directory");
            PathBuf::from(".")
        });

    // Load or create config, then apply CLI overrides
    let file_config = match Config::load_or_create(&config_dir) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Failed to load config: {e}, using defaults");
            None
        }
    };
    let mut config = file_config.clone().unwrap_or_default();
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    sky_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    info!(
        frames = config.simulation.frames,
        frame_seconds = config.simulation.frame_seconds,
        config_dir = %config_dir.display(),
        "starting sky simulation"
    );

    let mut simulation = Simulation::new(&config);
    if let Some(file_config) = file_config {
        simulation.watch_config(config_dir.clone(), file_config);
    }
    let stats = simulation
        .run(config.simulation.frames, config.simulation.frame_seconds)
        .clone();

    let position = simulation.camera.position();
    info!(
        frames = stats.frames,
        collisions = stats.collisions,
        non_finite_frames = stats.non_finite_frames,
        lowest_altitude = stats.lowest_altitude.unwrap_or(f64::NAN),
        final_altitude = simulation.altitude(),
        x = position.x,
        y = position.y,
        z = position.z,
        "simulation finished"
    );
    tracing::debug!(projection = %simulation.projection, "projection matrix");
}
