//! Runtime configuration resource.
//!
//! Loaded from an INI file. Missing keys keep their defaults so a partial
//! file is always valid.
//!
//! # Configuration File Format
//!
//! ```ini
//! [runtime]
//! timestep = 0.016666668
//! frames = 600
//! script_dir = assets/scripts
//!
//! [physics]
//! gravity_x = 0.0
//! gravity_y = -9.8
//!
//! [audio]
//! master_volume = 1.0
//! muted = false
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec2;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_TIMESTEP: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u32 = 600;
const DEFAULT_SCRIPT_DIR: &str = "assets/scripts";
const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -9.8);
const DEFAULT_MASTER_VOLUME: f32 = 1.0;
const DEFAULT_MUTED: bool = false;
const DEFAULT_CONFIG_PATH: &str = "./scriptcore.ini";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    /// Fixed frame delta in seconds used by the headless driver.
    pub timestep: f32,
    /// Number of frames the headless driver runs.
    pub frames: u32,
    /// Directory searched for Lua behavior classes.
    pub script_dir: PathBuf,
    pub gravity: Vec2,
    pub master_volume: f32,
    pub muted: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            timestep: DEFAULT_TIMESTEP,
            frames: DEFAULT_FRAMES,
            script_dir: PathBuf::from(DEFAULT_SCRIPT_DIR),
            gravity: DEFAULT_GRAVITY,
            master_volume: DEFAULT_MASTER_VOLUME,
            muted: DEFAULT_MUTED,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values. Non-positive
    /// timesteps are ignored.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);

        info!(
            "Loaded config: timestep={}, frames={}, scripts={:?}, gravity=({}, {}), volume={}, muted={}",
            self.timestep,
            self.frames,
            self.script_dir,
            self.gravity.x,
            self.gravity.y,
            self.master_volume,
            self.muted
        );

        Ok(())
    }

    /// Parse configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [runtime] section
        if let Some(timestep) = config.getfloat("runtime", "timestep").ok().flatten() {
            if timestep > 0.0 {
                self.timestep = timestep as f32;
            }
        }
        if let Some(frames) = config.getuint("runtime", "frames").ok().flatten() {
            self.frames = frames as u32;
        }
        if let Some(dir) = config.get("runtime", "script_dir") {
            self.script_dir = PathBuf::from(dir);
        }

        // [physics] section
        if let Some(x) = config.getfloat("physics", "gravity_x").ok().flatten() {
            self.gravity.x = x as f32;
        }
        if let Some(y) = config.getfloat("physics", "gravity_y").ok().flatten() {
            self.gravity.y = y as f32;
        }

        // [audio] section
        if let Some(volume) = config.getfloat("audio", "master_volume").ok().flatten() {
            self.master_volume = (volume as f32).clamp(0.0, 1.0);
        }
        if let Some(muted) = config.getbool("audio", "muted").ok().flatten() {
            self.muted = muted;
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("runtime", "timestep", Some(self.timestep.to_string()));
        config.set("runtime", "frames", Some(self.frames.to_string()));
        config.set(
            "runtime",
            "script_dir",
            Some(self.script_dir.to_string_lossy().into_owned()),
        );

        config.set("physics", "gravity_x", Some(self.gravity.x.to_string()));
        config.set("physics", "gravity_y", Some(self.gravity.y.to_string()));

        config.set("audio", "master_volume", Some(self.master_volume.to_string()));
        config.set("audio", "muted", Some(self.muted.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
