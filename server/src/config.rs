// src/config.rs

use std::fs;
use std::path::Path;

use serde::Deserialize;
use terrain::coords::CHUNK_HEIGHT;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Noise parameters for the ground heightmap.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeightmapConfig {
    pub frequency: f64,
    pub octaves: usize,
    pub persistence: f64,
    pub lacunarity: f64,
    /// Heights span roughly `-amplitude..=amplitude` cells.
    pub amplitude: f64,
    pub offset_x: f64,
    pub offset_z: f64,
}

impl Default for HeightmapConfig {
    fn default() -> Self {
        Self {
            frequency: 0.003,
            octaves: 4,
            persistence: 0.6,
            lacunarity: 2.0,
            amplitude: 40.0,
            offset_x: 100.1567,
            offset_z: 88.8783,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub seed: u32,
    /// Largest horizontal span, in cells, a viewer may request.
    pub max_extent_width: i32,
    /// Largest vertical span, in cells, a viewer may request.
    pub max_extent_height: i32,
    pub heightmap: HeightmapConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_extent_width: 1000,
            max_extent_height: 4 * CHUNK_HEIGHT,
            heightmap: HeightmapConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path.as_ref())?;
        log::info!("Loading server config from {}", path.as_ref().display());
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_extent_width < 1 {
            return Err(ConfigError::Invalid(format!(
                "max_extent_width must be at least 1, got {}",
                self.max_extent_width
            )));
        }
        if self.max_extent_height < 1 {
            return Err(ConfigError::Invalid(format!(
                "max_extent_height must be at least 1, got {}",
                self.max_extent_height
            )));
        }
        let heightmap = &self.heightmap;
        if heightmap.octaves == 0 {
            return Err(ConfigError::Invalid("heightmap.octaves must be non-zero".into()));
        }
        if !(heightmap.frequency > 0.0 && heightmap.frequency.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "heightmap.frequency must be positive, got {}",
                heightmap.frequency
            )));
        }
        for (name, value) in [
            ("persistence", heightmap.persistence),
            ("lacunarity", heightmap.lacunarity),
            ("amplitude", heightmap.amplitude),
            ("offset_x", heightmap.offset_x),
            ("offset_z", heightmap.offset_z),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("heightmap.{name} must be finite")));
            }
        }
        Ok(())
    }
}
