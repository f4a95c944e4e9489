//! Render settings.
//!
//! `RenderConfig` can be read from a JSON file; missing fields keep their
//! defaults, so a file only needs the values it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::DEFAULT_BUCKET_SIZE;

/// Errors that can occur while loading or validating a render config.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("samples_per_pixel must be at least 1")]
    ZeroSamples,

    #[error("bucket_size must be at least 1")]
    ZeroBucketSize,

    #[error("russian_roulette must be in (0, 1], got {0}")]
    InvalidRussianRoulette(f32),
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Path samples averaged per pixel
    pub samples_per_pixel: u32,
    /// Paths deeper than this return black
    pub max_bounces: u32,
    /// Base seed for the per-pixel random streams
    pub seed: u64,
    /// Tile edge length for parallel rendering
    pub bucket_size: u32,
    /// Survival probability for Russian roulette after the first bounce.
    /// `None` keeps the fixed-depth cutoff as the only stopping rule.
    pub russian_roulette: Option<f32>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 4096,
            max_bounces: 3,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            russian_roulette: None,
        }
    }
}

impl RenderConfig {
    /// Parse a config from a JSON string and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Check that the settings describe a renderable configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::ZeroBucketSize);
        }
        if let Some(p) = self.russian_roulette {
            if !(p > 0.0 && p <= 1.0) {
                return Err(ConfigError::InvalidRussianRoulette(p));
            }
        }
        Ok(())
    }
}
