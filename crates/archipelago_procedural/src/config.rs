//! # World Configuration
//!
//! The environment handle every generator and cache is built with.
//! Loaded once at startup from TOML; every field has a default, so an empty
//! document is a valid configuration.
//!
//! ```toml
//! tile_size_px = 16.0
//! cloud_size_multiplier = 3.0
//! cloud_density = 0.35
//! keep_radius = 3
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProceduralError, ProceduralResult};

/// Tunables for world generation and streaming.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Pixel side length of one tile.
    pub tile_size_px: f64,
    /// Global multiplier applied to every cloud radius.
    pub cloud_size_multiplier: f64,
    /// Cloud tiles per unit of ellipse area (in tiles). Tuned for render cost.
    pub cloud_density: f64,
    /// Attempts per cloud slot before the slot is dropped.
    pub cloud_max_attempts: u32,
    /// When set, clouds also keep clear of island footprints.
    pub clouds_avoid_islands: bool,
    /// Base frequency of the irregular-shape edge noise (per tile).
    pub irregular_noise_scale: f64,
    /// Edge perturbation amplitude as a fraction of the base radius.
    pub irregular_noise_amplitude: f64,
    /// Streamer: Chebyshev radius of chunks generated around the viewer.
    pub load_radius: u32,
    /// Streamer: Chebyshev radius of chunks kept resident during cleanup.
    pub keep_radius: u32,
    /// Streamer: milliseconds between cleanup passes.
    pub cleanup_interval_ms: u64,
}

impl WorldConfig {
    /// Default pixel side length of a tile.
    pub const DEFAULT_TILE_SIZE_PX: f64 = 16.0;
    /// Default cloud size multiplier.
    pub const DEFAULT_CLOUD_SIZE_MULTIPLIER: f64 = 3.0;
    /// Default cloud density constant.
    pub const DEFAULT_CLOUD_DENSITY: f64 = 0.35;
    /// Default retry bound for cloud placement.
    pub const DEFAULT_CLOUD_MAX_ATTEMPTS: u32 = 10;

    /// Parses a configuration from a TOML document and validates it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` for malformed TOML or unknown keys, and
    /// `InvalidConfig` for out-of-range values.
    pub fn from_toml_str(source: &str) -> ProceduralResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| ProceduralError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigIo` if the file cannot be read, otherwise the errors of
    /// [`WorldConfig::from_toml_str`].
    pub fn from_toml_file(path: &Path) -> ProceduralResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| ProceduralError::ConfigIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks every value is inside its usable range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> ProceduralResult<()> {
        let positive = [
            ("tile_size_px", self.tile_size_px),
            ("cloud_size_multiplier", self.cloud_size_multiplier),
            ("cloud_density", self.cloud_density),
            ("irregular_noise_scale", self.irregular_noise_scale),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ProceduralError::InvalidConfig(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }

        if !self.irregular_noise_amplitude.is_finite() || self.irregular_noise_amplitude < 0.0 {
            return Err(ProceduralError::InvalidConfig(format!(
                "irregular_noise_amplitude must be >= 0, got {}",
                self.irregular_noise_amplitude
            )));
        }
        if self.cloud_max_attempts == 0 {
            return Err(ProceduralError::InvalidConfig(
                "cloud_max_attempts must be at least 1".to_string(),
            ));
        }
        if self.keep_radius < self.load_radius {
            return Err(ProceduralError::InvalidConfig(format!(
                "keep_radius ({}) must be >= load_radius ({})",
                self.keep_radius, self.load_radius
            )));
        }
        if self.cleanup_interval_ms == 0 {
            return Err(ProceduralError::InvalidConfig(
                "cleanup_interval_ms must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Sets the tile size.
    #[must_use]
    pub const fn with_tile_size(mut self, tile_size_px: f64) -> Self {
        self.tile_size_px = tile_size_px;
        self
    }

    /// Sets the cloud density constant.
    #[must_use]
    pub const fn with_cloud_density(mut self, density: f64) -> Self {
        self.cloud_density = density;
        self
    }

    /// Sets the streaming radii.
    #[must_use]
    pub const fn with_radii(mut self, load_radius: u32, keep_radius: u32) -> Self {
        self.load_radius = load_radius;
        self.keep_radius = keep_radius;
        self
    }

    /// Side length of a chunk in pixels.
    #[must_use]
    pub fn chunk_size_px(&self) -> f64 {
        f64::from(crate::chunk::CHUNK_SIZE) * self.tile_size_px
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tile_size_px: Self::DEFAULT_TILE_SIZE_PX,
            cloud_size_multiplier: Self::DEFAULT_CLOUD_SIZE_MULTIPLIER,
            cloud_density: Self::DEFAULT_CLOUD_DENSITY,
            cloud_max_attempts: Self::DEFAULT_CLOUD_MAX_ATTEMPTS,
            clouds_avoid_islands: false,
            irregular_noise_scale: 0.08,
            irregular_noise_amplitude: 0.6,
            load_radius: 2,
            keep_radius: 3,
            cleanup_interval_ms: 2000,
        }
    }
}
