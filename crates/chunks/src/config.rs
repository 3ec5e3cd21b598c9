//! Canvas configuration.
//!
//! Every field has a default, so a configuration file only needs to mention what it changes:
//!
//! ```json
//! { "chunk_size": 512, "max_cached_chunks": 256 }
//! ```
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::*;

/// Largest accepted chunk edge.  A chunk of this size is 256 MiB of RGBA8.
pub const MAX_CHUNK_SIZE: u32 = 8192;

/// Largest accepted pool radius, which bounds the pool at `(2 * 64 + 1)^2` slots.
pub const MAX_POOL_RADIUS: u32 = 64;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Edge length of a chunk in pixels.  Fixed for the lifetime of a canvas, and must match between saving and
    /// loading a file.
    pub chunk_size: u32,

    /// The pool holds `(2 * pool_radius + 1)^2` chunks.
    pub pool_radius: u32,

    /// Extra rings of chunks kept active around the viewport.
    pub load_padding: u32,

    pub max_cached_chunks: usize,

    pub max_undo_actions: usize,

    /// Colour of chunks which have never been drawn into.
    pub background: Rgba,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            chunk_size: 1024,
            pool_radius: 5,
            load_padding: 1,
            max_cached_chunks: 512,
            max_undo_actions: 100,
            background: Rgba::PAPER,
        }
    }
}

impl CanvasConfig {
    pub fn pool_capacity(&self) -> usize {
        let diameter = 2 * self.pool_radius as usize + 1;
        diameter * diameter
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }

        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::ChunkSizeTooLarge(self.chunk_size));
        }

        if self.pool_radius > MAX_POOL_RADIUS {
            return Err(ConfigError::PoolRadiusTooLarge(self.pool_radius));
        }

        if self.max_cached_chunks == 0 {
            return Err(ConfigError::ZeroCacheCapacity);
        }

        if self.max_undo_actions == 0 {
            return Err(ConfigError::ZeroUndoDepth);
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<CanvasConfig, ConfigError> {
        let config: CanvasConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Utf8Path) -> Result<CanvasConfig, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
