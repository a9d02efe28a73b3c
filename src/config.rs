//! Configuration constants and types for the container engine.
//!
//! Everything here except [`KdfParams`] is part of the container format and
//! must never change: previously exported containers are only readable while
//! these values stay pinned.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Salt length in bytes, also the length of the container prefix.
pub const SALT_LENGTH: usize = 32;

/// Size of the window slot offsets are drawn from.
pub const OFFSET_MODULO: u32 = 100_000;

/// Allowed container lengths, ascending.
pub const CONTAINER_BUCKETS: [usize; 7] = [
    50_000, 100_000, 200_000, 500_000, 1_000_000, 5_000_000, 10_000_000,
];

/// Smallest container the builder ever emits.
pub const MIN_CONTAINER_SIZE: usize = CONTAINER_BUCKETS[0];

/// Largest container the builder emits or the reader accepts.
pub const MAX_CONTAINER_SIZE: usize = CONTAINER_BUCKETS[CONTAINER_BUCKETS.len() - 1];

/// AES-256-GCM slot layout.
pub mod slot_params {
    /// Nonce size (96 bits).
    pub const NONCE_SIZE: usize = 12;

    /// Authentication tag size (128 bits).
    pub const TAG_SIZE: usize = 16;

    /// Length prefix size (big-endian u32).
    pub const LENGTH_PREFIX_SIZE: usize = 4;

    /// Encrypted length header: prefix plus its tag.
    pub const HEADER_SIZE: usize = LENGTH_PREFIX_SIZE + TAG_SIZE;

    /// Fixed bytes added to every message.
    pub const OVERHEAD: usize = NONCE_SIZE + HEADER_SIZE + TAG_SIZE;
}

/// Argon2id parameters for key derivation.
pub mod argon2_params {
    /// Memory cost in KiB (64 MB).
    pub const MEMORY_COST: u32 = 65536;

    /// Time cost (iterations).
    pub const TIME_COST: u32 = 3;

    /// Parallelism factor.
    pub const PARALLELISM: u32 = 4;

    /// Output length in bytes (256 bits).
    pub const OUTPUT_LENGTH: usize = 32;
}

/// Shortest input that could hold a salt and one slot.
pub const MIN_READABLE_SIZE: usize = SALT_LENGTH + slot_params::OVERHEAD;

/// Argon2id cost parameters.
///
/// Containers can only be opened with the parameters they were sealed with.
/// The default is the pinned production setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Number of passes.
    pub time_cost: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: argon2_params::MEMORY_COST,
            time_cost: argon2_params::TIME_COST,
            parallelism: argon2_params::PARALLELISM,
        }
    }
}

impl KdfParams {
    /// Create custom parameters.
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    /// Validate against Argon2's own limits.
    pub fn validate(&self) -> Result<()> {
        if self.parallelism == 0 {
            return Err(Error::InvalidConfig(
                "Parallelism must be at least 1".to_string(),
            ));
        }
        if self.time_cost == 0 {
            return Err(Error::InvalidConfig(
                "Time cost must be at least 1".to_string(),
            ));
        }
        if self.memory_cost < 8 * self.parallelism {
            return Err(Error::InvalidConfig(format!(
                "Memory cost must be at least {} KiB for parallelism {}",
                8 * self.parallelism,
                self.parallelism
            )));
        }
        Ok(())
    }
}

/// Engine configuration, loadable from JSON by callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Key derivation cost.
    #[serde(default)]
    pub kdf: KdfParams,
}

impl EngineConfig {
    /// Load and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.kdf.validate()
    }
}
