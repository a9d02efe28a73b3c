//! Container engine: slot placement, sizing, building and reading.
//!
//! A container is laid out as:
//!
//! ```text
//! [salt: 32][payload region: random noise, slot ranges overwritten by ciphertext]
//! ```
//!
//! There is no header, magic or version field. Every slot is located by
//! hashing the key derived from its password and the container salt.

mod builder;
mod placement;
mod reader;
mod sizer;

pub use placement::{compute_offset, detect_collision, SlotRange};
pub use sizer::{choose_bucket, is_bucket};

use crate::config::{EngineConfig, KdfParams, SALT_LENGTH};
use crate::crypto::{DerivedKey, KeyDerivation};
use crate::error::Result;

/// One message together with the password protecting it.
#[derive(Clone, Copy)]
pub struct SecretPayload<'a> {
    /// Plaintext to hide.
    pub message: &'a [u8],
    /// Password that unlocks it.
    pub password: &'a str,
}

impl<'a> SecretPayload<'a> {
    /// Pair a message with its password.
    pub fn new(message: &'a [u8], password: &'a str) -> Self {
        Self { message, password }
    }
}

impl std::fmt::Debug for SecretPayload<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretPayload").finish_non_exhaustive()
    }
}

/// Stateless container engine.
///
/// Holds only the key derivation cost; every call is independent and the
/// engine can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerEngine {
    kdf: KeyDerivation,
}

impl ContainerEngine {
    /// Create an engine from a configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_kdf_params(config.kdf)
    }

    /// Create an engine with explicit Argon2id parameters.
    pub fn with_kdf_params(params: KdfParams) -> Self {
        Self {
            kdf: KeyDerivation::new(params),
        }
    }

    /// The key derivation function in use.
    pub fn kdf(&self) -> &KeyDerivation {
        &self.kdf
    }

    /// Derive the key for a password under a container salt.
    pub fn derive_key(&self, password: &str, salt: &[u8; SALT_LENGTH]) -> Result<DerivedKey> {
        self.kdf.derive_key(password, salt)
    }
}
