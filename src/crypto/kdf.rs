//! Salt generation and Argon2id key derivation.

use crate::config::{argon2_params, KdfParams, SALT_LENGTH};
use crate::error::{Error, Result};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Generate a fresh random salt.
///
/// Every build attempt needs its own salt, retries after a collision included.
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// 256-bit key derived from a password and a container salt.
///
/// Zeroized on drop. Deliberately neither `Clone` nor `Debug`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; argon2_params::OUTPUT_LENGTH]);

impl DerivedKey {
    /// Fixed byte length of the key.
    pub const LEN: usize = argon2_params::OUTPUT_LENGTH;

    /// Raw key material.
    pub fn as_bytes(&self) -> &[u8; argon2_params::OUTPUT_LENGTH] {
        &self.0
    }
}

/// Key derivation using Argon2id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyDerivation {
    params: KdfParams,
}

impl KeyDerivation {
    /// Create a KDF with custom cost parameters.
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    /// The cost parameters in use.
    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Derive a 256-bit key from a password and salt.
    ///
    /// Same inputs always yield the same key, on every platform.
    pub fn derive_key(&self, password: &str, salt: &[u8; SALT_LENGTH]) -> Result<DerivedKey> {
        let params = Params::new(
            self.params.memory_cost,
            self.params.time_cost,
            self.params.parallelism,
            Some(argon2_params::OUTPUT_LENGTH),
        )
        .map_err(|e| Error::KeyDerivation(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut key = DerivedKey([0u8; argon2_params::OUTPUT_LENGTH]);
        argon2
            .hash_password_into(password.as_bytes(), salt, &mut key.0)
            .map_err(|e| Error::KeyDerivation(e.to_string()))?;

        Ok(key)
    }
}
