//! Deniable Encryption Containers
//!
//! Embeds one or two independently password-protected payloads (wallet
//! backups, seed phrases) in a single opaque blob. Holding the blob and one
//! correct password does not let anyone prove whether a second payload exists.
//!
//! # Features
//!
//! - **Argon2id** key derivation from each password and a shared random salt
//! - **AES-256-GCM** slot encryption with a fresh nonce per slot
//! - **Password-derived placement**: each slot sits at an offset only its key reveals
//! - **Bucketed sizing**: containers come in a few fixed lengths, filled with random noise
//!
//! # Layout
//!
//! ```text
//! [salt: 32][noise ... slot ... noise ... slot ... noise]
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use deniable_container::{generate_salt, ContainerEngine, SecretPayload};
//!
//! let engine = ContainerEngine::default();
//! let container = engine
//!     .create_container_bytes(
//!         SecretPayload::new(b"decoy wallet", "everyday password"),
//!         Some(SecretPayload::new(b"real wallet", "hidden password")),
//!         &generate_salt(),
//!     )
//!     .unwrap();
//!
//! let real = engine.extract_message_from_bytes(&container, "hidden password");
//! assert_eq!(real.as_deref(), Some(&b"real wallet"[..]));
//! ```

pub mod config;
pub mod container;
pub mod crypto;
pub mod error;
pub mod export;

pub use config::{EngineConfig, KdfParams};
pub use container::{ContainerEngine, SecretPayload};
pub use crypto::{generate_salt, DerivedKey};
pub use error::{Error, Result};
pub use export::ContainerExporter;

use config::SALT_LENGTH;

/// Derive a slot key with the pinned production parameters.
pub fn derive_key(password: &str, salt: &[u8; SALT_LENGTH]) -> Result<DerivedKey> {
    ContainerEngine::default().derive_key(password, salt)
}

/// Build a container with the pinned production parameters.
///
/// See [`ContainerEngine::create_container_bytes`].
pub fn create_container_bytes(
    primary: SecretPayload<'_>,
    hidden: Option<SecretPayload<'_>>,
    salt: &[u8],
) -> Result<Vec<u8>> {
    ContainerEngine::default().create_container_bytes(primary, hidden, salt)
}

/// Recover a payload with the pinned production parameters.
///
/// See [`ContainerEngine::extract_message_from_bytes`].
pub fn extract_message_from_bytes(container: &[u8], password: &str) -> Option<Vec<u8>> {
    ContainerEngine::default().extract_message_from_bytes(container, password)
}
