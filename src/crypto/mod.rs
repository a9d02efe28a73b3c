//! Cryptographic operations for the container engine.
//!
//! This module provides:
//! - Argon2id password-based key derivation and salt generation
//! - AES-256-GCM slot encryption

mod cipher;
mod kdf;

pub use cipher::{encoded_len, SlotCipher};
pub use kdf::{generate_salt, DerivedKey, KeyDerivation};
