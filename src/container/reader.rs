//! Payload recovery.

use super::placement::compute_offset;
use super::ContainerEngine;
use crate::config::{MAX_CONTAINER_SIZE, MIN_READABLE_SIZE, SALT_LENGTH};
use crate::crypto::SlotCipher;

impl ContainerEngine {
    /// Recover the payload `password` unlocks, if any.
    ///
    /// A wrong password, a damaged container and bytes that were never a
    /// container all return `None`. This never fails loudly.
    pub fn extract_message_from_bytes(&self, container: &[u8], password: &str) -> Option<Vec<u8>> {
        if container.len() < MIN_READABLE_SIZE || container.len() > MAX_CONTAINER_SIZE {
            return None;
        }

        let salt: &[u8; SALT_LENGTH] = container[..SALT_LENGTH].try_into().ok()?;

        let key = match self.kdf.derive_key(password, salt) {
            Ok(key) => key,
            Err(e) => {
                tracing::debug!(error = %e, "key derivation failed during extraction");
                return None;
            }
        };

        let offset = SALT_LENGTH + compute_offset(&key) as usize;
        SlotCipher::new(&key).decode(container, offset, salt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KdfParams;
    use crate::container::SecretPayload;
    use crate::crypto::generate_salt;

    fn engine() -> ContainerEngine {
        ContainerEngine::with_kdf_params(KdfParams::new(1024, 1, 1))
    }

    #[test]
    fn test_extract_roundtrip() {
        let engine = engine();
        let container = engine
            .create_container_bytes(
                SecretPayload::new(b"wallet backup", "password"),
                None,
                &generate_salt(),
            )
            .unwrap();

        assert_eq!(
            engine.extract_message_from_bytes(&container, "password"),
            Some(b"wallet backup".to_vec())
        );
    }

    #[test]
    fn test_size_limits() {
        let engine = engine();

        assert!(engine.extract_message_from_bytes(&[], "password").is_none());
        assert!(engine
            .extract_message_from_bytes(&[0u8; MIN_READABLE_SIZE - 1], "password")
            .is_none());
        assert!(engine
            .extract_message_from_bytes(&vec![0u8; MAX_CONTAINER_SIZE + 1], "password")
            .is_none());
    }

    #[test]
    fn test_truncated_container() {
        let engine = engine();
        let container = engine
            .create_container_bytes(SecretPayload::new(b"data", "password"), None, &generate_salt())
            .unwrap();

        // Too short to hold the slot wherever it was placed.
        let truncated = &container[..MIN_READABLE_SIZE];
        assert!(engine
            .extract_message_from_bytes(truncated, "password")
            .is_none());
    }

    #[test]
    fn test_corrupted_salt() {
        let engine = engine();
        let mut container = engine
            .create_container_bytes(SecretPayload::new(b"data", "password"), None, &generate_salt())
            .unwrap();
        container[0] ^= 0xFF;

        assert!(engine
            .extract_message_from_bytes(&container, "password")
            .is_none());
    }

    #[test]
    fn test_invalid_kdf_params_yield_none() {
        let container = engine()
            .create_container_bytes(SecretPayload::new(b"data", "password"), None, &generate_salt())
            .unwrap();
        let broken = ContainerEngine::with_kdf_params(KdfParams::new(1024, 1, 0));

        assert!(broken
            .extract_message_from_bytes(&container, "password")
            .is_none());
    }

    #[test]
    fn test_different_kdf_params_yield_none() {
        let container = engine()
            .create_container_bytes(SecretPayload::new(b"data", "password"), None, &generate_salt())
            .unwrap();
        let other = ContainerEngine::with_kdf_params(KdfParams::new(2048, 1, 1));

        assert!(other
            .extract_message_from_bytes(&container, "password")
            .is_none());
    }
}
