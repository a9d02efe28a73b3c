//! Container assembly.

use super::placement::{compute_offset, detect_collision, SlotRange};
use super::sizer::choose_bucket;
use super::{ContainerEngine, SecretPayload};
use crate::config::SALT_LENGTH;
use crate::crypto::SlotCipher;
use crate::error::{Error, Result};
use rand::RngCore;

/// A slot ready to be written into the payload region.
struct EncodedSlot {
    range: SlotRange,
    bytes: Vec<u8>,
}

impl ContainerEngine {
    /// Build a container holding `primary` and, optionally, a `hidden` payload.
    ///
    /// This is a single attempt. [`Error::PasswordCollision`] means the two
    /// slots landed on overlapping ranges for this salt (or share a password)
    /// and the caller should retry with a fresh salt. No partial container
    /// is ever returned.
    pub fn create_container_bytes(
        &self,
        primary: SecretPayload<'_>,
        hidden: Option<SecretPayload<'_>>,
        salt: &[u8],
    ) -> Result<Vec<u8>> {
        let salt: &[u8; SALT_LENGTH] = salt.try_into().map_err(|_| Error::InvalidSalt {
            expected: SALT_LENGTH,
            found: salt.len(),
        })?;

        // Same password means same key and offset under any salt.
        if let Some(hidden) = &hidden {
            if hidden.password == primary.password {
                return Err(Error::PasswordCollision);
            }
        }

        let mut slots = vec![self.encode_slot(&primary, salt)?];
        if let Some(hidden) = &hidden {
            let second = self.encode_slot(hidden, salt)?;
            if detect_collision(&slots[0].range, &second.range) {
                return Err(Error::PasswordCollision);
            }
            slots.push(second);
        }

        let furthest = slots.iter().map(|s| s.range.end()).max().unwrap_or(0);
        let bucket = choose_bucket(SALT_LENGTH + furthest)?;

        let mut buffer = vec![0u8; bucket];
        buffer[..SALT_LENGTH].copy_from_slice(salt);
        rand::thread_rng().fill_bytes(&mut buffer[SALT_LENGTH..]);

        for slot in &slots {
            let start = SALT_LENGTH + slot.range.offset;
            buffer[start..start + slot.bytes.len()].copy_from_slice(&slot.bytes);
        }

        tracing::debug!(bucket, "container assembled");
        Ok(buffer)
    }

    fn encode_slot(
        &self,
        payload: &SecretPayload<'_>,
        salt: &[u8; SALT_LENGTH],
    ) -> Result<EncodedSlot> {
        let key = self.kdf.derive_key(payload.password, salt)?;
        let offset = compute_offset(&key) as usize;
        let bytes = SlotCipher::new(&key).encode(payload.message, salt)?;

        Ok(EncodedSlot {
            range: SlotRange::new(offset, bytes.len()),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KdfParams, CONTAINER_BUCKETS, MAX_CONTAINER_SIZE};
    use crate::crypto::{encoded_len, generate_salt};

    fn engine() -> ContainerEngine {
        ContainerEngine::with_kdf_params(KdfParams::new(1024, 1, 1))
    }

    #[test]
    fn test_salt_prefix() {
        let salt = generate_salt();
        let container = engine()
            .create_container_bytes(SecretPayload::new(b"data", "password"), None, &salt)
            .unwrap();

        assert_eq!(&container[..SALT_LENGTH], &salt);
        assert!(CONTAINER_BUCKETS.contains(&container.len()));
    }

    #[test]
    fn test_slot_written_at_planned_offset() {
        let engine = engine();
        let salt = generate_salt();
        let container = engine
            .create_container_bytes(SecretPayload::new(b"located", "password"), None, &salt)
            .unwrap();

        let key = engine.derive_key("password", &salt).unwrap();
        let offset = SALT_LENGTH + compute_offset(&key) as usize;
        let decoded = SlotCipher::new(&key).decode(&container, offset, &salt);

        assert_eq!(decoded.unwrap(), b"located");
    }

    #[test]
    fn test_region_outside_slot_is_fresh_noise() {
        let engine = engine();
        let salt = generate_salt();
        let payload = SecretPayload::new(b"noise check", "password");

        let first = engine.create_container_bytes(payload, None, &salt).unwrap();
        let second = engine.create_container_bytes(payload, None, &salt).unwrap();
        assert_eq!(first.len(), second.len());

        let key = engine.derive_key("password", &salt).unwrap();
        let slot_start = SALT_LENGTH + compute_offset(&key) as usize;
        let slot_end = slot_start + encoded_len(payload.message.len());

        let outside: Vec<usize> = (SALT_LENGTH..first.len())
            .filter(|i| *i < slot_start || *i >= slot_end)
            .collect();

        // Independent random fills agree on about 1 byte in 256.
        let same = outside.iter().filter(|&&i| first[i] == second[i]).count();
        assert!(
            same < outside.len() / 16,
            "{} of {} noise bytes identical across rebuilds",
            same,
            outside.len()
        );

        // Random bytes are zero about 1 time in 256.
        let zeros = outside.iter().filter(|&&i| first[i] == 0).count();
        assert!(
            zeros < outside.len() / 16,
            "{} of {} noise bytes are zero",
            zeros,
            outside.len()
        );
    }

    #[test]
    fn test_short_salt_rejected() {
        let result =
            engine().create_container_bytes(SecretPayload::new(b"data", "pw"), None, &[0u8; 16]);

        assert!(matches!(
            result,
            Err(Error::InvalidSalt {
                expected: 32,
                found: 16
            })
        ));
    }

    #[test]
    fn test_long_salt_rejected() {
        let result =
            engine().create_container_bytes(SecretPayload::new(b"data", "pw"), None, &[0u8; 33]);
        assert!(matches!(result, Err(Error::InvalidSalt { found: 33, .. })));
    }

    #[test]
    fn test_same_password_collides_before_kdf() {
        // Invalid KDF params would fail if any key were derived.
        let engine = ContainerEngine::with_kdf_params(KdfParams::new(1024, 1, 0));
        let result = engine.create_container_bytes(
            SecretPayload::new(b"one", "same"),
            Some(SecretPayload::new(b"two", "same")),
            &generate_salt(),
        );

        assert!(matches!(result, Err(Error::PasswordCollision)));
    }

    #[test]
    fn test_oversized_payload() {
        let message = vec![0u8; MAX_CONTAINER_SIZE + 1];
        let result = engine().create_container_bytes(
            SecretPayload::new(&message, "password"),
            None,
            &generate_salt(),
        );

        assert!(matches!(result, Err(Error::PayloadTooLarge { .. })));
    }
}
