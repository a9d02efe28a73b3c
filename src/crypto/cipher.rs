//! AES-256-GCM slot encryption.
//!
//! A slot is laid out as:
//!
//! ```text
//! nonce (12) || GCM(len as u32 BE) (4 + 16) || GCM(message) (len + 16)
//! ```
//!
//! The length header is sealed on its own so a reader learns how many bytes
//! belong to the body without trusting anything unauthenticated. The body
//! uses the header nonce with the low bit of its last byte flipped. Both
//! parts carry the container salt as associated data.

use crate::config::slot_params::{HEADER_SIZE, NONCE_SIZE, OVERHEAD, TAG_SIZE};
use crate::config::{MAX_CONTAINER_SIZE, SALT_LENGTH};
use crate::crypto::kdf::DerivedKey;
use crate::error::{Error, Result};
use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use rand::RngCore;

/// Number of bytes a message of `message_len` bytes occupies once encoded.
pub fn encoded_len(message_len: usize) -> usize {
    OVERHEAD + message_len
}

fn body_nonce(nonce: &[u8; NONCE_SIZE]) -> [u8; NONCE_SIZE] {
    let mut body = *nonce;
    body[NONCE_SIZE - 1] ^= 0x01;
    body
}

/// AES-256-GCM cipher bound to one slot key.
pub struct SlotCipher {
    cipher: Aes256Gcm,
}

impl SlotCipher {
    /// Create a cipher from a derived key.
    pub fn new(key: &DerivedKey) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        Self { cipher }
    }

    /// Encrypt a message into slot bytes with a fresh random nonce.
    ///
    /// Empty messages are allowed and still produce [`OVERHEAD`] bytes.
    pub fn encode(&self, message: &[u8], salt: &[u8; SALT_LENGTH]) -> Result<Vec<u8>> {
        if message.len() > MAX_CONTAINER_SIZE {
            return Err(Error::PayloadTooLarge {
                required: SALT_LENGTH + encoded_len(message.len()),
                max: MAX_CONTAINER_SIZE,
            });
        }

        let mut nonce = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce);

        let prefix = (message.len() as u32).to_be_bytes();
        let header = self
            .cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: &prefix,
                    aad: salt,
                },
            )
            .map_err(|e| Error::Encryption(e.to_string()))?;

        let body = self
            .cipher
            .encrypt(
                Nonce::from_slice(&body_nonce(&nonce)),
                Payload {
                    msg: message,
                    aad: salt,
                },
            )
            .map_err(|e| Error::Encryption(e.to_string()))?;

        let mut result = Vec::with_capacity(encoded_len(message.len()));
        result.extend_from_slice(&nonce);
        result.extend_from_slice(&header);
        result.extend_from_slice(&body);

        Ok(result)
    }

    /// Decrypt the slot starting at `offset` inside `container`.
    ///
    /// Returns `None` for a wrong key, tampered bytes, an offset or length
    /// running past the end of the container, or any other malformed input.
    /// Callers cannot tell these cases apart.
    pub fn decode(
        &self,
        container: &[u8],
        offset: usize,
        salt: &[u8; SALT_LENGTH],
    ) -> Option<Vec<u8>> {
        let header_end = offset.checked_add(NONCE_SIZE + HEADER_SIZE)?;
        let (nonce_bytes, header) = container.get(offset..header_end)?.split_at(NONCE_SIZE);
        let nonce: [u8; NONCE_SIZE] = nonce_bytes.try_into().ok()?;

        let prefix = self
            .cipher
            .decrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: header,
                    aad: salt,
                },
            )
            .ok()?;
        let message_len = u32::from_be_bytes(prefix.as_slice().try_into().ok()?) as usize;

        let body_end = header_end.checked_add(message_len)?.checked_add(TAG_SIZE)?;
        let body = container.get(header_end..body_end)?;

        self.cipher
            .decrypt(
                Nonce::from_slice(&body_nonce(&nonce)),
                Payload {
                    msg: body,
                    aad: salt,
                },
            )
            .ok()
    }
}
