//! Error types for the container engine.

use thiserror::Error;

/// Result type alias for container operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the container engine, the exporter and configuration loading.
///
/// Reading never produces one of these: a wrong password, a corrupted
/// container and foreign data all come back as `None`.
#[derive(Error, Debug)]
pub enum Error {
    /// The two slots landed on overlapping byte ranges, or both slots use
    /// the same password. Retry with a fresh salt.
    #[error("Password collision: slot ranges overlap, regenerate the salt and retry")]
    PasswordCollision,

    /// Salt has the wrong length.
    #[error("Invalid salt: expected {expected} bytes, got {found}")]
    InvalidSalt { expected: usize, found: usize },

    /// The payloads do not fit in the largest container bucket.
    #[error("Payload too large: need {required} bytes, largest container is {max} bytes")]
    PayloadTooLarge { required: usize, max: usize },

    /// Key derivation error.
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Encryption error.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Every sealing attempt collided.
    #[error("Gave up after {attempts} colliding attempts")]
    RetriesExhausted { attempts: u32 },

    /// I/O error while loading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether the same inputs may succeed with a freshly generated salt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::PasswordCollision)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_collision_is_retryable() {
        assert!(Error::PasswordCollision.is_retryable());
        assert!(!Error::InvalidSalt {
            expected: 32,
            found: 16
        }
        .is_retryable());
        assert!(!Error::PayloadTooLarge {
            required: 20_000_000,
            max: 10_000_000
        }
        .is_retryable());
    }
}
