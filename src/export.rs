//! Backup export with bounded collision retries.
//!
//! The engine makes exactly one attempt per call. Two-slot containers
//! collide now and then, more often as payloads grow relative to the
//! offset window, so exporting callers regenerate the salt and try again.

use crate::container::{ContainerEngine, SecretPayload};
use crate::crypto::generate_salt;
use crate::error::{Error, Result};

/// Attempts allowed for small payloads.
pub const BASE_ATTEMPTS: u32 = 50;

/// Extra attempts per [`ATTEMPT_STEP_BYTES`] of combined payload.
pub const ATTEMPTS_PER_STEP: u32 = 50;

/// Payload size that earns another [`ATTEMPTS_PER_STEP`] attempts.
pub const ATTEMPT_STEP_BYTES: usize = 10_000;

/// Upper bound on attempts regardless of payload size.
pub const MAX_ATTEMPTS: u32 = 500;

/// Default attempt budget for a combined payload length.
pub fn retry_budget(total_payload_len: usize) -> u32 {
    let steps = (total_payload_len / ATTEMPT_STEP_BYTES).min(MAX_ATTEMPTS as usize) as u32;
    BASE_ATTEMPTS
        .saturating_add(steps.saturating_mul(ATTEMPTS_PER_STEP))
        .min(MAX_ATTEMPTS)
}

/// Seals and opens backup containers on behalf of the application.
#[derive(Debug, Clone, Copy)]
pub struct ContainerExporter {
    engine: ContainerEngine,
    max_attempts: Option<u32>,
}

impl ContainerExporter {
    /// Create an exporter using the payload-scaled default budget.
    pub fn new(engine: ContainerEngine) -> Self {
        Self {
            engine,
            max_attempts: None,
        }
    }

    /// Use a fixed attempt budget instead of the payload-scaled default.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts.max(1));
        self
    }

    /// The engine this exporter drives.
    pub fn engine(&self) -> &ContainerEngine {
        &self.engine
    }

    /// Seal one or two payloads, retrying collisions with fresh salts.
    ///
    /// Identical passwords are rejected immediately since they collide under
    /// every salt. Errors other than a collision end the loop at once.
    pub fn seal(
        &self,
        primary: SecretPayload<'_>,
        hidden: Option<SecretPayload<'_>>,
    ) -> Result<Vec<u8>> {
        if let Some(hidden) = &hidden {
            if hidden.password == primary.password {
                return Err(Error::PasswordCollision);
            }
        }

        let total_len = primary.message.len() + hidden.map_or(0, |h| h.message.len());
        let attempts = self.max_attempts.unwrap_or_else(|| retry_budget(total_len));

        for attempt in 1..=attempts {
            let salt = generate_salt();
            match self.engine.create_container_bytes(primary, hidden, &salt) {
                Err(e) if e.is_retryable() => {
                    tracing::debug!(attempt, attempts, "collision, retrying with a fresh salt");
                }
                result => return result,
            }
        }

        tracing::warn!(attempts, "sealing gave up after repeated collisions");
        Err(Error::RetriesExhausted { attempts })
    }

    /// Recover the payload `password` unlocks, if any.
    pub fn open(&self, container: &[u8], password: &str) -> Option<Vec<u8>> {
        self.engine.extract_message_from_bytes(container, password)
    }
}
