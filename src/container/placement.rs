//! Slot placement inside the payload region.

use crate::config::OFFSET_MODULO;
use crate::crypto::DerivedKey;
use sha2::{Digest, Sha256};

/// Domain separation label for the offset hash.
const OFFSET_CONTEXT: &[u8] = b"deniable-container/offset";

/// Offset of a slot relative to the start of the payload region.
///
/// The first four bytes of `SHA-256(context || key)`, big-endian, reduced
/// modulo [`OFFSET_MODULO`]. Depends only on the key, so the same password
/// and salt relocate the slot on any device.
pub fn compute_offset(key: &DerivedKey) -> u32 {
    let mut hasher = Sha256::new();
    hasher.update(OFFSET_CONTEXT);
    hasher.update(key.as_bytes());
    let digest = hasher.finalize();

    let value = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    value % OFFSET_MODULO
}

/// Byte range a slot occupies inside the payload region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    /// Start of the range, relative to the payload region.
    pub offset: usize,
    /// Encoded slot length.
    pub len: usize,
}

impl SlotRange {
    /// Create a range.
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// One past the last occupied byte.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Whether two half-open ranges share at least one byte.
    ///
    /// Ranges do not wrap around the offset window.
    pub fn overlaps(&self, other: &SlotRange) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }
}

/// Whether two slots would overwrite each other.
pub fn detect_collision(a: &SlotRange, b: &SlotRange) -> bool {
    a.overlaps(b)
}
