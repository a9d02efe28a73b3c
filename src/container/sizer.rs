//! Rounds container sizes up to a fixed bucket.
//!
//! One- and two-slot containers routinely share a bucket, so the length of
//! a container says nothing about how many payloads it holds.

use crate::config::{CONTAINER_BUCKETS, MAX_CONTAINER_SIZE};
use crate::error::{Error, Result};

/// Smallest bucket that can hold `required_bytes`.
pub fn choose_bucket(required_bytes: usize) -> Result<usize> {
    CONTAINER_BUCKETS
        .iter()
        .copied()
        .find(|&bucket| bucket >= required_bytes)
        .ok_or(Error::PayloadTooLarge {
            required: required_bytes,
            max: MAX_CONTAINER_SIZE,
        })
}

/// Whether `len` is one of the allowed container lengths.
pub fn is_bucket(len: usize) -> bool {
    CONTAINER_BUCKETS.contains(&len)
}
