// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Parley conversation store.

use thiserror::Error;

/// The primary error type used across the Parley workspace.
///
/// Every outcome a caller can observe from the store maps onto one of these
/// variants; none of them is recovered silently inside the store, and the
/// store never retries on its own (retrying a non-idempotent append risks
/// duplicate messages).
#[derive(Debug, Error)]
pub enum ParleyError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed input rejected before any storage access.
    #[error("validation error: {0}")]
    Validation(String),

    /// Durable storage errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The per-session serialization point could not be acquired in time.
    #[error("session lock not acquired within {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// A documented resource ceiling was hit; the operation had no effect.
    #[error("capacity limit reached: {limit} {what}")]
    Capacity { limit: usize, what: &'static str },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ParleyError {
    /// Whether the caller may reasonably retry the failed operation as-is.
    ///
    /// Only lock-acquisition timeouts qualify: the operation never reached
    /// durable storage, so a retry cannot duplicate a message.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ParleyError::Timeout { .. })
    }
}
