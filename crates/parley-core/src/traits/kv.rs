// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable key-value trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::ParleyError;

/// The durable substrate a session log is built on.
///
/// Keys are scoped: `scope` names the session, `key` names the record within
/// it (the log uses a single fixed key for the whole message sequence).
/// Implementations must make `put` atomic per key — a concurrent reader sees
/// either the old value or the new one, never a torn write — but need not
/// provide any transactionality across keys.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Fetch the value stored under `(scope, key)`, or `None` if absent.
    async fn get(&self, scope: &str, key: &str) -> Result<Option<Vec<u8>>, ParleyError>;

    /// Durably store `value` under `(scope, key)`, replacing any prior value.
    ///
    /// Must not return `Ok` before the write is committed to durable storage.
    async fn put(&self, scope: &str, key: &str, value: &[u8]) -> Result<(), ParleyError>;
}
