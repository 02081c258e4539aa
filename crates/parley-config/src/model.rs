// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Parley conversation store.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Parley configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParleyConfig {
    /// Durable storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Session store behavior and resource ceilings.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Durable storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("parley").join("parley.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("parley.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Session store configuration.
///
/// These ceilings bound memory use in the absence of any expiry mechanism:
/// resident log handles are evicted when idle past the ceiling, and appends
/// beyond the per-session message ceiling are rejected.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Maximum number of resident in-memory session log handles.
    #[serde(default = "default_max_resident_sessions")]
    pub max_resident_sessions: usize,

    /// Maximum messages per session. `None` disables the ceiling.
    #[serde(default = "default_max_messages_per_session")]
    pub max_messages_per_session: Option<usize>,

    /// Milliseconds to wait for a session's serialization lock before
    /// failing with a retryable timeout.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_resident_sessions: default_max_resident_sessions(),
            max_messages_per_session: default_max_messages_per_session(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

fn default_max_resident_sessions() -> usize {
    1024
}

fn default_max_messages_per_session() -> Option<usize> {
    Some(10_000)
}

fn default_lock_timeout_ms() -> u64 {
    5_000
}
