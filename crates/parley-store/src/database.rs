// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access is serialized through tokio-rusqlite's single background
//! thread: the `Database` struct IS the single writer. Query modules accept
//! `&Database` and call through `connection().call()`. Do NOT create
//! additional `Connection` instances for writes.

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use parley_config::StorageConfig;
use parley_core::{KvStore, ParleyError};

use crate::migrations;
use crate::queries;

/// Handle to the SQLite database backing the store.
///
/// Cheap to clone; all clones share the one background connection thread,
/// which is what makes every statement effectively serialized.
#[derive(Clone, Debug)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

/// Map a tokio-rusqlite error into the store's persistence failure variant.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> ParleyError {
    ParleyError::Storage { source: Box::new(e) }
}

impl Database {
    /// Open (creating if necessary) the database at the configured path,
    /// apply PRAGMAs, and run pending migrations.
    ///
    /// `synchronous=FULL` is non-negotiable: an acknowledged append must
    /// survive a crash of the hosting process, so commits fsync before the
    /// write call returns.
    pub async fn open(config: &StorageConfig) -> Result<Self, ParleyError> {
        if let Some(parent) = Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ParleyError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(&config.database_path)
            .await
            .map_err(|e| ParleyError::Storage { source: Box::new(e) })?;

        // This closure fails with ParleyError (migrations already produce
        // one), so the call error is unwrapped back out of Error::Error
        // rather than re-boxed.
        let wal_mode = config.wal_mode;
        conn.call(move |conn| {
            let sql_err = |e: rusqlite::Error| ParleyError::Storage { source: Box::new(e) };
            if wal_mode {
                conn.execute_batch("PRAGMA journal_mode = WAL;")
                    .map_err(sql_err)?;
            }
            conn.execute_batch(
                "PRAGMA synchronous = FULL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )
            .map_err(sql_err)?;
            migrations::run_migrations(conn)?;
            Ok(())
        })
        .await
        .map_err(|e| match e {
            tokio_rusqlite::Error::Error(e) => e,
            other => ParleyError::Storage {
                source: other.to_string().into(),
            },
        })?;

        debug!(path = %config.database_path, wal = wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection, for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL so all committed data lands in the main file.
    pub async fn close(&self) -> Result<(), ParleyError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl KvStore for Database {
    async fn get(&self, scope: &str, key: &str) -> Result<Option<Vec<u8>>, ParleyError> {
        queries::kv::get_value(self, scope, key).await
    }

    async fn put(&self, scope: &str, key: &str, value: &[u8]) -> Result<(), ParleyError> {
        queries::kv::put_value(self, scope, key, value).await
    }
}
