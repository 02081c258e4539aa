// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation store facade.
//!
//! `ConversationStore` ties the pieces together: it owns the database, the
//! session registry, and the validation layer in front of both. Callers
//! interact only with this type; the log and registry internals stay behind
//! it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use parley_config::ParleyConfig;
use parley_core::{HealthStatus, KvStore, Message, ParleyError, Role};

use crate::database::{Database, map_tr_err};
use crate::log::LogSettings;
use crate::registry::SessionRegistry;

/// Hard ceiling on session id length, in bytes.
const MAX_SESSION_ID_BYTES: usize = 512;

/// Durable, per-session-serialized conversation store.
pub struct ConversationStore {
    config: ParleyConfig,
    db: OnceCell<Database>,
    registry: OnceCell<SessionRegistry>,
}

impl ConversationStore {
    /// Create a store from configuration. No I/O happens until
    /// [`initialize`](Self::initialize).
    pub fn new(config: ParleyConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
            registry: OnceCell::new(),
        }
    }

    /// Open the database, run migrations, and build the session registry.
    ///
    /// Must be called exactly once before any other operation.
    pub async fn initialize(&self) -> Result<(), ParleyError> {
        if self.db.initialized() {
            return Err(ParleyError::Internal(
                "store already initialized".to_string(),
            ));
        }

        let db = Database::open(&self.config.storage).await?;
        let kv: Arc<dyn KvStore> = Arc::new(db.clone());

        let settings = LogSettings {
            lock_timeout: Duration::from_millis(self.config.store.lock_timeout_ms),
            max_messages: self.config.store.max_messages_per_session,
        };
        let registry =
            SessionRegistry::new(kv, settings, self.config.store.max_resident_sessions);

        self.db
            .set(db)
            .map_err(|_| ParleyError::Internal("store already initialized".to_string()))?;
        self.registry
            .set(registry)
            .map_err(|_| ParleyError::Internal("store already initialized".to_string()))?;

        info!(
            path = %self.config.storage.database_path,
            max_resident = self.config.store.max_resident_sessions,
            "conversation store initialized"
        );
        Ok(())
    }

    fn db(&self) -> Result<&Database, ParleyError> {
        self.db
            .get()
            .ok_or_else(|| ParleyError::Internal("store not initialized".to_string()))
    }

    fn registry(&self) -> Result<&SessionRegistry, ParleyError> {
        self.registry
            .get()
            .ok_or_else(|| ParleyError::Internal("store not initialized".to_string()))
    }

    /// Append a message to a session's log, returning the stored message
    /// with its assigned timestamp.
    ///
    /// Validation failures reject the call before any durable state changes;
    /// in particular an invalid append never lazily creates the session.
    pub async fn append(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
    ) -> Result<Message, ParleyError> {
        validate_session_id(session_id)?;
        if content.is_empty() {
            return Err(ParleyError::Validation(
                "message content must not be empty".to_string(),
            ));
        }

        let log = self.registry()?.resolve(session_id);
        log.append(role, content.to_string()).await
    }

    /// Return a session's full message history, oldest first.
    ///
    /// A session that has never been written to yields an empty sequence;
    /// reading it does not create durable state.
    pub async fn history(&self, session_id: &str) -> Result<Vec<Message>, ParleyError> {
        validate_session_id(session_id)?;
        let log = self.registry()?.resolve(session_id);
        log.read().await
    }

    /// Verify the database answers a trivial query.
    pub async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        let db = self.db()?;
        let result = db
            .connection()
            .call(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err);

        match result {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    /// Flush durable state and release the database.
    pub async fn close(&self) -> Result<(), ParleyError> {
        self.db()?.close().await?;
        debug!("conversation store closed");
        Ok(())
    }

    /// Number of session handles currently resident in memory.
    pub fn resident_sessions(&self) -> usize {
        self.registry.get().map_or(0, SessionRegistry::resident_sessions)
    }
}

fn validate_session_id(session_id: &str) -> Result<(), ParleyError> {
    if session_id.is_empty() {
        return Err(ParleyError::Validation(
            "session id must not be empty".to_string(),
        ));
    }
    if session_id.len() > MAX_SESSION_ID_BYTES {
        return Err(ParleyError::Validation(format!(
            "session id exceeds {MAX_SESSION_ID_BYTES} bytes"
        )));
    }
    if session_id.contains('\0') {
        return Err(ParleyError::Validation(
            "session id must not contain NUL bytes".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_config::{StorageConfig, StoreConfig};
    use tempfile::tempdir;

    fn make_config(dir: &tempfile::TempDir) -> ParleyConfig {
        ParleyConfig {
            storage: StorageConfig {
                database_path: dir.path().join("store.db").to_str().unwrap().to_string(),
                wal_mode: true,
            },
            store: StoreConfig {
                max_resident_sessions: 64,
                max_messages_per_session: Some(100),
                lock_timeout_ms: 5_000,
            },
        }
    }

    async fn open_store(dir: &tempfile::TempDir) -> ConversationStore {
        let store = ConversationStore::new(make_config(dir));
        store.initialize().await.unwrap();
        store
    }

    #[tokio::test]
    async fn append_and_history_round_trip() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;

        store.append("s1", Role::User, "hi").await.unwrap();
        store.append("s1", Role::Assistant, "hello").await.unwrap();

        let history = store.history("s1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Assistant);

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn double_initialize_is_rejected() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let err = store.initialize().await.unwrap_err();
        assert!(matches!(err, ParleyError::Internal(_)));
    }

    #[tokio::test]
    async fn operations_before_initialize_fail() {
        let dir = tempdir().unwrap();
        let store = ConversationStore::new(make_config(&dir));
        assert!(store.history("s1").await.is_err());
        assert!(store.append("s1", Role::User, "hi").await.is_err());
    }

    #[tokio::test]
    async fn empty_session_id_is_rejected_without_side_effects() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;

        let err = store.append("", Role::User, "hi").await.unwrap_err();
        assert!(matches!(err, ParleyError::Validation(_)));
        assert_eq!(store.resident_sessions(), 0);
    }

    #[tokio::test]
    async fn oversized_session_id_is_rejected() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;

        let big = "x".repeat(MAX_SESSION_ID_BYTES + 1);
        let err = store.history(&big).await.unwrap_err();
        assert!(matches!(err, ParleyError::Validation(_)));
    }

    #[tokio::test]
    async fn nul_in_session_id_is_rejected() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;

        let err = store.append("bad\0id", Role::User, "hi").await.unwrap_err();
        assert!(matches!(err, ParleyError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_content_is_rejected_and_session_not_created() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;

        let err = store.append("s1", Role::User, "").await.unwrap_err();
        assert!(matches!(err, ParleyError::Validation(_)));
        assert!(store.history("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_check_reports_healthy() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;

        store.append("alpha", Role::User, "a").await.unwrap();
        store.append("beta", Role::User, "b").await.unwrap();

        assert_eq!(store.history("alpha").await.unwrap().len(), 1);
        assert_eq!(store.history("beta").await.unwrap().len(), 1);
        assert_eq!(store.history("alpha").await.unwrap()[0].content, "a");
    }
}
