// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session registry: routes each session id to exactly one live log handle.
//!
//! At any moment there is at most one `SessionLog` per session id in this
//! process, so its mutex really does serialize all of that session's
//! operations. Resolving a handle is infallible and creates no durable
//! state; a session exists durably only once its first append commits.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use parley_core::{KvStore, SessionId};

use crate::log::{LogSettings, SessionLog};

pub struct SessionRegistry {
    kv: Arc<dyn KvStore>,
    logs: DashMap<String, Arc<SessionLog>>,
    settings: LogSettings,
    max_resident: usize,
}

impl SessionRegistry {
    pub(crate) fn new(kv: Arc<dyn KvStore>, settings: LogSettings, max_resident: usize) -> Self {
        Self {
            kv,
            logs: DashMap::new(),
            settings,
            max_resident,
        }
    }

    /// Get the live log handle for `session_id`, creating one lazily.
    ///
    /// Two concurrent resolves for the same id return the same `Arc`; the
    /// dashmap entry API makes the insert race safe. When the resident map
    /// is full, idle handles are evicted first — an evicted session's
    /// durable state is untouched and the next resolve simply re-creates
    /// the handle.
    pub fn resolve(&self, session_id: &str) -> Arc<SessionLog> {
        if let Some(log) = self.logs.get(session_id) {
            return Arc::clone(&log);
        }

        if self.logs.len() >= self.max_resident {
            self.evict_idle();
        }

        let entry = self.logs.entry(session_id.to_string()).or_insert_with(|| {
            debug!(session = session_id, "creating session log handle");
            Arc::new(SessionLog::new(
                SessionId::from(session_id),
                Arc::clone(&self.kv),
                self.settings,
            ))
        });
        Arc::clone(&entry)
    }

    /// Drop handles nobody outside the registry is holding.
    fn evict_idle(&self) {
        // Counted inside the retain closure: other threads may insert
        // concurrently, so before/after map lengths cannot be compared.
        let mut evicted = 0usize;
        self.logs.retain(|_, log| {
            // strong_count == 1 means the registry holds the only reference,
            // so no operation can be in flight on that log.
            let keep = Arc::strong_count(log) > 1;
            if !keep {
                evicted += 1;
            }
            keep
        });
        if evicted > 0 {
            debug!(evicted, resident = self.logs.len(), "evicted idle session handles");
        }
    }

    /// Number of session handles currently resident in memory.
    pub fn resident_sessions(&self) -> usize {
        self.logs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use parley_config::StorageConfig;
    use parley_core::Role;
    use std::time::Duration;
    use tempfile::tempdir;

    async fn make_registry(dir: &tempfile::TempDir, max_resident: usize) -> SessionRegistry {
        let config = StorageConfig {
            database_path: dir.path().join("reg.db").to_str().unwrap().to_string(),
            wal_mode: true,
        };
        let kv: Arc<dyn KvStore> = Arc::new(Database::open(&config).await.unwrap());
        SessionRegistry::new(
            kv,
            LogSettings {
                lock_timeout: Duration::from_secs(5),
                max_messages: None,
            },
            max_resident,
        )
    }

    #[tokio::test]
    async fn resolve_returns_same_handle_for_same_id() {
        let dir = tempdir().unwrap();
        let registry = make_registry(&dir, 16).await;

        let a = registry.resolve("s1");
        let b = registry.resolve("s1");
        assert!(Arc::ptr_eq(&a, &b));

        let c = registry.resolve("s2");
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn resolve_creates_no_durable_state() {
        let dir = tempdir().unwrap();
        let registry = make_registry(&dir, 16).await;

        let log = registry.resolve("phantom");
        assert!(log.read().await.unwrap().is_empty());
        assert_eq!(registry.resident_sessions(), 1);
    }

    #[tokio::test]
    async fn full_registry_evicts_idle_handles() {
        let dir = tempdir().unwrap();
        let registry = make_registry(&dir, 2).await;

        // Write through both handles then drop them: both become idle.
        registry.resolve("a").append(Role::User, "x".into()).await.unwrap();
        registry.resolve("b").append(Role::User, "y".into()).await.unwrap();
        assert_eq!(registry.resident_sessions(), 2);

        let c = registry.resolve("c");
        assert!(registry.resident_sessions() <= 2);

        // Evicted sessions keep their durable history.
        let a = registry.resolve("a");
        assert_eq!(a.read().await.unwrap().len(), 1);
        drop(c);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_resolves_past_ceiling_do_not_panic() {
        let dir = tempdir().unwrap();
        let registry = Arc::new(make_registry(&dir, 1).await);

        // Distinct ids from many threads keep the registry at its ceiling,
        // so evictions race with inserts on every resolve.
        let mut tasks = Vec::new();
        for t in 0..8 {
            let registry = Arc::clone(&registry);
            tasks.push(tokio::spawn(async move {
                for i in 0..50 {
                    let log = registry.resolve(&format!("s-{t}-{i}"));
                    drop(log);
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
    }

    #[tokio::test]
    async fn held_handles_survive_eviction() {
        let dir = tempdir().unwrap();
        let registry = make_registry(&dir, 1).await;

        let held = registry.resolve("busy");
        // Forcing new resolves past the ceiling must not evict "busy".
        let _other = registry.resolve("other");
        let again = registry.resolve("busy");
        assert!(Arc::ptr_eq(&held, &again));
    }
}
