// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session message log.
//!
//! A `SessionLog` owns a mutex that serializes every operation touching that
//! session's durable state. Appends are load-modify-store cycles over a
//! single KV value, so holding the lock across the whole cycle is what makes
//! concurrent appends linearize instead of losing writes.
//!
//! The log keeps no in-memory copy of the messages. Every operation reads
//! the current value from the KV substrate, so a failed put can never leave
//! a cached sequence that disagrees with what is actually durable.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use parley_core::{KvStore, Message, ParleyError, Role, SessionId};

/// Fixed key under which a session's whole message sequence is stored.
const MESSAGES_KEY: &str = "messages";

/// Per-log tuning, derived from [`parley_config::StoreConfig`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct LogSettings {
    /// How long an operation waits for the session lock before giving up
    /// with a retryable timeout.
    pub lock_timeout: Duration,
    /// Ceiling on messages per session; `None` means unbounded.
    pub max_messages: Option<usize>,
}

/// Durable, strictly-ordered message log for one session.
pub struct SessionLog {
    id: SessionId,
    kv: Arc<dyn KvStore>,
    guard: Mutex<()>,
    settings: LogSettings,
}

impl SessionLog {
    pub(crate) fn new(id: SessionId, kv: Arc<dyn KvStore>, settings: LogSettings) -> Self {
        Self {
            id,
            kv,
            guard: Mutex::new(()),
            settings,
        }
    }

    /// The session this log belongs to.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Acquire the session lock, or fail with a retryable timeout if another
    /// operation on this session holds it for too long.
    async fn lock(&self) -> Result<MutexGuard<'_, ()>, ParleyError> {
        tokio::time::timeout(self.settings.lock_timeout, self.guard.lock())
            .await
            .map_err(|_| ParleyError::Timeout {
                duration: self.settings.lock_timeout,
            })
    }

    /// Load the current message sequence from durable storage.
    ///
    /// Callers must hold the session lock.
    async fn load(&self) -> Result<Vec<Message>, ParleyError> {
        match self.kv.get(self.id.as_str(), MESSAGES_KEY).await? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| ParleyError::Storage {
                source: Box::new(e),
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Append a message and return the stored copy (with its assigned
    /// timestamp).
    ///
    /// The message is durable when this returns `Ok`. On any error nothing
    /// was appended; the sequence is unchanged and the call is safe to retry
    /// when [`ParleyError::is_retryable`] says so.
    pub async fn append(&self, role: Role, content: String) -> Result<Message, ParleyError> {
        let _guard = self.lock().await?;

        let mut messages = self.load().await?;

        if let Some(limit) = self.settings.max_messages
            && messages.len() >= limit
        {
            return Err(ParleyError::Capacity {
                limit,
                what: "messages per session",
            });
        }

        // Timestamps never move backwards within a session, even if the
        // system clock does. Sequence position stays authoritative.
        let mut timestamp = Utc::now();
        if let Some(last) = messages.last()
            && timestamp < last.timestamp
        {
            timestamp = last.timestamp;
        }

        let message = Message {
            role,
            content,
            timestamp,
        };
        messages.push(message.clone());

        let bytes = serde_json::to_vec(&messages).map_err(|e| ParleyError::Storage {
            source: Box::new(e),
        })?;
        self.kv.put(self.id.as_str(), MESSAGES_KEY, &bytes).await?;

        debug!(
            session = %self.id,
            role = %message.role,
            count = messages.len(),
            "appended message"
        );
        Ok(message)
    }

    /// Read the full message sequence, oldest first.
    ///
    /// Takes the session lock so a read never observes a half-finished
    /// append; reads have no side effects and never create durable state.
    pub async fn read(&self) -> Result<Vec<Message>, ParleyError> {
        let _guard = self.lock().await?;
        self.load().await
    }
}
