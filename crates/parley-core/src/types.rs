// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Parley workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a conversation session.
///
/// Opaque and caller-chosen (typically a client-generated UUID). The store
/// attaches no meaning to its contents beyond identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        SessionId(value.to_string())
    }
}

/// Health status reported by the store's health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// The store is fully operational.
    Healthy,
    /// The store is operational but experiencing issues.
    Degraded(String),
    /// The store is not operational.
    Unhealthy(String),
}

/// Who produced a message's content.
///
/// Serialized lowercase on the wire and in durable storage; parseable from
/// the same lowercase form so request layers can map strings to it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single entry in a session's conversation transcript.
///
/// The timestamp is assigned by the log at append time, never by the caller.
/// Sequence position, not the timestamp, is authoritative for ordering;
/// timestamps are non-decreasing within a session but may collide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trips_through_lowercase_strings() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
        assert_eq!(Role::from_str("assistant").unwrap(), Role::Assistant);
        assert!(Role::from_str("system").is_err());
    }

    #[test]
    fn message_serializes_with_wire_field_names() {
        let msg = Message {
            role: Role::User,
            content: "build a worker".to_string(),
            timestamp: "2026-01-01T00:00:00Z".parse().unwrap(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "build a worker");
        assert!(json["timestamp"].as_str().unwrap().starts_with("2026-01-01"));

        let parsed: Message = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn session_id_displays_inner_string() {
        let sid = SessionId::from("s1");
        assert_eq!(sid.to_string(), "s1");
        assert_eq!(sid.as_str(), "s1");
    }
}
