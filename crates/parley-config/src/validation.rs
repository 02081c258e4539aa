// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths and positive ceilings.

use tracing::debug;

use crate::diagnostic::ConfigError;
use crate::model::ParleyConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ParleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.store.max_resident_sessions == 0 {
        errors.push(ConfigError::Validation {
            message: "store.max_resident_sessions must be at least 1".to_string(),
        });
    }

    if let Some(0) = config.store.max_messages_per_session {
        errors.push(ConfigError::Validation {
            message: "store.max_messages_per_session must be at least 1 when set \
                      (omit it to disable the ceiling)"
                .to_string(),
        });
    }

    if config.store.lock_timeout_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "store.lock_timeout_ms must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        debug!(
            database_path = %config.storage.database_path,
            max_resident_sessions = config.store.max_resident_sessions,
            "configuration validated"
        );
        Ok(())
    } else {
        debug!(count = errors.len(), "configuration validation failed");
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = ParleyConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = ParleyConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))));
    }

    #[test]
    fn zero_lock_timeout_fails_validation() {
        let mut config = ParleyConfig::default();
        config.store.lock_timeout_ms = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("lock_timeout_ms"))));
    }

    #[test]
    fn zero_message_ceiling_fails_but_none_passes() {
        let mut config = ParleyConfig::default();
        config.store.max_messages_per_session = Some(0);
        assert!(validate_config(&config).is_err());

        config.store.max_messages_per_session = None;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = ParleyConfig::default();
        config.storage.database_path = "".to_string();
        config.store.lock_timeout_ms = 0;
        config.store.max_resident_sessions = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
