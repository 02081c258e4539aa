// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! valid key listings and "did you mean?" suggestions using Jaro-Winkler
//! string similarity.

use miette::Diagnostic;
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// 0.75 catches common typos like `databse_path` -> `database_path`
/// while filtering noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with diagnostic context.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(parley::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// Suggested correction via fuzzy matching, if any.
        suggestion: Option<String>,
        /// List of valid keys for the section.
        valid_keys: String,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(parley::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// The key with the wrong type.
        key: String,
        /// Description of the type mismatch.
        detail: String,
        /// What type was expected.
        expected: String,
    },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(parley::config::validation))]
    Validation { message: String },
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? valid keys are: {valid_keys}"),
        None => format!("valid keys are: {valid_keys}"),
    }
}

/// Convert a Figment extraction error into diagnostic config errors.
///
/// Figment batches multiple failures into one error value; each is mapped
/// onto the closest `ConfigError` variant. Unknown keys get a fuzzy-matched
/// suggestion from the valid key set serde reported.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    for e in err {
        let path = e.path.join(".");
        match &e.kind {
            figment::error::Kind::UnknownField(field, expected) => {
                let valid: Vec<&str> = expected.iter().map(|s| &**s).collect();
                errors.push(ConfigError::UnknownKey {
                    key: qualify(&path, field),
                    suggestion: suggest(field, &valid),
                    valid_keys: valid.join(", "),
                });
            }
            figment::error::Kind::InvalidType(actual, expected) => {
                errors.push(ConfigError::InvalidType {
                    key: path.clone(),
                    detail: format!("found {actual}"),
                    expected: expected.clone(),
                });
            }
            _ => {
                errors.push(ConfigError::Validation {
                    message: e.to_string(),
                });
            }
        }
    }

    errors
}

/// Render config errors to stderr, one diagnostic per line plus its help text.
pub fn render_errors(errors: &[ConfigError]) {
    for err in errors {
        eprintln!("error: {err}");
        if let Some(help) = err.help() {
            eprintln!("  help: {help}");
        }
    }
}

/// Prefix a bare field name with its section path, when one is known.
fn qualify(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else if path.ends_with(field) {
        path.to_string()
    } else {
        format!("{path}.{field}")
    }
}

/// Pick the closest valid key by Jaro-Winkler similarity, if close enough.
fn suggest(input: &str, valid: &[&str]) -> Option<String> {
    valid
        .iter()
        .map(|candidate| (strsim::jaro_winkler(input, candidate), *candidate))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, candidate)| candidate.to_string())
}
