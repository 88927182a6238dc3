//! Environment-driven configuration lookups.
//!
//! User IDs, usernames, and similar mandatory values arrive through the
//! environment. A missing or empty key is a configuration error raised at
//! startup, never a mid-run concern.

use thiserror::Error;

/// Errors resolving mandatory configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value is absent or empty.
    #[error("required configuration key '{key}' is missing or empty")]
    MissingConfiguration {
        /// The missing key.
        key: String,
    },
}

impl ConfigError {
    /// Creates a missing-configuration error.
    pub fn missing(key: impl Into<String>) -> Self {
        Self::MissingConfiguration { key: key.into() }
    }
}

/// Reads a mandatory environment variable.
///
/// # Errors
///
/// [`ConfigError::MissingConfiguration`] when the variable is unset or
/// empty.
pub fn mandatory_env(key: &str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::missing(key)),
    }
}
