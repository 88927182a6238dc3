//! Secret lookup seam.
//!
//! The core only requires a synchronous `get(name) -> String` capability;
//! the backing store (cloud secret manager, keychain, vault) is the
//! embedding application's concern. The environment-backed implementation
//! here covers local runs and tests.

use thiserror::Error;

use crate::config::{ConfigError, mandatory_env};

/// Errors retrieving a secret.
#[derive(Debug, Error)]
pub enum SecretError {
    /// The named secret is not available from the backing store.
    #[error("secret '{name}' not found")]
    NotFound {
        /// The requested secret name.
        name: String,
    },
}

impl SecretError {
    /// Creates a not-found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}

/// Opaque secret retrieval.
pub trait SecretStore: Send + Sync {
    /// Retrieves the secret named `name`.
    ///
    /// # Errors
    ///
    /// [`SecretError::NotFound`] when the backing store has no such secret.
    fn get(&self, name: &str) -> Result<String, SecretError>;
}

/// Environment-variable-backed secret store for local runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    /// Creates the store.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SecretStore for EnvSecretStore {
    fn get(&self, name: &str) -> Result<String, SecretError> {
        mandatory_env(name).map_err(|ConfigError::MissingConfiguration { key }| {
            SecretError::not_found(key)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_env_secret_store_reads_environment() {
        unsafe { std::env::set_var("BILLFETCH_TEST_SECRET", "hunter2") };
        let store = EnvSecretStore::new();
        assert_eq!(store.get("BILLFETCH_TEST_SECRET").unwrap(), "hunter2");
        unsafe { std::env::remove_var("BILLFETCH_TEST_SECRET") };
    }

    #[test]
    fn test_env_secret_store_missing_secret() {
        let store = EnvSecretStore::new();
        let error = store.get("BILLFETCH_TEST_NO_SUCH_SECRET").unwrap_err();
        assert!(error.to_string().contains("BILLFETCH_TEST_NO_SUCH_SECRET"));
    }
}
