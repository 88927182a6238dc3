//! Error types for session persistence and freshness.

use std::path::PathBuf;

use thiserror::Error;

use crate::browser::BrowserError;

/// Errors from the session freshness guard.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Persisted cookies/storage no longer authenticate the session.
    ///
    /// Surfaced distinctly from raw wait-timeouts so callers can trigger an
    /// interactive re-login instead of retrying blindly.
    #[error("authentication session expired for {platform}; interactive re-login required")]
    SessionExpired {
        /// Platform whose persisted state went stale.
        platform: String,
    },

    /// A non-timeout browser failure; not a freshness signal.
    #[error(transparent)]
    Browser(#[from] BrowserError),
}

impl AuthError {
    /// Creates a session-expired error for `platform`.
    pub fn session_expired(platform: impl Into<String>) -> Self {
        Self::SessionExpired {
            platform: platform.into(),
        }
    }

    /// Returns true if this is the session-expired signal.
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }
}

/// Errors from the session state store.
#[derive(Debug, Error)]
pub enum StateError {
    /// File system error reading or writing a state record.
    #[error("IO error accessing session state at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A state record exists but is not valid JSON for the expected shape.
    #[error("malformed session state at {path}: {source}")]
    Malformed {
        /// Path of the unreadable record.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The page address cannot be reduced to an origin for the merge.
    #[error("cannot derive an origin from page address: {url}")]
    InvalidOrigin {
        /// The offending page address.
        url: String,
    },

    /// Reading the browsing context's cookies or storage failed.
    #[error(transparent)]
    Browser(#[from] BrowserError),
}

impl StateError {
    /// Creates an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a malformed-record error with path context.
    pub fn malformed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Malformed {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid-origin error.
    pub fn invalid_origin(url: impl Into<String>) -> Self {
        Self::InvalidOrigin { url: url.into() }
    }
}
