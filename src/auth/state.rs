//! Persisted authentication-state data model.
//!
//! The on-disk shape is the Playwright storage-state document: top-level
//! `cookies` array plus `origins` array with `localStorage` and (optional)
//! `sessionStorage` name/value pairs. Keeping that shape means the files
//! stay readable and writable by standard JSON tooling and by external
//! harnesses that consume the same records.

use serde::{Deserialize, Serialize};

/// One cookie as captured from a browsing context's jar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookieRecord {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Domain the cookie is scoped to.
    pub domain: String,
    /// Path the cookie is scoped to.
    #[serde(default = "default_path")]
    pub path: String,
    /// Expiry as a Unix timestamp in seconds; `-1` marks a session cookie.
    #[serde(default = "default_expires")]
    pub expires: f64,
    /// HttpOnly flag.
    #[serde(default, rename = "httpOnly")]
    pub http_only: bool,
    /// Secure flag.
    #[serde(default)]
    pub secure: bool,
    /// SameSite policy, when the browser reports one.
    #[serde(default, rename = "sameSite", skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

impl CookieRecord {
    /// Creates a session cookie with default path and flags.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: default_path(),
            expires: default_expires(),
            http_only: false,
            secure: false,
            same_site: None,
        }
    }
}

fn default_path() -> String {
    "/".to_string()
}

fn default_expires() -> f64 {
    -1.0
}

/// One storage entry (`localStorage` or `sessionStorage` item).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    /// Storage key.
    pub name: String,
    /// Storage value.
    pub value: String,
}

impl NamedValue {
    /// Creates a storage entry.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Captured storage for a single origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginState {
    /// Origin string, e.g. `https://portal.example.com`.
    pub origin: String,
    /// Durable storage that survives browser restarts.
    #[serde(default, rename = "localStorage")]
    pub local_storage: Vec<NamedValue>,
    /// Session-scoped storage; only present when explicitly captured.
    #[serde(default, rename = "sessionStorage", skip_serializing_if = "Vec::is_empty")]
    pub session_storage: Vec<NamedValue>,
}

impl OriginState {
    /// Creates an origin entry with durable storage only.
    #[must_use]
    pub fn new(origin: impl Into<String>, local_storage: Vec<NamedValue>) -> Self {
        Self {
            origin: origin.into(),
            local_storage,
            session_storage: Vec::new(),
        }
    }
}

/// One platform's persisted authentication state.
///
/// Invariant: at most one entry per distinct origin string in `origins`.
/// [`AuthState::merge_session_storage`] upholds it by merging re-captures
/// into the existing entry instead of duplicating it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    /// Ordered cookie records.
    #[serde(default)]
    pub cookies: Vec<CookieRecord>,
    /// Per-origin storage entries.
    #[serde(default)]
    pub origins: Vec<OriginState>,
}

impl AuthState {
    /// Replaces the session-scoped storage captured for `origin`.
    ///
    /// If the origin is already present, only its `sessionStorage` field is
    /// replaced and its durable storage is left untouched. Otherwise a new
    /// origin entry is created with empty durable storage.
    pub fn merge_session_storage(&mut self, origin: &str, items: Vec<NamedValue>) {
        if let Some(entry) = self.origins.iter_mut().find(|entry| entry.origin == origin) {
            entry.session_storage = items;
        } else {
            self.origins.push(OriginState {
                origin: origin.to_string(),
                local_storage: Vec::new(),
                session_storage: items,
            });
        }
    }

    /// Returns the entry for `origin`, if captured.
    #[must_use]
    pub fn origin(&self, origin: &str) -> Option<&OriginState> {
        self.origins.iter().find(|entry| entry.origin == origin)
    }
}
