//! Durable per-platform authentication-state records.

use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::StateError;
use super::state::{AuthState, NamedValue};
use crate::browser::{BrowserPage, BrowsingContext};

/// Script evaluated in a page to read its session-scoped storage as a
/// key/value object.
pub const SESSION_STORAGE_READ_SCRIPT: &str = r"() => {
    const items = {};
    for (let i = 0; i < sessionStorage.length; i++) {
        const key = sessionStorage.key(i);
        items[key] = sessionStorage.getItem(key);
    }
    return items;
}";

/// Stores one [`AuthState`] record per platform as `{platform}.json` under a
/// fixed directory.
///
/// Records are written whole-file via a temp-file rename, so a crash mid-write
/// never leaves a partial record behind. The store does not arbitrate between
/// concurrent runs: do not run the same platform concurrently.
#[derive(Debug, Clone)]
pub struct AuthStateStore {
    dir: PathBuf,
}

impl AuthStateStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// the first capture.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the record for `platform`.
    #[must_use]
    pub fn state_path(&self, platform: &str) -> PathBuf {
        self.dir.join(format!("{platform}.json"))
    }

    /// Loads the persisted record for `platform`.
    ///
    /// Returns `Ok(None)` when no record exists yet -- a normal first-run
    /// outcome, never treated as corruption.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] when the record exists but cannot be read or
    /// parsed.
    #[instrument(level = "debug", skip(self))]
    pub async fn load(&self, platform: &str) -> Result<Option<AuthState>, StateError> {
        let path = self.state_path(platform);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!(platform, path = %path.display(), "no persisted session state");
                return Ok(None);
            }
            Err(error) => return Err(StateError::io(path, error)),
        };

        let state =
            serde_json::from_slice(&raw).map_err(|error| StateError::malformed(path, error))?;
        Ok(Some(state))
    }

    /// Captures the browsing context's current cookies and durable storage,
    /// overwriting the record for `platform`. Session-scoped storage is the
    /// exception to the overwrite: entries captured by prior runs are carried
    /// forward, because the context snapshot never contains them and
    /// truncating them would force a re-login on the next run.
    ///
    /// When `include_session_storage` is set, additionally reads the page's
    /// session-scoped storage and merges it into the record for the page's
    /// current origin. The merge is read-modify-write against the on-disk
    /// record: a prior run may have captured session storage for a different
    /// origin that merging into the fresh in-memory snapshot would silently
    /// drop.
    ///
    /// A page with no session-scoped storage downgrades the merge to a
    /// warning, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] when reading the context or writing the record
    /// fails.
    #[instrument(skip(self, ctx, page))]
    pub async fn capture(
        &self,
        ctx: &dyn BrowsingContext,
        page: &dyn BrowserPage,
        platform: &str,
        include_session_storage: bool,
    ) -> Result<(), StateError> {
        let mut snapshot = AuthState {
            cookies: ctx.cookies().await?,
            origins: ctx.origin_storage().await?,
        };
        if let Some(previous) = self.load(platform).await? {
            for entry in previous.origins {
                if !entry.session_storage.is_empty() {
                    let origin = entry.origin;
                    snapshot.merge_session_storage(&origin, entry.session_storage);
                }
            }
        }
        self.write_atomic(platform, &snapshot).await?;

        if include_session_storage {
            self.merge_session_storage(page, platform).await?;
        }

        info!(
            platform,
            path = %self.state_path(platform).display(),
            cookies = snapshot.cookies.len(),
            "saved session state"
        );
        Ok(())
    }

    async fn merge_session_storage(
        &self,
        page: &dyn BrowserPage,
        platform: &str,
    ) -> Result<(), StateError> {
        let payload = page.evaluate(SESSION_STORAGE_READ_SCRIPT, None).await?;
        let items = session_items(&payload);
        if items.is_empty() {
            warn!(platform, "no session storage present; nothing to merge");
            return Ok(());
        }

        let origin = page_origin(&page.url())?;
        let mut state = self.load(platform).await?.unwrap_or_default();
        state.merge_session_storage(&origin, items);
        self.write_atomic(platform, &state).await?;

        debug!(platform, origin, "merged session storage into persisted state");
        Ok(())
    }

    /// Whole-file replace: serialize to a sibling temp file, then rename
    /// over the record.
    async fn write_atomic(&self, platform: &str, state: &AuthState) -> Result<(), StateError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|error| StateError::io(self.dir.clone(), error))?;

        let path = self.state_path(platform);
        let body = serde_json::to_vec_pretty(state)
            .map_err(|error| StateError::malformed(path.clone(), error))?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &body)
            .await
            .map_err(|error| StateError::io(tmp.clone(), error))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|error| StateError::io(path, error))?;
        Ok(())
    }
}

/// Converts the session-storage read script's result object into storage
/// entries. Non-string values are skipped; sessionStorage only holds strings.
fn session_items(payload: &Value) -> Vec<NamedValue> {
    payload
        .as_object()
        .map(|map| {
            map.iter()
                .filter_map(|(name, value)| {
                    value.as_str().map(|value| NamedValue::new(name, value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Reduces a page address to its origin string, e.g.
/// `https://portal.example.com/invoices` -> `https://portal.example.com`.
fn page_origin(page_url: &str) -> Result<String, StateError> {
    let parsed = Url::parse(page_url).map_err(|_| StateError::invalid_origin(page_url))?;
    let origin = parsed.origin();
    if origin.is_tuple() {
        Ok(origin.ascii_serialization())
    } else {
        Err(StateError::invalid_origin(page_url))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_origin_strips_path_and_query() {
        let origin = page_origin("https://portal.example.com/invoices?year=2025").unwrap();
        assert_eq!(origin, "https://portal.example.com");
    }

    #[test]
    fn test_page_origin_keeps_explicit_port() {
        let origin = page_origin("http://localhost:8080/login").unwrap();
        assert_eq!(origin, "http://localhost:8080");
    }

    #[test]
    fn test_page_origin_rejects_opaque_addresses() {
        assert!(matches!(
            page_origin("blob:deadbeef"),
            Err(StateError::InvalidOrigin { .. })
        ));
        assert!(matches!(
            page_origin("not a url"),
            Err(StateError::InvalidOrigin { .. })
        ));
    }

    #[test]
    fn test_session_items_reads_string_values_only() {
        let payload = json!({"token": "t1", "count": 3, "flag": "on"});
        let items = session_items(&payload);
        assert_eq!(items.len(), 2);
        assert!(items.contains(&NamedValue::new("token", "t1")));
        assert!(items.contains(&NamedValue::new("flag", "on")));
    }

    #[test]
    fn test_session_items_empty_for_non_object_payload() {
        assert!(session_items(&json!(null)).is_empty());
        assert!(session_items(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_load_from_empty_directory_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = AuthStateStore::new(dir.path());
        let state = tokio_test::block_on(store.load("partner")).unwrap();
        assert!(state.is_none());
    }

    #[test]
    fn test_state_path_is_platform_keyed_json() {
        let store = AuthStateStore::new("/tmp/auth-state");
        assert_eq!(
            store.state_path("partner"),
            PathBuf::from("/tmp/auth-state/partner.json")
        );
    }
}
