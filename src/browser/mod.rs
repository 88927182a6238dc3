//! Abstract browser-control collaborator boundary.
//!
//! The crate never links a concrete browser driver. Everything it needs from
//! one -- navigation, waits, in-page script evaluation, download events,
//! cookie and storage snapshots -- is expressed as the traits in this module
//! and implemented by the embedding application (or by the fake harness in
//! the integration tests).
//!
//! # Object Safety
//!
//! These traits use `async_trait` to support dynamic dispatch via
//! `Arc<dyn BrowserPage>` and friends. Rust 2024 native async traits are not
//! object-safe, so `async_trait` is required for the collaborator seam.

mod error;

pub use error::BrowserError;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::{CookieRecord, OriginState};

/// Wait polarity for selector conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    /// Wait until the selector is present in the DOM.
    Attached,
    /// Wait until the selector is absent from the DOM.
    Detached,
}

/// A browsing context: an isolated cookie jar and storage universe in which
/// pages are opened.
#[async_trait]
pub trait BrowsingContext: Send + Sync {
    /// Installs a script that runs in every page of this context before any
    /// of the page's own scripts. Must be called before pages are created to
    /// cover the first navigation.
    async fn add_init_script(&self, script: &str) -> Result<(), BrowserError>;

    /// Snapshot of the context's cookie jar.
    async fn cookies(&self) -> Result<Vec<CookieRecord>, BrowserError>;

    /// Snapshot of the context's per-origin durable storage.
    async fn origin_storage(&self) -> Result<Vec<OriginState>, BrowserError>;
}

/// One open page within a browsing context.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// The page's current address.
    fn url(&self) -> String;

    /// Navigates the page to `url`.
    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    /// Reloads the page at its current address.
    async fn reload(&self) -> Result<(), BrowserError>;

    /// Waits until the page address matches `pattern`.
    ///
    /// # Errors
    ///
    /// [`BrowserError::WaitTimeout`] if the address never matches within
    /// `timeout`.
    async fn wait_for_url(&self, pattern: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// Waits until `selector` reaches the requested [`Presence`].
    ///
    /// # Errors
    ///
    /// [`BrowserError::WaitTimeout`] if the condition never holds within
    /// `timeout`.
    async fn wait_for_selector(
        &self,
        selector: &str,
        presence: Presence,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    /// Evaluates a script in the page's execution context, optionally
    /// passing one JSON-serializable argument, and returns the script's
    /// JSON-serialized result.
    async fn evaluate(&self, script: &str, arg: Option<Value>) -> Result<Value, BrowserError>;

    /// Waits for the browser-native "download started" signal on this page.
    ///
    /// # Errors
    ///
    /// [`BrowserError::WaitTimeout`] if no download starts within `timeout`.
    async fn expect_download(
        &self,
        timeout: Duration,
    ) -> Result<Box<dyn DownloadHandle>, BrowserError>;
}

/// A started browser download whose stream can be persisted to disk.
#[async_trait]
pub trait DownloadHandle: Send + Sync {
    /// Persists the delivered stream to `path`.
    async fn save_as(&self, path: &Path) -> Result<(), BrowserError>;
}
