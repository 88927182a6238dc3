//! Artifact acquisition: race competing delivery mechanisms for one document.
//!
//! Target portals flip non-deterministically between delivering a document
//! via a browser-native download event and rendering it as an in-page blob
//! resource. Instead of guessing, the engine runs one strategy per mechanism
//! concurrently and accepts whichever produces bytes first.
//!
//! # Architecture
//!
//! - [`AcquisitionStrategy`] - async trait one delivery mechanism implements
//! - [`AcquisitionEngine`] - the first-success-wins race with cancellation
//! - [`DownloadEventStrategy`] - browser-native download signal
//! - [`BlobPollStrategy`] - poll/reload until a `blob:` reference appears
//! - [`build_default_engine`] - both standard strategies, ready to race

mod blob;
mod engine;
mod error;
mod event;
mod scratch;

pub use blob::{BLOB_FETCH_SCRIPT, BLOB_POLL_STRATEGY, BlobPollStrategy};
pub use engine::AcquisitionEngine;
pub use error::{AcquireError, StrategyError, StrategyFailure};
pub use event::{DOWNLOAD_EVENT_STRATEGY, DownloadEventStrategy};
pub use scratch::ScratchFile;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::browser::BrowserPage;

/// A successful acquisition: the document bytes plus a provenance tag naming
/// the strategy that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquired {
    /// The document payload.
    pub bytes: Vec<u8>,
    /// Name of the winning strategy.
    pub strategy: &'static str,
}

/// One concurrent unit of acquisition work.
///
/// A strategy is pending until `run` returns: `Ok` is the succeeded state,
/// `Err` the failed state, and neither transitions back. A strategy owns any
/// temporary resources it creates and must release them on success and on
/// cancellation (drop of its future).
///
/// # Object Safety
///
/// Uses `async_trait` so the engine can race `Arc<dyn AcquisitionStrategy>`
/// collections; Rust 2024 native async traits are not object-safe.
#[async_trait]
pub trait AcquisitionStrategy: Send + Sync {
    /// Provenance tag, e.g. `"download-event"`.
    fn name(&self) -> &'static str;

    /// Runs the strategy to a terminal state within `budget`.
    async fn run(&self, budget: Duration) -> Result<Vec<u8>, StrategyError>;
}

/// Builds the engine used by per-site orchestration flows: the event-driven
/// strategy watching `viewer_page` for a native download, racing the blob
/// poller over the same pages.
#[must_use]
pub fn build_default_engine(
    fetch_page: Arc<dyn BrowserPage>,
    viewer_page: Arc<dyn BrowserPage>,
    scratch_dir: &Path,
) -> AcquisitionEngine {
    let mut engine = AcquisitionEngine::new();
    engine.register(Arc::new(DownloadEventStrategy::new(
        Arc::clone(&viewer_page),
        scratch_dir,
    )));
    engine.register(Arc::new(BlobPollStrategy::new(fetch_page, viewer_page)));
    engine
}
