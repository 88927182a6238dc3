//! Event-driven acquisition: the browser-native download signal.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::error::StrategyError;
use super::scratch::ScratchFile;
use super::AcquisitionStrategy;
use crate::browser::BrowserPage;

/// Provenance tag for the event-driven strategy.
pub const DOWNLOAD_EVENT_STRATEGY: &str = "download-event";

/// Subscribes to the page's native "download started" signal; on firing,
/// persists the delivered stream to a scratch path, reads it back, and
/// resolves with the bytes. The scratch file is removed on every exit path
/// by the [`ScratchFile`] guard.
pub struct DownloadEventStrategy {
    page: Arc<dyn BrowserPage>,
    scratch_dir: PathBuf,
}

impl DownloadEventStrategy {
    /// Creates the strategy against the page expected to emit the download.
    #[must_use]
    pub fn new(page: Arc<dyn BrowserPage>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            page,
            scratch_dir: scratch_dir.into(),
        }
    }
}

#[async_trait]
impl AcquisitionStrategy for DownloadEventStrategy {
    fn name(&self) -> &'static str {
        DOWNLOAD_EVENT_STRATEGY
    }

    async fn run(&self, budget: Duration) -> Result<Vec<u8>, StrategyError> {
        let download = self
            .page
            .expect_download(budget)
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    StrategyError::timeout(budget)
                } else {
                    StrategyError::Browser(error)
                }
            })?;

        tokio::fs::create_dir_all(&self.scratch_dir)
            .await
            .map_err(|error| StrategyError::io(self.scratch_dir.clone(), error))?;

        let scratch = ScratchFile::allocate_in(&self.scratch_dir);
        download.save_as(scratch.path()).await?;
        let bytes = tokio::fs::read(scratch.path())
            .await
            .map_err(|error| StrategyError::io(scratch.path(), error))?;

        debug!(bytes = bytes.len(), "download event delivered artifact");
        Ok(bytes)
    }
}
