//! Resource-polling acquisition: in-page blob references.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

use super::error::StrategyError;
use super::AcquisitionStrategy;
use crate::browser::BrowserPage;

/// Provenance tag for the resource-polling strategy.
pub const BLOB_POLL_STRATEGY: &str = "blob-poll";

/// Script evaluated in the fetch page to read a blob reference and return
/// its content base64-encoded.
pub const BLOB_FETCH_SCRIPT: &str = r"async (blobUrl) => {
    const response = await fetch(blobUrl);
    const blob = await response.blob();
    const reader = new FileReader();
    return new Promise((resolve) => {
        reader.onloadend = () => resolve(reader.result.split(',')[1]);
        reader.readAsDataURL(blob);
    });
}";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polls the viewer page until its address becomes a `blob:` reference,
/// reloading between attempts, then fetches the blob inside the fetch
/// page's execution context and decodes the portable base64 payload.
///
/// Two pages are involved because portals open the document in a fresh
/// viewer page while only the original page's context can fetch the blob.
pub struct BlobPollStrategy {
    fetch_page: Arc<dyn BrowserPage>,
    viewer_page: Arc<dyn BrowserPage>,
    poll_interval: Duration,
}

impl BlobPollStrategy {
    /// Creates the strategy over the originating page and the viewer page.
    #[must_use]
    pub fn new(fetch_page: Arc<dyn BrowserPage>, viewer_page: Arc<dyn BrowserPage>) -> Self {
        Self {
            fetch_page,
            viewer_page,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Overrides the sleep between poll attempts.
    #[must_use]
    pub fn with_poll_interval(self, poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            ..self
        }
    }

    async fn fetch_blob(&self, blob_url: &str) -> Result<Vec<u8>, StrategyError> {
        let payload = self
            .fetch_page
            .evaluate(BLOB_FETCH_SCRIPT, Some(Value::String(blob_url.to_string())))
            .await?;
        let encoded = payload.as_str().ok_or(StrategyError::UnexpectedPayload)?;
        Ok(BASE64.decode(encoded)?)
    }
}

#[async_trait]
impl AcquisitionStrategy for BlobPollStrategy {
    fn name(&self) -> &'static str {
        BLOB_POLL_STRATEGY
    }

    async fn run(&self, budget: Duration) -> Result<Vec<u8>, StrategyError> {
        let deadline = Instant::now() + budget;
        loop {
            let address = self.viewer_page.url();
            if address.starts_with("blob:") {
                debug!(address, "viewer page reached blob reference");
                return self.fetch_blob(&address).await;
            }
            if Instant::now() >= deadline {
                return Err(StrategyError::timeout(budget));
            }

            // Viewers occasionally stall on an interstitial; a reload nudges
            // them toward the blob address.
            self.viewer_page.reload().await?;

            let remaining = deadline.saturating_duration_since(Instant::now());
            tokio::time::sleep(self.poll_interval.min(remaining)).await;
        }
    }
}
