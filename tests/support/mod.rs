//! Fake browser-control implementations shared by the integration tests.
//!
//! Behavior is scripted per test: pages are given wait outcomes, reload
//! address sequences, evaluate payloads, and optional download deliveries.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use billfetch_core::acquire::BLOB_FETCH_SCRIPT;
use billfetch_core::auth::{CookieRecord, OriginState, SESSION_STORAGE_READ_SCRIPT};
use billfetch_core::browser::{
    BrowserError, BrowserPage, BrowsingContext, DownloadHandle, Presence,
};

/// Scripted result for a wait call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The condition resolves immediately.
    Met,
    /// The wait times out.
    Timeout,
    /// The driver reports a non-timeout failure.
    Fail,
}

/// Fake browsing context with a fixed cookie jar and durable storage.
pub struct FakeContext {
    pub cookie_jar: Vec<CookieRecord>,
    pub durable: Vec<OriginState>,
    pub init_scripts: Mutex<Vec<String>>,
}

impl FakeContext {
    pub fn new(cookie_jar: Vec<CookieRecord>, durable: Vec<OriginState>) -> Self {
        Self {
            cookie_jar,
            durable,
            init_scripts: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn installed_scripts(&self) -> Vec<String> {
        self.init_scripts.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowsingContext for FakeContext {
    async fn add_init_script(&self, script: &str) -> Result<(), BrowserError> {
        self.init_scripts.lock().unwrap().push(script.to_string());
        Ok(())
    }

    async fn cookies(&self) -> Result<Vec<CookieRecord>, BrowserError> {
        Ok(self.cookie_jar.clone())
    }

    async fn origin_storage(&self) -> Result<Vec<OriginState>, BrowserError> {
        Ok(self.durable.clone())
    }
}

/// Fake page whose waits, evaluations, and downloads are scripted.
pub struct FakePage {
    url: Mutex<String>,
    reload_sequence: Mutex<VecDeque<String>>,
    pub url_wait: WaitOutcome,
    pub selector_waits: HashMap<(String, Presence), WaitOutcome>,
    pub session_storage: Value,
    pub blob_payload: Option<String>,
    pub download: Option<Vec<u8>>,
}

impl FakePage {
    /// A page sitting at `url` with every wait unscripted (timeouts).
    pub fn at(url: &str) -> Self {
        Self {
            url: Mutex::new(url.to_string()),
            reload_sequence: Mutex::new(VecDeque::new()),
            url_wait: WaitOutcome::Met,
            selector_waits: HashMap::new(),
            session_storage: Value::Null,
            blob_payload: None,
            download: None,
        }
    }

    /// Addresses the page moves through on successive reloads; once the
    /// sequence is exhausted the address stays put.
    pub fn reloading_into(self, addresses: &[&str]) -> Self {
        *self.reload_sequence.lock().unwrap() = addresses
            .iter()
            .map(|address| (*address).to_string())
            .collect();
        self
    }

    pub fn scripted_selector(mut self, selector: &str, presence: Presence, outcome: WaitOutcome) -> Self {
        self.selector_waits
            .insert((selector.to_string(), presence), outcome);
        self
    }
}

#[async_trait]
impl BrowserPage for FakePage {
    fn url(&self) -> String {
        self.url.lock().unwrap().clone()
    }

    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        *self.url.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn reload(&self) -> Result<(), BrowserError> {
        if let Some(next) = self.reload_sequence.lock().unwrap().pop_front() {
            *self.url.lock().unwrap() = next;
        }
        Ok(())
    }

    async fn wait_for_url(&self, pattern: &str, timeout: Duration) -> Result<(), BrowserError> {
        match self.url_wait {
            WaitOutcome::Met => Ok(()),
            WaitOutcome::Timeout => Err(BrowserError::wait_timeout(
                format!("url {pattern}"),
                timeout,
            )),
            WaitOutcome::Fail => Err(BrowserError::protocol("target closed")),
        }
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        presence: Presence,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let outcome = self
            .selector_waits
            .get(&(selector.to_string(), presence))
            .copied()
            .unwrap_or(WaitOutcome::Timeout);
        match outcome {
            WaitOutcome::Met => Ok(()),
            WaitOutcome::Timeout => Err(BrowserError::wait_timeout(
                format!("selector {selector}"),
                timeout,
            )),
            WaitOutcome::Fail => Err(BrowserError::protocol("target closed")),
        }
    }

    async fn evaluate(&self, script: &str, _arg: Option<Value>) -> Result<Value, BrowserError> {
        if script == SESSION_STORAGE_READ_SCRIPT {
            return Ok(self.session_storage.clone());
        }
        if script == BLOB_FETCH_SCRIPT {
            return match &self.blob_payload {
                Some(encoded) => Ok(Value::String(encoded.clone())),
                None => Err(BrowserError::protocol("blob fetch failed")),
            };
        }
        Err(BrowserError::protocol(format!("unscripted script: {script}")))
    }

    async fn expect_download(
        &self,
        timeout: Duration,
    ) -> Result<Box<dyn DownloadHandle>, BrowserError> {
        match &self.download {
            Some(bytes) => Ok(Box::new(FakeDownload {
                bytes: bytes.clone(),
            })),
            None => {
                // No delivery scripted: behave like a real driver and hold
                // the subscription open until the timeout elapses.
                tokio::time::sleep(timeout).await;
                Err(BrowserError::wait_timeout("download event", timeout))
            }
        }
    }
}

/// Fake download that writes its scripted bytes wherever it is saved.
pub struct FakeDownload {
    bytes: Vec<u8>,
}

#[async_trait]
impl DownloadHandle for FakeDownload {
    async fn save_as(&self, path: &Path) -> Result<(), BrowserError> {
        tokio::fs::write(path, &self.bytes)
            .await
            .map_err(|error| BrowserError::protocol(format!("save failed: {error}")))
    }
}
