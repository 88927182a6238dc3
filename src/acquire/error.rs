//! Error types for artifact acquisition.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::browser::BrowserError;

/// A single strategy's terminal failure, tagged with its provenance.
#[derive(Debug)]
pub struct StrategyFailure {
    /// Name of the failed strategy.
    pub strategy: &'static str,
    /// Why it failed.
    pub reason: StrategyError,
}

impl StrategyFailure {
    /// Creates a tagged failure.
    #[must_use]
    pub fn new(strategy: &'static str, reason: StrategyError) -> Self {
        Self { strategy, reason }
    }
}

impl fmt::Display for StrategyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.strategy, self.reason)
    }
}

/// Errors that terminate a single acquisition strategy.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// No document delivery was observed within the strategy's timeout.
    #[error("no document delivery observed within {timeout:?}")]
    Timeout {
        /// The elapsed budget.
        timeout: Duration,
    },

    /// File system error on a scratch file.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The scratch path involved.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The in-page fetch returned something other than a base64 string.
    #[error("blob payload was not a base64 string")]
    UnexpectedPayload,

    /// The in-page fetch returned a string that fails base64 decoding.
    #[error("blob payload decoding failed: {source}")]
    Decode {
        /// Underlying decode error.
        #[from]
        source: base64::DecodeError,
    },

    /// A browser-level failure while driving the strategy.
    #[error(transparent)]
    Browser(#[from] BrowserError),
}

impl StrategyError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout { timeout }
    }

    /// Creates an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from the acquisition engine.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// Every competing strategy terminated in failure; the per-strategy
    /// reasons are carried for diagnostics.
    #[error("all acquisition strategies failed: [{}]", summarize(failures))]
    AllStrategiesFailed {
        /// One entry per losing strategy.
        failures: Vec<StrategyFailure>,
    },

    /// The engine was asked to acquire with no strategies registered.
    #[error("acquisition engine has no strategies registered")]
    NoStrategies,
}

impl AcquireError {
    /// Creates an all-strategies-failed error.
    #[must_use]
    pub fn all_failed(failures: Vec<StrategyFailure>) -> Self {
        Self::AllStrategiesFailed { failures }
    }

    /// The per-strategy failure reasons, when present.
    #[must_use]
    pub fn failures(&self) -> &[StrategyFailure] {
        match self {
            Self::AllStrategiesFailed { failures } => failures,
            Self::NoStrategies => &[],
        }
    }
}

fn summarize(failures: &[StrategyFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
