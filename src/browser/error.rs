//! Error type for the browser-control collaborator boundary.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by a browser-control implementation.
///
/// The distinction between [`BrowserError::WaitTimeout`] and everything else
/// is load-bearing: the freshness guard reinterprets wait-timeouts as expired
/// sessions while passing other failures through unchanged.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// A wait condition did not resolve within its timeout.
    #[error("timed out after {timeout:?} waiting for {what}")]
    WaitTimeout {
        /// Human-readable description of the awaited condition.
        what: String,
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// Any other failure reported by the browser driver.
    #[error("browser protocol error: {message}")]
    Protocol {
        /// Driver-provided failure description.
        message: String,
    },
}

impl BrowserError {
    /// Creates a wait-timeout error.
    pub fn wait_timeout(what: impl Into<String>, timeout: Duration) -> Self {
        Self::WaitTimeout {
            what: what.into(),
            timeout,
        }
    }

    /// Creates a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Returns true if this error is a wait-timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_timeout_display_names_condition_and_budget() {
        let error = BrowserError::wait_timeout("selector .invoice", Duration::from_secs(5));
        let msg = error.to_string();
        assert!(msg.contains("selector .invoice"), "condition in: {msg}");
        assert!(msg.contains("5s"), "timeout in: {msg}");
    }

    #[test]
    fn test_is_timeout_distinguishes_variants() {
        assert!(BrowserError::wait_timeout("url", Duration::from_secs(1)).is_timeout());
        assert!(!BrowserError::protocol("target closed").is_timeout());
    }
}
