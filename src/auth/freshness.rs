//! Session freshness guard.
//!
//! A loaded session is only useful if the portal still honors it. The guard
//! waits for a condition that holds exclusively on authenticated pages and
//! reinterprets the wait-timeout as [`AuthError::SessionExpired`]: the
//! caller gets a semantically specific, actionable signal to trigger
//! re-login instead of an opaque timeout. Non-timeout browser failures pass
//! through unchanged.

use std::time::Duration;

use tracing::{instrument, warn};

use super::error::AuthError;
use crate::browser::{BrowserPage, Presence};

/// Waits for the page to reach an address matching `url_pattern`.
///
/// # Errors
///
/// [`AuthError::SessionExpired`] if the address never matches within
/// `timeout`; [`AuthError::Browser`] for any other browser failure.
#[instrument(level = "debug", skip(page))]
pub async fn await_authenticated(
    page: &dyn BrowserPage,
    url_pattern: &str,
    platform: &str,
    timeout: Duration,
) -> Result<(), AuthError> {
    match page.wait_for_url(url_pattern, timeout).await {
        Ok(()) => Ok(()),
        Err(error) if error.is_timeout() => {
            warn!(
                platform,
                url_pattern, "page never reached the authenticated address; session expired"
            );
            Err(AuthError::session_expired(platform))
        }
        Err(error) => Err(AuthError::Browser(error)),
    }
}

/// Waits for `selector` to be present (`should_exist`) or absent
/// (`!should_exist`) on the page.
///
/// The polarity is exact: with `should_exist == false`, the selector
/// disappearing within `timeout` is success, while the selector still being
/// present at the deadline means the session expired. Symmetrically for
/// `should_exist == true`.
///
/// # Errors
///
/// [`AuthError::SessionExpired`] when the requested presence state is not
/// reached within `timeout`; [`AuthError::Browser`] for any other failure.
#[instrument(level = "debug", skip(page))]
pub async fn await_authenticated_presence(
    page: &dyn BrowserPage,
    selector: &str,
    should_exist: bool,
    platform: &str,
    timeout: Duration,
) -> Result<(), AuthError> {
    let presence = if should_exist {
        Presence::Attached
    } else {
        Presence::Detached
    };

    match page.wait_for_selector(selector, presence, timeout).await {
        Ok(()) => Ok(()),
        Err(error) if error.is_timeout() => {
            warn!(
                platform,
                selector, should_exist, "authenticated-presence condition never held; session expired"
            );
            Err(AuthError::session_expired(platform))
        }
        Err(error) => Err(AuthError::Browser(error)),
    }
}
