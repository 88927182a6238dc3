//! Integration tests for the session freshness guard.

use std::time::Duration;

use billfetch_core::auth::{AuthError, await_authenticated, await_authenticated_presence};
use billfetch_core::browser::Presence;

mod support;
use support::{FakePage, WaitOutcome};

const TIMEOUT: Duration = Duration::from_millis(50);

// ---- URL guard ----

#[tokio::test]
async fn test_authenticated_url_reached_in_time_succeeds() {
    let page = FakePage::at("https://portal.test/invoices");

    let result =
        await_authenticated(&page, "https://portal.test/invoices", "portal", TIMEOUT).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_url_wait_timeout_becomes_session_expired() {
    let mut page = FakePage::at("https://portal.test/login");
    page.url_wait = WaitOutcome::Timeout;

    let error = await_authenticated(&page, "https://portal.test/invoices", "portal", TIMEOUT)
        .await
        .unwrap_err();
    assert!(error.is_session_expired(), "got: {error}");
    assert!(error.to_string().contains("portal"));
}

#[tokio::test]
async fn test_url_wait_driver_failure_is_not_session_expired() {
    let mut page = FakePage::at("https://portal.test/login");
    page.url_wait = WaitOutcome::Fail;

    let error = await_authenticated(&page, "https://portal.test/invoices", "portal", TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(error, AuthError::Browser(_)), "got: {error}");
}

// ---- Presence guard, should_exist = true ----

#[tokio::test]
async fn test_expected_selector_appearing_succeeds() {
    let page = FakePage::at("https://portal.test/")
        .scripted_selector(".account-menu", Presence::Attached, WaitOutcome::Met);

    let result =
        await_authenticated_presence(&page, ".account-menu", true, "portal", TIMEOUT).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_expected_selector_never_appearing_is_session_expired() {
    let page = FakePage::at("https://portal.test/");

    let error = await_authenticated_presence(&page, ".account-menu", true, "portal", TIMEOUT)
        .await
        .unwrap_err();
    assert!(error.is_session_expired(), "got: {error}");
}

// ---- Presence guard, should_exist = false ----

#[tokio::test]
async fn test_unwanted_selector_disappearing_succeeds() {
    // The login form going away is the authenticated signal here; this
    // success path must not be misreported as a failure.
    let page = FakePage::at("https://portal.test/")
        .scripted_selector("#login-form", Presence::Detached, WaitOutcome::Met);

    let result =
        await_authenticated_presence(&page, "#login-form", false, "portal", TIMEOUT).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_unwanted_selector_remaining_present_is_session_expired() {
    let page = FakePage::at("https://portal.test/")
        .scripted_selector("#login-form", Presence::Detached, WaitOutcome::Timeout);

    let error = await_authenticated_presence(&page, "#login-form", false, "portal", TIMEOUT)
        .await
        .unwrap_err();
    assert!(error.is_session_expired(), "got: {error}");
}

#[tokio::test]
async fn test_presence_driver_failure_passes_through() {
    let page = FakePage::at("https://portal.test/")
        .scripted_selector("#login-form", Presence::Detached, WaitOutcome::Fail);

    let error = await_authenticated_presence(&page, "#login-form", false, "portal", TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(error, AuthError::Browser(_)), "got: {error}");
}
