//! Billfetch Core Library
//!
//! This library provides the core functionality for the billfetch tool,
//! which retrieves billing artifacts (PDF invoices) from third-party web
//! portals by driving a real browser session and reusing authenticated
//! sessions across runs.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`acquire`] - Race-based acquisition of a document across delivery mechanisms
//! - [`auth`] - Session state persistence, merge, and freshness validation
//! - [`browser`] - Abstract browser-control collaborator traits
//! - [`fingerprint`] - Context-init fingerprint normalization
//! - [`rules`] - Per-platform period calendars
//! - [`artifact`] - Downloaded artifact layout
//! - [`config`] / [`secrets`] - Mandatory environment and secret lookups

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod acquire;
pub mod artifact;
pub mod auth;
pub mod browser;
pub mod config;
pub mod fingerprint;
pub mod rules;
pub mod secrets;

// Re-export commonly used types
pub use acquire::{
    AcquireError, Acquired, AcquisitionEngine, AcquisitionStrategy, BlobPollStrategy,
    DownloadEventStrategy, build_default_engine,
};
pub use artifact::{artifact_path, write_artifact};
pub use auth::{
    AuthError, AuthState, AuthStateStore, CookieRecord, NamedValue, OriginState, StateError,
    await_authenticated, await_authenticated_presence,
};
pub use browser::{BrowserError, BrowserPage, BrowsingContext, DownloadHandle, Presence};
pub use config::{ConfigError, mandatory_env};
pub use fingerprint::FingerprintProfile;
pub use rules::{PeriodRules, RulesError};
pub use secrets::{EnvSecretStore, SecretError, SecretStore};
