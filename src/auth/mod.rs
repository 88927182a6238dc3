//! Authenticated-session persistence and freshness.
//!
//! - [`AuthStateStore`] - durable per-platform state records (capture/load/merge)
//! - [`await_authenticated`] / [`await_authenticated_presence`] - freshness guard
//! - [`AuthState`] - the persisted data model

mod error;
mod freshness;
mod state;
mod store;

pub use error::{AuthError, StateError};
pub use freshness::{await_authenticated, await_authenticated_presence};
pub use state::{AuthState, CookieRecord, NamedValue, OriginState};
pub use store::{AuthStateStore, SESSION_STORAGE_READ_SCRIPT};
