//! Credential storage and the authentication guard
//!
//! - [`CredentialStore`] holds the bearer token (process-scoped) and the
//!   cached user profile (persisted), cleared together on logout or token
//!   rejection.
//! - [`AuthGuard`] re-validates the cached token against the backend before a
//!   protected command loads any data.

mod credentials;
mod guard;

pub use credentials::CredentialStore;
pub use guard::AuthGuard;
