//! Authentication endpoints

use crate::api::types::{LoginResponse, User};
use crate::api::ApiClient;
use crate::error::Result;

/// Typed wrapper over `/v1/auth/*`
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    /// Create the auth endpoint group over a shared client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Sign in with email and password.
    ///
    /// The backend expects a form-encoded body. On success the caller is
    /// responsible for persisting the token and user via
    /// [`CredentialStore::store_login`](crate::auth::CredentialStore::store_login).
    ///
    /// # Errors
    ///
    /// Returns [`QuizmateError::Authentication`](crate::error::QuizmateError)
    /// on rejected credentials, [`QuizmateError::Network`] when the backend is
    /// unreachable.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        tracing::info!("Signing in as {}", email);
        self.client
            .post_form(
                "/v1/auth/login",
                &[("username", email), ("password", password)],
            )
            .await
    }

    /// Fetch the current user, re-validating the bearer token.
    pub async fn me(&self) -> Result<User> {
        self.client.get_json("/v1/auth/me").await
    }
}
