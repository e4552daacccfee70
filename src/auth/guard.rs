//! Authentication guard for protected commands
//!
//! A command that requires a signed-in user fails fast when no token exists,
//! and otherwise
//! re-validates the cached token against the backend exactly once before any
//! data loading happens. A rejected token clears the local credentials so the
//! next attempt starts clean.

use std::sync::Arc;

use crate::api::auth::AuthApi;
use crate::api::types::User;
use crate::auth::CredentialStore;
use crate::error::{QuizmateError, Result};

/// Guard that validates the cached token before protected work runs
#[derive(Debug)]
pub struct AuthGuard {
    auth: AuthApi,
    credentials: Arc<CredentialStore>,
}

impl AuthGuard {
    /// Create a guard over the given auth endpoint and credential store.
    pub fn new(auth: AuthApi, credentials: Arc<CredentialStore>) -> Self {
        Self { auth, credentials }
    }

    /// Ensure the caller is signed in with a token the backend still accepts.
    ///
    /// Performs one `GET /v1/auth/me` validation call and refreshes the cached
    /// profile from the response. Must complete before any data-loading step
    /// of the calling command.
    ///
    /// # Errors
    ///
    /// Returns [`QuizmateError::Authentication`] when no token is stored, or
    /// when the backend rejects it; in the latter case the local token and
    /// profile are cleared first.
    pub async fn ensure_authenticated(&self) -> Result<User> {
        if !self.credentials.is_authenticated() {
            return Err(QuizmateError::Authentication(
                "not signed in; run `quizmate login` first".to_string(),
            )
            .into());
        }

        match self.auth.me().await {
            Ok(user) => {
                // Keep the cached profile in sync with the backend's view.
                self.credentials.save_profile(&user)?;
                Ok(user)
            }
            Err(err) => {
                if is_auth_error(&err) {
                    tracing::info!("Cached token rejected; clearing credentials");
                    self.credentials.clear()?;
                }
                Err(err)
            }
        }
    }
}

/// `true` when the error chain contains an authentication failure.
fn is_auth_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<QuizmateError>(),
            Some(QuizmateError::Authentication(_))
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::ApiConfig;

    fn guard_with(credentials: Arc<CredentialStore>) -> AuthGuard {
        let client = ApiClient::new(&ApiConfig::default(), Arc::clone(&credentials)).unwrap();
        AuthGuard::new(AuthApi::new(client), credentials)
    }

    #[tokio::test]
    async fn test_missing_token_fails_without_network_call() {
        // No token stored: the guard must fail before issuing any request,
        // so no mock server is needed here.
        let credentials = Arc::new(CredentialStore::in_memory());
        let guard = guard_with(Arc::clone(&credentials));

        let err = guard.ensure_authenticated().await.unwrap_err();
        assert!(is_auth_error(&err));
    }

    #[test]
    fn test_is_auth_error_matches_authentication_variant() {
        let err: anyhow::Error = QuizmateError::Authentication("expired".to_string()).into();
        assert!(is_auth_error(&err));

        let err: anyhow::Error = QuizmateError::Network("down".to_string()).into();
        assert!(!is_auth_error(&err));
    }
}
