//! Typed client for the quiz backend HTTP API
//!
//! This module provides [`ApiClient`], an explicitly constructed wrapper
//! around `reqwest` that attaches the bearer token from a shared
//! [`CredentialStore`](crate::auth::CredentialStore), translates transport and
//! HTTP-status failures into [`QuizmateError`] values, and fires a registered
//! auth-error hook on any 401 response.
//!
//! The endpoint groups live in submodules:
//!
//! - [`auth::AuthApi`] -- login and token re-validation
//! - [`game::GameApi`] -- session lifecycle and gameplay
//! - [`admin::AdminApi`] -- CRUD over quizzes, questions, topics, users, roles

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::auth::CredentialStore;
use crate::config::ApiConfig;
use crate::error::{QuizmateError, Result};

pub mod admin;
pub mod auth;
pub mod game;
pub mod types;

pub use admin::{AdminApi, QuizListCache};
pub use auth::AuthApi;
pub use game::GameApi;

/// Callback invoked whenever the backend answers 401.
///
/// The hosting command uses this to force re-authentication (the redirect
/// analog); the 401 is still surfaced as an error afterwards.
pub type AuthErrorHook = Arc<dyn Fn() + Send + Sync>;

/// Error body shape returned by the backend on failures.
///
/// The backend is not entirely consistent; both `message` and `detail` are
/// seen in the wild, so both are accepted.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// HTTP client for the quiz backend
///
/// Constructed explicitly and passed where needed so tests can point it at a
/// mock server; there is no global singleton.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use quizmate::api::ApiClient;
/// use quizmate::auth::CredentialStore;
/// use quizmate::config::ApiConfig;
///
/// # fn example() -> quizmate::error::Result<()> {
/// let credentials = Arc::new(CredentialStore::open()?);
/// let client = ApiClient::new(&ApiConfig::default(), credentials)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    credentials: Arc<CredentialStore>,
    auth_error_hook: Arc<RwLock<Option<AuthErrorHook>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    ///
    /// * `config` - Backend endpoint and timeout settings
    /// * `credentials` - Shared store the bearer token is read from
    ///
    /// # Errors
    ///
    /// Returns [`QuizmateError::Config`] when the base URL does not parse, or
    /// [`QuizmateError::Network`] when the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, credentials: Arc<CredentialStore>) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| QuizmateError::Config(format!("invalid base URL: {}", e)))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("quizmate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QuizmateError::Network(format!("failed to create HTTP client: {}", e)))?;

        tracing::debug!("Initialized API client: base_url={}", base_url);

        Ok(Self {
            http,
            base_url,
            credentials,
            auth_error_hook: Arc::new(RwLock::new(None)),
        })
    }

    /// Register the hook fired whenever the backend answers 401.
    ///
    /// Replaces any previously registered hook.
    pub fn on_auth_error(&self, hook: AuthErrorHook) {
        if let Ok(mut slot) = self.auth_error_hook.write() {
            *slot = Some(hook);
        }
    }

    /// The configured backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The credential store this client reads the bearer token from.
    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Derive the WebSocket URL for a session's push channel.
    ///
    /// Maps `http(s)` to `ws(s)` and appends the session events path.
    ///
    /// # Errors
    ///
    /// Returns [`QuizmateError::Config`] when the base URL cannot be turned
    /// into a WebSocket URL.
    pub fn session_events_url(&self, session_id: &str) -> Result<Url> {
        let mut url = self.url(&format!("/v1/game/session/{}/events", session_id))?;
        let scheme = match url.scheme() {
            "http" => "ws",
            "https" => "wss",
            other => {
                return Err(
                    QuizmateError::Config(format!("cannot derive ws scheme from '{}'", other))
                        .into(),
                )
            }
        };
        url.set_scheme(scheme)
            .map_err(|_| QuizmateError::Config("cannot set ws scheme".to_string()))?;
        if let Some(token) = self.credentials.token() {
            url.query_pairs_mut().append_pair("token", &token);
        }
        Ok(url)
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| QuizmateError::Config(format!("invalid path '{}': {}", path, e)).into())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a prepared request and translate failures into the error taxonomy.
    ///
    /// Transport failures become [`QuizmateError::Network`]. A 401 fires the
    /// auth-error hook and becomes [`QuizmateError::Authentication`]; other
    /// non-success statuses become [`QuizmateError::Api`] with a message
    /// extracted from the response body.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await.map_err(|e| {
            tracing::warn!("Request failed: {}", e);
            QuizmateError::Network(format!("no response from backend: {}", e))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = extract_error_message(response).await;

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Backend rejected credentials: {}", message);
            self.fire_auth_error_hook();
            return Err(QuizmateError::Authentication(message).into());
        }

        tracing::warn!("Backend returned {}: {}", status, message);
        Err(QuizmateError::Api {
            status: status.as_u16(),
            message,
        }
        .into())
    }

    fn fire_auth_error_hook(&self) {
        let hook = self
            .auth_error_hook
            .read()
            .ok()
            .and_then(|slot| slot.clone());
        if let Some(hook) = hook {
            hook();
        }
    }

    /// `GET` the given path and deserialize the JSON response.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        tracing::debug!("GET {}", url);
        let response = self.send(self.http.get(url)).await?;
        Ok(response.json().await.map_err(QuizmateError::Http)?)
    }

    /// `POST` the given path with an optional JSON body and deserialize the
    /// JSON response.
    pub(crate) async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let url = self.url(path)?;
        tracing::debug!("POST {}", url);
        let mut request = self.http.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.send(request).await?;
        Ok(response.json().await.map_err(QuizmateError::Http)?)
    }

    /// `POST` the given path with a form-encoded body and deserialize the
    /// JSON response. Used by the login endpoint.
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.url(path)?;
        tracing::debug!("POST {} (form)", url);
        let response = self.send(self.http.post(url).form(form)).await?;
        Ok(response.json().await.map_err(QuizmateError::Http)?)
    }

    /// `PUT` the given path with an optional JSON body and deserialize the
    /// JSON response.
    pub(crate) async fn put_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let url = self.url(path)?;
        tracing::debug!("PUT {}", url);
        let mut request = self.http.put(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.send(request).await?;
        Ok(response.json().await.map_err(QuizmateError::Http)?)
    }

    /// `PUT` the given path, discarding any response body.
    ///
    /// Used for fire-and-forget calls such as the ready toggle, where the UI
    /// update comes from the subsequent push event rather than the response.
    pub(crate) async fn put_ignore_body(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        tracing::debug!("PUT {}", url);
        self.send(self.http.put(url)).await?;
        Ok(())
    }

    /// `POST` the given path, discarding any response body.
    pub(crate) async fn post_ignore_body(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        tracing::debug!("POST {}", url);
        self.send(self.http.post(url)).await?;
        Ok(())
    }

    /// `DELETE` the given path, discarding any response body.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        tracing::debug!("DELETE {}", url);
        self.send(self.http.delete(url)).await?;
        Ok(())
    }
}

/// Pull a human-readable message out of an error response body.
///
/// Falls back to the raw body text, then to the canonical status reason.
async fn extract_error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    if let Ok(body) = serde_json::from_str::<ApiErrorBody>(&text) {
        if let Some(message) = body.message.or(body.detail) {
            return message;
        }
    }

    if !text.trim().is_empty() {
        return text;
    }

    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialStore;

    fn test_client() -> ApiClient {
        let credentials = Arc::new(CredentialStore::in_memory());
        ApiClient::new(&ApiConfig::default(), credentials).unwrap()
    }

    #[test]
    fn test_new_with_default_config() {
        let client = test_client();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            timeout_seconds: 30,
        };
        let credentials = Arc::new(CredentialStore::in_memory());
        assert!(ApiClient::new(&config, credentials).is_err());
    }

    #[test]
    fn test_session_events_url_maps_scheme() {
        let client = test_client();
        let url = client.session_events_url("s-1").unwrap();
        assert_eq!(url.scheme(), "ws");
        assert!(url.path().ends_with("/v1/game/session/s-1/events"));
    }

    #[test]
    fn test_session_events_url_carries_token() {
        let client = test_client();
        client.credentials().set_token("tok-42");
        let url = client.session_events_url("s-1").unwrap();
        assert!(url.query().unwrap_or_default().contains("token=tok-42"));
    }

    #[test]
    fn test_session_events_url_https_becomes_wss() {
        let config = ApiConfig {
            base_url: "https://quiz.example.com".to_string(),
            timeout_seconds: 30,
        };
        let credentials = Arc::new(CredentialStore::in_memory());
        let client = ApiClient::new(&config, credentials).unwrap();
        let url = client.session_events_url("s-9").unwrap();
        assert_eq!(url.scheme(), "wss");
    }
}
