//! Quizmate - quiz session client library
//!
//! This library provides the core functionality for the Quizmate client,
//! including the typed API surface, the push channel, session
//! synchronization, and configuration.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: Typed REST client for auth, game, and admin endpoints
//! - `push`: Session event push channel (WebSocket) and event types
//! - `sync`: Session state reconciliation and the page-phase machine
//! - `auth`: Credential storage and the authentication guard
//! - `validate`: Synchronous form validation and password strength
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use quizmate::api::{ApiClient, GameApi};
//! use quizmate::auth::CredentialStore;
//! use quizmate::config::Config;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load("config.yaml", None)?;
//! config.validate()?;
//!
//! let credentials = Arc::new(CredentialStore::open()?);
//! let api = ApiClient::new(&config.api, credentials)?;
//! let game = GameApi::new(api);
//! let session = game.join_session("sess-1").await?;
//! println!("{} players in lobby", session.players.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod push;
pub mod sync;
pub mod validate;

// Re-export commonly used types
pub use api::{AdminApi, ApiClient, AuthApi, GameApi};
pub use auth::{AuthGuard, CredentialStore};
pub use config::Config;
pub use error::{QuizmateError, Result};
pub use push::{PushChannel, SessionEvent};
pub use sync::{PagePhase, SessionSynchronizer, SessionView};
