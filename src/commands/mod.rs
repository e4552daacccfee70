/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `auth`  — Sign in, sign out, and identity inspection
- `play`  — Start or join a live session and play it interactively
- `admin` — Content administration (quizzes, questions, topics, users)

These handlers are intentionally small and use the library components:
the typed API client, the push channel, and the session synchronizer.
*/

use std::sync::Arc;

use rustyline::DefaultEditor;

use crate::api::ApiClient;
use crate::auth::CredentialStore;
use crate::config::Config;
use crate::error::Result;

pub mod admin;
pub mod auth;
pub mod play;

/// Build the shared API client and its credential store.
///
/// Installs an auth-error hook so an expired token surfaces once as a
/// warning instead of a bare HTTP failure.
pub(crate) fn build_api(config: &Config) -> Result<(Arc<CredentialStore>, ApiClient)> {
    let credentials = Arc::new(CredentialStore::open()?);
    let api = ApiClient::new(&config.api, Arc::clone(&credentials))?;
    api.on_auth_error(Arc::new(|| {
        tracing::warn!("Session expired or unauthorized; run `quizmate login` to sign in again");
    }));
    Ok((credentials, api))
}

/// Ask the user to confirm a destructive action.
///
/// Returns `true` immediately when `yes` was passed on the command line.
pub(crate) fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let mut rl = DefaultEditor::new()?;
    let line = rl.readline(&format!("{} [y/N] ", prompt))?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "Yes"))
}
