//! Authentication command handlers
//!
//! Sign-in stores the bearer token in process memory and the profile on
//! disk; sign-out clears both. `whoami` verifies the stored token against
//! the backend rather than trusting the cached profile.

use colored::Colorize;
use rustyline::DefaultEditor;

use crate::api::AuthApi;
use crate::auth::AuthGuard;
use crate::config::Config;
use crate::error::{QuizmateError, Result};
use crate::validate::{validate_email, validate_password};

/// Sign in with an email and password and store the session token.
///
/// # Arguments
///
/// * `config` - Global configuration
/// * `email` - Email address to sign in with
/// * `password` - Password; prompted interactively when `None`
pub async fn run_login(config: Config, email: String, password: Option<String>) -> Result<()> {
    if let Some(message) = validate_email(&email) {
        return Err(QuizmateError::Validation(message).into());
    }

    let password = match password {
        Some(p) => p,
        None => {
            let mut rl = DefaultEditor::new()?;
            rl.readline("Password: ")?
        }
    };
    if let Some(message) = validate_password(&password) {
        return Err(QuizmateError::Validation(message).into());
    }

    let (credentials, api) = super::build_api(&config)?;
    let auth = AuthApi::new(api);

    let login = auth.login(&email, &password).await?;
    credentials.store_login(&login.access_token, &login.user)?;

    println!(
        "{} Signed in as {} <{}>",
        "✓".green(),
        login.user.display_name.bold(),
        login.user.email
    );
    if login.user.is_admin() {
        println!("  Admin commands are available: see `quizmate admin --help`");
    }
    Ok(())
}

/// Sign out and clear the stored token and profile.
pub async fn run_logout(config: Config) -> Result<()> {
    let (credentials, _api) = super::build_api(&config)?;
    credentials.clear()?;
    println!("{} Signed out", "✓".green());
    Ok(())
}

/// Show the currently signed-in user, verified against the backend.
pub async fn run_whoami(config: Config) -> Result<()> {
    let (credentials, api) = super::build_api(&config)?;
    let guard = AuthGuard::new(AuthApi::new(api), credentials);

    match guard.ensure_authenticated().await {
        Ok(user) => {
            println!("Signed in as:");
            println!("  Name:   {}", user.display_name);
            println!("  Email:  {}", user.email);
            println!("  Id:     {}", user.id);
            if !user.roles.is_empty() {
                println!("  Roles:  {}", user.roles.join(", "));
            }
            Ok(())
        }
        Err(err) => {
            println!("{} Not signed in", "✗".red());
            Err(err)
        }
    }
}
