//! Quizmate - quiz session client
//!
#![doc = "Quizmate - quiz session client"]
#![doc = "Main entry point for the Quizmate CLI application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quizmate::cli::{Cli, Commands};
use quizmate::commands;
use quizmate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, cli.api_url.as_deref())?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Login { email, password } => {
            tracing::info!("Starting login for {}", email);
            commands::auth::run_login(config, email, password).await?;
            Ok(())
        }
        Commands::Logout => {
            tracing::info!("Signing out");
            commands::auth::run_logout(config).await?;
            Ok(())
        }
        Commands::Whoami => {
            commands::auth::run_whoami(config).await?;
            Ok(())
        }
        Commands::Play { topic, quiz, mode } => {
            tracing::info!("Starting play mode");
            commands::play::run_play(config, topic, quiz, mode).await?;
            Ok(())
        }
        Commands::Join { session } => {
            tracing::info!("Joining session {}", session);
            commands::play::run_join(config, session).await?;
            Ok(())
        }
        Commands::Admin { command } => {
            tracing::info!("Starting admin command");
            commands::admin::run_admin(config, command).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "quizmate=debug"
    } else {
        "quizmate=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
