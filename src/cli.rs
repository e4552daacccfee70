//! Command-line interface definition for Quizmate
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for authentication, playing quiz sessions, and
//! content administration.

use clap::{Parser, Subcommand};

/// Quizmate - quiz session client
///
/// Sign in, start or join live quiz sessions, and manage quiz content
/// against a Quizmate server.
#[derive(Parser, Debug, Clone)]
#[command(name = "quizmate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the API base URL from config
    #[arg(long, env = "QUIZMATE_API_URL")]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Quizmate
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        /// Email address to sign in with
        #[arg(short, long)]
        email: String,

        /// Password (prompted interactively when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out and clear stored credentials
    Logout,

    /// Show the currently signed-in user
    Whoami,

    /// Start a new quiz session and play it
    Play {
        /// Start a session with random questions from a topic
        #[arg(short, long, conflicts_with = "quiz")]
        topic: Option<String>,

        /// Start a session from a specific quiz
        #[arg(short, long)]
        quiz: Option<String>,

        /// Game mode: solo, competitive, or collaborative
        #[arg(short, long, default_value = "solo")]
        mode: String,
    },

    /// Join an existing session by id
    Join {
        /// Session id to join
        session: String,
    },

    /// Administer quizzes, questions, topics, and users
    Admin {
        /// Admin subcommand
        #[command(subcommand)]
        command: AdminCommand,
    },
}

/// Content administration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommand {
    /// Manage quizzes
    Quiz {
        #[command(subcommand)]
        command: QuizCommand,
    },

    /// Manage questions within a quiz
    Question {
        #[command(subcommand)]
        command: QuestionCommand,
    },

    /// Manage topics
    Topic {
        #[command(subcommand)]
        command: TopicCommand,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// List available roles
    Roles {
        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Quiz management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum QuizCommand {
    /// List quizzes
    List {
        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one quiz
    Show {
        /// Quiz id
        id: String,
    },

    /// Create a quiz
    Create {
        /// Quiz title
        #[arg(short, long)]
        title: String,

        /// Quiz description
        #[arg(short, long)]
        description: Option<String>,

        /// Topic id the quiz belongs to
        #[arg(long)]
        topic: Option<String>,
    },

    /// Update a quiz
    Update {
        /// Quiz id
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a quiz
    Delete {
        /// Quiz id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Publish a draft quiz
    Publish {
        /// Quiz id
        id: String,
    },

    /// Archive a published quiz
    Archive {
        /// Quiz id
        id: String,
    },

    /// Reactivate an archived quiz back to published
    Reactivate {
        /// Quiz id
        id: String,
    },
}

/// Question management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum QuestionCommand {
    /// List a quiz's questions
    List {
        /// Quiz id
        #[arg(short, long)]
        quiz: String,

        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Create a question in a quiz
    Create {
        /// Quiz id
        #[arg(short, long)]
        quiz: String,

        /// Question text
        #[arg(short, long)]
        text: String,

        /// Answer options (repeat the flag; first one is correct)
        #[arg(short, long, required = true, num_args = 1..)]
        option: Vec<String>,
    },

    /// Update a question
    Update {
        /// Question id
        id: String,

        /// New question text
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Delete a question
    Delete {
        /// Question id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Topic management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TopicCommand {
    /// List topics
    List {
        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Create a topic
    Create {
        /// Topic name
        #[arg(short, long)]
        name: String,

        /// Topic description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Update a topic
    Update {
        /// Topic id
        id: String,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a topic
    Delete {
        /// Topic id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// User management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum UserCommand {
    /// List users
    List {
        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Create a user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Password for the new account
        #[arg(short, long)]
        password: String,

        /// Role to assign
        #[arg(short, long, default_value = "player")]
        role: String,
    },

    /// Update a user
    Update {
        /// User id
        id: String,

        /// New display name
        #[arg(short, long)]
        name: Option<String>,

        /// New role
        #[arg(short, long)]
        role: Option<String>,
    },

    /// Delete a user
    Delete {
        /// User id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
