//! Data transfer objects for the quiz backend API
//!
//! The backend speaks camelCase JSON; these types convert to the crate's
//! snake_case naming via serde rename attributes. Session and player state is
//! owned by the backend; the client holds read-mostly cached copies that are
//! overwritten wholesale by fresh snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QuizmateError;

/// A signed-in user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Login email address
    pub email: String,
    /// Name shown to other players
    pub display_name: String,
    /// Role names granted to this user (e.g. `admin`)
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    /// Returns `true` when the user carries the `admin` role.
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == "admin")
    }
}

/// Response of `POST /v1/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for subsequent authenticated calls
    pub access_token: String,
    /// Token type, typically `"bearer"`
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// The signed-in user
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Game mode of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Single player
    Solo,
    /// Players compete for the highest score
    Competitive,
    /// Players share a single pool of hearts
    Collaborative,
}

impl GameMode {
    /// Parse a mode name as typed on the command line.
    ///
    /// # Errors
    ///
    /// Returns a validation error for anything other than `solo`,
    /// `competitive`, or `collaborative`.
    pub fn parse_str(s: &str) -> Result<Self, QuizmateError> {
        match s.to_ascii_lowercase().as_str() {
            "solo" => Ok(Self::Solo),
            "competitive" => Ok(Self::Competitive),
            "collaborative" => Ok(Self::Collaborative),
            other => Err(QuizmateError::Validation(format!(
                "unknown game mode '{}' (expected solo, competitive, or collaborative)",
                other
            ))),
        }
    }
}

/// Lifecycle status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Lobby: waiting for players to ready up
    Waiting,
    /// Countdown to start is running
    Countdown,
    /// Gameplay in progress
    Active,
    /// Session finished
    Complete,
}

/// A player inside a session
///
/// Mutated only by server-pushed events or REST responses; the client never
/// mutates player state unilaterally except optimistically for its own ready
/// toggle (see [`crate::sync`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Unique player identifier
    pub id: String,
    /// Name shown in the lobby and scoreboard
    pub display_name: String,
    /// Current score
    #[serde(default)]
    pub score: i64,
    /// Remaining hearts (lives)
    #[serde(default)]
    pub hearts: u32,
    /// Whether this player created the session
    #[serde(default)]
    pub is_host: bool,
    /// Whether this player has signalled readiness
    #[serde(default)]
    pub ready: bool,
}

/// A play-through instance of a quiz or topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier
    pub id: String,
    /// Game mode
    pub mode: GameMode,
    /// Players currently in the session
    #[serde(default)]
    pub players: Vec<Player>,
    /// Zero-based index of the current question
    #[serde(default)]
    pub current_question: usize,
    /// Total number of questions in this session
    pub question_count: usize,
    /// Lifecycle status
    pub status: SessionStatus,
}

/// One selectable answer option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    /// Option identifier, referenced when submitting an answer
    pub id: String,
    /// Option text shown to the player
    pub text: String,
}

/// A question as delivered to players
///
/// Deliberately carries no correct-answer marker; correctness is learned only
/// from the [`AnswerResult`] returned after submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Question identifier
    pub id: String,
    /// Prompt text
    pub prompt: String,
    /// Ordered answer options
    pub options: Vec<AnswerOption>,
    /// Timestamp at which the question was revealed to the session
    #[serde(default)]
    pub revealed_at: Option<DateTime<Utc>>,
}

/// Request body of `POST /v1/game/session/{id}/answer`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    /// The question being answered
    pub question_id: String,
    /// The chosen option
    pub option_id: String,
}

/// Result of a submitted answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    /// Whether the chosen option was correct
    pub correct: bool,
    /// Points awarded for this answer
    #[serde(default)]
    pub points: i64,
    /// Caller's updated total score
    #[serde(default)]
    pub score: i64,
    /// Caller's updated remaining hearts
    #[serde(default)]
    pub hearts: u32,
    /// The correct option, revealed only now
    #[serde(default)]
    pub correct_option_id: Option<String>,
}

/// Final summary returned by `POST /v1/game/session/{id}/complete`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// The completed session
    pub session_id: String,
    /// Final player standings
    #[serde(default)]
    pub players: Vec<Player>,
    /// Winning player, if any
    #[serde(default)]
    pub winner_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Admin resources
// ---------------------------------------------------------------------------

/// Publication status of a quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    /// Editable, not playable
    Draft,
    /// Playable by players
    Published,
    /// Hidden from players, kept for history
    Archived,
}

impl std::fmt::Display for QuizStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizStatus::Draft => write!(f, "draft"),
            QuizStatus::Published => write!(f, "published"),
            QuizStatus::Archived => write!(f, "archived"),
        }
    }
}

/// A curated quiz as seen by admins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    /// Quiz identifier
    pub id: String,
    /// Quiz title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Publication status
    pub status: QuizStatus,
    /// Topic this quiz belongs to
    #[serde(default)]
    pub topic_id: Option<String>,
    /// Number of questions in the quiz
    #[serde(default)]
    pub question_count: usize,
}

/// Create/update payload for a quiz
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDraft {
    /// Quiz title
    pub title: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Topic the quiz belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
}

/// A topic grouping quizzes and questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Topic identifier
    pub id: String,
    /// Topic name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

/// Create/update payload for a topic
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicDraft {
    /// Topic name
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A question as seen by admins (includes the correct option)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminQuestion {
    /// Question identifier
    pub id: String,
    /// Prompt text
    pub prompt: String,
    /// Ordered answer options
    pub options: Vec<AnswerOption>,
    /// The correct option (admin view only)
    pub correct_option_id: String,
    /// Owning quiz, if assigned
    #[serde(default)]
    pub quiz_id: Option<String>,
}

/// Create/update payload for a question
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    /// Prompt text
    pub prompt: String,
    /// Ordered answer options
    pub options: Vec<AnswerOption>,
    /// The correct option
    pub correct_option_id: String,
    /// Owning quiz
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_id: Option<String>,
}

/// Create/update payload for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    /// Login email address
    pub email: String,
    /// Name shown to other players
    pub display_name: String,
    /// Initial password (create only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Role names to grant
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A role known to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Role identifier
    pub id: String,
    /// Role name (e.g. `admin`, `player`)
    pub name: String,
}
