//! Game session endpoints
//!
//! Thin typed wrappers over `/v1/game/*`. Session state is owned by the
//! backend; every response here is an authoritative snapshot that callers
//! apply wholesale (see [`crate::sync`] for the reconciliation rules).

use serde::Serialize;

use crate::api::types::{
    AnswerResult, AnswerSubmission, GameMode, Question, Session, SessionSummary,
};
use crate::api::ApiClient;
use crate::error::Result;

/// Body for the session-start endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartSessionRequest {
    mode: GameMode,
}

/// Typed wrapper over the game session endpoints
#[derive(Debug, Clone)]
pub struct GameApi {
    client: ApiClient,
}

impl GameApi {
    /// Create the game endpoint group over a shared client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Start a new session with random questions from a topic.
    pub async fn start_topic_session(&self, topic_id: &str, mode: GameMode) -> Result<Session> {
        tracing::info!("Starting random-topic session for topic {}", topic_id);
        self.client
            .post_json(
                &format!("/v1/game/topic/{}/random", topic_id),
                Some(&StartSessionRequest { mode }),
            )
            .await
    }

    /// Start a new session for a curated quiz.
    pub async fn start_quiz_session(&self, quiz_id: &str, mode: GameMode) -> Result<Session> {
        tracing::info!("Starting quiz session for quiz {}", quiz_id);
        self.client
            .post_json(
                &format!("/v1/game/quiz/{}/start", quiz_id),
                Some(&StartSessionRequest { mode }),
            )
            .await
    }

    /// Join an existing session; returns the session snapshot with the
    /// current player list.
    pub async fn join_session(&self, session_id: &str) -> Result<Session> {
        tracing::info!("Joining session {}", session_id);
        self.client
            .post_json::<(), _>(&format!("/v1/game/session/{}/join", session_id), None)
            .await
    }

    /// Fetch the current session snapshot.
    pub async fn session_status(&self, session_id: &str) -> Result<Session> {
        self.client
            .get_json(&format!("/v1/game/session/{}/status", session_id))
            .await
    }

    /// Toggle the caller's ready flag.
    ///
    /// Fire-and-forget: the response body is discarded, because the UI update
    /// comes from the subsequent `player-ready` push event. This avoids a race
    /// where two players' optimistic updates diverge from the authoritative
    /// merged state.
    pub async fn toggle_ready(&self, session_id: &str) -> Result<()> {
        self.client
            .put_ignore_body(&format!("/v1/game/session/{}/ready", session_id))
            .await
    }

    /// Pause a running countdown (host only).
    pub async fn pause_countdown(&self, session_id: &str) -> Result<()> {
        tracing::info!("Pausing countdown for session {}", session_id);
        self.client
            .post_ignore_body(&format!("/v1/game/session/{}/pause", session_id))
            .await
    }

    /// Fetch one question by index.
    pub async fn question(&self, session_id: &str, index: usize) -> Result<Question> {
        self.client
            .get_json(&format!("/v1/game/session/{}/question/{}", session_id, index))
            .await
    }

    /// Submit an answer; the result reveals correctness and updated
    /// score/hearts.
    pub async fn submit_answer(
        &self,
        session_id: &str,
        submission: &AnswerSubmission,
    ) -> Result<AnswerResult> {
        self.client
            .post_json(
                &format!("/v1/game/session/{}/answer", session_id),
                Some(submission),
            )
            .await
    }

    /// Complete the session and fetch the final summary.
    pub async fn complete_session(&self, session_id: &str) -> Result<SessionSummary> {
        tracing::info!("Completing session {}", session_id);
        self.client
            .post_json::<(), _>(&format!("/v1/game/session/{}/complete", session_id), None)
            .await
    }
}
