//! Admin CRUD endpoints
//!
//! Typed wrappers over `/v1/admin/{users,quizzes,questions,topics,roles}`
//! with the standard list/get/create/update/delete verbs plus the quiz
//! status-transition endpoints (`publish`, `archive`, `reactivate`).

use crate::api::types::{
    AdminQuestion, QuestionDraft, Quiz, QuizDraft, Role, Topic, TopicDraft, User, UserDraft,
};
use crate::api::ApiClient;
use crate::error::Result;

/// Typed wrapper over the admin endpoints
#[derive(Debug, Clone)]
pub struct AdminApi {
    client: ApiClient,
}

impl AdminApi {
    /// Create the admin endpoint group over a shared client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // -- quizzes ------------------------------------------------------------

    /// List all quizzes.
    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>> {
        self.client.get_json("/v1/admin/quizzes").await
    }

    /// Fetch one quiz.
    pub async fn get_quiz(&self, id: &str) -> Result<Quiz> {
        self.client.get_json(&format!("/v1/admin/quizzes/{}", id)).await
    }

    /// Create a quiz (starts in `draft` status).
    pub async fn create_quiz(&self, draft: &QuizDraft) -> Result<Quiz> {
        tracing::info!("Creating quiz '{}'", draft.title);
        self.client.post_json("/v1/admin/quizzes", Some(draft)).await
    }

    /// Update a quiz.
    pub async fn update_quiz(&self, id: &str, draft: &QuizDraft) -> Result<Quiz> {
        self.client
            .put_json(&format!("/v1/admin/quizzes/{}", id), Some(draft))
            .await
    }

    /// Delete a quiz.
    pub async fn delete_quiz(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting quiz {}", id);
        self.client.delete(&format!("/v1/admin/quizzes/{}", id)).await
    }

    /// Publish a draft quiz; returns the quiz with its new status.
    pub async fn publish_quiz(&self, id: &str) -> Result<Quiz> {
        tracing::info!("Publishing quiz {}", id);
        self.client
            .post_json::<(), _>(&format!("/v1/admin/quizzes/{}/publish", id), None)
            .await
    }

    /// Archive a published quiz.
    pub async fn archive_quiz(&self, id: &str) -> Result<Quiz> {
        tracing::info!("Archiving quiz {}", id);
        self.client
            .post_json::<(), _>(&format!("/v1/admin/quizzes/{}/archive", id), None)
            .await
    }

    /// Reactivate an archived quiz back to `published`.
    pub async fn reactivate_quiz(&self, id: &str) -> Result<Quiz> {
        tracing::info!("Reactivating quiz {}", id);
        self.client
            .post_json::<(), _>(&format!("/v1/admin/quizzes/{}/reactivate", id), None)
            .await
    }

    // -- questions ----------------------------------------------------------

    /// List all questions.
    pub async fn list_questions(&self) -> Result<Vec<AdminQuestion>> {
        self.client.get_json("/v1/admin/questions").await
    }

    /// Fetch one question.
    pub async fn get_question(&self, id: &str) -> Result<AdminQuestion> {
        self.client.get_json(&format!("/v1/admin/questions/{}", id)).await
    }

    /// Create a question.
    pub async fn create_question(&self, draft: &QuestionDraft) -> Result<AdminQuestion> {
        self.client.post_json("/v1/admin/questions", Some(draft)).await
    }

    /// Update a question.
    pub async fn update_question(&self, id: &str, draft: &QuestionDraft) -> Result<AdminQuestion> {
        self.client
            .put_json(&format!("/v1/admin/questions/{}", id), Some(draft))
            .await
    }

    /// Delete a question.
    pub async fn delete_question(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("/v1/admin/questions/{}", id)).await
    }

    // -- topics -------------------------------------------------------------

    /// List all topics.
    pub async fn list_topics(&self) -> Result<Vec<Topic>> {
        self.client.get_json("/v1/admin/topics").await
    }

    /// Fetch one topic.
    pub async fn get_topic(&self, id: &str) -> Result<Topic> {
        self.client.get_json(&format!("/v1/admin/topics/{}", id)).await
    }

    /// Create a topic.
    pub async fn create_topic(&self, draft: &TopicDraft) -> Result<Topic> {
        self.client.post_json("/v1/admin/topics", Some(draft)).await
    }

    /// Update a topic.
    pub async fn update_topic(&self, id: &str, draft: &TopicDraft) -> Result<Topic> {
        self.client
            .put_json(&format!("/v1/admin/topics/{}", id), Some(draft))
            .await
    }

    /// Delete a topic.
    pub async fn delete_topic(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("/v1/admin/topics/{}", id)).await
    }

    // -- users --------------------------------------------------------------

    /// List all users.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.client.get_json("/v1/admin/users").await
    }

    /// Fetch one user.
    pub async fn get_user(&self, id: &str) -> Result<User> {
        self.client.get_json(&format!("/v1/admin/users/{}", id)).await
    }

    /// Create a user.
    pub async fn create_user(&self, draft: &UserDraft) -> Result<User> {
        tracing::info!("Creating user {}", draft.email);
        self.client.post_json("/v1/admin/users", Some(draft)).await
    }

    /// Update a user.
    pub async fn update_user(&self, id: &str, draft: &UserDraft) -> Result<User> {
        self.client
            .put_json(&format!("/v1/admin/users/{}", id), Some(draft))
            .await
    }

    /// Delete a user.
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting user {}", id);
        self.client.delete(&format!("/v1/admin/users/{}", id)).await
    }

    // -- roles --------------------------------------------------------------

    /// List all roles.
    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        self.client.get_json("/v1/admin/roles").await
    }
}

/// Client-side cache of a fetched quiz list
///
/// After a status transition (publish/archive/reactivate) the backend returns
/// the updated quiz; applying it here replaces the matching row in place so
/// the list view reflects the new status without refetching the full list.
#[derive(Debug, Default, Clone)]
pub struct QuizListCache {
    rows: Vec<Quiz>,
}

impl QuizListCache {
    /// Build a cache from a freshly fetched list.
    pub fn new(rows: Vec<Quiz>) -> Self {
        Self { rows }
    }

    /// The cached rows, in list order.
    pub fn rows(&self) -> &[Quiz] {
        &self.rows
    }

    /// Replace the row with the same id; returns `false` when the quiz is not
    /// in the cached list (e.g. created after the fetch).
    pub fn apply_update(&mut self, quiz: Quiz) -> bool {
        match self.rows.iter_mut().find(|row| row.id == quiz.id) {
            Some(row) => {
                *row = quiz;
                true
            }
            None => false,
        }
    }

    /// Drop the row with the given id; used after a delete.
    pub fn remove(&mut self, id: &str) {
        self.rows.retain(|row| row.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::QuizStatus;

    fn quiz(id: &str, status: QuizStatus) -> Quiz {
        Quiz {
            id: id.to_string(),
            title: format!("Quiz {}", id),
            description: None,
            status,
            topic_id: None,
            question_count: 5,
        }
    }

    #[test]
    fn test_cache_apply_update_replaces_row_in_place() {
        let mut cache =
            QuizListCache::new(vec![quiz("1", QuizStatus::Draft), quiz("2", QuizStatus::Published)]);

        let replaced = cache.apply_update(quiz("1", QuizStatus::Published));
        assert!(replaced);
        assert_eq!(cache.rows()[0].status, QuizStatus::Published);
        // Other rows and ordering untouched.
        assert_eq!(cache.rows()[1].id, "2");
        assert_eq!(cache.rows().len(), 2);
    }

    #[test]
    fn test_cache_apply_update_unknown_id() {
        let mut cache = QuizListCache::new(vec![quiz("1", QuizStatus::Draft)]);
        assert!(!cache.apply_update(quiz("9", QuizStatus::Published)));
        assert_eq!(cache.rows().len(), 1);
    }

    #[test]
    fn test_cache_remove() {
        let mut cache =
            QuizListCache::new(vec![quiz("1", QuizStatus::Draft), quiz("2", QuizStatus::Draft)]);
        cache.remove("1");
        assert_eq!(cache.rows().len(), 1);
        assert_eq!(cache.rows()[0].id, "2");
    }
}
