//! Admin quiz lifecycle against a mocked backend
//!
//! Covers the publish/archive transitions and the listed-row patching that
//! avoids a second list request after a transition.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quizmate::api::types::QuizStatus;
use quizmate::api::{AdminApi, ApiClient, QuizListCache};
use quizmate::auth::CredentialStore;
use quizmate::config::ApiConfig;

fn admin_for(server: &MockServer) -> AdminApi {
    let credentials = Arc::new(CredentialStore::in_memory());
    credentials.set_token("admin-token");
    let config = ApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    };
    AdminApi::new(ApiClient::new(&config, credentials).expect("create client"))
}

fn quiz_json(id: &str, title: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "status": status,
        "topicId": "t-1",
        "questionCount": 4
    })
}

#[tokio::test]
async fn test_publish_patches_listed_rows_without_refetch() {
    let server = MockServer::start().await;

    // The list endpoint must be hit exactly once.
    Mock::given(method("GET"))
        .and(path("/v1/admin/quizzes"))
        .and(header("authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            quiz_json("q-1", "Capitals", "draft"),
            quiz_json("q-2", "Rivers", "published"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/admin/quizzes/q-1/publish"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(quiz_json("q-1", "Capitals", "published")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let admin = admin_for(&server);
    let mut cache = QuizListCache::new(admin.list_quizzes().await.expect("list"));
    assert_eq!(cache.rows().len(), 2);
    assert_eq!(cache.rows()[0].status, QuizStatus::Draft);

    let updated = admin.publish_quiz("q-1").await.expect("publish");
    assert!(cache.apply_update(updated));

    // The patched row replaces the stale one; order and siblings are intact.
    assert_eq!(cache.rows()[0].id, "q-1");
    assert_eq!(cache.rows()[0].status, QuizStatus::Published);
    assert_eq!(cache.rows()[1].id, "q-2");
}

#[tokio::test]
async fn test_archive_and_reactivate_roundtrip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/admin/quizzes/q-2/archive"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(quiz_json("q-2", "Rivers", "archived")),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/admin/quizzes/q-2/reactivate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(quiz_json("q-2", "Rivers", "published")),
        )
        .mount(&server)
        .await;

    let admin = admin_for(&server);
    let archived = admin.archive_quiz("q-2").await.expect("archive");
    assert_eq!(archived.status, QuizStatus::Archived);
    let reactivated = admin.reactivate_quiz("q-2").await.expect("reactivate");
    assert_eq!(reactivated.status, QuizStatus::Published);
}

#[tokio::test]
async fn test_delete_quiz_sends_delete_request() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/admin/quizzes/q-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let admin = admin_for(&server);
    admin.delete_quiz("q-1").await.expect("delete");
}

#[tokio::test]
async fn test_api_error_body_message_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/admin/quizzes/q-9/publish"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({ "message": "quiz has no questions" })),
        )
        .mount(&server)
        .await;

    let admin = admin_for(&server);
    let err = admin.publish_quiz("q-9").await.expect_err("conflict");
    assert!(
        err.to_string().contains("quiz has no questions"),
        "got: {}",
        err
    );
}
