//! Taste profile endpoints through the full router.

use axum::http::StatusCode;
use serde_json::json;

use taste_trails_integration_tests::TestApp;

#[tokio::test]
async fn test_upsert_replaces_preferences() {
    let app = TestApp::new();
    let user_id = app.register("a@x.com").await;
    let path = format!("/taste-profiles/users/{user_id}");

    let (status, _) = app.get(&path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, first) = app
        .post(
            &path,
            json!({"preferences": {"artist": ["Mariza"], "tv": ["Mad Men"]}}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, second) = app
        .post(&path, json!({"preferences": {"book": ["Blindness"]}}))
        .await;
    assert_eq!(first["data"]["id"], second["data"]["id"]);

    let (_, stored) = app.get(&path).await;
    assert_eq!(
        stored["data"]["preferences"],
        json!({"book": ["Blindness"]})
    );

    let (_, user) = app.get(&format!("/users/{user_id}")).await;
    assert_eq!(user["data"]["has_taste_profile"], json!(true));
}

#[tokio::test]
async fn test_exists_and_delete() {
    let app = TestApp::new();
    let user_id = app.register("a@x.com").await;
    let path = format!("/taste-profiles/users/{user_id}");

    let (status, _) = app.delete(&path).await;
    assert_eq!(status, StatusCode::OK);

    app.post(&path, json!({"preferences": {}})).await;
    let (_, body) = app.get(&format!("{path}/exists")).await;
    assert_eq!(body["data"], json!(true));

    app.delete(&path).await;
    let (_, body) = app.get(&format!("{path}/exists")).await;
    assert_eq!(body["data"], json!(false));
}

#[tokio::test]
async fn test_upsert_for_unknown_user() {
    let app = TestApp::new();

    let (status, _) = app
        .post(
            "/taste-profiles/users/00000000-0000-0000-0000-000000000000",
            json!({"preferences": {"artist": ["Mariza"]}}),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
