//! User endpoints through the full router.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;

use taste_trails_integration_tests::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let (status, _) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_and_fetch() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/users",
            json!({"email": " Ana@Example.com", "name": "Ana", "password": "secret123"}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["email"], json!("ana@example.com"));
    assert_eq!(body["data"]["has_taste_profile"], json!(false));
    assert_eq!(body["data"]["itinerary_count"], json!(0));
    assert!(body["data"].get("password_hash").is_none());

    let id = body["data"]["id"].as_str().unwrap();
    let (status, body) = app.get(&format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Ana"));
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.register("a@x.com").await;

    let (status, body) = app
        .post(
            "/users",
            json!({"email": "A@X.com ", "name": "Other", "password": "secret123"}),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));

    let (_, body) = app.get("/users/count").await;
    assert_eq!(body["data"], json!(1));
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new();

    let (status, _) = app
        .post(
            "/users",
            json!({"email": "a@x.com", "name": "Ana", "password": "123"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/users",
            json!({"email": "not-an-email", "name": "Ana", "password": "secret123"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login() {
    let app = TestApp::new();
    app.register("a@x.com").await;

    let (status, _) = app
        .post("/users/login", json!({"email": "a@x.com", "password": "secret123"}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post("/users/login", json!({"email": "a@x.com", "password": "wrong-one"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/users/login", json!({"email": "b@x.com", "password": "secret123"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_check_email_rename_and_delete() {
    let app = TestApp::new();
    let id = app.register("a@x.com").await;

    let (_, body) = app.get("/users/check-email?email=A%40X.COM").await;
    assert_eq!(body["data"], json!(true));

    let (status, body) = app
        .put(&format!("/users/{id}"), json!({"name": "Renamed"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Renamed"));

    let (status, _) = app.delete(&format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_reports_stats_per_user() {
    let app = TestApp::new();
    let planner = app.register("a@x.com").await;
    app.register("b@x.com").await;

    app.post(
        &format!("/itineraries/users/{planner}"),
        json!({"destination": "Lisbon", "start_date": "2024-06-01", "end_date": "2024-06-05"}),
    )
    .await;
    app.post(
        &format!("/taste-profiles/users/{planner}"),
        json!({"preferences": {"artist": ["Mariza"]}}),
    )
    .await;

    let (status, body) = app.get("/users").await;
    assert_eq!(status, StatusCode::OK);

    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["email"], json!("a@x.com"));
    assert_eq!(users[0]["itinerary_count"], json!(1));
    assert_eq!(users[0]["has_taste_profile"], json!(true));
    assert_eq!(users[1]["itinerary_count"], json!(0));
    assert_eq!(users[1]["has_taste_profile"], json!(false));
}
