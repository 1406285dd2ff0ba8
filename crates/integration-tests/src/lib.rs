//! Integration tests for Taste Trails.
//!
//! Tests drive the services and the full axum router against an in-memory
//! store, so they need no database:
//!
//! ```bash
//! cargo test -p taste-trails-integration-tests
//! ```
//!
//! [`TestApp`] wraps the router and sends JSON requests through it with
//! `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use taste_trails_api::routes;
use taste_trails_api::state::AppState;
use taste_trails_api::store::MemoryStore;

/// The API wired to a fresh [`MemoryStore`].
pub struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let router = routes::app(AppState::new(store.clone()));
        Self { router, store }
    }

    /// The store behind the router, for direct service calls.
    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Send a request and return the status with the parsed JSON body
    /// (`Value::Null` for an empty or non-JSON body).
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    #[allow(clippy::unwrap_used)]
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    /// Register a user and return its id.
    ///
    /// # Panics
    ///
    /// Panics if registration does not return `201 Created`.
    pub async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/users",
                serde_json::json!({
                    "email": email,
                    "name": "Traveler",
                    "password": "secret123",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["data"]["id"].as_str().unwrap_or_default().to_owned()
    }
}
