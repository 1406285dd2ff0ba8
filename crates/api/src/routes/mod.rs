//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                        - Liveness
//! GET    /health/ready                                  - Store reachability
//!
//! # Users
//! POST   /users                                         - Register
//! GET    /users                                         - List
//! POST   /users/login                                   - Authenticate
//! GET    /users/count                                   - Count
//! GET    /users/check-email?email=                      - Email taken?
//! GET    /users/{user_id}                               - Find
//! PUT    /users/{user_id}                               - Rename
//! DELETE /users/{user_id}                               - Delete (cascades)
//!
//! # Itineraries
//! POST   /itineraries/users/{user_id}                   - Create
//! GET    /itineraries/users/{user_id}                   - List, newest first
//! GET    /itineraries/users/{user_id}/upcoming?as_of=   - Starting on/after date
//! GET    /itineraries/users/{user_id}/past?as_of=       - Ended before date
//! GET    /itineraries/users/{user_id}/current?as_of=    - In progress on date
//! GET    /itineraries/users/{user_id}/count             - Count
//! GET    /itineraries/users/{user_id}/destinations      - Distinct destinations
//! GET    /itineraries/{itinerary_id}                    - Find with activities
//! DELETE /itineraries/{itinerary_id}                    - Delete (cascades)
//!
//! # Activities
//! POST   /itineraries/{itinerary_id}/activities         - Create
//! GET    /itineraries/{itinerary_id}/activities         - List by date
//! GET    /itineraries/{itinerary_id}/activities/{id}    - Find
//! PUT    /itineraries/{itinerary_id}/activities/{id}    - Update
//!
//! # Taste profiles
//! POST   /taste-profiles/users/{user_id}                - Upsert
//! GET    /taste-profiles/users/{user_id}                - Find
//! DELETE /taste-profiles/users/{user_id}                - Delete
//! GET    /taste-profiles/users/{user_id}/exists         - Exists?
//! ```

pub mod activities;
pub mod itineraries;
pub mod taste_profiles;
pub mod users;

use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::{Request, Response, StatusCode},
    middleware,
    routing::get,
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// All API routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/users", users::router())
        .nest("/itineraries", itineraries::router().merge(activities::router()))
        .nest("/taste-profiles", taste_profiles::router())
}

/// The full application: routes, request IDs and request tracing.
///
/// Sentry and CORS layers are added by the binary.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Trim a required text field, rejecting blank values.
pub(crate) fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert!(matches!(required("title", "  Tram  "), Ok(ref s) if s == "Tram"));
        assert!(matches!(
            required("title", "   "),
            Err(AppError::BadRequest(ref m)) if m == "title is required"
        ));
    }
}
