//! User route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taste_trails_core::UserId;

use super::required;
use crate::error::{AppError, Result};
use crate::models::{User, UserStats};
use crate::response::{ApiResponse, Created};
use crate::services::UserRegistry;
use crate::state::AppState;
use crate::store::Store;

const MIN_NAME_LENGTH: usize = 2;
const MAX_NAME_LENGTH: usize = 100;
const MIN_PASSWORD_LENGTH: usize = 6;

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(register))
        .route("/login", post(login))
        .route("/count", get(count_users))
        .route("/check-email", get(check_email))
        .route(
            "/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<()> {
        required("email", &self.email)?;
        validate_name(&self.name)?;
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::BadRequest(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckEmailQuery {
    pub email: String,
}

/// A user as returned by the API. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub has_taste_profile: bool,
    pub itinerary_count: i64,
}

fn validate_name(name: &str) -> Result<()> {
    let length = name.trim().chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&length) {
        return Err(AppError::BadRequest(format!(
            "name must be between {MIN_NAME_LENGTH} and {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

impl UserResponse {
    fn new(user: User, stats: UserStats) -> Self {
        Self {
            id: user.id,
            email: user.email.into_inner(),
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
            has_taste_profile: stats.has_taste_profile,
            itinerary_count: stats.itinerary_count,
        }
    }
}

/// Attach stats to a batch of users with one store call.
async fn user_responses(store: &dyn Store, users: Vec<User>) -> Result<Vec<UserResponse>> {
    let ids: Vec<UserId> = users.iter().map(|user| user.id).collect();
    let mut stats = UserRegistry::new(store).stats(&ids).await?;

    Ok(users
        .into_iter()
        .map(|user| {
            let user_stats = stats.remove(&user.id).unwrap_or_default();
            UserResponse::new(user, user_stats)
        })
        .collect())
}

async fn user_response(store: &dyn Store, user: User) -> Result<UserResponse> {
    let stats = UserRegistry::new(store)
        .stats(&[user.id])
        .await?
        .remove(&user.id)
        .unwrap_or_default();

    Ok(UserResponse::new(user, stats))
}

// =============================================================================
// Handlers
// =============================================================================

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Created<UserResponse>> {
    body.validate()?;

    let user = UserRegistry::new(state.store())
        .register(&body.email, &body.name, &body.password)
        .await?;

    Ok(Created(ApiResponse::ok(
        "User registered successfully",
        user_response(state.store(), user).await?,
    )))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiResponse<UserResponse>> {
    let user = UserRegistry::new(state.store())
        .authenticate(&body.email, &body.password)
        .await?;

    Ok(ApiResponse::ok(
        "Login successful",
        user_response(state.store(), user).await?,
    ))
}

async fn list_users(State(state): State<AppState>) -> Result<ApiResponse<Vec<UserResponse>>> {
    let users = UserRegistry::new(state.store()).list_all().await?;

    Ok(ApiResponse::ok(
        "Users retrieved successfully",
        user_responses(state.store(), users).await?,
    ))
}

async fn count_users(State(state): State<AppState>) -> Result<ApiResponse<i64>> {
    let count = UserRegistry::new(state.store()).count().await?;
    Ok(ApiResponse::ok("User count retrieved successfully", count))
}

async fn check_email(
    State(state): State<AppState>,
    Query(query): Query<CheckEmailQuery>,
) -> Result<ApiResponse<bool>> {
    let exists = UserRegistry::new(state.store())
        .email_exists(&query.email)
        .await?;
    Ok(ApiResponse::ok("Email check completed", exists))
}

async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<ApiResponse<UserResponse>> {
    let user = UserRegistry::new(state.store())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user".to_owned()))?;

    Ok(ApiResponse::ok(
        "User retrieved successfully",
        user_response(state.store(), user).await?,
    ))
}

async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<ApiResponse<UserResponse>> {
    validate_name(&body.name)?;

    let user = UserRegistry::new(state.store())
        .rename(user_id, &body.name)
        .await?;

    Ok(ApiResponse::ok(
        "User updated successfully",
        user_response(state.store(), user).await?,
    ))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<ApiResponse<()>> {
    UserRegistry::new(state.store()).delete(user_id).await?;
    Ok(ApiResponse::done("User deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: "a@x.com".to_owned(),
            name: name.to_owned(),
            password: password.to_owned(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(request("Ana", "secret").validate().is_ok());
        assert!(request("A", "secret123").validate().is_err());
        assert!(request(&"a".repeat(101), "secret123").validate().is_err());
        assert!(request("Ana", "12345").validate().is_err());

        let mut blank_email = request("Ana", "secret123");
        blank_email.email = "  ".to_owned();
        assert!(blank_email.validate().is_err());
    }
}
