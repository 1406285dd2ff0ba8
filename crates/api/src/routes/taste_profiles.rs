//! Taste profile route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taste_trails_core::{TasteProfileId, UserId};

use crate::error::{AppError, Result};
use crate::models::{Preferences, TasteProfile};
use crate::response::ApiResponse;
use crate::services::TasteProfileManager;
use crate::state::AppState;

/// Build the taste profiles router. Paths are relative to `/taste-profiles`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{user_id}",
            get(get_profile).post(upsert_profile).delete(delete_profile),
        )
        .route("/users/{user_id}/exists", get(profile_exists))
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Replacement preference map. Categories left out are dropped.
#[derive(Debug, Deserialize)]
pub struct TasteProfileRequest {
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Debug, Serialize)]
pub struct TasteProfileResponse {
    pub id: TasteProfileId,
    pub user_id: UserId,
    pub preferences: Preferences,
    pub updated_at: DateTime<Utc>,
}

impl From<TasteProfile> for TasteProfileResponse {
    fn from(profile: TasteProfile) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            preferences: profile.preferences,
            updated_at: profile.updated_at,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn upsert_profile(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(body): Json<TasteProfileRequest>,
) -> Result<ApiResponse<TasteProfileResponse>> {
    let profile = TasteProfileManager::new(state.store())
        .upsert(user_id, body.preferences)
        .await?;

    Ok(ApiResponse::ok(
        "Taste profile saved successfully",
        profile.into(),
    ))
}

async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<ApiResponse<TasteProfileResponse>> {
    let profile = TasteProfileManager::new(state.store())
        .find_by_user_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("taste profile".to_owned()))?;

    Ok(ApiResponse::ok(
        "Taste profile retrieved successfully",
        profile.into(),
    ))
}

async fn profile_exists(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<ApiResponse<bool>> {
    let exists = TasteProfileManager::new(state.store())
        .exists(user_id)
        .await?;

    Ok(ApiResponse::ok("Taste profile check completed", exists))
}

async fn delete_profile(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<ApiResponse<()>> {
    TasteProfileManager::new(state.store())
        .delete(user_id)
        .await?;

    Ok(ApiResponse::done("Taste profile deleted successfully"))
}
