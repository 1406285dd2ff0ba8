//! Itinerary route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use taste_trails_core::{ItineraryId, UserId};

use super::activities::ActivityResponse;
use super::required;
use crate::error::{AppError, Result};
use crate::models::{Itinerary, ItineraryWithActivities};
use crate::response::{ApiResponse, Created};
use crate::services::ItineraryScheduler;
use crate::state::AppState;

/// Build the itineraries router. Paths are relative to `/itineraries`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{user_id}",
            get(list_for_user).post(create_itinerary),
        )
        .route("/users/{user_id}/upcoming", get(upcoming))
        .route("/users/{user_id}/past", get(past))
        .route("/users/{user_id}/current", get(current))
        .route("/users/{user_id}/count", get(count_for_user))
        .route("/users/{user_id}/destinations", get(destinations))
        .route(
            "/{itinerary_id}",
            get(get_itinerary).delete(delete_itinerary),
        )
}

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateItineraryRequest {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Reference date for the date-window queries. Defaults to today (UTC).
#[derive(Debug, Deserialize)]
pub struct AsOfQuery {
    pub as_of: Option<NaiveDate>,
}

impl AsOfQuery {
    fn date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// An itinerary as returned by the API.
///
/// `activities` is only present when a single itinerary is fetched.
#[derive(Debug, Serialize)]
pub struct ItineraryResponse {
    pub id: ItineraryId,
    pub user_id: UserId,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub day_count: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<ActivityResponse>>,
}

impl From<Itinerary> for ItineraryResponse {
    fn from(itinerary: Itinerary) -> Self {
        Self {
            id: itinerary.id,
            user_id: itinerary.user_id,
            start_date: itinerary.start_date(),
            end_date: itinerary.end_date(),
            day_count: itinerary.day_count(),
            destination: itinerary.destination,
            created_at: itinerary.created_at,
            activities: None,
        }
    }
}

impl From<ItineraryWithActivities> for ItineraryResponse {
    fn from(full: ItineraryWithActivities) -> Self {
        let mut response = Self::from(full.itinerary);
        response.activities = Some(
            full.activities
                .into_iter()
                .map(ActivityResponse::from)
                .collect(),
        );
        response
    }
}

fn to_responses(itineraries: Vec<Itinerary>) -> Vec<ItineraryResponse> {
    itineraries.into_iter().map(ItineraryResponse::from).collect()
}

// =============================================================================
// Handlers
// =============================================================================

async fn create_itinerary(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(body): Json<CreateItineraryRequest>,
) -> Result<Created<ItineraryResponse>> {
    let destination = required("destination", &body.destination)?;

    let itinerary = ItineraryScheduler::new(state.store())
        .create_itinerary(user_id, &destination, body.start_date, body.end_date)
        .await?;

    Ok(Created(ApiResponse::ok(
        "Itinerary created successfully",
        itinerary.into(),
    )))
}

async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<ApiResponse<Vec<ItineraryResponse>>> {
    let itineraries = ItineraryScheduler::new(state.store())
        .find_by_user_id(user_id)
        .await?;

    Ok(ApiResponse::ok(
        "Itineraries retrieved successfully",
        to_responses(itineraries),
    ))
}

async fn upcoming(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<AsOfQuery>,
) -> Result<ApiResponse<Vec<ItineraryResponse>>> {
    let itineraries = ItineraryScheduler::new(state.store())
        .find_upcoming(user_id, query.date())
        .await?;

    Ok(ApiResponse::ok(
        "Upcoming itineraries retrieved successfully",
        to_responses(itineraries),
    ))
}

async fn past(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<AsOfQuery>,
) -> Result<ApiResponse<Vec<ItineraryResponse>>> {
    let itineraries = ItineraryScheduler::new(state.store())
        .find_past(user_id, query.date())
        .await?;

    Ok(ApiResponse::ok(
        "Past itineraries retrieved successfully",
        to_responses(itineraries),
    ))
}

async fn current(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<AsOfQuery>,
) -> Result<ApiResponse<Vec<ItineraryResponse>>> {
    let itineraries = ItineraryScheduler::new(state.store())
        .find_current(user_id, query.date())
        .await?;

    Ok(ApiResponse::ok(
        "Current itineraries retrieved successfully",
        to_responses(itineraries),
    ))
}

async fn count_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<ApiResponse<i64>> {
    let count = ItineraryScheduler::new(state.store())
        .count_for_user(user_id)
        .await?;

    Ok(ApiResponse::ok("Itinerary count retrieved successfully", count))
}

async fn destinations(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<ApiResponse<Vec<String>>> {
    let destinations = ItineraryScheduler::new(state.store())
        .destinations(user_id)
        .await?;

    Ok(ApiResponse::ok(
        "Destinations retrieved successfully",
        destinations,
    ))
}

async fn get_itinerary(
    State(state): State<AppState>,
    Path(itinerary_id): Path<ItineraryId>,
) -> Result<ApiResponse<ItineraryResponse>> {
    let itinerary = ItineraryScheduler::new(state.store())
        .find_itinerary(itinerary_id)
        .await?
        .ok_or_else(|| AppError::NotFound("itinerary".to_owned()))?;

    Ok(ApiResponse::ok(
        "Itinerary retrieved successfully",
        itinerary.into(),
    ))
}

async fn delete_itinerary(
    State(state): State<AppState>,
    Path(itinerary_id): Path<ItineraryId>,
) -> Result<ApiResponse<()>> {
    ItineraryScheduler::new(state.store())
        .delete_itinerary(itinerary_id)
        .await?;

    Ok(ApiResponse::done("Itinerary deleted successfully"))
}
