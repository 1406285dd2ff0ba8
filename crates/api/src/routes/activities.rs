//! Activity route handlers, nested under an itinerary.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use taste_trails_core::{ActivityId, ItineraryId, Theme};

use super::required;
use crate::error::{AppError, Result};
use crate::models::{Activity, ActivityDraft};
use crate::response::{ApiResponse, Created};
use crate::services::{ActivityScheduler, ItineraryScheduler};
use crate::state::AppState;

const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Build the activities router. Paths are relative to `/itineraries`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{itinerary_id}/activities",
            get(list_activities).post(create_activity),
        )
        .route(
            "/{itinerary_id}/activities/{activity_id}",
            get(get_activity).put(update_activity),
        )
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Body for both creating and updating an activity.
#[derive(Debug, Deserialize)]
pub struct ActivityRequest {
    pub title: String,
    pub description: String,
    pub coordinates: String,
    pub address: String,
    pub reasoning: String,
    pub theme: Theme,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub activity_date: NaiveDate,
}

impl TryFrom<ActivityRequest> for ActivityDraft {
    type Error = AppError;

    fn try_from(body: ActivityRequest) -> Result<Self> {
        let description = required("description", &body.description)?;
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(AppError::BadRequest(format!(
                "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
            )));
        }

        Ok(Self {
            title: required("title", &body.title)?,
            description,
            coordinates: required("coordinates", &body.coordinates)?,
            address: required("address", &body.address)?,
            reasoning: required("reasoning", &body.reasoning)?,
            theme: body.theme,
            start_time: body.start_time,
            end_time: body.end_time,
            activity_date: body.activity_date,
        })
    }
}

/// An activity as returned by the API. Times are rendered as `HH:MM`.
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub id: ActivityId,
    pub itinerary_id: ItineraryId,
    pub title: String,
    pub description: String,
    pub coordinates: String,
    pub address: String,
    pub reasoning: String,
    pub theme: Theme,
    pub start_time: String,
    pub end_time: String,
    pub activity_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id,
            itinerary_id: activity.itinerary_id,
            title: activity.title,
            description: activity.description,
            coordinates: activity.coordinates,
            address: activity.address,
            reasoning: activity.reasoning,
            theme: activity.theme,
            start_time: activity.start_time.format("%H:%M").to_string(),
            end_time: activity.end_time.format("%H:%M").to_string(),
            activity_date: activity.activity_date,
            created_at: activity.created_at,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn create_activity(
    State(state): State<AppState>,
    Path(itinerary_id): Path<ItineraryId>,
    Json(body): Json<ActivityRequest>,
) -> Result<Created<ActivityResponse>> {
    let draft = ActivityDraft::try_from(body)?;

    let activity = ActivityScheduler::new(state.store())
        .create_activity(itinerary_id, draft)
        .await?;

    Ok(Created(ApiResponse::ok(
        "Activity created successfully",
        activity.into(),
    )))
}

async fn list_activities(
    State(state): State<AppState>,
    Path(itinerary_id): Path<ItineraryId>,
) -> Result<ApiResponse<Vec<ActivityResponse>>> {
    if !ItineraryScheduler::new(state.store())
        .exists(itinerary_id)
        .await?
    {
        return Err(AppError::NotFound("itinerary".to_owned()));
    }

    let activities = ActivityScheduler::new(state.store())
        .find_by_itinerary_id(itinerary_id)
        .await?;

    Ok(ApiResponse::ok(
        "Activities retrieved successfully",
        activities.into_iter().map(ActivityResponse::from).collect(),
    ))
}

async fn get_activity(
    State(state): State<AppState>,
    Path((itinerary_id, activity_id)): Path<(ItineraryId, ActivityId)>,
) -> Result<ApiResponse<ActivityResponse>> {
    let activity = ActivityScheduler::new(state.store())
        .find_by_id(activity_id)
        .await?
        .filter(|a| a.itinerary_id == itinerary_id)
        .ok_or_else(|| AppError::NotFound("activity".to_owned()))?;

    Ok(ApiResponse::ok(
        "Activity retrieved successfully",
        activity.into(),
    ))
}

async fn update_activity(
    State(state): State<AppState>,
    Path((itinerary_id, activity_id)): Path<(ItineraryId, ActivityId)>,
    Json(body): Json<ActivityRequest>,
) -> Result<ApiResponse<ActivityResponse>> {
    let draft = ActivityDraft::try_from(body)?;
    let scheduler = ActivityScheduler::new(state.store());

    // An activity is only addressable through the itinerary that owns it.
    let owned = scheduler
        .find_by_id(activity_id)
        .await?
        .is_some_and(|a| a.itinerary_id == itinerary_id);
    if !owned {
        return Err(AppError::NotFound("activity".to_owned()));
    }

    let activity = scheduler.update_activity(activity_id, draft).await?;

    Ok(ApiResponse::ok(
        "Activity updated successfully",
        activity.into(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn body() -> ActivityRequest {
        ActivityRequest {
            title: " Fado night ".to_owned(),
            description: "Live music in Alfama".to_owned(),
            coordinates: "38.7114,-9.1300".to_owned(),
            address: "Alfama, Lisbon".to_owned(),
            reasoning: "Loves live music".to_owned(),
            theme: Theme::SocialActivity,
            start_time: "2024-06-03T21:05:00".parse().unwrap(),
            end_time: "2024-06-03T23:30:00".parse().unwrap(),
            activity_date: "2024-06-03".parse().unwrap(),
        }
    }

    #[test]
    fn test_request_into_draft_trims_and_requires_fields() {
        let draft = ActivityDraft::try_from(body()).unwrap();
        assert_eq!(draft.title, "Fado night");

        let mut blank = body();
        blank.reasoning = String::new();
        assert!(ActivityDraft::try_from(blank).is_err());

        let mut long = body();
        long.description = "x".repeat(MAX_DESCRIPTION_LENGTH + 1);
        assert!(ActivityDraft::try_from(long).is_err());
    }

    #[test]
    fn test_response_formats_times() {
        let draft = ActivityDraft::try_from(body()).unwrap();
        let activity = Activity {
            id: ActivityId::generate(),
            itinerary_id: ItineraryId::generate(),
            title: draft.title,
            description: draft.description,
            coordinates: draft.coordinates,
            address: draft.address,
            reasoning: draft.reasoning,
            theme: draft.theme,
            start_time: draft.start_time,
            end_time: draft.end_time,
            activity_date: draft.activity_date,
            created_at: Utc::now(),
        };

        let response = ActivityResponse::from(activity);
        assert_eq!(response.start_time, "21:05");
        assert_eq!(response.end_time, "23:30");
    }
}
