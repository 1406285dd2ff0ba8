//! Activity repository for database operations.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::PgPool;

use taste_trails_core::{ActivityId, ItineraryId, Theme};

use super::{RepositoryError, map_write_error};
use crate::models::{Activity, ActivityDraft};

const ACTIVITY_COLUMNS: &str = "id, itinerary_id, title, description, coordinates, address, \
     reasoning, theme, start_time, end_time, activity_date, created_at";

#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: ActivityId,
    itinerary_id: ItineraryId,
    title: String,
    description: String,
    coordinates: String,
    address: String,
    reasoning: String,
    theme: String,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    activity_date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = RepositoryError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let theme: Theme = row.theme.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid theme in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            itinerary_id: row.itinerary_id,
            title: row.title,
            description: row.description,
            coordinates: row.coordinates,
            address: row.address,
            reasoning: row.reasoning,
            theme,
            start_time: row.start_time,
            end_time: row.end_time,
            activity_date: row.activity_date,
            created_at: row.created_at,
        })
    }
}

/// Repository for activity database operations.
pub struct ActivityRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ActivityRepository<'a> {
    /// Create a new activity repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored theme is unknown.
    pub async fn get_by_id(&self, id: ActivityId) -> Result<Option<Activity>, RepositoryError> {
        let row = sqlx::query_as::<_, ActivityRow>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Activity::try_from).transpose()
    }

    /// Create an activity inside an itinerary.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the itinerary does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        itinerary_id: ItineraryId,
        draft: &ActivityDraft,
    ) -> Result<Activity, RepositoryError> {
        let row = sqlx::query_as::<_, ActivityRow>(&format!(
            r"
            INSERT INTO activities (
                id, itinerary_id, title, description, coordinates, address,
                reasoning, theme, start_time, end_time, activity_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ACTIVITY_COLUMNS}
            "
        ))
        .bind(ActivityId::generate())
        .bind(itinerary_id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.coordinates)
        .bind(&draft.address)
        .bind(&draft.reasoning)
        .bind(draft.theme.as_str())
        .bind(draft.start_time)
        .bind(draft.end_time)
        .bind(draft.activity_date)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_write_error(e, "activity already exists"))?;

        Activity::try_from(row)
    }

    /// Overwrite an activity's caller-supplied fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the activity does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, activity: &Activity) -> Result<Activity, RepositoryError> {
        let row = sqlx::query_as::<_, ActivityRow>(&format!(
            r"
            UPDATE activities
            SET title = $2, description = $3, coordinates = $4, address = $5,
                reasoning = $6, theme = $7, start_time = $8, end_time = $9,
                activity_date = $10
            WHERE id = $1
            RETURNING {ACTIVITY_COLUMNS}
            "
        ))
        .bind(activity.id)
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(&activity.coordinates)
        .bind(&activity.address)
        .bind(&activity.reasoning)
        .bind(activity.theme.as_str())
        .bind(activity.start_time)
        .bind(activity.end_time)
        .bind(activity.activity_date)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Activity::try_from(row)
    }

    /// An itinerary's activities by day, then start time, then insertion
    /// order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored theme is unknown.
    pub async fn find_by_itinerary(
        &self,
        itinerary_id: ItineraryId,
    ) -> Result<Vec<Activity>, RepositoryError> {
        let rows = sqlx::query_as::<_, ActivityRow>(&format!(
            r"
            SELECT {ACTIVITY_COLUMNS}
            FROM activities
            WHERE itinerary_id = $1
            ORDER BY activity_date, start_time, seq
            "
        ))
        .bind(itinerary_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Activity::try_from).collect()
    }
}
