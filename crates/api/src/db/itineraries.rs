//! Itinerary repository for database operations.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use taste_trails_core::{DateRange, ItineraryId, UserId};

use super::{RepositoryError, map_write_error};
use crate::models::{Itinerary, ItineraryQuery, NewItinerary};

const ITINERARY_COLUMNS: &str = "id, user_id, destination, start_date, end_date, created_at";

#[derive(sqlx::FromRow)]
struct ItineraryRow {
    id: ItineraryId,
    user_id: UserId,
    destination: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl TryFrom<ItineraryRow> for Itinerary {
    type Error = RepositoryError;

    fn try_from(row: ItineraryRow) -> Result<Self, Self::Error> {
        let dates = DateRange::new(row.start_date, row.end_date).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid itinerary dates in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            destination: row.destination,
            dates,
            created_at: row.created_at,
        })
    }
}

/// Repository for itinerary database operations.
pub struct ItineraryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ItineraryRepository<'a> {
    /// Create a new itinerary repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored dates are inverted.
    pub async fn get_by_id(&self, id: ItineraryId) -> Result<Option<Itinerary>, RepositoryError> {
        let row = sqlx::query_as::<_, ItineraryRow>(&format!(
            "SELECT {ITINERARY_COLUMNS} FROM itineraries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Itinerary::try_from).transpose()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: ItineraryId) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM itineraries WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    /// Create a new itinerary.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owning user does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, itinerary: &NewItinerary) -> Result<Itinerary, RepositoryError> {
        let row = sqlx::query_as::<_, ItineraryRow>(&format!(
            r"
            INSERT INTO itineraries (id, user_id, destination, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ITINERARY_COLUMNS}
            "
        ))
        .bind(ItineraryId::generate())
        .bind(itinerary.user_id)
        .bind(&itinerary.destination)
        .bind(itinerary.dates.start())
        .bind(itinerary.dates.end())
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_write_error(e, "itinerary already exists"))?;

        Itinerary::try_from(row)
    }

    /// Delete an itinerary. Its activities go with it through the foreign key
    /// cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ItineraryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM itineraries WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// A user's itineraries selected and ordered by `query`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored dates are inverted.
    pub async fn find_by_user(
        &self,
        user_id: UserId,
        query: ItineraryQuery,
    ) -> Result<Vec<Itinerary>, RepositoryError> {
        let (filter, order, as_of) = match query {
            ItineraryQuery::All => ("", "created_at DESC, seq DESC", None),
            ItineraryQuery::Upcoming { as_of } => {
                ("AND start_date >= $2", "start_date, seq", Some(as_of))
            }
            ItineraryQuery::Past { as_of } => (
                "AND end_date < $2",
                "start_date DESC, seq DESC",
                Some(as_of),
            ),
            ItineraryQuery::Current { as_of } => (
                "AND start_date <= $2 AND end_date >= $2",
                "start_date, seq",
                Some(as_of),
            ),
        };

        let sql = format!(
            "SELECT {ITINERARY_COLUMNS} FROM itineraries WHERE user_id = $1 {filter} ORDER BY {order}"
        );
        let mut statement = sqlx::query_as::<_, ItineraryRow>(&sql).bind(user_id);
        if let Some(as_of) = as_of {
            statement = statement.bind(as_of);
        }

        let rows = statement.fetch_all(self.pool).await?;
        rows.into_iter().map(Itinerary::try_from).collect()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_user(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM itineraries WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
