//! Taste profile repository for database operations.
//!
//! Preferences are stored as a single JSONB document per user.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use taste_trails_core::{TasteProfileId, UserId};

use super::{RepositoryError, map_write_error};
use crate::models::{Preferences, TasteProfile};

#[derive(sqlx::FromRow)]
struct TasteProfileRow {
    id: TasteProfileId,
    user_id: UserId,
    preferences: Json<Preferences>,
    updated_at: DateTime<Utc>,
}

impl From<TasteProfileRow> for TasteProfile {
    fn from(row: TasteProfileRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            preferences: row.preferences.0,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for taste profile database operations.
pub struct TasteProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TasteProfileRepository<'a> {
    /// Create a new taste profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails or the stored
    /// preferences are not a JSON object.
    pub async fn get_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<TasteProfile>, RepositoryError> {
        let row = sqlx::query_as::<_, TasteProfileRow>(
            r"
            SELECT id, user_id, preferences, updated_at
            FROM taste_profiles
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(TasteProfile::from))
    }

    /// Insert the user's profile, or replace the preferences of the existing
    /// one. The `user_id` unique constraint makes this a single atomic
    /// statement, so concurrent upserts never produce two profiles.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn upsert(
        &self,
        user_id: UserId,
        preferences: &Preferences,
    ) -> Result<TasteProfile, RepositoryError> {
        let row = sqlx::query_as::<_, TasteProfileRow>(
            r"
            INSERT INTO taste_profiles (id, user_id, preferences)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET preferences = EXCLUDED.preferences, updated_at = NOW()
            RETURNING id, user_id, preferences, updated_at
            ",
        )
        .bind(TasteProfileId::generate())
        .bind(user_id)
        .bind(Json(preferences))
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_write_error(e, "taste profile already exists"))?;

        Ok(TasteProfile::from(row))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_by_user(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM taste_profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
