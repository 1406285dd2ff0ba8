//! Database operations for the Taste Trails `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` - Registered travelers (unique email)
//! - `itineraries` - Trips, owned by a user
//! - `activities` - Scheduled events, owned by an itinerary
//! - `taste_profiles` - One preference document per user (JSONB)
//!
//! Child rows reference their parent with `ON DELETE CASCADE`, so deleting a
//! user or itinerary removes everything beneath it in one statement.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p taste-trails-cli -- migrate
//! ```

pub mod activities;
pub mod itineraries;
pub mod taste_profiles;
pub mod users;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use taste_trails_core::{ActivityId, Email, ItineraryId, UserId};

pub use activities::ActivityRepository;
pub use itineraries::ItineraryRepository;
pub use taste_profiles::TasteProfileRepository;
pub use users::UserRepository;

use crate::models::{
    Activity, ActivityDraft, Itinerary, ItineraryQuery, NewItinerary, NewUser, Preferences,
    TasteProfile, User, UserStats,
};
use crate::store::Store;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity (or the parent it references) was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map an insert/update failure, turning constraint violations into the
/// matching repository error.
fn map_write_error(e: sqlx::Error, conflict: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(conflict.to_owned());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::NotFound;
        }
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// [`Store`] backed by a `PostgreSQL` pool.
///
/// Each trait method delegates to one of the table repositories and runs as
/// a single statement.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    const fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.pool)
    }

    const fn itineraries(&self) -> ItineraryRepository<'_> {
        ItineraryRepository::new(&self.pool)
    }

    const fn activities(&self) -> ActivityRepository<'_> {
        ActivityRepository::new(&self.pool)
    }

    const fn taste_profiles(&self) -> TasteProfileRepository<'_> {
        TasteProfileRepository::new(&self.pool)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.users().get_by_id(id).await
    }

    async fn get_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        self.users().get_by_email(email).await
    }

    async fn exists_user(&self, id: UserId) -> Result<bool, RepositoryError> {
        self.users().exists(id).await
    }

    async fn exists_user_by_email(&self, email: &Email) -> Result<bool, RepositoryError> {
        self.users().exists_by_email(email).await
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        self.users().list().await
    }

    async fn count_users(&self) -> Result<i64, RepositoryError> {
        self.users().count().await
    }

    async fn user_stats(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, UserStats>, RepositoryError> {
        self.users().stats(ids).await
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.users().create(&user).await
    }

    async fn update_user(&self, user: &User) -> Result<User, RepositoryError> {
        self.users().update(user).await
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, RepositoryError> {
        self.users().delete(id).await
    }

    async fn get_itinerary(&self, id: ItineraryId) -> Result<Option<Itinerary>, RepositoryError> {
        self.itineraries().get_by_id(id).await
    }

    async fn exists_itinerary(&self, id: ItineraryId) -> Result<bool, RepositoryError> {
        self.itineraries().exists(id).await
    }

    async fn insert_itinerary(
        &self,
        itinerary: NewItinerary,
    ) -> Result<Itinerary, RepositoryError> {
        self.itineraries().create(&itinerary).await
    }

    async fn delete_itinerary(&self, id: ItineraryId) -> Result<bool, RepositoryError> {
        self.itineraries().delete(id).await
    }

    async fn find_itineraries_by_user(
        &self,
        user_id: UserId,
        query: ItineraryQuery,
    ) -> Result<Vec<Itinerary>, RepositoryError> {
        self.itineraries().find_by_user(user_id, query).await
    }

    async fn count_itineraries_by_user(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        self.itineraries().count_by_user(user_id).await
    }

    async fn get_activity(&self, id: ActivityId) -> Result<Option<Activity>, RepositoryError> {
        self.activities().get_by_id(id).await
    }

    async fn insert_activity(
        &self,
        itinerary_id: ItineraryId,
        draft: ActivityDraft,
    ) -> Result<Activity, RepositoryError> {
        self.activities().create(itinerary_id, &draft).await
    }

    async fn update_activity(&self, activity: &Activity) -> Result<Activity, RepositoryError> {
        self.activities().update(activity).await
    }

    async fn find_activities_by_itinerary(
        &self,
        itinerary_id: ItineraryId,
    ) -> Result<Vec<Activity>, RepositoryError> {
        self.activities().find_by_itinerary(itinerary_id).await
    }

    async fn get_taste_profile_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<TasteProfile>, RepositoryError> {
        self.taste_profiles().get_by_user(user_id).await
    }

    async fn upsert_taste_profile(
        &self,
        user_id: UserId,
        preferences: Preferences,
    ) -> Result<TasteProfile, RepositoryError> {
        self.taste_profiles().upsert(user_id, &preferences).await
    }

    async fn delete_taste_profile_by_user(
        &self,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        self.taste_profiles().delete_by_user(user_id).await
    }
}
