//! Storage port consumed by the services.
//!
//! [`Store`] is the only way services touch persistent state. Each method is
//! one atomic unit: an insert, an update, or a delete together with its
//! cascade. No method spans more than one request, and there is no ambient
//! transaction; services receive the store they should use explicitly.
//!
//! # Implementations
//!
//! - [`crate::db::PgStore`] - `PostgreSQL`, cascades via `ON DELETE CASCADE`
//! - [`MemoryStore`] - flat in-process tables, used by tests and local runs

mod memory;

use std::collections::HashMap;

use async_trait::async_trait;

use taste_trails_core::{ActivityId, Email, ItineraryId, UserId};

pub use memory::MemoryStore;

use crate::db::RepositoryError;
use crate::models::{
    Activity, ActivityDraft, Itinerary, ItineraryQuery, NewItinerary, NewUser, Preferences,
    TasteProfile, User, UserStats,
};

/// Durable keyed storage for users, itineraries, activities and taste
/// profiles.
///
/// Ids are assigned by the store on insert. Lookups that find nothing return
/// `Ok(None)` (or `false` for deletes); `RepositoryError::NotFound` is only
/// used by updates whose target disappeared.
#[async_trait]
pub trait Store: Send + Sync {
    /// Check that the backing storage is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    // =========================================================================
    // Users
    // =========================================================================

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    async fn get_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    async fn exists_user(&self, id: UserId) -> Result<bool, RepositoryError>;

    async fn exists_user_by_email(&self, email: &Email) -> Result<bool, RepositoryError>;

    /// All users, oldest first.
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;

    async fn count_users(&self) -> Result<i64, RepositoryError>;

    /// Taste profile presence and itinerary count for each of `ids`, in one
    /// round trip. Unknown ids are left out of the map.
    async fn user_stats(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, UserStats>, RepositoryError>;

    /// Insert a user.
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Overwrite the mutable fields of a user and refresh `updated_at`.
    async fn update_user(&self, user: &User) -> Result<User, RepositoryError>;

    /// Delete a user with its itineraries, their activities, and its taste
    /// profile. Returns `false` if the user did not exist.
    async fn delete_user(&self, id: UserId) -> Result<bool, RepositoryError>;

    // =========================================================================
    // Itineraries
    // =========================================================================

    async fn get_itinerary(&self, id: ItineraryId) -> Result<Option<Itinerary>, RepositoryError>;

    async fn exists_itinerary(&self, id: ItineraryId) -> Result<bool, RepositoryError>;

    async fn insert_itinerary(&self, itinerary: NewItinerary)
    -> Result<Itinerary, RepositoryError>;

    /// Delete an itinerary and its activities. Returns `false` if it did not
    /// exist.
    async fn delete_itinerary(&self, id: ItineraryId) -> Result<bool, RepositoryError>;

    /// A user's itineraries, filtered and ordered by `query`.
    async fn find_itineraries_by_user(
        &self,
        user_id: UserId,
        query: ItineraryQuery,
    ) -> Result<Vec<Itinerary>, RepositoryError>;

    async fn count_itineraries_by_user(&self, user_id: UserId) -> Result<i64, RepositoryError>;

    // =========================================================================
    // Activities
    // =========================================================================

    async fn get_activity(&self, id: ActivityId) -> Result<Option<Activity>, RepositoryError>;

    async fn insert_activity(
        &self,
        itinerary_id: ItineraryId,
        draft: ActivityDraft,
    ) -> Result<Activity, RepositoryError>;

    /// Overwrite the mutable fields of an activity.
    async fn update_activity(&self, activity: &Activity) -> Result<Activity, RepositoryError>;

    /// An itinerary's activities by `activity_date`, then `start_time`, then
    /// creation order.
    async fn find_activities_by_itinerary(
        &self,
        itinerary_id: ItineraryId,
    ) -> Result<Vec<Activity>, RepositoryError>;

    // =========================================================================
    // Taste profiles
    // =========================================================================

    async fn get_taste_profile_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<TasteProfile>, RepositoryError>;

    /// Create the user's profile or replace its preferences wholesale,
    /// refreshing `updated_at`. Never produces a second profile for a user.
    async fn upsert_taste_profile(
        &self,
        user_id: UserId,
        preferences: Preferences,
    ) -> Result<TasteProfile, RepositoryError>;

    /// Returns `false` if the user had no profile.
    async fn delete_taste_profile_by_user(&self, user_id: UserId)
    -> Result<bool, RepositoryError>;
}
