//! Taste profile management.
//!
//! A user has at most one profile. Upserting replaces the whole preference
//! map; categories left out of the new map are dropped.

use tracing::{info, instrument};

use taste_trails_core::UserId;

use super::ServiceError;
use crate::db::RepositoryError;
use crate::models::{Preferences, TasteProfile};
use crate::store::Store;

/// Creates, replaces and removes taste profiles.
pub struct TasteProfileManager<'a> {
    store: &'a dyn Store,
}

impl<'a> TasteProfileManager<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Create the user's profile, or replace its preferences if one exists.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the user does not exist.
    #[instrument(skip(self, preferences), fields(categories = preferences.len()))]
    pub async fn upsert(
        &self,
        user_id: UserId,
        preferences: Preferences,
    ) -> Result<TasteProfile, ServiceError> {
        if !self.store.exists_user(user_id).await? {
            return Err(ServiceError::NotFound("user"));
        }

        let profile = self
            .store
            .upsert_taste_profile(user_id, preferences)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ServiceError::NotFound("user"),
                other => ServiceError::Repository(other),
            })?;

        info!(profile_id = %profile.id, "Taste profile saved");
        Ok(profile)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<TasteProfile>, ServiceError> {
        Ok(self.store.get_taste_profile_by_user(user_id).await?)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn exists(&self, user_id: UserId) -> Result<bool, ServiceError> {
        Ok(self.find_by_user_id(user_id).await?.is_some())
    }

    /// Remove the user's profile. Does nothing if there is none.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: UserId) -> Result<(), ServiceError> {
        if self.store.delete_taste_profile_by_user(user_id).await? {
            info!("Taste profile deleted");
        }
        Ok(())
    }
}
