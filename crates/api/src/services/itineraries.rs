//! Itinerary lifecycle.
//!
//! An itinerary always satisfies `start_date <= end_date`. Deleting one
//! removes its activities in the same store call.

use chrono::NaiveDate;
use tracing::{info, instrument};

use taste_trails_core::{DateRange, ItineraryId, UserId};

use super::ServiceError;
use crate::db::RepositoryError;
use crate::models::{Itinerary, ItineraryQuery, ItineraryWithActivities, NewItinerary};
use crate::store::Store;

/// Creates, deletes and queries itineraries.
pub struct ItineraryScheduler<'a> {
    store: &'a dyn Store,
}

impl<'a> ItineraryScheduler<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Create an itinerary for a user.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the user does not exist.
    /// Returns `ServiceError::Validation` if `end_date < start_date`.
    #[instrument(skip(self, destination))]
    pub async fn create_itinerary(
        &self,
        user_id: UserId,
        destination: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Itinerary, ServiceError> {
        if !self.store.exists_user(user_id).await? {
            return Err(ServiceError::NotFound("user"));
        }

        let dates = DateRange::new(start_date, end_date)?;

        let itinerary = self
            .store
            .insert_itinerary(NewItinerary {
                user_id,
                destination: destination.trim().to_owned(),
                dates,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ServiceError::NotFound("user"),
                other => ServiceError::Repository(other),
            })?;

        info!(
            itinerary_id = %itinerary.id,
            days = itinerary.day_count(),
            "Itinerary created"
        );
        Ok(itinerary)
    }

    /// Delete an itinerary and all of its activities.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the itinerary does not exist.
    #[instrument(skip(self))]
    pub async fn delete_itinerary(&self, itinerary_id: ItineraryId) -> Result<(), ServiceError> {
        if !self.store.delete_itinerary(itinerary_id).await? {
            return Err(ServiceError::NotFound("itinerary"));
        }

        info!(itinerary_id = %itinerary_id, "Itinerary deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn find_by_id(
        &self,
        itinerary_id: ItineraryId,
    ) -> Result<Option<Itinerary>, ServiceError> {
        Ok(self.store.get_itinerary(itinerary_id).await?)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn exists(&self, itinerary_id: ItineraryId) -> Result<bool, ServiceError> {
        Ok(self.store.exists_itinerary(itinerary_id).await?)
    }

    /// An itinerary together with its activities in schedule order.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn find_itinerary(
        &self,
        itinerary_id: ItineraryId,
    ) -> Result<Option<ItineraryWithActivities>, ServiceError> {
        let Some(itinerary) = self.store.get_itinerary(itinerary_id).await? else {
            return Ok(None);
        };
        let activities = self.store.find_activities_by_itinerary(itinerary_id).await?;

        Ok(Some(ItineraryWithActivities {
            itinerary,
            activities,
        }))
    }

    /// A user's itineraries, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Itinerary>, ServiceError> {
        self.query(user_id, ItineraryQuery::All).await
    }

    /// Itineraries starting on or after `as_of`, earliest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn find_upcoming(
        &self,
        user_id: UserId,
        as_of: NaiveDate,
    ) -> Result<Vec<Itinerary>, ServiceError> {
        self.query(user_id, ItineraryQuery::Upcoming { as_of }).await
    }

    /// Itineraries that ended before `as_of`, latest start first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn find_past(
        &self,
        user_id: UserId,
        as_of: NaiveDate,
    ) -> Result<Vec<Itinerary>, ServiceError> {
        self.query(user_id, ItineraryQuery::Past { as_of }).await
    }

    /// Itineraries whose range includes `as_of`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn find_current(
        &self,
        user_id: UserId,
        as_of: NaiveDate,
    ) -> Result<Vec<Itinerary>, ServiceError> {
        self.query(user_id, ItineraryQuery::Current { as_of }).await
    }

    /// Distinct destinations a user has planned, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the user does not exist.
    pub async fn destinations(&self, user_id: UserId) -> Result<Vec<String>, ServiceError> {
        if !self.store.exists_user(user_id).await? {
            return Err(ServiceError::NotFound("user"));
        }

        let mut itineraries = self.query(user_id, ItineraryQuery::All).await?;
        itineraries.reverse();

        let mut destinations: Vec<String> = Vec::new();
        for itinerary in itineraries {
            if !destinations.contains(&itinerary.destination) {
                destinations.push(itinerary.destination);
            }
        }
        Ok(destinations)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn count_for_user(&self, user_id: UserId) -> Result<i64, ServiceError> {
        Ok(self.store.count_itineraries_by_user(user_id).await?)
    }

    async fn query(
        &self,
        user_id: UserId,
        query: ItineraryQuery,
    ) -> Result<Vec<Itinerary>, ServiceError> {
        Ok(self.store.find_itineraries_by_user(user_id, query).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::services::UserRegistry;
    use crate::store::MemoryStore;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    async fn traveler(store: &MemoryStore) -> User {
        UserRegistry::new(store)
            .register("a@x.com", "Ana", "secret123")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_computes_day_count() {
        let store = MemoryStore::new();
        let user = traveler(&store).await;
        let scheduler = ItineraryScheduler::new(&store);

        let itinerary = scheduler
            .create_itinerary(user.id, "Lisbon", date("2024-06-01"), date("2024-06-05"))
            .await
            .unwrap();

        assert_eq!(itinerary.user_id, user.id);
        assert_eq!(itinerary.day_count(), 5);
    }

    #[tokio::test]
    async fn test_inverted_dates_rejected_without_write() {
        let store = MemoryStore::new();
        let user = traveler(&store).await;
        let scheduler = ItineraryScheduler::new(&store);

        let err = scheduler
            .create_itinerary(user.id, "Lisbon", date("2024-06-05"), date("2024-06-01"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(ref m) if m == "end date before start date"));
        assert_eq!(scheduler.count_for_user(user.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_single_day_trip_allowed() {
        let store = MemoryStore::new();
        let user = traveler(&store).await;
        let scheduler = ItineraryScheduler::new(&store);

        let itinerary = scheduler
            .create_itinerary(user.id, "Porto", date("2024-06-01"), date("2024-06-01"))
            .await
            .unwrap();

        assert_eq!(itinerary.day_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let store = MemoryStore::new();
        let scheduler = ItineraryScheduler::new(&store);

        let err = scheduler
            .create_itinerary(
                UserId::generate(),
                "Lisbon",
                date("2024-06-01"),
                date("2024-06-05"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("user")));

        let err = scheduler.destinations(UserId::generate()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("user")));
    }

    #[tokio::test]
    async fn test_date_window_queries() {
        let store = MemoryStore::new();
        let user = traveler(&store).await;
        let scheduler = ItineraryScheduler::new(&store);

        let past = scheduler
            .create_itinerary(user.id, "Madrid", date("2024-03-01"), date("2024-03-04"))
            .await
            .unwrap();
        let current = scheduler
            .create_itinerary(user.id, "Lisbon", date("2024-05-28"), date("2024-06-03"))
            .await
            .unwrap();
        let later = scheduler
            .create_itinerary(user.id, "Rome", date("2024-09-10"), date("2024-09-12"))
            .await
            .unwrap();
        let soon = scheduler
            .create_itinerary(user.id, "Porto", date("2024-06-01"), date("2024-06-02"))
            .await
            .unwrap();

        let as_of = date("2024-06-01");
        let ids = |list: Vec<Itinerary>| list.into_iter().map(|i| i.id).collect::<Vec<_>>();

        assert_eq!(
            ids(scheduler.find_upcoming(user.id, as_of).await.unwrap()),
            vec![soon.id, later.id]
        );
        assert_eq!(
            ids(scheduler.find_past(user.id, as_of).await.unwrap()),
            vec![past.id]
        );
        assert_eq!(
            ids(scheduler.find_current(user.id, as_of).await.unwrap()),
            vec![current.id, soon.id]
        );
        assert_eq!(
            ids(scheduler.find_by_user_id(user.id).await.unwrap()),
            vec![soon.id, later.id, current.id, past.id]
        );
    }

    #[tokio::test]
    async fn test_destinations_are_distinct_in_creation_order() {
        let store = MemoryStore::new();
        let user = traveler(&store).await;
        let scheduler = ItineraryScheduler::new(&store);

        for (place, start) in [("Lisbon", "2024-06-01"), ("Rome", "2024-07-01"), ("Lisbon", "2024-08-01")] {
            scheduler
                .create_itinerary(user.id, place, date(start), date(start))
                .await
                .unwrap();
        }

        assert_eq!(
            scheduler.destinations(user.id).await.unwrap(),
            vec!["Lisbon".to_owned(), "Rome".to_owned()]
        );
        assert_eq!(scheduler.count_for_user(user.id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_delete_missing_itinerary() {
        let store = MemoryStore::new();
        let scheduler = ItineraryScheduler::new(&store);

        let err = scheduler
            .delete_itinerary(ItineraryId::generate())
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound("itinerary")));
    }

    #[tokio::test]
    async fn test_exists_follows_delete() {
        let store = MemoryStore::new();
        let user = traveler(&store).await;
        let scheduler = ItineraryScheduler::new(&store);
        let itinerary = scheduler
            .create_itinerary(user.id, "Porto", date("2024-07-01"), date("2024-07-03"))
            .await
            .unwrap();

        assert!(scheduler.exists(itinerary.id).await.unwrap());

        scheduler.delete_itinerary(itinerary.id).await.unwrap();
        assert!(!scheduler.exists(itinerary.id).await.unwrap());
    }
}
