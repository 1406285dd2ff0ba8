//! Activity scheduling.
//!
//! Creation enforces both scheduling rules: the time span must not be
//! inverted and the activity date must fall inside the itinerary's range.
//! Updates only enforce the time span; the date is taken as given.

use tracing::{info, instrument};

use taste_trails_core::{ActivityId, ItineraryId, TimeSpan};

use super::ServiceError;
use crate::db::RepositoryError;
use crate::models::{Activity, ActivityDraft};
use crate::store::Store;

/// Creates, updates and reads activities.
pub struct ActivityScheduler<'a> {
    store: &'a dyn Store,
}

impl<'a> ActivityScheduler<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Schedule an activity inside an itinerary.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the itinerary does not exist.
    /// Returns `ServiceError::Validation` if `end_time < start_time` or the
    /// activity date lies outside the itinerary's range.
    #[instrument(skip(self, draft), fields(activity_date = %draft.activity_date))]
    pub async fn create_activity(
        &self,
        itinerary_id: ItineraryId,
        draft: ActivityDraft,
    ) -> Result<Activity, ServiceError> {
        let itinerary = self
            .store
            .get_itinerary(itinerary_id)
            .await?
            .ok_or(ServiceError::NotFound("itinerary"))?;

        TimeSpan::new(draft.start_time, draft.end_time)?;
        itinerary.dates.ensure_contains(draft.activity_date)?;

        let activity = self
            .store
            .insert_activity(itinerary_id, draft)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ServiceError::NotFound("itinerary"),
                other => ServiceError::Repository(other),
            })?;

        info!(activity_id = %activity.id, "Activity created");
        Ok(activity)
    }

    /// Overwrite an activity's fields.
    ///
    /// The activity date is not checked against the itinerary here, so an
    /// update may move an activity outside its trip.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the activity does not exist.
    /// Returns `ServiceError::Validation` if `end_time < start_time`.
    #[instrument(skip(self, draft))]
    pub async fn update_activity(
        &self,
        activity_id: ActivityId,
        draft: ActivityDraft,
    ) -> Result<Activity, ServiceError> {
        let mut activity = self
            .store
            .get_activity(activity_id)
            .await?
            .ok_or(ServiceError::NotFound("activity"))?;

        TimeSpan::new(draft.start_time, draft.end_time)?;

        activity.apply(draft);

        let updated = self
            .store
            .update_activity(&activity)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ServiceError::NotFound("activity"),
                other => ServiceError::Repository(other),
            })?;

        info!(activity_id = %activity_id, "Activity updated");
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn find_by_id(
        &self,
        activity_id: ActivityId,
    ) -> Result<Option<Activity>, ServiceError> {
        Ok(self.store.get_activity(activity_id).await?)
    }

    /// An itinerary's activities by date, then start time.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn find_by_itinerary_id(
        &self,
        itinerary_id: ItineraryId,
    ) -> Result<Vec<Activity>, ServiceError> {
        Ok(self.store.find_activities_by_itinerary(itinerary_id).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use taste_trails_core::Theme;

    use super::*;
    use crate::models::Itinerary;
    use crate::services::{ItineraryScheduler, UserRegistry};
    use crate::store::MemoryStore;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn at(day: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{day} {time}"), "%Y-%m-%d %H:%M").unwrap()
    }

    fn draft(day: &str, start: &str, end: &str) -> ActivityDraft {
        ActivityDraft {
            title: "Pastéis de Belém".to_owned(),
            description: "Custard tarts at the original bakery".to_owned(),
            coordinates: "38.6975,-9.2033".to_owned(),
            address: "R. de Belém 84-92, Lisbon".to_owned(),
            reasoning: "Matches a sweet tooth".to_owned(),
            theme: Theme::CulinaryActivity,
            start_time: at(day, start),
            end_time: at(day, end),
            activity_date: date(day),
        }
    }

    async fn lisbon_trip(store: &MemoryStore) -> Itinerary {
        let user = UserRegistry::new(store)
            .register("a@x.com", "Ana", "secret123")
            .await
            .unwrap();
        ItineraryScheduler::new(store)
            .create_itinerary(user.id, "Lisbon", date("2024-06-01"), date("2024-06-05"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_inside_range() {
        let store = MemoryStore::new();
        let itinerary = lisbon_trip(&store).await;
        let scheduler = ActivityScheduler::new(&store);

        let activity = scheduler
            .create_activity(itinerary.id, draft("2024-06-03", "10:00", "11:30"))
            .await
            .unwrap();

        assert_eq!(activity.itinerary_id, itinerary.id);
        assert_eq!(
            scheduler.find_by_id(activity.id).await.unwrap(),
            Some(activity)
        );
    }

    #[tokio::test]
    async fn test_range_boundaries_are_inclusive() {
        let store = MemoryStore::new();
        let itinerary = lisbon_trip(&store).await;
        let scheduler = ActivityScheduler::new(&store);

        for day in ["2024-06-01", "2024-06-05"] {
            scheduler
                .create_activity(itinerary.id, draft(day, "10:00", "11:00"))
                .await
                .unwrap();
        }

        for day in ["2024-05-31", "2024-06-10"] {
            let err = scheduler
                .create_activity(itinerary.id, draft(day, "10:00", "11:00"))
                .await
                .unwrap_err();
            assert!(
                matches!(err, ServiceError::Validation(ref m) if m == "activity date outside itinerary range")
            );
        }

        assert_eq!(
            scheduler.find_by_itinerary_id(itinerary.id).await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_inverted_times_rejected() {
        let store = MemoryStore::new();
        let itinerary = lisbon_trip(&store).await;
        let scheduler = ActivityScheduler::new(&store);

        let err = scheduler
            .create_activity(itinerary.id, draft("2024-06-03", "10:00", "09:00"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(ref m) if m == "end time before start time"));
        assert!(
            scheduler
                .find_by_itinerary_id(itinerary.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_zero_length_span_allowed() {
        let store = MemoryStore::new();
        let itinerary = lisbon_trip(&store).await;
        let scheduler = ActivityScheduler::new(&store);

        scheduler
            .create_activity(itinerary.id, draft("2024-06-03", "10:00", "10:00"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_in_missing_itinerary() {
        let store = MemoryStore::new();
        let scheduler = ActivityScheduler::new(&store);

        let err = scheduler
            .create_activity(ItineraryId::generate(), draft("2024-06-03", "10:00", "11:00"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound("itinerary")));
    }

    #[tokio::test]
    async fn test_update_overwrites_fields_but_not_identity() {
        let store = MemoryStore::new();
        let itinerary = lisbon_trip(&store).await;
        let scheduler = ActivityScheduler::new(&store);
        let created = scheduler
            .create_activity(itinerary.id, draft("2024-06-03", "10:00", "11:00"))
            .await
            .unwrap();

        let mut changes = draft("2024-06-04", "15:00", "17:00");
        changes.title = "Fado night".to_owned();
        changes.theme = Theme::SocialActivity;
        let updated = scheduler.update_activity(created.id, changes).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.itinerary_id, created.itinerary_id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.title, "Fado night");
        assert_eq!(updated.theme, Theme::SocialActivity);
        assert_eq!(updated.activity_date, date("2024-06-04"));
    }

    #[tokio::test]
    async fn test_update_inverted_times_leaves_activity_unchanged() {
        let store = MemoryStore::new();
        let itinerary = lisbon_trip(&store).await;
        let scheduler = ActivityScheduler::new(&store);
        let created = scheduler
            .create_activity(itinerary.id, draft("2024-06-03", "10:00", "11:00"))
            .await
            .unwrap();

        let err = scheduler
            .update_activity(created.id, draft("2024-06-03", "12:00", "08:00"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(
            scheduler.find_by_id(created.id).await.unwrap(),
            Some(created)
        );
    }

    #[tokio::test]
    async fn update_keeps_out_of_range_date() {
        let store = MemoryStore::new();
        let itinerary = lisbon_trip(&store).await;
        let scheduler = ActivityScheduler::new(&store);
        let created = scheduler
            .create_activity(itinerary.id, draft("2024-06-03", "10:00", "11:00"))
            .await
            .unwrap();

        let updated = scheduler
            .update_activity(created.id, draft("2024-06-10", "10:00", "11:00"))
            .await
            .unwrap();

        assert_eq!(updated.activity_date, date("2024-06-10"));
        assert!(!itinerary.dates.contains(updated.activity_date));
    }

    #[tokio::test]
    async fn test_update_missing_activity() {
        let store = MemoryStore::new();
        let scheduler = ActivityScheduler::new(&store);

        let err = scheduler
            .update_activity(ActivityId::generate(), draft("2024-06-03", "10:00", "11:00"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound("activity")));
    }

    #[tokio::test]
    async fn test_deleting_itinerary_removes_activities() {
        let store = MemoryStore::new();
        let itinerary = lisbon_trip(&store).await;
        let scheduler = ActivityScheduler::new(&store);
        let a1 = scheduler
            .create_activity(itinerary.id, draft("2024-06-02", "10:00", "11:00"))
            .await
            .unwrap();
        let a2 = scheduler
            .create_activity(itinerary.id, draft("2024-06-03", "10:00", "11:00"))
            .await
            .unwrap();

        ItineraryScheduler::new(&store)
            .delete_itinerary(itinerary.id)
            .await
            .unwrap();

        assert!(scheduler.find_by_id(a1.id).await.unwrap().is_none());
        assert!(scheduler.find_by_id(a2.id).await.unwrap().is_none());
    }
}
