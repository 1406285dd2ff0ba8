//! In-process [`Store`] backed by flat id-keyed tables.
//!
//! Every entity lives in its own `HashMap`; relationships are id fields.
//! All mutations take the single write lock, so a delete and its cascade are
//! observed together. Each row also carries an insertion sequence number used
//! to break ordering ties deterministically.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use taste_trails_core::{ActivityId, Email, ItineraryId, TasteProfileId, UserId};

use super::Store;
use crate::db::RepositoryError;
use crate::models::{
    Activity, ActivityDraft, Itinerary, ItineraryQuery, NewItinerary, NewUser, Preferences,
    TasteProfile, User, UserStats,
};

#[derive(Debug, Clone)]
struct Row<T> {
    seq: u64,
    value: T,
}

#[derive(Debug, Default)]
struct Tables {
    next_seq: u64,
    users: HashMap<UserId, Row<User>>,
    itineraries: HashMap<ItineraryId, Row<Itinerary>>,
    activities: HashMap<ActivityId, Row<Activity>>,
    taste_profiles: HashMap<UserId, TasteProfile>,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn remove_itinerary_cascade(&mut self, id: ItineraryId) -> bool {
        let existed = self.itineraries.remove(&id).is_some();
        if existed {
            self.activities
                .retain(|_, row| row.value.itinerary_id != id);
        }
        existed
    }
}

/// A [`Store`] that keeps everything in memory.
///
/// Cloning is not supported; share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).map(|row| row.value.clone()))
    }

    async fn get_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|row| &row.value.email == email)
            .map(|row| row.value.clone()))
    }

    async fn exists_user(&self, id: UserId) -> Result<bool, RepositoryError> {
        Ok(self.tables.read().await.users.contains_key(&id))
    }

    async fn exists_user_by_email(&self, email: &Email) -> Result<bool, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|row| &row.value.email == email))
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&Row<User>> = tables.users.values().collect();
        rows.sort_by_key(|row| row.seq);
        Ok(rows.into_iter().map(|row| row.value.clone()).collect())
    }

    async fn count_users(&self) -> Result<i64, RepositoryError> {
        let count = self.tables.read().await.users.len();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn user_stats(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, UserStats>, RepositoryError> {
        let tables = self.tables.read().await;

        let mut stats: HashMap<UserId, UserStats> = ids
            .iter()
            .filter(|id| tables.users.contains_key(*id))
            .map(|&id| {
                let has_taste_profile = tables.taste_profiles.contains_key(&id);
                (
                    id,
                    UserStats {
                        has_taste_profile,
                        itinerary_count: 0,
                    },
                )
            })
            .collect();

        for row in tables.itineraries.values() {
            if let Some(entry) = stats.get_mut(&row.value.user_id) {
                entry.itinerary_count += 1;
            }
        }

        Ok(stats)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|row| row.value.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let now = Utc::now();
        let created = User {
            id: UserId::generate(),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };

        let seq = tables.next_seq();
        tables.users.insert(
            created.id,
            Row {
                seq,
                value: created.clone(),
            },
        );

        Ok(created)
    }

    async fn update_user(&self, user: &User) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .users
            .get_mut(&user.id)
            .ok_or(RepositoryError::NotFound)?;

        row.value.name.clone_from(&user.name);
        row.value.password_hash.clone_from(&user.password_hash);
        row.value.updated_at = Utc::now();

        Ok(row.value.clone())
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;

        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }

        let owned: Vec<ItineraryId> = tables
            .itineraries
            .values()
            .filter(|row| row.value.user_id == id)
            .map(|row| row.value.id)
            .collect();
        for itinerary_id in owned {
            tables.remove_itinerary_cascade(itinerary_id);
        }
        tables.taste_profiles.remove(&id);

        Ok(true)
    }

    async fn get_itinerary(&self, id: ItineraryId) -> Result<Option<Itinerary>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.itineraries.get(&id).map(|row| row.value.clone()))
    }

    async fn exists_itinerary(&self, id: ItineraryId) -> Result<bool, RepositoryError> {
        Ok(self.tables.read().await.itineraries.contains_key(&id))
    }

    async fn insert_itinerary(
        &self,
        itinerary: NewItinerary,
    ) -> Result<Itinerary, RepositoryError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&itinerary.user_id) {
            return Err(RepositoryError::NotFound);
        }

        let created = Itinerary {
            id: ItineraryId::generate(),
            user_id: itinerary.user_id,
            destination: itinerary.destination,
            dates: itinerary.dates,
            created_at: Utc::now(),
        };

        let seq = tables.next_seq();
        tables.itineraries.insert(
            created.id,
            Row {
                seq,
                value: created.clone(),
            },
        );

        Ok(created)
    }

    async fn delete_itinerary(&self, id: ItineraryId) -> Result<bool, RepositoryError> {
        Ok(self.tables.write().await.remove_itinerary_cascade(id))
    }

    async fn find_itineraries_by_user(
        &self,
        user_id: UserId,
        query: ItineraryQuery,
    ) -> Result<Vec<Itinerary>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&Row<Itinerary>> = tables
            .itineraries
            .values()
            .filter(|row| row.value.user_id == user_id && query.matches(&row.value))
            .collect();

        match query {
            ItineraryQuery::All => {
                rows.sort_by(|a, b| {
                    (b.value.created_at, b.seq).cmp(&(a.value.created_at, a.seq))
                });
            }
            ItineraryQuery::Upcoming { .. } | ItineraryQuery::Current { .. } => {
                rows.sort_by_key(|row| (row.value.start_date(), row.seq));
            }
            ItineraryQuery::Past { .. } => {
                rows.sort_by(|a, b| {
                    (b.value.start_date(), b.seq).cmp(&(a.value.start_date(), a.seq))
                });
            }
        }

        Ok(rows.into_iter().map(|row| row.value.clone()).collect())
    }

    async fn count_itineraries_by_user(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let tables = self.tables.read().await;
        let count = tables
            .itineraries
            .values()
            .filter(|row| row.value.user_id == user_id)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn get_activity(&self, id: ActivityId) -> Result<Option<Activity>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.activities.get(&id).map(|row| row.value.clone()))
    }

    async fn insert_activity(
        &self,
        itinerary_id: ItineraryId,
        draft: ActivityDraft,
    ) -> Result<Activity, RepositoryError> {
        let mut tables = self.tables.write().await;

        if !tables.itineraries.contains_key(&itinerary_id) {
            return Err(RepositoryError::NotFound);
        }

        let created = Activity {
            id: ActivityId::generate(),
            itinerary_id,
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

        let seq = tables.next_seq();
        tables.activities.insert(
            created.id,
            Row {
                seq,
                value: created.clone(),
            },
        );

        Ok(created)
    }

    async fn update_activity(&self, activity: &Activity) -> Result<Activity, RepositoryError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .activities
            .get_mut(&activity.id)
            .ok_or(RepositoryError::NotFound)?;

        let stored = &mut row.value;
        stored.title.clone_from(&activity.title);
        stored.description.clone_from(&activity.description);
        stored.coordinates.clone_from(&activity.coordinates);
        stored.address.clone_from(&activity.address);
        stored.reasoning.clone_from(&activity.reasoning);
        stored.theme = activity.theme;
        stored.start_time = activity.start_time;
        stored.end_time = activity.end_time;
        stored.activity_date = activity.activity_date;

        Ok(stored.clone())
    }

    async fn find_activities_by_itinerary(
        &self,
        itinerary_id: ItineraryId,
    ) -> Result<Vec<Activity>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&Row<Activity>> = tables
            .activities
            .values()
            .filter(|row| row.value.itinerary_id == itinerary_id)
            .collect();
        rows.sort_by_key(|row| (row.value.activity_date, row.value.start_time, row.seq));
        Ok(rows.into_iter().map(|row| row.value.clone()).collect())
    }

    async fn get_taste_profile_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<TasteProfile>, RepositoryError> {
        Ok(self.tables.read().await.taste_profiles.get(&user_id).cloned())
    }

    async fn upsert_taste_profile(
        &self,
        user_id: UserId,
        preferences: Preferences,
    ) -> Result<TasteProfile, RepositoryError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&user_id) {
            return Err(RepositoryError::NotFound);
        }

        let now = Utc::now();
        let profile = tables
            .taste_profiles
            .entry(user_id)
            .and_modify(|existing| {
                existing.preferences.clone_from(&preferences);
                existing.updated_at = now;
            })
            .or_insert_with(|| TasteProfile {
                id: TasteProfileId::generate(),
                user_id,
                preferences: preferences.clone(),
                updated_at: now,
            });

        Ok(profile.clone())
    }

    async fn delete_taste_profile_by_user(
        &self,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .tables
            .write()
            .await
            .taste_profiles
            .remove(&user_id)
            .is_some())
    }
}
