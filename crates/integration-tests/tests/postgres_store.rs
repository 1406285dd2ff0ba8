//! `PgStore` against a real database.
//!
//! These tests need a migrated-or-empty `PostgreSQL` database:
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/taste_trails_test \
//!     cargo test -p taste-trails-integration-tests -- --ignored
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use chrono::{NaiveDate, NaiveDateTime};
use secrecy::SecretString;

use taste_trails_api::db::{self, PgStore};
use taste_trails_api::models::{ActivityDraft, Preferences};
use taste_trails_api::services::{
    ActivityScheduler, ItineraryScheduler, ServiceError, TasteProfileManager, UserRegistry,
};
use taste_trails_core::{Theme, UserId};

async fn store() -> PgStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = db::create_pool(&SecretString::from(url), 2)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("../api/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    PgStore::new(pool)
}

fn unique_email() -> String {
    format!("{}@example.com", UserId::generate())
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn draft(title: &str, day: &str) -> ActivityDraft {
    let at = |time: &str| {
        NaiveDateTime::parse_from_str(&format!("{day} {time}"), "%Y-%m-%d %H:%M").unwrap()
    };
    ActivityDraft {
        title: title.to_owned(),
        description: "Walk the old town".to_owned(),
        coordinates: "41.1413,-8.6110".to_owned(),
        address: "Ribeira, Porto".to_owned(),
        reasoning: "Likes walking tours".to_owned(),
        theme: Theme::CulturalActivity,
        start_time: at("10:00"),
        end_time: at("11:00"),
        activity_date: date(day),
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL via DATABASE_URL"]
async fn test_users_round_trip_through_postgres() {
    let store = store().await;
    let registry = UserRegistry::new(&store);
    let email = unique_email();

    let user = registry
        .register(&email.to_uppercase(), "Ana", "secret123")
        .await
        .unwrap();
    assert_eq!(user.email.as_str(), email);

    let found = registry.authenticate(&email, "secret123").await.unwrap();
    assert_eq!(found.id, user.id);

    let err = registry.register(&email, "Other", "secret123").await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    registry.delete(user.id).await.unwrap();
    assert!(registry.find_by_id(user.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL via DATABASE_URL"]
async fn test_ties_break_on_insertion_order() {
    let store = store().await;
    let user = UserRegistry::new(&store)
        .register(&unique_email(), "Ana", "secret123")
        .await
        .unwrap();

    let itineraries = ItineraryScheduler::new(&store);
    let mut created = Vec::new();
    for destination in ["Porto", "Braga", "Coimbra"] {
        let itinerary = itineraries
            .create_itinerary(user.id, destination, date("2024-09-01"), date("2024-09-04"))
            .await
            .unwrap();
        created.push(itinerary.id);
    }

    let upcoming = itineraries
        .find_upcoming(user.id, date("2024-08-01"))
        .await
        .unwrap();
    let ids: Vec<_> = upcoming.iter().map(|i| i.id).collect();
    assert_eq!(ids, created);

    let activities = ActivityScheduler::new(&store);
    let mut scheduled = Vec::new();
    for title in ["Ribeira", "Livraria Lello", "Torre dos Clérigos"] {
        let activity = activities
            .create_activity(created[0], draft(title, "2024-09-02"))
            .await
            .unwrap();
        scheduled.push(activity.id);
    }

    let listed = activities.find_by_itinerary_id(created[0]).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|a| a.id).collect();
    assert_eq!(ids, scheduled);

    UserRegistry::new(&store).delete(user.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires PostgreSQL via DATABASE_URL"]
async fn test_cascades_and_stats_in_postgres() {
    let store = store().await;
    let registry = UserRegistry::new(&store);
    let user = registry
        .register(&unique_email(), "Ana", "secret123")
        .await
        .unwrap();

    let itinerary = ItineraryScheduler::new(&store)
        .create_itinerary(user.id, "Porto", date("2024-09-01"), date("2024-09-04"))
        .await
        .unwrap();
    let activity = ActivityScheduler::new(&store)
        .create_activity(itinerary.id, draft("Ribeira", "2024-09-02"))
        .await
        .unwrap();

    let profiles = TasteProfileManager::new(&store);
    let mut prefs = Preferences::new();
    prefs.insert("music".to_owned(), serde_json::json!(["fado"]));
    let first = profiles.upsert(user.id, prefs).await.unwrap();
    let second = profiles.upsert(user.id, Preferences::new()).await.unwrap();
    assert_eq!(first.id, second.id);
    assert!(second.preferences.is_empty());

    let stats = registry.stats(&[user.id]).await.unwrap();
    assert_eq!(stats[&user.id].itinerary_count, 1);
    assert!(stats[&user.id].has_taste_profile);

    registry.delete(user.id).await.unwrap();
    assert!(
        ActivityScheduler::new(&store)
            .find_by_id(activity.id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(!profiles.exists(user.id).await.unwrap());
}
