//! Activity domain types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use taste_trails_core::{ActivityId, ItineraryId, Theme};

/// A scheduled event inside an itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    /// Unique activity ID.
    pub id: ActivityId,
    /// Owning itinerary. Never changes after creation.
    pub itinerary_id: ItineraryId,
    pub title: String,
    pub description: String,
    /// Opaque location string, usually `"lat,lng"`.
    pub coordinates: String,
    pub address: String,
    /// Why this activity was suggested.
    pub reasoning: String,
    pub theme: Theme,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Calendar day the activity happens on.
    pub activity_date: NaiveDate,
    /// When the activity was created. Never changes.
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// Overwrite every caller-supplied field. `id`, `itinerary_id` and
    /// `created_at` are left alone.
    pub fn apply(&mut self, draft: ActivityDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.coordinates = draft.coordinates;
        self.address = draft.address;
        self.reasoning = draft.reasoning;
        self.theme = draft.theme;
        self.start_time = draft.start_time;
        self.end_time = draft.end_time;
        self.activity_date = draft.activity_date;
    }
}

/// The caller-supplied fields of an activity, used for both create and
/// update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    pub title: String,
    pub description: String,
    pub coordinates: String,
    pub address: String,
    pub reasoning: String,
    pub theme: Theme,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub activity_date: NaiveDate,
}
