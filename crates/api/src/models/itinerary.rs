//! Itinerary domain types.

use chrono::{DateTime, NaiveDate, Utc};

use taste_trails_core::{DateRange, ItineraryId, UserId};

use super::Activity;

/// A trip to one destination over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    /// Unique itinerary ID.
    pub id: ItineraryId,
    /// Owning user. Never changes after creation.
    pub user_id: UserId,
    /// Where the trip goes.
    pub destination: String,
    /// First and last day of the trip.
    pub dates: DateRange,
    /// When the itinerary was created.
    pub created_at: DateTime<Utc>,
}

impl Itinerary {
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.dates.start()
    }

    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.dates.end()
    }

    /// Number of days in the trip, both ends included.
    #[must_use]
    pub fn day_count(&self) -> i64 {
        self.dates.day_count()
    }
}

/// Parameters for inserting an itinerary. The store assigns id and
/// `created_at`.
#[derive(Debug, Clone)]
pub struct NewItinerary {
    pub user_id: UserId,
    pub destination: String,
    pub dates: DateRange,
}

/// An itinerary together with its activities, ordered by activity date.
#[derive(Debug, Clone)]
pub struct ItineraryWithActivities {
    pub itinerary: Itinerary,
    pub activities: Vec<Activity>,
}

/// Which of a user's itineraries to fetch, and in what order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItineraryQuery {
    /// Every itinerary, most recently created first.
    All,
    /// `start_date >= as_of`, earliest start first.
    Upcoming { as_of: NaiveDate },
    /// `end_date < as_of`, latest start first.
    Past { as_of: NaiveDate },
    /// `start_date <= as_of <= end_date`, earliest start first.
    Current { as_of: NaiveDate },
}

impl ItineraryQuery {
    /// Whether an itinerary belongs in this query's result.
    #[must_use]
    pub fn matches(&self, itinerary: &Itinerary) -> bool {
        match *self {
            Self::All => true,
            Self::Upcoming { as_of } => itinerary.dates.is_upcoming(as_of),
            Self::Past { as_of } => itinerary.dates.is_past(as_of),
            Self::Current { as_of } => itinerary.dates.contains(as_of),
        }
    }
}
