//! Domain models for Taste Trails.
//!
//! These are validated domain objects, separate from database row types.
//! Relationships are plain id references: an activity carries its
//! `itinerary_id`, an itinerary its `user_id`. Nothing holds a collection of
//! its children; those are fetched with a foreign-key query.

pub mod activity;
pub mod itinerary;
pub mod taste_profile;
pub mod user;

pub use activity::{Activity, ActivityDraft};
pub use itinerary::{Itinerary, ItineraryQuery, ItineraryWithActivities, NewItinerary};
pub use taste_profile::{Preferences, TasteProfile};
pub use user::{NewUser, User, UserStats};
