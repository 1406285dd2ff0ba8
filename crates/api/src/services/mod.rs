//! Business logic for Taste Trails.
//!
//! # Services
//!
//! - `users` - Registration, authentication and user lookup
//! - `taste_profiles` - One preference profile per user, replaced on upsert
//! - `itineraries` - Trip lifecycle and date-window queries
//! - `activities` - Scheduling activities inside an itinerary's date range
//!
//! Every service borrows the [`Store`](crate::store::Store) it runs against
//! and is cheap to construct per request.

mod error;

pub mod activities;
pub mod itineraries;
pub mod taste_profiles;
pub mod users;

pub use activities::ActivityScheduler;
pub use error::ServiceError;
pub use itineraries::ItineraryScheduler;
pub use taste_profiles::TasteProfileManager;
pub use users::UserRegistry;
