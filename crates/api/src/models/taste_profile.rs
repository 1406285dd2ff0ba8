//! Taste profile domain types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use taste_trails_core::{TasteProfileId, UserId};

/// Preference categories keyed by name (`"artist"`, `"podcast"`, ...).
///
/// The set of categories is open: values are arbitrary JSON documents and
/// no category name is special.
pub type Preferences = BTreeMap<String, serde_json::Value>;

/// A user's preference data. At most one exists per user.
#[derive(Debug, Clone, PartialEq)]
pub struct TasteProfile {
    pub id: TasteProfileId,
    /// Owning user (one-to-one).
    pub user_id: UserId,
    pub preferences: Preferences,
    /// Refreshed on every upsert.
    pub updated_at: DateTime<Utc>,
}
