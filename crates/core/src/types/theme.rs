//! Thematic category of an activity.

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a [`Theme`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid theme: {0}")]
pub struct ThemeError(pub String);

/// What kind of experience an activity is.
///
/// Serialized in `SCREAMING_SNAKE_CASE`, which is also the form stored in
/// the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Theme {
    /// Museums, landmarks, performances.
    CulturalActivity,
    /// Meetups, nightlife, group outings.
    SocialActivity,
    /// Restaurants, markets, tastings.
    CulinaryActivity,
}

impl Theme {
    /// All themes, in declaration order.
    pub const ALL: [Self; 3] = [
        Self::CulturalActivity,
        Self::SocialActivity,
        Self::CulinaryActivity,
    ];

    /// The stored / wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CulturalActivity => "CULTURAL_ACTIVITY",
            Self::SocialActivity => "SOCIAL_ACTIVITY",
            Self::CulinaryActivity => "CULINARY_ACTIVITY",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| ThemeError(s.to_owned()))
    }
}
