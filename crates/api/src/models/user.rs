//! User domain types.

use chrono::{DateTime, Utc};

use taste_trails_core::{Email, UserId};

/// A registered user (domain type).
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Normalized email address (unique).
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Argon2id PHC string. Never the raw password.
    pub password_hash: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Parameters for inserting a user. The store assigns id and timestamps.
#[derive(Clone)]
pub struct NewUser {
    pub email: Email,
    pub name: String,
    pub password_hash: String,
}

/// Aggregates shown next to a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStats {
    pub has_taste_profile: bool,
    pub itinerary_count: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password_hash() {
        let user = User {
            id: UserId::generate(),
            email: Email::normalize("a@x.com").unwrap(),
            name: "Ana".to_owned(),
            password_hash: "$argon2id$v=19$secret-material".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let debug_output = format!("{user:?}");
        assert!(debug_output.contains("a@x.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("secret-material"));
    }
}
