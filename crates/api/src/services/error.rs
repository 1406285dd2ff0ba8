//! Service error types.

use thiserror::Error;

use taste_trails_core::{EmailError, ScheduleError};

use crate::db::RepositoryError;

/// Errors that can occur in any service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A referenced entity does not exist. Holds the entity name.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Input rejected before anything was written.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness rule was violated.
    #[error("{0}")]
    Conflict(String),

    /// Password did not match.
    #[error("invalid credentials")]
    Auth,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<ScheduleError> for ServiceError {
    fn from(e: ScheduleError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<EmailError> for ServiceError {
    fn from(e: EmailError) -> Self {
        Self::Validation(format!("invalid email: {e}"))
    }
}
