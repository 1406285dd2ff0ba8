//! User registration and authentication.
//!
//! Emails are normalized (trimmed, lowercased) before every lookup, so the
//! unique-email rule is case and whitespace insensitive.

use std::collections::HashMap;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::{info, instrument};

use taste_trails_core::{Email, UserId};

use super::ServiceError;
use crate::db::RepositoryError;
use crate::models::{NewUser, User, UserStats};
use crate::store::Store;

/// Registers, authenticates and looks up users.
pub struct UserRegistry<'a> {
    store: &'a dyn Store,
}

impl<'a> UserRegistry<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if the email is malformed.
    /// Returns `ServiceError::Conflict` if the normalized email is taken.
    /// Returns `ServiceError::PasswordHash` if hashing fails.
    #[instrument(skip(self, name, password))]
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<User, ServiceError> {
        let email = Email::normalize(email)?;

        if self.store.exists_user_by_email(&email).await? {
            return Err(ServiceError::Conflict("email already exists".to_owned()));
        }

        let password_hash = hash_password(password)?;

        let user = self
            .store
            .insert_user(NewUser {
                email,
                name: name.trim().to_owned(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
                other => ServiceError::Repository(other),
            })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no user has this email.
    /// Returns `ServiceError::Auth` if the password does not match.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let Ok(email) = Email::normalize(email) else {
            return Err(ServiceError::NotFound("user"));
        };

        let user = self
            .store
            .get_user_by_email(&email)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;

        verify_password(password, &user.password_hash)?;

        info!(user_id = %user.id, "User authenticated");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ServiceError> {
        Ok(self.store.get_user(id).await?)
    }

    /// Look up a user by email. Malformed emails match nobody.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let Ok(email) = Email::normalize(email) else {
            return Ok(None);
        };
        Ok(self.store.get_user_by_email(&email).await?)
    }

    /// All users, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn list_all(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.store.list_users().await?)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn count(&self) -> Result<i64, ServiceError> {
        Ok(self.store.count_users().await?)
    }

    /// Taste profile presence and itinerary count for each user, fetched
    /// in a single store call. Unknown ids are omitted.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn stats(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, UserStats>, ServiceError> {
        Ok(self.store.user_stats(ids).await?)
    }

    /// Whether a user with this (normalized) email exists.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, ServiceError> {
        let Ok(email) = Email::normalize(email) else {
            return Ok(false);
        };
        Ok(self.store.exists_user_by_email(&email).await?)
    }

    /// Change a user's display name.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the user does not exist.
    #[instrument(skip(self, name))]
    pub async fn rename(&self, id: UserId, name: &str) -> Result<User, ServiceError> {
        let mut user = self
            .store
            .get_user(id)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;

        name.trim().clone_into(&mut user.name);

        let updated = self.store.update_user(&user).await.map_err(|e| match e {
            RepositoryError::NotFound => ServiceError::NotFound("user"),
            other => ServiceError::Repository(other),
        })?;

        info!(user_id = %id, "User renamed");
        Ok(updated)
    }

    /// Delete a user together with its itineraries, their activities and
    /// its taste profile.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the user does not exist.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: UserId) -> Result<(), ServiceError> {
        if !self.store.delete_user(id).await? {
            return Err(ServiceError::NotFound("user"));
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }
}

/// Hash a password with Argon2id and a random salt.
fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| ServiceError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), ServiceError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| ServiceError::Auth)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| ServiceError::Auth)
}
