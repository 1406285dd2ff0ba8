//! User management commands.
//!
//! Registration goes through the same `UserRegistry` the API uses, so
//! emails are normalized and passwords hashed identically.

use taste_trails_api::db::PgStore;
use taste_trails_api::services::UserRegistry;

use super::{CliError, connect};

const MIN_PASSWORD_LENGTH: usize = 6;

/// Register a new user.
pub async fn create(email: &str, name: &str, password: &str) -> Result<(), CliError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CliError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let store = PgStore::new(connect().await?);
    let user = UserRegistry::new(&store).register(email, name, password).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "User created");
    Ok(())
}

/// Print every user, oldest first.
pub async fn list() -> Result<(), CliError> {
    let store = PgStore::new(connect().await?);
    let users = UserRegistry::new(&store).list_all().await?;

    #[allow(clippy::print_stdout)]
    {
        for user in &users {
            println!(
                "{}\t{}\t{}\t{}",
                user.id,
                user.email,
                user.name,
                user.created_at.format("%Y-%m-%d %H:%M")
            );
        }
        println!("{} user(s)", users.len());
    }
    Ok(())
}
