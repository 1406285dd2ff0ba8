//! CLI subcommands and their shared plumbing.

pub mod migrate;
pub mod user;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use taste_trails_api::services::ServiceError;

const MAX_CONNECTIONS: u32 = 2;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Invalid command input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A service operation failed.
    #[error("{0}")]
    Service(#[from] ServiceError),
}

/// Read the database URL, preferring `API_DATABASE_URL` over `DATABASE_URL`.
fn database_url() -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();

    std::env::var("API_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("API_DATABASE_URL"))
}

async fn connect() -> Result<PgPool, CliError> {
    let url = database_url()?;
    tracing::info!("Connecting to database...");
    Ok(taste_trails_api::db::create_pool(&url, MAX_CONNECTIONS).await?)
}
