//! Database migration command.
//!
//! Applies the SQL files in `crates/api/migrations/`, which are embedded at
//! compile time.

use super::{CliError, connect};

/// Apply all pending migrations.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
