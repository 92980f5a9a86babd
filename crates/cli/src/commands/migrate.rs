//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! accounts-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migrations live in `crates/server/migrations/` and are embedded into the
//! binary at build time.

use accounts_server::db;

use super::{CliError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running accounts migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Accounts migrations complete!");
    Ok(())
}
