//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! qb-cli migrate
//! ```
//!
//! # Migration Files
//!
//! Migrations live in `crates/admin/migrations/` and are embedded in the
//! admin crate at build time.

use quotebox_admin::db::{MIGRATOR, QuoteStore};

use super::{CliError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let store = connect().await?;

    tracing::info!("Running migrations...");
    MIGRATOR.run(store.pool()).await?;
    tracing::info!("Migrations complete!");

    store.close().await;
    Ok(())
}
