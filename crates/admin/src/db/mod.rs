//! Quote and settings storage.
//!
//! # Database: `quotebox` schema
//!
//! ## Tables
//!
//! - `quote` - Request-for-quote records, one per storefront submission
//! - `settings` - Per-shop settings (unique on `shop_id`)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p quotebox-cli -- migrate
//! ```
//!
//! The HTTP layer only sees the [`QuoteStore`] trait. [`PgStore`] backs it in
//! production and [`MemoryStore`] backs tests and `--in-memory` dev mode.

pub mod memory;
pub mod postgres;
pub mod quotes;
pub mod settings;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use quotebox_core::QuoteId;

use crate::models::{Quote, QuoteChanges, QuoteInsert, Settings};

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use quotes::QuoteRepository;
pub use settings::SettingsRepository;

/// Embedded migrations for the `quotebox` schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., a second settings row for a shop).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Row-level storage for quotes and settings.
///
/// Implementations do no validation. Required-field checks live in
/// [`crate::services::quotes`].
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Insert a quote and return the stored row.
    async fn insert_quote(&self, quote: QuoteInsert) -> Result<Quote, RepositoryError>;

    /// Look up a quote by id.
    async fn find_quote(&self, id: QuoteId) -> Result<Option<Quote>, RepositoryError>;

    /// All quotes for a shop, newest first.
    async fn list_quotes(&self, shop_id: &str) -> Result<Vec<Quote>, RepositoryError>;

    /// Merge `changes` into the quote and refresh `updated_at`.
    ///
    /// Returns [`RepositoryError::NotFound`] if no row has this id.
    async fn update_quote(
        &self,
        id: QuoteId,
        changes: &QuoteChanges,
    ) -> Result<Quote, RepositoryError>;

    /// Hard-delete a quote.
    ///
    /// Returns [`RepositoryError::NotFound`] if no row has this id.
    async fn delete_quote(&self, id: QuoteId) -> Result<(), RepositoryError>;

    /// Look up the settings row for a shop.
    async fn find_settings(&self, shop_id: &str) -> Result<Option<Settings>, RepositoryError>;

    /// Create the settings row for a shop.
    ///
    /// Returns [`RepositoryError::Conflict`] if the shop already has one.
    async fn insert_settings(
        &self,
        shop_id: &str,
        admin_email: &str,
    ) -> Result<Settings, RepositoryError>;

    /// Update the settings row for a shop.
    ///
    /// Returns [`RepositoryError::NotFound`] if the shop has none.
    async fn update_settings(
        &self,
        shop_id: &str,
        admin_email: &str,
    ) -> Result<Settings, RepositoryError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Release backing resources. Called once after graceful shutdown.
    async fn close(&self) {}
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique violation to [`RepositoryError::Conflict`].
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
