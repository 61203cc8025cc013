//! Subcommand implementations.

pub mod migrate;
pub mod quotes;
pub mod settings;

use secrecy::SecretString;
use thiserror::Error;

use quotebox_admin::db::{self, PgStore};
use quotebox_admin::services::QuoteError;
use quotebox_core::{EmailError, ShopDomainError};

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

    /// Quote operation failed.
    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    /// Shop argument is not a shop domain.
    #[error("Invalid shop: {0}")]
    InvalidShop(#[from] ShopDomainError),

    /// Email argument is not an email address.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Read the database URL the same way the server does.
fn database_url() -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();

    std::env::var("QUOTEBOX_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("QUOTEBOX_DATABASE_URL"))
}

/// Open the `PostgreSQL` store.
async fn connect() -> Result<PgStore, CliError> {
    let url = database_url()?;
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&url).await?;
    Ok(PgStore::new(pool))
}
