//! Settings repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use quotebox_core::SettingsId;

use super::{RepositoryError, map_unique_violation};
use crate::models::Settings;

/// Internal row type for `PostgreSQL` settings queries.
#[derive(Debug, sqlx::FromRow)]
struct SettingsRow {
    id: i32,
    shop_id: String,
    admin_email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SettingsRow> for Settings {
    fn from(row: SettingsRow) -> Self {
        Self {
            id: SettingsId::new(row.id),
            shop_id: row.shop_id,
            admin_email: row.admin_email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for per-shop settings.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the settings row for a shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_shop(&self, shop_id: &str) -> Result<Option<Settings>, RepositoryError> {
        let row = sqlx::query_as::<_, SettingsRow>(
            r"
            SELECT id, shop_id, admin_email, created_at, updated_at
            FROM quotebox.settings
            WHERE shop_id = $1
            ",
        )
        .bind(shop_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create the settings row for a shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the shop already has settings.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        shop_id: &str,
        admin_email: &str,
    ) -> Result<Settings, RepositoryError> {
        let row = sqlx::query_as::<_, SettingsRow>(
            r"
            INSERT INTO quotebox.settings (shop_id, admin_email)
            VALUES ($1, $2)
            RETURNING id, shop_id, admin_email, created_at, updated_at
            ",
        )
        .bind(shop_id)
        .bind(admin_email)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "settings for shop"))?;

        Ok(row.into())
    }

    /// Update the notification email for a shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shop has no settings.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_admin_email(
        &self,
        shop_id: &str,
        admin_email: &str,
    ) -> Result<Settings, RepositoryError> {
        let row = sqlx::query_as::<_, SettingsRow>(
            r"
            UPDATE quotebox.settings
            SET admin_email = $2, updated_at = NOW()
            WHERE shop_id = $1
            RETURNING id, shop_id, admin_email, created_at, updated_at
            ",
        )
        .bind(shop_id)
        .bind(admin_email)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
