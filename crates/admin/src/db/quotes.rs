//! Quote repository for database operations.
//!
//! Queries are checked at runtime (`sqlx::query_as`) so the crate builds
//! without a live database.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use quotebox_core::QuoteId;

use super::RepositoryError;
use crate::models::{Quote, QuoteChanges, QuoteInsert};

// =============================================================================
// Internal Row Types
// =============================================================================

const QUOTE_COLUMNS: &str = "id, shop_id, product_id, variant_id, title, name, email, image, \
                             metadata, message, status, created_at, updated_at";

/// Internal row type for `PostgreSQL` quote queries.
#[derive(Debug, sqlx::FromRow)]
struct QuoteRow {
    id: i32,
    shop_id: String,
    product_id: String,
    variant_id: String,
    title: String,
    name: String,
    email: String,
    image: String,
    metadata: String,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<QuoteRow> for Quote {
    fn from(row: QuoteRow) -> Self {
        Self {
            id: QuoteId::new(row.id),
            shop_id: row.shop_id,
            product_id: row.product_id,
            variant_id: row.variant_id,
            title: row.title,
            name: row.name,
            email: row.email,
            image: row.image,
            metadata: row.metadata,
            message: row.message,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for quote database operations.
pub struct QuoteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> QuoteRepository<'a> {
    /// Create a new quote repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a quote.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, quote: &QuoteInsert) -> Result<Quote, RepositoryError> {
        let sql = format!(
            "INSERT INTO quotebox.quote
                (shop_id, product_id, variant_id, title, name, email, image,
                 metadata, message, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {QUOTE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, QuoteRow>(&sql)
            .bind(&quote.shop_id)
            .bind(&quote.product_id)
            .bind(&quote.variant_id)
            .bind(&quote.title)
            .bind(&quote.name)
            .bind(&quote.email)
            .bind(&quote.image)
            .bind(&quote.metadata)
            .bind(&quote.message)
            .bind(&quote.status)
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }

    /// Get a quote by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: QuoteId) -> Result<Option<Quote>, RepositoryError> {
        let sql = format!("SELECT {QUOTE_COLUMNS} FROM quotebox.quote WHERE id = $1");
        let row = sqlx::query_as::<_, QuoteRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// List a shop's quotes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_shop(&self, shop_id: &str) -> Result<Vec<Quote>, RepositoryError> {
        let sql = format!(
            "SELECT {QUOTE_COLUMNS} FROM quotebox.quote
             WHERE shop_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, QuoteRow>(&sql)
            .bind(shop_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Merge the set fields of `changes` into a quote.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the quote doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: QuoteId,
        changes: &QuoteChanges,
    ) -> Result<Quote, RepositoryError> {
        let sql = format!(
            "UPDATE quotebox.quote SET
                shop_id = COALESCE($2, shop_id),
                product_id = COALESCE($3, product_id),
                variant_id = COALESCE($4, variant_id),
                title = COALESCE($5, title),
                name = COALESCE($6, name),
                email = COALESCE($7, email),
                image = COALESCE($8, image),
                metadata = COALESCE($9, metadata),
                message = COALESCE($10, message),
                status = COALESCE($11, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {QUOTE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, QuoteRow>(&sql)
            .bind(id)
            .bind(changes.shop_id.as_deref())
            .bind(changes.product_id.as_deref())
            .bind(changes.variant_id.as_deref())
            .bind(changes.title.as_deref())
            .bind(changes.name.as_deref())
            .bind(changes.email.as_deref())
            .bind(changes.image.as_deref())
            .bind(changes.metadata.as_deref())
            .bind(changes.message.as_deref())
            .bind(changes.status.as_deref())
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a quote.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the quote doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: QuoteId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM quotebox.quote WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
