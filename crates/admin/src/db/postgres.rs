//! `PostgreSQL`-backed [`QuoteStore`].

use async_trait::async_trait;
use sqlx::PgPool;

use quotebox_core::QuoteId;

use super::{QuoteRepository, QuoteStore, RepositoryError, SettingsRepository};
use crate::models::{Quote, QuoteChanges, QuoteInsert, Settings};

/// Quote store over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for migrations.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn quotes(&self) -> QuoteRepository<'_> {
        QuoteRepository::new(&self.pool)
    }

    fn settings(&self) -> SettingsRepository<'_> {
        SettingsRepository::new(&self.pool)
    }
}

#[async_trait]
impl QuoteStore for PgStore {
    async fn insert_quote(&self, quote: QuoteInsert) -> Result<Quote, RepositoryError> {
        self.quotes().create(&quote).await
    }

    async fn find_quote(&self, id: QuoteId) -> Result<Option<Quote>, RepositoryError> {
        self.quotes().get_by_id(id).await
    }

    async fn list_quotes(&self, shop_id: &str) -> Result<Vec<Quote>, RepositoryError> {
        self.quotes().list_by_shop(shop_id).await
    }

    async fn update_quote(
        &self,
        id: QuoteId,
        changes: &QuoteChanges,
    ) -> Result<Quote, RepositoryError> {
        self.quotes().update(id, changes).await
    }

    async fn delete_quote(&self, id: QuoteId) -> Result<(), RepositoryError> {
        self.quotes().delete(id).await
    }

    async fn find_settings(&self, shop_id: &str) -> Result<Option<Settings>, RepositoryError> {
        self.settings().get_by_shop(shop_id).await
    }

    async fn insert_settings(
        &self,
        shop_id: &str,
        admin_email: &str,
    ) -> Result<Settings, RepositoryError> {
        self.settings().create(shop_id, admin_email).await
    }

    async fn update_settings(
        &self,
        shop_id: &str,
        admin_email: &str,
    ) -> Result<Settings, RepositoryError> {
        self.settings().update_admin_email(shop_id, admin_email).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
