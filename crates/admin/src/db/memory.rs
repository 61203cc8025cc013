//! In-process [`QuoteStore`] for tests and `--in-memory` dev mode.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quotebox_core::{QuoteId, SettingsId};

use super::{QuoteStore, RepositoryError};
use crate::models::{Quote, QuoteChanges, QuoteInsert, Settings};

#[derive(Debug, Default)]
struct Tables {
    quotes: BTreeMap<QuoteId, Quote>,
    settings: HashMap<String, Settings>,
    next_quote_id: i32,
    next_settings_id: i32,
}

impl Tables {
    const fn next_quote_id(&mut self) -> QuoteId {
        self.next_quote_id += 1;
        QuoteId::new(self.next_quote_id)
    }

    const fn next_settings_id(&mut self) -> SettingsId {
        self.next_settings_id += 1;
        SettingsId::new(self.next_settings_id)
    }
}

/// Quote store held in memory. Data is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of settings rows, across all shops.
    pub async fn settings_count(&self) -> usize {
        self.tables.read().await.settings.len()
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    async fn insert_quote(&self, quote: QuoteInsert) -> Result<Quote, RepositoryError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_quote_id();
        let now = Utc::now();
        let stored = Quote {
            id,
            shop_id: quote.shop_id,
            product_id: quote.product_id,
            variant_id: quote.variant_id,
            title: quote.title,
            name: quote.name,
            email: quote.email,
            image: quote.image,
            metadata: quote.metadata,
            message: quote.message,
            status: quote.status,
            created_at: now,
            updated_at: now,
        };
        tables.quotes.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_quote(&self, id: QuoteId) -> Result<Option<Quote>, RepositoryError> {
        Ok(self.tables.read().await.quotes.get(&id).cloned())
    }

    async fn list_quotes(&self, shop_id: &str) -> Result<Vec<Quote>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut quotes: Vec<Quote> = tables
            .quotes
            .values()
            .filter(|q| q.shop_id == shop_id)
            .cloned()
            .collect();
        quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(quotes)
    }

    async fn update_quote(
        &self,
        id: QuoteId,
        changes: &QuoteChanges,
    ) -> Result<Quote, RepositoryError> {
        let mut tables = self.tables.write().await;
        let quote = tables.quotes.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        changes.apply_to(quote);
        quote.updated_at = Utc::now();
        Ok(quote.clone())
    }

    async fn delete_quote(&self, id: QuoteId) -> Result<(), RepositoryError> {
        self.tables
            .write()
            .await
            .quotes
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_settings(&self, shop_id: &str) -> Result<Option<Settings>, RepositoryError> {
        Ok(self.tables.read().await.settings.get(shop_id).cloned())
    }

    async fn insert_settings(
        &self,
        shop_id: &str,
        admin_email: &str,
    ) -> Result<Settings, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.settings.contains_key(shop_id) {
            return Err(RepositoryError::Conflict(
                "settings for shop already exists".to_owned(),
            ));
        }
        let id = tables.next_settings_id();
        let now = Utc::now();
        let settings = Settings {
            id,
            shop_id: shop_id.to_owned(),
            admin_email: admin_email.to_owned(),
            created_at: now,
            updated_at: now,
        };
        tables.settings.insert(shop_id.to_owned(), settings.clone());
        Ok(settings)
    }

    async fn update_settings(
        &self,
        shop_id: &str,
        admin_email: &str,
    ) -> Result<Settings, RepositoryError> {
        let mut tables = self.tables.write().await;
        let settings = tables
            .settings
            .get_mut(shop_id)
            .ok_or(RepositoryError::NotFound)?;
        admin_email.clone_into(&mut settings.admin_email);
        settings.updated_at = Utc::now();
        Ok(settings.clone())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
