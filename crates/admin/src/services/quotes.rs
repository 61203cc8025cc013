//! Quote and settings data-access operations.
//!
//! Every operation takes the injected [`QuoteStore`] as its first argument.
//! `create_quote` and `update_quote_status` enforce presence preconditions
//! before the store is touched. Everything else passes straight through.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use quotebox_core::QuoteId;

use crate::db::{QuoteStore, RepositoryError};
use crate::models::{
    DEFAULT_QUOTE_STATUS, NewQuote, Quote, QuoteChanges, QuoteInput, QuoteInsert, Settings,
};

/// Errors from quote operations.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// A required field was missing or empty.
    #[error("missing required field: {field}")]
    Precondition {
        /// The field that failed the check.
        field: &'static str,
    },

    /// Metadata could not be serialized.
    #[error("failed to serialize metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    /// The store failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Field name to message mapping returned by [`validate_quote`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Record a failure for `field`.
    pub fn insert(&mut self, field: &'static str, message: &'static str) {
        self.0.insert(field, message);
    }
}

fn is_missing(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

fn require(field: &'static str, value: &str) -> Result<(), QuoteError> {
    if value.is_empty() {
        return Err(QuoteError::Precondition { field });
    }
    Ok(())
}

/// Create a quote.
///
/// Metadata is stored as its JSON serialization. Absent optional fields are
/// stored as empty strings and status defaults to `"pending"`.
///
/// # Errors
///
/// Returns `QuoteError::Precondition` if `shop_id`, `product_id`,
/// `variant_id` or `title` is empty. The store is not called in that case.
#[tracing::instrument(skip(store, quote), fields(shop = %quote.shop_id))]
pub async fn create_quote(store: &dyn QuoteStore, quote: NewQuote) -> Result<Quote, QuoteError> {
    require("shopId", &quote.shop_id)?;
    require("productId", &quote.product_id)?;
    require("variantId", &quote.variant_id)?;
    require("title", &quote.title)?;

    let metadata = quote
        .metadata
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?
        .unwrap_or_default();

    let insert = QuoteInsert {
        shop_id: quote.shop_id,
        product_id: quote.product_id,
        variant_id: quote.variant_id,
        title: quote.title,
        name: quote.name.unwrap_or_default(),
        email: quote.email.unwrap_or_default(),
        image: quote.image.unwrap_or_default(),
        metadata,
        message: quote.message.unwrap_or_default(),
        status: quote
            .status
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_QUOTE_STATUS.to_owned()),
    };

    let created = store.insert_quote(insert).await?;
    tracing::info!(quote_id = %created.id, "Quote created");
    Ok(created)
}

/// Merge `changes` into a quote. No pre-read is done.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` (wrapped) if the quote doesn't exist.
pub async fn update_quote(
    store: &dyn QuoteStore,
    id: QuoteId,
    changes: &QuoteChanges,
) -> Result<Quote, QuoteError> {
    Ok(store.update_quote(id, changes).await?)
}

/// Set a quote's status. Any non-empty string is accepted.
///
/// # Errors
///
/// Returns `QuoteError::Precondition` for an empty status, or the store's
/// error if the update fails.
pub async fn update_quote_status(
    store: &dyn QuoteStore,
    id: QuoteId,
    status: &str,
) -> Result<Quote, QuoteError> {
    require("status", status)?;
    update_quote(store, id, &QuoteChanges::status(status)).await
}

/// Check the admin form's required fields.
///
/// Returns `None` when `title`, `productId` and `variantId` are all present.
#[must_use]
pub fn validate_quote(input: &QuoteInput) -> Option<FieldErrors> {
    let mut errors = FieldErrors::default();
    if is_missing(input.title.as_deref()) {
        errors.insert("title", "Title is required");
    }
    if is_missing(input.product_id.as_deref()) {
        errors.insert("productId", "Product is required");
    }
    if is_missing(input.variant_id.as_deref()) {
        errors.insert("variantId", "Variant is required");
    }

    if errors.is_empty() { None } else { Some(errors) }
}

/// Look up a quote.
///
/// # Errors
///
/// Returns the store's error if the lookup fails.
pub async fn get_quote(store: &dyn QuoteStore, id: QuoteId) -> Result<Option<Quote>, QuoteError> {
    Ok(store.find_quote(id).await?)
}

/// All quotes for a shop, newest first.
///
/// # Errors
///
/// Returns the store's error if the query fails.
pub async fn get_quotes(store: &dyn QuoteStore, shop_id: &str) -> Result<Vec<Quote>, QuoteError> {
    Ok(store.list_quotes(shop_id).await?)
}

/// Hard-delete a quote.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` (wrapped) if the quote doesn't exist.
pub async fn delete_quote(store: &dyn QuoteStore, id: QuoteId) -> Result<(), QuoteError> {
    store.delete_quote(id).await?;
    tracing::info!(quote_id = %id, "Quote deleted");
    Ok(())
}

/// Set a shop's notification email, creating the settings row if needed.
///
/// This reads then writes in two store calls. Two concurrent first-time
/// saves for one shop can race, and the loser gets a `Conflict`.
///
/// # Errors
///
/// Returns the store's error if either call fails.
pub async fn update_settings(
    store: &dyn QuoteStore,
    shop_id: &str,
    admin_email: &str,
) -> Result<Settings, QuoteError> {
    let settings = match store.find_settings(shop_id).await? {
        Some(_) => store.update_settings(shop_id, admin_email).await?,
        None => store.insert_settings(shop_id, admin_email).await?,
    };
    Ok(settings)
}

/// A shop's settings, if saved.
///
/// # Errors
///
/// Returns the store's error if the lookup fails.
pub async fn get_settings(
    store: &dyn QuoteStore,
    shop_id: &str,
) -> Result<Option<Settings>, QuoteError> {
    Ok(store.find_settings(shop_id).await?)
}
