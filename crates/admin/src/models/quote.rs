//! Quote domain types.
//!
//! `Quote` is the stored record. `NewQuote` and `QuoteChanges` are the inputs
//! to the create and merge-update operations, and `QuoteInsert` is the fully
//! defaulted row handed to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quotebox_core::QuoteId;

/// Status assigned to quotes created without an explicit status.
pub const DEFAULT_QUOTE_STATUS: &str = "pending";

/// A stored request-for-quote record.
///
/// Optional text columns hold the empty string rather than `NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: QuoteId,
    /// Shop domain that owns the quote.
    pub shop_id: String,
    pub product_id: String,
    pub variant_id: String,
    pub title: String,
    /// Requester name.
    pub name: String,
    /// Requester email, stored as entered.
    pub email: String,
    /// Product image URL.
    pub image: String,
    /// Serialized JSON blob. Never parsed by the app.
    pub metadata: String,
    pub message: String,
    /// Free-form status. See [`DEFAULT_QUOTE_STATUS`].
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input to `create_quote`.
#[derive(Debug, Clone, Default)]
pub struct NewQuote {
    pub shop_id: String,
    pub product_id: String,
    pub variant_id: String,
    pub title: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub message: Option<String>,
    pub status: Option<String>,
}

/// Row values ready for insertion, every column resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteInsert {
    pub shop_id: String,
    pub product_id: String,
    pub variant_id: String,
    pub title: String,
    pub name: String,
    pub email: String,
    pub image: String,
    pub metadata: String,
    pub message: String,
    pub status: String,
}

/// Partial update for `update_quote`. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteChanges {
    pub shop_id: Option<String>,
    pub product_id: Option<String>,
    pub variant_id: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub metadata: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
}

impl QuoteChanges {
    /// Changes that only set the status.
    #[must_use]
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    /// Apply these changes to an in-memory quote.
    pub fn apply_to(&self, quote: &mut Quote) {
        let fields = [
            (&self.shop_id, &mut quote.shop_id),
            (&self.product_id, &mut quote.product_id),
            (&self.variant_id, &mut quote.variant_id),
            (&self.title, &mut quote.title),
            (&self.name, &mut quote.name),
            (&self.email, &mut quote.email),
            (&self.image, &mut quote.image),
            (&self.metadata, &mut quote.metadata),
            (&self.message, &mut quote.message),
            (&self.status, &mut quote.status),
        ];
        for (change, column) in fields {
            if let Some(value) = change {
                column.clone_from(value);
            }
        }
    }
}

/// Quote fields submitted by the admin create form (form or JSON).
///
/// Every field is optional so that missing values surface as validation
/// errors instead of extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteInput {
    pub title: Option<String>,
    pub product_id: Option<String>,
    pub variant_id: Option<String>,
    pub image: Option<String>,
    pub metadata: Option<String>,
    pub message: Option<String>,
}

impl QuoteInput {
    /// Build a `NewQuote` for the given shop.
    ///
    /// A non-empty metadata string is kept as a JSON string value, so it is
    /// stored quoted like any other serialized metadata.
    #[must_use]
    pub fn into_new_quote(self, shop_id: impl Into<String>) -> NewQuote {
        NewQuote {
            shop_id: shop_id.into(),
            product_id: self.product_id.unwrap_or_default(),
            variant_id: self.variant_id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            image: self.image,
            metadata: self
                .metadata
                .filter(|m| !m.is_empty())
                .map(serde_json::Value::String),
            message: self.message,
            ..NewQuote::default()
        }
    }
}
