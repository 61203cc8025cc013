//! Authenticated shop identity.

use serde::Serialize;

use quotebox_core::ShopDomain;

/// The shop behind a verified session token.
///
/// Extracted per request from the Shopify session token; nothing is stored
/// server side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentShop {
    /// Shop domain taken from the token's `dest` claim.
    pub shop: ShopDomain,
    /// Shopify user ID (`sub` claim), when present.
    pub user_id: Option<String>,
    /// Shopify session ID (`sid` claim), when present.
    pub session_id: Option<String>,
}

impl CurrentShop {
    /// The tenant key used for quote and settings rows.
    #[must_use]
    pub fn shop_id(&self) -> &str {
        self.shop.as_str()
    }
}
