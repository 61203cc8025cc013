//! Shop domain type.
//!
//! The shop domain (`example.myshopify.com`) is the tenant key that scopes
//! every quote and settings row.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ShopDomain`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopDomainError {
    /// The input is empty after trimming.
    #[error("shop domain cannot be empty")]
    Empty,
    /// The host is not under a Shopify admin domain.
    #[error("shop domain must end with .myshopify.com: {0}")]
    WrongSuffix(String),
    /// The store handle contains characters Shopify does not allow.
    #[error("invalid store handle in shop domain: {0}")]
    InvalidHandle(String),
}

/// Domain suffixes Shopify issues for shop admin hosts.
const SHOP_SUFFIXES: &[&str] = &[".myshopify.com", ".myshopify.io"];

/// A validated, lowercase `*.myshopify.com` shop domain.
///
/// ```
/// use quotebox_core::ShopDomain;
///
/// let shop = ShopDomain::parse("Acme-Tools.myshopify.com").unwrap();
/// assert_eq!(shop.as_str(), "acme-tools.myshopify.com");
/// assert_eq!(shop.handle(), "acme-tools");
///
/// assert!(ShopDomain::parse("acme.example.com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ShopDomain(String);

impl ShopDomain {
    /// Parse a bare shop host.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is empty, is not a `myshopify` host, or
    /// the store handle is not `[a-z0-9][a-z0-9-_]*`.
    pub fn parse(s: &str) -> Result<Self, ShopDomainError> {
        let host = s.trim().to_lowercase();
        if host.is_empty() {
            return Err(ShopDomainError::Empty);
        }

        let handle = SHOP_SUFFIXES
            .iter()
            .find_map(|suffix| host.strip_suffix(suffix))
            .ok_or_else(|| ShopDomainError::WrongSuffix(host.clone()))?;

        let mut chars = handle.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ShopDomainError::InvalidHandle(host));
        }

        Ok(Self(host))
    }

    /// Returns the full shop domain.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the store handle (the part before `.myshopify.com`).
    #[must_use]
    pub fn handle(&self) -> &str {
        self.0.split('.').next().unwrap_or_default()
    }

    /// Consumes the `ShopDomain` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ShopDomain {
    type Err = ShopDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShopDomain {
    type Error = ShopDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ShopDomain> for String {
    fn from(shop: ShopDomain) -> Self {
        shop.0
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
