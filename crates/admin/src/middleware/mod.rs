//! HTTP middleware and extractors.

pub mod auth;

pub use auth::{ID_TOKEN_PARAM, RequireShopSession, ShopSessionRejection};
