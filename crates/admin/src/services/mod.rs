//! Business logic services for the quote admin.
//!
//! # Services
//!
//! - `quotes` - Quote and settings data-access operations
//! - `session_token` - Shopify session token verification
//! - `email` - New quote notifications via SMTP

pub mod email;
pub mod quotes;
pub mod session_token;

pub use email::{EmailError, EmailService};
pub use quotes::{FieldErrors, QuoteError};
pub use session_token::{SessionTokenClaims, SessionTokenError, SessionTokenVerifier};
