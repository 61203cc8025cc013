//! Domain models for the quote admin.

pub mod quote;
pub mod session;
pub mod settings;

pub use quote::{DEFAULT_QUOTE_STATUS, NewQuote, Quote, QuoteChanges, QuoteInput, QuoteInsert};
pub use session::CurrentShop;
pub use settings::Settings;
