//! Quotebox admin library.
//!
//! Request-for-quote management for Shopify shops: the storefront widget
//! endpoint, the embedded admin pages, and the JSON API behind them.
//!
//! The binary in `main.rs` wires these modules to a `PostgreSQL` store. Tests
//! build the same router over [`db::MemoryStore`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::AdminConfig;
pub use routes::app;
pub use state::AppState;
