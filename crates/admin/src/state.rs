//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::db::QuoteStore;
use crate::services::{EmailService, SessionTokenVerifier};

/// Application state shared across all handlers.
///
/// Read-only after startup. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: Arc<dyn QuoteStore>,
    verifier: SessionTokenVerifier,
    mailer: Option<EmailService>,
}

impl AppState {
    /// Build the state from loaded config and an opened store.
    ///
    /// The session token verifier is derived from the Shopify app config.
    /// Notification email is enabled only when a mailer is passed.
    #[must_use]
    pub fn new(
        config: AdminConfig,
        store: Arc<dyn QuoteStore>,
        mailer: Option<EmailService>,
    ) -> Self {
        let verifier = SessionTokenVerifier::new(&config.shopify);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                verifier,
                mailer,
            }),
        }
    }

    /// Get the application configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get the quote store.
    #[must_use]
    pub fn store(&self) -> &dyn QuoteStore {
        self.inner.store.as_ref()
    }

    /// A shared handle to the quote store, for spawned tasks.
    #[must_use]
    pub fn store_handle(&self) -> Arc<dyn QuoteStore> {
        Arc::clone(&self.inner.store)
    }

    /// Get the session token verifier.
    #[must_use]
    pub fn verifier(&self) -> &SessionTokenVerifier {
        &self.inner.verifier
    }

    /// Get the email service, if SMTP is configured.
    #[must_use]
    pub fn mailer(&self) -> Option<&EmailService> {
        self.inner.mailer.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("mailer", &self.inner.mailer.is_some())
            .finish_non_exhaustive()
    }
}
