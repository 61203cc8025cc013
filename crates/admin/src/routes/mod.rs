//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (store ping)
//!
//! # Storefront widget (public, CORS)
//! POST /create-quote           - Create a quote from the product page
//!
//! # Admin API (session token)
//! GET  /quotes                 - {quotes, shop}
//! GET  /quotes/{id}            - Single quote
//! POST /quotes/{id}/status     - Set a quote's status
//! POST /quotes/delete          - Delete a quote, then redirect to /app/quotes
//!
//! # Admin pages (session token)
//! GET  /app/quotes             - Quote list and create form
//! POST /app/quotes             - Create a quote
//! GET  /app/settings           - Notification settings
//! POST /app/settings           - Save notification settings
//! ```

pub mod health;
pub mod quotes;
pub mod settings;
pub mod storefront;

use axum::{
    Form, Json, Router,
    extract::{FromRequest, Request},
    http::{HeaderMap, header},
};
use serde::{Deserialize, de::DeserializeOwned};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::ID_TOKEN_PARAM;
use crate::state::AppState;

/// All routes, without state.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(storefront::router(state.config()))
        .merge(quotes::router())
        .merge(settings::router())
}

/// The full application with request tracing, ready to serve.
pub fn app(state: AppState) -> Router {
    routes(&state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri().path(),
                        shop = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Returns true if the request body is declared as JSON.
///
/// Only the media type is compared. Parameters such as `charset` are ignored.
pub(crate) fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
}

/// The session token passed on the query string of embedded page loads.
#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub id_token: Option<String>,
}

impl TokenQuery {
    /// `path` with the session token carried over, so the next page load
    /// authenticates the same way.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        self.url_with(path, &[])
    }

    /// Like [`TokenQuery::url`] with extra query pairs.
    #[must_use]
    pub fn url_with(&self, path: &str, pairs: &[(&str, &str)]) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in pairs {
            query.append_pair(key, value);
        }
        if let Some(token) = self.id_token.as_deref().filter(|t| !t.is_empty()) {
            query.append_pair(ID_TOKEN_PARAM, token);
        }
        let query = query.finish();
        if query.is_empty() {
            path.to_owned()
        } else {
            format!("{path}?{query}")
        }
    }
}

/// Body extractor accepting either JSON or a urlencoded form.
///
/// The admin pages post forms while App Bridge clients post JSON. The
/// handler learns which one arrived so it can answer in kind.
#[derive(Debug)]
pub struct JsonOrForm<T> {
    pub value: T,
    pub is_json: bool,
}

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if has_json_content_type(req.headers()) {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self {
                value,
                is_json: true,
            })
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self {
                value,
                is_json: false,
            })
        }
    }
}
