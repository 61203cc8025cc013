//! Session token extractor for admin routes.
//!
//! Admin requests carry a Shopify session token either as
//! `Authorization: Bearer <token>` (App Bridge fetches) or as the `id_token`
//! query parameter (embedded document loads).

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::models::CurrentShop;
use crate::state::AppState;

/// Query parameter App Bridge uses for the session token on page loads.
pub const ID_TOKEN_PARAM: &str = "id_token";

/// Extractor that requires a valid session token.
///
/// # Example
///
/// ```rust,ignore
/// async fn list(RequireShopSession(session): RequireShopSession) -> impl IntoResponse {
///     format!("Hello, {}!", session.shop)
/// }
/// ```
pub struct RequireShopSession(pub CurrentShop);

/// Error returned when a request has no valid session token.
#[derive(Debug)]
pub enum ShopSessionRejection {
    /// Plain text 401 (for admin pages).
    Page,
    /// JSON 401 (for API requests).
    Api,
}

impl ShopSessionRejection {
    fn for_path(path: &str) -> Self {
        if path.starts_with("/app") {
            Self::Page
        } else {
            Self::Api
        }
    }
}

impl IntoResponse for ShopSessionRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Page => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            Self::Api => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireShopSession
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ShopSessionRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let rejection = || ShopSessionRejection::for_path(parts.uri.path());

        let Some(token) = bearer_token(parts).or_else(|| query_token(parts)) else {
            tracing::debug!(path = %parts.uri.path(), "No session token on request");
            return Err(rejection());
        };

        match state.verifier().verify(&token) {
            Ok(session) => {
                tracing::Span::current().record("shop", session.shop_id());
                crate::error::set_sentry_shop(session.shop_id());
                Ok(Self(session))
            }
            // Expired tokens are routine, App Bridge fetches a new one
            Err(e) if e.is_expired() => {
                tracing::debug!(path = %parts.uri.path(), "Expired session token");
                Err(rejection())
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %parts.uri.path(), "Rejected session token");
                Err(rejection())
            }
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_owned())
}

/// The `id_token` query parameter, if present.
#[must_use]
pub fn query_token(parts: &Parts) -> Option<String> {
    let query = parts.uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == ID_TOKEN_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
