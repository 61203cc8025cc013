//! Storefront widget endpoint.
//!
//! The product page widget posts a quote request here directly from the
//! shopper's browser, so the route is public and CORS-enabled. The shop is
//! taken from the request body as sent by the widget.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, Method, header},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::instrument;

use crate::config::AdminConfig;
use crate::error::AppError;
use crate::models::{NewQuote, Quote};
use crate::services::quotes;
use crate::state::AppState;

use super::has_json_content_type;

/// Build the storefront router.
pub fn router(config: &AdminConfig) -> Router<AppState> {
    Router::new()
        .route("/create-quote", post(create_quote))
        .layer(cors_layer(&config.cors_origins))
}

/// CORS for the widget. An empty origin list allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Quote request posted by the storefront widget.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateQuoteRequest {
    pub shop_id: String,
    pub product_id: String,
    pub variant_id: String,
    pub title: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub message: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl From<CreateQuoteRequest> for NewQuote {
    fn from(req: CreateQuoteRequest) -> Self {
        Self {
            shop_id: req.shop_id,
            product_id: req.product_id,
            variant_id: req.variant_id,
            title: req.title,
            name: req.name,
            email: req.email,
            image: req.image,
            metadata: req.metadata,
            message: req.message,
            status: None,
        }
    }
}

/// Response for a created quote.
#[derive(Debug, Serialize)]
pub struct CreateQuoteResponse {
    pub success: bool,
}

/// Create a quote from the storefront widget.
///
/// POST /create-quote
#[instrument(skip(state, headers, body))]
async fn create_quote(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CreateQuoteResponse>, AppError> {
    if !has_json_content_type(&headers) {
        return Err(AppError::BadRequest("Invalid Content-Type".to_owned()));
    }

    let request: CreateQuoteRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;

    let quote = quotes::create_quote(state.store(), request.into()).await?;
    notify_merchant(&state, quote);

    Ok(Json(CreateQuoteResponse { success: true }))
}

/// Email the shop's notification address about a new quote.
///
/// Runs in the background. Failures are logged and never reach the shopper.
fn notify_merchant(state: &AppState, quote: Quote) {
    let Some(mailer) = state.mailer().cloned() else {
        return;
    };
    let store = state.store_handle();
    let admin_url = format!("{}/app/quotes", state.config().base_url.trim_end_matches('/'));

    tokio::spawn(async move {
        let settings = match quotes::get_settings(store.as_ref(), &quote.shop_id).await {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                tracing::debug!(shop = %quote.shop_id, "No notification email configured");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, shop = %quote.shop_id, "Failed to load settings");
                return;
            }
        };

        if let Err(e) = mailer
            .send_new_quote_notification(&settings.admin_email, &quote, &admin_url)
            .await
        {
            tracing::warn!(
                error = %e,
                quote_id = %quote.id,
                "Failed to send new quote notification"
            );
        }
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };

    use super::super::test_support::{SHOP, body_string, send, state};
    use super::*;
    use crate::db::QuoteStore;

    fn create_request(content_type: &str, body: &str) -> Request<Body> {
        Request::post("/create-quote")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    const BODY: &str = r#"{
        "shopId": "acme.myshopify.com",
        "productId": "gid://shopify/Product/1",
        "variantId": "gid://shopify/ProductVariant/2",
        "title": "Oak table",
        "name": "Jo",
        "email": "jo@example.com",
        "metadata": {"qty": 4}
    }"#;

    #[tokio::test]
    async fn test_create_quote_success() {
        let (state, store) = state();
        let response = send(
            crate::routes::app(state),
            create_request("application/json", BODY),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"success":true}"#);

        let stored = store.list_quotes(SHOP).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Jo");
        assert_eq!(stored[0].metadata, r#"{"qty":4}"#);
        assert_eq!(stored[0].status, "pending");
    }

    #[tokio::test]
    async fn test_create_quote_accepts_charset_parameter() {
        let (state, _) = state();
        let response = send(
            crate::routes::app(state),
            create_request("application/json; charset=utf-8", BODY),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_quote_wrong_content_type() {
        let (state, store) = state();
        let response = send(crate::routes::app(state), create_request("text/plain", BODY)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_string(response).await,
            r#"{"error":"Invalid Content-Type"}"#
        );
        assert!(store.list_quotes(SHOP).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_quote_missing_field_is_server_error() {
        let (state, _) = state();
        let response = send(
            crate::routes::app(state),
            create_request("application/json", r#"{"shopId": "acme.myshopify.com"}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "Internal server error");
    }

    #[tokio::test]
    async fn test_create_quote_cors_preflight() {
        let (state, _) = state();
        let response = send(
            crate::routes::app(state),
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/create-quote")
                .header(header::ORIGIN, "https://acme.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[test]
    fn test_request_into_new_quote_has_no_status() {
        let request: CreateQuoteRequest = serde_json::from_str(BODY).unwrap();
        let new_quote = NewQuote::from(request);
        assert_eq!(new_quote.shop_id, SHOP);
        assert!(new_quote.status.is_none());
        assert!(new_quote.image.is_none());
    }
}
