//! Admin quote routes: JSON API and the quotes page.
//!
//! Every route here requires a session token. The shop always comes from the
//! token, and single-quote routes answer 404 for another shop's quote.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quotebox_core::QuoteId;

use crate::error::AppError;
use crate::middleware::RequireShopSession;
use crate::models::{CurrentShop, Quote, QuoteInput};
use crate::services::FieldErrors;
use crate::services::quotes;
use crate::state::AppState;

use super::{JsonOrForm, TokenQuery};

/// Build the quotes router.
pub fn router() -> Router<AppState> {
    Router::new()
        // API
        .route("/quotes", get(list_quotes))
        .route("/quotes/delete", post(delete_quote))
        .route("/quotes/{id}", get(get_quote))
        .route("/quotes/{id}/status", post(update_status))
        // Page
        .route("/app/quotes", get(quotes_page).post(create_quote))
}

// =============================================================================
// API Types
// =============================================================================

/// Response for the quote list.
#[derive(Debug, Serialize)]
pub struct QuotesResponse {
    pub quotes: Vec<Quote>,
    pub shop: String,
}

/// Request to delete a quote.
#[derive(Debug, Deserialize)]
pub struct DeleteQuoteRequest {
    pub id: QuoteId,
}

/// Request to change a quote's status.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Quote row for template rendering.
#[derive(Debug, Clone)]
pub struct QuoteView {
    pub id: i32,
    pub title: String,
    pub product_id: String,
    pub variant_id: String,
    pub message: String,
    pub status: String,
    pub created_at: String,
}

impl From<&Quote> for QuoteView {
    fn from(quote: &Quote) -> Self {
        Self {
            id: quote.id.as_i32(),
            title: quote.title.clone(),
            product_id: quote.product_id.clone(),
            variant_id: quote.variant_id.clone(),
            message: quote.message.clone(),
            status: quote.status.clone(),
            created_at: quote.created_at.format("%b %d, %Y").to_string(),
        }
    }
}

/// Values echoed back into the create form.
#[derive(Debug, Clone, Default)]
pub struct QuoteFormView {
    pub title: String,
    pub product_id: String,
    pub variant_id: String,
    pub image: String,
    pub metadata: String,
    pub message: String,
}

impl From<&QuoteInput> for QuoteFormView {
    fn from(input: &QuoteInput) -> Self {
        let value = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            title: value(&input.title),
            product_id: value(&input.product_id),
            variant_id: value(&input.variant_id),
            image: value(&input.image),
            metadata: value(&input.metadata),
            message: value(&input.message),
        }
    }
}

/// Quotes page template.
#[derive(Template, WebTemplate)]
#[template(path = "quotes/index.html")]
pub struct QuotesTemplate {
    pub shop: String,
    pub current_path: String,
    pub quotes_url: String,
    pub settings_url: String,
    pub form_action: String,
    pub delete_action: String,
    pub token_suffix: String,
    pub quotes: Vec<QuoteView>,
    pub form: QuoteFormView,
    pub title_error: Option<&'static str>,
    pub product_error: Option<&'static str>,
    pub variant_error: Option<&'static str>,
}

impl QuotesTemplate {
    fn new(session: &CurrentShop, token: &TokenQuery, quotes: &[Quote]) -> Self {
        let token_suffix = token.url("");
        Self {
            shop: session.shop_id().to_owned(),
            current_path: "/app/quotes".to_owned(),
            quotes_url: token.url("/app/quotes"),
            settings_url: token.url("/app/settings"),
            form_action: token.url("/app/quotes"),
            delete_action: token.url("/quotes/delete"),
            token_suffix,
            quotes: quotes.iter().map(QuoteView::from).collect(),
            form: QuoteFormView::default(),
            title_error: None,
            product_error: None,
            variant_error: None,
        }
    }

    fn with_errors(mut self, input: &QuoteInput, errors: &FieldErrors) -> Self {
        self.form = QuoteFormView::from(input);
        self.title_error = errors.get("title");
        self.product_error = errors.get("productId");
        self.variant_error = errors.get("variantId");
        self
    }
}

// =============================================================================
// API Routes
// =============================================================================

/// Load a quote, treating another shop's quote as missing.
async fn find_shop_quote(
    state: &AppState,
    session: &CurrentShop,
    id: QuoteId,
) -> Result<Quote, AppError> {
    quotes::get_quote(state.store(), id)
        .await?
        .filter(|quote| quote.shop_id == session.shop_id())
        .ok_or_else(|| AppError::NotFound(format!("quote {id}")))
}

/// List the shop's quotes.
///
/// GET /quotes
#[instrument(skip(state, session))]
async fn list_quotes(
    State(state): State<AppState>,
    RequireShopSession(session): RequireShopSession,
) -> Result<Json<QuotesResponse>, AppError> {
    let quotes = quotes::get_quotes(state.store(), session.shop_id()).await?;
    Ok(Json(QuotesResponse {
        quotes,
        shop: session.shop.into_inner(),
    }))
}

/// Get a single quote.
///
/// GET /quotes/{id}
#[instrument(skip(state, session))]
async fn get_quote(
    State(state): State<AppState>,
    RequireShopSession(session): RequireShopSession,
    Path(id): Path<QuoteId>,
) -> Result<Json<Quote>, AppError> {
    Ok(Json(find_shop_quote(&state, &session, id).await?))
}

/// Set a quote's status.
///
/// POST /quotes/{id}/status
#[instrument(skip(state, session, token, body))]
async fn update_status(
    State(state): State<AppState>,
    RequireShopSession(session): RequireShopSession,
    Path(id): Path<QuoteId>,
    Query(token): Query<TokenQuery>,
    body: JsonOrForm<UpdateStatusRequest>,
) -> Result<Response, AppError> {
    find_shop_quote(&state, &session, id).await?;
    let quote = quotes::update_quote_status(state.store(), id, &body.value.status).await?;

    if body.is_json {
        Ok(Json(quote).into_response())
    } else {
        Ok(Redirect::to(&token.url("/app/quotes")).into_response())
    }
}

/// Delete a quote, then send the client back to the quotes page.
///
/// POST /quotes/delete
#[instrument(skip(state, session, token, body))]
async fn delete_quote(
    State(state): State<AppState>,
    RequireShopSession(session): RequireShopSession,
    Query(token): Query<TokenQuery>,
    body: JsonOrForm<DeleteQuoteRequest>,
) -> Result<Redirect, AppError> {
    let id = body.value.id;
    find_shop_quote(&state, &session, id).await?;
    quotes::delete_quote(state.store(), id).await?;
    Ok(Redirect::to(&token.url("/app/quotes")))
}

// =============================================================================
// Page Routes
// =============================================================================

/// Render the quotes page.
///
/// GET /app/quotes
#[instrument(skip(state, session, token))]
async fn quotes_page(
    State(state): State<AppState>,
    RequireShopSession(session): RequireShopSession,
    Query(token): Query<TokenQuery>,
) -> Result<QuotesTemplate, AppError> {
    let quotes = quotes::get_quotes(state.store(), session.shop_id()).await?;
    Ok(QuotesTemplate::new(&session, &token, &quotes))
}

/// Create a quote from the admin form.
///
/// POST /app/quotes
#[instrument(skip(state, session, token, body))]
async fn create_quote(
    State(state): State<AppState>,
    RequireShopSession(session): RequireShopSession,
    Query(token): Query<TokenQuery>,
    body: JsonOrForm<QuoteInput>,
) -> Result<Response, AppError> {
    let JsonOrForm { value: input, is_json } = body;

    if let Some(errors) = quotes::validate_quote(&input) {
        if is_json {
            return Err(AppError::Validation(errors));
        }
        let quotes = quotes::get_quotes(state.store(), session.shop_id()).await?;
        let page = QuotesTemplate::new(&session, &token, &quotes)
            .with_errors(&input, &errors);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    quotes::create_quote(state.store(), input.into_new_quote(session.shop_id())).await?;
    Ok(Redirect::to(&token.url("/app/quotes")).into_response())
}
