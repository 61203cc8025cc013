//! Notification settings page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use quotebox_core::Email;

use crate::error::AppError;
use crate::middleware::RequireShopSession;
use crate::models::CurrentShop;
use crate::services::FieldErrors;
use crate::services::quotes;
use crate::state::AppState;

use super::{JsonOrForm, TokenQuery};

const EMAIL_ERROR: &str = "Enter a valid email address";

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new().route("/app/settings", get(settings_page).post(save_settings))
}

/// Query parameters for the settings page.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsQuery {
    pub saved: Option<String>,
}

/// Settings form data.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsForm {
    pub admin_email: String,
}

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "settings/index.html")]
pub struct SettingsTemplate {
    pub shop: String,
    pub current_path: String,
    pub quotes_url: String,
    pub settings_url: String,
    pub form_action: String,
    pub admin_email: String,
    pub email_error: Option<&'static str>,
    pub saved: bool,
}

impl SettingsTemplate {
    fn new(session: &CurrentShop, token: &TokenQuery, admin_email: String) -> Self {
        Self {
            shop: session.shop_id().to_owned(),
            current_path: "/app/settings".to_owned(),
            quotes_url: token.url("/app/quotes"),
            settings_url: token.url("/app/settings"),
            form_action: token.url("/app/settings"),
            admin_email,
            email_error: None,
            saved: false,
        }
    }
}

/// Render the settings page.
///
/// GET /app/settings
#[instrument(skip(state, session, token, query))]
async fn settings_page(
    State(state): State<AppState>,
    RequireShopSession(session): RequireShopSession,
    Query(token): Query<TokenQuery>,
    Query(query): Query<SettingsQuery>,
) -> Result<SettingsTemplate, AppError> {
    let admin_email = quotes::get_settings(state.store(), session.shop_id())
        .await?
        .map(|settings| settings.admin_email)
        .unwrap_or_default();

    let mut page = SettingsTemplate::new(&session, &token, admin_email);
    page.saved = query.saved.is_some();
    Ok(page)
}

/// Save the notification email.
///
/// POST /app/settings
#[instrument(skip(state, session, token, body))]
async fn save_settings(
    State(state): State<AppState>,
    RequireShopSession(session): RequireShopSession,
    Query(token): Query<TokenQuery>,
    body: JsonOrForm<SettingsForm>,
) -> Result<Response, AppError> {
    let JsonOrForm { value: form, is_json } = body;

    let email = match Email::parse(&form.admin_email) {
        Ok(email) => email,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected notification email");
            if is_json {
                let mut errors = FieldErrors::default();
                errors.insert("adminEmail", EMAIL_ERROR);
                return Err(AppError::Validation(errors));
            }
            let mut page = SettingsTemplate::new(&session, &token, form.admin_email);
            page.email_error = Some(EMAIL_ERROR);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    quotes::update_settings(state.store(), session.shop_id(), email.as_str()).await?;
    tracing::info!(shop = %session.shop, "Notification email saved");

    Ok(Redirect::to(&token.url_with("/app/settings", &[("saved", "1")])).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, header},
    };

    use super::super::test_support::{SHOP, body_string, send, state, token};
    use super::*;
    use crate::db::QuoteStore;

    fn post_form(state: &AppState, body: &str) -> Request<Body> {
        Request::post("/app/settings")
            .header(header::AUTHORIZATION, format!("Bearer {}", token(state, SHOP)))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_save_settings_upserts() {
        let (state, store) = state();
        let app = crate::routes::app(state.clone());

        let first = send(app.clone(), post_form(&state, "adminEmail=One%40Example.com")).await;
        assert_eq!(first.status(), StatusCode::SEE_OTHER);
        assert_eq!(first.headers()[header::LOCATION], "/app/settings?saved=1");

        let second = send(app, post_form(&state, "adminEmail=two%40example.com")).await;
        assert_eq!(second.status(), StatusCode::SEE_OTHER);

        let saved = store.find_settings(SHOP).await.unwrap().unwrap();
        assert_eq!(saved.admin_email, "two@example.com");
        assert_eq!(store.settings_count().await, 1);
    }

    #[tokio::test]
    async fn test_save_settings_normalizes_email() {
        let (state, store) = state();
        let response = send(
            crate::routes::app(state.clone()),
            post_form(&state, "adminEmail=+Sales%40Example.COM+"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let saved = store.find_settings(SHOP).await.unwrap().unwrap();
        assert_eq!(saved.admin_email, "sales@example.com");
    }

    #[tokio::test]
    async fn test_invalid_email_rerenders_with_422() {
        let (state, store) = state();
        let response = send(
            crate::routes::app(state.clone()),
            post_form(&state, "adminEmail=not-an-email"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_string(response).await;
        assert!(html.contains(EMAIL_ERROR));
        assert!(html.contains("not-an-email"));
        assert!(store.find_settings(SHOP).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_page_shows_saved_email() {
        let (state, store) = state();
        store
            .insert_settings(SHOP, "owner@example.com")
            .await
            .unwrap();
        let uri = format!("/app/settings?saved=1&id_token={}", token(&state, SHOP));

        let response = send(
            crate::routes::app(state),
            Request::get(uri).body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("owner@example.com"));
        assert!(html.contains("Settings saved."));
    }
}
