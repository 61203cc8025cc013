//! Integration tests for session token checks on admin routes.

use reqwest::StatusCode;

use quotebox_admin::services::SessionTokenClaims;
use quotebox_core::ShopDomain;
use quotebox_integration_tests::{API_KEY, SHOP, TestContext};

fn claims(ttl_secs: i64) -> SessionTokenClaims {
    let shop = ShopDomain::parse(SHOP).unwrap_or_else(|e| panic!("{e}"));
    SessionTokenClaims::for_shop(&shop, API_KEY, ttl_secs)
}

async fn list_status(ctx: &TestContext, token: &str) -> StatusCode {
    ctx.client
        .get(ctx.url("/quotes"))
        .bearer_auth(token)
        .send()
        .await
        .map(|resp| resp.status())
        .unwrap_or_else(|e| panic!("request failed: {e}"))
}

#[tokio::test]
async fn test_valid_token_is_accepted() {
    let ctx = TestContext::new().await;
    let token = ctx.sign(&claims(60));
    assert_eq!(list_status(&ctx, &token).await, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let ctx = TestContext::new().await;
    let token = ctx.sign(&claims(-300));
    assert_eq!(list_status(&ctx, &token).await, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_audience_is_rejected() {
    let ctx = TestContext::new().await;
    let mut claims = claims(60);
    claims.aud = "some-other-app".to_owned();
    let token = ctx.sign(&claims);
    assert_eq!(list_status(&ctx, &token).await, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tampered_signature_is_rejected() {
    let ctx = TestContext::new().await;
    let token = ctx.sign(&claims(60));
    let (head, signature) = token.rsplit_once('.').unwrap_or_else(|| panic!("not a jwt"));
    let forged = format!("{head}.{}", signature.chars().rev().collect::<String>());
    assert_ne!(forged, token);
    assert_eq!(list_status(&ctx, &forged).await, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let ctx = TestContext::new().await;
    assert_eq!(
        list_status(&ctx, "not-a-jwt").await,
        StatusCode::UNAUTHORIZED
    );
}
