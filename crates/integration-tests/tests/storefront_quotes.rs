//! Integration tests for the storefront widget endpoint.

use reqwest::StatusCode;
use serde_json::{Value, json};

use quotebox_admin::db::QuoteStore;
use quotebox_integration_tests::{SHOP, TestContext};

fn widget_body() -> Value {
    json!({
        "shopId": SHOP,
        "productId": "gid://shopify/Product/101",
        "variantId": "gid://shopify/ProductVariant/202",
        "title": "Custom oak table",
        "name": "Robin",
        "email": "robin@example.com",
        "message": "Can you do 2.4m?",
        "metadata": { "length": "2.4m" }
    })
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_widget_create_stores_quote() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/create-quote"))
        .json(&widget_body())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));

    let quotes = ctx.store.list_quotes(SHOP).await.unwrap();
    assert_eq!(quotes.len(), 1);
    let quote = &quotes[0];
    assert_eq!(quote.title, "Custom oak table");
    assert_eq!(quote.email, "robin@example.com");
    assert_eq!(quote.metadata, r#"{"length":"2.4m"}"#);
    assert_eq!(quote.image, "");
    assert_eq!(quote.status, "pending");
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_widget_rejects_non_json_content_type() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/create-quote"))
        .header("content-type", "text/plain")
        .body(widget_body().to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid Content-Type");
    assert!(ctx.store.list_quotes(SHOP).await.unwrap().is_empty());
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_widget_missing_required_field_is_generic_error() {
    let ctx = TestContext::new().await;
    let mut body = widget_body();
    body["variantId"] = json!("");

    let resp = ctx
        .client
        .post(ctx.url("/create-quote"))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.text().await.unwrap(), "Internal server error");
    assert!(ctx.store.list_quotes(SHOP).await.unwrap().is_empty());
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_widget_needs_no_session_token() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/create-quote"))
        .header("origin", "https://acme-furniture.com")
        .json(&widget_body())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()["access-control-allow-origin"],
        "*"
    );
}
