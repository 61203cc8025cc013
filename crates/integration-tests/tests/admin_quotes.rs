//! Integration tests for the admin quote API and quotes page.

use reqwest::StatusCode;
use serde_json::{Value, json};

use quotebox_admin::db::QuoteStore;
use quotebox_admin::models::NewQuote;
use quotebox_admin::services::quotes;
use quotebox_integration_tests::{SHOP, TestContext};

async fn seed(ctx: &TestContext, shop: &str, title: &str) -> quotebox_admin::models::Quote {
    quotes::create_quote(
        ctx.store.as_ref(),
        NewQuote {
            shop_id: shop.to_owned(),
            product_id: "gid://shopify/Product/1".to_owned(),
            variant_id: "gid://shopify/ProductVariant/1".to_owned(),
            title: title.to_owned(),
            ..NewQuote::default()
        },
    )
    .await
    .unwrap_or_else(|e| panic!("seed failed: {e}"))
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_list_without_token_is_unauthorized() {
    let ctx = TestContext::new().await;

    let resp = ctx.client.get(ctx.url("/quotes")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_list_is_scoped_to_token_shop_newest_first() {
    let ctx = TestContext::new().await;
    seed(&ctx, SHOP, "first").await;
    seed(&ctx, "rival.myshopify.com", "not ours").await;
    seed(&ctx, SHOP, "second").await;

    let resp = ctx
        .client
        .get(ctx.url("/quotes"))
        .header("authorization", ctx.bearer(SHOP))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["shop"], SHOP);
    let titles: Vec<&str> = body["quotes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["second", "first"]);
    assert!(body["quotes"][0].get("shopId").is_some());
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_delete_redirects_and_removes() {
    let ctx = TestContext::new().await;
    let quote = seed(&ctx, SHOP, "to delete").await;

    let resp = ctx
        .client
        .post(ctx.url("/quotes/delete"))
        .header("authorization", ctx.bearer(SHOP))
        .json(&json!({ "id": quote.id }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/app/quotes");
    assert!(ctx.store.find_quote(quote.id).await.unwrap().is_none());
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_delete_other_shops_quote_is_not_found() {
    let ctx = TestContext::new().await;
    let theirs = seed(&ctx, "rival.myshopify.com", "theirs").await;

    let resp = ctx
        .client
        .post(ctx.url("/quotes/delete"))
        .header("authorization", ctx.bearer(SHOP))
        .json(&json!({ "id": theirs.id }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(ctx.store.find_quote(theirs.id).await.unwrap().is_some());
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_status_form_post_redirects_back_to_page() {
    let ctx = TestContext::new().await;
    let quote = seed(&ctx, SHOP, "needs status").await;
    let token = ctx.token_for(SHOP);

    let resp = ctx
        .client
        .post(ctx.url(&format!("/quotes/{}/status?id_token={token}", quote.id)))
        .form(&[("status", "accepted")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()["location"],
        format!("/app/quotes?id_token={token}").as_str()
    );
    let stored = ctx.store.find_quote(quote.id).await.unwrap().unwrap();
    assert_eq!(stored.status, "accepted");
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_admin_form_create_validation_and_success() {
    let ctx = TestContext::new().await;

    let invalid = ctx
        .client
        .post(ctx.url("/app/quotes"))
        .header("authorization", ctx.bearer(SHOP))
        .form(&[("title", ""), ("productId", ""), ("variantId", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = invalid.text().await.unwrap();
    assert!(html.contains("Title is required"));
    assert!(html.contains("Product is required"));
    assert!(html.contains("Variant is required"));

    let valid = ctx
        .client
        .post(ctx.url("/app/quotes"))
        .header("authorization", ctx.bearer(SHOP))
        .form(&[
            ("title", "Bench"),
            ("productId", "gid://shopify/Product/7"),
            ("variantId", "gid://shopify/ProductVariant/8"),
            ("message", "Outdoor finish"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(valid.status(), StatusCode::SEE_OTHER);
    assert_eq!(valid.headers()["location"], "/app/quotes");

    let stored = ctx.store.list_quotes(SHOP).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Bench");
    assert_eq!(stored[0].message, "Outdoor finish");
    assert_eq!(stored[0].email, "");
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_quotes_page_lists_quotes() {
    let ctx = TestContext::new().await;
    seed(&ctx, SHOP, "Rocking chair").await;

    let resp = ctx
        .client
        .get(ctx.url(&format!("/app/quotes?id_token={}", ctx.token_for(SHOP))))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Rocking chair"));
    assert!(html.contains("Create quote"));
}
