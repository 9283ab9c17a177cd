//! Website configuration reads and section saves.

#![allow(clippy::unwrap_used)]

use elegance_core::models::WebsiteSettingKey;
use elegance_integration_tests::{TestContext, envelope, failure};
use elegance_storefront::workflows::SiteContext;
use serde_json::json;
use wiremock::Mock;
use wiremock::matchers::{body_json, method, path};

async fn mount_settings(ctx: &TestContext, expected_reads: u64) {
    Mock::given(method("GET"))
        .and(path("/api/website-builder"))
        .respond_with(envelope(json!([
            {"id": "s1", "key": "store", "value": "{\"name\": \"Elegance Boutique\"}"},
            {"id": "s2", "key": "mpesa", "value": {"type": "paybill", "paybill_number": "247247"}}
        ])))
        .expect(expected_reads)
        .mount(&ctx.server)
        .await;
}

#[tokio::test]
async fn test_saved_section_is_visible_and_refetched() {
    let ctx = TestContext::new().await;
    mount_settings(&ctx, 2).await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/website-builder/theme"))
        .and(body_json(json!({"value": "{\"primary_color\":\"#8b5cf6\"}"})))
        .respond_with(envelope(json!({
            "id": "s3", "key": "theme", "value": "{\"primary_color\":\"#8b5cf6\"}"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let mut site = SiteContext::load(ctx.client.clone()).await.unwrap();
    assert_eq!(site.config().store.name, "Elegance Boutique");
    assert_eq!(site.config().mpesa.business_number(), ("Paybill Number", "247247"));

    site.save_section(&WebsiteSettingKey::Theme, json!({"primary_color": "#8b5cf6"}))
        .await
        .unwrap();
    assert_eq!(site.config().theme.primary_color, "#8b5cf6");

    ctx.client.website_config().await.unwrap();
}

#[tokio::test]
async fn test_rejected_save_still_invalidates() {
    let ctx = TestContext::new().await;
    mount_settings(&ctx, 2).await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/website-builder/store"))
        .respond_with(failure(403, "Admin access required"))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let mut site = SiteContext::load(ctx.client.clone()).await.unwrap();
    let err = site
        .save_section(&WebsiteSettingKey::Store, json!({"name": "Renamed"}))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Admin access required");
    assert_eq!(site.config().store.name, "Elegance Boutique");

    ctx.client.website_config().await.unwrap();
}
