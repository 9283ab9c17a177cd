//! End-to-end tests for the Elegance storefront client.
//!
//! Every test runs the real client and workflows against a `wiremock`
//! server that answers with the backend's `{success, status, data}`
//! envelope, so no backend or network access is needed.
//!
//! ```bash
//! cargo test -p elegance-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use elegance_storefront::{ApiClient, ClientConfig, LocalStore};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

/// A successful envelope wrapping `data`.
#[must_use]
pub fn envelope(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "status": 200,
        "data": data,
    }))
}

/// A failed envelope with the backend's `error` message.
#[must_use]
pub fn failure(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "success": false,
        "status": status,
        "error": message,
    }))
}

/// Answers with the request's own JSON body wrapped in a success envelope,
/// adding `id` when the body has none. Stands in for endpoints that return
/// the saved record.
pub struct EchoRecord {
    id: String,
}

impl EchoRecord {
    #[must_use]
    pub fn with_id(id: &str) -> Self {
        Self { id: id.to_owned() }
    }
}

impl Respond for EchoRecord {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut record: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        if let Some(fields) = record.as_object_mut() {
            fields
                .entry("id")
                .or_insert_with(|| Value::String(self.id.clone()));
        }
        envelope(record)
    }
}

/// Backend JSON for an in-stock product.
#[must_use]
pub fn product_json(id: &str, slug: &str, price: u32) -> Value {
    json!({
        "id": id,
        "name": slug.replace('-', " "),
        "slug": slug,
        "description": null,
        "price": price,
        "original_price": null,
        "category_id": "c1",
        "images": [format!("https://cdn.example.com/{slug}.jpg")],
        "sizes": ["S", "M", "L"],
        "colors": [],
        "stock": 10,
        "featured": false,
        "is_new": true,
    })
}

/// A mock backend plus a client whose local state lives in a temp dir.
pub struct TestContext {
    pub server: MockServer,
    pub client: ApiClient,
    pub store: LocalStore,
    _state_dir: TempDir,
}

impl TestContext {
    /// Start a mock server and a client pointed at it.
    ///
    /// # Panics
    ///
    /// Panics if the temp dir or client cannot be created.
    #[allow(clippy::unwrap_used)]
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let state_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(state_dir.path()).unwrap();
        let client =
            ApiClient::with_store(ClientConfig::new(&server.uri()).unwrap(), store.clone())
                .unwrap();
        Self {
            server,
            client,
            store,
            _state_dir: state_dir,
        }
    }
}
