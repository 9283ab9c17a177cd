//! REST client for the Elegance backend.
//!
//! Every endpoint answers with a JSON envelope
//! `{data?, message?, error?, status, success}`. Read queries for products,
//! categories, pages and the website config are cached with `moka`; every
//! mutation invalidates the query families it touches.

mod admin;
mod auth;
pub mod cache;
mod catalog;
mod orders;
mod pages;
mod website;

pub use admin::{ImageUpload, MAX_IMAGE_BYTES, image_file_name};
pub use orders::OrderLookup;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ApiError, FALLBACK_ERROR_MESSAGE};
use crate::store::{AUTH_TOKEN_KEY, LocalStore};

use cache::{CacheKey, CacheValue, QueryFamily};

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Elegance REST API.
///
/// Cheap to clone; clones share the HTTP connection pool, the query cache
/// and the signed-in token.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    config: ClientConfig,
    cache: Cache<CacheKey, CacheValue>,
    token: RwLock<Option<SecretString>>,
    store: Option<LocalStore>,
}

impl ApiClient {
    /// Create a client that keeps its token in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Self::build(config, None)
    }

    /// Create a client whose sign-in is persisted in `store`.
    ///
    /// A token in the configuration takes precedence over the stored one.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the state file
    /// cannot be read.
    pub fn with_store(config: ClientConfig, store: LocalStore) -> Result<Self, ApiError> {
        Self::build(config, Some(store))
    }

    fn build(config: ClientConfig, store: Option<LocalStore>) -> Result<Self, ApiError> {
        let token = match (&config.auth_token, &store) {
            (Some(token), _) => Some(token.clone()),
            (None, Some(store)) => store
                .get::<String>(AUTH_TOKEN_KEY)?
                .map(SecretString::from),
            (None, None) => None,
        };

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                config,
                cache,
                token: RwLock::new(token),
                store,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The local state store, when the client was created with one.
    #[must_use]
    pub fn store(&self) -> Option<&LocalStore> {
        self.inner.store.as_ref()
    }

    /// Whether a bearer token is available.
    pub async fn is_signed_in(&self) -> bool {
        self.inner.token.read().await.is_some()
    }

    /// Replace the bearer token, persisting the change when a store is
    /// attached.
    pub(crate) async fn set_token(&self, token: Option<String>) -> Result<(), ApiError> {
        if let Some(store) = &self.inner.store {
            match &token {
                Some(token) => store.set(AUTH_TOKEN_KEY, token)?,
                None => {
                    store.remove(AUTH_TOKEN_KEY)?;
                }
            }
        }
        *self.inner.token.write().await = token.map(SecretString::from);
        Ok(())
    }

    // =========================================================================
    // Request Plumbing
    // =========================================================================

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner
            .client
            .request(method, self.inner.config.endpoint(path))
    }

    /// Send a request with the bearer token attached and decode the
    /// envelope's `data` as `T`.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let builder = match self.inner.token.read().await.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
        }

        decode_envelope(status.as_u16(), &body)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ApiError> {
        let builder = self.request(Method::GET, path).query(query);
        let items: Option<Vec<T>> = self.execute(builder).await?;
        Ok(items.unwrap_or_default())
    }

    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        self.execute(self.request(method, path).json(body)).await
    }

    /// Send a request whose response data is ignored.
    pub(crate) async fn send_discarding(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        self.execute::<serde::de::IgnoredAny>(builder).await?;
        Ok(())
    }

    // =========================================================================
    // Cache Helpers
    // =========================================================================

    pub(crate) async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        let value = self.inner.cache.get(key).await;
        if value.is_some() {
            debug!(key = %key, "Cache hit");
        }
        value
    }

    pub(crate) async fn cache_insert(&self, key: CacheKey, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }

    /// Drop every cached query in the given families.
    pub(crate) async fn invalidate(&self, families: &[QueryFamily]) {
        let stale: Vec<Arc<CacheKey>> = self
            .inner
            .cache
            .iter()
            .filter(|(key, _)| families.contains(&key.family()))
            .map(|(key, _)| key)
            .collect();
        for key in stale {
            self.inner.cache.invalidate(key.as_ref()).await;
        }
        debug!(?families, "Invalidated cached queries");
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

// =============================================================================
// Envelope
// =============================================================================

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    success: Option<bool>,
}

/// Decode a response body given its HTTP status.
///
/// A response fails when the status is not 2xx or the envelope says
/// `success: false`. A 2xx response with an empty body carries no data.
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    status: u16,
    body: &str,
) -> Result<T, ApiError> {
    let http_ok = (200..300).contains(&status);

    let envelope = if body.trim().is_empty() {
        None
    } else {
        match serde_json::from_str::<Envelope>(body) {
            Ok(envelope) => Some(envelope),
            Err(e) if http_ok => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse backend response"
                );
                return Err(ApiError::Parse(e));
            }
            Err(_) => None,
        }
    };

    let failed = !http_ok || envelope.as_ref().and_then(|e| e.success) == Some(false);
    if failed {
        let (code, message) = envelope.map_or((status, None), |e| {
            let code = if http_ok {
                e.status
                    .as_ref()
                    .and_then(Value::as_u64)
                    .and_then(|s| u16::try_from(s).ok())
                    .unwrap_or(status)
            } else {
                status
            };
            let message = non_blank(e.error).or_else(|| non_blank(e.message));
            (code, message)
        });
        return Err(ApiError::from_status(
            code,
            message.unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_owned()),
        ));
    }

    let data = envelope.and_then(|e| e.data).unwrap_or(Value::Null);
    Ok(serde_json::from_value(data)?)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_yields_data() {
        let names: Vec<String> =
            decode_envelope(200, r#"{"data": ["a", "b"], "status": 200, "success": true}"#)
                .unwrap();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_body_is_no_data() {
        let data: Option<Value> = decode_envelope(204, "").unwrap();
        assert!(data.is_none());
        decode_envelope::<serde::de::IgnoredAny>(204, "").unwrap();
    }

    #[test]
    fn test_error_message_precedence() {
        let err = decode_envelope::<Value>(
            409,
            r#"{"error": "Email already registered", "message": "ignored", "success": false}"#,
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "Email already registered");

        let err =
            decode_envelope::<Value>(400, r#"{"message": "Invalid request body"}"#).unwrap_err();
        assert_eq!(err.user_message(), "Invalid request body");

        let err = decode_envelope::<Value>(500, "<html>oops</html>").unwrap_err();
        assert_eq!(err.user_message(), FALLBACK_ERROR_MESSAGE);
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_success_false_on_ok_status_fails() {
        let err = decode_envelope::<Value>(
            200,
            r#"{"error": "Page not found", "status": 404, "success": false}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Page not found"));
    }

    #[test]
    fn test_status_codes_map_to_variants() {
        let err = decode_envelope::<Value>(401, r#"{"error": "Invalid token"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_malformed_success_body_is_parse_error() {
        let err = decode_envelope::<Value>(200, "not json").unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
