//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `ELEGANCE_API_URL` - Backend base URL (default: `http://localhost:8080`)
//! - `ELEGANCE_STATE_DIR` - Directory for the local state file (default: `.elegance`)
//! - `ELEGANCE_CACHE_TTL_SECS` - Request cache lifetime (default: 300)
//! - `ELEGANCE_REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 30)
//! - `ELEGANCE_AUTH_TOKEN` - Bearer token overriding the stored sign-in
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_STATE_DIR: &str = ".elegance";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Settings for [`crate::ApiClient`] and the local state store.
///
/// Implements `Debug` manually to redact the auth token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Backend base URL; API paths are joined onto it
    pub api_url: Url,
    /// Directory holding the persisted cart, token and checkout draft
    pub state_dir: PathBuf,
    /// How long cached query results stay fresh
    pub cache_ttl: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Token that takes precedence over the stored sign-in
    pub auth_token: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url.as_str())
            .field("state_dir", &self.state_dir)
            .field("cache_ttl", &self.cache_ttl)
            .field("request_timeout", &self.request_timeout)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sentry_dsn", &self.sentry_dsn)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration pointing at `api_url` with every other setting at its
    /// default.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_url` is not an absolute URL.
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url("ELEGANCE_API_URL", api_url)?,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            auth_token: None,
            sentry_dsn: None,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(
            "ELEGANCE_API_URL",
            &get_env_or_default("ELEGANCE_API_URL", DEFAULT_API_URL),
        )?;
        let state_dir = PathBuf::from(get_env_or_default("ELEGANCE_STATE_DIR", DEFAULT_STATE_DIR));
        let cache_ttl = get_secs("ELEGANCE_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;
        let request_timeout =
            get_secs("ELEGANCE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let auth_token = get_optional_env("ELEGANCE_AUTH_TOKEN").map(SecretString::from);
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api_url,
            state_dir,
            cache_ttl,
            request_timeout,
            auth_token,
            sentry_dsn,
        })
    }

    /// Absolute URL for an API path such as `/api/products`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url.as_str().trim_end_matches('/'), path)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable; blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_owned())
}

/// Parse a whole-second duration variable.
fn get_secs(key: &str, default: u64) -> Result<Duration, ConfigError> {
    get_optional_env(key).map_or(Ok(Duration::from_secs(default)), |raw| {
        raw.trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
    })
}

fn parse_api_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_owned(),
            format!("expected an http(s) URL, got {raw}"),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = ClientConfig::new("http://localhost:8080").unwrap();
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.state_dir, PathBuf::from(".elegance"));
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = ClientConfig::new("https://shop.example.co.ke/").unwrap();
        assert_eq!(
            config.endpoint("/api/products"),
            "https://shop.example.co.ke/api/products"
        );
    }

    #[test]
    fn test_rejects_non_http_urls() {
        assert!(matches!(
            ClientConfig::new("ftp://example.com"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(ClientConfig::new("not a url").is_err());
    }

    #[test]
    fn test_get_secs_default_when_unset() {
        let ttl = get_secs("ELEGANCE_TEST_UNSET_TTL_VAR", 42).unwrap();
        assert_eq!(ttl, Duration::from_secs(42));
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = ClientConfig::new("http://localhost:8080").unwrap();
        config.auth_token = Some(SecretString::from("super_secret_jwt"));

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_jwt"));
    }
}
