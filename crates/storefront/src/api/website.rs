//! Website-builder settings.

use elegance_core::models::{SiteSetting, WebsiteConfig, WebsiteSettingKey};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use super::ApiClient;
use super::cache::{CacheKey, CacheValue, QueryFamily};
use crate::error::ApiError;

/// `PUT /api/admin/website-builder/:key` body; the backend stores the value
/// as a JSON-encoded string.
#[derive(Serialize)]
struct UpdateSettingBody {
    value: String,
}

impl ApiClient {
    /// Every stored website setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn website_settings(&self) -> Result<Vec<SiteSetting>, ApiError> {
        if let Some(CacheValue::WebsiteSettings(settings)) =
            self.cached(&CacheKey::WebsiteConfig).await
        {
            return Ok(settings);
        }
        let settings: Vec<SiteSetting> = self.get_list("/api/website-builder", &[]).await?;
        self.cache_insert(
            CacheKey::WebsiteConfig,
            CacheValue::WebsiteSettings(settings.clone()),
        )
        .await;
        Ok(settings)
    }

    /// The stored settings merged over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn website_config(&self) -> Result<WebsiteConfig, ApiError> {
        let settings = self.website_settings().await?;
        Ok(WebsiteConfig::from_settings(&settings))
    }

    /// One stored setting.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the key has never been saved.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn website_setting(&self, key: &WebsiteSettingKey) -> Result<SiteSetting, ApiError> {
        let path = format!("/api/website-builder/{}", urlencoding::encode(key.as_str()));
        self.get(&path).await
    }

    /// Replace one setting. Invalidates the cached website config whether
    /// or not the update succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, value), fields(key = %key))]
    pub async fn update_website_setting(
        &self,
        key: &WebsiteSettingKey,
        value: &Value,
    ) -> Result<SiteSetting, ApiError> {
        let body = UpdateSettingBody {
            value: serde_json::to_string(value)?,
        };
        let path = format!(
            "/api/admin/website-builder/{}",
            urlencoding::encode(key.as_str())
        );
        let result = self.send_json(Method::PUT, &path, &body).await;
        self.invalidate(&[QueryFamily::WebsiteConfig]).await;
        if result.is_ok() {
            info!("Website setting updated");
        }
        result
    }
}
