//! Merged website configuration with optimistic section saves.

use elegance_core::models::{WebsiteConfig, WebsiteSettingKey};
use serde_json::Value;
use tracing::{instrument, warn};

use super::WorkflowError;
use crate::api::ApiClient;
use crate::error::ApiError;

/// The website config as the front end sees it.
pub struct SiteContext {
    client: ApiClient,
    config: WebsiteConfig,
}

impl SiteContext {
    /// Fetch the settings and merge them over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be fetched.
    pub async fn load(client: ApiClient) -> Result<Self, ApiError> {
        let config = client.website_config().await?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub const fn config(&self) -> &WebsiteConfig {
        &self.config
    }

    /// Re-read the config from the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be fetched.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.config = self.client.website_config().await?;
        Ok(())
    }

    /// Save one section.
    ///
    /// The new value is visible through [`SiteContext::config`] before the
    /// request completes and rolled back if the backend rejects it.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not fit the section or the update
    /// fails.
    #[instrument(skip(self, value), fields(key = %key))]
    pub async fn save_section(
        &mut self,
        key: &WebsiteSettingKey,
        value: Value,
    ) -> Result<(), WorkflowError> {
        let next = self.config.with_section(key, value.clone())?;
        let previous = std::mem::replace(&mut self.config, next);

        if let Err(e) = self.client.update_website_setting(key, &value).await {
            warn!(error = %e, "Setting update failed, restoring previous config");
            self.config = previous;
            return Err(e.into());
        }
        Ok(())
    }
}
