//! Website configuration commands.

use elegance_core::models::WebsiteSettingKey;
use elegance_storefront::workflows::SiteContext;
use serde_json::Value;

use super::{CommandError, Context};
use crate::output;

pub async fn show(ctx: &Context, key: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.client.website_config().await?;
    match key {
        Some(key) => {
            let key: WebsiteSettingKey = key.parse()?;
            let value = config
                .section_value(&key)
                .ok_or_else(|| format!("No setting named {key}"))?;
            output::print_json(&value)?;
        }
        None => output::print_json(&config)?,
    }
    Ok(())
}

/// Save one section. A value that is not valid JSON is stored as a string.
pub async fn set(ctx: &Context, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    let key: WebsiteSettingKey = key.parse()?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));

    let mut site = SiteContext::load(ctx.client.clone()).await?;
    if let Err(e) = site.save_section(&key, value).await {
        return Err(CommandError::Rejected(e.user_message()).into());
    }
    if let Some(saved) = site.config().section_value(&key) {
        output::print_json(&saved)?;
    }
    Ok(())
}

pub async fn whatsapp_link(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.client.website_config().await?;
    match config.whatsapp.chat_url() {
        Some(url) => output::print(&url),
        None => output::print("No WhatsApp number configured"),
    }
    Ok(())
}
