//! Website-builder settings and the merged site configuration.
//!
//! The backend stores site configuration as a list of key/value settings
//! where each value is one section of the config (store details, theme,
//! M-Pesa account, ...). Values written by older clients arrive as JSON
//! strings holding encoded JSON, so decoding accepts both forms.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned, Unexpected};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::SettingId;

// =============================================================================
// Setting keys
// =============================================================================

/// Name of one website-builder setting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WebsiteSettingKey {
    Store,
    Theme,
    Seo,
    Mpesa,
    Contact,
    Social,
    Hero,
    About,
    Features,
    Whatsapp,
    /// A key this client does not model; its value is kept as raw JSON.
    Other(String),
}

impl WebsiteSettingKey {
    /// Every modelled key.
    pub const KNOWN: [Self; 10] = [
        Self::Store,
        Self::Theme,
        Self::Seo,
        Self::Mpesa,
        Self::Contact,
        Self::Social,
        Self::Hero,
        Self::About,
        Self::Features,
        Self::Whatsapp,
    ];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Store => "store",
            Self::Theme => "theme",
            Self::Seo => "seo",
            Self::Mpesa => "mpesa",
            Self::Contact => "contact",
            Self::Social => "social",
            Self::Hero => "hero",
            Self::About => "about",
            Self::Features => "features",
            Self::Whatsapp => "whatsapp",
            Self::Other(key) => key,
        }
    }
}

impl From<String> for WebsiteSettingKey {
    fn from(key: String) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|known| known.as_str() == key)
            .unwrap_or(Self::Other(key))
    }
}

impl From<&str> for WebsiteSettingKey {
    fn from(key: &str) -> Self {
        Self::from(key.to_owned())
    }
}

impl From<WebsiteSettingKey> for String {
    fn from(key: WebsiteSettingKey) -> Self {
        key.as_str().to_owned()
    }
}

impl std::fmt::Display for WebsiteSettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WebsiteSettingKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// One stored setting as returned by `GET /api/website-builder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSetting {
    #[serde(default)]
    pub id: SettingId,
    pub key: WebsiteSettingKey,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SiteSetting {
    /// The setting's value with string-encoded JSON unwrapped.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is a string that is not valid JSON.
    pub fn decoded_value(&self) -> Result<Value, serde_json::Error> {
        match &self.value {
            Value::String(encoded) => serde_json::from_str(encoded),
            other => Ok(other.clone()),
        }
    }
}

// =============================================================================
// Config sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub name: String,
    pub description: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub logo: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "Elegance".to_owned(),
            description: "Timeless fashion, delivered across Kenya.".to_owned(),
            email: String::new(),
            phone: String::new(),
            address: "Nairobi, Kenya".to_owned(),
            logo: String::new(),
        }
    }
}

const SANS_SERIF_FONTS: [&str; 3] = ["Inter", "Poppins", "Montserrat"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub font_family: String,
    pub border_radius: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary_color: "#1a1a1a".to_owned(),
            secondary_color: "#f5f5f5".to_owned(),
            accent_color: "#c9a96e".to_owned(),
            font_family: "Inter".to_owned(),
            border_radius: "0.5rem".to_owned(),
        }
    }
}

impl ThemeConfig {
    /// CSS custom properties for the theme. Empty values are omitted.
    #[must_use]
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        let font = if self.font_family.is_empty() {
            String::new()
        } else if SANS_SERIF_FONTS.contains(&self.font_family.as_str()) {
            format!("\"{}\", sans-serif", self.font_family)
        } else {
            format!("\"{}\", serif", self.font_family)
        };

        [
            ("--theme-primary", self.primary_color.clone()),
            ("--theme-secondary", self.secondary_color.clone()),
            ("--theme-accent", self.accent_color.clone()),
            ("--theme-radius", self.border_radius.clone()),
            ("--font-main", font),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }

    /// The variables as a `:root { ... }` stylesheet block.
    #[must_use]
    pub fn to_css(&self) -> String {
        let body: String = self
            .css_variables()
            .into_iter()
            .map(|(name, value)| format!("  {name}: {value};\n"))
            .collect();
        format!(":root {{\n{body}}}\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub og_image: String,
    pub favicon: String,
    pub url: String,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            title: "Elegance".to_owned(),
            description: "Shop the latest fashion and pay with M-Pesa.".to_owned(),
            keywords: String::new(),
            og_image: String::new(),
            favicon: String::new(),
            url: String::new(),
        }
    }
}

impl SeoConfig {
    /// Document title, falling back to "My Store".
    #[must_use]
    pub fn page_title(&self) -> &str {
        if self.title.is_empty() {
            "My Store"
        } else {
            &self.title
        }
    }

    /// Absolute favicon URL; relative paths are served by the API host.
    #[must_use]
    pub fn favicon_url(&self, api_base: &str) -> Option<String> {
        if self.favicon.is_empty() {
            None
        } else if self.favicon.starts_with("http") {
            Some(self.favicon.clone())
        } else {
            Some(format!("{}{}", api_base.trim_end_matches('/'), self.favicon))
        }
    }
}

/// Whether customers pay to a till or a paybill number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MpesaAccountType {
    #[default]
    Till,
    Paybill,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MpesaConfig {
    #[serde(rename = "type")]
    pub account_type: MpesaAccountType,
    pub till_number: String,
    pub paybill_number: String,
    pub account_number: String,
    pub phone: String,
}

impl MpesaConfig {
    /// Label and number customers pay to, e.g. `("Till Number", "123456")`.
    #[must_use]
    pub fn business_number(&self) -> (&'static str, &str) {
        match self.account_type {
            MpesaAccountType::Till => ("Till Number", &self.till_number),
            MpesaAccountType::Paybill => ("Paybill Number", &self.paybill_number),
        }
    }

    /// Whether enough is configured to show payment instructions.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.business_number().1.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub title: String,
    pub subtitle: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub show_map: bool,
    pub map_url: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            title: "Contact Us".to_owned(),
            subtitle: "We'd love to hear from you".to_owned(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            show_map: false,
            map_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SocialConfig {
    pub facebook: String,
    pub instagram: String,
    pub twitter: String,
    pub linkedin: String,
    pub youtube: String,
    pub tiktok: String,
}

impl SocialConfig {
    /// `(network, url)` pairs for the networks that have a link.
    #[must_use]
    pub fn links(&self) -> Vec<(&'static str, &str)> {
        [
            ("facebook", self.facebook.as_str()),
            ("instagram", self.instagram.as_str()),
            ("twitter", self.twitter.as_str()),
            ("linkedin", self.linkedin.as_str()),
            ("youtube", self.youtube.as_str()),
            ("tiktok", self.tiktok.as_str()),
        ]
        .into_iter()
        .filter(|(_, url)| !url.is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub title: String,
    pub subtitle: String,
    pub cta_text: String,
    pub cta_link: String,
    pub background_image: String,
    pub overlay: bool,
    pub overlay_opacity: f64,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            title: "Welcome to Elegance".to_owned(),
            subtitle: "Discover our latest collection".to_owned(),
            cta_text: "Shop Now".to_owned(),
            cta_link: "/products".to_owned(),
            background_image: String::new(),
            overlay: true,
            overlay_opacity: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutConfig {
    pub title: String,
    pub description: String,
    pub image: String,
    pub features: Vec<String>,
}

impl Default for AboutConfig {
    fn default() -> Self {
        Self {
            title: "About Us".to_owned(),
            description: "We curate quality fashion for every occasion.".to_owned(),
            image: String::new(),
            features: Vec::new(),
        }
    }
}

/// One highlight in the site-wide features strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FeatureHighlight {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<FeatureHighlight>,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            title: "Why Choose Us".to_owned(),
            subtitle: String::new(),
            items: Vec::new(),
        }
    }
}

/// Message pre-filled in the chat when the store sets none.
pub const DEFAULT_WHATSAPP_MESSAGE: &str = "Hello! I am interested in your products.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WhatsAppConfig {
    pub phone: String,
    pub message: String,
}

impl WhatsAppConfig {
    /// `wa.me` chat link, or `None` when no phone number is configured.
    #[must_use]
    pub fn chat_url(&self) -> Option<String> {
        let digits: String = self.phone.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return None;
        }
        let message = if self.message.is_empty() {
            DEFAULT_WHATSAPP_MESSAGE
        } else {
            &self.message
        };
        Some(format!(
            "https://wa.me/{digits}?text={}",
            urlencoding::encode(message)
        ))
    }
}

// =============================================================================
// Merged config
// =============================================================================

/// Every setting merged over the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WebsiteConfig {
    pub store: StoreConfig,
    pub theme: ThemeConfig,
    pub seo: SeoConfig,
    pub mpesa: MpesaConfig,
    pub contact: ContactConfig,
    pub social: SocialConfig,
    pub hero: HeroConfig,
    pub about: AboutConfig,
    pub features: FeaturesConfig,
    pub whatsapp: WhatsAppConfig,
    /// Settings under keys this client does not model.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl WebsiteConfig {
    /// Merge stored settings over the defaults.
    ///
    /// A setting replaces its whole section. Settings whose value cannot be
    /// decoded are logged and skipped, leaving that section at its default.
    #[must_use]
    pub fn from_settings(settings: &[SiteSetting]) -> Self {
        let mut config = Self::default();
        for setting in settings {
            let applied = setting
                .decoded_value()
                .and_then(|value| config.set_section(&setting.key, value));
            if let Err(e) = applied {
                tracing::warn!(key = %setting.key, error = %e, "Skipping undecodable website setting");
            }
        }
        config
    }

    /// Replace one section with a decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not decode as that section; the
    /// config is unchanged in that case.
    pub fn set_section(
        &mut self,
        key: &WebsiteSettingKey,
        value: Value,
    ) -> Result<(), serde_json::Error> {
        match key {
            WebsiteSettingKey::Store => self.store = decode_section(value)?,
            WebsiteSettingKey::Theme => self.theme = decode_section(value)?,
            WebsiteSettingKey::Seo => self.seo = decode_section(value)?,
            WebsiteSettingKey::Mpesa => self.mpesa = decode_section(value)?,
            WebsiteSettingKey::Contact => self.contact = decode_section(value)?,
            WebsiteSettingKey::Social => self.social = decode_section(value)?,
            WebsiteSettingKey::Hero => self.hero = decode_section(value)?,
            WebsiteSettingKey::About => self.about = decode_section(value)?,
            WebsiteSettingKey::Features => self.features = decode_section(value)?,
            WebsiteSettingKey::Whatsapp => self.whatsapp = decode_section(value)?,
            WebsiteSettingKey::Other(name) => {
                self.extra.insert(name.clone(), value);
            }
        }
        Ok(())
    }

    /// A copy with one section replaced, for optimistic updates.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not decode as that section.
    pub fn with_section(
        &self,
        key: &WebsiteSettingKey,
        value: Value,
    ) -> Result<Self, serde_json::Error> {
        let mut next = self.clone();
        next.set_section(key, value)?;
        Ok(next)
    }

    /// One section as JSON.
    #[must_use]
    pub fn section_value(&self, key: &WebsiteSettingKey) -> Option<Value> {
        let value = match key {
            WebsiteSettingKey::Store => serde_json::to_value(&self.store),
            WebsiteSettingKey::Theme => serde_json::to_value(&self.theme),
            WebsiteSettingKey::Seo => serde_json::to_value(&self.seo),
            WebsiteSettingKey::Mpesa => serde_json::to_value(&self.mpesa),
            WebsiteSettingKey::Contact => serde_json::to_value(&self.contact),
            WebsiteSettingKey::Social => serde_json::to_value(&self.social),
            WebsiteSettingKey::Hero => serde_json::to_value(&self.hero),
            WebsiteSettingKey::About => serde_json::to_value(&self.about),
            WebsiteSettingKey::Features => serde_json::to_value(&self.features),
            WebsiteSettingKey::Whatsapp => serde_json::to_value(&self.whatsapp),
            WebsiteSettingKey::Other(name) => return self.extra.get(name).cloned(),
        };
        value.ok()
    }
}

/// Decode a section struct. Only JSON objects are accepted: serde would
/// otherwise fill a struct from an array by field position.
fn decode_section<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    if value.is_object() {
        return serde_json::from_value(value);
    }
    let unexpected = match &value {
        Value::Object(_) => Unexpected::Map,
        Value::Array(_) => Unexpected::Seq,
        Value::String(s) => Unexpected::Str(s),
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::Null => Unexpected::Unit,
    };
    Err(de::Error::invalid_type(unexpected, &"a settings object"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn setting(key: &str, value: Value) -> SiteSetting {
        SiteSetting {
            id: SettingId::new(format!("s-{key}")),
            key: WebsiteSettingKey::from(key),
            value,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_keys_round_trip_through_strings() {
        assert_eq!(WebsiteSettingKey::from("mpesa"), WebsiteSettingKey::Mpesa);
        assert_eq!(
            WebsiteSettingKey::from("banner"),
            WebsiteSettingKey::Other("banner".to_owned())
        );
        assert_eq!(WebsiteSettingKey::Whatsapp.to_string(), "whatsapp");
    }

    #[test]
    fn test_from_settings_merges_over_defaults() {
        let config = WebsiteConfig::from_settings(&[
            setting("store", json!({"name": "Kanga House", "email": "hi@kanga.co.ke"})),
            setting(
                "mpesa",
                Value::String(r#"{"type":"paybill","paybill_number":"400200","account_number":"KH"}"#.to_owned()),
            ),
        ]);

        assert_eq!(config.store.name, "Kanga House");
        assert_eq!(config.store.address, StoreConfig::default().address);
        assert_eq!(config.mpesa.account_type, MpesaAccountType::Paybill);
        assert_eq!(config.mpesa.business_number(), ("Paybill Number", "400200"));
        assert_eq!(config.theme, ThemeConfig::default());
    }

    #[test]
    fn test_undecodable_settings_are_skipped() {
        let config = WebsiteConfig::from_settings(&[
            setting("theme", Value::String("{not json".to_owned())),
            setting("hero", json!({"overlay_opacity": "very"})),
            setting("seo", json!({"title": "Shop"})),
        ]);
        assert_eq!(config.theme, ThemeConfig::default());
        assert_eq!(config.hero, HeroConfig::default());
        assert_eq!(config.seo.title, "Shop");
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let config = WebsiteConfig::from_settings(&[setting("banner", json!({"text": "Sale"}))]);
        let key = WebsiteSettingKey::from("banner");
        assert_eq!(config.section_value(&key), Some(json!({"text": "Sale"})));
    }

    #[test]
    fn test_with_section_leaves_original_untouched() {
        let config = WebsiteConfig::default();
        let next = config
            .with_section(&WebsiteSettingKey::Whatsapp, json!({"phone": "+254 712 345 678"}))
            .unwrap();
        assert_eq!(config.whatsapp.phone, "");
        assert_eq!(next.whatsapp.phone, "+254 712 345 678");
        assert!(
            config
                .with_section(&WebsiteSettingKey::Social, json!(["nope"]))
                .is_err()
        );
    }

    #[test]
    fn test_non_object_sections_are_rejected() {
        let mut config = WebsiteConfig::default();
        for value in [json!(["https://facebook.com/elegance"]), json!("x"), json!(3), Value::Null] {
            assert!(config.set_section(&WebsiteSettingKey::Social, value).is_err());
        }
        assert_eq!(config.social, SocialConfig::default());

        let config = WebsiteConfig::from_settings(&[
            setting("social", json!(["https://facebook.com/elegance"])),
            setting("store", Value::String(r#"["Kanga House"]"#.to_owned())),
        ]);
        assert_eq!(config.social, SocialConfig::default());
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn test_whatsapp_chat_url() {
        let whatsapp = WhatsAppConfig {
            phone: "+254 712-345-678".to_owned(),
            message: String::new(),
        };
        assert_eq!(
            whatsapp.chat_url().unwrap(),
            "https://wa.me/254712345678?text=Hello%21%20I%20am%20interested%20in%20your%20products."
        );
        assert_eq!(WhatsAppConfig::default().chat_url(), None);
    }

    #[test]
    fn test_theme_css_variables() {
        let theme = ThemeConfig {
            font_family: "Lato".to_owned(),
            accent_color: String::new(),
            ..ThemeConfig::default()
        };
        let vars = theme.css_variables();
        assert!(vars.contains(&("--font-main", "\"Lato\", serif".to_owned())));
        assert!(vars.iter().all(|(name, _)| *name != "--theme-accent"));

        let css = ThemeConfig::default().to_css();
        assert!(css.contains("--font-main: \"Inter\", sans-serif;"));
        assert!(css.starts_with(":root {"));
    }

    #[test]
    fn test_favicon_url() {
        let seo = SeoConfig {
            favicon: "/uploads/icon.png".to_owned(),
            ..SeoConfig::default()
        };
        assert_eq!(
            seo.favicon_url("http://api.local/").unwrap(),
            "http://api.local/uploads/icon.png"
        );
        assert_eq!(SeoConfig::default().favicon_url("http://api.local"), None);
    }
}
