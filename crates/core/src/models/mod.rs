//! Records mirrored from the backend JSON API.
//!
//! These are passive data carriers. The only invariants enforced here are the
//! form validation rules the admin console applies before sending a record
//! (required fields, numeric bounds); everything else is the backend's job.

pub mod category;
pub mod order;
pub mod page;
pub mod product;
pub mod settings;
pub mod user;

pub use category::{Category, CategoryInput};
pub use order::{CustomerInfo, Order, OrderItem, OrderStatusUpdate, ShippingInfo};
pub use page::{MoveDirection, Page, PageSection, SectionKind};
pub use product::{Product, ProductFilters};
pub use settings::{SiteSetting, WebsiteConfig, WebsiteSettingKey};
pub use user::{
    AuthSession, ChangePasswordRequest, SetupStatus, SignInRequest, SignUpRequest,
    UpdateAccountRequest, User,
};

use serde::{Deserialize, Deserializer};

/// A form field that failed validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Wire name of the offending field.
    pub field: &'static str,
    /// Human-readable reason.
    pub message: String,
}

impl ValidationError {
    pub(crate) fn required(field: &'static str) -> Self {
        Self {
            field,
            message: "is required".to_owned(),
        }
    }

    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Deserialize `null` as the type's default (the backend emits `null` for
/// empty Go slices).
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
