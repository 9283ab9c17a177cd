//! Stateful flows driven by the front end.
//!
//! - [`CartService`] - cart persisted in the local store
//! - [`CheckoutService`] - draft caching and order placement
//! - [`SiteContext`] - merged website config with optimistic section saves
//! - [`PageEditor`] - page editing session with unsaved-change tracking

mod cart;
mod checkout;
mod editor;
mod site;

pub use cart::CartService;
pub use checkout::CheckoutService;
pub use editor::PageEditor;
pub use site::SiteContext;

use elegance_core::cart::CartError;
use elegance_core::checkout::CheckoutError;
use elegance_core::models::page::PageError;
use thiserror::Error;

use crate::error::ApiError;
use crate::store::StoreError;

/// Errors raised by the workflows.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error("Invalid setting value: {0}")]
    InvalidSetting(#[from] serde_json::Error),

    #[error("Save your changes before publishing")]
    UnsavedChanges,
}

impl WorkflowError {
    /// The message to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
