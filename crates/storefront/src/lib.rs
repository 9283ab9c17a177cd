//! Elegance storefront library.
//!
//! Typed REST client for the Elegance backend, its request cache, the local
//! state file standing in for browser storage, and the workflows the front
//! end drives: cart, checkout, page editing and site configuration.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod store;
pub mod workflows;

pub use api::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use store::LocalStore;
pub use workflows::WorkflowError;
