//! Subcommand implementations.
//!
//! Each module maps one group of subcommands onto the storefront client and
//! workflows, then renders the result with [`crate::output`].

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod pages;
pub mod site;

use elegance_storefront::workflows::CartService;
use elegance_storefront::{ApiClient, ClientConfig, LocalStore};
use thiserror::Error;

/// Refusals raised by the commands themselves, before or after talking to
/// the backend.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The backend or a local check rejected the action; holds the message
    /// shown to the user.
    #[error("{0}")]
    Rejected(String),

    #[error("{0} is out of stock")]
    OutOfStock(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Only pending orders can be cancelled.
    #[error("Order is {0} and can no longer be cancelled")]
    NotCancellable(String),

    #[error("Unknown order status: {0}")]
    UnknownOrderStatus(String),

    #[error("Invalid direction: {0} (expected `up` or `down`)")]
    InvalidDirection(String),
}

/// Shared state for one CLI invocation.
pub struct Context {
    pub client: ApiClient,
    pub store: LocalStore,
}

impl Context {
    /// Open the local state directory and build a client that remembers the
    /// session in it.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory cannot be opened or the HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store = LocalStore::open(&config.state_dir)?;
        let client = ApiClient::with_store(config, store.clone())?;
        Ok(Self { client, store })
    }

    pub fn cart(&self) -> CartService {
        CartService::new(self.store.clone())
    }
}
