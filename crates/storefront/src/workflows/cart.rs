//! Cart persisted between runs.

use elegance_core::ProductId;
use elegance_core::cart::Cart;
use elegance_core::models::Product;
use tracing::{debug, instrument};

use super::WorkflowError;
use crate::store::{CART_KEY, LocalStore, StoreError};

/// Loads the cart before and saves it after every mutation.
#[derive(Debug, Clone)]
pub struct CartService {
    store: LocalStore,
}

impl CartService {
    #[must_use]
    pub const fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// The saved cart; empty when nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be read.
    pub fn load(&self) -> Result<Cart, StoreError> {
        Ok(self.store.get::<Cart>(CART_KEY)?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns an error if the state file cannot be written.
    pub fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        self.store.set(CART_KEY, cart)
    }

    /// Add units of a product variant.
    ///
    /// # Errors
    ///
    /// Returns an error for unsaved products or if the cart cannot be
    /// persisted.
    #[instrument(skip(self, product), fields(product = %product.slug))]
    pub fn add(
        &self,
        product: Product,
        quantity: u32,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<Cart, WorkflowError> {
        let mut cart = self.load()?;
        cart.add_item(product, quantity, size, color)?;
        self.save(&cart)?;
        debug!(items = cart.item_count(), "Cart updated");
        Ok(cart)
    }

    /// Remove a variant's line. Returns the cart and whether a line was
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn remove(
        &self,
        product_id: &ProductId,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<(Cart, bool), StoreError> {
        let mut cart = self.load()?;
        let removed = cart.remove_item(product_id, size, color);
        if removed {
            self.save(&cart)?;
        }
        Ok((cart, removed))
    }

    /// Set a line's quantity; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn set_quantity(
        &self,
        product_id: &ProductId,
        quantity: u32,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<(Cart, bool), StoreError> {
        let mut cart = self.load()?;
        let found = cart.update_quantity(product_id, quantity, size, color);
        if found {
            self.save(&cart)?;
        }
        Ok((cart, found))
    }

    /// # Errors
    ///
    /// Returns an error if the state file cannot be written.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(CART_KEY)?;
        Ok(())
    }
}
