//! Shopping cart line management.
//!
//! A cart line is identified by product, size and color together, so the
//! same shirt in two sizes occupies two lines. The cart serializes as a plain
//! JSON array of lines, which is the form persisted between sessions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{OrderItem, Product};
use crate::pricing::OrderTotals;
use crate::types::ProductId;

/// Errors from cart mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Only products the backend has assigned an ID can be bought.
    #[error("product \"{0}\" has not been saved")]
    UnsavedProduct(String),
}

/// One cart line: a product snapshot plus the chosen variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CartItem {
    fn matches(&self, product_id: &ProductId, size: Option<&str>, color: Option<&str>) -> bool {
        self.product.id.as_ref() == Some(product_id)
            && self.size.as_deref() == size
            && self.color.as_deref() == color
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }

    /// The line as an order item. `None` for a product without an ID.
    #[must_use]
    pub fn to_order_item(&self) -> Option<OrderItem> {
        Some(OrderItem {
            product_id: self.product.id.clone()?,
            name: self.product.name.clone(),
            price: self.product.price,
            quantity: self.quantity,
            size: self.size.clone(),
            color: self.color.clone(),
            image: self.product.primary_image().map(str::to_owned),
        })
    }
}

/// The customer's cart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Add `quantity` units of a product variant, merging into an existing
    /// line for the same variant. Adding zero units does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnsavedProduct`] if the product has no ID.
    pub fn add_item(
        &mut self,
        product: Product,
        quantity: u32,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<(), CartError> {
        let Some(product_id) = product.id.clone() else {
            return Err(CartError::UnsavedProduct(product.name));
        };
        if quantity == 0 {
            return Ok(());
        }

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.matches(&product_id, size.as_deref(), color.as_deref()))
        {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem {
                product,
                quantity,
                size,
                color,
            });
        }
        Ok(())
    }

    /// Remove a variant's line. Returns whether a line was removed.
    pub fn remove_item(
        &mut self,
        product_id: &ProductId,
        size: Option<&str>,
        color: Option<&str>,
    ) -> bool {
        let before = self.items.len();
        self.items
            .retain(|line| !line.matches(product_id, size, color));
        self.items.len() != before
    }

    /// Set a line's quantity; zero removes the line. Returns whether a line
    /// was found.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
        size: Option<&str>,
        color: Option<&str>,
    ) -> bool {
        if quantity == 0 {
            return self.remove_item(product_id, size, color);
        }
        match self
            .items
            .iter_mut()
            .find(|line| line.matches(product_id, size, color))
        {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines, saturating at `u32::MAX`.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    /// Sum of price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        OrderTotals::from_subtotal(self.subtotal())
    }
}
