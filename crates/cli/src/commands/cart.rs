//! Local cart commands.

use elegance_core::ProductId;

use super::{CommandError, Context};
use crate::output;

pub fn show(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let cart = ctx.cart().load()?;
    output::print(&output::cart_summary(&cart));
    Ok(())
}

pub async fn add(
    ctx: &Context,
    slug: &str,
    quantity: u32,
    size: Option<String>,
    color: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let product = ctx.client.product_by_slug(slug).await?;
    if !product.in_stock() {
        return Err(CommandError::OutOfStock(product.name).into());
    }
    let cart = ctx.cart().add(product, quantity, size, color)?;
    output::print(&output::cart_summary(&cart));
    Ok(())
}

pub fn remove(
    ctx: &Context,
    product_id: &str,
    size: Option<&str>,
    color: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (cart, removed) = ctx
        .cart()
        .remove(&ProductId::new(product_id), size, color)?;
    if !removed {
        output::print("That item is not in your cart");
    }
    output::print(&output::cart_summary(&cart));
    Ok(())
}

pub fn set_quantity(
    ctx: &Context,
    product_id: &str,
    quantity: u32,
    size: Option<&str>,
    color: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (cart, found) =
        ctx.cart()
            .set_quantity(&ProductId::new(product_id), quantity, size, color)?;
    if !found {
        output::print("That item is not in your cart");
    }
    output::print(&output::cart_summary(&cart));
    Ok(())
}

pub fn clear(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.cart().clear()?;
    output::print("Cart cleared");
    Ok(())
}
