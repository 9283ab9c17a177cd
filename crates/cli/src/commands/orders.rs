//! Customer order commands.

use elegance_core::models::OrderStatusUpdate;
use elegance_core::{OrderId, OrderStatus};
use elegance_storefront::api::OrderLookup;

use super::{CommandError, Context};
use crate::output;

pub async fn list(
    ctx: &Context,
    key: Option<&str>,
    value: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let orders = match key {
        Some(key) => {
            let key: OrderLookup = key.parse()?;
            ctx.client.orders_by(key, value).await?
        }
        None => {
            let user = ctx.client.me().await?;
            ctx.client
                .orders_by(OrderLookup::UserId, Some(user.id.as_str()))
                .await?
        }
    };

    if orders.is_empty() {
        output::print("No orders yet");
    }
    for order in &orders {
        output::print(&output::order_line(order));
    }
    Ok(())
}

pub async fn cancel(ctx: &Context, order_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id = OrderId::new(order_id);
    let mut order = ctx
        .client
        .orders_by(OrderLookup::Id, Some(id.as_str()))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CommandError::OrderNotFound(order_id.to_owned()))?;

    if order.status == OrderStatus::Cancelled {
        output::print("Order is already cancelled");
        return Ok(());
    }
    if order.status != OrderStatus::Pending {
        return Err(CommandError::NotCancellable(order.status.label().to_lowercase()).into());
    }

    let update = OrderStatusUpdate::transition(&order, OrderStatus::Cancelled);
    order.status = update.status;
    order.payment_status = update.payment_status;
    let order = ctx.client.update_order(&id, &order).await?;
    output::print(&format!("Cancelled {}", output::order_line(&order)));
    Ok(())
}
