//! Store administration commands.

use std::path::Path;

use elegance_core::models::OrderStatusUpdate;
use elegance_core::stats::{DashboardStats, UserStats};
use elegance_core::{OrderId, OrderStatus, UserId, UserRole};
use elegance_storefront::api::{ImageUpload, OrderLookup};

use super::{CommandError, Context};
use crate::output;

pub async fn users(ctx: &Context, search: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let users = ctx.client.users().await?;
    let matching: Vec<_> = users
        .iter()
        .filter(|user| search.is_none_or(|query| user.matches_search(query)))
        .collect();

    for user in &matching {
        output::print(&output::user_line(user));
    }
    output::print(&output::user_summary(&UserStats::from_users(&users)));
    Ok(())
}

pub async fn set_role(
    ctx: &Context,
    user_id: &str,
    role: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let role: UserRole = role.parse()?;
    let user = ctx
        .client
        .update_user_role(&UserId::new(user_id), role)
        .await?;
    output::print(&output::user_line(&user));
    Ok(())
}

pub async fn delete_user(ctx: &Context, user_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    ctx.client.delete_user(&UserId::new(user_id)).await?;
    output::print("User deleted");
    Ok(())
}

pub async fn orders(ctx: &Context, search: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let orders = ctx.client.all_orders().await?;
    for order in orders
        .iter()
        .filter(|order| search.is_none_or(|query| order.matches_search(query)))
    {
        output::print(&format!(
            "{}  {}",
            output::order_line(order),
            order.customer_name()
        ));
    }
    Ok(())
}

pub async fn set_order_status(
    ctx: &Context,
    order_id: &str,
    status: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = OrderId::new(order_id);
    let status: OrderStatus = status.parse()?;
    if !OrderStatus::ALL.contains(&status) {
        return Err(CommandError::UnknownOrderStatus(status.to_string()).into());
    }

    let order = ctx
        .client
        .orders_by(OrderLookup::Id, Some(id.as_str()))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CommandError::OrderNotFound(order_id.to_owned()))?;

    let update = OrderStatusUpdate::transition(&order, status);
    let order = ctx.client.update_order_status(&id, &update).await?;
    output::print(&output::order_line(&order));
    Ok(())
}

pub async fn stats(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let (products, orders, users) = tokio::try_join!(
        ctx.client.admin_products(),
        ctx.client.all_orders(),
        ctx.client.users(),
    )?;

    output::print(&output::dashboard(&DashboardStats::new(&products, &orders)));
    output::print(&output::user_summary(&UserStats::from_users(&users)));
    Ok(())
}

pub async fn upload_image(ctx: &Context, file: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file);
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| format!("not a file: {file}"))?;
    let bytes = tokio::fs::read(path).await?;

    let upload = ImageUpload::from_file_name(file_name, bytes)?;
    let url = ctx.client.upload_image(upload).await?;
    output::print(&url);
    Ok(())
}
