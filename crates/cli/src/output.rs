//! Plain-text rendering for the terminal.

use std::fmt::Write as _;

use elegance_core::cart::Cart;
use elegance_core::models::settings::MpesaConfig;
use elegance_core::models::{Category, Order, Page, Product, User};
use elegance_core::stats::{DashboardStats, UserStats};
use elegance_core::{OrderStatus, format_price, format_short_date};
use rust_decimal::Decimal;
use serde::Serialize;

/// Write one block of output to stdout.
#[allow(clippy::print_stdout)]
pub fn print(text: &str) {
    println!("{text}");
}

/// Write a value as pretty JSON.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    print(&serde_json::to_string_pretty(value)?);
    Ok(())
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

// =============================================================================
// Catalog
// =============================================================================

pub fn product_line(product: &Product) -> String {
    let mut line = format!(
        "{:<24} {:<32} {}",
        product.slug,
        product.name,
        format_price(product.price)
    );
    if let (Some(original), Some(percent)) = (product.original_price, product.discount_percent())
    {
        let _ = write!(line, " (was {}, -{percent}%)", format_price(original));
    }
    if !product.in_stock() {
        line.push_str(" [out of stock]");
    }
    line
}

pub fn product_details(product: &Product) -> String {
    let mut out = product_line(product);
    if let Some(id) = &product.id {
        let _ = write!(out, "\n  id: {id}");
    }
    if let Some(category) = &product.category_name {
        let _ = write!(out, "\n  category: {category}");
    }
    if !product.sizes.is_empty() {
        let _ = write!(out, "\n  sizes: {}", product.sizes.join(", "));
    }
    if !product.colors.is_empty() {
        let _ = write!(out, "\n  colors: {}", product.colors.join(", "));
    }
    let _ = write!(out, "\n  stock: {}", product.stock);
    if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(out, "\n\n{description}");
    }
    out
}

pub fn category_line(category: &Category) -> String {
    match category.description.as_deref().filter(|d| !d.is_empty()) {
        Some(description) => format!("{:<20} {}  {description}", category.slug, category.name),
        None => format!("{:<20} {}", category.slug, category.name),
    }
}

// =============================================================================
// Cart and orders
// =============================================================================

pub fn cart_summary(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Your cart is empty".to_owned();
    }

    let mut out = String::new();
    for item in cart.items() {
        let variant: Vec<&str> = [item.size.as_deref(), item.color.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        let _ = write!(
            out,
            "{} x {}{}  {}",
            item.quantity,
            item.product.name,
            if variant.is_empty() {
                String::new()
            } else {
                format!(" ({})", variant.join(", "))
            },
            format_price(item.line_total())
        );
        if let Some(id) = &item.product.id {
            let _ = write!(out, "  [{id}]");
        }
        out.push('\n');
    }

    let totals = cart.totals();
    let delivery = if totals.free_delivery() {
        "FREE".to_owned()
    } else {
        format_price(totals.delivery_fee)
    };
    let _ = write!(
        out,
        "\nSubtotal: {}\nDelivery: {delivery}\nTotal:    {}",
        format_price(totals.subtotal),
        format_price(totals.total)
    );
    let remaining = totals.amount_to_free_delivery();
    if remaining > Decimal::ZERO {
        let _ = write!(
            out,
            "\nAdd {} more for free delivery",
            format_price(remaining)
        );
    }
    out
}

pub fn order_line(order: &Order) -> String {
    let id = order.id.as_ref().map_or("(unsaved)", |id| short_id(id.as_str()));
    format!(
        "#{id}  {}  {} / {}  {}  ({} items)",
        format_short_date(order.created_at.as_ref()),
        order.status.label(),
        order.payment_status.label(),
        format_price(order.total),
        order.item_count()
    )
}

/// How to pay for an order with M-Pesa.
pub fn mpesa_instructions(mpesa: &MpesaConfig, total: Decimal) -> String {
    let (label, number) = mpesa.business_number();
    let mut out = format!("Pay {} via M-Pesa\n  {label}: {number}", format_price(total));
    if !mpesa.account_number.is_empty() {
        let _ = write!(out, "\n  Account Number: {}", mpesa.account_number);
    }
    if !mpesa.phone.is_empty() {
        let _ = write!(out, "\n  M-Pesa No: {}", mpesa.phone);
    }
    out
}

// =============================================================================
// Admin
// =============================================================================

pub fn user_line(user: &User) -> String {
    format!(
        "{:<36} {:<28} {:<24} {}",
        user.id.as_str(),
        user.email,
        user.full_name(),
        user.role
    )
}

pub fn user_summary(stats: &UserStats) -> String {
    format!(
        "{} users ({} admins, {} customers)",
        stats.total, stats.admins, stats.customers
    )
}

pub fn dashboard(stats: &DashboardStats) -> String {
    let orders = &stats.orders;
    let mut out = format!(
        "Products:       {}\nTotal orders:   {}\nPending orders: {}\nRevenue:        {}\n",
        stats.product_count,
        orders.total_orders,
        orders.pending_orders(),
        format_price(orders.total_revenue)
    );
    for status in &OrderStatus::ALL {
        let totals = orders.status(status);
        let _ = write!(
            out,
            "\n  {:<11} {:>4}  {}",
            status.label(),
            totals.count,
            format_price(totals.amount)
        );
    }
    out
}

// =============================================================================
// Pages
// =============================================================================

pub fn page_line(page: &Page) -> String {
    format!(
        "{:<36} {:<24} {:<20} {:<8} {}",
        page.id.as_ref().map_or("(unsaved)", |id| id.as_str()),
        page.title,
        page.slug,
        page.template.to_string(),
        page.status
    )
}

pub fn page_details(page: &Page) -> String {
    let mut out = page_line(page);
    if page.is_published() {
        let _ = write!(
            out,
            "\n  published {}",
            format_short_date(page.published_at.as_ref())
        );
    }
    for (index, section) in page.sections.iter().enumerate() {
        let _ = write!(
            out,
            "\n  {}. {:<12} {}  {}",
            index + 1,
            section.kind().as_str(),
            section.id(),
            section.title().unwrap_or_default()
        );
    }
    out
}
