//! Product and category browsing.

use clap::Args;
use elegance_core::models::ProductFilters;

use super::Context;
use crate::output;

#[derive(Args, Debug, Default)]
pub struct ProductListArgs {
    /// Only products in this category (slug)
    #[arg(short, long)]
    pub category: Option<String>,
    /// Only featured products
    #[arg(long)]
    pub featured: bool,
    /// Only new arrivals
    #[arg(long)]
    pub new: bool,
    /// Search by name or description
    #[arg(short, long)]
    pub search: Option<String>,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub offset: Option<u32>,
    /// Sort order, e.g. `price_asc`
    #[arg(long)]
    pub order: Option<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub async fn list_products(
    ctx: &Context,
    args: ProductListArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let category_id = match args.category.as_deref() {
        Some(slug) => Some(ctx.client.category_by_slug(slug).await?.id),
        None => None,
    };
    let filters = ProductFilters {
        category_id,
        featured: args.featured.then_some(true),
        is_new: args.new.then_some(true),
        search: args.search,
        limit: args.limit,
        offset: args.offset,
        order: args.order,
    };

    let products = ctx.client.products(&filters).await?;
    if args.json {
        output::print_json(&products)?;
        return Ok(());
    }
    if products.is_empty() {
        output::print("No products found");
    }
    for product in &products {
        output::print(&output::product_line(product));
    }
    Ok(())
}

pub async fn show_product(ctx: &Context, slug: &str) -> Result<(), Box<dyn std::error::Error>> {
    let product = ctx.client.product_by_slug(slug).await?;
    output::print(&output::product_details(&product));
    Ok(())
}

pub async fn list_categories(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    for category in &ctx.client.categories().await? {
        output::print(&output::category_line(category));
    }
    Ok(())
}

pub async fn show_category(ctx: &Context, slug: &str) -> Result<(), Box<dyn std::error::Error>> {
    let category = ctx.client.category_by_slug(slug).await?;
    output::print(&output::category_line(&category));

    let filters = ProductFilters {
        category_id: Some(category.id),
        ..ProductFilters::default()
    };
    for product in &ctx.client.products(&filters).await? {
        output::print(&format!("  {}", output::product_line(product)));
    }
    Ok(())
}
