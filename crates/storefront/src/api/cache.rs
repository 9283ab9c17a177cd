//! Cache types for backend query results.

use std::fmt;

use elegance_core::PageId;
use elegance_core::models::{Category, Page, Product, ProductFilters, SiteSetting};

/// Groups of queries invalidated together after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryFamily {
    Products,
    Categories,
    Pages,
    WebsiteConfig,
}

/// Cache key for one backend query.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products(ProductFilters),
    FeaturedProducts,
    NewProducts,
    Product(String),
    Categories,
    Category(String),
    WebsiteConfig,
    Pages,
    Page(PageId),
}

impl CacheKey {
    #[must_use]
    pub const fn family(&self) -> QueryFamily {
        match self {
            Self::Products(_) | Self::FeaturedProducts | Self::NewProducts | Self::Product(_) => {
                QueryFamily::Products
            }
            Self::Categories | Self::Category(_) => QueryFamily::Categories,
            Self::WebsiteConfig => QueryFamily::WebsiteConfig,
            Self::Pages | Self::Page(_) => QueryFamily::Pages,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Products(filters) => {
                let query = filters
                    .to_query()
                    .into_iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("&");
                write!(f, "products:{query}")
            }
            Self::FeaturedProducts => f.write_str("products:featured"),
            Self::NewProducts => f.write_str("products:new"),
            Self::Product(slug) => write!(f, "product:{slug}"),
            Self::Categories => f.write_str("categories"),
            Self::Category(slug) => write!(f, "category:{slug}"),
            Self::WebsiteConfig => f.write_str("website-config"),
            Self::Pages => f.write_str("pages"),
            Self::Page(id) => write!(f, "page:{id}"),
        }
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
    Categories(Vec<Category>),
    Category(Box<Category>),
    WebsiteSettings(Vec<SiteSetting>),
    Pages(Vec<Page>),
    Page(Box<Page>),
}
