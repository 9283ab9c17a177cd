//! Catalog products.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{ValidationError, null_as_default};
use crate::types::{CategoryId, ProductId};

/// A catalog item with price, stock and variant attributes.
///
/// `id` and the timestamps are absent on products that have not been saved
/// yet (the admin product form sends the same shape to create and update).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sizes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub colors: Vec<String>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// True when a higher original price is shown struck through.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.original_price.is_some_and(|original| original > self.price)
    }

    /// Whole-percent discount against the original price, if on sale.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price.filter(|_| self.is_on_sale())?;
        let percent = ((original - self.price) / original * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        percent.to_string().parse().ok()
    }

    /// Whether any units are available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// First image, used for cards and order lines.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Validate the admin product form.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails: name required, slug required,
    /// price above zero, stock not negative, original price above zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::required("name"));
        }
        if self.slug.trim().is_empty() {
            return Err(ValidationError::required("slug"));
        }
        if self.price <= Decimal::ZERO {
            return Err(ValidationError::invalid("price", "must be greater than 0"));
        }
        if self.stock < 0 {
            return Err(ValidationError::invalid("stock", "cannot be negative"));
        }
        if self.original_price.is_some_and(|p| p <= Decimal::ZERO) {
            return Err(ValidationError::invalid(
                "original_price",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Query filters for the product listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProductFilters {
    pub category_id: Option<CategoryId>,
    pub featured: Option<bool>,
    pub is_new: Option<bool>,
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order: Option<String>,
}

impl ProductFilters {
    /// Query-string pairs in a stable order; unset filters are omitted.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(category_id) = &self.category_id {
            query.push(("category_id", category_id.to_string()));
        }
        if let Some(featured) = self.featured {
            query.push(("featured", featured.to_string()));
        }
        if let Some(is_new) = self.is_new {
            query.push(("is_new", is_new.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query.push(("search", search.trim().to_owned()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(order) = &self.order {
            query.push(("order", order.clone()));
        }
        query
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(price: i64, original: Option<i64>) -> Product {
        Product {
            id: Some(ProductId::new("p1")),
            name: "Linen Dress".to_owned(),
            slug: "linen-dress".to_owned(),
            description: None,
            price: Decimal::from(price),
            original_price: original.map(Decimal::from),
            category_id: None,
            category_name: None,
            images: vec!["a.jpg".to_owned(), "b.jpg".to_owned()],
            sizes: vec![],
            colors: vec![],
            stock: 3,
            featured: false,
            is_new: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_decodes_backend_json_with_nulls() {
        let json = r#"{
            "id": "p1", "name": "Scarf", "slug": "scarf", "description": null,
            "price": 1499.5, "original_price": null, "category_id": "c1",
            "images": null, "sizes": ["S", "M"], "colors": null,
            "stock": 4, "featured": true, "is_new": false,
            "created_at": "2026-03-01T10:00:00Z", "updated_at": "2026-03-02T10:00:00Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Decimal::new(14_995, 1));
        assert!(product.images.is_empty());
        assert_eq!(product.sizes, vec!["S", "M"]);
        assert_eq!(product.category_id, Some(CategoryId::new("c1")));
    }

    #[test]
    fn test_price_serializes_as_number() {
        let value = serde_json::to_value(product(2500, None)).unwrap();
        assert_eq!(value["price"], serde_json::json!(2500.0));
        assert!(value["original_price"].is_null());
    }

    #[test]
    fn test_sale_and_discount() {
        let on_sale = product(750, Some(1000));
        assert!(on_sale.is_on_sale());
        assert_eq!(on_sale.discount_percent(), Some(25));

        let full_price = product(1000, Some(900));
        assert!(!full_price.is_on_sale());
        assert_eq!(full_price.discount_percent(), None);
    }

    #[test]
    fn test_primary_image_and_stock() {
        let mut p = product(100, None);
        assert_eq!(p.primary_image(), Some("a.jpg"));
        assert!(p.in_stock());
        p.stock = 0;
        assert!(!p.in_stock());
    }

    #[test]
    fn test_validate_rules() {
        assert!(product(100, None).validate().is_ok());

        let mut p = product(0, None);
        assert_eq!(p.validate().unwrap_err().field, "price");

        p = product(100, None);
        p.stock = -1;
        assert_eq!(p.validate().unwrap_err().field, "stock");

        p = product(100, None);
        p.name = "  ".to_owned();
        assert_eq!(p.validate().unwrap_err().to_string(), "name: is required");
    }

    #[test]
    fn test_filters_query_skips_unset_and_blank_search() {
        let filters = ProductFilters {
            featured: Some(true),
            search: Some("   ".to_owned()),
            limit: Some(12),
            ..ProductFilters::default()
        };
        assert_eq!(
            filters.to_query(),
            vec![("featured", "true".to_owned()), ("limit", "12".to_owned())]
        );
    }
}
