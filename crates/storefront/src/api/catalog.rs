//! Product and category queries.

use elegance_core::models::{Category, Product, ProductFilters};
use tracing::instrument;

use super::ApiClient;
use super::cache::{CacheKey, CacheValue};
use crate::error::ApiError;

impl ApiClient {
    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List products matching `filters`.
    ///
    /// Search queries bypass the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, filters: &ProductFilters) -> Result<Vec<Product>, ApiError> {
        let searching = filters.search.as_deref().is_some_and(|s| !s.trim().is_empty());
        let cache_key = CacheKey::Products(filters.clone());

        if !searching
            && let Some(CacheValue::Products(products)) = self.cached(&cache_key).await
        {
            return Ok(products);
        }

        let products: Vec<Product> = self.get_list("/api/products", &filters.to_query()).await?;

        if !searching {
            self.cache_insert(cache_key, CacheValue::Products(products.clone()))
                .await;
        }
        Ok(products)
    }

    /// Products flagged as featured.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Vec<Product>, ApiError> {
        self.product_list(CacheKey::FeaturedProducts, "/api/products/featured")
            .await
    }

    /// Products flagged as new arrivals.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn new_products(&self) -> Result<Vec<Product>, ApiError> {
        self.product_list(CacheKey::NewProducts, "/api/products/new")
            .await
    }

    async fn product_list(&self, key: CacheKey, path: &str) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.cached(&key).await {
            return Ok(products);
        }
        let products: Vec<Product> = self.get_list(path, &[]).await?;
        self.cache_insert(key, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no product has this slug.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Product, ApiError> {
        let cache_key = CacheKey::Product(slug.to_owned());
        if let Some(CacheValue::Product(product)) = self.cached(&cache_key).await {
            return Ok(*product);
        }

        let path = format!("/api/products/{}", urlencoding::encode(slug));
        let product: Option<Product> = self.get(&path).await?;
        let product =
            product.ok_or_else(|| ApiError::NotFound(format!("Product not found: {slug}")))?;

        self.cache_insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.cached(&CacheKey::Categories).await
        {
            return Ok(categories);
        }
        let categories: Vec<Category> = self.get_list("/api/categories", &[]).await?;
        self.cache_insert(
            CacheKey::Categories,
            CacheValue::Categories(categories.clone()),
        )
        .await;
        Ok(categories)
    }

    /// Get a category by its slug.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no category has this slug.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn category_by_slug(&self, slug: &str) -> Result<Category, ApiError> {
        let cache_key = CacheKey::Category(slug.to_owned());
        if let Some(CacheValue::Category(category)) = self.cached(&cache_key).await {
            return Ok(*category);
        }

        let path = format!("/api/categories/{}", urlencoding::encode(slug));
        let category: Option<Category> = self.get(&path).await?;
        let category =
            category.ok_or_else(|| ApiError::NotFound(format!("Category not found: {slug}")))?;

        self.cache_insert(cache_key, CacheValue::Category(Box::new(category.clone())))
            .await;
        Ok(category)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::ClientConfig;

    use super::*;

    fn product_json(slug: &str) -> serde_json::Value {
        json!({
            "id": format!("id-{slug}"), "name": slug, "slug": slug, "price": 2500,
            "images": [], "sizes": ["M"], "colors": [], "stock": 3,
            "featured": true, "is_new": false
        })
    }

    #[tokio::test]
    async fn test_products_are_cached_per_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("featured", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [product_json("linen-dress")], "status": 200, "success": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(ClientConfig::new(&server.uri()).unwrap()).unwrap();
        let filters = ProductFilters {
            featured: Some(true),
            ..ProductFilters::default()
        };

        let first = client.products(&filters).await.unwrap();
        let second = client.products(&filters).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].slug, "linen-dress");
    }

    #[tokio::test]
    async fn test_search_bypasses_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("search", "dress"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null, "status": 200, "success": true
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = ApiClient::new(ClientConfig::new(&server.uri()).unwrap()).unwrap();
        let filters = ProductFilters {
            search: Some("dress".to_owned()),
            ..ProductFilters::default()
        };

        assert!(client.products(&filters).await.unwrap().is_empty());
        assert!(client.products(&filters).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": "Product not found", "status": 404, "success": false
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(ClientConfig::new(&server.uri()).unwrap()).unwrap();
        let err = client.product_by_slug("ghost").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
