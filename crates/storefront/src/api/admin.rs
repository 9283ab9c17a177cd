//! Admin console endpoints: users, catalog, orders and image uploads.

use elegance_core::models::{CategoryInput, Order, OrderStatusUpdate, Product, User};
use elegance_core::{OrderId, ProductId, UserId, UserRole};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::ApiClient;
use super::cache::QueryFamily;
use crate::error::ApiError;

/// Largest image the backend accepts.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// An image file ready to upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Check an image before upload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] unless the content type is
    /// `image/*` and the file is at most [`MAX_IMAGE_BYTES`].
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, ApiError> {
        let content_type = content_type.into();
        if !content_type.starts_with("image/") {
            return Err(ApiError::InvalidRequest(
                "Please select a valid image file".to_owned(),
            ));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ApiError::InvalidRequest(
                "Image size must be less than 2MB".to_owned(),
            ));
        }
        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }

    /// Like [`ImageUpload::new`], guessing the content type from the file
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] for non-image extensions or
    /// oversized files.
    pub fn from_file_name(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ApiError> {
        let file_name = file_name.into();
        let content_type = image_content_type(&file_name).unwrap_or("application/octet-stream");
        Self::new(file_name, content_type, bytes)
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

fn image_content_type(file_name: &str) -> Option<&'static str> {
    let (_, extension) = file_name.rsplit_once('.')?;
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

/// The file name the backend stores an uploaded image under: the last path
/// segment of its URL.
#[must_use]
pub fn image_file_name(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|name| !name.is_empty())
}

#[derive(Deserialize)]
struct UploadedImage {
    url: String,
}

#[derive(Serialize)]
struct RoleBody {
    role: UserRole,
}

#[derive(Serialize)]
struct UserUpdateBody<'a> {
    id: &'a UserId,
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
}

impl ApiClient {
    // =========================================================================
    // Users
    // =========================================================================

    /// Every registered account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for non-admins.
    #[instrument(skip(self))]
    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.get_list("/api/admin/users", &[]).await
    }

    /// Change an account's role.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn update_user_role(&self, id: &UserId, role: UserRole) -> Result<User, ApiError> {
        let path = format!("/api/admin/users/{}/role", urlencoding::encode(id.as_str()));
        let user: User = self
            .send_json(Method::PUT, &path, &RoleBody { role })
            .await?;
        info!(%role, "User role changed");
        Ok(user)
    }

    /// Update an account's name and email.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn update_user(&self, user: &User) -> Result<(), ApiError> {
        let body = UserUpdateBody {
            id: &user.id,
            first_name: &user.first_name,
            last_name: &user.last_name,
            email: &user.email,
        };
        self.send_discarding(self.request(Method::PUT, "/api/admin/users").json(&body))
            .await
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &UserId) -> Result<(), ApiError> {
        let path = format!("/api/admin/users/{}", urlencoding::encode(id.as_str()));
        self.send_discarding(self.request(Method::DELETE, &path))
            .await?;
        info!("User deleted");
        Ok(())
    }

    /// Orders placed by one account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn user_orders(&self, id: &UserId) -> Result<Vec<Order>, ApiError> {
        let path = format!("/api/admin/users/{}/orders", urlencoding::encode(id.as_str()));
        self.get_list(&path, &[]).await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] for a blank name, or an error if
    /// the request fails.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(&self, input: &CategoryInput) -> Result<(), ApiError> {
        input
            .validate()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.send_discarding(self.request(Method::POST, "/api/admin/categories").json(input))
            .await?;
        self.invalidate(&[QueryFamily::Categories]).await;
        Ok(())
    }

    /// Update the category currently at `slug`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] for a blank name, or an error if
    /// the request fails.
    #[instrument(skip(self, input), fields(slug = %slug))]
    pub async fn update_category(&self, slug: &str, input: &CategoryInput) -> Result<(), ApiError> {
        input
            .validate()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let path = format!("/api/admin/categories/{}", urlencoding::encode(slug));
        self.send_discarding(self.request(Method::PUT, &path).json(input))
            .await?;
        self.invalidate(&[QueryFamily::Categories]).await;
        Ok(())
    }

    /// Delete a category by ID or slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id_or_slug: &str) -> Result<(), ApiError> {
        let path = format!("/api/admin/categories/{}", urlencoding::encode(id_or_slug));
        self.send_discarding(self.request(Method::DELETE, &path))
            .await?;
        self.invalidate(&[QueryFamily::Categories]).await;
        info!("Category deleted");
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Every order in the store.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for non-admins.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get_list("/api/admin/orders", &[]).await
    }

    /// Set an order's fulfilment and payment status.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        update: &OrderStatusUpdate,
    ) -> Result<Order, ApiError> {
        let path = format!("/api/admin/orders/{}/status", urlencoding::encode(id.as_str()));
        let order: Order = self.send_json(Method::PUT, &path, update).await?;
        info!(status = %update.status, payment_status = %update.payment_status, "Order status updated");
        Ok(order)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Every product, including out-of-stock ones.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for non-admins.
    #[instrument(skip(self))]
    pub async fn admin_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_list("/api/admin/products", &[]).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the product fails validation,
    /// or an error if the backend rejects it.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &Product) -> Result<Product, ApiError> {
        product
            .validate()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let created: Product = self
            .send_json(Method::POST, "/api/admin/products", product)
            .await?;
        self.invalidate(&[QueryFamily::Products]).await;
        info!(product_id = ?created.id, "Product created");
        Ok(created)
    }

    /// Replace a product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the product fails validation,
    /// or an error if the backend rejects it.
    #[instrument(skip(self, product), fields(product_id = %id))]
    pub async fn update_product(&self, id: &ProductId, product: &Product) -> Result<Product, ApiError> {
        product
            .validate()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let path = format!("/api/admin/products/{}", urlencoding::encode(id.as_str()));
        let updated: Product = self.send_json(Method::PUT, &path, product).await?;
        self.invalidate(&[QueryFamily::Products]).await;
        Ok(updated)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        let path = format!("/api/admin/products/{}", urlencoding::encode(id.as_str()));
        self.send_discarding(self.request(Method::DELETE, &path))
            .await?;
        self.invalidate(&[QueryFamily::Products]).await;
        info!("Product deleted");
        Ok(())
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// Upload an image and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the file.
    #[instrument(skip(self, image), fields(file_name = %image.file_name, size = image.bytes.len()))]
    pub async fn upload_image(&self, image: ImageUpload) -> Result<String, ApiError> {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)?;
        let form = Form::new().part("file", part);
        let uploaded: UploadedImage = self
            .execute(
                self.request(Method::POST, "/api/admin/upload/image")
                    .multipart(form),
            )
            .await?;
        info!(url = %uploaded.url, "Image uploaded");
        Ok(uploaded.url)
    }

    /// Delete a previously uploaded image by file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_image(&self, file_name: &str) -> Result<(), ApiError> {
        let path = format!("/api/admin/images/{}", urlencoding::encode(file_name));
        self.send_discarding(self.request(Method::DELETE, &path))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::ClientConfig;

    use super::*;

    #[test]
    fn test_image_upload_checks_type_and_size() {
        assert!(ImageUpload::from_file_name("dress.PNG", vec![0; 10]).is_ok());

        let err = ImageUpload::from_file_name("notes.pdf", vec![0; 10]).unwrap_err();
        assert_eq!(err.user_message(), "Please select a valid image file");

        let err = ImageUpload::new("big.jpg", "image/jpeg", vec![0; MAX_IMAGE_BYTES + 1])
            .unwrap_err();
        assert_eq!(err.user_message(), "Image size must be less than 2MB");
        assert!(ImageUpload::new("edge.jpg", "image/jpeg", vec![0; MAX_IMAGE_BYTES]).is_ok());
    }

    #[test]
    fn test_image_file_name() {
        assert_eq!(
            image_file_name("http://localhost:8080/uploads/abc123.jpg"),
            Some("abc123.jpg")
        );
        assert_eq!(image_file_name("https://cdn.example.com/"), None);
    }

    #[tokio::test]
    async fn test_upload_posts_multipart_and_returns_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/upload/image"))
            .and(header_exists("content-type"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {"url": "/uploads/abc.png"}, "status": 201, "success": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(ClientConfig::new(&server.uri()).unwrap()).unwrap();
        let image = ImageUpload::from_file_name("dress.png", vec![1, 2, 3]).unwrap();
        assert_eq!(client.upload_image(image).await.unwrap(), "/uploads/abc.png");
    }

    #[tokio::test]
    async fn test_set_role_sends_role_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/admin/users/u9/role"))
            .and(body_json(json!({"role": "admin"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": "u9", "email": "otieno@example.com", "role": "admin"},
                "status": 200, "success": true
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(ClientConfig::new(&server.uri()).unwrap()).unwrap();
        let user = client
            .update_user_role(&UserId::new("u9"), UserRole::Admin)
            .await
            .unwrap();
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_delete_product_accepts_message_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/admin/products/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Product deleted successfully", "status": 200, "success": true
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(ClientConfig::new(&server.uri()).unwrap()).unwrap();
        client.delete_product(&ProductId::new("p1")).await.unwrap();
    }
}
