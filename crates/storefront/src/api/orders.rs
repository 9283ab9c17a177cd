//! Customer order endpoints.

use std::fmt;

use elegance_core::OrderId;
use elegance_core::models::Order;
use reqwest::Method;
use tracing::{info, instrument};

use super::ApiClient;
use crate::error::ApiError;

/// Field used to look orders up with `GET /api/orders`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderLookup {
    Id,
    UserId,
    Email,
}

impl OrderLookup {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::UserId => "user_id",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for OrderLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderLookup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "user_id" => Ok(Self::UserId),
            "email" => Ok(Self::Email),
            _ => Err(format!("invalid order lookup key: {s}")),
        }
    }
}

impl ApiClient {
    /// Submit a new order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the order.
    #[instrument(skip(self, order), fields(total = %order.total, items = order.items.len()))]
    pub async fn create_order(&self, order: &Order) -> Result<Order, ApiError> {
        let created: Order = self.send_json(Method::POST, "/api/orders", order).await?;
        info!(order_id = ?created.id, "Order placed");
        Ok(created)
    }

    /// Orders whose `key` field equals `value`; `None` matches every order
    /// visible to the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn orders_by(
        &self,
        key: OrderLookup,
        value: Option<&str>,
    ) -> Result<Vec<Order>, ApiError> {
        let mut query = vec![("key", key.as_str().to_owned())];
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            query.push(("value", value.to_owned()));
        }
        self.get_list("/api/orders", &query).await
    }

    /// Update an order's status, payment status and shipping address.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the order does not exist.
    #[instrument(skip(self, order), fields(order_id = %id))]
    pub async fn update_order(&self, id: &OrderId, order: &Order) -> Result<Order, ApiError> {
        let path = format!("/api/orders/{}", urlencoding::encode(id.as_str()));
        self.send_json(Method::PUT, &path, order).await
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete_order(&self, id: &OrderId) -> Result<(), ApiError> {
        let path = format!("/api/orders/{}", urlencoding::encode(id.as_str()));
        self.send_discarding(self.request(Method::DELETE, &path))
            .await?;
        info!("Order deleted");
        Ok(())
    }
}
