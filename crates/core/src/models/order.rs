//! Customer orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::types::{OrderId, OrderStatus, PaymentStatus, ProductId, UserId};

/// Who placed the order. `phone_number` is the M-Pesa number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

/// Where the order is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub address: String,
    pub city: String,
    #[serde(default, rename = "postalCode", alias = "postal_code")]
    pub postal_code: String,
}

/// One purchased line, a snapshot of the product at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OrderItem {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A customer order. `id` and timestamps are `None` until the backend
/// accepts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub id: Option<OrderId>,
    pub customer: CustomerInfo,
    pub shipping: ShippingInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub delivery_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count, item| count.saturating_add(item.quantity))
    }

    /// Customer display name.
    #[must_use]
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.customer.first_name, self.customer.last_name)
            .trim()
            .to_owned()
    }

    /// Case-insensitive match of `query` against the customer's name,
    /// email and the order ID, as in the admin order search box.
    #[must_use]
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        [
            self.customer.first_name.as_str(),
            self.customer.last_name.as_str(),
            self.customer.email.as_str(),
            self.id.as_ref().map_or("", OrderId::as_str),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }
}

/// `PUT /api/admin/orders/:id/status` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
}

impl OrderStatusUpdate {
    /// The update that moves `order` to `status`, adjusting payment status
    /// the way the order screens do: cancelling an unpaid order fails its
    /// payment, any other move short of delivery marks it paid unless the
    /// payment already failed.
    #[must_use]
    pub fn transition(order: &Order, status: OrderStatus) -> Self {
        let current = &order.payment_status;
        let payment_status = if status == OrderStatus::Cancelled && *current != PaymentStatus::Paid
        {
            PaymentStatus::Failed
        } else if status != OrderStatus::Delivered && *current != PaymentStatus::Failed {
            PaymentStatus::Paid
        } else {
            current.clone()
        };
        Self {
            status,
            payment_status,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ORDER_JSON: &str = r#"{
        "id": "o1",
        "customer": {"user_id": "u1", "first_name": "Wanjiru", "last_name": "Kamau",
                     "email": "w@example.com", "phone_number": "254712345678"},
        "shipping": {"address": "Moi Avenue 12", "city": "Nairobi", "postalCode": "00100"},
        "items": [
            {"product_id": "p1", "name": "Kitenge Shirt", "price": 2500, "quantity": 2, "size": "M"},
            {"product_id": "p2", "name": "Beaded Belt", "price": 800.5, "quantity": 1}
        ],
        "subtotal": 5800.5, "delivery_fee": 500, "total": 6300.5,
        "status": "processing", "payment_method": "mpesa", "payment_status": "paid",
        "notes": null, "created_at": "2026-05-01T08:00:00Z", "updated_at": "2026-05-01T08:00:00Z"
    }"#;

    #[test]
    fn test_decode_order() {
        let order: Order = serde_json::from_str(ORDER_JSON).unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.shipping.postal_code, "00100");
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.customer_name(), "Wanjiru Kamau");

        let mut bulk = order;
        bulk.items[0].quantity = u32::MAX;
        assert_eq!(bulk.item_count(), u32::MAX);
    }

    #[test]
    fn test_matches_search() {
        let order: Order = serde_json::from_str(ORDER_JSON).unwrap();
        assert!(order.matches_search("kamau"));
        assert!(order.matches_search("W@EXAMPLE"));
        assert!(order.matches_search("o1"));
        assert!(order.matches_search(""));
        assert!(!order.matches_search("mombasa"));
    }

    #[test]
    fn test_line_total() {
        let order: Order = serde_json::from_str(ORDER_JSON).unwrap();
        assert_eq!(order.items[0].line_total(), Decimal::from(5000));
    }

    #[test]
    fn test_shipping_uses_camel_case_postal_code_on_the_wire() {
        let shipping = ShippingInfo {
            address: "A".to_owned(),
            city: "Mombasa".to_owned(),
            postal_code: "80100".to_owned(),
        };
        let value = serde_json::to_value(&shipping).unwrap();
        assert_eq!(value["postalCode"], "80100");
    }

    #[test]
    fn test_missing_items_decode_as_empty() {
        let json = r#"{
            "customer": {"first_name": "A", "last_name": "B", "email": "a@b.c", "phone_number": "254712345678"},
            "shipping": {"address": "X", "city": "Y"},
            "items": null, "subtotal": 1, "delivery_fee": 0, "total": 1
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert!(order.items.is_empty());
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_status_transition_adjusts_payment() {
        let mut order: Order = serde_json::from_str(ORDER_JSON).unwrap();
        order.payment_status = PaymentStatus::Pending;

        let cancel = OrderStatusUpdate::transition(&order, OrderStatus::Cancelled);
        assert_eq!(cancel.payment_status, PaymentStatus::Failed);

        let ship = OrderStatusUpdate::transition(&order, OrderStatus::Shipped);
        assert_eq!(ship.payment_status, PaymentStatus::Paid);

        let deliver = OrderStatusUpdate::transition(&order, OrderStatus::Delivered);
        assert_eq!(deliver.payment_status, PaymentStatus::Pending);

        order.payment_status = PaymentStatus::Paid;
        let refund_pending = OrderStatusUpdate::transition(&order, OrderStatus::Cancelled);
        assert_eq!(refund_pending.payment_status, PaymentStatus::Paid);

        order.payment_status = PaymentStatus::Failed;
        let retry = OrderStatusUpdate::transition(&order, OrderStatus::Processing);
        assert_eq!(retry.payment_status, PaymentStatus::Failed);
    }
}
