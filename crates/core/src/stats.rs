//! Dashboard aggregates over orders and users.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Order, Product, User};
use crate::types::{OrderStatus, UserRole};

/// Order count and summed totals for one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusTotals {
    pub count: usize,
    pub amount: Decimal,
}

/// Order figures shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OrderStats {
    pub total_orders: usize,
    /// Sum of every order's total, whatever its status.
    pub total_revenue: Decimal,
    /// Keyed by status wire name so unknown statuses are still counted.
    pub by_status: BTreeMap<String, StatusTotals>,
}

impl OrderStats {
    #[must_use]
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut stats = Self::default();
        for order in orders {
            stats.total_orders += 1;
            stats.total_revenue += order.total;
            let entry = stats
                .by_status
                .entry(order.status.as_str().to_owned())
                .or_default();
            entry.count += 1;
            entry.amount += order.total;
        }
        stats
    }

    /// Figures for one status; zero when no order has it.
    #[must_use]
    pub fn status(&self, status: &OrderStatus) -> StatusTotals {
        self.by_status
            .get(status.as_str())
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn pending_orders(&self) -> usize {
        self.status(&OrderStatus::Pending).count
    }
}

/// Account counts for the user management page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct UserStats {
    pub total: usize,
    pub admins: usize,
    pub customers: usize,
}

impl UserStats {
    #[must_use]
    pub fn from_users(users: &[User]) -> Self {
        let admins = users.iter().filter(|u| u.role == UserRole::Admin).count();
        Self {
            total: users.len(),
            admins,
            customers: users.len() - admins,
        }
    }
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DashboardStats {
    pub product_count: usize,
    pub orders: OrderStats,
}

impl DashboardStats {
    #[must_use]
    pub fn new(products: &[Product], orders: &[Order]) -> Self {
        Self {
            product_count: products.len(),
            orders: OrderStats::from_orders(orders),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn order(status: &str, total: i64) -> Order {
        serde_json::from_value(json!({
            "customer": {"first_name": "A", "last_name": "B", "email": "a@b.c", "phone_number": "254712345678"},
            "shipping": {"address": "X", "city": "Y"},
            "items": [], "subtotal": total, "delivery_fee": 0, "total": total,
            "status": status
        }))
        .unwrap()
    }

    fn user(role: &str) -> User {
        serde_json::from_value(json!({"id": "u", "email": "u@x.y", "role": role})).unwrap()
    }

    #[test]
    fn test_order_stats_group_by_status() {
        let stats = OrderStats::from_orders(&[
            order("pending", 1000),
            order("pending", 2500),
            order("delivered", 8000),
            order("refunded", 300),
        ]);

        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.total_revenue, Decimal::from(11_800));
        assert_eq!(stats.pending_orders(), 2);
        assert_eq!(
            stats.status(&OrderStatus::Pending).amount,
            Decimal::from(3500)
        );
        assert_eq!(stats.status(&OrderStatus::Shipped), StatusTotals::default());
        assert_eq!(stats.by_status["refunded"].count, 1);
    }

    #[test]
    fn test_empty_order_stats() {
        let stats = OrderStats::from_orders(&[]);
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.total_revenue, Decimal::ZERO);
        assert_eq!(stats.pending_orders(), 0);
    }

    #[test]
    fn test_user_stats() {
        let stats = UserStats::from_users(&[user("admin"), user("customer"), user("customer")]);
        assert_eq!(
            stats,
            UserStats {
                total: 3,
                admins: 1,
                customers: 2
            }
        );
    }
}
