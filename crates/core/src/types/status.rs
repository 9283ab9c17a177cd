//! Status enums for orders, payments, users and pages.
//!
//! Order and payment statuses are free-form strings on the backend, so the
//! enums keep unknown values in an `Other` variant instead of failing to
//! decode a whole order list because of one unexpected status.

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    /// A status this client does not know about.
    Other(String),
}

impl OrderStatus {
    /// The statuses an administrator can pick from.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Other(s) => s,
        }
    }

    /// Badge label shown in order listings.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "shipped" => Self::Shipped,
            "delivered" => Self::Delivered,
            "cancelled" => Self::Cancelled,
            _ => Self::Other(s),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    /// A status this client does not know about.
    Other(String),
}

impl PaymentStatus {
    /// Wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Other(s) => s,
        }
    }

    /// Badge label shown in order listings.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Payment Pending",
            Self::Paid => "Paid",
            Self::Failed => "Failed",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => Self::Pending,
            "paid" => Self::Paid,
            "failed" => Self::Failed,
            _ => Self::Other(s),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access to the admin console.
    Admin,
    /// Regular shopper. Older accounts carry the role name `user`.
    #[default]
    #[serde(alias = "user")]
    Customer,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "customer" | "user" => Ok(Self::Customer),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Publication state of a website-builder page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
}

impl std::fmt::Display for PageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Published => write!(f, "published"),
        }
    }
}

/// Starting layout for a new page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PageTemplate {
    Home,
    About,
    Contact,
    #[default]
    Custom,
}

impl std::fmt::Display for PageTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::About => write!(f, "about"),
            Self::Contact => write!(f, "contact"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for PageTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Self::Home),
            "about" => Ok(Self::About),
            "contact" => Ok(Self::Contact),
            "custom" => Ok(Self::Custom),
            _ => Err(format!("invalid page template: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_keeps_unknown_values() {
        let status: OrderStatus = serde_json::from_str("\"on_hold\"").unwrap();
        assert_eq!(status, OrderStatus::Other("on_hold".to_owned()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"on_hold\"");
        assert_eq!(status.label(), "on_hold");
    }

    #[test]
    fn test_order_status_labels() {
        let status: OrderStatus = "shipped".parse().unwrap();
        assert_eq!(status, OrderStatus::Shipped);
        assert_eq!(status.label(), "Shipped");
    }

    #[test]
    fn test_payment_status_labels() {
        assert_eq!(PaymentStatus::Pending.label(), "Payment Pending");
        let paid: PaymentStatus = serde_json::from_str("\"paid\"").unwrap();
        assert_eq!(paid, PaymentStatus::Paid);
    }

    #[test]
    fn test_user_role_parse() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("owner".parse::<UserRole>().is_err());
        assert_eq!(UserRole::Customer.to_string(), "customer");
    }

    #[test]
    fn test_page_enums_wire_format() {
        assert_eq!(
            serde_json::to_string(&PageStatus::Published).unwrap(),
            "\"published\""
        );
        assert_eq!("about".parse::<PageTemplate>().unwrap(), PageTemplate::About);
    }
}
