//! Order types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::cart::CartItem;

/// Order lifecycle status.
///
/// `PENDING → PAID/CANCELLED → PROCESSING → SHIPPED → DELIVERED`. Only
/// administrators move an order past `PAID`; customers move it there by
/// completing a verified payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
    Processing,
    Shipped,
    Delivered,
    Fulfilled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Cancelled,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Fulfilled,
    ];
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Paid => write!(f, "PAID"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
            OrderStatus::Processing => write!(f, "PROCESSING"),
            OrderStatus::Shipped => write!(f, "SHIPPED"),
            OrderStatus::Delivered => write!(f, "DELIVERED"),
            OrderStatus::Fulfilled => write!(f, "FULFILLED"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown order status: {s}"))
    }
}

/// Customer reference embedded in admin order listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "username")]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// An order as returned by `/orders` and `/admin/orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    #[serde(default, with = "crate::objects::timestamp")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub user: Option<OrderCustomer>,
}

impl Order {
    pub fn customer_email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.email.as_deref())
    }
}
