//! Cart line types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::Product;

/// One product/quantity pairing in the current user's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    #[serde(default)]
    pub product_id: Option<i64>,
    pub quantity: u32,
    /// Product snapshot embedded by the backend.
    #[serde(default)]
    pub product: Option<Product>,
}

impl CartItem {
    /// Unit price, zero when the backend sent no product snapshot.
    pub fn unit_price(&self) -> Decimal {
        self.product.as_ref().map(|p| p.price).unwrap_or_default()
    }

    /// Unit price multiplied by quantity.
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }

    pub fn title(&self) -> &str {
        self.product
            .as_ref()
            .map(|p| p.title.as_str())
            .unwrap_or("Product")
    }
}

/// Body for `POST /cart` and `PUT /cart/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    pub quantity: u32,
}

impl CartItemRequest {
    pub fn add(product_id: i64, quantity: u32) -> Self {
        Self {
            product_id: Some(product_id),
            quantity,
        }
    }

    pub fn quantity(quantity: u32) -> Self {
        Self {
            product_id: None,
            quantity,
        }
    }
}
