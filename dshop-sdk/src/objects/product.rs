//! Product catalogue types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalogue product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Body for `POST /admin/products` and `PUT /admin/products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub title: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&Product> for ProductPayload {
    fn from(p: &Product) -> Self {
        Self {
            title: p.title.clone(),
            description: p.description.clone(),
            price: p.price,
            stock: p.stock,
            sku: p.sku.clone(),
            image_url: p.image_url.clone(),
        }
    }
}
