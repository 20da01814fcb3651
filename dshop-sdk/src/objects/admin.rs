//! Admin API request and response types.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::auth::Role;
use super::order::OrderStatus;

/// Response of `GET /admin/dashboard/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_users: i64,
    #[serde(default)]
    pub total_products: i64,
    #[serde(default)]
    pub total_orders: i64,
    #[serde(default)]
    pub users_by_role: HashMap<Role, i64>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
}

/// Body of `PUT /admin/orders/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Body of `PUT /admin/users/{id}/role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}
