//! Admin dashboard state.
//!
//! Stats and the three management tables are fetched together on load.
//! Mutations go to the backend first and then patch the affected row with
//! the backend's response.

use std::sync::Arc;

use dshop_sdk::client::ClientError;
use dshop_sdk::objects::{DashboardStats, Order, OrderStatus, Product, Role, User};
use thiserror::Error;
use tracing::{info, warn};

use crate::backend::AdminBackend;
use crate::validation::{ProductForm, ValidationError};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{op} failed: {source}")]
    Backend {
        op: &'static str,
        #[source]
        source: ClientError,
    },
}

impl DashboardError {
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Validation(e) => e.to_string(),
            DashboardError::Backend { op, source } => {
                format!("Failed to {op}: {}", source.banner_message("Server error"))
            }
        }
    }
}

fn backend_err(op: &'static str) -> impl FnOnce(ClientError) -> DashboardError {
    move |source| {
        warn!(op, error = %source, "Admin call failed");
        DashboardError::Backend { op, source }
    }
}

pub struct AdminDashboard {
    backend: Arc<dyn AdminBackend>,
    pub stats: DashboardStats,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub users: Vec<User>,
}

impl AdminDashboard {
    /// Fetch stats, products, orders and users concurrently.
    pub async fn load(backend: Arc<dyn AdminBackend>) -> Result<Self, DashboardError> {
        let (stats, products, orders, users) = Self::fetch_all(backend.as_ref()).await?;
        Ok(Self {
            backend,
            stats,
            products,
            orders,
            users,
        })
    }

    pub async fn reload(&mut self) -> Result<(), DashboardError> {
        let (stats, products, orders, users) = Self::fetch_all(self.backend.as_ref()).await?;
        self.stats = stats;
        self.products = products;
        self.orders = orders;
        self.users = users;
        Ok(())
    }

    async fn fetch_all(
        backend: &dyn AdminBackend,
    ) -> Result<(DashboardStats, Vec<Product>, Vec<Order>, Vec<User>), DashboardError> {
        let loaded = tokio::try_join!(
            backend.dashboard_stats(),
            backend.list_products(),
            backend.list_orders(),
            backend.list_users(),
        )
        .map_err(backend_err("load dashboard"))?;
        info!(
            products = loaded.1.len(),
            orders = loaded.2.len(),
            users = loaded.3.len(),
            "Dashboard loaded"
        );
        Ok(loaded)
    }

    pub async fn create_product(&mut self, form: &ProductForm) -> Result<Product, DashboardError> {
        let payload = form.validate()?;
        let created = self
            .backend
            .create_product(&payload)
            .await
            .map_err(backend_err("create product"))?;
        info!(product_id = created.id, "Product created");
        self.products.push(created.clone());
        Ok(created)
    }

    pub async fn update_product(
        &mut self,
        product_id: i64,
        form: &ProductForm,
    ) -> Result<(), DashboardError> {
        let payload = form.validate()?;
        let updated = self
            .backend
            .update_product(product_id, &payload)
            .await
            .map_err(backend_err("update product"))?;
        replace_by_id(&mut self.products, product_id, updated, |p| p.id);
        info!(product_id, "Product updated");
        Ok(())
    }

    pub async fn delete_product(&mut self, product_id: i64) -> Result<(), DashboardError> {
        self.backend
            .delete_product(product_id)
            .await
            .map_err(backend_err("delete product"))?;
        self.products.retain(|p| p.id != product_id);
        info!(product_id, "Product deleted");
        Ok(())
    }

    pub async fn update_order_status(
        &mut self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<(), DashboardError> {
        let updated = self
            .backend
            .update_order_status(order_id, status)
            .await
            .map_err(backend_err("update order status"))?;
        replace_by_id(&mut self.orders, order_id, updated, |o| o.id);
        info!(order_id, %status, "Order status updated");
        Ok(())
    }

    pub async fn update_user_role(
        &mut self,
        user_id: i64,
        role: Role,
    ) -> Result<(), DashboardError> {
        let updated = self
            .backend
            .update_user_role(user_id, role)
            .await
            .map_err(backend_err("update user role"))?;
        replace_by_id(&mut self.users, user_id, updated, |u| u.id);
        info!(user_id, %role, "User role updated");
        Ok(())
    }

    pub fn pending_orders(&self) -> usize {
        self.orders
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .count()
    }

    pub fn customer_count(&self) -> usize {
        self.users.iter().filter(|u| u.role == Role::Customer).count()
    }
}

fn replace_by_id<T>(rows: &mut [T], id: i64, fresh: T, id_of: impl Fn(&T) -> i64) {
    if let Some(row) = rows.iter_mut().find(|row| id_of(row) == id) {
        *row = fresh;
    }
}
