//! Admin API client (admin dashboard → backend).
//!
//! All endpoints live under `/admin` and require a bearer token belonging to
//! an `ADMIN` account.

use reqwest::{Client, Method, RequestBuilder};
use url::Url;

use super::{ClientError, ShopClient, expect_success, normalize_base, parse_response};
use crate::objects::admin::{DashboardStats, UpdateOrderStatusRequest, UpdateRoleRequest};
use crate::objects::auth::{Role, User};
use crate::objects::order::{Order, OrderStatus};
use crate::objects::product::{Product, ProductPayload};

/// Typed HTTP client for the storefront **Admin API**.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl AdminClient {
    /// Create a new `AdminClient`.
    ///
    /// * `base_url` – API root including the `/api` prefix.
    /// * `token` – bearer token of an administrator.
    pub fn new(base_url: Url, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: normalize_base(base_url),
            token: token.into(),
        }
    }

    /// Reuse the connection pool and token of an authenticated
    /// [`ShopClient`].
    pub fn from_shop(shop: &ShopClient) -> Result<Self, ClientError> {
        let token = shop.token().ok_or(ClientError::Unauthenticated)?;
        Ok(Self {
            http: shop.http().clone(),
            base_url: shop.base_url().clone(),
            token: token.to_owned(),
        })
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(path)?;
        Ok(self.http.request(method, url).bearer_auth(&self.token))
    }

    /// `GET /admin/dashboard/stats` – headline counters.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        let resp = self
            .request(Method::GET, "admin/dashboard/stats")?
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /admin/products` – every product, including out of stock ones.
    pub async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        let resp = self.request(Method::GET, "admin/products")?.send().await?;
        parse_response(resp).await
    }

    /// `POST /admin/products` – create a product.
    pub async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ClientError> {
        let resp = self
            .request(Method::POST, "admin/products")?
            .json(payload)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `PUT /admin/products/{id}` – replace a product's fields.
    pub async fn update_product(
        &self,
        product_id: i64,
        payload: &ProductPayload,
    ) -> Result<Product, ClientError> {
        let resp = self
            .request(Method::PUT, &format!("admin/products/{product_id}"))?
            .json(payload)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `DELETE /admin/products/{id}` – delete a product.
    pub async fn delete_product(&self, product_id: i64) -> Result<(), ClientError> {
        let resp = self
            .request(Method::DELETE, &format!("admin/products/{product_id}"))?
            .send()
            .await?;
        expect_success(resp).await
    }

    /// `GET /admin/orders` – every order of every customer.
    pub async fn list_orders(&self) -> Result<Vec<Order>, ClientError> {
        let resp = self.request(Method::GET, "admin/orders")?.send().await?;
        parse_response(resp).await
    }

    /// `GET /admin/orders/status/{status}` – orders in one status.
    pub async fn list_orders_by_status(
        &self,
        status: OrderStatus,
    ) -> Result<Vec<Order>, ClientError> {
        let resp = self
            .request(Method::GET, &format!("admin/orders/status/{status}"))?
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `PUT /admin/orders/{id}/status` – force an order into `status`.
    pub async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order, ClientError> {
        let resp = self
            .request(Method::PUT, &format!("admin/orders/{order_id}/status"))?
            .json(&UpdateOrderStatusRequest { status })
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /admin/users` – every account.
    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        let resp = self.request(Method::GET, "admin/users")?.send().await?;
        parse_response(resp).await
    }

    /// `GET /admin/users/{id}` – a single account.
    pub async fn get_user(&self, user_id: i64) -> Result<User, ClientError> {
        let resp = self
            .request(Method::GET, &format!("admin/users/{user_id}"))?
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `PUT /admin/users/{id}/role` – promote or demote an account.
    pub async fn update_user_role(&self, user_id: i64, role: Role) -> Result<User, ClientError> {
        let resp = self
            .request(Method::PUT, &format!("admin/users/{user_id}/role"))?
            .json(&UpdateRoleRequest { role })
            .send()
            .await?;
        parse_response(resp).await
    }
}
