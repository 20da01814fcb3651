//! Seams between the client-side components and the REST backend.
//!
//! The checkout orchestrator, cart editor and admin dashboard talk to the
//! backend only through these traits, so they can be driven by the real
//! `reqwest` clients or by in-memory fakes.

use async_trait::async_trait;
use dshop_sdk::client::{AdminClient, ClientError, ShopClient};
use dshop_sdk::objects::{
    CartItem, CartItemRequest, DashboardStats, GatewayOrder, Order, OrderStatus, Product,
    ProductPayload, Role, User, VerificationResult, VerifyPaymentRequest,
};

/// Customer-facing calls used by the cart editor and checkout.
#[async_trait]
pub trait ShopBackend: Send + Sync {
    async fn get_cart(&self) -> Result<Vec<CartItem>, ClientError>;

    async fn add_to_cart(&self, item: &CartItemRequest) -> Result<Vec<CartItem>, ClientError>;

    async fn update_cart_item(
        &self,
        cart_item_id: i64,
        item: &CartItemRequest,
    ) -> Result<(), ClientError>;

    async fn remove_cart_item(&self, cart_item_id: i64) -> Result<(), ClientError>;

    async fn place_order(&self) -> Result<Order, ClientError>;

    async fn create_gateway_order(&self, order_id: i64) -> Result<GatewayOrder, ClientError>;

    async fn verify_payment(
        &self,
        payload: &VerifyPaymentRequest,
    ) -> Result<VerificationResult, ClientError>;
}

#[async_trait]
impl ShopBackend for ShopClient {
    async fn get_cart(&self) -> Result<Vec<CartItem>, ClientError> {
        ShopClient::get_cart(self).await
    }

    async fn add_to_cart(&self, item: &CartItemRequest) -> Result<Vec<CartItem>, ClientError> {
        ShopClient::add_to_cart(self, item).await
    }

    async fn update_cart_item(
        &self,
        cart_item_id: i64,
        item: &CartItemRequest,
    ) -> Result<(), ClientError> {
        ShopClient::update_cart_item(self, cart_item_id, item).await
    }

    async fn remove_cart_item(&self, cart_item_id: i64) -> Result<(), ClientError> {
        ShopClient::remove_cart_item(self, cart_item_id).await
    }

    async fn place_order(&self) -> Result<Order, ClientError> {
        ShopClient::place_order(self).await
    }

    async fn create_gateway_order(&self, order_id: i64) -> Result<GatewayOrder, ClientError> {
        ShopClient::create_gateway_order(self, order_id).await
    }

    async fn verify_payment(
        &self,
        payload: &VerifyPaymentRequest,
    ) -> Result<VerificationResult, ClientError> {
        ShopClient::verify_payment(self, payload).await
    }
}

/// Administrative calls used by the dashboard.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError>;

    async fn list_products(&self) -> Result<Vec<Product>, ClientError>;

    async fn list_orders(&self) -> Result<Vec<Order>, ClientError>;

    async fn list_users(&self) -> Result<Vec<User>, ClientError>;

    async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ClientError>;

    async fn update_product(
        &self,
        product_id: i64,
        payload: &ProductPayload,
    ) -> Result<Product, ClientError>;

    async fn delete_product(&self, product_id: i64) -> Result<(), ClientError>;

    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order, ClientError>;

    async fn update_user_role(&self, user_id: i64, role: Role) -> Result<User, ClientError>;
}

#[async_trait]
impl AdminBackend for AdminClient {
    async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        AdminClient::dashboard_stats(self).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        AdminClient::list_products(self).await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, ClientError> {
        AdminClient::list_orders(self).await
    }

    async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        AdminClient::list_users(self).await
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ClientError> {
        AdminClient::create_product(self, payload).await
    }

    async fn update_product(
        &self,
        product_id: i64,
        payload: &ProductPayload,
    ) -> Result<Product, ClientError> {
        AdminClient::update_product(self, product_id, payload).await
    }

    async fn delete_product(&self, product_id: i64) -> Result<(), ClientError> {
        AdminClient::delete_product(self, product_id).await
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order, ClientError> {
        AdminClient::update_order_status(self, order_id, status).await
    }

    async fn update_user_role(&self, user_id: i64, role: Role) -> Result<User, ClientError> {
        AdminClient::update_user_role(self, user_id, role).await
    }
}
