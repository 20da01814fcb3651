//! Storefront API client (customer-facing endpoints).
//!
//! Every request carries `Authorization: Bearer <token>` when the client
//! holds a token. Auth and catalogue endpoints work without one.

use reqwest::{Client, Method, RequestBuilder};
use url::Url;

use super::{ClientError, expect_success, normalize_base, parse_response, with_bearer};
use crate::objects::auth::{AuthResponse, LoginRequest, RegisterRequest, RegisterResponse};
use crate::objects::cart::{CartItem, CartItemRequest};
use crate::objects::order::Order;
use crate::objects::payment::{GatewayOrder, VerificationResult, VerifyPaymentRequest};
use crate::objects::product::Product;

/// Typed HTTP client for the customer-facing storefront API.
#[derive(Debug, Clone)]
pub struct ShopClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ShopClient {
    /// Create a new `ShopClient`.
    ///
    /// * `base_url` – API root including the `/api` prefix
    ///   (e.g. `http://localhost:8080/api/`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url: normalize_base(base_url),
            token: None,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Attach a bearer token to every subsequent request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Drop the bearer token.
    pub fn without_token(mut self) -> Self {
        self.token = None;
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(path)?;
        Ok(with_bearer(self.http.request(method, url), self.token()))
    }

    // -- auth ---------------------------------------------------------------

    /// `POST /auth/login` – exchange credentials for a token.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ClientError> {
        let resp = self
            .request(Method::POST, "auth/login")?
            .json(credentials)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /auth/register` – create a customer account.
    pub async fn register(
        &self,
        payload: &RegisterRequest,
    ) -> Result<RegisterResponse, ClientError> {
        let resp = self
            .request(Method::POST, "auth/register")?
            .json(payload)
            .send()
            .await?;
        parse_response(resp).await
    }

    // -- catalogue ----------------------------------------------------------

    /// `GET /products` – list all products.
    pub async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        let resp = self.request(Method::GET, "products")?.send().await?;
        parse_response(resp).await
    }

    /// `GET /products/{id}` – fetch a single product.
    pub async fn get_product(&self, product_id: i64) -> Result<Product, ClientError> {
        let resp = self
            .request(Method::GET, &format!("products/{product_id}"))?
            .send()
            .await?;
        parse_response(resp).await
    }

    // -- cart ---------------------------------------------------------------

    /// `GET /cart` – the current user's cart lines.
    pub async fn get_cart(&self) -> Result<Vec<CartItem>, ClientError> {
        let resp = self.request(Method::GET, "cart")?.send().await?;
        parse_response(resp).await
    }

    /// `POST /cart` – add a product to the cart. Returns the updated cart.
    pub async fn add_to_cart(&self, item: &CartItemRequest) -> Result<Vec<CartItem>, ClientError> {
        let resp = self
            .request(Method::POST, "cart")?
            .json(item)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `PUT /cart/{id}` – change a line's quantity.
    pub async fn update_cart_item(
        &self,
        cart_item_id: i64,
        item: &CartItemRequest,
    ) -> Result<(), ClientError> {
        let resp = self
            .request(Method::PUT, &format!("cart/{cart_item_id}"))?
            .json(item)
            .send()
            .await?;
        expect_success(resp).await
    }

    /// `DELETE /cart/{id}` – remove a line.
    pub async fn remove_cart_item(&self, cart_item_id: i64) -> Result<(), ClientError> {
        let resp = self
            .request(Method::DELETE, &format!("cart/{cart_item_id}"))?
            .send()
            .await?;
        expect_success(resp).await
    }

    // -- orders -------------------------------------------------------------

    /// `POST /orders/place` – turn the current cart into a pending order.
    pub async fn place_order(&self) -> Result<Order, ClientError> {
        let resp = self.request(Method::POST, "orders/place")?.send().await?;
        parse_response(resp).await
    }

    /// `GET /orders` – order history of the current user.
    pub async fn list_orders(&self) -> Result<Vec<Order>, ClientError> {
        let resp = self.request(Method::GET, "orders")?.send().await?;
        parse_response(resp).await
    }

    /// `GET /orders/{id}` – a single order.
    pub async fn get_order(&self, order_id: i64) -> Result<Order, ClientError> {
        let resp = self
            .request(Method::GET, &format!("orders/{order_id}"))?
            .send()
            .await?;
        parse_response(resp).await
    }

    // -- payments -----------------------------------------------------------

    /// `POST /payments/create-order/{orderId}` – create the gateway order
    /// for a placed order.
    pub async fn create_gateway_order(&self, order_id: i64) -> Result<GatewayOrder, ClientError> {
        let resp = self
            .request(Method::POST, &format!("payments/create-order/{order_id}"))?
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /payments/verify` – have the backend check the widget's
    /// signature and mark the order paid.
    pub async fn verify_payment(
        &self,
        payload: &VerifyPaymentRequest,
    ) -> Result<VerificationResult, ClientError> {
        let resp = self
            .request(Method::POST, "payments/verify")?
            .json(payload)
            .send()
            .await?;
        parse_response(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ShopClient {
        ShopClient::new(Url::parse("http://localhost:8080/api").unwrap())
    }

    #[test]
    fn test_requests_without_token_have_no_auth_header() {
        let req = client()
            .request(Method::GET, "products")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(req.url().as_str(), "http://localhost:8080/api/products");
        assert!(req.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_bearer_token_attached() {
        let req = client()
            .with_token("t0k")
            .request(Method::POST, "orders/place")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            req.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer t0k"
        );
    }

    #[test]
    fn test_without_token_clears() {
        let c = client().with_token("t").without_token();
        assert!(c.token().is_none());
    }
}
