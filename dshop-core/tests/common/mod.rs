#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dshop_core::backend::ShopBackend;
use dshop_core::gateway::{
    GatewayLoadError, PaymentWidget, ScriptSource, WidgetHandle, WidgetOptions,
};
use dshop_core::session::{AuthContext, MemorySessionStorage, Session};
use dshop_sdk::client::{ClientError, ShopClient};
use dshop_sdk::objects::{
    CartItem, CartItemRequest, GatewayOrder, Order, OrderStatus, PaymentVerification, Product,
    Role, User, VerificationResult, VerifyPaymentRequest,
};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use tokio::sync::Notify;
use url::Url;

pub fn product(id: i64, price: i64) -> Product {
    Product {
        id,
        title: format!("Product {id}"),
        description: String::new(),
        price: Decimal::from(price),
        stock: 10,
        sku: None,
        image_url: None,
    }
}

pub fn line(id: i64, product_id: i64, price: i64, quantity: u32) -> CartItem {
    CartItem {
        id,
        product_id: Some(product_id),
        quantity,
        product: Some(product(product_id, price)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verify {
    Confirm,
    Reject,
    HttpError,
}

/// In-memory backend that records every call.
pub struct FakeShop {
    pub cart: Mutex<Vec<CartItem>>,
    pub place_calls: AtomicUsize,
    pub gateway_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub remove_calls: AtomicUsize,
    pub verified: Mutex<Vec<VerifyPaymentRequest>>,
    pub verify: Verify,
    pub fail_gateway_order: bool,
    /// When set, `place_order` waits for a notification first.
    pub place_gate: Option<Arc<Notify>>,
    /// When set, `update_cart_item` waits for a notification first.
    pub update_gate: Option<Arc<Notify>>,
    pub place_delay: Option<Duration>,
}

impl FakeShop {
    pub fn with_cart(cart: Vec<CartItem>) -> Self {
        Self {
            cart: Mutex::new(cart),
            place_calls: AtomicUsize::new(0),
            gateway_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
            verified: Mutex::new(Vec::new()),
            verify: Verify::Confirm,
            fail_gateway_order: false,
            place_gate: None,
            update_gate: None,
            place_delay: None,
        }
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ShopBackend for FakeShop {
    async fn get_cart(&self) -> Result<Vec<CartItem>, ClientError> {
        Ok(self.cart.lock().unwrap().clone())
    }

    async fn add_to_cart(&self, item: &CartItemRequest) -> Result<Vec<CartItem>, ClientError> {
        let mut cart = self.cart.lock().unwrap();
        let product_id = item.product_id.unwrap_or_default();
        let next_id = cart.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        cart.push(line(next_id, product_id, 100, item.quantity));
        Ok(cart.clone())
    }

    async fn update_cart_item(
        &self,
        cart_item_id: i64,
        item: &CartItemRequest,
    ) -> Result<(), ClientError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.update_gate {
            gate.notified().await;
        }
        let mut cart = self.cart.lock().unwrap();
        if let Some(line) = cart.iter_mut().find(|l| l.id == cart_item_id) {
            line.quantity = item.quantity;
        }
        Ok(())
    }

    async fn remove_cart_item(&self, cart_item_id: i64) -> Result<(), ClientError> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.cart.lock().unwrap().retain(|l| l.id != cart_item_id);
        Ok(())
    }

    async fn place_order(&self) -> Result<Order, ClientError> {
        self.place_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.place_gate {
            gate.notified().await;
        }
        if let Some(delay) = self.place_delay {
            tokio::time::sleep(delay).await;
        }
        let items = self.cart.lock().unwrap().clone();
        let total: Decimal = items.iter().map(CartItem::line_total).sum();
        Ok(Order {
            id: 77,
            total_amount: total + Decimal::from(40),
            status: OrderStatus::Pending,
            created_at: None,
            items,
            razorpay_order_id: None,
            user: None,
        })
    }

    async fn create_gateway_order(&self, order_id: i64) -> Result<GatewayOrder, ClientError> {
        self.gateway_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_gateway_order {
            return Err(ClientError::Api {
                status: StatusCode::BAD_GATEWAY,
                body: String::new(),
            });
        }
        Ok(GatewayOrder {
            key: "rzp_test_key".into(),
            amount: 24_000,
            currency: "INR".into(),
            razorpay_order_id: format!("order_gw_{order_id}"),
        })
    }

    async fn verify_payment(
        &self,
        payload: &VerifyPaymentRequest,
    ) -> Result<VerificationResult, ClientError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.verified.lock().unwrap().push(payload.clone());
        match self.verify {
            Verify::Confirm => Ok(VerificationResult {
                status: "success".into(),
                message: Some("Payment verified".into()),
                order_id: Some(payload.order_id),
            }),
            Verify::Reject => Ok(VerificationResult {
                status: "failed".into(),
                message: Some("Signature mismatch".into()),
                order_id: Some(payload.order_id),
            }),
            Verify::HttpError => Err(ClientError::Api {
                status: StatusCode::BAD_REQUEST,
                body: r#"{"message":"Invalid signature"}"#.into(),
            }),
        }
    }
}

/// What the fake widget does once opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Pay,
    Dismiss,
    /// Drops the handle without answering.
    Vanish,
    /// Keeps the handle open and never answers.
    Hold,
}

pub struct FakeWidget {
    pub action: UserAction,
    pub opened: Mutex<Vec<WidgetOptions>>,
    pub held: Mutex<Vec<WidgetHandle>>,
}

impl FakeWidget {
    pub fn new(action: UserAction) -> Self {
        Self {
            action,
            opened: Mutex::new(Vec::new()),
            held: Mutex::new(Vec::new()),
        }
    }
}

impl PaymentWidget for FakeWidget {
    fn open(&self, options: WidgetOptions, handle: WidgetHandle) {
        let gateway_order_id = options.order_id.clone();
        self.opened.lock().unwrap().push(options);
        match self.action {
            UserAction::Pay => handle.payment_captured(PaymentVerification {
                razorpay_payment_id: "pay_123".into(),
                razorpay_order_id: gateway_order_id,
                razorpay_signature: "sig_abc".into(),
            }),
            UserAction::Dismiss => handle.dismissed(),
            UserAction::Vanish => drop(handle),
            UserAction::Hold => self.held.lock().unwrap().push(handle),
        }
    }
}

pub struct ReadyScript;

#[async_trait]
impl ScriptSource for ReadyScript {
    async fn load(&self) -> Result<(), GatewayLoadError> {
        Ok(())
    }
}

pub struct BrokenScript;

#[async_trait]
impl ScriptSource for BrokenScript {
    async fn load(&self) -> Result<(), GatewayLoadError> {
        Err(GatewayLoadError::Status(404))
    }
}

pub fn customer_session() -> Session {
    Session {
        token: "tok-customer".into(),
        email: "asha@shop.test".into(),
        user: Some(User {
            id: 5,
            email: "asha@shop.test".into(),
            full_name: Some("Asha Rao".into()),
            role: Role::Customer,
        }),
    }
}

pub async fn auth(session: Option<Session>) -> AuthContext {
    let client = ShopClient::new(Url::parse("http://127.0.0.1:9/api/").unwrap());
    AuthContext::load(client, MemorySessionStorage::new(session))
        .await
        .unwrap()
}
