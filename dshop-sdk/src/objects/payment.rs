//! Payment gateway request and response types.
//!
//! The backend creates a gateway order for a placed order and later checks
//! the signature the payment widget hands back. Field names mirror the
//! gateway's own snake_case names so widget output can be forwarded as-is.

use serde::{Deserialize, Serialize};

/// Response of `POST /payments/create-order/{orderId}`.
///
/// `amount` is in the currency's minor unit (paise for INR). The widget must
/// be opened with exactly these values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub key: String,
    pub amount: i64,
    pub currency: String,
    pub razorpay_order_id: String,
}

/// Fields returned by the payment widget's success callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentVerification {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}

/// Body of `POST /payments/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(flatten)]
    pub payment: PaymentVerification,
    #[serde(rename = "orderId")]
    pub order_id: i64,
}

/// Response of `POST /payments/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub order_id: Option<i64>,
}

impl VerificationResult {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}
