//! Checkout orchestration.
//!
//! Drives one checkout attempt from the cart to a verified payment:
//!
//! ```text
//! IDLE -> ORDER_PLACING -> GATEWAY_LOADING -> PAYMENT_ORDER_CREATING
//!      -> AWAITING_USER_PAYMENT -> VERIFYING -> SUCCEEDED
//! ```
//!
//! Any step may end in `FAILED`; the widget may end in `CANCELLED`. Terminal
//! states stay put until the next `start_checkout` or an explicit `reset`.

mod orchestrator;

pub use orchestrator::CheckoutOrchestrator;

use std::fmt;
use std::time::Duration;

use dshop_sdk::client::ClientError;
use dshop_sdk::objects::{Order, VerificationResult};
use thiserror::Error;

use crate::gateway::GatewayLoadError;

/// Default per-call timeout for order and payment calls.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(15);

/// Merchant name shown in the payment widget.
pub const DEFAULT_MERCHANT_NAME: &str = "Dynamic Online Shopping";

pub const DEFAULT_THEME_COLOR: &str = "#4f46e5";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    pub call_timeout: Duration,
    pub merchant_name: String,
    pub theme_color: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            merchant_name: DEFAULT_MERCHANT_NAME.to_owned(),
            theme_color: DEFAULT_THEME_COLOR.to_owned(),
        }
    }
}

/// Observable state of the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    OrderPlacing,
    GatewayLoading {
        order_id: i64,
    },
    PaymentOrderCreating {
        order_id: i64,
    },
    AwaitingUserPayment {
        order_id: i64,
        gateway_order_id: String,
    },
    Verifying {
        order_id: i64,
    },
    Succeeded {
        order_id: i64,
    },
    Failed {
        order_id: Option<i64>,
        kind: FailureKind,
        message: String,
    },
    Cancelled {
        order_id: i64,
    },
}

impl CheckoutState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CheckoutState::Succeeded { .. }
                | CheckoutState::Failed { .. }
                | CheckoutState::Cancelled { .. }
        )
    }

    /// A new attempt may begin from IDLE or any terminal state.
    pub fn accepts_start(&self) -> bool {
        matches!(self, CheckoutState::Idle) || self.is_terminal()
    }

    pub fn order_id(&self) -> Option<i64> {
        match self {
            CheckoutState::Idle | CheckoutState::OrderPlacing => None,
            CheckoutState::GatewayLoading { order_id }
            | CheckoutState::PaymentOrderCreating { order_id }
            | CheckoutState::AwaitingUserPayment { order_id, .. }
            | CheckoutState::Verifying { order_id }
            | CheckoutState::Succeeded { order_id }
            | CheckoutState::Cancelled { order_id } => Some(*order_id),
            CheckoutState::Failed { order_id, .. } => *order_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "IDLE",
            CheckoutState::OrderPlacing => "ORDER_PLACING",
            CheckoutState::GatewayLoading { .. } => "GATEWAY_LOADING",
            CheckoutState::PaymentOrderCreating { .. } => "PAYMENT_ORDER_CREATING",
            CheckoutState::AwaitingUserPayment { .. } => "AWAITING_USER_PAYMENT",
            CheckoutState::Verifying { .. } => "VERIFYING",
            CheckoutState::Succeeded { .. } => "SUCCEEDED",
            CheckoutState::Failed { .. } => "FAILED",
            CheckoutState::Cancelled { .. } => "CANCELLED",
        }
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which step of the attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    OrderPlacement,
    GatewayLoad,
    GatewayOrderCreation,
    Verification,
}

/// Why a single remote step did not produce a result.
#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Gateway(#[from] GatewayLoadError),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

impl CallError {
    pub fn backend_message(&self) -> Option<String> {
        match self {
            CallError::Client(e) => e.backend_message(),
            _ => None,
        }
    }
}

/// A checkout attempt that ended in FAILED.
#[derive(Debug, Error)]
pub enum CheckoutFailure {
    #[error("order placement failed: {0}")]
    OrderPlacement(#[source] CallError),

    #[error("payment gateway failed to load for order {order_id}: {source}")]
    GatewayLoad { order_id: i64, source: CallError },

    #[error("payment order creation failed for order {order_id}: {source}")]
    GatewayOrderCreation { order_id: i64, source: CallError },

    #[error("payment verification failed for order {order_id}: {source}")]
    Verification { order_id: i64, source: CallError },

    /// The backend answered but did not confirm the signature.
    #[error("payment for order {order_id} was not verified (status {status})")]
    VerificationRejected { order_id: i64, status: String },
}

impl CheckoutFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            CheckoutFailure::OrderPlacement(_) => FailureKind::OrderPlacement,
            CheckoutFailure::GatewayLoad { .. } => FailureKind::GatewayLoad,
            CheckoutFailure::GatewayOrderCreation { .. } => FailureKind::GatewayOrderCreation,
            CheckoutFailure::Verification { .. } | CheckoutFailure::VerificationRejected { .. } => {
                FailureKind::Verification
            }
        }
    }

    pub fn order_id(&self) -> Option<i64> {
        match self {
            CheckoutFailure::OrderPlacement(_) => None,
            CheckoutFailure::GatewayLoad { order_id, .. }
            | CheckoutFailure::GatewayOrderCreation { order_id, .. }
            | CheckoutFailure::Verification { order_id, .. }
            | CheckoutFailure::VerificationRejected { order_id, .. } => Some(*order_id),
        }
    }

    /// Banner text for the user.
    ///
    /// Verification failures always point at support, because the money may
    /// already have left the customer's account.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutFailure::OrderPlacement(e) => e
                .backend_message()
                .unwrap_or_else(|| "Failed to place order. Please try again.".to_owned()),
            CheckoutFailure::GatewayLoad { .. } => {
                "Payment gateway failed to load. Please check your connection and try again."
                    .to_owned()
            }
            CheckoutFailure::GatewayOrderCreation { source, .. } => source
                .backend_message()
                .unwrap_or_else(|| "Failed to create payment order. Please try again.".to_owned()),
            CheckoutFailure::Verification { .. } | CheckoutFailure::VerificationRejected { .. } => {
                "Payment verification failed. Please contact support.".to_owned()
            }
        }
    }

    /// Whether restarting checkout is a sensible next step for the user.
    pub fn retryable(&self) -> bool {
        self.kind() != FailureKind::Verification
    }
}

/// Result of a finished attempt.
#[derive(Debug)]
pub enum CheckoutOutcome {
    Succeeded {
        order: Order,
        result: VerificationResult,
    },
    Failed(CheckoutFailure),
    Cancelled {
        order_id: i64,
    },
}

impl CheckoutOutcome {
    pub fn user_message(&self) -> String {
        match self {
            CheckoutOutcome::Succeeded { .. } => {
                "Payment successful! Your order has been placed.".to_owned()
            }
            CheckoutOutcome::Failed(failure) => failure.user_message(),
            CheckoutOutcome::Cancelled { .. } => "Payment cancelled by user".to_owned(),
        }
    }
}

/// `start_checkout` or `reset` called when it is not allowed.
///
/// Returned before any state change or network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidState {
    #[error("your cart is empty")]
    EmptyCart,

    #[error("you need to be logged in to check out")]
    NotAuthenticated,

    #[error("a checkout is already in progress ({state})")]
    InProgress { state: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_start_allowed_only_from_idle_or_terminal() {
        assert!(CheckoutState::Idle.accepts_start());
        assert!(CheckoutState::Cancelled { order_id: 1 }.accepts_start());
        assert!(CheckoutState::Succeeded { order_id: 1 }.accepts_start());
        assert!(!CheckoutState::OrderPlacing.accepts_start());
        assert!(!CheckoutState::Verifying { order_id: 1 }.accepts_start());
    }

    #[test]
    fn test_verification_message_is_distinct() {
        let placement = CheckoutFailure::OrderPlacement(CallError::TimedOut(DEFAULT_CALL_TIMEOUT));
        let rejected = CheckoutFailure::VerificationRejected {
            order_id: 3,
            status: "failed".into(),
        };
        assert_eq!(placement.user_message(), "Failed to place order. Please try again.");
        assert_eq!(
            rejected.user_message(),
            "Payment verification failed. Please contact support."
        );
        assert!(placement.retryable());
        assert!(!rejected.retryable());
    }

    #[test]
    fn test_backend_message_is_preferred() {
        let failure = CheckoutFailure::OrderPlacement(CallError::Client(ClientError::Api {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"message":"Cart is empty"}"#.into(),
        }));
        assert_eq!(failure.user_message(), "Cart is empty");
    }
}
