use std::future::Future;
use std::sync::Arc;

use dshop_sdk::client::ClientError;
use dshop_sdk::objects::{
    CartItem, GatewayOrder, Order, PaymentVerification, VerifyPaymentRequest,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{
    CallError, CheckoutConfig, CheckoutFailure, CheckoutOutcome, CheckoutState, InvalidState,
};
use crate::backend::ShopBackend;
use crate::gateway::{
    GatewayLoader, PaymentWidget, Prefill, WidgetEvent, WidgetHandle, WidgetOptions,
};
use crate::session::{AuthContext, Session};

/// Runs checkout attempts, one at a time.
///
/// The current [`CheckoutState`] is published on a `watch` channel; front
/// ends render progress from [`subscribe`](Self::subscribe) while
/// [`start_checkout`](Self::start_checkout) drives the attempt to its end.
pub struct CheckoutOrchestrator {
    backend: Arc<dyn ShopBackend>,
    gateway: GatewayLoader,
    widget: Arc<dyn PaymentWidget>,
    config: CheckoutConfig,
    state: watch::Sender<CheckoutState>,
}

impl CheckoutOrchestrator {
    pub fn new(
        backend: Arc<dyn ShopBackend>,
        gateway: GatewayLoader,
        widget: Arc<dyn PaymentWidget>,
        config: CheckoutConfig,
    ) -> Self {
        Self {
            backend,
            gateway,
            widget,
            config,
            state: watch::Sender::new(CheckoutState::Idle),
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CheckoutState> {
        self.state.subscribe()
    }

    /// Return a finished attempt to IDLE.
    pub fn reset(&self) -> Result<(), InvalidState> {
        let mut busy = None;
        self.state.send_if_modified(|state| {
            if !state.accepts_start() {
                busy = Some(state.name());
                return false;
            }
            let changed = *state != CheckoutState::Idle;
            *state = CheckoutState::Idle;
            changed
        });
        match busy {
            Some(state) => Err(InvalidState::InProgress { state }),
            None => Ok(()),
        }
    }

    /// Run one checkout attempt for `cart`.
    ///
    /// Preconditions are checked before anything happens: a non-empty cart,
    /// a signed-in user and no attempt in flight. A failed precondition
    /// leaves the state untouched and issues no calls. Otherwise the attempt
    /// runs to a terminal state, reported as the [`CheckoutOutcome`].
    pub async fn start_checkout(
        &self,
        auth: &AuthContext,
        cart: &[CartItem],
    ) -> Result<CheckoutOutcome, InvalidState> {
        if cart.is_empty() {
            return Err(InvalidState::EmptyCart);
        }
        let session = auth.current().await.ok_or(InvalidState::NotAuthenticated)?;
        let _attempt = self.begin()?;
        info!(lines = cart.len(), "Checkout started");

        let order = match self.call(self.backend.place_order()).await {
            Ok(order) => order,
            Err(e) => return Ok(self.fail(CheckoutFailure::OrderPlacement(e))),
        };
        Ok(self.on_order_placed(order, &session).await)
    }

    fn begin(&self) -> Result<AttemptGuard<'_>, InvalidState> {
        let mut busy = None;
        let previous = self.state.borrow().name();
        self.state.send_if_modified(|state| {
            if state.accepts_start() {
                *state = CheckoutState::OrderPlacing;
                true
            } else {
                busy = Some(state.name());
                false
            }
        });
        match busy {
            Some(state) => {
                warn!(state, "Checkout already in progress");
                Err(InvalidState::InProgress { state })
            }
            None => {
                debug!(from = previous, to = "ORDER_PLACING", "Checkout transition");
                Ok(AttemptGuard { state: &self.state })
            }
        }
    }

    async fn on_order_placed(&self, order: Order, session: &Session) -> CheckoutOutcome {
        info!(order_id = order.id, total = %order.total_amount, "Order placed");
        self.transition(CheckoutState::GatewayLoading { order_id: order.id });

        let load = async { self.gateway.ensure_loaded().await.map_err(CallError::from) };
        match self.timed(load).await {
            Ok(()) => self.on_gateway_ready(order, session).await,
            Err(source) => self.fail(CheckoutFailure::GatewayLoad {
                order_id: order.id,
                source,
            }),
        }
    }

    async fn on_gateway_ready(&self, order: Order, session: &Session) -> CheckoutOutcome {
        self.transition(CheckoutState::PaymentOrderCreating { order_id: order.id });

        match self.call(self.backend.create_gateway_order(order.id)).await {
            Ok(gateway_order) => self.on_gateway_order_created(order, gateway_order, session).await,
            Err(source) => self.fail(CheckoutFailure::GatewayOrderCreation {
                order_id: order.id,
                source,
            }),
        }
    }

    async fn on_gateway_order_created(
        &self,
        order: Order,
        gateway_order: GatewayOrder,
        session: &Session,
    ) -> CheckoutOutcome {
        info!(
            order_id = order.id,
            gateway_order_id = %gateway_order.razorpay_order_id,
            amount = gateway_order.amount,
            currency = %gateway_order.currency,
            "Payment order created"
        );
        self.transition(CheckoutState::AwaitingUserPayment {
            order_id: order.id,
            gateway_order_id: gateway_order.razorpay_order_id.clone(),
        });

        let options = self.widget_options(&order, gateway_order, session);
        let (handle, events) = WidgetHandle::channel();
        self.widget.open(options, handle);

        // A dropped handle closes the channel; treat it as a dismissal.
        match events.await {
            Ok(WidgetEvent::PaymentCaptured(raw)) => self.on_payment_captured(order, raw).await,
            Ok(WidgetEvent::Dismissed) | Err(_) => self.on_dismissed(order.id),
        }
    }

    async fn on_payment_captured(
        &self,
        order: Order,
        raw: PaymentVerification,
    ) -> CheckoutOutcome {
        debug!(order_id = order.id, payment_id = %raw.razorpay_payment_id, "Payment captured");
        self.transition(CheckoutState::Verifying { order_id: order.id });

        let request = VerifyPaymentRequest {
            payment: raw,
            order_id: order.id,
        };
        match self.call(self.backend.verify_payment(&request)).await {
            Ok(result) if result.is_success() => {
                info!(order_id = order.id, "Payment verified");
                self.transition(CheckoutState::Succeeded { order_id: order.id });
                CheckoutOutcome::Succeeded { order, result }
            }
            Ok(result) => self.fail(CheckoutFailure::VerificationRejected {
                order_id: order.id,
                status: result.status,
            }),
            Err(source) => self.fail(CheckoutFailure::Verification {
                order_id: order.id,
                source,
            }),
        }
    }

    fn on_dismissed(&self, order_id: i64) -> CheckoutOutcome {
        info!(order_id, "Payment cancelled by user");
        self.transition(CheckoutState::Cancelled { order_id });
        CheckoutOutcome::Cancelled { order_id }
    }

    fn widget_options(
        &self,
        order: &Order,
        gateway_order: GatewayOrder,
        session: &Session,
    ) -> WidgetOptions {
        let name = session
            .user
            .as_ref()
            .map(|u| u.display_name().to_owned())
            .unwrap_or_else(|| "Customer".to_owned());
        WidgetOptions {
            key: gateway_order.key,
            amount: gateway_order.amount,
            currency: gateway_order.currency,
            order_id: gateway_order.razorpay_order_id,
            name: self.config.merchant_name.clone(),
            description: format!("Order #{}", order.id),
            prefill: Prefill {
                name,
                email: session.email.clone(),
                contact: String::new(),
            },
            theme_color: self.config.theme_color.clone(),
        }
    }

    async fn call<T>(
        &self,
        request: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, CallError> {
        self.timed(async { request.await.map_err(CallError::from) }).await
    }

    async fn timed<T>(
        &self,
        step: impl Future<Output = Result<T, CallError>>,
    ) -> Result<T, CallError> {
        match tokio::time::timeout(self.config.call_timeout, step).await {
            Ok(result) => result,
            Err(_) => Err(CallError::TimedOut(self.config.call_timeout)),
        }
    }

    fn transition(&self, next: CheckoutState) {
        let previous = self.state.send_replace(next);
        debug!(from = previous.name(), to = self.state.borrow().name(), "Checkout transition");
    }

    fn fail(&self, failure: CheckoutFailure) -> CheckoutOutcome {
        warn!(
            kind = ?failure.kind(),
            order_id = failure.order_id(),
            error = %failure,
            "Checkout failed"
        );
        self.transition(CheckoutState::Failed {
            order_id: failure.order_id(),
            kind: failure.kind(),
            message: failure.user_message(),
        });
        CheckoutOutcome::Failed(failure)
    }
}

/// Settles an attempt whose future was dropped before reaching a terminal
/// state, so the orchestrator accepts the next start.
///
/// Once an order exists the attempt ends in CANCELLED; before that it goes
/// back to IDLE.
struct AttemptGuard<'a> {
    state: &'a watch::Sender<CheckoutState>,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        let mut abandoned = None;
        self.state.send_if_modified(|state| {
            if state.accepts_start() {
                return false;
            }
            abandoned = Some(state.name());
            *state = match state.order_id() {
                Some(order_id) => CheckoutState::Cancelled { order_id },
                None => CheckoutState::Idle,
            };
            true
        });
        if let Some(from) = abandoned {
            warn!(from, to = self.state.borrow().name(), "Checkout attempt abandoned");
        }
    }
}
