mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    BrokenScript, FakeShop, FakeWidget, ReadyScript, UserAction, Verify, auth, customer_session,
    line,
};
use dshop_core::checkout::{
    CheckoutConfig, CheckoutOrchestrator, CheckoutOutcome, CheckoutState, FailureKind,
    InvalidState,
};
use dshop_core::gateway::{GatewayLoader, ScriptSource};
use tokio::sync::Notify;

fn orchestrator(
    shop: Arc<FakeShop>,
    widget: Arc<FakeWidget>,
    script: impl ScriptSource + 'static,
) -> CheckoutOrchestrator {
    CheckoutOrchestrator::new(shop, GatewayLoader::new(script), widget, CheckoutConfig::default())
}

#[tokio::test]
async fn test_successful_checkout_verifies_before_success() {
    let cart = vec![line(1, 10, 100, 2)];
    let shop = Arc::new(FakeShop::with_cart(cart.clone()));
    let widget = Arc::new(FakeWidget::new(UserAction::Pay));
    let orch = orchestrator(shop.clone(), widget.clone(), ReadyScript);
    let auth = auth(Some(customer_session())).await;

    let outcome = orch.start_checkout(&auth, &cart).await.unwrap();

    let CheckoutOutcome::Succeeded { order, result } = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(order.id, 77);
    assert!(result.is_success());
    assert_eq!(orch.state(), CheckoutState::Succeeded { order_id: 77 });

    let opened = widget.opened.lock().unwrap();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].amount, 24_000);
    assert_eq!(opened[0].currency, "INR");
    assert_eq!(opened[0].order_id, "order_gw_77");
    assert_eq!(opened[0].description, "Order #77");
    assert_eq!(opened[0].prefill.name, "Asha Rao");
    assert_eq!(opened[0].prefill.email, "asha@shop.test");

    let verified = shop.verified.lock().unwrap();
    assert_eq!(verified[0].order_id, 77);
    assert_eq!(verified[0].payment.razorpay_payment_id, "pay_123");
    assert_eq!(verified[0].payment.razorpay_signature, "sig_abc");
    assert_eq!(FakeShop::count(&shop.gateway_calls), 1);
}

#[tokio::test]
async fn test_second_start_while_in_flight_is_rejected() {
    let cart = vec![line(1, 10, 100, 1)];
    let gate = Arc::new(Notify::new());
    let mut fake = FakeShop::with_cart(cart.clone());
    fake.place_gate = Some(gate.clone());
    let shop = Arc::new(fake);
    let orch = Arc::new(orchestrator(
        shop.clone(),
        Arc::new(FakeWidget::new(UserAction::Pay)),
        ReadyScript,
    ));
    let auth = auth(Some(customer_session())).await;
    let mut states = orch.subscribe();

    let first = {
        let orch = orch.clone();
        let auth = auth.clone();
        let cart = cart.clone();
        tokio::spawn(async move { orch.start_checkout(&auth, &cart).await })
    };
    states
        .wait_for(|s| *s == CheckoutState::OrderPlacing)
        .await
        .unwrap();

    let second = orch.start_checkout(&auth, &cart).await;
    assert_eq!(
        second.unwrap_err(),
        InvalidState::InProgress {
            state: "ORDER_PLACING"
        }
    );
    assert!(orch.reset().is_err());

    gate.notify_one();
    let outcome = first.await.unwrap().unwrap();
    assert!(matches!(outcome, CheckoutOutcome::Succeeded { .. }));
    assert_eq!(FakeShop::count(&shop.place_calls), 1);
}

#[tokio::test]
async fn test_rejected_verification_fails_with_support_message() {
    let cart = vec![line(1, 10, 100, 1)];
    let mut fake = FakeShop::with_cart(cart.clone());
    fake.verify = Verify::Reject;
    let shop = Arc::new(fake);
    let orch = orchestrator(
        shop.clone(),
        Arc::new(FakeWidget::new(UserAction::Pay)),
        ReadyScript,
    );
    let auth = auth(Some(customer_session())).await;

    let outcome = orch.start_checkout(&auth, &cart).await.unwrap();
    let CheckoutOutcome::Failed(failure) = &outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(failure.kind(), FailureKind::Verification);
    assert_eq!(
        outcome.user_message(),
        "Payment verification failed. Please contact support."
    );
    assert!(matches!(
        orch.state(),
        CheckoutState::Failed {
            kind: FailureKind::Verification,
            order_id: Some(77),
            ..
        }
    ));
}

#[tokio::test]
async fn test_verification_http_error_is_verification_failure() {
    let cart = vec![line(1, 10, 100, 1)];
    let mut fake = FakeShop::with_cart(cart.clone());
    fake.verify = Verify::HttpError;
    let orch = orchestrator(
        Arc::new(fake),
        Arc::new(FakeWidget::new(UserAction::Pay)),
        ReadyScript,
    );
    let auth = auth(Some(customer_session())).await;

    let outcome = orch.start_checkout(&auth, &cart).await.unwrap();
    assert_eq!(
        outcome.user_message(),
        "Payment verification failed. Please contact support."
    );
}

#[tokio::test]
async fn test_pre_verification_failure_message_differs() {
    let cart = vec![line(1, 10, 100, 1)];
    let mut fake = FakeShop::with_cart(cart.clone());
    fake.fail_gateway_order = true;
    let shop = Arc::new(fake);
    let orch = orchestrator(
        shop.clone(),
        Arc::new(FakeWidget::new(UserAction::Pay)),
        ReadyScript,
    );
    let auth = auth(Some(customer_session())).await;

    let outcome = orch.start_checkout(&auth, &cart).await.unwrap();
    let CheckoutOutcome::Failed(failure) = &outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(failure.kind(), FailureKind::GatewayOrderCreation);
    assert!(failure.retryable());
    assert_eq!(
        outcome.user_message(),
        "Failed to create payment order. Please try again."
    );
    assert_eq!(FakeShop::count(&shop.verify_calls), 0);
}

#[tokio::test]
async fn test_dismissal_cancels_without_verification() {
    for action in [UserAction::Dismiss, UserAction::Vanish] {
        let cart = vec![line(1, 10, 100, 1)];
        let shop = Arc::new(FakeShop::with_cart(cart.clone()));
        let orch = orchestrator(shop.clone(), Arc::new(FakeWidget::new(action)), ReadyScript);
        let auth = auth(Some(customer_session())).await;

        let outcome = orch.start_checkout(&auth, &cart).await.unwrap();
        assert!(matches!(outcome, CheckoutOutcome::Cancelled { order_id: 77 }));
        assert_eq!(outcome.user_message(), "Payment cancelled by user");
        assert_eq!(orch.state(), CheckoutState::Cancelled { order_id: 77 });
        assert_eq!(FakeShop::count(&shop.verify_calls), 0);
    }
}

#[tokio::test]
async fn test_gateway_load_failure_skips_payment_order() {
    let cart = vec![line(1, 10, 100, 1)];
    let shop = Arc::new(FakeShop::with_cart(cart.clone()));
    let orch = orchestrator(
        shop.clone(),
        Arc::new(FakeWidget::new(UserAction::Pay)),
        BrokenScript,
    );
    let auth = auth(Some(customer_session())).await;

    let outcome = orch.start_checkout(&auth, &cart).await.unwrap();
    let CheckoutOutcome::Failed(failure) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(failure.kind(), FailureKind::GatewayLoad);
    assert_eq!(FakeShop::count(&shop.gateway_calls), 0);

    orch.reset().unwrap();
    assert_eq!(orch.state(), CheckoutState::Idle);
}

#[tokio::test]
async fn test_preconditions_change_nothing() {
    let cart = vec![line(1, 10, 100, 1)];
    let shop = Arc::new(FakeShop::with_cart(cart.clone()));
    let orch = orchestrator(
        shop.clone(),
        Arc::new(FakeWidget::new(UserAction::Pay)),
        ReadyScript,
    );

    let signed_in = auth(Some(customer_session())).await;
    assert_eq!(
        orch.start_checkout(&signed_in, &[]).await.unwrap_err(),
        InvalidState::EmptyCart
    );

    let anonymous = auth(None).await;
    assert_eq!(
        orch.start_checkout(&anonymous, &cart).await.unwrap_err(),
        InvalidState::NotAuthenticated
    );

    assert_eq!(orch.state(), CheckoutState::Idle);
    assert_eq!(FakeShop::count(&shop.place_calls), 0);
}

#[tokio::test]
async fn test_slow_order_placement_times_out() {
    let cart = vec![line(1, 10, 100, 1)];
    let mut fake = FakeShop::with_cart(cart.clone());
    fake.place_delay = Some(Duration::from_secs(10));
    let orch = CheckoutOrchestrator::new(
        Arc::new(fake),
        GatewayLoader::new(ReadyScript),
        Arc::new(FakeWidget::new(UserAction::Pay)),
        CheckoutConfig {
            call_timeout: Duration::from_millis(50),
            ..Default::default()
        },
    );
    let auth = auth(Some(customer_session())).await;

    let outcome = orch.start_checkout(&auth, &cart).await.unwrap();
    let CheckoutOutcome::Failed(failure) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(failure.kind(), FailureKind::OrderPlacement);
    assert!(matches!(
        orch.state(),
        CheckoutState::Failed {
            order_id: None,
            kind: FailureKind::OrderPlacement,
            ..
        }
    ));
}

#[tokio::test]
async fn test_terminal_state_allows_new_attempt() {
    let cart = vec![line(1, 10, 100, 1)];
    let shop = Arc::new(FakeShop::with_cart(cart.clone()));
    let orch = orchestrator(
        shop.clone(),
        Arc::new(FakeWidget::new(UserAction::Dismiss)),
        ReadyScript,
    );
    let auth = auth(Some(customer_session())).await;

    orch.start_checkout(&auth, &cart).await.unwrap();
    orch.start_checkout(&auth, &cart).await.unwrap();
    assert_eq!(FakeShop::count(&shop.place_calls), 2);
}

#[tokio::test]
async fn test_abandoned_attempt_before_order_returns_to_idle() {
    let cart = vec![line(1, 10, 100, 1)];
    let gate = Arc::new(Notify::new());
    let mut fake = FakeShop::with_cart(cart.clone());
    fake.place_gate = Some(gate.clone());
    let shop = Arc::new(fake);
    let orch = orchestrator(
        shop.clone(),
        Arc::new(FakeWidget::new(UserAction::Pay)),
        ReadyScript,
    );
    let auth = auth(Some(customer_session())).await;

    let abandoned =
        tokio::time::timeout(Duration::from_millis(50), orch.start_checkout(&auth, &cart)).await;
    assert!(abandoned.is_err());
    assert_eq!(orch.state(), CheckoutState::Idle);
    assert_eq!(orch.reset(), Ok(()));

    // Let the next placement through.
    gate.notify_one();
    let outcome = orch.start_checkout(&auth, &cart).await.unwrap();
    assert!(matches!(outcome, CheckoutOutcome::Succeeded { .. }));
    assert_eq!(FakeShop::count(&shop.place_calls), 2);
}

#[tokio::test]
async fn test_abandoned_attempt_in_widget_is_cancelled() {
    let cart = vec![line(1, 10, 100, 1)];
    let shop = Arc::new(FakeShop::with_cart(cart.clone()));
    let widget = Arc::new(FakeWidget::new(UserAction::Hold));
    let orch = orchestrator(shop.clone(), widget.clone(), ReadyScript);
    let auth = auth(Some(customer_session())).await;

    let abandoned =
        tokio::time::timeout(Duration::from_millis(50), orch.start_checkout(&auth, &cart)).await;
    assert!(abandoned.is_err());
    assert_eq!(widget.held.lock().unwrap().len(), 1);
    assert_eq!(orch.state(), CheckoutState::Cancelled { order_id: 77 });
    assert_eq!(FakeShop::count(&shop.verify_calls), 0);
    assert_eq!(orch.reset(), Ok(()));
    assert_eq!(orch.state(), CheckoutState::Idle);
}
