mod common;

use std::sync::Arc;

use common::{FakeShop, line};
use dshop_core::cart::{CartEditor, CartError, MutationOutcome};
use dshop_core::validation::ValidationError;
use rust_decimal::Decimal;
use tokio::sync::Notify;

async fn editor(shop: Arc<FakeShop>) -> CartEditor {
    let editor = CartEditor::new(shop);
    editor.refresh().await.unwrap();
    editor
}

#[tokio::test]
async fn test_remove_line_leaves_the_rest() {
    let shop = Arc::new(FakeShop::with_cart(vec![
        line(1, 10, 100, 1),
        line(2, 20, 50, 2),
        line(3, 30, 75, 1),
    ]));
    let editor = editor(shop.clone()).await;

    editor.remove(2).await.unwrap();

    let lines = editor.lines().await;
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.id != 2));
    assert_eq!(FakeShop::count(&shop.remove_calls), 1);
}

#[tokio::test]
async fn test_decrement_at_one_makes_no_call() {
    let shop = Arc::new(FakeShop::with_cart(vec![line(1, 10, 100, 1)]));
    let editor = editor(shop.clone()).await;
    let current = editor.lines().await;

    assert!(!editor.can_decrement(&current[0]));
    assert_eq!(editor.decrement(1).await.unwrap(), MutationOutcome::Skipped);
    assert_eq!(editor.set_quantity(1, 0).await.unwrap(), MutationOutcome::Skipped);
    assert_eq!(FakeShop::count(&shop.update_calls), 0);
    assert_eq!(editor.lines().await[0].quantity, 1);
}

#[tokio::test]
async fn test_totals_follow_backend_quantity() {
    let shop = Arc::new(FakeShop::with_cart(vec![line(1, 10, 100, 2)]));
    let editor = editor(shop.clone()).await;
    assert_eq!(editor.totals().await.total, Decimal::from(240));

    assert_eq!(editor.increment(1).await.unwrap(), MutationOutcome::Applied);
    assert_eq!(editor.lines().await[0].quantity, 3);
    let totals = editor.totals().await;
    assert_eq!(totals.subtotal, Decimal::from(300));
    assert_eq!(totals.shipping, Decimal::from(40));
    assert_eq!(totals.total, Decimal::from(340));
}

#[tokio::test]
async fn test_busy_line_rejects_mutations_others_stay_editable() {
    let gate = Arc::new(Notify::new());
    let mut fake = FakeShop::with_cart(vec![line(1, 10, 100, 2), line(2, 20, 50, 1)]);
    fake.update_gate = Some(gate.clone());
    let shop = Arc::new(fake);
    let editor = Arc::new(editor(shop.clone()).await);

    let pending = {
        let editor = editor.clone();
        tokio::spawn(async move { editor.increment(1).await })
    };
    while !editor.is_busy(1) {
        tokio::task::yield_now().await;
    }

    assert!(matches!(editor.decrement(1).await, Err(CartError::LineBusy(1))));
    assert!(matches!(editor.remove(1).await, Err(CartError::LineBusy(1))));
    assert!(!editor.is_busy(2));
    editor.remove(2).await.unwrap();

    gate.notify_one();
    assert_eq!(pending.await.unwrap().unwrap(), MutationOutcome::Applied);
    assert!(!editor.is_busy(1));
    assert_eq!(editor.lines().await[0].quantity, 3);
}

#[tokio::test]
async fn test_add_rejects_zero_and_refreshes() {
    let shop = Arc::new(FakeShop::with_cart(Vec::new()));
    let editor = editor(shop).await;

    assert!(matches!(
        editor.add(10, 0).await,
        Err(CartError::Validation(ValidationError::QuantityTooLow))
    ));
    editor.add(10, 2).await.unwrap();
    let lines = editor.lines().await;
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 2);
}

#[tokio::test]
async fn test_unknown_line() {
    let editor = editor(Arc::new(FakeShop::with_cart(Vec::new()))).await;
    assert!(matches!(
        editor.increment(9).await,
        Err(CartError::LineNotFound(9))
    ));
}
