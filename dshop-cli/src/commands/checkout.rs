use std::sync::Arc;

use dshop_core::backend::ShopBackend;
use dshop_core::cart::CartEditor;
use dshop_core::checkout::{CheckoutOrchestrator, CheckoutOutcome, CheckoutState};
use dshop_core::gateway::{GatewayLoader, HttpScriptSource};

use super::cart::print_cart;
use super::{App, surface};
use crate::widget::TerminalWidget;

pub async fn run(app: &App) -> anyhow::Result<()> {
    let client = app.customer("check out").await?;
    let backend: Arc<dyn ShopBackend> = Arc::new(client);

    let editor = CartEditor::new(backend.clone());
    let lines = editor.refresh().await.map_err(|e| {
        let message = e.user_message();
        surface(e, message)
    })?;
    print_cart(&lines);
    if lines.is_empty() {
        return Ok(());
    }

    let script = HttpScriptSource::new(app.settings.script_url.clone())
        .with_http_client(app.http.clone());
    let orchestrator = CheckoutOrchestrator::new(
        backend,
        GatewayLoader::new(script),
        Arc::new(TerminalWidget),
        app.settings.checkout_config(),
    );

    let mut states = orchestrator.subscribe();
    let progress = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let label = progress_label(&states.borrow_and_update());
            if let Some(label) = label {
                eprintln!("… {label}");
            }
        }
    });

    let outcome = orchestrator.start_checkout(&app.auth, &lines).await;
    drop(orchestrator);
    let _ = progress.await;

    let outcome = outcome.map_err(|e| {
        let message = e.to_string();
        surface(e, message)
    })?;
    match outcome {
        CheckoutOutcome::Succeeded { ref order, .. } => {
            println!("{}", outcome.user_message());
            println!("Order #{} is now being processed.", order.id);
            Ok(())
        }
        CheckoutOutcome::Cancelled { .. } => {
            println!("{}", outcome.user_message());
            Ok(())
        }
        CheckoutOutcome::Failed(failure) => {
            let mut message = failure.user_message();
            if failure.retryable() {
                message.push_str(" Run `dshop checkout` again to retry.");
            }
            Err(surface(failure, message))
        }
    }
}

fn progress_label(state: &CheckoutState) -> Option<&'static str> {
    match state {
        CheckoutState::OrderPlacing => Some("Placing order"),
        CheckoutState::GatewayLoading { .. } => Some("Loading payment gateway"),
        CheckoutState::PaymentOrderCreating { .. } => Some("Creating payment order"),
        CheckoutState::AwaitingUserPayment { .. } => Some("Waiting for payment"),
        CheckoutState::Verifying { .. } => Some("Verifying payment"),
        _ => None,
    }
}
