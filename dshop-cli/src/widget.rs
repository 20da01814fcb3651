//! Terminal stand-in for the hosted payment widget.
//!
//! Prints what the hosted checkout page needs, then waits for the payment
//! id and signature the gateway hands back. An empty payment id, end of
//! input or Ctrl+C dismisses the payment.

use std::io::{self, BufRead};

use dshop_core::gateway::{PaymentWidget, WidgetHandle, WidgetOptions};
use dshop_sdk::objects::PaymentVerification;
use rust_decimal::Decimal;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use crate::signal;

/// Lines typed on stdin, as delivered by the reader thread.
type InputLines = mpsc::Receiver<io::Result<String>>;

#[derive(Debug, Default)]
pub struct TerminalWidget;

impl PaymentWidget for TerminalWidget {
    fn open(&self, options: WidgetOptions, handle: WidgetHandle) {
        print_summary(&options);
        let gateway_order_id = options.order_id;
        let mut lines = match spawn_stdin_reader() {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to start stdin reader");
                handle.dismissed();
                return;
            }
        };
        tokio::spawn(async move {
            tokio::select! {
                captured = read_payment(&mut lines, gateway_order_id) => match captured {
                    Some(raw) => handle.payment_captured(raw),
                    None => handle.dismissed(),
                },
                _ = signal::interrupted() => handle.dismissed(),
            }
        });
    }
}

/// Reads stdin on a detached thread, so a pending read never holds up
/// runtime shutdown after a dismissal. The thread stops once the receiver
/// is gone.
fn spawn_stdin_reader() -> io::Result<InputLines> {
    let (tx, rx) = mpsc::channel(2);
    std::thread::Builder::new()
        .name("dshop-stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

fn print_summary(options: &WidgetOptions) {
    // The gateway counts in minor units.
    let amount = Decimal::new(options.amount, 2);
    println!();
    println!("  {}", options.name);
    println!("  {}", options.description);
    println!("  Amount:        {amount} {}", options.currency);
    println!("  Gateway order: {}", options.order_id);
    println!("  Key:           {}", options.key);
    println!("  Customer:      {} <{}>", options.prefill.name, options.prefill.email);
    println!();
    println!("Complete the payment on the gateway's checkout page, then paste the");
    println!("values it returns. Leave the payment id empty or press Ctrl+C to cancel.");
}

async fn read_payment(
    lines: &mut InputLines,
    gateway_order_id: String,
) -> Option<PaymentVerification> {
    let payment_id = prompt(lines, "Payment id: ").await?;
    let signature = prompt(lines, "Signature:  ").await?;
    Some(PaymentVerification {
        razorpay_payment_id: payment_id,
        razorpay_order_id: gateway_order_id,
        razorpay_signature: signature,
    })
}

/// One trimmed, non-empty line, or `None` on empty input, EOF or error.
async fn prompt(lines: &mut InputLines, label: &str) -> Option<String> {
    let mut stdout = tokio::io::stdout();
    let _ = stdout.write_all(label.as_bytes()).await;
    let _ = stdout.flush().await;
    match lines.recv().await {
        Some(Ok(line)) if !line.trim().is_empty() => Some(line.trim().to_owned()),
        Some(Ok(_)) | None => None,
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Failed to read payment details");
            None
        }
    }
}
