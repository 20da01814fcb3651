//! Embedded payment widget seam.

use dshop_sdk::objects::PaymentVerification;
use tokio::sync::oneshot;

/// Values the widget is opened with.
///
/// `key`, `amount`, `currency` and `order_id` are copied verbatim from the
/// backend's gateway order and never computed locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetOptions {
    pub key: String,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    /// Gateway-issued order reference.
    pub order_id: String,
    /// Merchant name shown in the widget header.
    pub name: String,
    pub description: String,
    pub prefill: Prefill,
    pub theme_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// How a widget session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    PaymentCaptured(PaymentVerification),
    Dismissed,
}

/// Single-use reply channel handed to the widget.
///
/// Both methods consume the handle, so at most one outcome is reported.
/// Dropping it without calling either reads as a dismissal.
#[derive(Debug)]
pub struct WidgetHandle {
    tx: oneshot::Sender<WidgetEvent>,
}

impl WidgetHandle {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<WidgetEvent>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// The user completed the payment; `raw` is forwarded as received.
    pub fn payment_captured(self, raw: PaymentVerification) {
        let _ = self.tx.send(WidgetEvent::PaymentCaptured(raw));
    }

    /// The user closed the widget without paying.
    pub fn dismissed(self) {
        let _ = self.tx.send(WidgetEvent::Dismissed);
    }
}

/// Hosted checkout UI.
///
/// `open` must return promptly; the user interaction runs on the widget's
/// own schedule and is reported back through `handle`.
pub trait PaymentWidget: Send + Sync {
    fn open(&self, options: WidgetOptions, handle: WidgetHandle);
}
