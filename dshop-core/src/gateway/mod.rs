//! Third-party payment gateway integration.
//!
//! Two pieces: the [`GatewayLoader`], a memoized one-time load of the
//! gateway's checkout script, and the [`PaymentWidget`] seam, the embedded
//! checkout UI that reports back through exactly one of two callbacks.

mod loader;
mod widget;

pub use loader::{
    DEFAULT_SCRIPT_URL, GatewayLoadError, GatewayLoader, HttpScriptSource, ScriptSource,
};
pub use widget::{PaymentWidget, Prefill, WidgetEvent, WidgetHandle, WidgetOptions};
