//! Command implementations.
//!
//! Each command prints its result to stdout. Failures are returned as
//! `anyhow` errors whose top-level message is the text meant for the user;
//! the underlying cause stays in the chain for the logs.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;

use std::sync::Arc;

use anyhow::Context;
use dshop_core::backend::AdminBackend;
use dshop_core::session::{AuthContext, FileSessionStorage};
use dshop_sdk::client::ShopClient;
use dshop_sdk::objects::Order;
use rust_decimal::Decimal;

use crate::config::Settings;

/// Everything a command needs.
pub struct App {
    pub settings: Settings,
    pub http: reqwest::Client,
    pub auth: AuthContext,
}

impl App {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.call_timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let client = ShopClient::new(settings.api_url.clone()).with_http_client(http.clone());
        let storage = FileSessionStorage::new(&settings.session_path);
        let auth = AuthContext::load(client, storage)
            .await
            .with_context(|| format!("Failed to read session from {:?}", settings.session_path))?;
        Ok(Self {
            settings,
            http,
            auth,
        })
    }

    /// A client for the signed-in user, or the message telling them to log in.
    pub async fn customer(&self, what: &str) -> anyhow::Result<ShopClient> {
        if !self.auth.is_authenticated().await {
            anyhow::bail!("Please login to {what}");
        }
        Ok(self.auth.client().await)
    }

    pub async fn admin(&self) -> anyhow::Result<Arc<dyn AdminBackend>> {
        let client = self
            .auth
            .admin_client()
            .await
            .map_err(|e| anyhow::anyhow!(e.user_message("Administrator access required")))?;
        Ok(Arc::new(client))
    }
}

/// Wrap `err` so the user sees `message` and the logs keep the cause.
pub(crate) fn surface<E>(err: E, message: impl Into<String>) -> anyhow::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    anyhow::Error::new(err).context(message.into())
}

pub(crate) fn money(amount: Decimal) -> String {
    format!("₹{:.2}", amount)
}

pub(crate) fn order_line(order: &Order) -> String {
    let created = order
        .created_at
        .map(|t| t.date().to_string())
        .unwrap_or_else(|| "-".to_owned());
    format!(
        "#{:<6} {:<10} {:>12}  {}  {} item(s)",
        order.id,
        order.status.to_string(),
        money(order.total_amount),
        created,
        order.items.len()
    )
}
