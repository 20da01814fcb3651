//! Memoized gateway script loader.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use url::Url;

/// Checkout script of the payment gateway.
pub const DEFAULT_SCRIPT_URL: &str = "https://checkout.razorpay.com/v1/checkout.js";

/// Errors raised while loading the gateway script.
#[derive(Debug, Error)]
pub enum GatewayLoadError {
    #[error("gateway script request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("gateway script returned status {0}")]
    Status(u16),

    #[error("gateway script was empty")]
    Empty,
}

/// Something that can make the gateway available, once.
#[async_trait]
pub trait ScriptSource: Send + Sync {
    async fn load(&self) -> Result<(), GatewayLoadError>;
}

/// Fetches the checkout script over HTTP to make sure the gateway is
/// reachable before a payment order is created.
#[derive(Debug, Clone)]
pub struct HttpScriptSource {
    http: reqwest::Client,
    url: Url,
}

impl HttpScriptSource {
    pub fn new(url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }
}

#[async_trait]
impl ScriptSource for HttpScriptSource {
    async fn load(&self) -> Result<(), GatewayLoadError> {
        debug!(url = %self.url, "Fetching gateway script");
        let resp = self.http.get(self.url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayLoadError::Status(status.as_u16()));
        }
        let body = resp.bytes().await?;
        if body.is_empty() {
            return Err(GatewayLoadError::Empty);
        }
        Ok(())
    }
}

/// Shared, idempotent loader for the gateway script.
///
/// Every caller awaits the same in-flight load and, once it succeeded, gets
/// the cached result without touching the source again. A failed load is
/// not cached, so an explicit retry by the user loads again.
///
/// Cloning is cheap and shares the cache.
#[derive(Clone)]
pub struct GatewayLoader {
    inner: Arc<LoaderInner>,
}

struct LoaderInner {
    source: Box<dyn ScriptSource>,
    loaded: OnceCell<()>,
}

impl GatewayLoader {
    pub fn new(source: impl ScriptSource + 'static) -> Self {
        Self {
            inner: Arc::new(LoaderInner {
                source: Box::new(source),
                loaded: OnceCell::new(),
            }),
        }
    }

    /// Load the script unless it is already loaded or loading.
    pub async fn ensure_loaded(&self) -> Result<(), GatewayLoadError> {
        if self.is_loaded() {
            return Ok(());
        }
        self.inner
            .loaded
            .get_or_try_init(|| async {
                match self.inner.source.load().await {
                    Ok(()) => {
                        info!("Payment gateway script loaded");
                        Ok(())
                    }
                    Err(e) => {
                        warn!(error = %e, "Payment gateway script failed to load");
                        Err(e)
                    }
                }
            })
            .await
            .map(|_| ())
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.loaded.initialized()
    }
}
