//! Cart quantity editor.
//!
//! The backend owns the cart. Every mutation here is one backend call
//! followed by a full refetch, so the local lines are only ever a copy of
//! what the backend last returned. A line with a mutation in flight is busy
//! and rejects further mutations until the call settles; other lines stay
//! editable.

mod totals;

pub use totals::{CartTotals, SHIPPING_FEE};

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use dshop_sdk::client::ClientError;
use dshop_sdk::objects::{CartItem, CartItemRequest};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::backend::ShopBackend;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("cart line {0} not found")]
    LineNotFound(i64),

    #[error("cart line {0} is being updated")]
    LineBusy(i64),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{op} failed: {source}")]
    Backend {
        op: CartOp,
        #[source]
        source: ClientError,
    },
}

/// The backend operation a [`CartError::Backend`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOp {
    Load,
    Add,
    Update,
    Remove,
}

impl std::fmt::Display for CartOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartOp::Load => write!(f, "loading cart"),
            CartOp::Add => write!(f, "adding to cart"),
            CartOp::Update => write!(f, "updating quantity"),
            CartOp::Remove => write!(f, "removing item"),
        }
    }
}

impl CartError {
    pub fn user_message(&self) -> String {
        match self {
            CartError::Backend { op, source } => source.banner_message(match op {
                CartOp::Load => "Failed to load cart items",
                CartOp::Add => "Failed to add product to cart",
                CartOp::Update => "Failed to update quantity",
                CartOp::Remove => "Failed to remove item",
            }),
            other => other.to_string(),
        }
    }
}

/// Whether a mutation reached the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    /// Nothing to do; no call was made.
    Skipped,
}

pub struct CartEditor {
    backend: Arc<dyn ShopBackend>,
    lines: RwLock<Vec<CartItem>>,
    busy: Mutex<HashSet<i64>>,
}

impl CartEditor {
    /// An editor with no lines loaded yet. Call [`refresh`](Self::refresh)
    /// before displaying.
    pub fn new(backend: Arc<dyn ShopBackend>) -> Self {
        Self {
            backend,
            lines: RwLock::new(Vec::new()),
            busy: Mutex::new(HashSet::new()),
        }
    }

    /// Refetch the cart from the backend and replace the local lines.
    pub async fn refresh(&self) -> Result<Vec<CartItem>, CartError> {
        let fresh = self
            .backend
            .get_cart()
            .await
            .map_err(|source| CartError::Backend {
                op: CartOp::Load,
                source,
            })?;
        debug!(lines = fresh.len(), "Cart refreshed");
        *self.lines.write().await = fresh.clone();
        Ok(fresh)
    }

    pub async fn lines(&self) -> Vec<CartItem> {
        self.lines.read().await.clone()
    }

    pub async fn totals(&self) -> CartTotals {
        CartTotals::of(&self.lines.read().await)
    }

    pub fn is_busy(&self, line_id: i64) -> bool {
        self.busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&line_id)
    }

    /// The decrement control is enabled only above quantity 1 and while the
    /// line is idle.
    pub fn can_decrement(&self, line: &CartItem) -> bool {
        line.quantity > 1 && !self.is_busy(line.id)
    }

    /// Add a product from the catalogue, then refetch.
    pub async fn add(&self, product_id: i64, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(ValidationError::QuantityTooLow.into());
        }
        self.backend
            .add_to_cart(&CartItemRequest::add(product_id, quantity))
            .await
            .map_err(|source| CartError::Backend {
                op: CartOp::Add,
                source,
            })?;
        info!(product_id, quantity, "Added to cart");
        self.refresh().await?;
        Ok(())
    }

    /// Set a line's quantity. Values below 1 are clamped to 1.
    pub async fn set_quantity(
        &self,
        line_id: i64,
        quantity: u32,
    ) -> Result<MutationOutcome, CartError> {
        let quantity = quantity.max(1);
        let current = self.quantity_of(line_id).await?;
        if current == quantity {
            return Ok(MutationOutcome::Skipped);
        }

        let _busy = self.mark_busy(line_id)?;
        self.backend
            .update_cart_item(line_id, &CartItemRequest::quantity(quantity))
            .await
            .map_err(|source| {
                warn!(line_id, error = %source, "Quantity update failed");
                CartError::Backend {
                    op: CartOp::Update,
                    source,
                }
            })?;
        debug!(line_id, from = current, to = quantity, "Quantity updated");
        self.refresh().await?;
        Ok(MutationOutcome::Applied)
    }

    pub async fn increment(&self, line_id: i64) -> Result<MutationOutcome, CartError> {
        let current = self.quantity_of(line_id).await?;
        self.set_quantity(line_id, current.saturating_add(1)).await
    }

    /// Decrease by one. At quantity 1 this does nothing; use
    /// [`remove`](Self::remove) to drop the line.
    pub async fn decrement(&self, line_id: i64) -> Result<MutationOutcome, CartError> {
        let current = self.quantity_of(line_id).await?;
        if current <= 1 {
            return Ok(MutationOutcome::Skipped);
        }
        self.set_quantity(line_id, current - 1).await
    }

    pub async fn remove(&self, line_id: i64) -> Result<(), CartError> {
        self.quantity_of(line_id).await?;
        let _busy = self.mark_busy(line_id)?;
        self.backend
            .remove_cart_item(line_id)
            .await
            .map_err(|source| {
                warn!(line_id, error = %source, "Cart line removal failed");
                CartError::Backend {
                    op: CartOp::Remove,
                    source,
                }
            })?;
        info!(line_id, "Removed from cart");
        self.refresh().await?;
        Ok(())
    }

    async fn quantity_of(&self, line_id: i64) -> Result<u32, CartError> {
        self.lines
            .read()
            .await
            .iter()
            .find(|l| l.id == line_id)
            .map(|l| l.quantity)
            .ok_or(CartError::LineNotFound(line_id))
    }

    fn mark_busy(&self, line_id: i64) -> Result<BusyGuard<'_>, CartError> {
        let mut busy = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
        if !busy.insert(line_id) {
            return Err(CartError::LineBusy(line_id));
        }
        Ok(BusyGuard {
            busy: &self.busy,
            line_id,
        })
    }
}

/// Clears the busy flag when the mutation settles, success or not.
struct BusyGuard<'a> {
    busy: &'a Mutex<HashSet<i64>>,
    line_id: i64,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.line_id);
    }
}
