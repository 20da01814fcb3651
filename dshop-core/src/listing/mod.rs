//! Search, filter and sort over lists already fetched from the backend.
//!
//! Everything here is a pure function of `(source, query)`. The source
//! slice is never modified; results borrow from it, and ties keep their
//! source order.

mod account;
mod admin;
mod orders;
mod products;

pub use account::AccountSummary;
pub use admin::{filter_admin_orders, filter_admin_products, filter_users};
pub use orders::{OrderQuery, OrderSort, filter_orders};
pub use products::{CatalogueSummary, PriceRange, ProductQuery, ProductSort, filter_products};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort order '{0}'")]
pub struct UnknownSort(pub String);

/// Case-insensitive substring match. An empty needle matches everything.
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
