//! SDK for the Dynamic Online Shopping storefront API.
//!
//! [`objects`] holds the JSON wire types for every endpoint. The typed HTTP
//! clients live in [`client`] behind the `client` feature.

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
