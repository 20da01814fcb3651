#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod backend;
pub mod cart;
pub mod checkout;
pub mod dashboard;
pub mod gateway;
pub mod listing;
pub mod session;
pub mod validation;
