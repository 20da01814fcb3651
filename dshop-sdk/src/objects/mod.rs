//! Request and response types for the storefront REST API.
//!
//! Field names follow the backend's camelCase JSON. Money is carried as
//! [`rust_decimal::Decimal`] but serialized as a plain JSON number, which is
//! what the backend produces and accepts.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod order;
pub mod payment;
pub mod product;

pub use admin::{DashboardStats, UpdateOrderStatusRequest, UpdateRoleRequest};
pub use auth::{AuthResponse, LoginRequest, RegisterRequest, RegisterResponse, Role, User};
pub use cart::{CartItem, CartItemRequest};
pub use order::{Order, OrderCustomer, OrderStatus};
pub use payment::{GatewayOrder, PaymentVerification, VerificationResult, VerifyPaymentRequest};
pub use product::{Product, ProductPayload};

/// Lenient timestamp decoding.
///
/// The backend serializes `Instant` either as an RFC 3339 string or as
/// fractional epoch seconds depending on its Jackson settings; both are
/// accepted here.
pub(crate) mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;
    use time::format_description::well_known::Rfc3339;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Seconds(f64),
    }

    fn decode<E: serde::de::Error>(raw: RawTimestamp) -> Result<OffsetDateTime, E> {
        match raw {
            RawTimestamp::Text(s) => OffsetDateTime::parse(&s, &Rfc3339).map_err(E::custom),
            RawTimestamp::Seconds(secs) => {
                let nanos = (secs * 1_000_000_000.0) as i128;
                OffsetDateTime::from_unix_timestamp_nanos(nanos).map_err(E::custom)
            }
        }
    }

    pub fn serialize<S: Serializer>(
        value: &Option<OffsetDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => {
                let text = ts.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
                serializer.serialize_some(&text)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<OffsetDateTime>, D::Error> {
        Option::<RawTimestamp>::deserialize(deserializer)?
            .map(decode)
            .transpose()
    }
}
