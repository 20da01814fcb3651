use dshop_sdk::objects::CartItem;
use rust_decimal::Decimal;

/// Flat shipping charged on any non-empty cart.
pub const SHIPPING_FEE: Decimal = Decimal::from_parts(40, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl CartTotals {
    pub fn of(lines: &[CartItem]) -> Self {
        let subtotal: Decimal = lines.iter().map(CartItem::line_total).sum();
        let shipping = if subtotal > Decimal::ZERO {
            SHIPPING_FEE
        } else {
            Decimal::ZERO
        };
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    pub fn item_count(lines: &[CartItem]) -> u32 {
        lines.iter().map(|l| l.quantity).sum()
    }
}
