use dshop_sdk::objects::{CartItem, Order, OrderStatus};
use rust_decimal::Decimal;

/// Headline numbers for the account page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSummary {
    pub total_orders: usize,
    pub pending_orders: usize,
    /// Orders that are PAID or DELIVERED.
    pub completed_orders: usize,
    /// Cart lines, not units.
    pub cart_lines: usize,
    /// Sum of every order's total, whatever its status.
    pub total_spent: Decimal,
}

impl AccountSummary {
    pub fn of(orders: &[Order], cart: &[CartItem]) -> Self {
        Self {
            total_orders: orders.len(),
            pending_orders: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Pending)
                .count(),
            completed_orders: orders
                .iter()
                .filter(|o| matches!(o.status, OrderStatus::Paid | OrderStatus::Delivered))
                .count(),
            cart_lines: cart.len(),
            total_spent: orders.iter().map(|o| o.total_amount).sum(),
        }
    }
}
