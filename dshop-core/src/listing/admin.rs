//! Filters for the admin tables.

use dshop_sdk::objects::{Order, OrderStatus, Product, User};

use super::contains_ci;

/// Orders matching a customer email or an order id, and a status.
pub fn filter_admin_orders<'a>(
    orders: &'a [Order],
    search: &str,
    status: Option<OrderStatus>,
) -> Vec<&'a Order> {
    let search = search.trim();
    orders
        .iter()
        .filter(|o| {
            o.customer_email().is_some_and(|e| contains_ci(e, search))
                || o.id.to_string().contains(search)
        })
        .filter(|o| status.is_none_or(|s| o.status == s))
        .collect()
}

/// Products matching a title or SKU.
pub fn filter_admin_products<'a>(products: &'a [Product], search: &str) -> Vec<&'a Product> {
    let search = search.trim();
    products
        .iter()
        .filter(|p| {
            contains_ci(&p.title, search)
                || p.sku.as_deref().is_some_and(|sku| contains_ci(sku, search))
        })
        .collect()
}

/// Users matching an email or full name.
pub fn filter_users<'a>(users: &'a [User], search: &str) -> Vec<&'a User> {
    let search = search.trim();
    users
        .iter()
        .filter(|u| {
            contains_ci(&u.email, search)
                || u.full_name.as_deref().is_some_and(|n| contains_ci(n, search))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dshop_sdk::objects::{OrderCustomer, Role};
    use rust_decimal::Decimal;

    fn user(id: i64, email: &str, name: Option<&str>) -> User {
        User {
            id,
            email: email.into(),
            full_name: name.map(str::to_owned),
            role: Role::Customer,
        }
    }

    #[test]
    fn test_users_by_email_or_name() {
        let users = vec![
            user(1, "asha@shop.test", Some("Asha Rao")),
            user(2, "ben@shop.test", None),
        ];
        assert_eq!(filter_users(&users, "RAO").len(), 1);
        assert_eq!(filter_users(&users, "shop.test").len(), 2);
        assert!(filter_users(&users, "carol").is_empty());
    }

    #[test]
    fn test_products_by_sku() {
        let products = vec![Product {
            id: 1,
            title: "Lamp".into(),
            description: String::new(),
            price: Decimal::from(10),
            stock: 1,
            sku: Some("LMP-001".into()),
            image_url: None,
        }];
        assert_eq!(filter_admin_products(&products, "lmp").len(), 1);
        assert!(filter_admin_products(&products, "desk").is_empty());
    }

    #[test]
    fn test_orders_by_customer_and_status() {
        let orders = vec![Order {
            id: 44,
            total_amount: Decimal::from(100),
            status: OrderStatus::Pending,
            created_at: None,
            items: Vec::new(),
            razorpay_order_id: None,
            user: Some(OrderCustomer {
                id: Some(2),
                email: Some("ben@shop.test".into()),
                full_name: None,
            }),
        }];
        assert_eq!(filter_admin_orders(&orders, "BEN", None).len(), 1);
        assert_eq!(filter_admin_orders(&orders, "44", Some(OrderStatus::Pending)).len(), 1);
        assert!(filter_admin_orders(&orders, "", Some(OrderStatus::Paid)).is_empty());
    }
}
