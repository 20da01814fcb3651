use dshop_core::listing::{OrderQuery, OrderSort, filter_orders};
use dshop_sdk::objects::OrderStatus;

use super::{App, money, order_line, surface};

pub async fn list(
    app: &App,
    search: String,
    status: Option<OrderStatus>,
    sort: OrderSort,
) -> anyhow::Result<()> {
    let client = app.customer("view your orders").await?;
    let orders = client.list_orders().await.map_err(|e| {
        let message = e.banner_message("Failed to load orders");
        surface(e, message)
    })?;

    if orders.is_empty() {
        println!("You haven't placed any orders yet.");
        return Ok(());
    }

    let query = OrderQuery {
        search,
        status,
        sort,
    };
    let shown = filter_orders(&orders, &query);
    if shown.is_empty() {
        println!("No orders match your filters.");
        return Ok(());
    }
    for order in &shown {
        println!("{}", order_line(order));
    }
    println!();
    println!("Showing {} of {} orders", shown.len(), orders.len());
    Ok(())
}

pub async fn show(app: &App, id: i64) -> anyhow::Result<()> {
    let client = app.customer("view your orders").await?;
    let order = client.get_order(id).await.map_err(|e| {
        let message = e.banner_message("Order not found");
        surface(e, message)
    })?;

    println!("{}", order_line(&order));
    if let Some(reference) = &order.razorpay_order_id {
        println!("Payment reference: {reference}");
    }
    println!();
    for item in &order.items {
        println!(
            "  {:<36} {:>3} × {:>10}",
            item.title(),
            item.quantity,
            money(item.unit_price())
        );
    }
    Ok(())
}
