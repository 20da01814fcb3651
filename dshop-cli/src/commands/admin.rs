use dshop_core::dashboard::{AdminDashboard, DashboardError};
use dshop_core::listing::{filter_admin_orders, filter_admin_products, filter_users};
use dshop_core::validation::ProductForm;
use dshop_sdk::objects::{OrderStatus, Role};

use super::{App, money, order_line, surface};

async fn dashboard(app: &App) -> anyhow::Result<AdminDashboard> {
    let backend = app.admin().await?;
    AdminDashboard::load(backend).await.map_err(dashboard_error)
}

fn dashboard_error(e: DashboardError) -> anyhow::Error {
    let message = e.user_message();
    surface(e, message)
}

pub async fn stats(app: &App) -> anyhow::Result<()> {
    let dash = dashboard(app).await?;
    let stats = &dash.stats;
    println!("Revenue:         {}", money(stats.total_revenue));
    println!("Orders:          {} ({} pending)", stats.total_orders, dash.pending_orders());
    println!("Products:        {}", stats.total_products);
    println!("Users:           {} ({} customers)", stats.total_users, dash.customer_count());
    let mut roles: Vec<_> = stats.users_by_role.iter().collect();
    roles.sort_by_key(|(role, _)| role.to_string());
    for (role, count) in roles {
        println!("  {role:<13}  {count}");
    }
    Ok(())
}

pub async fn products(app: &App, search: &str) -> anyhow::Result<()> {
    let dash = dashboard(app).await?;
    let shown = filter_admin_products(&dash.products, search);
    if shown.is_empty() {
        println!("No products found.");
    }
    for p in shown {
        println!(
            "{:>5}  {:<14} {:<36} {:>12}  stock {}",
            p.id,
            p.sku.as_deref().unwrap_or("-"),
            p.title,
            money(p.price),
            p.stock
        );
    }
    Ok(())
}

pub async fn create_product(app: &App, form: ProductForm) -> anyhow::Result<()> {
    let mut dash = dashboard(app).await?;
    let created = dash.create_product(&form).await.map_err(dashboard_error)?;
    println!("Created product #{} {}", created.id, created.title);
    Ok(())
}

pub async fn update_product(app: &App, id: i64, form: ProductForm) -> anyhow::Result<()> {
    let mut dash = dashboard(app).await?;
    dash.update_product(id, &form)
        .await
        .map_err(dashboard_error)?;
    println!("Updated product #{id}");
    Ok(())
}

pub async fn delete_product(app: &App, id: i64) -> anyhow::Result<()> {
    let mut dash = dashboard(app).await?;
    dash.delete_product(id).await.map_err(dashboard_error)?;
    println!("Deleted product #{id}");
    Ok(())
}

pub async fn orders(app: &App, search: &str, status: Option<OrderStatus>) -> anyhow::Result<()> {
    let dash = dashboard(app).await?;
    let shown = filter_admin_orders(&dash.orders, search, status);
    if shown.is_empty() {
        println!("No orders found.");
    }
    for order in shown {
        println!(
            "{}  {}",
            order_line(order),
            order.customer_email().unwrap_or("-")
        );
    }
    Ok(())
}

pub async fn set_status(app: &App, order_id: i64, status: OrderStatus) -> anyhow::Result<()> {
    let mut dash = dashboard(app).await?;
    dash.update_order_status(order_id, status)
        .await
        .map_err(dashboard_error)?;
    println!("Order #{order_id} is now {status}");
    Ok(())
}

pub async fn users(app: &App, search: &str) -> anyhow::Result<()> {
    let dash = dashboard(app).await?;
    let shown = filter_users(&dash.users, search);
    if shown.is_empty() {
        println!("No users found.");
    }
    for user in shown {
        println!(
            "{:>5}  {:<32} {:<24} {}",
            user.id,
            user.email,
            user.full_name.as_deref().unwrap_or("-"),
            user.role
        );
    }
    Ok(())
}

pub async fn set_role(app: &App, user_id: i64, role: Role) -> anyhow::Result<()> {
    let mut dash = dashboard(app).await?;
    dash.update_user_role(user_id, role)
        .await
        .map_err(dashboard_error)?;
    println!("User #{user_id} is now {role}");
    Ok(())
}
