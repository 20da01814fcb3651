use dshop_core::listing::AccountSummary;
use dshop_core::validation::{LoginForm, RegisterForm};

use super::{App, money, surface};

pub async fn login(app: &App, email: String, password: String) -> anyhow::Result<()> {
    let form = LoginForm { email, password };
    let session = match app.auth.login(&form).await {
        Ok(session) => session,
        Err(e) => {
            let message = e.user_message("Login failed. Please check your credentials.");
            return Err(surface(e, message));
        }
    };
    println!("Welcome back, {}!", session.display_name());
    Ok(())
}

pub async fn register(
    app: &App,
    full_name: String,
    email: String,
    password: String,
    confirm_password: String,
) -> anyhow::Result<()> {
    let form = RegisterForm {
        full_name,
        email,
        password,
        confirm_password,
    };
    let session = match app.auth.register(&form).await {
        Ok(session) => session,
        Err(e) => {
            let message = e.user_message("Registration failed. Please try again.");
            return Err(surface(e, message));
        }
    };
    println!("Account created. Signed in as {}.", session.email);
    Ok(())
}

pub async fn logout(app: &App) -> anyhow::Result<()> {
    app.auth.logout().await?;
    println!("Signed out.");
    Ok(())
}

pub async fn whoami(app: &App) -> anyhow::Result<()> {
    match app.auth.current().await {
        Some(session) => {
            let role = session
                .user
                .as_ref()
                .map(|u| u.role.to_string())
                .unwrap_or_else(|| "unknown role".to_owned());
            println!("{} <{}> ({role})", session.display_name(), session.email);
        }
        None => println!("Not signed in."),
    }
    Ok(())
}

pub async fn profile(app: &App) -> anyhow::Result<()> {
    let client = app.customer("view your profile").await?;
    let (orders, cart) = tokio::try_join!(client.list_orders(), client.get_cart())
        .map_err(|e| {
            let message = e.banner_message("Failed to load account details");
            surface(e, message)
        })?;
    let summary = AccountSummary::of(&orders, &cart);

    if let Some(session) = app.auth.current().await {
        println!("{} <{}>", session.display_name(), session.email);
        println!();
    }
    println!("Total orders:     {}", summary.total_orders);
    println!("Pending orders:   {}", summary.pending_orders);
    println!("Completed orders: {}", summary.completed_orders);
    println!("Cart items:       {}", summary.cart_lines);
    println!("Total spent:      {}", money(summary.total_spent));
    Ok(())
}
