use std::sync::Arc;

use dshop_core::cart::{CartEditor, CartError, CartTotals, MutationOutcome};
use dshop_sdk::objects::CartItem;

use super::{App, money, surface};

async fn editor(app: &App) -> anyhow::Result<CartEditor> {
    let client = app.customer("view your cart").await?;
    let editor = CartEditor::new(Arc::new(client));
    editor.refresh().await.map_err(cart_error)?;
    Ok(editor)
}

fn cart_error(e: CartError) -> anyhow::Error {
    let message = e.user_message();
    surface(e, message)
}

pub(crate) fn print_cart(lines: &[CartItem]) {
    if lines.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for line in lines {
        println!(
            "[{:>4}] {:<36} {:>3} × {:>10} = {:>12}",
            line.id,
            line.title(),
            line.quantity,
            money(line.unit_price()),
            money(line.line_total())
        );
    }
    let totals = CartTotals::of(lines);
    println!();
    println!(
        "Subtotal ({} items): {}",
        CartTotals::item_count(lines),
        money(totals.subtotal)
    );
    println!("Shipping:            {}", money(totals.shipping));
    println!("Total:               {}", money(totals.total));
}

pub async fn show(app: &App) -> anyhow::Result<()> {
    let editor = editor(app).await?;
    print_cart(&editor.lines().await);
    Ok(())
}

pub async fn add(app: &App, product_id: i64, quantity: u32) -> anyhow::Result<()> {
    let client = app.customer("add items to cart").await?;
    let editor = CartEditor::new(Arc::new(client));
    editor.add(product_id, quantity).await.map_err(cart_error)?;
    println!("Product added to cart successfully!");
    print_cart(&editor.lines().await);
    Ok(())
}

pub async fn set(app: &App, line_id: i64, quantity: u32) -> anyhow::Result<()> {
    let editor = editor(app).await?;
    let outcome = editor
        .set_quantity(line_id, quantity)
        .await
        .map_err(cart_error)?;
    report(&editor, outcome).await;
    Ok(())
}

pub async fn increment(app: &App, line_id: i64) -> anyhow::Result<()> {
    let editor = editor(app).await?;
    let outcome = editor.increment(line_id).await.map_err(cart_error)?;
    report(&editor, outcome).await;
    Ok(())
}

pub async fn decrement(app: &App, line_id: i64) -> anyhow::Result<()> {
    let editor = editor(app).await?;
    let outcome = editor.decrement(line_id).await.map_err(cart_error)?;
    if outcome == MutationOutcome::Skipped {
        println!("Quantity is already 1. Use `dshop cart remove {line_id}` to drop the item.");
    }
    report(&editor, outcome).await;
    Ok(())
}

pub async fn remove(app: &App, line_id: i64) -> anyhow::Result<()> {
    let editor = editor(app).await?;
    editor.remove(line_id).await.map_err(cart_error)?;
    print_cart(&editor.lines().await);
    Ok(())
}

async fn report(editor: &CartEditor, outcome: MutationOutcome) {
    if outcome == MutationOutcome::Applied {
        print_cart(&editor.lines().await);
    }
}
