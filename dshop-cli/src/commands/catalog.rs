use dshop_core::listing::{
    CatalogueSummary, PriceRange, ProductQuery, ProductSort, filter_products,
};
use rust_decimal::Decimal;

use super::{App, money, surface};

pub async fn list(
    app: &App,
    search: String,
    sort: ProductSort,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
) -> anyhow::Result<()> {
    let client = app.auth.client().await;
    let products = client
        .list_products()
        .await
        .map_err(|e| {
            let message = e.banner_message("Failed to load products");
            surface(e, message)
        })?;

    let defaults = PriceRange::default();
    let query = ProductQuery {
        search,
        price: PriceRange {
            min: min_price.unwrap_or(defaults.min),
            max: max_price.unwrap_or(defaults.max),
        },
        sort,
    };
    let shown = filter_products(&products, &query);

    if shown.is_empty() {
        if query.search.trim().is_empty() {
            println!("No products found.");
        } else {
            println!(
                "We couldn't find any products matching \"{}\".",
                query.search.trim()
            );
            println!("Try adjusting your search terms or filters.");
        }
        return Ok(());
    }

    for p in &shown {
        println!(
            "{:>5}  {:<40} {:>12}  stock {}",
            p.id,
            p.title,
            money(p.price),
            p.stock
        );
    }

    let summary = CatalogueSummary::of(&products);
    println!();
    println!(
        "Showing {} of {} products · {} under ₹1k · {} ₹1k-₹5k",
        shown.len(),
        summary.total,
        summary.under_1k,
        summary.from_1k_to_5k
    );
    Ok(())
}

pub async fn show(app: &App, id: i64) -> anyhow::Result<()> {
    let client = app.auth.client().await;
    let product = client.get_product(id).await.map_err(|e| {
        let message = e.banner_message("Product not found");
        surface(e, message)
    })?;

    println!("{}", product.title);
    println!("{}", money(product.price));
    if let Some(sku) = &product.sku {
        println!("SKU: {sku}");
    }
    if product.stock > 0 {
        println!("In stock: {}", product.stock);
    } else {
        println!("Out of stock");
    }
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
    Ok(())
}
