use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use dshop_sdk::objects::Product;
use rust_decimal::Decimal;

use super::{UnknownSort, contains_ci};

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: Decimal::ZERO,
            max: Decimal::from(200_000),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    /// Title, case-insensitive.
    #[default]
    Name,
    PriceLow,
    PriceHigh,
}

impl fmt::Display for ProductSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductSort::Name => write!(f, "name"),
            ProductSort::PriceLow => write!(f, "price-low"),
            ProductSort::PriceHigh => write!(f, "price-high"),
        }
    }
}

impl FromStr for ProductSort {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(ProductSort::Name),
            "price-low" => Ok(ProductSort::PriceLow),
            "price-high" => Ok(ProductSort::PriceHigh),
            other => Err(UnknownSort(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Matched against title and description.
    pub search: String,
    pub price: PriceRange,
    pub sort: ProductSort,
}

pub fn filter_products<'a>(products: &'a [Product], query: &ProductQuery) -> Vec<&'a Product> {
    let search = query.search.trim();
    let mut out: Vec<&Product> = products
        .iter()
        .filter(|p| contains_ci(&p.title, search) || contains_ci(&p.description, search))
        .filter(|p| query.price.contains(p.price))
        .collect();
    out.sort_by(|a, b| compare(a, b, query.sort));
    out
}

fn compare(a: &Product, b: &Product, sort: ProductSort) -> Ordering {
    match sort {
        ProductSort::Name => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        ProductSort::PriceLow => a.price.cmp(&b.price),
        ProductSort::PriceHigh => b.price.cmp(&a.price),
    }
}

/// Headline numbers for the catalogue page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogueSummary {
    pub total: usize,
    pub under_1k: usize,
    pub from_1k_to_5k: usize,
    /// Upper bound for the price slider, never below 10000.
    pub slider_max: Decimal,
}

impl CatalogueSummary {
    pub fn of(products: &[Product]) -> Self {
        let thousand = Decimal::from(1_000);
        let five_thousand = Decimal::from(5_000);
        let slider_max = products
            .iter()
            .map(|p| p.price)
            .fold(Decimal::from(10_000), Decimal::max);
        Self {
            total: products.len(),
            under_1k: products.iter().filter(|p| p.price < thousand).count(),
            from_1k_to_5k: products
                .iter()
                .filter(|p| p.price >= thousand && p.price < five_thousand)
                .count(),
            slider_max,
        }
    }
}
