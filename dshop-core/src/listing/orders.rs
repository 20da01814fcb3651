use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use dshop_sdk::objects::{Order, OrderStatus};

use super::{UnknownSort, contains_ci};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderSort {
    #[default]
    Newest,
    Oldest,
    AmountHigh,
    AmountLow,
}

impl fmt::Display for OrderSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSort::Newest => write!(f, "newest"),
            OrderSort::Oldest => write!(f, "oldest"),
            OrderSort::AmountHigh => write!(f, "amount-high"),
            OrderSort::AmountLow => write!(f, "amount-low"),
        }
    }
}

impl FromStr for OrderSort {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(OrderSort::Newest),
            "oldest" => Ok(OrderSort::Oldest),
            "amount-high" => Ok(OrderSort::AmountHigh),
            "amount-low" => Ok(OrderSort::AmountLow),
            other => Err(UnknownSort(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    /// Matched against the order id digits and item product titles.
    pub search: String,
    /// `None` shows every status.
    pub status: Option<OrderStatus>,
    pub sort: OrderSort,
}

pub fn filter_orders<'a>(orders: &'a [Order], query: &OrderQuery) -> Vec<&'a Order> {
    let search = query.search.trim();
    let mut out: Vec<&Order> = orders
        .iter()
        .filter(|o| matches_search(o, search))
        .filter(|o| query.status.is_none_or(|s| o.status == s))
        .collect();
    out.sort_by(|a, b| compare(a, b, query.sort));
    out
}

fn matches_search(order: &Order, search: &str) -> bool {
    order.id.to_string().contains(search)
        || order.items.iter().any(|item| {
            item.product
                .as_ref()
                .is_some_and(|p| contains_ci(&p.title, search))
        })
}

fn compare(a: &Order, b: &Order, sort: OrderSort) -> Ordering {
    match sort {
        OrderSort::Newest => b.created_at.cmp(&a.created_at),
        OrderSort::Oldest => a.created_at.cmp(&b.created_at),
        OrderSort::AmountHigh => b.total_amount.cmp(&a.total_amount),
        OrderSort::AmountLow => a.total_amount.cmp(&b.total_amount),
    }
}
