//! Shopping cart: persisted lines, stock-aware mutations and pricing.

mod client;
mod error;
pub mod pricing;
mod service;

pub use client::*;
pub use error::*;
pub use pricing::{CartTotals, ShippingPolicy};
pub use service::*;

use serde::Serialize;

use crate::domain::{CartLine, Product};

/// A cart line asking for more than the catalog can deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockShortage {
    pub product_code: String,
    pub name: String,
    pub requested: u32,
    pub available: u32,
}

/// Lines whose quantity exceeds current stock. A product missing from the
/// catalog counts as zero stock.
pub fn find_shortages(lines: &[CartLine], products: &[Product]) -> Vec<StockShortage> {
    lines
        .iter()
        .filter_map(|line| {
            let available = products
                .iter()
                .find(|p| p.code == line.product_code)
                .map_or(0, |p| p.stock);
            (line.quantity > available).then(|| StockShortage {
                product_code: line.product_code.clone(),
                name: line.name.clone(),
                requested: line.quantity,
                available,
            })
        })
        .collect()
}
