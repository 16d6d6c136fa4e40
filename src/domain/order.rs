use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShippingStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl fmt::Display for ShippingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// Snapshot of a cart line at checkout time. Later product edits never touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_code: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: u64,
}

impl OrderLine {
    pub fn line_total(&self) -> u64 {
        u64::from(self.quantity) * self.unit_price
    }
}

/// A placed order, keyed by `order_number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_number: String,
    pub user_run: String,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub line_items: Vec<OrderLine>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub shipping_status: ShippingStatus,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub discount_code: Option<String>,
    #[serde(default)]
    pub payment_ref: Option<String>,
}

impl Order {
    pub fn units(&self) -> u32 {
        self.line_items.iter().map(|line| line.quantity).sum()
    }

    pub fn subtotal(&self) -> u64 {
        self.line_items.iter().map(OrderLine::line_total).sum()
    }
}

/// Admin-side changes to an order. Only the shipping status moves after creation.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub shipping_status: Option<ShippingStatus>,
}
