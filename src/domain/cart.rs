use serde::{Deserialize, Serialize};

/// One line of the device-level cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_code: String,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
    pub price_at_add: u64,
}

impl CartLine {
    pub fn line_total(&self) -> u64 {
        u64::from(self.quantity) * self.price_at_add
    }
}
