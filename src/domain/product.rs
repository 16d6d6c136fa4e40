use serde::{Deserialize, Serialize};

/// A catalog product, keyed by `code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: u64,
    #[serde(default)]
    pub image: String,
    /// Committed units available for sale.
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub critical_stock: u32,
    /// Units currently sitting in the cart. Informational only.
    #[serde(default)]
    pub reserved_stock: u32,
}

impl Product {
    pub fn new(code: impl Into<String>, name: impl Into<String>, price: u64, stock: u32) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: String::new(),
            category: String::new(),
            price,
            image: String::new(),
            stock,
            critical_stock: 0,
            reserved_stock: 0,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.stock <= self.critical_stock
    }
}

/// Partial update for a product. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<u64>,
    pub image: Option<String>,
    pub stock: Option<u32>,
    pub critical_stock: Option<u32>,
}
