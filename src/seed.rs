//! Reference datasets compiled into the binary.
//!
//! They are read at startup to seed empty collections and by `reset`. They
//! are never written back.

use serde::de::DeserializeOwned;

use crate::domain::{Order, Product, User};

const PRODUCTS: &str = include_str!("../data/products.json");
const USERS: &str = include_str!("../data/users.json");
const ORDERS: &str = include_str!("../data/orders.json");

#[derive(Debug, Clone)]
pub struct SeedData {
    pub products: Vec<Product>,
    pub users: Vec<User>,
    pub orders: Vec<Order>,
}

impl SeedData {
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Ok(Self {
            products: parse(PRODUCTS)?,
            users: parse(USERS)?,
            orders: parse(ORDERS)?,
        })
    }

    /// The accounts login falls back to when the user repository has no match.
    pub fn predefined_admins(&self) -> Vec<User> {
        self.users.iter().filter(|u| u.is_admin()).cloned().collect()
    }
}

fn parse<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::pricing::{summarize, ShippingPolicy};
    use crate::domain::CartLine;

    #[test]
    fn test_bundled_data_parses_and_is_consistent() {
        let seed = SeedData::bundled().unwrap();
        assert!(!seed.products.is_empty());
        assert!(seed.products.iter().all(|p| p.reserved_stock == 0));
        assert_eq!(seed.predefined_admins().len(), 2);

        for order in &seed.orders {
            assert!(seed.users.iter().any(|u| u.run == order.user_run), "{}", order.order_number);
        }
    }

    #[test]
    fn test_seeded_totals_match_pricing_rules() {
        let seed = SeedData::bundled().unwrap();
        for order in &seed.orders {
            let user = seed.users.iter().find(|u| u.run == order.user_run).unwrap();
            let lines: Vec<CartLine> = order
                .line_items
                .iter()
                .map(|l| CartLine {
                    product_code: l.product_code.clone(),
                    name: l.name.clone(),
                    quantity: l.quantity,
                    price_at_add: l.unit_price,
                })
                .collect();
            let totals = summarize(&lines, Some(user), &ShippingPolicy::default());
            assert_eq!(totals.total, order.total, "{}", order.order_number);
        }
    }
}
