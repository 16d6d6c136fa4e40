use crate::actor_framework::Entity;
use crate::domain::{Product, ProductPatch};
use crate::store::keys;

use super::actions::{ProductAction, ProductActionResult};

impl Entity for Product {
    type Key = String;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    const COLLECTION: &'static str = keys::PRODUCTS;

    fn key(&self) -> &String {
        &self.code
    }

    /// New products never start with a reservation.
    fn on_create(&mut self) -> Result<(), String> {
        if self.code.trim().is_empty() {
            return Err("product code is required".to_string());
        }
        self.reserved_stock = 0;
        Ok(())
    }

    fn on_update(&mut self, patch: ProductPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
            self.reserved_stock = self.reserved_stock.min(stock);
        }
        if let Some(critical_stock) = patch.critical_stock {
            self.critical_stock = critical_stock;
        }
        Ok(())
    }

    /// # Actions
    /// - `CheckStock`: Returns the current stock level
    /// - `DecrementStock(amount)`: Removes sold units, or reports the shortfall
    /// - `SetReserved(amount)`: Stores the cart reservation, never above stock
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, String> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::StockLevel(self.stock)),
            ProductAction::DecrementStock(amount) => {
                if self.stock >= amount {
                    self.stock -= amount;
                    self.reserved_stock = self.reserved_stock.min(self.stock);
                    Ok(ProductActionResult::Decremented {
                        remaining: self.stock,
                    })
                } else {
                    Ok(ProductActionResult::Insufficient {
                        available: self.stock,
                    })
                }
            }
            ProductAction::SetReserved(amount) => {
                self.reserved_stock = amount.min(self.stock);
                Ok(ProductActionResult::Reserved(self.reserved_stock))
            }
        }
    }
}
